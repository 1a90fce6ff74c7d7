//! Reactive state for masonry hosts.
//!
//! This module provides the two reactive primitives the layout engine
//! consumes from its host:
//!
//! - [`ReactiveCell<T>`] - an observable get/set cell with a subscriber list
//! - [`Effect`] - a closure that re-runs whenever a tracked cell is written
//!
//! Everything here is single-threaded. Cells are cheap handles over shared
//! `Rc` state, so cloning a cell yields another view of the same value.
//!
//! # Example
//!
//! ```
//! use masonry_core::{Effect, ReactiveCell};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let count = ReactiveCell::new(2usize);
//! let seen = Rc::new(Cell::new(0usize));
//!
//! let effect = {
//!     let count = count.clone();
//!     let seen = seen.clone();
//!     Effect::new(move || seen.set(count.get()))
//! };
//! effect.track(&count);
//!
//! count.set(4);
//! assert_eq!(seen.get(), 4);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Type alias for subscriber callbacks.
type SubscriberFn<T> = Rc<dyn Fn(&T)>;

/// Type alias for the shared subscriber list.
type Subscribers<T> = Rc<RefCell<Vec<(SubscriptionId, SubscriberFn<T>)>>>;

/// Handle returned by [`ReactiveCell::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric value of the handle.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A reactive cell that holds a value and notifies on changes.
pub struct ReactiveCell<T> {
    value: Rc<RefCell<T>>,
    subscribers: Subscribers<T>,
    next_id: Rc<Cell<u64>>,
}

impl<T: Clone + 'static> ReactiveCell<T> {
    /// Create a new reactive cell with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Set a new value, notifying subscribers.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Update the value using a function, notifying subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value.borrow_mut());
        self.notify();
    }

    /// Subscribe to value changes.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn notify(&self) {
        // Snapshot both so subscribers may read or write this cell.
        let value = self.get();
        let subscribers: Vec<SubscriberFn<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, sub)| Rc::clone(sub))
            .collect();
        for sub in subscribers {
            sub(&value);
        }
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveCell<T> {
    /// Write `value` only if it differs from the current one.
    ///
    /// Returns `true` when the cell changed and subscribers were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        if *self.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            subscribers: Rc::clone(&self.subscribers),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: Clone + Default + 'static> Default for ReactiveCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &*self.value.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

// =============================================================================
// Effect
// =============================================================================

type Teardown = Box<dyn FnOnce()>;

struct EffectInner {
    run: Box<dyn Fn()>,
    disposed: Cell<bool>,
    runs: Cell<u64>,
    teardown: RefCell<Vec<Teardown>>,
}

impl EffectInner {
    fn execute(&self) {
        if self.disposed.get() {
            return;
        }
        self.runs.set(self.runs.get() + 1);
        (self.run)();
    }
}

/// A side effect that re-runs whenever one of its tracked cells changes.
///
/// Dependencies are declared explicitly with [`Effect::track`]. Dropping the
/// effect disposes it and removes every subscription it installed.
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    /// Create an effect and run it once immediately.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        let effect = Self::lazy(f);
        effect.run();
        effect
    }

    /// Create an effect without running it.
    ///
    /// It first runs when a tracked cell changes or [`Effect::run`] is called.
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            inner: Rc::new(EffectInner {
                run: Box::new(f),
                disposed: Cell::new(false),
                runs: Cell::new(0),
                teardown: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Re-run this effect whenever `cell` is written.
    pub fn track<T: Clone + 'static>(&self, cell: &ReactiveCell<T>) -> &Self {
        if self.inner.disposed.get() {
            return self;
        }

        let weak: Weak<EffectInner> = Rc::downgrade(&self.inner);
        let id = cell.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.execute();
            }
        });

        let cell = cell.clone();
        self.inner
            .teardown
            .borrow_mut()
            .push(Box::new(move || {
                cell.unsubscribe(id);
            }));
        self
    }

    /// Run the effect now.
    pub fn run(&self) {
        self.inner.execute();
    }

    /// How many times the effect has run.
    #[must_use]
    pub fn run_count(&self) -> u64 {
        self.inner.runs.get()
    }

    /// Stop reacting and drop every subscription. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        let teardown = std::mem::take(&mut *self.inner.teardown.borrow_mut());
        for undo in teardown {
            undo();
        }
    }

    /// Whether [`Effect::dispose`] has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("runs", &self.inner.runs.get())
            .field("disposed", &self.inner.disposed.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // ReactiveCell Tests
    // =========================================================================

    #[test]
    fn test_reactive_cell_new() {
        let cell = ReactiveCell::new(42);
        assert_eq!(cell.get(), 42);
    }

    #[test]
    fn test_reactive_cell_set() {
        let cell = ReactiveCell::new(0);
        cell.set(100);
        assert_eq!(cell.get(), 100);
    }

    #[test]
    fn test_reactive_cell_update() {
        let cell = ReactiveCell::new(10);
        cell.update(|v| *v *= 2);
        assert_eq!(cell.get(), 20);
    }

    #[test]
    fn test_reactive_cell_with() {
        let cell = ReactiveCell::new(vec![1, 2, 3]);
        assert_eq!(cell.with(Vec::len), 3);
    }

    #[test]
    fn test_reactive_cell_subscribe() {
        let cell = ReactiveCell::new(0);
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();

        cell.subscribe(move |v| seen_clone.set(*v));

        cell.set(42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn test_reactive_cell_unsubscribe() {
        let cell = ReactiveCell::new(0);
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();

        let id = cell.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));
        cell.set(1);
        assert!(cell.unsubscribe(id));
        assert!(!cell.unsubscribe(id));
        cell.set(2);

        assert_eq!(calls.get(), 1);
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn test_reactive_cell_set_if_changed() {
        let cell = ReactiveCell::new(3);
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        cell.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        assert!(!cell.set_if_changed(3));
        assert_eq!(calls.get(), 0);

        assert!(cell.set_if_changed(4));
        assert_eq!(calls.get(), 1);
        assert_eq!(cell.get(), 4);
    }

    #[test]
    fn test_reactive_cell_clone_shares_state() {
        let cell1 = ReactiveCell::new(10);
        let cell2 = cell1.clone();

        cell1.set(20);
        assert_eq!(cell2.get(), 20);

        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        cell2.subscribe(move |v| seen_clone.set(*v));
        cell1.set(30);
        assert_eq!(seen.get(), 30);
    }

    #[test]
    fn test_reactive_cell_subscriber_may_write_back() {
        let cell = ReactiveCell::new(0);
        let writer = cell.clone();
        cell.subscribe(move |v| {
            if *v == 1 {
                writer.set(2);
            }
        });

        cell.set(1);
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn test_reactive_cell_default() {
        let cell: ReactiveCell<i32> = ReactiveCell::default();
        assert_eq!(cell.get(), 0);
    }

    // =========================================================================
    // Effect Tests
    // =========================================================================

    #[test]
    fn test_effect_new_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let effect = Effect::new(move || runs_clone.set(runs_clone.get() + 1));

        assert_eq!(runs.get(), 1);
        assert_eq!(effect.run_count(), 1);
    }

    #[test]
    fn test_effect_lazy_does_not_run() {
        let effect = Effect::lazy(|| {});
        assert_eq!(effect.run_count(), 0);
    }

    #[test]
    fn test_effect_tracks_cell() {
        let cell = ReactiveCell::new(1);
        let seen = Rc::new(Cell::new(0));
        let effect = {
            let cell = cell.clone();
            let seen = seen.clone();
            Effect::lazy(move || seen.set(cell.get()))
        };
        effect.track(&cell);

        cell.set(7);
        assert_eq!(seen.get(), 7);
        assert_eq!(effect.run_count(), 1);
    }

    #[test]
    fn test_effect_dispose_unsubscribes() {
        let cell = ReactiveCell::new(1);
        let effect = Effect::lazy(|| {});
        effect.track(&cell);
        assert_eq!(cell.subscriber_count(), 1);

        effect.dispose();
        effect.dispose();
        assert!(effect.is_disposed());
        assert_eq!(cell.subscriber_count(), 0);

        cell.set(2);
        assert_eq!(effect.run_count(), 0);
    }

    #[test]
    fn test_effect_drop_disposes() {
        let cell = ReactiveCell::new(1);
        {
            let effect = Effect::lazy(|| {});
            effect.track(&cell);
            assert_eq!(cell.subscriber_count(), 1);
        }
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn test_effect_track_after_dispose_is_noop() {
        let cell = ReactiveCell::new(1);
        let effect = Effect::lazy(|| {});
        effect.dispose();
        effect.track(&cell);
        assert_eq!(cell.subscriber_count(), 0);
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        #[test]
        fn prop_only_live_subscribers_are_notified(remove in proptest::collection::vec(any::<bool>(), 0..24)) {
            let cell = ReactiveCell::new(0u32);
            let hits = Rc::new(RefCell::new(vec![0u32; remove.len()]));

            let ids: Vec<SubscriptionId> = (0..remove.len())
                .map(|i| {
                    let hits = hits.clone();
                    cell.subscribe(move |_| hits.borrow_mut()[i] += 1)
                })
                .collect();
            for (id, &removed) in ids.iter().zip(&remove) {
                if removed {
                    prop_assert!(cell.unsubscribe(*id));
                    prop_assert!(!cell.unsubscribe(*id));
                }
            }

            let live = remove.iter().filter(|&&r| !r).count();
            prop_assert_eq!(cell.subscriber_count(), live);

            cell.set(1);
            for (i, &removed) in remove.iter().enumerate() {
                prop_assert_eq!(hits.borrow()[i], u32::from(!removed));
            }
        }
    }
}
