//! Refresh-cycle deferral.
//!
//! A [`FrameScheduler`] runs a callback on the host's next display refresh
//! and hands back a [`FrameHandle`] that can cancel it before it fires. In
//! the browser this is `requestAnimationFrame`; [`ManualFrameScheduler`]
//! lets headless hosts and tests drive frames themselves.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;

/// Callback run on the next refresh tick.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Cancellation token for a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub i64);

/// Defers work to the next display refresh.
pub trait FrameScheduler {
    /// Schedule `callback` for the next refresh tick.
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a scheduled callback. Unknown or already fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// A frame scheduler whose ticks are driven explicitly via [`run_frame`].
///
/// [`run_frame`]: ManualFrameScheduler::run_frame
#[derive(Default)]
pub struct ManualFrameScheduler {
    next_handle: Cell<i64>,
    pending: RefCell<BTreeMap<FrameHandle, FrameCallback>>,
    frame: Cell<u64>,
}

impl ManualFrameScheduler {
    /// Create a scheduler with no pending callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every callback scheduled before this tick, in request order.
    ///
    /// Callbacks requested while the tick runs wait for the next one.
    /// Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        self.frame.set(self.frame.get() + 1);
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        count
    }

    /// Number of callbacks waiting for the next tick.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of ticks run so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame.get()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_handle.get() + 1);
        self.next_handle.set(handle.0);
        self.pending.borrow_mut().insert(handle, callback);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().remove(&handle);
    }
}

impl fmt::Debug for ManualFrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualFrameScheduler")
            .field("pending", &self.pending_count())
            .field("frame", &self.frame.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> FrameCallback) {
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let make = move || -> FrameCallback {
            let hits = hits_clone.clone();
            Box::new(move || hits.set(hits.get() + 1))
        };
        (hits, make)
    }

    #[test]
    fn test_request_runs_on_next_frame() {
        let scheduler = ManualFrameScheduler::new();
        let (hits, make) = counter();

        scheduler.request_frame(make());
        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.pending_count(), 1);

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cancel_prevents_run() {
        let scheduler = ManualFrameScheduler::new();
        let (hits, make) = counter();

        let handle = scheduler.request_frame(make());
        scheduler.cancel_frame(handle);

        assert_eq!(scheduler.run_frame(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_cancel_unknown_handle_is_ignored() {
        let scheduler = ManualFrameScheduler::new();
        scheduler.cancel_frame(FrameHandle(99));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let scheduler = ManualFrameScheduler::new();
        let a = scheduler.request_frame(Box::new(|| {}));
        let b = scheduler.request_frame(Box::new(|| {}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_callback_requested_during_tick_waits() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let (hits, make) = counter();
        let inner = make();

        let sched = scheduler.clone();
        scheduler.request_frame(Box::new(move || {
            sched.request_frame(inner);
        }));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.frame_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_cancelled_callbacks_never_fire(cancel in proptest::collection::vec(any::<bool>(), 0..32)) {
            let scheduler = ManualFrameScheduler::new();
            let fired = Rc::new(RefCell::new(Vec::new()));

            let handles: Vec<FrameHandle> = (0..cancel.len())
                .map(|i| {
                    let fired = fired.clone();
                    scheduler.request_frame(Box::new(move || fired.borrow_mut().push(i)))
                })
                .collect();
            for (handle, &cancelled) in handles.iter().zip(&cancel) {
                if cancelled {
                    scheduler.cancel_frame(*handle);
                }
            }

            let expected: Vec<usize> = (0..cancel.len()).filter(|&i| !cancel[i]).collect();
            prop_assert_eq!(scheduler.pending_count(), expected.len());
            prop_assert_eq!(scheduler.run_frame(), expected.len());
            prop_assert_eq!(&*fired.borrow(), &expected);
            prop_assert_eq!(scheduler.run_frame(), 0);
        }
    }
}
