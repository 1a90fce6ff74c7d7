//! Component lifecycle hooks for mount and cleanup callbacks.
//!
//! A [`Lifecycle`] is the per-component scope a host drives: it calls
//! [`Lifecycle::mount`] once the component is attached and
//! [`Lifecycle::cleanup`] when it goes away. Each phase runs at most once.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Lifecycle phase a hook is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// Component is attached to the host.
    Mount,
    /// Component is being removed.
    Cleanup,
}

/// Where a component currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    /// Constructed, not yet mounted.
    #[default]
    Created,
    /// Mount hooks have run.
    Mounted,
    /// Cleanup hooks have run. Terminal.
    CleanedUp,
}

/// A lifecycle callback. Runs at most once.
pub type LifecycleCallback = Box<dyn FnOnce()>;

/// Unique ID for a lifecycle hook registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    /// Create a new hook ID.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Default)]
struct LifecycleInner {
    state: Cell<LifecycleState>,
    next_id: Cell<u64>,
    mount_hooks: RefCell<Vec<(HookId, LifecycleCallback)>>,
    cleanup_hooks: RefCell<Vec<(HookId, LifecycleCallback)>>,
}

/// Mount/cleanup scope for one component instance.
///
/// Cloning yields another handle to the same scope.
#[derive(Clone, Default)]
pub struct Lifecycle {
    inner: Rc<LifecycleInner>,
}

impl Lifecycle {
    /// Create a new lifecycle scope in the [`LifecycleState::Created`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.inner.state.get()
    }

    /// Whether mount hooks have run and cleanup has not.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state() == LifecycleState::Mounted
    }

    /// Register a mount hook.
    ///
    /// If the scope is already mounted the hook runs immediately; after
    /// cleanup it is dropped without running.
    pub fn on_mount<F>(&self, callback: F) -> HookId
    where
        F: FnOnce() + 'static,
    {
        let id = self.next_id();
        match self.state() {
            LifecycleState::Created => self
                .inner
                .mount_hooks
                .borrow_mut()
                .push((id, Box::new(callback))),
            LifecycleState::Mounted => callback(),
            LifecycleState::CleanedUp => {}
        }
        id
    }

    /// Register a cleanup hook.
    ///
    /// If the scope has already been cleaned up the hook runs immediately.
    pub fn on_cleanup<F>(&self, callback: F) -> HookId
    where
        F: FnOnce() + 'static,
    {
        let id = self.next_id();
        if self.state() == LifecycleState::CleanedUp {
            callback();
        } else {
            self.inner
                .cleanup_hooks
                .borrow_mut()
                .push((id, Box::new(callback)));
        }
        id
    }

    /// Remove a hook that has not run yet.
    pub fn unregister(&self, id: HookId) -> bool {
        let remove = |hooks: &RefCell<Vec<(HookId, LifecycleCallback)>>| {
            let mut hooks = hooks.borrow_mut();
            let before = hooks.len();
            hooks.retain(|(hook_id, _)| *hook_id != id);
            hooks.len() != before
        };
        remove(&self.inner.mount_hooks) || remove(&self.inner.cleanup_hooks)
    }

    /// Number of hooks waiting for `phase`.
    #[must_use]
    pub fn pending_hooks(&self, phase: LifecyclePhase) -> usize {
        match phase {
            LifecyclePhase::Mount => self.inner.mount_hooks.borrow().len(),
            LifecyclePhase::Cleanup => self.inner.cleanup_hooks.borrow().len(),
        }
    }

    /// Run mount hooks in registration order.
    ///
    /// Returns how many hooks ran. Only the first call after construction
    /// does anything.
    pub fn mount(&self) -> usize {
        if self.state() != LifecycleState::Created {
            return 0;
        }
        self.inner.state.set(LifecycleState::Mounted);
        tracing::debug!("lifecycle mount");

        let hooks = std::mem::take(&mut *self.inner.mount_hooks.borrow_mut());
        let count = hooks.len();
        for (_, hook) in hooks {
            hook();
        }
        count
    }

    /// Run cleanup hooks in reverse registration order.
    ///
    /// Safe to call before [`Lifecycle::mount`] and idempotent: pending mount
    /// hooks are discarded and later calls do nothing.
    pub fn cleanup(&self) -> usize {
        if self.state() == LifecycleState::CleanedUp {
            return 0;
        }
        self.inner.state.set(LifecycleState::CleanedUp);
        tracing::debug!("lifecycle cleanup");

        self.inner.mount_hooks.borrow_mut().clear();
        let hooks = std::mem::take(&mut *self.inner.cleanup_hooks.borrow_mut());
        let count = hooks.len();
        for (_, hook) in hooks.into_iter().rev() {
            hook();
        }
        count
    }

    fn next_id(&self) -> HookId {
        let id = HookId::new(self.inner.next_id.get());
        self.inner.next_id.set(self.inner.next_id.get() + 1);
        id
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("state", &self.state())
            .field("mount_hooks", &self.pending_hooks(LifecyclePhase::Mount))
            .field("cleanup_hooks", &self.pending_hooks(LifecyclePhase::Cleanup))
            .finish()
    }
}
