//! Resize handling with refresh-tick coalescing.
//!
//! [`ResizeReactor`] listens for viewport resize notifications and turns each
//! burst into a single recomputation on the next refresh tick. A notification
//! that arrives while a tick is pending cancels it and schedules a new one,
//! so only the latest request runs.
//!
//! ```text
//! Idle --notification--> Pending --tick--> Idle
//!                        Pending --notification--> (cancel) Pending
//! ```

use masonry_core::{FrameHandle, FrameScheduler, HostEnv, ListenerId, ResizeListener, Viewport};
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Whether a deferred recomputation is waiting for a refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactorState {
    /// Nothing scheduled.
    Idle,
    /// A recomputation will run on the next tick.
    Pending,
}

struct ReactorInner {
    viewport: Rc<dyn Viewport>,
    scheduler: Option<Rc<dyn FrameScheduler>>,
    recompute: Box<dyn Fn()>,
    listener: Cell<Option<ListenerId>>,
    pending: Cell<Option<FrameHandle>>,
    generation: Cell<u64>,
    settled: Cell<u64>,
    attached: Cell<bool>,
    notifications: Cell<u64>,
    recomputations: Cell<u64>,
}

impl ReactorInner {
    fn handle_notification(self: &Rc<Self>) {
        if !self.attached.get() {
            return;
        }
        self.notifications.set(self.notifications.get() + 1);

        let Some(scheduler) = self.scheduler.as_ref() else {
            self.run();
            return;
        };

        if let Some(previous) = self.pending.take() {
            tracing::trace!(handle = previous.0, "superseding pending resize recomputation");
            scheduler.cancel_frame(previous);
        }

        // Guards against schedulers that cannot cancel a callback in time.
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = scheduler.request_frame(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.generation.get() != generation {
                return;
            }
            inner.settled.set(generation);
            inner.pending.set(None);
            if inner.attached.get() {
                inner.run();
            }
        }));

        // The scheduler may have run the callback before returning.
        if self.generation.get() == generation && self.settled.get() != generation {
            self.pending.set(Some(handle));
        }
    }

    fn run(&self) {
        self.recomputations.set(self.recomputations.get() + 1);
        (self.recompute)();
    }

    fn cancel_pending(&self) {
        self.generation.set(self.generation.get() + 1);
        if let Some(handle) = self.pending.take() {
            if let Some(scheduler) = self.scheduler.as_ref() {
                scheduler.cancel_frame(handle);
            }
        }
    }
}

/// Subscribes to viewport resizes and coalesces them per refresh tick.
///
/// Each instance owns its own pending-frame slot, so several reactors on
/// one page never cancel each other's work. Dropping the reactor detaches it.
pub struct ResizeReactor {
    inner: Rc<ReactorInner>,
}

impl ResizeReactor {
    /// Create a detached reactor that calls `recompute` for each coalesced burst.
    pub fn new<F>(host: &HostEnv, recompute: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            inner: Rc::new(ReactorInner {
                viewport: Rc::clone(&host.viewport),
                scheduler: host.scheduler.clone(),
                recompute: Box::new(recompute),
                listener: Cell::new(None),
                pending: Cell::new(None),
                generation: Cell::new(0),
                settled: Cell::new(0),
                attached: Cell::new(false),
                notifications: Cell::new(0),
                recomputations: Cell::new(0),
            }),
        }
    }

    /// Subscribe to resize notifications.
    ///
    /// Returns `false` when the viewport cannot deliver them; the reactor then
    /// stays inert. Calling this while attached does nothing.
    pub fn attach(&self) -> bool {
        if self.inner.attached.get() {
            return self.inner.listener.get().is_some();
        }
        self.inner.attached.set(true);

        let weak = Rc::downgrade(&self.inner);
        let listener: ResizeListener = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handle_notification();
            }
        });

        match self.inner.viewport.add_resize_listener(listener) {
            Some(id) => {
                self.inner.listener.set(Some(id));
                tracing::debug!(listener = id.0, "resize reactor attached");
                true
            }
            None => {
                tracing::debug!("viewport has no resize notifications; resize reactor inert");
                false
            }
        }
    }

    /// Unsubscribe and cancel any pending recomputation. Idempotent.
    pub fn detach(&self) {
        let was_attached = self.inner.attached.replace(false);
        if let Some(id) = self.inner.listener.take() {
            self.inner.viewport.remove_resize_listener(id);
        }
        self.inner.cancel_pending();
        if was_attached {
            tracing::debug!("resize reactor detached");
        }
    }

    /// Feed one resize notification, as the viewport listener does.
    pub fn notify(&self) {
        self.inner.handle_notification();
    }

    /// Current state of the pending slot.
    #[must_use]
    pub fn state(&self) -> ReactorState {
        if self.inner.pending.get().is_some() {
            ReactorState::Pending
        } else {
            ReactorState::Idle
        }
    }

    /// Whether [`ResizeReactor::attach`] has been called without a matching detach.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }

    /// Whether the reactor holds a live viewport subscription.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.inner.listener.get().is_some()
    }

    /// Whether recomputation is deferred to refresh ticks.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.inner.scheduler.is_some()
    }

    /// Notifications received while attached.
    #[must_use]
    pub fn notification_count(&self) -> u64 {
        self.inner.notifications.get()
    }

    /// Recomputations actually run.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.inner.recomputations.get()
    }
}

impl Drop for ResizeReactor {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for ResizeReactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeReactor")
            .field("state", &self.state())
            .field("attached", &self.is_attached())
            .field("deferred", &self.is_deferred())
            .field("notifications", &self.notification_count())
            .field("recomputations", &self.recompute_count())
            .finish()
    }
}
