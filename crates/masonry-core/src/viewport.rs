//! Viewport access and resize notifications.

use crate::scheduler::FrameScheduler;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Callback invoked on every viewport resize notification.
pub type ResizeListener = Rc<dyn Fn()>;

/// Handle for a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The host's viewport.
///
/// Both capabilities are optional: a headless host reports no width and
/// refuses resize subscriptions.
pub trait Viewport {
    /// Current viewport width in pixels, or `None` when the host has no viewport.
    fn width(&self) -> Option<f64>;

    /// Subscribe to resize notifications.
    ///
    /// Returns `None` when the host cannot deliver them.
    fn add_resize_listener(&self, listener: ResizeListener) -> Option<ListenerId>;

    /// Remove a listener registered with [`Viewport::add_resize_listener`].
    fn remove_resize_listener(&self, id: ListenerId);

    /// Width to resolve breakpoints against; unbounded when unknown.
    fn effective_width(&self) -> f64 {
        self.width().unwrap_or(f64::INFINITY)
    }
}

/// Interpret a raw width reported by a host.
///
/// Zero, negative and NaN widths mean the host has no usable viewport.
#[must_use]
pub fn measured_width(raw: f64) -> Option<f64> {
    (raw > 0.0).then_some(raw)
}

/// A host without a viewport (server rendering, tests, CLI tools).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessViewport;

impl Viewport for HeadlessViewport {
    fn width(&self) -> Option<f64> {
        None
    }

    fn add_resize_listener(&self, _listener: ResizeListener) -> Option<ListenerId> {
        None
    }

    fn remove_resize_listener(&self, _id: ListenerId) {}
}

/// An in-memory viewport whose width is set programmatically.
///
/// [`SimulatedViewport::resize`] updates the width and notifies listeners
/// synchronously, the way a browser dispatches `resize` events.
#[derive(Default)]
pub struct SimulatedViewport {
    width: Cell<Option<f64>>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, ResizeListener)>>,
}

impl SimulatedViewport {
    /// Create a viewport with the given width.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            width: Cell::new(Some(width)),
            ..Self::default()
        }
    }

    /// Change the width without notifying listeners.
    pub fn set_width(&self, width: f64) {
        self.width.set(Some(width));
    }

    /// Change the width and dispatch one resize notification.
    pub fn resize(&self, width: f64) {
        self.set_width(width);
        self.dispatch_resize();
    }

    /// Dispatch a resize notification without changing the width.
    pub fn dispatch_resize(&self) {
        let listeners: Vec<ResizeListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Number of registered resize listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Viewport for SimulatedViewport {
    fn width(&self) -> Option<f64> {
        self.width.get().and_then(measured_width)
    }

    fn add_resize_listener(&self, listener: ResizeListener) -> Option<ListenerId> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        Some(id)
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

impl fmt::Debug for SimulatedViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedViewport")
            .field("width", &self.width.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

// =============================================================================
// Host environment
// =============================================================================

/// The services a layout engine borrows from its host.
///
/// `scheduler` is `None` when the host has no refresh-cycle deferral; resize
/// recomputation then happens synchronously.
#[derive(Clone)]
pub struct HostEnv {
    /// Viewport width and resize notifications.
    pub viewport: Rc<dyn Viewport>,
    /// Refresh-tick deferral.
    pub scheduler: Option<Rc<dyn FrameScheduler>>,
}

impl HostEnv {
    /// Build an environment from a viewport and an optional scheduler.
    pub fn new(viewport: Rc<dyn Viewport>, scheduler: Option<Rc<dyn FrameScheduler>>) -> Self {
        Self {
            viewport,
            scheduler,
        }
    }

    /// An environment with no viewport and no scheduler.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(Rc::new(HeadlessViewport), None)
    }
}

impl Default for HostEnv {
    fn default() -> Self {
        Self::headless()
    }
}

impl fmt::Debug for HostEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnv")
            .field("width", &self.viewport.width())
            .field("scheduler", &self.scheduler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_viewport() {
        let viewport = HeadlessViewport;
        assert_eq!(viewport.width(), None);
        assert!(viewport.effective_width().is_infinite());
        assert!(viewport.add_resize_listener(Rc::new(|| {})).is_none());
    }

    #[test]
    fn test_simulated_viewport_width() {
        let viewport = SimulatedViewport::new(800.0);
        assert_eq!(viewport.width(), Some(800.0));
        assert_eq!(viewport.effective_width(), 800.0);

        viewport.set_width(640.0);
        assert_eq!(viewport.width(), Some(640.0));
    }

    #[test]
    fn test_simulated_viewport_default_has_no_width() {
        let viewport = SimulatedViewport::default();
        assert!(viewport.effective_width().is_infinite());
    }

    #[test]
    fn test_measured_width() {
        assert_eq!(measured_width(1024.0), Some(1024.0));
        assert_eq!(measured_width(0.5), Some(0.5));
        assert_eq!(measured_width(0.0), None);
        assert_eq!(measured_width(-1.0), None);
        assert_eq!(measured_width(f64::NAN), None);
    }

    #[test]
    fn test_simulated_viewport_zero_width_is_unknown() {
        let viewport = SimulatedViewport::new(0.0);
        assert_eq!(viewport.width(), None);
        assert!(viewport.effective_width().is_infinite());

        viewport.set_width(-20.0);
        assert!(viewport.effective_width().is_infinite());
    }

    #[test]
    fn test_simulated_viewport_resize_notifies() {
        let viewport = SimulatedViewport::new(800.0);
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let id = viewport
            .add_resize_listener(Rc::new(move || hits_clone.set(hits_clone.get() + 1)))
            .expect("listener");

        viewport.resize(500.0);
        viewport.dispatch_resize();
        assert_eq!(hits.get(), 2);
        assert_eq!(viewport.width(), Some(500.0));

        viewport.remove_resize_listener(id);
        viewport.resize(400.0);
        assert_eq!(hits.get(), 2);
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_host_env_headless() {
        let host = HostEnv::headless();
        assert!(host.scheduler.is_none());
        assert_eq!(host.viewport.width(), None);
    }
}
