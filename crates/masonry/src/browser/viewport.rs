//! `window` as a [`Viewport`].

use masonry_core::{measured_width, ListenerId, ResizeListener, Viewport};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// The browser window: width from `innerWidth`, notifications from `resize`.
///
/// A zero `innerWidth` is reported as no width.
pub struct BrowserViewport {
    window: Window,
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<u64, Closure<dyn FnMut()>>>,
}

impl BrowserViewport {
    /// Wrap the global `window`.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        Ok(Self::from_window(window))
    }

    /// Wrap a specific window.
    #[must_use]
    pub fn from_window(window: Window) -> Self {
        Self {
            window,
            next_id: Cell::new(0),
            listeners: RefCell::new(BTreeMap::new()),
        }
    }

    /// Number of installed `resize` listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Viewport for BrowserViewport {
    fn width(&self) -> Option<f64> {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .and_then(measured_width)
    }

    fn add_resize_listener(&self, listener: ResizeListener) -> Option<ListenerId> {
        let cb = Closure::<dyn FnMut()>::new(move || listener());
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?e, "failed to add resize listener");
            return None;
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, cb);
        Some(ListenerId(id))
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        let Some(cb) = self.listeners.borrow_mut().remove(&id.0) else {
            return;
        };
        self.window
            .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
            .ok();
    }
}

impl Drop for BrowserViewport {
    fn drop(&mut self) {
        for cb in std::mem::take(&mut *self.listeners.borrow_mut()).into_values() {
            self.window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
                .ok();
        }
    }
}
