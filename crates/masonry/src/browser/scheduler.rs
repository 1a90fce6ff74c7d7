//! `requestAnimationFrame` as a [`FrameScheduler`].

use masonry_core::{FrameCallback, FrameHandle, FrameScheduler};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct FrameSlot {
    callback: RefCell<Option<FrameCallback>>,
    done: Cell<bool>,
}

/// Schedules callbacks on the browser's next animation frame.
pub struct AnimationFrameScheduler {
    window: Window,
    frames: RefCell<BTreeMap<i32, (Rc<FrameSlot>, Closure<dyn FnMut()>)>>,
}

impl AnimationFrameScheduler {
    /// Use the global `window`.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        Ok(Self::from_window(window))
    }

    /// Use a specific window.
    #[must_use]
    pub fn from_window(window: Window) -> Self {
        Self {
            window,
            frames: RefCell::new(BTreeMap::new()),
        }
    }

    /// Frames requested and not yet fired or cancelled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.frames
            .borrow()
            .values()
            .filter(|(slot, _)| !slot.done.get())
            .count()
    }

    // A closure may only be dropped once it has returned.
    fn purge_fired(&self) {
        self.frames.borrow_mut().retain(|_, (slot, _)| !slot.done.get());
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.purge_fired();

        let slot = Rc::new(FrameSlot {
            callback: RefCell::new(Some(callback)),
            done: Cell::new(false),
        });
        let cb = {
            let slot = Rc::clone(&slot);
            Closure::<dyn FnMut()>::new(move || {
                let callback = slot.callback.borrow_mut().take();
                if let Some(callback) = callback {
                    callback();
                }
                slot.done.set(true);
            })
        };

        match self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
        {
            Ok(id) => {
                self.frames.borrow_mut().insert(id, (slot, cb));
                FrameHandle(i64::from(id))
            }
            Err(e) => {
                // No frame will ever fire; run now rather than lose the work.
                tracing::warn!(error = ?e, "requestAnimationFrame failed; running callback now");
                drop(cb);
                let callback = slot.callback.borrow_mut().take();
                if let Some(callback) = callback {
                    callback();
                }
                FrameHandle(-1)
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let Ok(id) = i32::try_from(handle.0) else {
            return;
        };
        let removed = self.frames.borrow_mut().remove(&id);
        if let Some((slot, _cb)) = removed {
            if !slot.done.get() {
                self.window.cancel_animation_frame(id).ok();
            }
        }
    }
}

impl Drop for AnimationFrameScheduler {
    fn drop(&mut self) {
        for (id, (slot, _cb)) in std::mem::take(&mut *self.frames.borrow_mut()) {
            if !slot.done.get() {
                self.window.cancel_animation_frame(id).ok();
            }
        }
    }
}
