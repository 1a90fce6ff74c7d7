//! WASM entry point: a masonry grid mounted into a DOM element.

use super::scheduler::AnimationFrameScheduler;
use super::viewport::BrowserViewport;
use crate::html::render_html;
use masonry_core::{FrameScheduler, HostEnv, Lifecycle, SubscriptionId, Viewport};
use masonry_layout::{Masonry, MasonryProps};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::{window, Element};

/// A host environment backed by the browser window.
pub fn browser_host() -> Result<HostEnv, JsValue> {
    let viewport: Rc<dyn Viewport> = Rc::new(BrowserViewport::new()?);
    let scheduler: Rc<dyn FrameScheduler> = Rc::new(AnimationFrameScheduler::new()?);
    Ok(HostEnv::new(viewport, Some(scheduler)))
}

struct GridState {
    container: Element,
    grid: RefCell<Masonry>,
    items: RefCell<Vec<String>>,
}

impl GridState {
    fn paint(&self) {
        let Ok(grid) = self.grid.try_borrow() else {
            return;
        };
        let items = self.items.borrow();
        let view = grid.render(items.iter(), |item, _| item.as_str());
        self.container.set_inner_html(&render_html(&view));
    }
}

/// A responsive masonry grid rendered into an element's children.
///
/// ```javascript
/// import init, { MasonryGrid } from './masonry.js';
///
/// await init();
/// const grid = new MasonryGrid('gallery', '{"breakpointCols": {"default": 4, "700": 2}}');
/// grid.set_items(['<img src="a.jpg">', '<img src="b.jpg">']);
/// ```
#[wasm_bindgen]
pub struct MasonryGrid {
    state: Rc<GridState>,
    lifecycle: Lifecycle,
    subscription: Option<SubscriptionId>,
}

#[wasm_bindgen]
impl MasonryGrid {
    /// Mount a grid into the element with the given id.
    ///
    /// `config_json` holds the grid props, e.g.
    /// `{"breakpointCols": 3, "className": "grid"}`.
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str, config_json: &str) -> Result<MasonryGrid, JsValue> {
        console_error_panic_hook::set_once();

        let document = window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;
        let container = document
            .get_element_by_id(element_id)
            .ok_or_else(|| format!("Element '{element_id}' not found"))?;

        let props = MasonryProps::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let grid = Masonry::new(props, &browser_host()?);

        let state = Rc::new(GridState {
            container,
            grid: RefCell::new(grid),
            items: RefCell::new(Vec::new()),
        });

        let subscription = {
            let weak: Weak<GridState> = Rc::downgrade(&state);
            state.grid.borrow().engine().on_column_count_change(move |_| {
                if let Some(state) = weak.upgrade() {
                    state.paint();
                }
            })
        };

        let lifecycle = Lifecycle::new();
        state.grid.borrow().bind(&lifecycle);
        lifecycle.mount();
        state.paint();

        Ok(Self {
            state,
            lifecycle,
            subscription: Some(subscription),
        })
    }

    /// Replace the items. Each entry is inserted as HTML.
    pub fn set_items(&self, items: js_sys::Array) {
        let items: Vec<String> = items.iter().filter_map(|item| item.as_string()).collect();
        *self.state.items.borrow_mut() = items;
        self.state.paint();
    }

    /// Replace the grid props from JSON.
    pub fn set_config(&self, config_json: &str) -> Result<(), JsValue> {
        let props = MasonryProps::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.state.grid.borrow_mut().set_props(props);
        self.state.paint();
        Ok(())
    }

    /// Current column count.
    pub fn column_count(&self) -> usize {
        self.state.grid.borrow().column_count()
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.state.items.borrow().len()
    }

    /// Stop tracking the viewport. The rendered markup stays in place.
    pub fn destroy(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.state
                .grid
                .borrow()
                .engine()
                .remove_column_count_listener(id);
        }
        self.lifecycle.cleanup();
    }
}

impl Drop for MasonryGrid {
    fn drop(&mut self) {
        self.destroy();
    }
}
