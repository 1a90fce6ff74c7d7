//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use masonry::{
    AnimationFrameScheduler, BrowserViewport, FrameCallback, FrameScheduler, MasonryGrid,
    Viewport,
};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsValue;

fn mount_point(id: &str) -> web_sys::Element {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .expect("document");
    let element = document.create_element("div").expect("create div");
    element.set_id(id);
    document
        .body()
        .expect("body")
        .append_child(&element)
        .expect("append");
    element
}

// ============================================================================
// Viewport
// ============================================================================

#[wasm_bindgen_test]
fn test_browser_viewport_reports_width() {
    let viewport = BrowserViewport::new().expect("viewport");
    let width = viewport.width().expect("inner width");
    assert!(width > 0.0);
    assert_eq!(viewport.effective_width(), width);
}

#[wasm_bindgen_test]
fn test_browser_viewport_listener_bookkeeping() {
    let viewport = BrowserViewport::new().expect("viewport");
    let id = viewport
        .add_resize_listener(Rc::new(|| {}))
        .expect("listener");
    assert_eq!(viewport.listener_count(), 1);

    viewport.remove_resize_listener(id);
    viewport.remove_resize_listener(id);
    assert_eq!(viewport.listener_count(), 0);
}

// ============================================================================
// Scheduler
// ============================================================================

#[wasm_bindgen_test]
fn test_cancelled_frame_is_not_pending() {
    let scheduler = AnimationFrameScheduler::new().expect("scheduler");
    let fired = Rc::new(Cell::new(false));
    let callback: FrameCallback = {
        let fired = fired.clone();
        Box::new(move || fired.set(true))
    };

    let handle = scheduler.request_frame(callback);
    assert_eq!(scheduler.pending_count(), 1);
    scheduler.cancel_frame(handle);
    assert_eq!(scheduler.pending_count(), 0);
    assert!(!fired.get());
}

// ============================================================================
// MasonryGrid
// ============================================================================

#[wasm_bindgen_test]
fn test_grid_renders_items_into_element() {
    let element = mount_point("masonry-fixed");
    let grid = MasonryGrid::new("masonry-fixed", r#"{"breakpointCols": 3, "className": "grid"}"#)
        .expect("grid");

    let items = js_sys::Array::new();
    for i in 0..7 {
        items.push(&JsValue::from_str(&format!("<p>{i}</p>")));
    }
    grid.set_items(items);

    assert_eq!(grid.column_count(), 3);
    assert_eq!(grid.item_count(), 7);
    let html = element.inner_html();
    assert!(html.starts_with("<div class=\"grid\">"));
    assert!(html.contains("<p>0</p><p>3</p><p>6</p>"));
}

#[wasm_bindgen_test]
fn test_grid_set_config_rerenders() {
    let element = mount_point("masonry-config");
    let grid = MasonryGrid::new("masonry-config", r#"{"breakpointCols": 2}"#).expect("grid");

    grid.set_config(r#"{"breakpointCols": 4, "className": "wide"}"#)
        .expect("config");
    assert_eq!(grid.column_count(), 4);
    assert_eq!(element.inner_html().matches("width:25%").count(), 4);
}

#[wasm_bindgen_test]
fn test_grid_rejects_bad_input() {
    mount_point("masonry-bad");
    assert!(MasonryGrid::new("missing-element", "{}").is_err());
    assert!(MasonryGrid::new("masonry-bad", "{").is_err());
}

#[wasm_bindgen_test]
fn test_grid_destroy_is_idempotent() {
    mount_point("masonry-destroy");
    let mut grid = MasonryGrid::new("masonry-destroy", "{}").expect("grid");
    grid.destroy();
    grid.destroy();
    assert_eq!(grid.column_count(), 2);
}
