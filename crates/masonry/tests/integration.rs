//! Integration tests for the masonry facade.

#![cfg(not(target_arch = "wasm32"))]

use masonry::html::render_html;
use masonry::{
    Breakpoints, ColumnAttrs, FrameScheduler, HostEnv, Lifecycle, ManualFrameScheduler, Masonry,
    MasonryProps, SimulatedViewport, Style,
};
use proptest::prelude::*;
use std::rc::Rc;

const GALLERY_JSON: &str = r#"{
    "breakpointCols": {"default": 4, "1100": 3, "700": 2, "500": 1},
    "className": "my-masonry-grid",
    "columnClassName": "my-masonry-grid_column"
}"#;

fn browser_like(width: f64) -> (Rc<SimulatedViewport>, Rc<ManualFrameScheduler>, HostEnv) {
    let viewport = Rc::new(SimulatedViewport::new(width));
    let scheduler = Rc::new(ManualFrameScheduler::new());
    let host = HostEnv::new(
        viewport.clone(),
        Some(scheduler.clone() as Rc<dyn FrameScheduler>),
    );
    (viewport, scheduler, host)
}

fn items(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("<div>Item {i}</div>")).collect()
}

// =============================================================================
// End-to-end rendering
// =============================================================================

#[test]
fn test_gallery_html_follows_viewport() {
    let (viewport, scheduler, host) = browser_like(1200.0);
    let grid = Masonry::new(MasonryProps::from_json(GALLERY_JSON).unwrap(), &host);
    let lifecycle = Lifecycle::new();
    grid.bind(&lifecycle);
    lifecycle.mount();

    let items = items(8);
    let wide = render_html(&grid.render(items.iter(), |item, _| item.as_str()));
    assert_eq!(wide.matches("class=\"my-masonry-grid_column\"").count(), 4);
    assert!(wide.contains("style=\"width:25%\"><div>Item 1</div><div>Item 5</div></div>"));

    viewport.resize(1000.0);
    viewport.resize(640.0);
    scheduler.run_frame();

    let narrow = render_html(&grid.render(items.iter(), |item, _| item.as_str()));
    assert_eq!(narrow.matches("width:50%").count(), 2);
    assert!(narrow.contains(
        "<div>Item 1</div><div>Item 3</div><div>Item 5</div><div>Item 7</div>"
    ));

    lifecycle.cleanup();
    viewport.resize(300.0);
    scheduler.run_frame();
    assert_eq!(grid.column_count(), 2);
}

#[test]
fn test_caller_style_is_merged_after_width() {
    let props = MasonryProps::new()
        .breakpoint_cols(3_i64)
        .column_attrs(ColumnAttrs::with_style(
            Style::new().with("width", "calc(33% - 10px)"),
        ));
    let grid = Masonry::new(props, &HostEnv::headless());
    let html = render_html(&grid.render(items(3).iter(), |item, _| item.as_str()));

    assert_eq!(html.matches("style=\"width:calc(33% - 10px)\"").count(), 3);
    assert!(!html.contains("33.333333333333336%"));
}

#[test]
fn test_config_from_yaml_renders_like_json() {
    let yaml = "breakpointCols:\n  default: 4\n  1100: 3\n  700: 2\n  500: 1\nclassName: my-masonry-grid\ncolumnClassName: my-masonry-grid_column\n";
    let from_yaml = MasonryProps::from_yaml(yaml).unwrap();
    let from_json = MasonryProps::from_json(GALLERY_JSON).unwrap();
    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_headless_render_uses_default_columns() {
    let grid = Masonry::new(
        MasonryProps::new().breakpoint_cols(Breakpoints::new(4).at(500, 1)),
        &HostEnv::headless(),
    );
    let html = render_html(&grid.render(items(2).iter(), |item, _| item.as_str()));
    assert_eq!(html.matches("width:25%").count(), 4);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_html_has_one_div_per_column_and_item(len in 0usize..40, columns in 1i64..8) {
        let grid = Masonry::new(MasonryProps::new().breakpoint_cols(columns), &HostEnv::headless());
        let items: Vec<String> = (0..len).map(|i| format!("<i>{i}</i>")).collect();
        let html = render_html(&grid.render(items.iter(), |item, _| item.as_str()));

        prop_assert_eq!(html.matches("<div").count(), columns as usize + 1);
        prop_assert_eq!(html.matches("<i>").count(), len);
    }
}
