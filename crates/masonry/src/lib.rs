//! Masonry: responsive masonry grid layout.
//!
//! Items are dealt round-robin into a number of equal-width columns picked
//! from the viewport width by a breakpoint table. The column count follows
//! viewport resizes, one recomputation per animation frame.
//!
//! # Native Usage
//!
//! ```
//! use masonry::{html::render_html, Breakpoints, HostEnv, Masonry, MasonryProps};
//!
//! let props = MasonryProps::new()
//!     .breakpoint_cols(Breakpoints::new(4).at(1100, 3).at(700, 2).at(500, 1))
//!     .class_name("my-masonry-grid");
//! let grid = Masonry::new(props, &HostEnv::headless());
//! let html = render_html(&grid.render(1..=8, |item, _| format!("<div>{item}</div>")));
//! assert!(html.contains("width:25%"));
//! ```
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { MasonryGrid } from './masonry.js';
//!
//! async function main() {
//!     await init();
//!     const grid = new MasonryGrid('gallery', '{"breakpointCols": {"default": 4, "1100": 3, "700": 2, "500": 1}}');
//!     grid.set_items(items.map((item) => `<div>${item}</div>`));
//! }
//! ```

#![allow(
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::needless_pass_by_value,
    clippy::module_name_repetitions,
    clippy::new_ret_no_self
)]

pub use masonry_core::*;
pub use masonry_layout::*;

pub mod browser;
pub mod html;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub use browser::{browser_host, AnimationFrameScheduler, BrowserViewport, MasonryGrid};
