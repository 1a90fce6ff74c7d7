#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Layout engine for responsive masonry grids.
//!
//! Resolves a column count from the viewport width and a breakpoint table,
//! deals items round-robin into that many columns, and keeps the count in
//! sync with viewport resizes, coalescing each burst into one recomputation
//! per refresh tick.
//!
//! # Pipeline
//!
//! - [`resolve`]: viewport width + [`BreakpointConfig`] → column count
//! - [`distribute`]: items + column count → [`ColumnBuckets`]
//! - [`build_columns`]: buckets → [`ColumnView`]s with width and class name
//! - [`ResizeReactor`]: resize notifications → one recomputation per tick
//! - [`LayoutEngine`]: ties the above to a host lifecycle
//! - [`Masonry`]: a [`LayoutEngine`] plus [`MasonryProps`]

mod breakpoint;
mod column;
mod config;
mod distribute;
mod engine;
mod masonry;
mod resize;

pub use breakpoint::{resolve, BreakpointConfig, Breakpoints, DEFAULT_COLUMNS, MAX_COLUMNS};
pub use column::{
    build_columns, resolve_class_name, AttrValue, ColumnAttrs, ColumnView, ContainerAttrs,
    MasonryView, Style, DEFAULT_CLASS_NAME, DEFAULT_COLUMN_CLASS_NAME,
};
pub use config::ConfigError;
pub use distribute::{column_width, column_width_css, distribute, ColumnBuckets};
pub use engine::LayoutEngine;
pub use masonry::{Masonry, MasonryProps};
pub use resize::{ReactorState, ResizeReactor};
