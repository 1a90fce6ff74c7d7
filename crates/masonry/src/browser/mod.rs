//! Browser host for masonry grids.
//!
//! This module provides the bridge between the layout engine and the
//! browser: `window.innerWidth`, `resize` events and `requestAnimationFrame`.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod grid;
#[cfg(target_arch = "wasm32")]
pub mod scheduler;
#[cfg(target_arch = "wasm32")]
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub use grid::{browser_host, MasonryGrid};
#[cfg(target_arch = "wasm32")]
pub use scheduler::AnimationFrameScheduler;
#[cfg(target_arch = "wasm32")]
pub use viewport::BrowserViewport;
