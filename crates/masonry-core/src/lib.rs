#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
//! Host primitives for the masonry layout engine.
//!
//! This crate provides the pieces a layout engine consumes from whatever
//! framework hosts it:
//! - Reactive state: [`ReactiveCell`], [`Effect`]
//! - Component lifecycle: [`Lifecycle`] with mount and cleanup hooks
//! - Refresh-cycle deferral: [`FrameScheduler`], [`ManualFrameScheduler`]
//! - Viewport access: [`Viewport`], [`HeadlessViewport`], [`SimulatedViewport`]
//!
//! All primitives are single-threaded and meant to live on the host UI thread.

mod lifecycle;
mod reactive;
mod scheduler;
mod viewport;

pub use lifecycle::{HookId, Lifecycle, LifecycleCallback, LifecyclePhase, LifecycleState};
pub use reactive::{Effect, ReactiveCell, SubscriptionId};
pub use scheduler::{FrameCallback, FrameHandle, FrameScheduler, ManualFrameScheduler};
pub use viewport::{
    measured_width, HeadlessViewport, HostEnv, ListenerId, ResizeListener, SimulatedViewport,
    Viewport,
};
