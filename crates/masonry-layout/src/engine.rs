//! Layout engine implementation.

use crate::breakpoint::{resolve, BreakpointConfig};
use crate::column::{
    build_columns, resolve_class_name, AttrValue, ColumnAttrs, ColumnView,
    DEFAULT_COLUMN_CLASS_NAME,
};
use crate::distribute::{distribute, ColumnBuckets};
use crate::resize::{ReactorState, ResizeReactor};
use masonry_core::{
    Effect, HostEnv, Lifecycle, LifecycleState, ReactiveCell, SubscriptionId, Viewport,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct EngineShared {
    breakpoints: ReactiveCell<BreakpointConfig>,
    column_count: ReactiveCell<usize>,
    viewport: Rc<dyn Viewport>,
    reactor: ResizeReactor,
    config_effect: RefCell<Option<Effect>>,
    state: Cell<LifecycleState>,
}

impl EngineShared {
    fn recalculate(&self) -> usize {
        let width = self.viewport.effective_width();
        let columns = self.breakpoints.with(|config| resolve(width, config));
        if self.column_count.set_if_changed(columns) {
            tracing::debug!(width, columns, "column count changed");
        }
        columns
    }
}

/// Reactive column-count engine for one masonry grid.
///
/// Holds the column count as a [`ReactiveCell`], keeps it in sync with the
/// viewport while mounted, and distributes items over it on demand.
/// Cloning yields another handle to the same engine.
///
/// ```
/// use masonry_core::HostEnv;
/// use masonry_layout::{Breakpoints, LayoutEngine};
///
/// let engine = LayoutEngine::new(Breakpoints::new(3).at(600, 1), &HostEnv::headless());
/// engine.mount();
/// assert_eq!(engine.column_count(), 3);
///
/// let buckets = engine.distribute(["a", "b", "c", "d"], |item, _| item);
/// assert_eq!(buckets.into_columns(), vec![vec!["a", "d"], vec!["b"], vec!["c"]]);
/// ```
#[derive(Clone)]
pub struct LayoutEngine {
    shared: Rc<EngineShared>,
}

impl LayoutEngine {
    /// Create an engine.
    ///
    /// The initial column count is resolved against an unmeasured viewport,
    /// so it is the config's `default`; the real width is read on mount.
    pub fn new(breakpoints: impl Into<BreakpointConfig>, host: &HostEnv) -> Self {
        let breakpoints = breakpoints.into();
        let initial = breakpoints.ambient_columns();

        let shared = Rc::new_cyclic(|weak: &Weak<EngineShared>| {
            let reactor = {
                let weak = weak.clone();
                ResizeReactor::new(host, move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.recalculate();
                    }
                })
            };

            let breakpoints = ReactiveCell::new(breakpoints);
            let config_effect = {
                let weak = weak.clone();
                Effect::lazy(move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.recalculate();
                    }
                })
            };
            config_effect.track(&breakpoints);

            EngineShared {
                breakpoints,
                column_count: ReactiveCell::new(initial),
                viewport: Rc::clone(&host.viewport),
                reactor,
                config_effect: RefCell::new(Some(config_effect)),
                state: Cell::new(LifecycleState::Created),
            }
        });

        Self { shared }
    }

    /// Current column count, always at least 1.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.shared.column_count.get()
    }

    /// The column-count cell, for hosts that want to observe it directly.
    #[must_use]
    pub fn column_count_cell(&self) -> ReactiveCell<usize> {
        self.shared.column_count.clone()
    }

    /// Call `callback` with the new count whenever it changes.
    pub fn on_column_count_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(usize) + 'static,
    {
        self.shared.column_count.subscribe(move |count| callback(*count))
    }

    /// Remove a callback registered with [`LayoutEngine::on_column_count_change`].
    pub fn remove_column_count_listener(&self, id: SubscriptionId) -> bool {
        self.shared.column_count.unsubscribe(id)
    }

    /// Current breakpoint configuration.
    #[must_use]
    pub fn breakpoints(&self) -> BreakpointConfig {
        self.shared.breakpoints.get()
    }

    /// Replace the breakpoint configuration.
    ///
    /// A changed config is resolved immediately against the current viewport,
    /// without waiting for a refresh tick. After cleanup the config is stored
    /// but nothing is recomputed.
    pub fn set_breakpoints(&self, breakpoints: impl Into<BreakpointConfig>) {
        self.shared.breakpoints.set_if_changed(breakpoints.into());
    }

    /// Resolve against the current viewport width now.
    pub fn recalculate(&self) -> usize {
        self.shared.recalculate()
    }

    /// Resolve once with the real viewport and start listening for resizes.
    ///
    /// Only the first call has an effect; mounting after cleanup does nothing.
    pub fn mount(&self) {
        if self.shared.state.get() != LifecycleState::Created {
            return;
        }
        self.shared.state.set(LifecycleState::Mounted);
        self.shared.recalculate();
        self.shared.reactor.attach();
        tracing::debug!(columns = self.column_count(), "layout engine mounted");
    }

    /// Stop listening for resizes and config changes. Idempotent.
    pub fn cleanup(&self) {
        if self.shared.state.replace(LifecycleState::CleanedUp) == LifecycleState::CleanedUp {
            return;
        }
        self.shared.reactor.detach();
        if let Some(effect) = self.shared.config_effect.borrow_mut().take() {
            effect.dispose();
        }
        tracing::debug!("layout engine cleaned up");
    }

    /// Register [`LayoutEngine::mount`] and [`LayoutEngine::cleanup`] with a host lifecycle.
    pub fn bind(&self, lifecycle: &Lifecycle) {
        let engine = self.clone();
        lifecycle.on_mount(move || engine.mount());
        let engine = self.clone();
        lifecycle.on_cleanup(move || engine.cleanup());
    }

    /// Where the engine is in its lifecycle.
    #[must_use]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.shared.state.get()
    }

    /// The engine's resize reactor.
    #[must_use]
    pub fn reactor(&self) -> &ResizeReactor {
        &self.shared.reactor
    }

    /// Whether a resize recomputation is waiting for the next tick.
    #[must_use]
    pub fn reactor_state(&self) -> ReactorState {
        self.shared.reactor.state()
    }

    /// Distribute `items` over the current column count.
    pub fn distribute<I, U, F>(&self, items: I, render: F) -> ColumnBuckets<U>
    where
        I: IntoIterator,
        F: FnMut(I::Item, usize) -> U,
    {
        distribute(items, render, self.column_count())
    }

    /// Distribute `items` and wrap each bucket in a [`ColumnView`].
    ///
    /// A missing `column_class_name` becomes [`DEFAULT_COLUMN_CLASS_NAME`];
    /// a non-text one is logged and kept.
    pub fn render_columns<I, U, F>(
        &self,
        items: I,
        render: F,
        column_class_name: Option<&AttrValue>,
        column_attrs: &ColumnAttrs,
    ) -> Vec<ColumnView<U>>
    where
        I: IntoIterator,
        F: FnMut(I::Item, usize) -> U,
    {
        let class_name = resolve_class_name(
            "columnClassName",
            column_class_name,
            DEFAULT_COLUMN_CLASS_NAME,
            false,
        );
        build_columns(self.distribute(items, render), &class_name, column_attrs)
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("column_count", &self.column_count())
            .field("breakpoints", &self.breakpoints())
            .field("state", &self.lifecycle_state())
            .field("reactor", &self.shared.reactor)
            .finish()
    }
}
