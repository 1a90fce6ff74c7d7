//! The masonry grid component: props plus a [`LayoutEngine`].

use crate::breakpoint::BreakpointConfig;
use crate::column::{
    resolve_class_name, AttrValue, ColumnAttrs, ContainerAttrs, MasonryView, DEFAULT_CLASS_NAME,
};
use crate::engine::LayoutEngine;
use masonry_core::{HostEnv, Lifecycle};
use serde::{Deserialize, Serialize};

/// Construction parameters for a [`Masonry`] grid.
///
/// Field names follow the component's public attribute names, so
/// configuration files may use either `breakpoint_cols` or `breakpointCols`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasonryProps {
    /// Column count or width breakpoints. Defaults to 2 columns.
    #[serde(alias = "breakpointCols")]
    pub breakpoint_cols: BreakpointConfig,
    /// Container class name. Expected to be present.
    #[serde(alias = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<AttrValue>,
    /// Column class name.
    #[serde(alias = "columnClassName", skip_serializing_if = "Option::is_none")]
    pub column_class_name: Option<AttrValue>,
    /// Style overlay and attributes for every column.
    #[serde(alias = "columnAttrs")]
    pub column_attrs: ColumnAttrs,
    /// Attributes for the container.
    #[serde(alias = "containerAttrs")]
    pub container_attrs: ContainerAttrs,
}

impl MasonryProps {
    /// Props with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the breakpoint configuration.
    #[must_use]
    pub fn breakpoint_cols(mut self, breakpoints: impl Into<BreakpointConfig>) -> Self {
        self.breakpoint_cols = breakpoints.into();
        self
    }

    /// Set the container class name.
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<AttrValue>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the column class name.
    #[must_use]
    pub fn column_class_name(mut self, class_name: impl Into<AttrValue>) -> Self {
        self.column_class_name = Some(class_name.into());
        self
    }

    /// Set the column attributes.
    #[must_use]
    pub fn column_attrs(mut self, attrs: ColumnAttrs) -> Self {
        self.column_attrs = attrs;
        self
    }

    /// Set the container attributes.
    #[must_use]
    pub fn container_attrs(mut self, attrs: ContainerAttrs) -> Self {
        self.container_attrs = attrs;
        self
    }

    /// Container class name after defaulting; see [`resolve_class_name`].
    #[must_use]
    pub fn resolved_class_name(&self) -> AttrValue {
        resolve_class_name("className", self.class_name.as_ref(), DEFAULT_CLASS_NAME, true)
    }
}

/// A responsive masonry grid.
///
/// ```
/// use masonry_core::HostEnv;
/// use masonry_layout::{Masonry, MasonryProps};
///
/// let grid = Masonry::new(MasonryProps::new().breakpoint_cols(3_i64).class_name("grid"), &HostEnv::headless());
/// let view = grid.render(1..=7, |item, _| item);
///
/// assert_eq!(view.column_count(), 3);
/// assert_eq!(view.columns[0].items, vec![1, 4, 7]);
/// ```
#[derive(Debug)]
pub struct Masonry {
    props: MasonryProps,
    engine: LayoutEngine,
}

impl Masonry {
    /// Create a grid. Call [`Masonry::bind`] or mount the engine to go live.
    pub fn new(props: MasonryProps, host: &HostEnv) -> Self {
        let engine = LayoutEngine::new(props.breakpoint_cols.clone(), host);
        Self { props, engine }
    }

    /// The current props.
    #[must_use]
    pub const fn props(&self) -> &MasonryProps {
        &self.props
    }

    /// Replace the props. A changed breakpoint config re-resolves immediately.
    pub fn set_props(&mut self, props: MasonryProps) {
        self.engine.set_breakpoints(props.breakpoint_cols.clone());
        self.props = props;
    }

    /// The grid's layout engine.
    #[must_use]
    pub const fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Current column count.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.engine.column_count()
    }

    /// Tie the engine to a host lifecycle.
    pub fn bind(&self, lifecycle: &Lifecycle) {
        self.engine.bind(lifecycle);
    }

    /// Render `items` into a container view with one column per current column.
    pub fn render<I, U, F>(&self, items: I, render: F) -> MasonryView<U>
    where
        I: IntoIterator,
        F: FnMut(I::Item, usize) -> U,
    {
        let columns = self.engine.render_columns(
            items,
            render,
            self.props.column_class_name.as_ref(),
            &self.props.column_attrs,
        );
        MasonryView {
            class_name: self.props.resolved_class_name(),
            attrs: self.props.container_attrs.clone(),
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::Breakpoints;
    use crate::column::{Style, DEFAULT_COLUMN_CLASS_NAME};
    use masonry_core::{FrameScheduler, ManualFrameScheduler, SimulatedViewport};
    use std::rc::Rc;

    #[test]
    fn test_props_default() {
        let props = MasonryProps::new();
        assert_eq!(props.breakpoint_cols, BreakpointConfig::Fixed(2));
        assert!(props.class_name.is_none());
    }

    #[test]
    fn test_resolved_class_name_defaults() {
        assert_eq!(
            MasonryProps::new().resolved_class_name().as_text(),
            Some(DEFAULT_CLASS_NAME)
        );
        assert_eq!(
            MasonryProps::new().class_name("mine").resolved_class_name().as_text(),
            Some("mine")
        );
    }

    #[test]
    fn test_render_view() {
        let props = MasonryProps::new()
            .breakpoint_cols(Breakpoints::new(4).at(700, 2))
            .class_name("my-grid")
            .column_class_name("my-col")
            .column_attrs(ColumnAttrs::with_style(Style::new().with("padding", "8px")))
            .container_attrs(ContainerAttrs::with_id("gallery"));
        let grid = Masonry::new(props, &HostEnv::headless());
        let view = grid.render(0..6, |item, index| (item, index));

        assert_eq!(view.class_name.as_text(), Some("my-grid"));
        assert_eq!(view.attrs.id.as_deref(), Some("gallery"));
        assert_eq!(view.column_count(), 4);
        assert_eq!(view.columns[1].items, vec![(1, 1), (5, 5)]);
        assert_eq!(view.columns[3].class_name.as_text(), Some("my-col"));
        assert_eq!(view.columns[3].style.get("width"), Some("25%"));
        assert_eq!(view.columns[3].style.get("padding"), Some("8px"));
    }

    #[test]
    fn test_render_without_class_names_uses_defaults() {
        let grid = Masonry::new(MasonryProps::new(), &HostEnv::headless());
        let view = grid.render(Vec::<u8>::new(), |item, _| item);

        assert_eq!(view.class_name.as_text(), Some(DEFAULT_CLASS_NAME));
        assert_eq!(view.column_count(), 2);
        assert!(view
            .columns
            .iter()
            .all(|c| c.class_name.as_text() == Some(DEFAULT_COLUMN_CLASS_NAME) && c.items.is_empty()));
    }

    #[test]
    fn test_render_wrong_typed_class_name_passes_through() {
        let props = MasonryProps::new().class_name(serde_json::json!(["a", "b"]));
        let grid = Masonry::new(props, &HostEnv::headless());
        let view = grid.render(0..1, |item, _| item);
        assert_eq!(view.class_name.to_attr_string(), "a,b");
    }

    #[test]
    fn test_set_props_updates_breakpoints() {
        let viewport = Rc::new(SimulatedViewport::new(600.0));
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(ManualFrameScheduler::new());
        let host = HostEnv::new(viewport, Some(scheduler));

        let mut grid = Masonry::new(MasonryProps::new().breakpoint_cols(3_i64), &host);
        let lifecycle = Lifecycle::new();
        grid.bind(&lifecycle);
        lifecycle.mount();
        assert_eq!(grid.column_count(), 3);

        grid.set_props(MasonryProps::new().breakpoint_cols(Breakpoints::new(5).at(800, 2)));
        assert_eq!(grid.column_count(), 2);
        lifecycle.cleanup();
    }

    #[test]
    fn test_props_deserialize_camel_case() {
        let json = r#"{
            "breakpointCols": {"default": 4, "1100": 3, "700": 2, "500": 1},
            "className": "my-masonry-grid",
            "columnClassName": "my-masonry-grid_column",
            "columnAttrs": {"style": {"background": "grey"}}
        }"#;
        let props: MasonryProps = serde_json::from_str(json).unwrap();

        assert_eq!(props.breakpoint_cols.resolve(650.0), 2);
        assert_eq!(props.column_class_name.unwrap().as_text(), Some("my-masonry-grid_column"));
        assert_eq!(props.column_attrs.style.get("background"), Some("grey"));
    }
}
