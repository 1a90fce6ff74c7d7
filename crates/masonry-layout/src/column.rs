//! Column and container views handed to the host renderer.
//!
//! A render pass turns [`ColumnBuckets`] into [`ColumnView`]s: each column
//! carries its computed width merged with the caller's style overlay, a
//! class name, and extra `data-*` attributes. The host maps these onto its
//! own element representation.

use crate::distribute::ColumnBuckets;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Class applied to the container when none is given.
pub const DEFAULT_CLASS_NAME: &str = "my-masonry-grid";

/// Class applied to every column when none is given.
pub const DEFAULT_COLUMN_CLASS_NAME: &str = "my-masonry-grid_column";

// =============================================================================
// Style
// =============================================================================

/// Inline style properties, kept in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<String, String>);

impl Style {
    /// Create an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Style::set`].
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.0.insert(property.into(), value.into());
    }

    /// Get a property value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    /// Apply `overlay` on top of this style. Overlay values win.
    pub fn merge(&mut self, overlay: &Self) {
        for (property, value) in &overlay.0 {
            self.0.insert(property.clone(), value.clone());
        }
    }

    /// Iterate over `(property, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as a CSS declaration list, e.g. `"color:red;width:25%"`.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(property, value)| format!("{property}:{value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Style {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// =============================================================================
// Attribute values
// =============================================================================

/// A loosely typed attribute value.
///
/// Class names normally arrive as text, but configuration files can carry
/// anything. Non-text values are kept as given and stringified when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrValue(serde_json::Value);

impl AttrValue {
    /// A text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self(serde_json::Value::String(value.into()))
    }

    /// The text, if this value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Whether this value is text.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.0.is_string()
    }

    /// The raw value.
    #[must_use]
    pub const fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// Attribute string as a browser would produce it for this value.
    #[must_use]
    pub fn to_attr_string(&self) -> String {
        fn stringify(value: &serde_json::Value) -> String {
            match value {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Array(items) => {
                    items.iter().map(stringify).collect::<Vec<_>>().join(",")
                }
                other => other.to_string(),
            }
        }
        stringify(&self.0)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attr_string())
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Resolve a class-name attribute.
///
/// An absent value becomes `fallback`. A present value that is not text is
/// reported and passed through unchanged. `warn_if_absent` marks attributes
/// the host is expected to supply.
#[must_use]
pub fn resolve_class_name(
    attribute: &str,
    value: Option<&AttrValue>,
    fallback: &str,
    warn_if_absent: bool,
) -> AttrValue {
    match value {
        None => {
            if warn_if_absent {
                tracing::warn!(
                    attribute,
                    fallback,
                    "The property \"{attribute}\" requires a string; using the default"
                );
            }
            AttrValue::text(fallback)
        }
        Some(value) => {
            if !value.is_text() {
                tracing::error!(
                    attribute,
                    value = %value.as_json(),
                    "The property \"{attribute}\" requires a string"
                );
            }
            value.clone()
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Attributes copied onto every column element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAttrs {
    /// Style overlay, merged after the computed width.
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    /// `data-*` attributes, keyed without the `data-` prefix.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ColumnAttrs {
    /// Attributes with the given style overlay.
    #[must_use]
    pub fn with_style(style: Style) -> Self {
        Self {
            style,
            data: BTreeMap::new(),
        }
    }

    /// Add a `data-*` attribute.
    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Attributes applied to the container element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerAttrs {
    /// Element id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Inline style.
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    /// `data-*` attributes, keyed without the `data-` prefix.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl ContainerAttrs {
    /// Attributes with an element id.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// One rendered column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView<U> {
    /// Position from the left, starting at 0.
    pub index: usize,
    /// Column class name.
    pub class_name: AttrValue,
    /// Computed width merged with the caller overlay.
    pub style: Style,
    /// `data-*` attributes from [`ColumnAttrs`].
    pub data: BTreeMap<String, String>,
    /// Rendered items in input order.
    pub items: Vec<U>,
}

/// A rendered masonry grid: the container and its columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasonryView<U> {
    /// Container class name.
    pub class_name: AttrValue,
    /// Container attributes.
    pub attrs: ContainerAttrs,
    /// Columns left to right.
    pub columns: Vec<ColumnView<U>>,
}

impl<U> MasonryView<U> {
    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }
}

/// Wrap each bucket in a [`ColumnView`].
///
/// The computed `width` goes in first and `attrs.style` is merged over it,
/// so an explicit caller width wins.
pub fn build_columns<U>(
    buckets: ColumnBuckets<U>,
    class_name: &AttrValue,
    attrs: &ColumnAttrs,
) -> Vec<ColumnView<U>> {
    let mut style = Style::new().with("width", buckets.column_width());
    style.merge(&attrs.style);

    buckets
        .into_iter()
        .enumerate()
        .map(|(index, items)| ColumnView {
            index,
            class_name: class_name.clone(),
            style: style.clone(),
            data: attrs.data.clone(),
            items,
        })
        .collect()
}
