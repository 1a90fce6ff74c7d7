//! HTML rendering of a masonry layout.
//!
//! Produces one container `div` holding one `div` per column. Items are
//! inserted as given, so they should already be markup; attribute values are
//! escaped.
//!
//! ```
//! use masonry::html::render_html;
//! use masonry::{HostEnv, Masonry, MasonryProps};
//!
//! let grid = Masonry::new(MasonryProps::new().class_name("grid"), &HostEnv::headless());
//! let view = grid.render(["<p>a</p>", "<p>b</p>", "<p>c</p>"], |item, _| item);
//!
//! assert_eq!(
//!     render_html(&view),
//!     "<div class=\"grid\">\
//!      <div class=\"my-masonry-grid_column\" style=\"width:50%\"><p>a</p><p>c</p></div>\
//!      <div class=\"my-masonry-grid_column\" style=\"width:50%\"><p>b</p></div>\
//!      </div>"
//! );
//! ```

use masonry_layout::{ColumnView, MasonryView, Style};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render a laid-out grid as HTML.
#[must_use]
pub fn render_html<U: AsRef<str>>(view: &MasonryView<U>) -> String {
    let mut out = String::new();

    out.push_str("<div");
    push_attr(&mut out, "class", &view.class_name.to_attr_string());
    if let Some(id) = &view.attrs.id {
        push_attr(&mut out, "id", id);
    }
    push_style(&mut out, &view.attrs.style);
    push_data(&mut out, &view.attrs.data);
    out.push('>');

    for column in &view.columns {
        render_column(&mut out, column);
    }

    out.push_str("</div>");
    out
}

/// Render a single column as HTML.
#[must_use]
pub fn render_column_html<U: AsRef<str>>(column: &ColumnView<U>) -> String {
    let mut out = String::new();
    render_column(&mut out, column);
    out
}

fn render_column<U: AsRef<str>>(out: &mut String, column: &ColumnView<U>) {
    out.push_str("<div");
    push_attr(out, "class", &column.class_name.to_attr_string());
    push_style(out, &column.style);
    push_data(out, &column.data);
    out.push('>');
    for item in &column.items {
        out.push_str(item.as_ref());
    }
    out.push_str("</div>");
}

fn push_style(out: &mut String, style: &Style) {
    if !style.is_empty() {
        push_attr(out, "style", &style.to_css());
    }
}

fn push_data(out: &mut String, data: &BTreeMap<String, String>) {
    for (key, value) in data {
        if !is_data_key(key) {
            tracing::warn!(key = %key, "skipping data attribute with an invalid name");
            continue;
        }
        push_attr(out, &format!("data-{key}"), value);
    }
}

/// Whether `key` may follow `data-` in an attribute name.
///
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted.
#[must_use]
pub fn is_data_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
}

/// Escape a string for use inside a double-quoted attribute.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
