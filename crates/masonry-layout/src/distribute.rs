//! Round-robin distribution of items into columns.

use crate::breakpoint::MAX_COLUMNS;
use serde::Serialize;

/// Rendered items grouped into columns, in render order.
///
/// Produced fresh by every [`distribute`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnBuckets<U> {
    columns: Vec<Vec<U>>,
}

impl<U> ColumnBuckets<U> {
    /// Number of columns, including empty ones.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of items across all columns.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Items of one column.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&[U]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Iterate over columns left to right.
    pub fn iter(&self) -> impl Iterator<Item = &[U]> {
        self.columns.iter().map(Vec::as_slice)
    }

    /// Width of every column as a CSS percentage.
    #[must_use]
    pub fn column_width(&self) -> String {
        column_width_css(self.column_count())
    }

    /// Take the underlying columns.
    #[must_use]
    pub fn into_columns(self) -> Vec<Vec<U>> {
        self.columns
    }
}

impl<U> IntoIterator for ColumnBuckets<U> {
    type Item = Vec<U>;
    type IntoIter = std::vec::IntoIter<Vec<U>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Render `items` and deal them into `column_count` columns.
///
/// Item `i` is rendered with `render(item, i)` and lands in column
/// `i % column_count`; each column keeps input order. Placement is purely
/// positional, item heights are never measured. A `column_count` of 0 is
/// treated as 1 and counts above [`MAX_COLUMNS`] are capped.
///
/// ```
/// use masonry_layout::distribute;
///
/// let buckets = distribute(0..5, |item, _| item, 2);
/// assert_eq!(buckets.into_columns(), vec![vec![0, 2, 4], vec![1, 3]]);
/// ```
pub fn distribute<I, U, F>(items: I, mut render: F, column_count: usize) -> ColumnBuckets<U>
where
    I: IntoIterator,
    F: FnMut(I::Item, usize) -> U,
{
    let column_count = column_count.clamp(1, MAX_COLUMNS);
    let items = items.into_iter();
    let per_column = items.size_hint().0.div_ceil(column_count);

    let mut columns: Vec<Vec<U>> = (0..column_count)
        .map(|_| Vec::with_capacity(per_column))
        .collect();

    for (index, item) in items.enumerate() {
        columns[index % column_count].push(render(item, index));
    }

    ColumnBuckets { columns }
}

/// Column width in percent for `column_count` equal columns.
#[must_use]
pub fn column_width(column_count: usize) -> f64 {
    100.0 / column_count.max(1) as f64
}

/// Column width formatted for a CSS `width` property, e.g. `"25%"`.
#[must_use]
pub fn column_width_css(column_count: usize) -> String {
    format!("{}%", column_width(column_count))
}
