//! Breakpoint configuration and column-count resolution.
//!
//! A [`BreakpointConfig`] is either a fixed column count or a map from
//! viewport-width thresholds to column counts with a `default` entry. A
//! threshold applies while the viewport is at most that wide; when several
//! apply, the narrowest one wins.
//!
//! ```
//! use masonry_layout::{resolve, BreakpointConfig, Breakpoints};
//!
//! let config: BreakpointConfig = Breakpoints::new(4)
//!     .at(1100, 3)
//!     .at(700, 2)
//!     .at(500, 1)
//!     .into();
//!
//! assert_eq!(resolve(1200.0, &config), 4);
//! assert_eq!(resolve(700.0, &config), 2);
//! assert_eq!(resolve(f64::INFINITY, &config), 4);
//! ```

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Column count used when a config gives none.
pub const DEFAULT_COLUMNS: i64 = 2;

/// Upper bound on a resolved column count. Larger counts are capped.
pub const MAX_COLUMNS: usize = 1024;

/// Key of the fallback entry in a serialized breakpoint map.
const DEFAULT_KEY: &str = "default";

/// Breakpoint configuration for a masonry grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointConfig {
    /// The same column count at every viewport width.
    Fixed(i64),
    /// Width thresholds mapped to column counts.
    Responsive(Breakpoints),
}

impl BreakpointConfig {
    /// Resolve the column count for a viewport width.
    #[must_use]
    pub fn resolve(&self, viewport_width: f64) -> usize {
        resolve(viewport_width, self)
    }

    /// Column count before the viewport has been measured.
    #[must_use]
    pub fn ambient_columns(&self) -> usize {
        resolve(f64::INFINITY, self)
    }

    /// Whether the resolved count can depend on the viewport width.
    #[must_use]
    pub fn is_responsive(&self) -> bool {
        match self {
            Self::Fixed(_) => false,
            Self::Responsive(breakpoints) => breakpoints.thresholds().any(|(t, _)| t > 0),
        }
    }
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self::Fixed(DEFAULT_COLUMNS)
    }
}

impl From<i64> for BreakpointConfig {
    fn from(columns: i64) -> Self {
        Self::Fixed(columns)
    }
}

impl From<Breakpoints> for BreakpointConfig {
    fn from(breakpoints: Breakpoints) -> Self {
        Self::Responsive(breakpoints)
    }
}

/// Threshold → column-count map with an optional `default` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Breakpoints {
    default: Option<i64>,
    thresholds: BTreeMap<i64, i64>,
}

impl Breakpoints {
    /// Create a map whose `default` entry is `columns`.
    #[must_use]
    pub fn new(columns: i64) -> Self {
        Self {
            default: Some(columns),
            thresholds: BTreeMap::new(),
        }
    }

    /// Apply `columns` while the viewport is at most `threshold` pixels wide.
    #[must_use]
    pub fn at(mut self, threshold: i64, columns: i64) -> Self {
        self.insert(threshold, columns);
        self
    }

    /// Insert or replace a threshold, returning the previous count.
    pub fn insert(&mut self, threshold: i64, columns: i64) -> Option<i64> {
        self.thresholds.insert(threshold, columns)
    }

    /// Set the `default` entry.
    pub fn set_default(&mut self, columns: i64) {
        self.default = Some(columns);
    }

    /// The `default` entry, if present.
    #[must_use]
    pub const fn default_columns(&self) -> Option<i64> {
        self.default
    }

    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.thresholds.iter().map(|(&t, &c)| (t, c))
    }

    /// Number of threshold entries, excluding `default`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether there are no threshold entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

/// Resolve the active column count for `viewport_width`.
///
/// Among thresholds at least as wide as the viewport the smallest wins
/// (boundary inclusive). Non-positive thresholds are ignored. A missing or
/// zero `default` falls back to [`DEFAULT_COLUMNS`], and the result is
/// kept within `1..=`[`MAX_COLUMNS`]. Pass `f64::INFINITY` when the width is unknown.
#[must_use]
pub fn resolve(viewport_width: f64, config: &BreakpointConfig) -> usize {
    let (default, thresholds) = match config {
        BreakpointConfig::Fixed(columns) => (Some(*columns), None),
        BreakpointConfig::Responsive(breakpoints) => {
            (breakpoints.default, Some(&breakpoints.thresholds))
        }
    };

    let mut columns = match default {
        Some(columns) if columns != 0 => columns,
        _ => DEFAULT_COLUMNS,
    };

    if let Some(thresholds) = thresholds {
        let mut matched = f64::INFINITY;
        for (&threshold, &count) in thresholds {
            let width = threshold as f64;
            if threshold > 0 && viewport_width <= width && width < matched {
                matched = width;
                columns = count;
            }
        }
    }

    clamp_columns(columns)
}

fn clamp_columns(columns: i64) -> usize {
    if columns < 1 {
        1
    } else {
        usize::try_from(columns).map_or(MAX_COLUMNS, |c| c.min(MAX_COLUMNS))
    }
}

/// Parse the leading base-10 integer of `s`, ignoring trailing text.
///
/// `"700px"` yields 700; `"px"` yields `None`.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

fn float_to_count(v: f64) -> i64 {
    if v.is_nan() {
        0
    } else {
        v as i64
    }
}

// =============================================================================
// Serialization
// =============================================================================

impl Serialize for BreakpointConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(columns) => serializer.serialize_i64(*columns),
            Self::Responsive(breakpoints) => {
                let len = breakpoints.len() + usize::from(breakpoints.default.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                if let Some(default) = breakpoints.default {
                    map.serialize_entry(DEFAULT_KEY, &default)?;
                }
                for (threshold, columns) in breakpoints.thresholds() {
                    map.serialize_entry(&threshold.to_string(), &columns)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for BreakpointConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConfigVisitor)
    }
}

struct ConfigVisitor;

impl<'de> Visitor<'de> for ConfigVisitor {
    type Value = BreakpointConfig;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a column count or a map of width breakpoints")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(BreakpointConfig::Fixed(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(BreakpointConfig::Fixed(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(BreakpointConfig::Fixed(float_to_count(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(BreakpointConfig::Fixed(parse_leading_int(v).unwrap_or(0)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BreakpointConfig::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BreakpointConfig::default())
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(BreakpointConfig::default())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(BreakpointConfig::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut breakpoints = Breakpoints::default();
        while let Some(key) = map.next_key::<BreakpointKey>()? {
            let LenientCount(columns) = map.next_value()?;
            match key {
                BreakpointKey::Default => breakpoints.default = Some(columns),
                BreakpointKey::Threshold(threshold) => {
                    breakpoints.thresholds.insert(threshold, columns);
                }
                BreakpointKey::Ignored => {}
            }
        }
        Ok(BreakpointConfig::Responsive(breakpoints))
    }
}

/// A map key: `default`, a threshold, or something that never matches.
enum BreakpointKey {
    Default,
    Threshold(i64),
    Ignored,
}

impl<'de> Deserialize<'de> for BreakpointKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyVisitor)
    }
}

struct KeyVisitor;

impl<'de> Visitor<'de> for KeyVisitor {
    type Value = BreakpointKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`default` or a width threshold")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(BreakpointKey::Threshold(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(BreakpointKey::Threshold(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() {
            Ok(BreakpointKey::Threshold(v as i64))
        } else {
            Ok(BreakpointKey::Ignored)
        }
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(BreakpointKey::Ignored)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BreakpointKey::Ignored)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v == DEFAULT_KEY {
            return Ok(BreakpointKey::Default);
        }
        Ok(parse_leading_int(v).map_or(BreakpointKey::Ignored, BreakpointKey::Threshold))
    }
}

/// A column count that tolerates non-numeric input by reading it as 0.
struct LenientCount(i64);

impl<'de> Deserialize<'de> for LenientCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CountVisitor)
    }
}

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = LenientCount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a column count")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LenientCount(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(LenientCount(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(LenientCount(float_to_count(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(LenientCount(v.trim().parse::<f64>().map_or(0, float_to_count)))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(LenientCount(0))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LenientCount(0))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LenientCount(0))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(CountVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LenientCount(0))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LenientCount(0))
    }
}
