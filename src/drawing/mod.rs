//! Value types for colors and 2D geometry.
//!
//! Everything in this module is pure: no I/O, no global state. The types
//! are plain values that callers copy before mutating when they need a
//! snapshot.
//!
//! - **Color**: [`Color`] plus the stateless conversion engine in [`color_tool`]
//! - **Geometry**: [`Point`], [`Size`], [`Rectangle`]
//! - **Anchors**: [`Gravity`] and the legacy [`ContentAlign`] codes
//!
//! Parsing at the boundary (`try_parse`, `from_record`, ...) reports failure
//! with `None`. Domain operations (setters, scaling on a fixed size) fail
//! with a [`DrawingError`].

pub mod color;
pub mod color_tool;
pub mod gravity;
pub mod point;
pub mod rectangle;
pub mod size;

pub use color::{Color, ColorProperty, ColorValue};
pub use color_tool::ColorDefinition;
pub use gravity::{ContentAlign, Gravity};
pub use point::{Point, PointSource};
pub use rectangle::{Rectangle, RectangleSource};
pub use size::{Size, SizeSource};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawingError {
    #[error("Invalid value {value} for `{field}`: {expected}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("Invalid operation \"{operation}\": this Size instance is fixed")]
    FixedSize { operation: &'static str },
}

impl DrawingError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        Self::InvalidArgument {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Integer lookup in a JSON-like record, accepting numbers and numeric strings.
///
/// Shared by the record decoders of every geometry and color type.
pub(crate) fn record_int(record: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<i64> {
    value_as_int(record.get(key)?)
}

pub(crate) fn value_as_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Parse `N` as a decimal number of at most `max_digits` digits.
pub(crate) fn parse_digits(s: &str, max_digits: usize) -> Option<i64> {
    if s.is_empty() || s.len() > max_digits || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Split `"a,<ws>b"` into its two trimmed-left halves, rejecting anything else.
pub(crate) fn split_pair(s: &str, sep: char) -> Option<(&str, &str)> {
    let (a, b) = s.split_once(sep)?;
    Some((a, b.trim_start()))
}

/// Strip a case-insensitive `key=` prefix.
pub(crate) fn strip_key<'a>(s: &'a str, key: &str) -> Option<&'a str> {
    let head = s.get(..key.len())?;
    if head.eq_ignore_ascii_case(key) {
        s.get(key.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_int_accepts_numbers_and_numeric_strings() {
        let v = json!({"a": 5, "b": "12", "c": 3.9, "d": "x"});
        let map = v.as_object().unwrap();
        assert_eq!(record_int(map, "a"), Some(5));
        assert_eq!(record_int(map, "b"), Some(12));
        assert_eq!(record_int(map, "c"), Some(3));
        assert_eq!(record_int(map, "d"), None);
        assert_eq!(record_int(map, "missing"), None);
    }

    #[test]
    fn parse_digits_limits_length() {
        assert_eq!(parse_digits("1234", 4), Some(1234));
        assert_eq!(parse_digits("12345", 4), None);
        assert_eq!(parse_digits("", 4), None);
        assert_eq!(parse_digits("-1", 4), None);
    }

    #[test]
    fn strip_key_is_case_insensitive() {
        assert_eq!(strip_key("Width=10", "width="), Some("10"));
        assert_eq!(strip_key("w=10", "width="), None);
    }

    #[test]
    fn invalid_argument_message_names_field() {
        let err = DrawingError::invalid("width", 0, "a positive width");
        assert_eq!(err.to_string(), "Invalid value 0 for `width`: a positive width");
    }
}
