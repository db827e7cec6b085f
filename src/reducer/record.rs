//! Structured-record form of a reducer.
//!
//! ```json
//! {"type": 0, "width": 200, "height": 200, "portrait": 0, "landscape": 0, "gravity": 4}
//! ```
//!
//! Keys not used by the reducer's type are written as 0 (gravity as 4,
//! middle-center) so every record has the same shape. Two decoders exist:
//!
//! - serde (`ReducerRecord`, used by config presets) is strict: unknown
//!   keys, a missing `type` or invalid values are errors.
//! - [`try_parse`] is lenient about shape (numeric strings, extra keys) but
//!   still reports `None` when `type` is missing or the values cannot make a
//!   valid reducer.
//!
//! Both degrade an unknown crop gravity to middle-center.

use super::{ImageSizeReducer, ReducerType};
use crate::drawing::{DrawingError, Gravity, record_int};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_GRAVITY: i64 = Gravity::MiddleCenter as i64;

fn default_gravity() -> i64 {
    DEFAULT_GRAVITY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReducerRecord {
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub portrait: i64,
    #[serde(default)]
    pub landscape: i64,
    #[serde(default = "default_gravity")]
    pub gravity: i64,
}

impl From<ImageSizeReducer> for ReducerRecord {
    fn from(r: ImageSizeReducer) -> Self {
        Self {
            kind: i64::from(r.kind.code()),
            width: i64::from(r.width),
            height: i64::from(r.height),
            portrait: i64::from(r.portrait),
            landscape: i64::from(r.landscape),
            gravity: i64::from(r.gravity.code()),
        }
    }
}

impl TryFrom<ReducerRecord> for ImageSizeReducer {
    type Error = DrawingError;

    fn try_from(rec: ReducerRecord) -> Result<Self, Self::Error> {
        let kind = ReducerType::from_code(rec.kind)
            .ok_or_else(|| DrawingError::invalid("type", rec.kind, "a reducer type code 0-3"))?;
        match kind {
            ReducerType::Crop => ImageSizeReducer::cropper(
                rec.width,
                rec.height,
                Gravity::from_code_or_default(rec.gravity),
            ),
            ReducerType::Resize => ImageSizeReducer::resizer(rec.width, rec.height),
            ReducerType::LongSide => ImageSizeReducer::long_side(rec.landscape, rec.portrait),
            ReducerType::ShortSide => ImageSizeReducer::short_side(rec.landscape, rec.portrait),
        }
    }
}

/// Lenient decoding of a JSON-like record. `None` when `type` is absent or
/// the record does not describe a valid reducer.
pub fn try_parse(value: &Value) -> Option<ImageSizeReducer> {
    let map = value.as_object()?;
    let Some(kind) = record_int(map, "type") else {
        tracing::debug!("reducer record has no type");
        return None;
    };
    let field = |key: &str| record_int(map, key).unwrap_or(0);
    let record = ReducerRecord {
        kind,
        width: field("width"),
        height: field("height"),
        portrait: field("portrait"),
        landscape: field("landscape"),
        gravity: record_int(map, "gravity").unwrap_or(DEFAULT_GRAVITY),
    };
    match ImageSizeReducer::try_from(record) {
        Ok(reducer) => Some(reducer),
        Err(e) => {
            tracing::debug!(error = %e, "rejected reducer record");
            None
        }
    }
}

/// [`try_parse`] over JSON text.
pub fn try_parse_str(text: &str) -> Option<ImageSizeReducer> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    try_parse(&value)
}

impl ImageSizeReducer {
    pub fn to_record(&self) -> Map<String, Value> {
        let rec = ReducerRecord::from(*self);
        let mut map = Map::new();
        map.insert("type".into(), rec.kind.into());
        map.insert("width".into(), rec.width.into());
        map.insert("height".into(), rec.height.into());
        map.insert("portrait".into(), rec.portrait.into());
        map.insert("landscape".into(), rec.landscape.into());
        map.insert("gravity".into(), rec.gravity.into());
        map
    }

    /// Compact JSON in record key order.
    pub fn to_json(&self) -> String {
        let rec = ReducerRecord::from(*self);
        format!(
            r#"{{"type":{},"width":{},"height":{},"portrait":{},"landscape":{},"gravity":{}}}"#,
            rec.kind, rec.width, rec.height, rec.portrait, rec.landscape, rec.gravity
        )
    }

    pub fn try_parse(value: &Value) -> Option<Self> {
        try_parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_types() -> Vec<ImageSizeReducer> {
        vec![
            ImageSizeReducer::cropper(120, 80, Gravity::TopRight).unwrap(),
            ImageSizeReducer::resizer(640, 480).unwrap(),
            ImageSizeReducer::long_side(1024, 768).unwrap(),
            ImageSizeReducer::short_side(300, 200).unwrap(),
        ]
    }

    #[test]
    fn record_has_every_key() {
        let r = ImageSizeReducer::long_side(1024, 768).unwrap();
        assert_eq!(
            Value::Object(r.to_record()),
            json!({"type": 2, "width": 0, "height": 0, "portrait": 768, "landscape": 1024, "gravity": 4})
        );
    }

    #[test]
    fn json_text_key_order() {
        let r = ImageSizeReducer::cropper(10, 20, Gravity::BottomLeft).unwrap();
        assert_eq!(
            r.to_json(),
            r#"{"type":0,"width":10,"height":20,"portrait":0,"landscape":0,"gravity":6}"#
        );
        assert_eq!(r.to_string(), r.to_json());
    }

    #[test]
    fn record_round_trip_every_type() {
        for r in all_types() {
            let back = try_parse(&Value::Object(r.to_record())).unwrap();
            assert_eq!(back, r);
            assert_eq!(try_parse_str(&r.to_json()), Some(r));
        }
    }

    #[test]
    fn serde_round_trip_every_type() {
        for r in all_types() {
            let text = serde_json::to_string(&r).unwrap();
            let back: ImageSizeReducer = serde_json::from_str(&text).unwrap();
            assert_eq!(back, r);
        }
    }

    #[test]
    fn missing_type_fails() {
        assert_eq!(try_parse(&json!({"width": 10, "height": 10})), None);
        assert!(serde_json::from_value::<ImageSizeReducer>(json!({"width": 10})).is_err());
    }

    #[test]
    fn unknown_type_fails() {
        assert_eq!(try_parse(&json!({"type": 7, "width": 10, "height": 10})), None);
    }

    #[test]
    fn missing_required_values_fail() {
        assert_eq!(try_parse(&json!({"type": 0, "width": 10})), None);
        assert_eq!(try_parse(&json!({"type": 2, "landscape": 10})), None);
    }

    #[test]
    fn lenient_parse_accepts_strings_and_extra_keys() {
        let r = try_parse(&json!({"type": "1", "width": "64", "height": 48, "note": "x"})).unwrap();
        assert_eq!(r, ImageSizeReducer::resizer(64, 48).unwrap());
    }

    #[test]
    fn strict_serde_rejects_extra_keys() {
        let v = json!({"type": 1, "width": 64, "height": 48, "note": "x"});
        assert!(serde_json::from_value::<ImageSizeReducer>(v).is_err());
    }

    #[test]
    fn unknown_gravity_degrades_to_center() {
        let r = try_parse(&json!({"type": 0, "width": 5, "height": 5, "gravity": 42})).unwrap();
        assert_eq!(r.gravity(), Gravity::MiddleCenter);
        let r: ImageSizeReducer =
            serde_json::from_value(json!({"type": 0, "width": 5, "height": 5, "gravity": -1}))
                .unwrap();
        assert_eq!(r.gravity(), Gravity::MiddleCenter);
    }

    #[test]
    fn gravity_defaults_to_center() {
        let r = try_parse(&json!({"type": 0, "width": 5, "height": 5})).unwrap();
        assert_eq!(r.gravity(), Gravity::MiddleCenter);
    }

    #[test]
    fn non_object_fails() {
        assert_eq!(try_parse(&json!([0, 10, 10])), None);
        assert_eq!(try_parse_str("not json"), None);
    }
}
