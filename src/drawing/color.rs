//! The [`Color`] value: RGB channels plus optional alpha/opacity.
//!
//! Alpha (0-127, 0 opaque) and opacity (0-100, 100 opaque) describe the same
//! thing on inverse scales. Both are stored; whichever setter ran last is
//! authoritative and the other is derived with one fixed pair of formulas:
//!
//! ```text
//! alpha   = floor(127 * (100 - opacity) / 100)
//! opacity = floor((127 - alpha) * 100 / 127)
//! ```
//!
//! Both map the end points exactly (0 ↔ 100, 127 ↔ 0). Intermediate values
//! do not necessarily survive a round trip.

use super::color_tool::{self, ColorDefinition, format_hex, keyed_channels, parse_channel_list};
use super::{DrawingError, value_as_int};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub const MAX_ALPHA: u8 = 127;
pub const MAX_OPACITY: u8 = 100;

const CHANNEL_RANGE: &str = "an r|g|b value in the range 0-255";
const ALPHA_RANGE: &str = "an alpha value in the range 0-127";
const OPACITY_RANGE: &str = "an opacity value in the range 0-100";

pub fn opacity_to_alpha(opacity: u8) -> u8 {
    let opacity = u32::from(opacity.min(MAX_OPACITY));
    (127 * (100 - opacity) / 100) as u8
}

pub fn alpha_to_opacity(alpha: u8) -> u8 {
    let alpha = u32::from(alpha.min(MAX_ALPHA));
    ((127 - alpha) * 100 / 127) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: Option<u8>,
    opacity: Option<u8>,
}

/// Named accessors, resolved once from their (case-insensitive) aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorProperty {
    Red,
    Green,
    Blue,
    Alpha,
    Opacity,
    Rgb,
    Rgba,
    Argb,
    Hex,
}

impl ColorProperty {
    pub fn from_name(name: &str) -> Option<Self> {
        let property = match name.to_ascii_lowercase().as_str() {
            "r" | "red" => Self::Red,
            "g" | "green" => Self::Green,
            "b" | "blue" => Self::Blue,
            "a" | "alpha" => Self::Alpha,
            "o" | "opacity" => Self::Opacity,
            "rgb" => Self::Rgb,
            "rgba" => Self::Rgba,
            "argb" => Self::Argb,
            "hex" | "h" | "hexadecimal" | "value" | "webcolor" => Self::Hex,
            _ => return None,
        };
        Some(property)
    }
}

/// A property value read from or written to a [`Color`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorValue {
    Number(i64),
    /// Clears alpha and opacity.
    Unset,
    Channels(Vec<i64>),
    Text(String),
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgb(255, 255, 255)
    }
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: None,
            opacity: None,
        }
    }

    /// Build from any color definition. Unresolvable definitions and
    /// out-of-range channels give black. `opacity` is clamped to 0-100;
    /// `None` leaves alpha and opacity unset.
    pub fn new(definition: impl Into<ColorDefinition>, opacity: Option<i64>) -> Self {
        let definition = definition.into();
        let mut color = match color_tool::color_to_rgb(&definition).and_then(checked_channels) {
            Ok([r, g, b]) => Self::from_rgb(r, g, b),
            Err(err) => {
                tracing::debug!("falling back to black: {err}");
                Self::BLACK
            }
        };
        if let Some(opacity) = opacity {
            color.assign_opacity(opacity.clamp(0, i64::from(MAX_OPACITY)) as u8);
        }
        color
    }

    /// Parse `rgb(r,g,b)`, `argb(a,r,g,b)` (alpha ignored) or any form
    /// [`color_to_rgb`](color_tool::color_to_rgb) accepts, clamping
    /// channels. Anything else gives black.
    pub fn from_text(text: &str) -> Self {
        let definition = ColorDefinition::Text(text.to_string());
        if let Ok(rgb) = color_tool::color_to_rgb(&definition) {
            return Self::clamped(rgb);
        }
        if let Some(body) = text.strip_prefix("argb(").and_then(|s| s.strip_suffix(')')) {
            if let Some([_, r, g, b]) = parse_channel_list::<4>(body) {
                return Self::clamped([r, g, b]);
            }
        }
        Self::BLACK
    }

    /// Keys `r|red`, `g|green`, `b|blue` in any case, channels clamped, plus
    /// an optional `opacity`. Missing channels give black.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let keyed: BTreeMap<String, i64> = record
            .iter()
            .filter_map(|(k, v)| value_as_int(v).map(|n| (k.to_ascii_lowercase(), n)))
            .collect();
        let Some(rgb) = keyed_channels(&keyed) else {
            return Self::BLACK;
        };
        let mut color = Self::clamped(rgb);
        if let Some(opacity) = keyed.get("opacity") {
            color.assign_opacity((*opacity).clamp(0, i64::from(MAX_OPACITY)) as u8);
        }
        color
    }

    /// Decode the packed 32-bit form. Values above `0xFFFFFF` carry a 7-bit
    /// alpha in the top byte; smaller values are fully opaque.
    pub fn from_packed_argb(value: u32) -> Self {
        let [a, r, g, b] = value.to_be_bytes();
        let mut color = Self::from_rgb(r, g, b);
        if value > 0x00FF_FFFF {
            color.assign_alpha(a & 0x7F);
        } else {
            color.assign_alpha(0);
        }
        color
    }

    fn clamped([r, g, b]: [i64; 3]) -> Self {
        let c = |v: i64| v.clamp(0, 255) as u8;
        Self::from_rgb(c(r), c(g), c(b))
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// 0 when no alpha is tracked.
    pub fn alpha(&self) -> u8 {
        self.alpha.unwrap_or(0)
    }

    /// 100 when no opacity is tracked.
    pub fn opacity(&self) -> u8 {
        self.opacity.unwrap_or(MAX_OPACITY)
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub fn argb(&self) -> [u8; 4] {
        [self.alpha(), self.red, self.green, self.blue]
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha()]
    }

    /// Lowercase `#rrggbb`.
    pub fn hex(&self) -> String {
        format_hex(self.red, self.green, self.blue)
    }

    /// `rgb` when no alpha is tracked, else `alpha << 24 | rgb`.
    pub fn to_packed_argb(&self) -> u32 {
        let rgb = u32::from_be_bytes([0, self.red, self.green, self.blue]);
        match self.alpha {
            Some(alpha) => (u32::from(alpha) << 24) | rgb,
            None => rgb,
        }
    }

    pub fn to_record(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("red".into(), self.red.into());
        map.insert("green".into(), self.green.into());
        map.insert("blue".into(), self.blue.into());
        map.insert("alpha".into(), self.alpha.map_or(Value::Null, Value::from));
        map.insert("opacity".into(), self.opacity.map_or(Value::Null, Value::from));
        map.insert("hex".into(), self.hex().into());
        map
    }

    pub fn get(&self, property: ColorProperty) -> ColorValue {
        let channels = |values: &[u8]| ColorValue::Channels(values.iter().map(|&v| i64::from(v)).collect());
        match property {
            ColorProperty::Red => ColorValue::Number(i64::from(self.red)),
            ColorProperty::Green => ColorValue::Number(i64::from(self.green)),
            ColorProperty::Blue => ColorValue::Number(i64::from(self.blue)),
            ColorProperty::Alpha => ColorValue::Number(i64::from(self.alpha())),
            ColorProperty::Opacity => ColorValue::Number(i64::from(self.opacity())),
            ColorProperty::Rgb => channels(&self.rgb()),
            ColorProperty::Rgba => channels(&self.rgba()),
            ColorProperty::Argb => channels(&self.argb()),
            ColorProperty::Hex => ColorValue::Text(self.hex()),
        }
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    pub fn set(&mut self, property: ColorProperty, value: ColorValue) -> Result<(), DrawingError> {
        match (property, value) {
            (ColorProperty::Red, ColorValue::Number(n)) => self.set_red(n),
            (ColorProperty::Green, ColorValue::Number(n)) => self.set_green(n),
            (ColorProperty::Blue, ColorValue::Number(n)) => self.set_blue(n),
            (ColorProperty::Alpha, ColorValue::Number(n)) => self.set_alpha(Some(n)),
            (ColorProperty::Alpha, ColorValue::Unset) => self.set_alpha(None),
            (ColorProperty::Opacity, ColorValue::Number(n)) => self.set_opacity(Some(n)),
            (ColorProperty::Opacity, ColorValue::Unset) => self.set_opacity(None),
            (ColorProperty::Rgb | ColorProperty::Rgba | ColorProperty::Argb | ColorProperty::Hex, value) => {
                let definition = match value {
                    ColorValue::Channels(values) => ColorDefinition::Channels(values),
                    ColorValue::Text(text) => ColorDefinition::Text(text),
                    other => {
                        return Err(DrawingError::invalid(
                            "value",
                            format!("{other:?}"),
                            "channels or text",
                        ));
                    }
                };
                match property {
                    ColorProperty::Rgb => self.set_rgb(&definition),
                    ColorProperty::Rgba => self.set_rgba(&definition),
                    ColorProperty::Argb => self.set_argb(&definition),
                    _ => self.set_web_color(&definition),
                }
            }
            (_, other) => Err(DrawingError::invalid(
                "value",
                format!("{other:?}"),
                "a number, or unset for alpha/opacity",
            )),
        }
    }

    pub fn set_red(&mut self, value: i64) -> Result<(), DrawingError> {
        self.red = checked_channel("red", value)?;
        Ok(())
    }

    pub fn set_green(&mut self, value: i64) -> Result<(), DrawingError> {
        self.green = checked_channel("green", value)?;
        Ok(())
    }

    pub fn set_blue(&mut self, value: i64) -> Result<(), DrawingError> {
        self.blue = checked_channel("blue", value)?;
        Ok(())
    }

    /// `None` clears both alpha and opacity.
    pub fn set_alpha(&mut self, value: Option<i64>) -> Result<(), DrawingError> {
        match value {
            None => self.clear_transparency(),
            Some(a) => self.assign_alpha(checked_alpha(a)?),
        }
        Ok(())
    }

    /// `None` clears both alpha and opacity.
    pub fn set_opacity(&mut self, value: Option<i64>) -> Result<(), DrawingError> {
        match value {
            None => self.clear_transparency(),
            Some(o) if (0..=i64::from(MAX_OPACITY)).contains(&o) => self.assign_opacity(o as u8),
            Some(o) => return Err(DrawingError::invalid("opacity", o, OPACITY_RANGE)),
        }
        Ok(())
    }

    /// Replace the channels from any definition and make the color fully
    /// opaque.
    pub fn set_web_color(&mut self, definition: &ColorDefinition) -> Result<(), DrawingError> {
        let [r, g, b] = checked_channels(color_tool::color_to_rgb(definition)?)?;
        self.red = r;
        self.green = g;
        self.blue = b;
        self.assign_alpha(0);
        Ok(())
    }

    /// `"rgb(r,g,b)"`, `"r,g,b"`, `[r, g, b, ..]` or keyed channels. Alpha is
    /// left alone.
    pub fn set_rgb(&mut self, value: &ColorDefinition) -> Result<(), DrawingError> {
        let rgb = match value {
            ColorDefinition::Text(text) => {
                let body = text
                    .strip_prefix("rgb(")
                    .and_then(|s| s.strip_suffix(')'))
                    .unwrap_or(text);
                parse_channel_list::<3>(body).ok_or_else(|| {
                    DrawingError::invalid("rgbValue", text, "'rgb(r,g,b)' or 'r,g,b'")
                })?
            }
            ColorDefinition::Channels(values) if values.len() > 2 => [values[0], values[1], values[2]],
            ColorDefinition::Keyed(map) if map.len() > 2 => keyed_channels(map).ok_or_else(|| {
                DrawingError::invalid("rgbValue", format!("{map:?}"), "keys r|red, g|green, b|blue")
            })?,
            other => {
                return Err(DrawingError::invalid(
                    "rgbValue",
                    format!("{other:?}"),
                    "an rgb string, array or keyed channels",
                ));
            }
        };
        let [r, g, b] = checked_channels(rgb)?;
        self.red = r;
        self.green = g;
        self.blue = b;
        Ok(())
    }

    /// `"rgb(r,g,b)"`, `"argb(a,r,g,b)"`, `[a, r, g, b]`, `[r, g, b]` or keyed
    /// channels with optional `a|alpha`. A missing alpha means 0.
    pub fn set_argb(&mut self, value: &ColorDefinition) -> Result<(), DrawingError> {
        let [a, r, g, b] = match value {
            ColorDefinition::Text(text) => {
                let parsed = match text.strip_prefix("argb(").and_then(|s| s.strip_suffix(')')) {
                    Some(body) => parse_channel_list::<4>(body),
                    None => rgb_function(text).map(|[r, g, b]| [0, r, g, b]),
                };
                parsed.ok_or_else(|| {
                    DrawingError::invalid("argbValue", text, "'rgb(r,g,b)' or 'argb(a,r,g,b)'")
                })?
            }
            ColorDefinition::Channels(values) => match values.as_slice() {
                [r, g, b] => [0, *r, *g, *b],
                [a, r, g, b, ..] => [*a, *r, *g, *b],
                _ => return Err(DrawingError::invalid("argbValue", format!("{values:?}"), "3 or 4 channels")),
            },
            ColorDefinition::Keyed(map) => keyed_with_alpha(map)
                .map(|[r, g, b, a]| [a, r, g, b])
                .ok_or_else(|| {
                    DrawingError::invalid("argbValue", format!("{map:?}"), "keys r|red, g|green, b|blue, a|alpha")
                })?,
        };
        self.assign_checked(a, r, g, b)
    }

    /// `"rgb(r,g,b)"`, `"rgba(r,g,b,a)"`, `[r, g, b, a]`, `[r, g, b]` or
    /// keyed channels with optional `a|alpha`. A missing alpha means 0.
    pub fn set_rgba(&mut self, value: &ColorDefinition) -> Result<(), DrawingError> {
        let [r, g, b, a] = match value {
            ColorDefinition::Text(text) => {
                let parsed = match text.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
                    Some(body) => parse_channel_list::<4>(body),
                    None => rgb_function(text).map(|[r, g, b]| [r, g, b, 0]),
                };
                parsed.ok_or_else(|| {
                    DrawingError::invalid("rgbaValue", text, "'rgb(r,g,b)' or 'rgba(r,g,b,a)'")
                })?
            }
            ColorDefinition::Channels(values) => match values.as_slice() {
                [r, g, b] => [*r, *g, *b, 0],
                [r, g, b, a, ..] => [*r, *g, *b, *a],
                _ => return Err(DrawingError::invalid("rgbaValue", format!("{values:?}"), "3 or 4 channels")),
            },
            ColorDefinition::Keyed(map) => keyed_with_alpha(map).ok_or_else(|| {
                DrawingError::invalid("rgbaValue", format!("{map:?}"), "keys r|red, g|green, b|blue, a|alpha")
            })?,
        };
        self.assign_checked(a, r, g, b)
    }

    fn assign_checked(&mut self, a: i64, r: i64, g: i64, b: i64) -> Result<(), DrawingError> {
        let alpha = checked_alpha(a)?;
        let [r, g, b] = checked_channels([r, g, b])?;
        self.red = r;
        self.green = g;
        self.blue = b;
        self.assign_alpha(alpha);
        Ok(())
    }

    fn assign_alpha(&mut self, alpha: u8) {
        self.alpha = Some(alpha);
        self.opacity = Some(alpha_to_opacity(alpha));
    }

    fn assign_opacity(&mut self, opacity: u8) {
        self.opacity = Some(opacity);
        self.alpha = Some(opacity_to_alpha(opacity));
    }

    fn clear_transparency(&mut self) {
        self.alpha = None;
        self.opacity = None;
    }
}

/// Strict `rgb(r,g,b)`: no space before the parenthesis, closing one required.
fn rgb_function(text: &str) -> Option<[i64; 3]> {
    let body = text.strip_prefix("rgb(")?.strip_suffix(')')?;
    parse_channel_list::<3>(body)
}

/// `[r, g, b, a]` from keyed channels; alpha from `a` alongside `r/g/b` or
/// `alpha` alongside `red/green/blue`, default 0.
fn keyed_with_alpha(map: &BTreeMap<String, i64>) -> Option<[i64; 4]> {
    let get = |key: &str| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    };
    let [r, g, b] = keyed_channels(map)?;
    let alpha_key = if get("r").is_some() { "a" } else { "alpha" };
    Some([r, g, b, get(alpha_key).unwrap_or(0)])
}

fn checked_channel(field: &'static str, value: i64) -> Result<u8, DrawingError> {
    u8::try_from(value).map_err(|_| DrawingError::invalid(field, value, CHANNEL_RANGE))
}

fn checked_channels([r, g, b]: [i64; 3]) -> Result<[u8; 3], DrawingError> {
    Ok([
        checked_channel("r", r)?,
        checked_channel("g", g)?,
        checked_channel("b", b)?,
    ])
}

fn checked_alpha(value: i64) -> Result<u8, DrawingError> {
    match u8::try_from(value) {
        Ok(a) if a <= MAX_ALPHA => Ok(a),
        _ => Err(DrawingError::invalid("alpha", value, ALPHA_RANGE)),
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}
