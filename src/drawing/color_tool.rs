//! Stateless color conversion engine.
//!
//! Converts between the color representations accepted at the boundary:
//!
//! | Form | Example |
//! |---|---|
//! | Named color (case-insensitive) | `"SteelBlue"` |
//! | Hex, 2/3/6/8 digits, optional `#` | `"#f00"`, `"ff0000"`, `"#80ff0000"`, `"#7f"` |
//! | RGB text | `"rgb(10,20,30)"`, `"10, 20, 30"` |
//! | Indexed channels | `[10, 20, 30]` |
//! | Keyed channels | `{r, g, b}` or `{red, green, blue}` |
//!
//! The 8-digit hex form drops its leading (alpha) byte; the 2-digit form is a
//! grey shorthand applied to all three channels.

use super::DrawingError;
use std::collections::BTreeMap;

/// The named color table. Declaration order is the tie-break order for
/// reverse lookups, since several names share one value (`aqua`/`cyan`,
/// `fuchsia`/`magenta`).
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgrey", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 216]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [216, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

/// A color as it arrives at the boundary, before it is resolved to RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorDefinition {
    /// Name, hex, `rgb(r,g,b)` or `r,g,b` text.
    Text(String),
    /// Indexed channels: `[r, g, b]` or `[a, r, g, b]`.
    Channels(Vec<i64>),
    /// Keyed channels, keys compared case-insensitively.
    Keyed(BTreeMap<String, i64>),
}

impl ColorDefinition {
    /// Decode a JSON value: strings become [`Text`](Self::Text), arrays of
    /// integers [`Channels`](Self::Channels), objects [`Keyed`](Self::Keyed).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(super::value_as_int)
                .collect::<Option<Vec<_>>>()
                .map(Self::Channels),
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(k, v)| super::value_as_int(v).map(|n| (k.clone(), n)))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(Self::Keyed),
            _ => None,
        }
    }
}

impl From<&str> for ColorDefinition {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ColorDefinition {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<[i64; 3]> for ColorDefinition {
    fn from(value: [i64; 3]) -> Self {
        Self::Channels(value.to_vec())
    }
}

impl From<Vec<i64>> for ColorDefinition {
    fn from(value: Vec<i64>) -> Self {
        Self::Channels(value)
    }
}

impl From<BTreeMap<String, i64>> for ColorDefinition {
    fn from(value: BTreeMap<String, i64>) -> Self {
        Self::Keyed(value)
    }
}

/// The shapes [`rgb_to_hex`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbInput<'a> {
    Triple(i64, i64, i64),
    Indexed(&'a [i64]),
    Keyed(&'a BTreeMap<String, i64>),
    /// `"r,g,b"` or `"rgb(r,g,b)"`.
    Text(&'a str),
}

impl From<(i64, i64, i64)> for RgbInput<'_> {
    fn from((r, g, b): (i64, i64, i64)) -> Self {
        Self::Triple(r, g, b)
    }
}

impl<'a> From<&'a [i64]> for RgbInput<'a> {
    fn from(value: &'a [i64]) -> Self {
        Self::Indexed(value)
    }
}

impl<'a> From<&'a [i64; 3]> for RgbInput<'a> {
    fn from(value: &'a [i64; 3]) -> Self {
        Self::Indexed(value)
    }
}

impl<'a> From<&'a BTreeMap<String, i64>> for RgbInput<'a> {
    fn from(value: &'a BTreeMap<String, i64>) -> Self {
        Self::Keyed(value)
    }
}

impl<'a> From<&'a str> for RgbInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// Returns true for `#?` followed by exactly 2, 3, 6 or 8 hex digits.
pub fn is_hex_format(input: &str) -> bool {
    let digits = input.strip_prefix('#').unwrap_or(input);
    matches!(digits.len(), 2 | 3 | 6 | 8) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode a 2, 3, 6 or 8 digit hex string (optional `#`).
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digits = if digits.len() == 8 { &digits[2..] } else { digits };
    match digits.len() {
        6 => Some([
            parse_byte(&digits[0..2])?,
            parse_byte(&digits[2..4])?,
            parse_byte(&digits[4..6])?,
        ]),
        3 => {
            let b = digits.as_bytes();
            Some([nibble(b[0])?, nibble(b[1])?, nibble(b[2])?])
        }
        2 => {
            let grey = parse_byte(digits)?;
            Some([grey, grey, grey])
        }
        _ => None,
    }
}

fn parse_byte(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

/// `'f'` -> `0xff`
fn nibble(ch: u8) -> Option<u8> {
    let n = (ch as char).to_digit(16)? as u8;
    Some(n << 4 | n)
}

/// Encode channels as lowercase `#rrggbb`, clamping each channel to 0-255.
///
/// Returns `None` when the input shape is not recognised (wrong element
/// count, missing keys, unparsable text).
pub fn rgb_to_hex<'a>(input: impl Into<RgbInput<'a>>) -> Option<String> {
    let [r, g, b] = match input.into() {
        RgbInput::Triple(r, g, b) => [r, g, b],
        RgbInput::Indexed(values) => match values {
            [r, g, b] => [*r, *g, *b],
            _ => return None,
        },
        RgbInput::Keyed(map) => {
            if map.len() != 3 {
                return None;
            }
            keyed_channels(map)?
        }
        RgbInput::Text(text) => parse_rgb_text(text)?,
    };
    Some(format_hex(clamp_channel(r), clamp_channel(g), clamp_channel(b)))
}

pub(crate) fn format_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Resolve `{r,g,b}` or `{red,green,blue}` (any key case).
pub(crate) fn keyed_channels(map: &BTreeMap<String, i64>) -> Option<[i64; 3]> {
    let get = |key: &str| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    };
    match (get("r"), get("g"), get("b")) {
        (Some(r), Some(g), Some(b)) => Some([r, g, b]),
        _ => match (get("red"), get("green"), get("blue")) {
            (Some(r), Some(g), Some(b)) => Some([r, g, b]),
            _ => None,
        },
    }
}

/// `"r,g,b"` or `"rgb(r,g,b)"`, 1-3 digits per channel, whitespace allowed
/// after commas and between `rgb` and `(`.
fn parse_rgb_text(text: &str) -> Option<[i64; 3]> {
    let body = match text.strip_prefix("rgb") {
        Some(rest) => rest.trim_start().strip_prefix('(')?,
        None => text,
    };
    let body = body.strip_suffix(')').unwrap_or(body);
    parse_channel_list::<3>(body)
}

/// Split `N,<ws>N,...` into exactly `C` channels of 1-3 digits.
pub(crate) fn parse_channel_list<const C: usize>(body: &str) -> Option<[i64; C]> {
    let mut out = [0i64; C];
    let mut parts = body.split(',');
    for (i, slot) in out.iter_mut().enumerate() {
        let part = parts.next()?;
        let part = if i == 0 { part } else { part.trim_start() };
        *slot = super::parse_digits(part, 3)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// Resolve any color definition to RGB channels.
///
/// Indexed input of 3-4 elements is passed through without range checks;
/// the first three elements are returned. Callers that need valid channels
/// must check them (see [`Color::new`](super::Color::new)).
pub fn color_to_rgb(definition: &ColorDefinition) -> Result<[i64; 3], DrawingError> {
    match definition {
        ColorDefinition::Channels(values) => {
            if (3..=4).contains(&values.len()) {
                Ok([values[0], values[1], values[2]])
            } else {
                Err(DrawingError::invalid(
                    "colorDefinition",
                    format!("{values:?}"),
                    "an (a)rgb(a) array with 3-4 elements",
                ))
            }
        }
        ColorDefinition::Keyed(map) => keyed_channels(map).ok_or_else(|| {
            DrawingError::invalid(
                "colorDefinition",
                format!("{map:?}"),
                "keys r|red, g|green, b|blue",
            )
        }),
        ColorDefinition::Text(text) => text_to_rgb(text)
            .map(|[r, g, b]| [i64::from(r), i64::from(g), i64::from(b)])
            .ok_or_else(|| {
                DrawingError::invalid(
                    "colorDefinition",
                    text,
                    "a color name, #rgb, #rrggbb, #aarrggbb, rgb(r,g,b) or r,g,b",
                )
            }),
    }
}

fn text_to_rgb(text: &str) -> Option<[u8; 3]> {
    if is_hex_format(text) {
        return hex_to_rgb(text);
    }
    if let Some(rgb) = named_rgb(text) {
        return Some(rgb);
    }
    rgb_to_hex(text).and_then(|hex| hex_to_rgb(&hex))
}

/// Resolve a color definition to canonical lowercase `#rrggbb`.
///
/// Unlike [`color_to_rgb`], indexed input must have exactly three elements,
/// and channels are clamped.
pub fn color_to_hex(definition: &ColorDefinition) -> Result<String, DrawingError> {
    match definition {
        ColorDefinition::Channels(values) => {
            rgb_to_hex(values.as_slice()).ok_or_else(|| {
                DrawingError::invalid(
                    "colorDefinition",
                    format!("{values:?}"),
                    "an rgb array with 3 elements",
                )
            })
        }
        ColorDefinition::Keyed(_) | ColorDefinition::Text(_) => {
            let [r, g, b] = color_to_rgb(definition)?;
            Ok(format_hex(clamp_channel(r), clamp_channel(g), clamp_channel(b)))
        }
    }
}

/// Case-insensitive named color lookup.
pub fn named_rgb(name: &str) -> Option<[u8; 3]> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, rgb)| *rgb)
}

/// Reverse lookup: the first table name whose value equals the color.
pub fn is_named_color(definition: &ColorDefinition) -> Option<&'static str> {
    let hex = color_to_hex(definition).ok()?;
    let rgb = hex_to_rgb(&hex)?;
    NAMED_COLORS
        .iter()
        .find(|(_, value)| *value == rgb)
        .map(|(name, _)| *name)
}

/// All known color names, in table order.
pub fn color_names() -> impl Iterator<Item = &'static str> {
    NAMED_COLORS.iter().map(|(name, _)| *name)
}
