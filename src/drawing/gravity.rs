//! Anchor positions on a 3×3 grid.
//!
//! [`Gravity`] is the anchor used by crop policies and serialized as codes
//! 0-8, row-major from the top-left corner. [`ContentAlign`] is the older
//! alignment code set, numbered from the bottom-right corner; it converts
//! losslessly to [`Gravity`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Horizontal third of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// Vertical third of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Gravity {
    TopLeft = 0,
    TopCenter = 1,
    TopRight = 2,
    MiddleLeft = 3,
    #[default]
    MiddleCenter = 4,
    MiddleRight = 5,
    BottomLeft = 6,
    BottomCenter = 7,
    BottomRight = 8,
}

impl Gravity {
    pub const ALL: [Gravity; 9] = [
        Gravity::TopLeft,
        Gravity::TopCenter,
        Gravity::TopRight,
        Gravity::MiddleLeft,
        Gravity::MiddleCenter,
        Gravity::MiddleRight,
        Gravity::BottomLeft,
        Gravity::BottomCenter,
        Gravity::BottomRight,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i)).copied()
    }

    /// Lenient decoding for serialized data: unknown codes become middle-center.
    pub fn from_code_or_default(code: i64) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn horizontal(self) -> Horizontal {
        match self.code() % 3 {
            0 => Horizontal::Left,
            1 => Horizontal::Center,
            _ => Horizontal::Right,
        }
    }

    pub fn vertical(self) -> Vertical {
        match self.code() / 3 {
            0 => Vertical::Top,
            1 => Vertical::Middle,
            _ => Vertical::Bottom,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Gravity::TopLeft => "top-left",
            Gravity::TopCenter => "top-center",
            Gravity::TopRight => "top-right",
            Gravity::MiddleLeft => "middle-left",
            Gravity::MiddleCenter => "middle-center",
            Gravity::MiddleRight => "middle-right",
            Gravity::BottomLeft => "bottom-left",
            Gravity::BottomCenter => "bottom-center",
            Gravity::BottomRight => "bottom-right",
        }
    }

    /// Accepts the kebab-case name (`"top-left"`) or the numeric code.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(code) = text.parse::<i64>() {
            return Self::from_code(code);
        }
        Self::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Gravity> for u8 {
    fn from(value: Gravity) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for Gravity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(i64::from(value)).ok_or_else(|| format!("unknown gravity code {value}"))
    }
}

/// Legacy alignment codes, counted from the bottom-right corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentAlign {
    #[default]
    BottomRight = 0,
    Bottom = 1,
    BottomLeft = 2,
    MiddleRight = 3,
    Middle = 4,
    MiddleLeft = 5,
    TopRight = 6,
    Top = 7,
    TopLeft = 8,
}

impl ContentAlign {
    pub const ALL: [ContentAlign; 9] = [
        ContentAlign::BottomRight,
        ContentAlign::Bottom,
        ContentAlign::BottomLeft,
        ContentAlign::MiddleRight,
        ContentAlign::Middle,
        ContentAlign::MiddleLeft,
        ContentAlign::TopRight,
        ContentAlign::Top,
        ContentAlign::TopLeft,
    ];

    /// Unknown codes fall back to bottom-right.
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
            .unwrap_or_default()
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ContentAlign> for Gravity {
    fn from(value: ContentAlign) -> Self {
        // The two code sets enumerate the same grid in opposite directions.
        Gravity::ALL[8 - value.code() as usize]
    }
}

impl From<Gravity> for ContentAlign {
    fn from(value: Gravity) -> Self {
        ContentAlign::ALL[8 - value.code() as usize]
    }
}
