//! Size-reduction policies.
//!
//! An [`ImageSizeReducer`] is a single-purpose, immutable policy: one of
//! [`ReducerType`]'s four strategies plus the parameters that strategy uses.
//! [`ImageSizeReducer::run`] turns a source [`Size`] into a
//! [`ReductionPlan`]: the size to resample to and, for crops, the region of
//! the resampled image to keep. Pixels are never touched here; the
//! [`imaging`](crate::imaging) backend executes plans.
//!
//! | Type | Parameters | Result |
//! |---|---|---|
//! | `Crop` (0) | width, height, gravity | exact width×height, excess cut at the gravity anchor |
//! | `Resize` (1) | width, height | fits inside width×height, may under-fill one axis |
//! | `LongSide` (2) | landscape, portrait | long side limited per orientation |
//! | `ShortSide` (3) | landscape, portrait | short side limited per orientation |
//!
//! Reducers never enlarge: a source already within the limits is planned
//! unchanged.
//!
//! Persistence lives in the submodules: [`record`] (JSON/TOML map),
//! [`xml`] (attribute form) and [`collection`] (lists of reducers).

pub mod collection;
pub mod record;
pub mod xml;

pub use collection::ImageSizeReducerCollection;
pub use record::ReducerRecord;
pub use xml::ReducerXmlError;

use crate::drawing::{DrawingError, Gravity, Rectangle, Size};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ReducerType {
    Crop = 0,
    Resize = 1,
    LongSide = 2,
    ShortSide = 3,
}

impl ReducerType {
    pub const ALL: [ReducerType; 4] = [
        ReducerType::Crop,
        ReducerType::Resize,
        ReducerType::LongSide,
        ReducerType::ShortSide,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i)).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// The `type` attribute value of the XML form.
    pub fn xml_name(self) -> &'static str {
        match self {
            ReducerType::Crop => "crop",
            ReducerType::Resize => "resize",
            ReducerType::LongSide => "long",
            ReducerType::ShortSide => "short",
        }
    }

    /// Accepts the XML names (any case) and the numeric codes.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(code) = text.parse::<i64>() {
            return Self::from_code(code);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.xml_name().eq_ignore_ascii_case(text))
    }
}

impl From<ReducerType> for u8 {
    fn from(value: ReducerType) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for ReducerType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(i64::from(value)).ok_or_else(|| format!("unknown reducer type {value}"))
    }
}

impl fmt::Display for ReducerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xml_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "ReducerRecord", try_from = "ReducerRecord")]
pub struct ImageSizeReducer {
    kind: ReducerType,
    width: u32,
    height: u32,
    landscape: u32,
    portrait: u32,
    gravity: Gravity,
}

/// What a reducer decided for one source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReductionPlan {
    pub source: Size,
    /// Size to resample the source to.
    pub resized: Size,
    /// Region of the resampled image to keep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<Rectangle>,
}

impl ReductionPlan {
    /// Final output dimensions.
    pub fn target(&self) -> Size {
        self.crop.map_or(self.resized, |rect| rect.size)
    }

    /// True when executing the plan would reproduce the source dimensions.
    pub fn is_noop(&self) -> bool {
        self.crop.is_none()
            && self.resized.width() == self.source.width()
            && self.resized.height() == self.source.height()
    }
}

fn positive(field: &'static str, value: i64, expected: &'static str) -> Result<u32, DrawingError> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(DrawingError::invalid(field, value, expected)),
    }
}

impl ImageSizeReducer {
    fn blank(kind: ReducerType) -> Self {
        Self {
            kind,
            width: 0,
            height: 0,
            landscape: 0,
            portrait: 0,
            gravity: Gravity::MiddleCenter,
        }
    }

    /// Exact `width`×`height` output, cutting the excess at `gravity`.
    pub fn cropper(width: i64, height: i64, gravity: Gravity) -> Result<Self, DrawingError> {
        Ok(Self {
            width: positive("width", width, "a positive crop width")?,
            height: positive("height", height, "a positive crop height")?,
            gravity,
            ..Self::blank(ReducerType::Crop)
        })
    }

    /// Like [`cropper`](Self::cropper) with a numeric gravity code, which
    /// must be one of the nine known codes.
    pub fn cropper_with_code(width: i64, height: i64, gravity: i64) -> Result<Self, DrawingError> {
        let gravity = Gravity::from_code(gravity)
            .ok_or_else(|| DrawingError::invalid("gravity", gravity, "a gravity code 0-8"))?;
        Self::cropper(width, height, gravity)
    }

    /// Fit inside `width`×`height` without cropping.
    pub fn resizer(width: i64, height: i64) -> Result<Self, DrawingError> {
        Ok(Self {
            width: positive("width", width, "a positive width")?,
            height: positive("height", height, "a positive height")?,
            ..Self::blank(ReducerType::Resize)
        })
    }

    /// Limit the long side: to `landscape` for landscape and quadratic
    /// sources, to `portrait` for portrait ones.
    pub fn long_side(landscape: i64, portrait: i64) -> Result<Self, DrawingError> {
        Ok(Self {
            landscape: positive("landscapeLength", landscape, "a positive side length")?,
            portrait: positive("portraitLength", portrait, "a positive side length")?,
            ..Self::blank(ReducerType::LongSide)
        })
    }

    /// Limit the short side: the height of landscape and quadratic sources
    /// to `landscape`, the width of portrait ones to `portrait`.
    pub fn short_side(landscape: i64, portrait: i64) -> Result<Self, DrawingError> {
        Ok(Self {
            landscape: positive("landscapeLength", landscape, "a positive side length")?,
            portrait: positive("portraitLength", portrait, "a positive side length")?,
            ..Self::blank(ReducerType::ShortSide)
        })
    }

    /// Only crops carry a gravity; other types ignore it.
    pub fn with_gravity(self, gravity: Gravity) -> Self {
        Self { gravity, ..self }
    }

    pub fn kind(&self) -> ReducerType {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn landscape(&self) -> u32 {
        self.landscape
    }

    pub fn portrait(&self) -> u32 {
        self.portrait
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Compute the plan for an image of size `source`.
    pub fn run(&self, source: Size) -> Result<ReductionPlan, DrawingError> {
        let plan = match self.kind {
            ReducerType::Crop => self.plan_crop(source)?,
            ReducerType::Resize => ReductionPlan {
                source,
                resized: source.contracted_to_max_size(self.target_box())?,
                crop: None,
            },
            ReducerType::LongSide => ReductionPlan {
                source,
                resized: source.contracted_to_max_side(self.landscape, self.portrait),
                crop: None,
            },
            ReducerType::ShortSide => ReductionPlan {
                source,
                resized: source.contracted_to_min_side(self.landscape, self.portrait),
                crop: None,
            },
        };
        tracing::debug!(
            reducer = %self.kind,
            source = %source,
            resized = %plan.resized,
            crop = ?plan.crop,
            "planned reduction"
        );
        Ok(plan)
    }

    fn target_box(&self) -> Size {
        Size::new(i64::from(self.width), i64::from(self.height))
    }

    fn plan_crop(&self, source: Size) -> Result<ReductionPlan, DrawingError> {
        let (tw, th) = (u64::from(self.width), u64::from(self.height));
        let (sw, sh) = (u64::from(source.width()), u64::from(source.height()));

        // A target larger than the source on either axis leaves nothing to
        // crop; fall back to an aspect-preserving fit.
        if tw > sw || th > sh {
            return Ok(ReductionPlan {
                source,
                resized: source.contracted_to_max_size(self.target_box())?,
                crop: None,
            });
        }

        // tw / sw <=> th / sh: the larger ratio is the constraining axis.
        let resized = match (tw * sh).cmp(&(th * sw)) {
            Ordering::Greater => Size::new(tw as i64, (sh * tw / sw) as i64),
            Ordering::Less => Size::new((sw * th / sh) as i64, th as i64),
            Ordering::Equal => {
                return Ok(ReductionPlan {
                    source,
                    resized: source.contracted_to_max_size(self.target_box())?,
                    crop: None,
                });
            }
        };
        let crop = if resized.width() == self.width && resized.height() == self.height {
            None
        } else {
            Some(Rectangle::anchored(
                resized,
                tw as i64,
                th as i64,
                self.gravity,
            )?)
        };
        Ok(ReductionPlan {
            source,
            resized,
            crop,
        })
    }
}

impl fmt::Display for ImageSizeReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}
