//! Width/height value with the proportion-preserving scaling algorithms.
//!
//! ## Orientation
//!
//! A size is *portrait* when `width < height`, *landscape* when
//! `width > height`, and *quadratic* when both are equal. Every "which side
//! is longer" decision checks portrait first, so quadratic sizes follow the
//! landscape branch.
//!
//! ## Rounding
//!
//! All derived dimensions are floored. The side-length methods compute a
//! percentage in `f64` and apply it to the other side, which is the rounding
//! every caller of these methods has always relied on; `reduce_to_max_size`
//! compares aspect ratios by exact integer cross-multiplication.
//!
//! ## Mutation
//!
//! Mutators work in place and return `Ok(false)` when there was nothing to
//! do. A size created with `fixed = true` rejects every mutator with
//! [`DrawingError::FixedSize`]. The `contracted_*` methods are the
//! copy-returning counterparts used by the reducer policies.

use super::{DrawingError, parse_digits, record_int, split_pair, strip_key};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    width: u32,
    height: u32,
    #[serde(skip)]
    fixed: bool,
}

/// Everything [`Size::try_parse`] accepts.
#[derive(Debug, Clone, Copy)]
pub enum SizeSource<'a> {
    /// A single integer yields a quadratic size.
    Square(i64),
    /// Truncated to an integer, then quadratic.
    Scalar(f64),
    /// `"width=N; height=N[; fixed=true]"` (case-insensitive) or `"N,N"`.
    Text(&'a str),
    /// `[width, height]`; missing entries are 0.
    Values(&'a [i64]),
    /// Keys `width`/`Width`/`"0"`, `height`/`Height`/`"1"` and optional `fixed`.
    Record(&'a Map<String, Value>),
}

fn clamp_dimension(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// `floor((100 * target / reference) * other / 100)` in `f64`.
fn scale_other_side(other: u32, target: u32, reference: u32) -> u32 {
    let percent = (100.0 * f64::from(target)) / f64::from(reference);
    ((percent * f64::from(other)) / 100.0).floor() as u32
}

impl Size {
    /// Negative dimensions clamp to 0.
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            fixed: false,
        }
    }

    pub fn new_fixed(width: i64, height: i64) -> Self {
        Self {
            fixed: true,
            ..Self::new(width, height)
        }
    }

    /// The empty (0×0) size.
    pub const fn empty(fixed: bool) -> Self {
        Self {
            width: 0,
            height: 0,
            fixed,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// A mutable copy with the same dimensions.
    pub fn unfixed(&self) -> Self {
        Self {
            fixed: false,
            ..*self
        }
    }

    fn ensure_mutable(&self, operation: &'static str) -> Result<(), DrawingError> {
        if self.fixed {
            return Err(DrawingError::FixedSize { operation });
        }
        Ok(())
    }

    pub fn set_width(&mut self, width: i64) -> Result<(), DrawingError> {
        self.ensure_mutable("width-change")?;
        self.width = clamp_dimension(width);
        Ok(())
    }

    pub fn set_height(&mut self, height: i64) -> Result<(), DrawingError> {
        self.ensure_mutable("height-change")?;
        self.height = clamp_dimension(height);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------

    /// True when either side is 0.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when `other` fits inside on both axes.
    pub fn contains(&self, other: Size) -> bool {
        other.width <= self.width && other.height <= self.height
    }

    pub fn is_portrait(&self) -> bool {
        self.width < self.height
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    pub fn is_quadratic(&self) -> bool {
        self.width == self.height
    }

    /// True when the long side exceeds the short side by at most
    /// `max_difference` (a fraction, 0.01-0.3; anything else means 0.15).
    pub fn is_near_quadratic(&self, max_difference: f64) -> bool {
        if self.is_quadratic() {
            return true;
        }
        let factor = if (0.01..=0.3).contains(&max_difference) {
            1.0 + max_difference
        } else {
            1.15
        };
        let ratio = if self.is_portrait() {
            f64::from(self.height) / f64::from(self.width)
        } else {
            f64::from(self.width) / f64::from(self.height)
        };
        ratio <= factor
    }

    // ------------------------------------------------------------------
    // Reduction
    // ------------------------------------------------------------------

    /// Shrink both sides by `value` pixels.
    pub fn reduce_by(&mut self, value: u32) -> Result<(), DrawingError> {
        self.ensure_mutable("reduce")?;
        self.width = self.width.saturating_sub(value);
        self.height = self.height.saturating_sub(value);
        Ok(())
    }

    /// Shrink each side independently by `percent` (1-99). Aspect ratio is
    /// not corrected.
    pub fn reduce_by_percent(&mut self, percent: u32) -> Result<(), DrawingError> {
        self.ensure_mutable("reduceByPercent")?;
        if !(1..100).contains(&percent) {
            return Err(DrawingError::invalid("percent", percent, "a value between 1 and 99"));
        }
        let keep = f64::from(100 - percent) / 100.0;
        self.width = (f64::from(self.width) * keep).floor() as u32;
        self.height = (f64::from(self.height) * keep).floor() as u32;
        Ok(())
    }

    /// Fit inside `max` preserving aspect ratio, touching at least one edge.
    ///
    /// Returns `Ok(false)` when the size is already strictly smaller than
    /// `max` on both axes.
    pub fn reduce_to_max_size(&mut self, max: Size) -> Result<bool, DrawingError> {
        self.ensure_mutable("reduceToMaxSize")?;
        if self.width < max.width && self.height < max.height {
            return Ok(false);
        }
        if self.width == max.width && self.height == max.height {
            return Ok(true);
        }
        if max.is_empty() {
            return Err(DrawingError::invalid("maxSize", max, "a non-empty size"));
        }
        let (w, h) = (u64::from(self.width), u64::from(self.height));
        let (mw, mh) = (u64::from(max.width), u64::from(max.height));
        // w / mw <=> h / mh
        match (w * mh).cmp(&(h * mw)) {
            std::cmp::Ordering::Less => {
                self.width = ((w * mh) / h) as u32;
                self.height = max.height;
            }
            std::cmp::Ordering::Greater => {
                self.height = ((mw * h) / w) as u32;
                self.width = max.width;
            }
            std::cmp::Ordering::Equal => {
                self.width = max.width;
                self.height = max.height;
            }
        }
        Ok(true)
    }

    /// Pin the longer side to `length`, scaling the other side.
    pub fn reduce_max_side_to(&mut self, length: u32) -> Result<bool, DrawingError> {
        self.ensure_mutable("reduceMaxSideTo")?;
        Ok(self.shrink_long_side(length, length))
    }

    /// Like [`reduce_max_side_to`](Self::reduce_max_side_to) with separate
    /// lengths for landscape (and quadratic) and portrait sizes.
    pub fn reduce_max_side_to2(
        &mut self,
        landscape_width: u32,
        portrait_height: u32,
    ) -> Result<bool, DrawingError> {
        self.ensure_mutable("reduceMaxSideTo2")?;
        Ok(self.shrink_long_side(landscape_width, portrait_height))
    }

    fn shrink_long_side(&mut self, landscape_width: u32, portrait_height: u32) -> bool {
        if self.is_portrait() {
            if portrait_height >= self.height {
                return false;
            }
            self.width = scale_other_side(self.width, portrait_height, self.height);
            self.height = portrait_height;
        } else {
            if landscape_width >= self.width {
                return false;
            }
            self.height = scale_other_side(self.height, landscape_width, self.width);
            self.width = landscape_width;
        }
        true
    }

    /// Pin the shorter side to `length`, scaling the other side.
    pub fn reduce_min_side_to(&mut self, length: u32) -> Result<bool, DrawingError> {
        self.ensure_mutable("reduceMinSideTo")?;
        Ok(self.shrink_short_side(length, length))
    }

    pub fn reduce_min_side_to2(
        &mut self,
        landscape_height: u32,
        portrait_width: u32,
    ) -> Result<bool, DrawingError> {
        self.ensure_mutable("reduceMinSideTo2")?;
        Ok(self.shrink_short_side(landscape_height, portrait_width))
    }

    fn shrink_short_side(&mut self, landscape_height: u32, portrait_width: u32) -> bool {
        if self.is_portrait() {
            if portrait_width >= self.width {
                return false;
            }
            self.height = scale_other_side(self.height, portrait_width, self.width);
            self.width = portrait_width;
        } else {
            if landscape_height >= self.height {
                return false;
            }
            self.width = scale_other_side(self.width, landscape_height, self.height);
            self.height = landscape_height;
        }
        true
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    /// Grow both sides by `value` pixels.
    pub fn expand_by(&mut self, value: u32) -> Result<(), DrawingError> {
        self.ensure_mutable("expand")?;
        self.width = self.width.saturating_add(value);
        self.height = self.height.saturating_add(value);
        Ok(())
    }

    /// Grow the longer side to `length`. `Ok(false)` unless `length` is
    /// larger than the current longer side.
    pub fn expand_max_side_to(&mut self, length: u32) -> Result<bool, DrawingError> {
        self.ensure_mutable("expandMaxSideTo")?;
        Ok(self.grow_long_side(length, length))
    }

    pub fn expand_max_side_to2(
        &mut self,
        landscape_width: u32,
        portrait_height: u32,
    ) -> Result<bool, DrawingError> {
        self.ensure_mutable("expandMaxSideTo2")?;
        Ok(self.grow_long_side(landscape_width, portrait_height))
    }

    fn grow_long_side(&mut self, landscape_width: u32, portrait_height: u32) -> bool {
        if self.is_portrait() {
            if portrait_height <= self.height {
                return false;
            }
            self.width = scale_other_side(self.width, portrait_height, self.height);
            self.height = portrait_height;
        } else {
            // A zero width gives no ratio to scale by.
            if landscape_width <= self.width || self.width == 0 {
                return false;
            }
            self.height = scale_other_side(self.height, landscape_width, self.width);
            self.width = landscape_width;
        }
        true
    }

    // ------------------------------------------------------------------
    // Resizing
    // ------------------------------------------------------------------

    /// Grow (positive) or shrink (negative) both sides by `delta` pixels.
    pub fn resize_by(&mut self, delta: i64) -> Result<(), DrawingError> {
        self.ensure_mutable("resize")?;
        self.width = clamp_dimension(i64::from(self.width) + delta);
        self.height = clamp_dimension(i64::from(self.height) + delta);
        Ok(())
    }

    /// Reduce or expand so the longer side becomes `length`.
    pub fn resize_max_side_to(&mut self, length: u32) -> Result<bool, DrawingError> {
        self.resize_max_side_to2(length, length)
    }

    pub fn resize_max_side_to2(
        &mut self,
        landscape_width: u32,
        portrait_height: u32,
    ) -> Result<bool, DrawingError> {
        self.ensure_mutable("resizeMaxSideTo2")?;
        let (target, current) = if self.is_portrait() {
            (portrait_height, self.height)
        } else {
            (landscape_width, self.width)
        };
        Ok(match target.cmp(&current) {
            std::cmp::Ordering::Equal => false,
            std::cmp::Ordering::Less => self.shrink_long_side(landscape_width, portrait_height),
            std::cmp::Ordering::Greater => self.grow_long_side(landscape_width, portrait_height),
        })
    }

    /// Swap width and height.
    pub fn rotate_square(&mut self) -> Result<(), DrawingError> {
        self.ensure_mutable("rotateSquare")?;
        std::mem::swap(&mut self.width, &mut self.height);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Copy-returning contraction
    // ------------------------------------------------------------------

    /// Unchanged when `max` already contains this size, else the
    /// [`reduce_to_max_size`](Self::reduce_to_max_size) result.
    pub fn contracted_to_max_size(&self, max: Size) -> Result<Size, DrawingError> {
        let mut out = self.unfixed();
        if !max.contains(*self) {
            out.reduce_to_max_size(max)?;
        }
        Ok(out)
    }

    /// Unchanged when the long side is already within the orientation's
    /// limit, else the [`reduce_max_side_to2`](Self::reduce_max_side_to2)
    /// result.
    pub fn contracted_to_max_side(&self, landscape_width: u32, portrait_height: u32) -> Size {
        let mut out = self.unfixed();
        out.shrink_long_side(landscape_width, portrait_height);
        out
    }

    /// Short-side counterpart of [`contracted_to_max_side`](Self::contracted_to_max_side).
    pub fn contracted_to_min_side(&self, landscape_height: u32, portrait_width: u32) -> Size {
        let mut out = self.unfixed();
        out.shrink_short_side(landscape_height, portrait_width);
        out
    }

    /// Keep `percent` (1-99) of each side, floored.
    pub fn contracted_by_percent(&self, percent: u32) -> Result<Size, DrawingError> {
        if !(1..100).contains(&percent) {
            return Err(DrawingError::invalid("percent", percent, "a value between 1 and 99"));
        }
        let keep = |side: u32| (u64::from(side) * u64::from(percent) / 100) as u32;
        Ok(Self {
            width: keep(self.width),
            height: keep(self.height),
            fixed: false,
        })
    }

    // ------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------

    /// Boundary parser; `fixed` applies unless the input itself says so.
    pub fn try_parse(source: SizeSource<'_>, fixed: bool) -> Option<Self> {
        let (width, height, fixed) = match source {
            SizeSource::Square(n) => (n, n, fixed),
            SizeSource::Scalar(f) if f.is_finite() => {
                let n = f.trunc() as i64;
                (n, n, fixed)
            }
            SizeSource::Scalar(_) => return None,
            SizeSource::Text(text) => return Self::parse_text(text, fixed),
            SizeSource::Values(values) => (
                values.first().copied().unwrap_or(0),
                values.get(1).copied().unwrap_or(0),
                fixed,
            ),
            SizeSource::Record(map) => {
                let first = |keys: [&str; 3]| keys.iter().find_map(|k| record_int(map, k));
                (
                    first(["width", "Width", "0"]).unwrap_or(0),
                    first(["height", "Height", "1"]).unwrap_or(0),
                    record_int(map, "fixed").map_or(fixed, |f| f != 0),
                )
            }
        };
        let size = Self::new(width, height);
        Some(Self { fixed, ..size })
    }

    fn parse_text(text: &str, fixed: bool) -> Option<Self> {
        let digits = |s: &str| parse_digits(s, 10);
        if let Some(rest) = strip_key(text, "width=") {
            let (w, rest) = split_pair(rest, ';')?;
            let rest = strip_key(rest, "height=")?;
            let (h, marked_fixed) = match split_pair(rest, ';') {
                Some((h, flag)) if flag.eq_ignore_ascii_case("fixed=true") => (h, true),
                Some(_) => return None,
                None => (rest, false),
            };
            let size = Self::new(digits(w)?, digits(h)?);
            return Some(Self {
                fixed: fixed || marked_fixed,
                ..size
            });
        }
        let (w, h) = split_pair(text, ',')?;
        let size = Self::new(digits(w)?, digits(h)?);
        Some(Self { fixed, ..size })
    }

    pub fn to_record(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("width".into(), self.width.into());
        map.insert("height".into(), self.height.into());
        map
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "width={}; height={}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(SizeSource::Text(s), false).ok_or_else(|| {
            DrawingError::invalid("size", s, "\"width=N; height=N[; fixed=true]\" or \"N,N\"")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn size(w: i64, h: i64) -> Size {
        Size::new(w, h)
    }

    fn dims(s: Size) -> (u32, u32) {
        (s.width(), s.height())
    }

    // =========================================================================
    // Construction and state
    // =========================================================================

    #[test]
    fn negative_dimensions_clamp_to_zero() {
        assert_eq!(dims(size(-5, 10)), (0, 10));
        let mut s = size(10, 10);
        s.set_height(-1).unwrap();
        assert_eq!(s.height(), 0);
    }

    #[test]
    fn fixed_size_rejects_mutation_and_keeps_value() {
        let mut s = Size::empty(true);
        let err = s.set_width(5).unwrap_err();
        assert_eq!(
            err,
            DrawingError::FixedSize {
                operation: "width-change"
            }
        );
        assert_eq!(s.width(), 0);
    }

    #[test]
    fn fixed_size_rejects_every_mutator() {
        let mut s = Size::new_fixed(200, 100);
        assert!(s.reduce_by(1).is_err());
        assert!(s.reduce_by_percent(10).is_err());
        assert!(s.reduce_to_max_size(size(10, 10)).is_err());
        assert!(s.reduce_max_side_to(10).is_err());
        assert!(s.reduce_min_side_to2(10, 10).is_err());
        assert!(s.expand_max_side_to(400).is_err());
        assert!(s.resize_max_side_to(50).is_err());
        assert!(s.rotate_square().is_err());
        assert_eq!(dims(s), (200, 100));
    }

    #[test]
    fn unfixed_copy_is_mutable() {
        let fixed = Size::new_fixed(4, 2);
        let mut copy = fixed.unfixed();
        copy.rotate_square().unwrap();
        assert_eq!(dims(copy), (2, 4));
        assert_eq!(dims(fixed), (4, 2));
    }

    // =========================================================================
    // Checks
    // =========================================================================

    #[test]
    fn orientation() {
        assert!(size(100, 200).is_portrait());
        assert!(size(200, 100).is_landscape());
        let square = size(100, 100);
        assert!(square.is_quadratic());
        assert!(!square.is_portrait() && !square.is_landscape());
    }

    #[test]
    fn empty_when_either_side_is_zero() {
        assert!(size(0, 10).is_empty());
        assert!(size(10, 0).is_empty());
        assert!(!size(1, 1).is_empty());
    }

    #[test]
    fn contains_compares_both_axes() {
        assert!(size(100, 100).contains(size(100, 50)));
        assert!(!size(100, 100).contains(size(101, 50)));
    }

    #[test]
    fn near_quadratic_threshold() {
        assert!(size(110, 100).is_near_quadratic(0.15));
        assert!(!size(120, 100).is_near_quadratic(0.15));
        assert!(size(100, 118).is_near_quadratic(0.2));
        // Out-of-range tolerance falls back to 0.15.
        assert!(!size(120, 100).is_near_quadratic(0.9));
    }

    // =========================================================================
    // Reduction
    // =========================================================================

    #[test]
    fn reduce_to_max_size_width_constrained() {
        let mut s = size(250, 150);
        assert!(s.reduce_to_max_size(size(75, 100)).unwrap());
        // 250/75 > 150/100, so width is pinned: h = floor(75 * 150 / 250)
        assert_eq!(dims(s), (75, 45));
    }

    #[test]
    fn reduce_to_max_size_height_constrained() {
        let mut s = size(150, 250);
        assert!(s.reduce_to_max_size(size(100, 75)).unwrap());
        assert_eq!(dims(s), (45, 75));
    }

    #[test]
    fn reduce_to_max_size_equal_ratio_pins_both() {
        let mut s = size(400, 200);
        assert!(s.reduce_to_max_size(size(200, 100)).unwrap());
        assert_eq!(dims(s), (200, 100));
    }

    #[test]
    fn reduce_to_max_size_noop_when_strictly_smaller() {
        let mut s = size(50, 50);
        assert!(!s.reduce_to_max_size(size(100, 100)).unwrap());
        assert_eq!(dims(s), (50, 50));
    }

    #[test]
    fn reduce_to_max_size_exact_match_is_success() {
        let mut s = size(100, 100);
        assert!(s.reduce_to_max_size(size(100, 100)).unwrap());
        assert_eq!(dims(s), (100, 100));
    }

    #[test]
    fn reduce_to_max_size_one_axis_touching() {
        // Width equal, height smaller: still reduced (fits already, unchanged).
        let mut s = size(100, 50);
        assert!(s.reduce_to_max_size(size(100, 100)).unwrap());
        assert_eq!(dims(s), (100, 50));
    }

    #[test]
    fn reduce_to_max_size_rejects_empty_target() {
        let mut s = size(100, 100);
        assert!(s.reduce_to_max_size(size(0, 50)).is_err());
    }

    #[test]
    fn reduce_by_percent_shrinks_each_axis() {
        let mut s = size(100, 200);
        s.reduce_by_percent(10).unwrap();
        assert_eq!(dims(s), (90, 180));
    }

    #[test]
    fn reduce_by_percent_floors() {
        let mut s = size(101, 33);
        s.reduce_by_percent(50).unwrap();
        assert_eq!(dims(s), (50, 16));
    }

    #[test]
    fn reduce_by_percent_range() {
        let mut s = size(100, 100);
        assert!(s.reduce_by_percent(0).is_err());
        assert!(s.reduce_by_percent(100).is_err());
        assert_eq!(dims(s), (100, 100));
    }

    #[test]
    fn reduce_max_side_landscape() {
        let mut s = size(400, 300);
        assert!(s.reduce_max_side_to(200).unwrap());
        assert_eq!(dims(s), (200, 150));
    }

    #[test]
    fn reduce_max_side_portrait() {
        let mut s = size(300, 400);
        assert!(s.reduce_max_side_to(200).unwrap());
        assert_eq!(dims(s), (150, 200));
    }

    #[test]
    fn reduce_max_side_noop_when_within() {
        let mut s = size(400, 300);
        assert!(!s.reduce_max_side_to(400).unwrap());
        assert_eq!(dims(s), (400, 300));
    }

    #[test]
    fn reduce_max_side_quadratic_uses_landscape_value() {
        let mut s = size(400, 400);
        assert!(s.reduce_max_side_to2(100, 300).unwrap());
        assert_eq!(dims(s), (100, 100));
    }

    #[test]
    fn reduce_max_side2_portrait_uses_portrait_value() {
        let mut s = size(300, 400);
        assert!(s.reduce_max_side_to2(100, 200).unwrap());
        assert_eq!(dims(s), (150, 200));
    }

    #[test]
    fn reduce_min_side_landscape_pins_height() {
        let mut s = size(400, 200);
        assert!(s.reduce_min_side_to(100).unwrap());
        assert_eq!(dims(s), (200, 100));
    }

    #[test]
    fn reduce_min_side2_portrait_pins_width() {
        let mut s = size(200, 400);
        assert!(s.reduce_min_side_to2(50, 100).unwrap());
        assert_eq!(dims(s), (100, 200));
    }

    #[test]
    fn reduce_by_saturates() {
        let mut s = size(5, 20);
        s.reduce_by(10).unwrap();
        assert_eq!(dims(s), (0, 10));
    }

    // =========================================================================
    // Expansion and resizing
    // =========================================================================

    #[test]
    fn expand_max_side_requires_larger_target() {
        let mut s = size(200, 100);
        assert!(!s.expand_max_side_to(200).unwrap());
        assert!(!s.expand_max_side_to(150).unwrap());
        assert!(s.expand_max_side_to(400).unwrap());
        assert_eq!(dims(s), (400, 200));
    }

    #[test]
    fn expand_max_side2_portrait() {
        let mut s = size(100, 200);
        assert!(s.expand_max_side_to2(1000, 400).unwrap());
        assert_eq!(dims(s), (200, 400));
    }

    #[test]
    fn expand_zero_width_is_noop() {
        let mut s = size(0, 0);
        assert!(!s.expand_max_side_to(10).unwrap());
    }

    #[test]
    fn resize_dispatches_on_target() {
        let mut s = size(200, 100);
        assert!(!s.resize_max_side_to(200).unwrap());
        assert!(s.resize_max_side_to(100).unwrap());
        assert_eq!(dims(s), (100, 50));
        assert!(s.resize_max_side_to(400).unwrap());
        assert_eq!(dims(s), (400, 200));
    }

    #[test]
    fn resize2_landscape_compares_landscape_value() {
        let mut s = size(400, 200);
        // Portrait value larger than the width must not select expansion.
        assert!(s.resize_max_side_to2(200, 800).unwrap());
        assert_eq!(dims(s), (200, 100));
    }

    #[test]
    fn resize_by_signed_delta() {
        let mut s = size(10, 20);
        s.resize_by(5).unwrap();
        assert_eq!(dims(s), (15, 25));
        s.resize_by(-20).unwrap();
        assert_eq!(dims(s), (0, 5));
    }

    #[test]
    fn rotate_swaps() {
        let mut s = size(3, 7);
        s.rotate_square().unwrap();
        assert_eq!(dims(s), (7, 3));
    }

    // =========================================================================
    // Contraction copies
    // =========================================================================

    #[test]
    fn contracted_to_max_size_keeps_fitting_sizes() {
        let s = size(100, 50);
        assert_eq!(s.contracted_to_max_size(size(100, 100)).unwrap(), s);
        assert_eq!(
            dims(size(400, 200).contracted_to_max_size(size(100, 100)).unwrap()),
            (100, 50)
        );
    }

    #[test]
    fn contracted_to_max_side_leaves_original() {
        let s = Size::new_fixed(1000, 500);
        let out = s.contracted_to_max_side(500, 300);
        assert_eq!(dims(out), (500, 250));
        assert!(!out.is_fixed());
        assert_eq!(dims(s), (1000, 500));
    }

    #[test]
    fn contracted_to_min_side_portrait() {
        let out = size(500, 1000).contracted_to_min_side(400, 250);
        assert_eq!(dims(out), (250, 500));
        let within = size(200, 1000).contracted_to_min_side(400, 250);
        assert_eq!(dims(within), (200, 1000));
    }

    #[test]
    fn contracted_by_percent_keeps_share() {
        assert_eq!(dims(size(200, 100).contracted_by_percent(50).unwrap()), (100, 50));
        assert!(size(200, 100).contracted_by_percent(100).is_err());
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn parse_keyed_text() {
        let s = Size::try_parse(SizeSource::Text("width=640; height=480"), false).unwrap();
        assert_eq!(dims(s), (640, 480));
        assert!(!s.is_fixed());
        let f = Size::try_parse(SizeSource::Text("Width=1;Height=2; FIXED=true"), false).unwrap();
        assert_eq!(dims(f), (1, 2));
        assert!(f.is_fixed());
    }

    #[test]
    fn parse_pair_text_and_fixed_flag() {
        let s = Size::try_parse(SizeSource::Text("10, 20"), true).unwrap();
        assert_eq!(dims(s), (10, 20));
        assert!(s.is_fixed());
    }

    #[test]
    fn parse_text_rejects_malformed() {
        for t in ["", "10x20", "width=1", "width=1; height=2; fixed=no", "12345678901,1"] {
            assert!(Size::try_parse(SizeSource::Text(t), false).is_none(), "{t}");
        }
    }

    #[test]
    fn parse_scalars_make_squares() {
        assert_eq!(dims(Size::try_parse(SizeSource::Square(7), false).unwrap()), (7, 7));
        assert_eq!(dims(Size::try_parse(SizeSource::Scalar(7.9), false).unwrap()), (7, 7));
        assert!(Size::try_parse(SizeSource::Scalar(f64::NAN), false).is_none());
    }

    #[test]
    fn parse_record_key_variants() {
        let lower = json!({"width": 3, "height": 4, "fixed": 1});
        let upper = json!({"Width": 5, "Height": "6"});
        let indexed = json!({"0": 7, "1": 8});
        let s = Size::try_parse(SizeSource::Record(lower.as_object().unwrap()), false).unwrap();
        assert_eq!(dims(s), (3, 4));
        assert!(s.is_fixed());
        let u = Size::try_parse(SizeSource::Record(upper.as_object().unwrap()), false).unwrap();
        assert_eq!(dims(u), (5, 6));
        let i = Size::try_parse(SizeSource::Record(indexed.as_object().unwrap()), false).unwrap();
        assert_eq!(dims(i), (7, 8));
    }

    #[test]
    fn parse_values_defaults_missing_to_zero() {
        assert_eq!(dims(Size::try_parse(SizeSource::Values(&[9]), false).unwrap()), (9, 0));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let s = size(640, 480);
        assert_eq!(s.to_string(), "width=640; height=480");
        assert_eq!(s.to_string().parse::<Size>().unwrap(), s);
    }
}
