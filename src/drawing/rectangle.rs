use super::{DrawingError, Gravity, Point, Size, parse_digits, record_int, split_pair};
use super::gravity::{Horizontal, Vertical};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// An axis-aligned rectangle: a location plus a size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rectangle {
    #[serde(flatten)]
    pub point: Point,
    #[serde(flatten)]
    pub size: Size,
}

/// Everything [`Rectangle::try_parse`] accepts.
#[derive(Debug, Clone, Copy)]
pub enum RectangleSource<'a> {
    Rectangle(Rectangle),
    /// `"x=N; y=N; width=N; height=N"`, up to four digits each.
    Text(&'a str),
    /// Keys `x`, `y`, `width`, `height` in any case; all four required.
    Record(&'a Map<String, Value>),
}

impl Rectangle {
    pub fn new(point: Point, size: Size) -> Self {
        Self { point, size }
    }

    pub fn init(x: i32, y: i32, width: i64, height: i64) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// A rectangle at the origin covering `size`.
    pub fn from_size(size: Size) -> Self {
        Self::new(Point::default(), size)
    }

    pub fn left(&self) -> i64 {
        i64::from(self.point.x)
    }

    pub fn top(&self) -> i64 {
        i64::from(self.point.y)
    }

    pub fn right(&self) -> i64 {
        self.left() + i64::from(self.size.width())
    }

    pub fn bottom(&self) -> i64 {
        self.top() + i64::from(self.size.height())
    }

    pub fn width(&self) -> u32 {
        self.size.width()
    }

    pub fn height(&self) -> u32 {
        self.size.height()
    }

    /// True when `other` lies entirely inside, edges included.
    pub fn contains(&self, other: &Rectangle) -> bool {
        self.left() <= other.left()
            && other.right() <= self.right()
            && self.top() <= other.top()
            && other.bottom() <= self.bottom()
    }

    /// Half-open test: the right and bottom edges are outside.
    pub fn contains_location(&self, location: impl Into<Point>) -> bool {
        let p = location.into();
        let (x, y) = (i64::from(p.x), i64::from(p.y));
        self.left() <= x && x < self.right() && self.top() <= y && y < self.bottom()
    }

    /// Capacity check that ignores the location.
    pub fn contains_size(&self, size: Size) -> bool {
        self.size.contains(size)
    }

    /// The overlapping area. Rectangles that only touch yield a zero-sized
    /// intersection; disjoint ones yield `None`.
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        if right >= left && bottom >= top {
            Some(Self::from_edges(left, top, right, bottom))
        } else {
            None
        }
    }

    /// The smallest rectangle enclosing both.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Self::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self::new(
            Point::new(left as i32, top as i32),
            Size::new(right - left, bottom - top),
        )
    }

    /// Empty only at the origin with both sides below 1. A zero-sized
    /// rectangle anywhere else is not empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty() && self.size.width() < 1 && self.size.height() < 1
    }

    /// A `width`×`height` region of `container` placed by `gravity`.
    ///
    /// The requested size is clamped to the container. Centre anchors use
    /// `floor((container - inner) / 2)`, far anchors `container - inner`.
    pub fn anchored(
        container: Size,
        width: i64,
        height: i64,
        gravity: Gravity,
    ) -> Result<Rectangle, DrawingError> {
        if width <= 0 {
            return Err(DrawingError::invalid("width", width, "a positive crop width"));
        }
        if height <= 0 {
            return Err(DrawingError::invalid("height", height, "a positive crop height"));
        }
        let w = width.min(i64::from(container.width()));
        let h = height.min(i64::from(container.height()));
        let free_x = i64::from(container.width()) - w;
        let free_y = i64::from(container.height()) - h;
        let x = match gravity.horizontal() {
            Horizontal::Left => 0,
            Horizontal::Center => free_x / 2,
            Horizontal::Right => free_x,
        };
        let y = match gravity.vertical() {
            Vertical::Top => 0,
            Vertical::Middle => free_y / 2,
            Vertical::Bottom => free_y,
        };
        Ok(Self::init(x as i32, y as i32, w, h))
    }

    /// The largest square region of `container` placed by `gravity`.
    pub fn anchored_square(container: Size, gravity: Gravity) -> Result<Rectangle, DrawingError> {
        let side = i64::from(container.width().min(container.height()));
        Self::anchored(container, side, side, gravity)
    }

    pub fn to_record(&self) -> Map<String, Value> {
        let mut map = self.point.to_record();
        map.extend(self.size.to_record());
        map
    }

    pub fn try_parse(source: RectangleSource<'_>) -> Option<Self> {
        match source {
            RectangleSource::Rectangle(r) => Some(r),
            RectangleSource::Text(text) => Self::parse_text(text),
            RectangleSource::Record(map) => {
                let get = |key: &str| {
                    map.iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(key))
                        .and_then(|(k, _)| record_int(map, k))
                };
                Some(Self::init(
                    i32::try_from(get("x")?).ok()?,
                    i32::try_from(get("y")?).ok()?,
                    get("width")?,
                    get("height")?,
                ))
            }
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        let mut rest = text;
        let mut values = [0i64; 4];
        for (i, key) in ["x=", "y=", "width=", "height="].iter().enumerate() {
            let body = rest.strip_prefix(key)?;
            let value = if i < 3 {
                let (value, tail) = split_pair(body, ';')?;
                rest = tail;
                value
            } else {
                body
            };
            values[i] = parse_digits(value, 4)?;
        }
        let [x, y, width, height] = values;
        Some(Self::init(x as i32, y as i32, width, height))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}", self.point, self.size)
    }
}

impl FromStr for Rectangle {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(RectangleSource::Text(s))
            .ok_or_else(|| DrawingError::invalid("rectangle", s, "\"x=N; y=N; width=N; height=N\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn edges() {
        let r = Rectangle::init(2, 3, 10, 20);
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (2, 3, 12, 23));
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let outer = Rectangle::init(0, 0, 10, 10);
        assert!(outer.contains(&Rectangle::init(0, 0, 10, 10)));
        assert!(outer.contains(&Rectangle::init(2, 2, 8, 8)));
        assert!(!outer.contains(&Rectangle::init(2, 2, 9, 8)));
    }

    #[test]
    fn contains_location_is_half_open() {
        let r = Rectangle::init(0, 0, 10, 10);
        assert!(r.contains_location((0, 0)));
        assert!(r.contains_location((9, 9)));
        assert!(!r.contains_location((10, 5)));
        assert!(!r.contains_location(Point::new(5, 10)));
    }

    #[test]
    fn contains_size_ignores_location() {
        let r = Rectangle::init(100, 100, 10, 10);
        assert!(r.contains_size(Size::new(10, 5)));
        assert!(!r.contains_size(Size::new(11, 5)));
    }

    #[test]
    fn intersect_overlapping() {
        let a = Rectangle::init(0, 0, 10, 10);
        let b = Rectangle::init(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rectangle::init(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_touching_is_zero_sized() {
        let a = Rectangle::init(0, 0, 10, 10);
        let b = Rectangle::init(10, 0, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rectangle::init(10, 0, 0, 10)));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Rectangle::init(0, 0, 10, 10);
        let b = Rectangle::init(20, 20, 5, 5);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn union_is_bounding_box() {
        let a = Rectangle::init(0, 5, 10, 10);
        let b = Rectangle::init(5, 0, 10, 10);
        assert_eq!(a.union(&b), Rectangle::init(0, 0, 15, 15));
    }

    #[test]
    fn empty_requires_origin() {
        assert!(!Rectangle::init(0, 0, 10, 10).is_empty());
        assert!(!Rectangle::init(5, 5, 0, 0).is_empty());
        assert!(Rectangle::init(0, 0, 0, 0).is_empty());
    }

    // =========================================================================
    // Anchoring
    // =========================================================================

    #[test]
    fn anchored_center() {
        let r = Rectangle::anchored(Size::new(166, 100), 75, 100, Gravity::MiddleCenter).unwrap();
        assert_eq!(r, Rectangle::init(45, 0, 75, 100));
    }

    #[test]
    fn anchored_corners() {
        let c = Size::new(200, 100);
        assert_eq!(
            Rectangle::anchored(c, 50, 40, Gravity::TopLeft).unwrap(),
            Rectangle::init(0, 0, 50, 40)
        );
        assert_eq!(
            Rectangle::anchored(c, 50, 40, Gravity::BottomRight).unwrap(),
            Rectangle::init(150, 60, 50, 40)
        );
        assert_eq!(
            Rectangle::anchored(c, 50, 40, Gravity::MiddleLeft).unwrap(),
            Rectangle::init(0, 30, 50, 40)
        );
    }

    #[test]
    fn anchored_clamps_to_container() {
        let r = Rectangle::anchored(Size::new(100, 50), 500, 500, Gravity::BottomCenter).unwrap();
        assert_eq!(r, Rectangle::init(0, 0, 100, 50));
    }

    #[test]
    fn anchored_rejects_non_positive() {
        assert!(Rectangle::anchored(Size::new(100, 50), 0, 10, Gravity::TopLeft).is_err());
        assert!(Rectangle::anchored(Size::new(100, 50), 10, -1, Gravity::TopLeft).is_err());
    }

    #[test]
    fn anchored_square_uses_short_side() {
        let r = Rectangle::anchored_square(Size::new(300, 100), Gravity::TopCenter).unwrap();
        assert_eq!(r, Rectangle::init(100, 0, 100, 100));
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn display_and_parse() {
        let r = Rectangle::init(1, 2, 3, 4);
        assert_eq!(r.to_string(), "x=1; y=2; width=3; height=4");
        assert_eq!(r.to_string().parse::<Rectangle>().unwrap(), r);
        assert_eq!("x=1;y=2;width=3;height=4".parse::<Rectangle>().unwrap(), r);
    }

    #[test]
    fn parse_text_rejects_malformed() {
        for t in ["", "x=1; y=2; width=3", "x=1; y=2; width=3; height=12345", "1,2,3,4"] {
            assert!(Rectangle::try_parse(RectangleSource::Text(t)).is_none(), "{t}");
        }
    }

    #[test]
    fn parse_record_is_case_insensitive() {
        let v = json!({"X": 1, "y": 2, "WIDTH": 3, "Height": 4});
        assert_eq!(
            Rectangle::try_parse(RectangleSource::Record(v.as_object().unwrap())),
            Some(Rectangle::init(1, 2, 3, 4))
        );
        let missing = json!({"x": 1, "y": 2, "width": 3});
        assert_eq!(Rectangle::try_parse(RectangleSource::Record(missing.as_object().unwrap())), None);
    }

    #[test]
    fn record_round_trip() {
        let r = Rectangle::init(7, 8, 9, 10);
        assert_eq!(Rectangle::try_parse(RectangleSource::Record(&r.to_record())), Some(r));
    }
}
