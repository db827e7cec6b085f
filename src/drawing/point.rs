use super::{DrawingError, Rectangle, parse_digits, record_int, split_pair};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A location with integer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Everything [`Point::try_parse`] accepts.
#[derive(Debug, Clone, Copy)]
pub enum PointSource<'a> {
    Point(Point),
    /// Yields the rectangle's location.
    Rectangle(&'a Rectangle),
    /// `"x=N; y=N"` or `"N,N"`, up to four digits per coordinate.
    Text(&'a str),
    /// Exactly two values, `[x, y]`.
    Values(&'a [i64]),
    /// Keys `x`/`y` or `X`/`Y`.
    Record(&'a Map<String, Value>),
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True at the origin.
    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    pub fn to_record(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("x".into(), self.x.into());
        map.insert("y".into(), self.y.into());
        map
    }

    pub fn try_parse(source: PointSource<'_>) -> Option<Self> {
        match source {
            PointSource::Point(p) => Some(p),
            PointSource::Rectangle(r) => Some(r.point),
            PointSource::Text(text) => Self::parse_text(text),
            PointSource::Values(values) => match values {
                [x, y] => Some(Self::new(to_coord(*x)?, to_coord(*y)?)),
                _ => None,
            },
            PointSource::Record(map) => {
                let pair = |kx: &str, ky: &str| Some((record_int(map, kx)?, record_int(map, ky)?));
                let (x, y) = pair("x", "y").or_else(|| pair("X", "Y"))?;
                Some(Self::new(to_coord(x)?, to_coord(y)?))
            }
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        if let Some(rest) = text.strip_prefix("x=") {
            let (x, rest) = split_pair(rest, ';')?;
            let y = rest.strip_prefix("y=")?;
            return Some(Self::new(
                parse_digits(x, 4)? as i32,
                parse_digits(y, 4)? as i32,
            ));
        }
        let (x, y) = split_pair(text, ',')?;
        Some(Self::new(parse_digits(x, 4)? as i32, parse_digits(y, 4)? as i32))
    }
}

fn to_coord(value: i64) -> Option<i32> {
    i32::try_from(value).ok()
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}; y={}", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = DrawingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(PointSource::Text(s))
            .ok_or_else(|| DrawingError::invalid("point", s, "\"x=N; y=N\" or \"N,N\""))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn origin_is_empty() {
        assert!(Point::default().is_empty());
        assert!(!Point::new(0, 1).is_empty());
    }

    #[test]
    fn display_format() {
        assert_eq!(Point::new(3, 14).to_string(), "x=3; y=14");
    }

    #[test]
    fn parse_keyed_text() {
        assert_eq!("x=10; y=20".parse::<Point>().unwrap(), Point::new(10, 20));
        assert_eq!("x=10;y=20".parse::<Point>().unwrap(), Point::new(10, 20));
    }

    #[test]
    fn parse_pair_text() {
        assert_eq!("5, 6".parse::<Point>().unwrap(), Point::new(5, 6));
        assert_eq!("5,6".parse::<Point>().unwrap(), Point::new(5, 6));
    }

    #[test]
    fn parse_text_rejects_malformed() {
        for s in ["", "x=1", "x=12345; y=1", "1;2", "X=1; Y=2", "1 ,2", "-1,2"] {
            assert!(Point::try_parse(PointSource::Text(s)).is_none(), "{s}");
        }
    }

    #[test]
    fn parse_values_needs_two() {
        assert_eq!(Point::try_parse(PointSource::Values(&[1, 2])), Some(Point::new(1, 2)));
        assert_eq!(Point::try_parse(PointSource::Values(&[1, 2, 3])), None);
        assert_eq!(Point::try_parse(PointSource::Values(&[1])), None);
    }

    #[test]
    fn parse_record_lower_and_upper_keys() {
        let lower = json!({"x": 4, "y": "5"});
        let upper = json!({"X": 7, "Y": 8});
        let mixed = json!({"x": 1, "Y": 2});
        assert_eq!(
            Point::try_parse(PointSource::Record(lower.as_object().unwrap())),
            Some(Point::new(4, 5))
        );
        assert_eq!(
            Point::try_parse(PointSource::Record(upper.as_object().unwrap())),
            Some(Point::new(7, 8))
        );
        assert_eq!(Point::try_parse(PointSource::Record(mixed.as_object().unwrap())), None);
    }

    #[test]
    fn parse_from_rectangle_takes_location() {
        let rect = Rectangle::init(3, 4, 10, 10);
        assert_eq!(Point::try_parse(PointSource::Rectangle(&rect)), Some(Point::new(3, 4)));
    }

    #[test]
    fn record_round_trip() {
        let p = Point::new(9, 11);
        let map = p.to_record();
        assert_eq!(Point::try_parse(PointSource::Record(&map)), Some(p));
    }
}
