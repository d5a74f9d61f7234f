//! Positioned characters.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

impl From<[f64; 4]> for Rect {
    fn from([x0, y0, x1, y1]: [f64; 4]) -> Self {
        Rect::new(x0, y0, x1, y1)
    }
}

impl From<Rect> for [f64; 4] {
    fn from(rect: Rect) -> Self {
        [rect.x0, rect.y0, rect.x1, rect.y1]
    }
}

/// One character of normalized page text.
///
/// Synthetic separators have no bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Char {
    pub c: char,
    pub bbox: Option<Rect>,
}

impl Char {
    pub fn new(c: char, bbox: Option<Rect>) -> Self {
        Char { c, bbox }
    }

    pub fn separator() -> Self {
        Char { c: ' ', bbox: None }
    }
}

/// Union of the boxes of `chars`, or `None` when no char has a box.
pub fn bounding_rect(chars: &[Char]) -> Option<Rect> {
    chars
        .iter()
        .filter_map(|ch| ch.bbox)
        .reduce(|acc, bbox| acc.union(&bbox))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_rect_skips_separators() {
        let chars = [
            Char::new('a', Some(Rect::new(10.0, 5.0, 15.0, 12.0))),
            Char::separator(),
            Char::new('b', Some(Rect::new(16.0, 4.0, 20.0, 11.0))),
        ];

        assert_eq!(
            bounding_rect(&chars),
            Some(Rect::new(10.0, 4.0, 20.0, 12.0))
        );
        assert_eq!(bounding_rect(&[Char::separator()]), None);
    }

    #[test]
    fn test_serde_as_array() {
        let rect: Rect = serde_json::from_str("[1.0, 2.0, 3.0, 4.5]").unwrap();
        assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 4.5));
        assert_eq!(serde_json::to_string(&rect).unwrap(), "[1.0,2.0,3.0,4.5]");
        assert!(!rect.is_empty());
        assert!(Rect::new(1.0, 1.0, 1.0, 2.0).is_empty());
    }
}
