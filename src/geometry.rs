use serde::{Deserialize, Serialize};

/// Top-left canvas coordinates of a node. The only geometric value that is
/// ever persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with the six edge accessors the snap and arrange
/// code works in terms of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Strict interior overlap. Rectangles that merely share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Bounding box of a rectangle set. `None` for an empty set so callers can
/// collapse the zero-node case without a sentinel rect.
pub fn bounding_box<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    let mut iter = rects.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, rect| acc.union(&rect)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_centers() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.center_x(), 60.0);
        assert_eq!(rect.center_y(), 40.0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn bounding_box_covers_all() {
        let rects = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(40.0, -5.0, 10.0, 10.0),
            Rect::new(20.0, 30.0, 5.0, 5.0),
        ];
        let bbox = bounding_box(rects).unwrap();
        assert_eq!(bbox.left(), 0.0);
        assert_eq!(bbox.top(), -5.0);
        assert_eq!(bbox.right(), 50.0);
        assert_eq!(bbox.bottom(), 35.0);
    }

    #[test]
    fn bounding_box_of_nothing() {
        assert!(bounding_box(Vec::new()).is_none());
    }
}
