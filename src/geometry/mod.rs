//! Geometric primitives in PDF user space.
//!
//! User space has its origin in the bottom-left corner of the page and the
//! y-axis pointing up; one unit is one point (1/72 inch).

/// Tolerance used when comparing layout measurements.
pub const EPSILON: f32 = 1e-3;

/// A 2D point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use quire::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether this size fits inside `other`, within [`EPSILON`].
    ///
    /// ```
    /// use quire::geometry::Size;
    ///
    /// assert!(Size::new(100.0, 50.0).fits_in(&Size::new(100.0, 50.0)));
    /// assert!(!Size::new(100.5, 50.0).fits_in(&Size::new(100.0, 50.0)));
    /// ```
    pub fn fits_in(&self, other: &Size) -> bool {
        self.width <= other.width + EPSILON && self.height <= other.height + EPSILON
    }

    pub(crate) fn as_tuple(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// A rectangle in user space, anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the lower-left corner
    pub x: f32,
    /// Y coordinate of the lower-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use quire::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.top(), 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use quire::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Size of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rectangle entirely contains another one, within [`EPSILON`].
    ///
    /// ```
    /// use quire::geometry::Rect;
    ///
    /// let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(outer.contains(&Rect::new(10.0, 10.0, 90.0, 90.0)));
    /// assert!(!outer.contains(&Rect::new(10.0, 10.0, 95.0, 90.0)));
    /// ```
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left() - EPSILON
            && other.bottom() >= self.bottom() - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.top() <= self.top() + EPSILON
    }

    /// Check if a point lies inside the rectangle.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.bottom() && p.y <= self.top()
    }

    /// Shrink the rectangle by per-side insets (top, right, bottom, left).
    ///
    /// Width and height never go below zero.
    pub fn inset(&self, top: f32, right: f32, bottom: f32, left: f32) -> Rect {
        Rect::new(
            self.x + left,
            self.y + bottom,
            (self.width - left - right).max(0.0),
            (self.height - top - bottom).max(0.0),
        )
    }

    /// Compute the smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.bottom().min(other.bottom());
        let x1 = self.right().max(other.right());
        let y1 = self.top().max(other.top());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Bounding box of a set of points, or `None` when empty.
    pub fn bounding(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in iter {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Rect::from_points(x0, y0, x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges_are_y_up() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 20.0);
        assert_eq!(r.top(), 60.0);
    }

    #[test]
    fn test_inset() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0).inset(10.0, 5.0, 20.0, 15.0);
        assert_eq!(r, Rect::new(15.0, 20.0, 80.0, 70.0));
        let tiny = Rect::new(0.0, 0.0, 10.0, 10.0).inset(20.0, 20.0, 20.0, 20.0);
        assert_eq!(tiny.width, 0.0);
        assert_eq!(tiny.height, 0.0);
    }

    #[test]
    fn test_bounding() {
        let b = Rect::bounding(vec![Point::new(1.0, 5.0), Point::new(-2.0, 3.0), Point::new(4.0, -1.0)]).unwrap();
        assert_eq!(b, Rect::new(-2.0, -1.0, 6.0, 6.0));
        assert!(Rect::bounding(Vec::<Point>::new()).is_none());
    }

    #[test]
    fn test_union_and_center() {
        let u = Rect::new(0.0, 0.0, 10.0, 10.0).union(&Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(u, Rect::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(u.center(), Point::new(7.5, 7.5));
    }

    #[test]
    fn test_point_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(&Point::new(3.0, 4.0)), 5.0);
    }
}
