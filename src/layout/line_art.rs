//! Ready-made shapes, each fitted to a `width` x `height` box at the origin.

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::layout::Shape;
use std::f32::consts::PI;

/// Factory for common [`Shape`]s.
pub struct LineArt;

fn check_box(width: f32, height: f32) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("line art needs a positive size, got {}x{}", width, height)))
    }
}

/// Points on an ellipse inscribed in the box, starting at the top.
fn radial(width: f32, height: f32, count: usize, radius: impl Fn(usize) -> f32) -> Vec<Point> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    (0..count)
        .map(|i| {
            let angle = PI / 2.0 + 2.0 * PI * i as f32 / count as f32;
            let r = radius(i);
            Point::new(cx + cx * r * angle.cos(), cy + cy * r * angle.sin())
        })
        .collect()
}

/// Stretch (non-uniformly) so the bounding box is exactly `width` x `height`.
fn fitted(points: Vec<Point>, width: f32, height: f32) -> Shape {
    let shape = Shape::new(points);
    let Some(bbox) = shape.bounding_box() else {
        return shape;
    };
    let sx = if bbox.width > 0.0 { width / bbox.width } else { 1.0 };
    let sy = if bbox.height > 0.0 { height / bbox.height } else { 1.0 };
    shape.translate_to_origin().scale_by(sx, sy)
}

impl LineArt {
    /// An axis-aligned rectangle.
    pub fn rectangle(width: f32, height: f32) -> Result<Shape> {
        check_box(width, height)?;
        Ok(Shape::new(vec![
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ]))
    }

    /// An isosceles triangle pointing up.
    pub fn triangle(width: f32, height: f32) -> Result<Shape> {
        check_box(width, height)?;
        Ok(Shape::new(vec![
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width / 2.0, height),
        ]))
    }

    /// A regular polygon with `sides` corners, first corner at the top.
    pub fn regular_polygon(width: f32, height: f32, sides: usize) -> Result<Shape> {
        check_box(width, height)?;
        if sides < 3 {
            return Err(Error::InvalidArgument(format!("a polygon needs at least 3 sides, got {}", sides)));
        }
        Ok(fitted(radial(width, height, sides, |_| 1.0), width, height))
    }

    /// A star with `points` tips.
    pub fn star(width: f32, height: f32, points: usize) -> Result<Shape> {
        check_box(width, height)?;
        if points < 3 {
            return Err(Error::InvalidArgument(format!("a star needs at least 3 points, got {}", points)));
        }
        let outline = radial(width, height, points * 2, |i| if i % 2 == 0 { 1.0 } else { 0.4 });
        Ok(fitted(outline, width, height))
    }

    /// An arrow pointing up: a triangular head over a shaft half as wide.
    pub fn arrow_up(width: f32, height: f32) -> Result<Shape> {
        check_box(width, height)?;
        let (w, h) = (width, height);
        Ok(Shape::new(vec![
            Point::new(w * 0.25, 0.0),
            Point::new(w * 0.75, 0.0),
            Point::new(w * 0.75, h * 0.5),
            Point::new(w, h * 0.5),
            Point::new(w * 0.5, h),
            Point::new(0.0, h * 0.5),
            Point::new(w * 0.25, h * 0.5),
        ]))
    }

    /// An arrow pointing down.
    pub fn arrow_down(width: f32, height: f32) -> Result<Shape> {
        Ok(Self::arrow_up(width, height)?.mirror_vertically())
    }

    /// An arrow pointing right.
    pub fn arrow_right(width: f32, height: f32) -> Result<Shape> {
        check_box(width, height)?;
        let up = Self::arrow_up(height, width)?;
        Ok(up.rotate(-PI / 2.0).translate_to_origin())
    }

    /// An arrow pointing left.
    pub fn arrow_left(width: f32, height: f32) -> Result<Shape> {
        Ok(Self::arrow_right(width, height)?.mirror_horizontally())
    }

    /// A plus-shaped cross with bars a third of the box thick.
    pub fn cross(width: f32, height: f32) -> Result<Shape> {
        check_box(width, height)?;
        let (a, b) = (width / 3.0, 2.0 * width / 3.0);
        let (c, d) = (height / 3.0, 2.0 * height / 3.0);
        Ok(Shape::new(vec![
            Point::new(a, 0.0),
            Point::new(b, 0.0),
            Point::new(b, c),
            Point::new(width, c),
            Point::new(width, d),
            Point::new(b, d),
            Point::new(b, height),
            Point::new(a, height),
            Point::new(a, d),
            Point::new(0.0, d),
            Point::new(0.0, c),
            Point::new(a, c),
        ]))
    }

    /// A heart, sampled from the classic parametric curve.
    pub fn heart(width: f32, height: f32) -> Result<Shape> {
        check_box(width, height)?;
        let outline = (0..64)
            .map(|i| {
                let t = 2.0 * PI * i as f32 / 64.0;
                let x = 16.0 * t.sin().powi(3);
                let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
                Point::new(x, y)
            })
            .collect();
        Ok(fitted(outline, width, height))
    }

    /// A droplet: a round bottom tapering to a point at the top.
    pub fn droplet(width: f32, height: f32) -> Result<Shape> {
        check_box(width, height)?;
        let mut outline = vec![Point::new(0.0, 2.0)];
        // Lower three quarters of a unit circle, from the right tangent
        // point round the bottom to the left one.
        for i in 0..=32 {
            let angle = PI / 4.0 - 1.5 * PI * i as f32 / 32.0;
            outline.push(Point::new(angle.cos(), angle.sin()));
        }
        Ok(fitted(outline, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Rect;
    use crate::layout::LayoutElement;
    use crate::page::Page;

    fn assert_fits(shape: &Shape, width: f32, height: f32) {
        let bbox = shape.bounding_box().unwrap();
        assert!(bbox.x.abs() < 1e-3 && bbox.y.abs() < 1e-3, "{:?}", bbox);
        assert!((bbox.width - width).abs() < 1e-2, "{:?}", bbox);
        assert!((bbox.height - height).abs() < 1e-2, "{:?}", bbox);
    }

    #[test]
    fn test_every_shape_fills_its_box() {
        let (w, h) = (40.0, 20.0);
        assert_fits(&LineArt::rectangle(w, h).unwrap(), w, h);
        assert_fits(&LineArt::triangle(w, h).unwrap(), w, h);
        assert_fits(&LineArt::regular_polygon(w, h, 5).unwrap(), w, h);
        assert_fits(&LineArt::star(w, h, 5).unwrap(), w, h);
        assert_fits(&LineArt::arrow_up(w, h).unwrap(), w, h);
        assert_fits(&LineArt::arrow_down(w, h).unwrap(), w, h);
        assert_fits(&LineArt::arrow_left(w, h).unwrap(), w, h);
        assert_fits(&LineArt::arrow_right(w, h).unwrap(), w, h);
        assert_fits(&LineArt::cross(w, h).unwrap(), w, h);
        assert_fits(&LineArt::heart(w, h).unwrap(), w, h);
        assert_fits(&LineArt::droplet(w, h).unwrap(), w, h);
    }

    #[test]
    fn test_point_counts() {
        assert_eq!(LineArt::regular_polygon(10.0, 10.0, 6).unwrap().polygons()[0].len(), 6);
        assert_eq!(LineArt::star(10.0, 10.0, 5).unwrap().polygons()[0].len(), 10);
        assert_eq!(LineArt::cross(9.0, 9.0).unwrap().polygons()[0].len(), 12);
    }

    #[test]
    fn test_arrow_tips() {
        let up = LineArt::arrow_up(10.0, 20.0).unwrap();
        assert!(up.polygons()[0].contains(&Point::new(5.0, 20.0)));
        let down = LineArt::arrow_down(10.0, 20.0).unwrap();
        assert!(down.polygons()[0].contains(&Point::new(5.0, 0.0)));
        let right = LineArt::arrow_right(20.0, 10.0).unwrap();
        let tip = right.polygons()[0]
            .iter()
            .copied()
            .fold(Point::new(f32::MIN, 0.0), |a, b| if b.x > a.x { b } else { a });
        assert!((tip.y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(LineArt::rectangle(-1.0, 5.0).is_err());
        assert!(LineArt::regular_polygon(5.0, 5.0, 2).is_err());
        assert!(LineArt::star(5.0, 5.0, 1).is_err());
    }

    #[test]
    fn test_paints_like_a_shape() {
        let mut page = Page::new();
        let mut heart = LineArt::heart(30.0, 30.0).unwrap().with_fill_color(Color::RED);
        heart.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        assert!(page.content_stream().as_bytes().ends_with(b"B\nQ\n"));
    }
}
