//! Shape annotations: drawn by the viewer from their geometry entries.

use super::{check_size, Common};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Size};
use crate::object::Object;
use crate::page::Annotation;
use crate::dict;

fn border_style(width: f32) -> Object {
    Object::Dictionary(dict! {
        "Type" => Object::name("Border"),
        "W" => width,
        "S" => Object::name("S"),
    })
}

fn check_width(width: f32) -> Result<f32> {
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(Error::InvalidArgument(format!("border width must be non-negative, got {}", width)))
    }
}

/// An ellipse inscribed in the annotation box.
#[derive(Debug, Clone)]
pub struct CircleAnnotation {
    common: Common,
    size: Size,
    interior: Option<Color>,
    border_width: f32,
}

impl CircleAnnotation {
    /// An ellipse in a `width` x `height` box, black outline.
    pub fn new(width: f32, height: f32) -> Result<Self> {
        Ok(Self {
            common: Common::with_color(Color::BLACK),
            size: check_size("Circle", width, height)?,
            interior: None,
            border_width: 1.0,
        })
    }

    /// Fill color (`/IC`).
    pub fn with_interior_color(mut self, color: Color) -> Self {
        self.interior = Some(color);
        self
    }

    /// Outline width.
    pub fn with_border_width(mut self, width: f32) -> Result<Self> {
        self.border_width = check_width(width)?;
        Ok(self)
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let mut annotation = Annotation::new("Circle", rect);
        annotation.set("BS", border_style(self.border_width));
        if let Some(color) = self.interior {
            let (r, g, b) = color.components();
            annotation.set("IC", Object::color_array(r, g, b));
        }
        Ok(annotation)
    }
}

annotation_element!(CircleAnnotation, "CircleAnnotation");

/// Offsets `points` so their bounding box starts at the origin and returns
/// the box size.
fn normalize(points: &[Point]) -> (Vec<Point>, Size) {
    match Rect::bounding(points.iter().copied()) {
        Some(bbox) => (
            points.iter().map(|p| Point::new(p.x - bbox.x, p.y - bbox.y)).collect(),
            bbox.size(),
        ),
        None => (Vec::new(), Size::default()),
    }
}

fn flatten(points: &[Point], origin: Point) -> Object {
    Object::Array(
        points
            .iter()
            .flat_map(|p| [Object::real(origin.x + p.x), Object::real(origin.y + p.y)])
            .collect(),
    )
}

/// A straight line between two points.
///
/// The points are relative; the annotation box is their bounding box.
#[derive(Debug, Clone)]
pub struct LineAnnotation {
    common: Common,
    size: Size,
    points: Vec<Point>,
    border_width: f32,
}

impl LineAnnotation {
    /// A black line from `from` to `to`.
    pub fn new(from: Point, to: Point) -> Self {
        let (points, size) = normalize(&[from, to]);
        Self {
            common: Common::with_color(Color::BLACK),
            size,
            points,
            border_width: 1.0,
        }
    }

    /// Line width.
    pub fn with_border_width(mut self, width: f32) -> Result<Self> {
        self.border_width = check_width(width)?;
        Ok(self)
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let mut annotation = Annotation::new("Line", rect);
        annotation.set("L", flatten(&self.points, Point::new(rect.x, rect.y)));
        annotation.set("BS", border_style(self.border_width));
        Ok(annotation)
    }
}

annotation_element!(LineAnnotation, "LineAnnotation");

/// Freehand strokes, each a polyline.
#[derive(Debug, Clone)]
pub struct InkAnnotation {
    common: Common,
    size: Size,
    strokes: Vec<Vec<Point>>,
    border_width: f32,
}

impl InkAnnotation {
    /// Strokes in relative coordinates; at least one point is required.
    pub fn new(strokes: Vec<Vec<Point>>) -> Result<Self> {
        let all: Vec<Point> = strokes.iter().flatten().copied().collect();
        let Some(bbox) = Rect::bounding(all) else {
            return Err(Error::InvalidArgument("ink annotation has no points".to_string()));
        };
        let strokes = strokes
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.into_iter().map(|p| Point::new(p.x - bbox.x, p.y - bbox.y)).collect())
            .collect();
        Ok(Self {
            common: Common::with_color(Color::BLACK),
            size: bbox.size(),
            strokes,
            border_width: 1.0,
        })
    }

    /// Stroke width.
    pub fn with_border_width(mut self, width: f32) -> Result<Self> {
        self.border_width = check_width(width)?;
        Ok(self)
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let origin = Point::new(rect.x, rect.y);
        let mut annotation = Annotation::new("Ink", rect);
        annotation.set(
            "InkList",
            Object::Array(self.strokes.iter().map(|s| flatten(s, origin)).collect()),
        );
        annotation.set("BS", border_style(self.border_width));
        Ok(annotation)
    }
}

annotation_element!(InkAnnotation, "InkAnnotation");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutElement;
    use crate::page::Page;

    fn reals(object: &Object) -> Vec<f64> {
        object.as_array().unwrap().iter().filter_map(Object::as_real).collect()
    }

    #[test]
    fn test_circle_interior() {
        let mut page = Page::new();
        let mut circle = CircleAnnotation::new(30.0, 20.0).unwrap().with_interior_color(Color::BLUE);
        circle.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        let entries = page.annotations()[0].entries();
        assert_eq!(entries.get("IC"), Some(&Object::color_array(0.0, 0.0, 1.0)));
        let bs = entries.get("BS").and_then(Object::as_dict).unwrap();
        assert_eq!(bs.get("W").and_then(Object::as_real), Some(1.0));
    }

    #[test]
    fn test_line_is_placed_in_its_box() {
        let mut page = Page::new();
        let mut line = LineAnnotation::new(Point::new(40.0, 10.0), Point::new(0.0, 0.0));
        assert_eq!(line.get_size(Size::new(100.0, 100.0)), Size::new(40.0, 10.0));
        line.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        let l = page.annotations()[0].entries().get("L").unwrap();
        assert_eq!(reals(l), vec![40.0, 100.0, 0.0, 90.0]);
    }

    #[test]
    fn test_ink_strokes() {
        let mut page = Page::new();
        let mut ink = InkAnnotation::new(vec![
            vec![Point::new(10.0, 10.0), Point::new(20.0, 30.0)],
            vec![],
            vec![Point::new(15.0, 10.0)],
        ])
        .unwrap();
        ink.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        let list = page.annotations()[0].entries().get("InkList").and_then(Object::as_array).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(reals(&list[0]), vec![0.0, 80.0, 10.0, 100.0]);
        assert!(InkAnnotation::new(vec![vec![]]).is_err());
    }
}
