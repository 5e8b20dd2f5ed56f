//! Vector shapes: one or more polygons with stroke and fill.
//!
//! Transformations (`scale_by`, `rotate`, `mirror_*`, `smooth`, ...) are
//! pure and return a new [`Shape`]. When painted, a shape's bounding box is
//! moved to the lower-left corner of its content area.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{LayoutBox, LayoutElement};
use crate::page::{ExtGState, Page};
use crate::writer::ContentStreamBuilder;

/// Stroke and fill settings shared by shapes and maps.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathStyle {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub line_width: f32,
    pub dash: Vec<f32>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke: Some(Color::BLACK),
            fill: None,
            line_width: 1.0,
            dash: Vec::new(),
        }
    }
}

/// Emit `polygons` as subpaths, mapped through `map`, then paint them with
/// `S`, `f` or `B`. Nothing is emitted without a stroke or fill color.
pub(crate) fn emit_polygons(
    ops: &mut ContentStreamBuilder,
    polygons: &[Vec<Point>],
    style: &PathStyle,
    closed: bool,
    map: impl Fn(Point) -> Point,
) {
    if style.stroke.is_none() && style.fill.is_none() {
        return;
    }
    if let Some(color) = style.stroke {
        ops.set_stroke_color(color).set_line_width(style.line_width);
        if !style.dash.is_empty() {
            ops.set_dash_pattern(style.dash.clone(), 0.0);
        }
    }
    if let Some(color) = style.fill {
        ops.set_fill_color(color);
    }
    for polygon in polygons.iter().filter(|p| !p.is_empty()) {
        let start = map(polygon[0]);
        ops.move_to(start.x, start.y);
        for point in &polygon[1..] {
            let p = map(*point);
            ops.line_to(p.x, p.y);
        }
        if closed {
            ops.close_path();
        }
        match (style.stroke.is_some(), style.fill.is_some() && closed) {
            (true, true) => ops.fill_stroke(),
            (false, true) => ops.fill(),
            (true, false) => ops.stroke(),
            (false, false) => ops.end_path(),
        };
    }
}

/// One polygon or several, painted with optional stroke and fill.
#[derive(Debug, Clone)]
pub struct Shape {
    layout: LayoutBox,
    polygons: Vec<Vec<Point>>,
    style: PathStyle,
    fill_opacity: Option<f32>,
    closed: bool,
}

impl Shape {
    /// A closed polygon, stroked in black.
    pub fn new(points: Vec<Point>) -> Self {
        Self::from_polygons(vec![points])
    }

    /// Several closed polygons sharing one style.
    pub fn from_polygons(polygons: Vec<Vec<Point>>) -> Self {
        Self {
            layout: LayoutBox::default(),
            polygons,
            style: PathStyle::default(),
            fill_opacity: None,
            closed: true,
        }
    }

    /// Leave the path open (a polyline). Open paths are never filled.
    pub fn open(mut self) -> Self {
        self.closed = false;
        self
    }

    /// Stroke color.
    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.style.stroke = Some(color);
        self
    }

    /// Do not stroke.
    pub fn without_stroke(mut self) -> Self {
        self.style.stroke = None;
        self
    }

    /// Fill color.
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.style.fill = Some(color);
        self
    }

    /// Stroke width in points; must not be negative.
    pub fn with_line_width(mut self, width: f32) -> Result<Self> {
        if !width.is_finite() || width < 0.0 {
            return Err(Error::InvalidArgument(format!("line width must not be negative, got {}", width)));
        }
        self.style.line_width = width;
        Ok(self)
    }

    /// Stroke dash pattern; empty for solid.
    pub fn with_dash_pattern(mut self, pattern: Vec<f32>) -> Self {
        self.style.dash = pattern;
        self
    }

    /// Fill opacity in 0.0..=1.0, applied through a graphics state.
    pub fn with_fill_opacity(mut self, opacity: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(Error::InvalidArgument(format!("opacity must be in 0..=1, got {}", opacity)));
        }
        self.fill_opacity = Some(opacity);
        Ok(self)
    }

    /// The polygons.
    pub fn polygons(&self) -> &[Vec<Point>] {
        &self.polygons
    }

    /// Stroke color, if stroked.
    pub fn stroke_color(&self) -> Option<Color> {
        self.style.stroke
    }

    /// Fill color, if filled.
    pub fn fill_color(&self) -> Option<Color> {
        self.style.fill
    }

    /// Smallest rectangle containing every point.
    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::bounding(self.polygons.iter().flatten().copied())
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Shape {
        let mut shape = self.clone();
        shape.polygons = self
            .polygons
            .iter()
            .map(|polygon| polygon.iter().map(|p| f(*p)).collect())
            .collect();
        shape.layout.invalidate();
        shape
    }

    /// Scale around the origin.
    pub fn scale_by(&self, sx: f32, sy: f32) -> Shape {
        self.map_points(|p| Point::new(p.x * sx, p.y * sy))
    }

    /// Scale uniformly so the bounding box fits `size`, then move it to the origin.
    pub fn scale_to_fit(&self, size: Size) -> Shape {
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        let sx = if bbox.width > 0.0 { size.width / bbox.width } else { f32::INFINITY };
        let sy = if bbox.height > 0.0 { size.height / bbox.height } else { f32::INFINITY };
        let s = sx.min(sy);
        let s = if s.is_finite() { s } else { 1.0 };
        self.translate_to_origin().scale_by(s, s)
    }

    /// Move so the bounding box starts at (0, 0).
    pub fn translate_to_origin(&self) -> Shape {
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        self.map_points(|p| Point::new(p.x - bbox.x, p.y - bbox.y))
    }

    /// Rotate counter-clockwise by `radians` around the bounding box center.
    pub fn rotate(&self, radians: f32) -> Shape {
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        let c = bbox.center();
        let (sin, cos) = radians.sin_cos();
        self.map_points(|p| {
            let (dx, dy) = (p.x - c.x, p.y - c.y);
            Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos)
        })
    }

    /// Flip left to right within the bounding box.
    pub fn mirror_horizontally(&self) -> Shape {
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        self.map_points(|p| Point::new(bbox.left() + bbox.right() - p.x, p.y))
    }

    /// Flip top to bottom within the bounding box.
    pub fn mirror_vertically(&self) -> Shape {
        let Some(bbox) = self.bounding_box() else {
            return self.clone();
        };
        self.map_points(|p| Point::new(p.x, bbox.bottom() + bbox.top() - p.y))
    }

    /// One round of Chaikin corner cutting.
    pub fn smooth(&self) -> Shape {
        let mut shape = self.clone();
        shape.polygons = self.polygons.iter().map(|p| chaikin(p, self.closed)).collect();
        shape.layout.invalidate();
        shape
    }
}

fn chaikin(points: &[Point], closed: bool) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let cut = |a: Point, b: Point| {
        (
            Point::new(0.75 * a.x + 0.25 * b.x, 0.75 * a.y + 0.25 * b.y),
            Point::new(0.25 * a.x + 0.75 * b.x, 0.25 * a.y + 0.75 * b.y),
        )
    };
    let mut out = Vec::with_capacity(points.len() * 2);
    let edges = if closed { points.len() } else { points.len() - 1 };
    if !closed {
        out.push(points[0]);
    }
    for i in 0..edges {
        let (q, r) = cut(points[i], points[(i + 1) % points.len()]);
        out.push(q);
        out.push(r);
    }
    if !closed {
        out.push(points[points.len() - 1]);
    }
    out
}

impl LayoutElement for Shape {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "Shape"
    }

    fn content_size(&self, _available: Size) -> Size {
        self.bounding_box().map_or(Size::default(), |b| b.size())
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        let Some(bbox) = self.bounding_box() else {
            return Ok(());
        };
        let mut ops = ContentStreamBuilder::new();
        if let (Some(opacity), Some(_)) = (self.fill_opacity, self.style.fill) {
            let alias = page.register_ext_gstate(ExtGState::fill_opacity(opacity));
            ops.set_ext_gstate(&alias);
        }
        let (dx, dy) = (area.x - bbox.x, area.y - bbox.y);
        emit_polygons(&mut ops, &self.polygons, &self.style, self.closed, |p| {
            Point::new(p.x + dx, p.y + dy)
        });
        page.content_stream_mut().append(&ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Shape {
        Shape::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ])
    }

    fn content(page: &Page) -> String {
        String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned()
    }

    #[test]
    fn test_paint_operator_follows_colors() {
        let mut page = Page::new();
        square().paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        assert!(content(&page).contains("h\nS\n"));

        let mut page = Page::new();
        square()
            .without_stroke()
            .with_fill_color(Color::RED)
            .paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page)
            .unwrap();
        assert!(content(&page).contains("h\nf\n"));

        let mut page = Page::new();
        square()
            .with_fill_color(Color::RED)
            .paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page)
            .unwrap();
        assert!(content(&page).contains("h\nB\n"));
    }

    #[test]
    fn test_translated_into_area() {
        let mut page = Page::new();
        let mut shape = square();
        shape.paint(Rect::new(50.0, 50.0, 100.0, 100.0), &mut page).unwrap();
        // Top alignment puts the 10pt square at y = 140.
        assert!(content(&page).contains("50 140 m\n60 140 l\n"));
    }

    #[test]
    fn test_scale_to_fit_keeps_aspect() {
        let wide = Shape::new(vec![Point::new(5.0, 5.0), Point::new(25.0, 5.0), Point::new(25.0, 15.0)]);
        let fitted = wide.scale_to_fit(Size::new(100.0, 100.0));
        let bbox = fitted.bounding_box().unwrap();
        assert_eq!(bbox, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let bar = Shape::new(vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(20.0, 10.0), Point::new(0.0, 10.0)]);
        let bbox = bar.rotate(std::f32::consts::FRAC_PI_2).bounding_box().unwrap();
        assert!((bbox.width - 10.0).abs() < 1e-4);
        assert!((bbox.height - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_mirror() {
        let tri = Shape::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 5.0)]);
        let m = tri.mirror_horizontally();
        assert_eq!(m.polygons()[0][0], Point::new(10.0, 0.0));
        let v = tri.mirror_vertically();
        assert_eq!(v.polygons()[0][2], Point::new(0.0, 0.0));
        assert_eq!(tri.polygons()[0][0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_smooth_doubles_points() {
        let smoothed = square().smooth();
        assert_eq!(smoothed.polygons()[0].len(), 8);
        assert_eq!(smoothed.polygons()[0][0], Point::new(2.5, 0.0));
        let open = square().open().smooth();
        assert_eq!(open.polygons()[0].len(), 8);
        assert_eq!(open.polygons()[0][0], Point::new(0.0, 0.0));
    }

    #[test]
    fn test_fill_opacity_registers_gstate() {
        let mut page = Page::new();
        square()
            .with_fill_color(Color::BLUE)
            .with_fill_opacity(0.5)
            .unwrap()
            .paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page)
            .unwrap();
        assert!(content(&page).contains("/GS1 gs\n"));
        assert_eq!(page.resources().ext_gstates().len(), 1);
        assert!(square().with_fill_opacity(1.5).is_err());
    }
}
