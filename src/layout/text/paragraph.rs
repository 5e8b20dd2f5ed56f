use super::line_breaking::{self, Line, TextStyle, Whitespace};
use super::{check_font_size, Leading, TextAlignment};
use crate::color::Color;
use crate::error::Result;
use crate::fonts::Font;
use crate::geometry::{Rect, Size};
use crate::layout::{LayoutBox, LayoutElement};
use crate::page::Page;

/// A single-style block of text wrapped to the available width.
#[derive(Debug, Clone)]
pub struct Paragraph {
    layout: LayoutBox,
    text: String,
    style: TextStyle,
    alignment: TextAlignment,
    leading: Leading,
    respect_newlines: bool,
}

impl Paragraph {
    /// Helvetica 12pt, left aligned.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            layout: LayoutBox::default(),
            text: text.into(),
            style: TextStyle {
                font: Font::helvetica(),
                font_size: 12.0,
                color: Color::BLACK,
            },
            alignment: TextAlignment::Left,
            leading: Leading::default(),
            respect_newlines: false,
        }
    }

    /// Use another font.
    pub fn with_font(mut self, font: Font) -> Self {
        self.style.font = font;
        self.layout.invalidate();
        self
    }

    /// Set the font size in points; must be positive.
    pub fn with_font_size(mut self, size: f32) -> Result<Self> {
        self.style.font_size = check_font_size(size)?;
        self.layout.invalidate();
        Ok(self)
    }

    /// Set the text color.
    pub fn with_font_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    /// Set line alignment.
    pub fn with_text_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self.layout.invalidate();
        self
    }

    /// Set the distance between baselines.
    pub fn with_leading(mut self, leading: Leading) -> Self {
        self.leading = leading;
        self.layout.invalidate();
        self
    }

    /// Treat `\n` as a forced line break instead of a space.
    pub fn respect_newlines(mut self, respect: bool) -> Self {
        self.respect_newlines = respect;
        self.layout.invalidate();
        self
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line alignment.
    pub fn text_alignment(&self) -> TextAlignment {
        self.alignment
    }

    fn lines(&self, width: f32) -> Vec<Line> {
        let mut pieces = Vec::new();
        let mode = Whitespace::Collapse {
            respect_newlines: self.respect_newlines,
        };
        line_breaking::tokenize(&self.text, 0, &self.style, mode, &mut pieces);
        line_breaking::break_lines(&pieces, std::slice::from_ref(&self.style), width)
    }
}

impl LayoutElement for Paragraph {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "Paragraph"
    }

    fn content_size(&self, available: Size) -> Size {
        let lines = self.lines(available.width);
        let widest = line_breaking::lines_width(&lines);
        let width = if self.alignment == TextAlignment::Left || !available.width.is_finite() {
            widest
        } else {
            available.width.max(widest)
        };
        Size::new(width, line_breaking::lines_height(&lines, self.leading))
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        let lines = self.lines(area.width);
        line_breaking::paint_lines(
            &lines,
            std::slice::from_ref(&self.style),
            area,
            self.alignment,
            self.leading,
            page,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(page: &Page) -> String {
        String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned()
    }

    #[test]
    fn test_hello_world() {
        let mut page = Page::new();
        let mut p = Paragraph::new("Hello, World!").with_font_size(12.0).unwrap();
        p.paint(Rect::new(59.5, 84.2, 476.0, 673.6), &mut page).unwrap();
        let text = content(&page);
        assert!(text.contains("BT\n/F1 12 Tf\n0 0 0 rg\n"));
        assert!(text.contains("(Hello, World!) Tj\nET\n"));
        assert_eq!(page.resources().fonts().len(), 1);
    }

    #[test]
    fn test_wraps_to_width() {
        let p = Paragraph::new("aaa bbb ccc").with_font(Font::courier()).with_font_size(10.0).unwrap();
        let narrow = p.get_size(Size::new(42.0, 1000.0));
        let wide = p.get_size(Size::new(1000.0, 1000.0));
        assert!((narrow.width - 42.0).abs() < 1e-3);
        assert!((wide.width - 66.0).abs() < 1e-3);
        assert!(narrow.height > wide.height);
    }

    #[test]
    fn test_non_left_fills_width() {
        let p = Paragraph::new("short").with_text_alignment(TextAlignment::Centered);
        assert_eq!(p.get_size(Size::new(300.0, 100.0)).width, 300.0);
    }

    #[test]
    fn test_fixed_leading() {
        let p = Paragraph::new("a\nb")
            .with_font(Font::courier())
            .with_font_size(10.0)
            .unwrap()
            .respect_newlines(true)
            .with_leading(Leading::Fixed(20.0));
        let h = p.get_size(Size::new(500.0, 500.0)).height;
        assert!((h - (6.29 + 20.0 + 1.57)).abs() < 1e-3);
    }

    #[test]
    fn test_escapes_parentheses() {
        let mut page = Page::new();
        let mut p = Paragraph::new("f(x)");
        p.paint(Rect::new(0.0, 0.0, 200.0, 100.0), &mut page).unwrap();
        assert!(content(&page).contains("(f\\(x\\)) Tj"));
    }

    #[test]
    fn test_too_tall_overflows() {
        let mut page = Page::new();
        let mut p = Paragraph::new("word ".repeat(200));
        let err = p.paint(Rect::new(0.0, 0.0, 100.0, 50.0), &mut page).unwrap_err();
        assert!(err.is_overflow());
        assert!(page.content_stream().is_empty());
    }
}
