use super::check_font_size;
use super::line_breaking::TextStyle;
use crate::color::Color;
use crate::error::Result;
use crate::fonts::Font;
use crate::geometry::{Rect, Size};
use crate::layout::{LayoutBox, LayoutElement};
use crate::page::Page;
use crate::writer::ContentStreamBuilder;

/// An unbroken run of text in a single font, size and color.
///
/// ```
/// use quire::layout::Chunk;
/// use quire::Color;
///
/// let chunk = Chunk::new("bold move").with_font_color(Color::RED);
/// assert_eq!(chunk.text(), "bold move");
/// ```
#[derive(Debug, Clone)]
pub struct Chunk {
    layout: LayoutBox,
    text: String,
    style: TextStyle,
}

impl Chunk {
    /// Helvetica 12pt black text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            layout: LayoutBox::default(),
            text: text.into(),
            style: TextStyle {
                font: Font::helvetica(),
                font_size: 12.0,
                color: Color::BLACK,
            },
        }
    }

    /// A chunk with a size already known to be valid.
    pub(crate) fn styled(text: &str, font: Font, font_size: f32, color: Color) -> Self {
        Self {
            layout: LayoutBox::default(),
            text: text.to_string(),
            style: TextStyle { font, font_size, color },
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

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The font.
    pub fn font(&self) -> &Font {
        &self.style.font
    }

    /// Font size in points.
    pub fn font_size(&self) -> f32 {
        self.style.font_size
    }

    /// Text color.
    pub fn font_color(&self) -> Color {
        self.style.color
    }

    pub(crate) fn style(&self) -> &TextStyle {
        &self.style
    }
}

impl LayoutElement for Chunk {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "Chunk"
    }

    fn content_size(&self, _available: Size) -> Size {
        Size::new(self.style.width(&self.text), self.style.ascent() - self.style.descent())
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let alias = page.register_font(&self.style.font);
        page.record_text(&alias, &self.text);
        let mut ops = ContentStreamBuilder::new();
        ops.begin_text()
            .set_font(&alias, self.style.font_size)
            .set_fill_color(self.style.color)
            .move_text(area.x, area.top() - self.style.ascent())
            .show_text(self.style.font.encode(&self.text))
            .end_text();
        page.content_stream_mut().append(&ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_from_metrics() {
        let chunk = Chunk::new("abc").with_font(Font::courier()).with_font_size(10.0).unwrap();
        let size = chunk.get_size(Size::new(500.0, 500.0));
        assert!((size.width - 18.0).abs() < 1e-4);
        assert!((size.height - 7.86).abs() < 1e-4);
    }

    #[test]
    fn test_negative_font_size_rejected() {
        assert!(Chunk::new("x").with_font_size(-1.0).is_err());
        assert!(Chunk::new("x").with_font_size(0.0).is_err());
    }

    #[test]
    fn test_chunk_paint() {
        let mut page = Page::new();
        let mut chunk = Chunk::new("Hi").with_font_color(Color::RED);
        chunk.paint(Rect::new(10.0, 10.0, 100.0, 100.0), &mut page).unwrap();
        let text = String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned();
        assert!(text.contains("/F1 12 Tf\n1 0 0 rg\n"));
        assert!(text.contains("(Hi) Tj"));
        assert_eq!(page.resources().fonts()["F1"].font().name(), "Helvetica");
    }
}
