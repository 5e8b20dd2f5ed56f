use super::line_breaking::{self, Line, TextStyle, Whitespace};
use super::{Chunk, Leading, TextAlignment};
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::layout::{LayoutBox, LayoutElement};
use crate::page::Page;

/// A paragraph made of differently styled chunks.
///
/// Whitespace inside each chunk is a breakpoint. With
/// [`preserve_whitespaces`](Self::preserve_whitespaces) chunks are kept
/// verbatim and never split.
#[derive(Debug, Clone)]
pub struct HeterogeneousParagraph {
    layout: LayoutBox,
    chunks: Vec<Chunk>,
    alignment: TextAlignment,
    leading: Leading,
    preserve_whitespaces: bool,
    respect_newlines: bool,
}

impl HeterogeneousParagraph {
    /// Lay out `chunks` as one flowing paragraph.
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            layout: LayoutBox::default(),
            chunks,
            alignment: TextAlignment::Left,
            leading: Leading::default(),
            preserve_whitespaces: false,
            respect_newlines: false,
        }
    }

    /// Keep whitespace and treat every chunk as unbreakable.
    pub fn preserve_whitespaces(mut self, preserve: bool) -> Self {
        self.preserve_whitespaces = preserve;
        self.layout.invalidate();
        self
    }

    /// Treat `\n` as a forced line break.
    pub fn respect_newlines(mut self, respect: bool) -> Self {
        self.respect_newlines = respect;
        self.layout.invalidate();
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

    /// The chunks, in order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    fn styles(&self) -> Vec<TextStyle> {
        self.chunks.iter().map(|c| c.style().clone()).collect()
    }

    fn lines(&self, styles: &[TextStyle], width: f32) -> Vec<Line> {
        let mode = if self.preserve_whitespaces {
            Whitespace::Preserve
        } else {
            Whitespace::Collapse {
                respect_newlines: self.respect_newlines,
            }
        };
        let mut pieces = Vec::new();
        for (index, chunk) in self.chunks.iter().enumerate() {
            line_breaking::tokenize(chunk.text(), index, &styles[index], mode, &mut pieces);
        }
        line_breaking::break_lines(&pieces, styles, width)
    }
}

impl LayoutElement for HeterogeneousParagraph {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "HeterogeneousParagraph"
    }

    fn content_size(&self, available: Size) -> Size {
        let styles = self.styles();
        let lines = self.lines(&styles, available.width);
        let widest = line_breaking::lines_width(&lines);
        let width = if self.alignment == TextAlignment::Left || !available.width.is_finite() {
            widest
        } else {
            available.width.max(widest)
        };
        Size::new(width, line_breaking::lines_height(&lines, self.leading))
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        let styles = self.styles();
        let lines = self.lines(&styles, area.width);
        line_breaking::paint_lines(&lines, &styles, area, self.alignment, self.leading, page)
    }
}
