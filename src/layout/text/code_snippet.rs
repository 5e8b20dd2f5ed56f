use super::{check_font_size, Chunk, HeterogeneousParagraph, SyntaxLexer, SyntaxTheme, TextAlignment};
use crate::color::{Color, Rgb};
use crate::error::Result;
use crate::fonts::Font;
use crate::geometry::{Rect, Size};
use crate::layout::table::{FlexibleColumnWidthTable, FlexibleWidths, Table, TableCell};
use crate::layout::{LayoutBox, LayoutElement, Sides};
use crate::page::Page;

/// Source code in a monospaced font, one unwrapped row per line.
///
/// Lines are laid out as whitespace-preserving paragraphs stacked in a
/// borderless table inside the snippet's own border. A [`SyntaxLexer`]
/// colors tokens; without one every token uses the theme's text color.
pub struct CodeSnippet {
    layout: LayoutBox,
    code: String,
    lexer: Option<Box<dyn SyntaxLexer>>,
    theme: SyntaxTheme,
    font: Font,
    font_size: f32,
    line_numbers: bool,
    table: FlexibleColumnWidthTable,
}

impl std::fmt::Debug for CodeSnippet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeSnippet")
            .field("lines", &self.table.rows())
            .field("highlighted", &self.lexer.is_some())
            .field("line_numbers", &self.line_numbers)
            .finish()
    }
}

impl CodeSnippet {
    /// Courier 10pt on a light gray background with a gray border.
    pub fn new(code: impl Into<String>) -> Self {
        let mut layout = LayoutBox::default();
        layout.set_background_color(Some(Color::Rgb(Rgb::new(245, 245, 245))));
        layout.set_border_width(Sides::all(1.0));
        layout.set_border_color(Sides::all(Color::LIGHT_GRAY));
        layout.set_padding(Sides::all(5.0));
        let mut snippet = Self {
            layout,
            code: code.into(),
            lexer: None,
            theme: SyntaxTheme::default(),
            font: Font::courier(),
            font_size: 10.0,
            line_numbers: false,
            table: Table::from_rows(1, Vec::new(), FlexibleWidths),
        };
        snippet.rebuild();
        snippet
    }

    /// Color tokens with `lexer`.
    pub fn with_lexer(mut self, lexer: impl SyntaxLexer + 'static) -> Self {
        self.lexer = Some(Box::new(lexer));
        self.rebuild();
        self
    }

    /// Token colors.
    pub fn with_theme(mut self, theme: SyntaxTheme) -> Self {
        self.theme = theme;
        self.rebuild();
        self
    }

    /// Prefix each line with its 1-based number.
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self.rebuild();
        self
    }

    /// Use another (ideally monospaced) font.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self.rebuild();
        self
    }

    /// Set the font size in points; must be positive.
    pub fn with_font_size(mut self, size: f32) -> Result<Self> {
        self.font_size = check_font_size(size)?;
        self.rebuild();
        Ok(self)
    }

    /// The source code.
    pub fn code(&self) -> &str {
        &self.code
    }

    fn chunk(&self, text: &str, color: Color) -> Chunk {
        Chunk::styled(text, self.font.clone(), self.font_size, color)
    }

    fn line_paragraph(&self, line: &str) -> HeterogeneousParagraph {
        let line = line.replace('\t', "    ");
        let mut chunks: Vec<Chunk> = match &self.lexer {
            Some(lexer) => lexer
                .tokenize(&line)
                .into_iter()
                .map(|token| self.chunk(&token.text, self.theme.color(token.kind)))
                .collect(),
            None => vec![self.chunk(&line, self.theme.text)],
        };
        chunks.retain(|c| !c.text().is_empty());
        if chunks.is_empty() {
            chunks.push(self.chunk(" ", self.theme.text));
        }
        HeterogeneousParagraph::new(chunks).preserve_whitespaces(true)
    }

    fn rebuild(&mut self) {
        let lines: Vec<&str> = if self.code.is_empty() {
            vec![""]
        } else {
            self.code.lines().collect()
        };
        let columns = if self.line_numbers { 2 } else { 1 };
        let rows = lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let mut row = Vec::with_capacity(columns);
                if self.line_numbers {
                    let number = self.chunk(&(index + 1).to_string(), Color::GRAY);
                    let number = HeterogeneousParagraph::new(vec![number]).with_text_alignment(TextAlignment::Right);
                    row.push(bare_cell(number, 8.0));
                }
                row.push(bare_cell(self.line_paragraph(line), 0.0));
                row
            })
            .collect();
        self.table = Table::from_rows(columns, rows, FlexibleWidths);
        self.layout.invalidate();
    }
}

fn bare_cell(content: impl LayoutElement + 'static, right_padding: f32) -> TableCell {
    let mut cell = TableCell::new(content);
    cell.layout_box_mut().set_border_width(Sides::all(0.0));
    cell.layout_box_mut().set_padding(Sides::new(0.0, right_padding, 0.0, 0.0));
    cell
}

impl LayoutElement for CodeSnippet {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "CodeSnippet"
    }

    fn content_size(&self, available: Size) -> Size {
        self.table.get_size(available)
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        self.table.paint(area, page)
    }
}
