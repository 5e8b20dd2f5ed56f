//! Text elements: chunks, paragraphs and code snippets.

mod chunk;
mod code_snippet;
mod heterogeneous;
mod lexer;
pub(crate) mod line_breaking;
mod paragraph;

pub use chunk::Chunk;
pub use code_snippet::CodeSnippet;
pub use heterogeneous::HeterogeneousParagraph;
pub use lexer::{RegexLexer, SyntaxLexer, SyntaxTheme, Token, TokenKind};
pub use paragraph::Paragraph;

use crate::error::{Error, Result};

/// Horizontal placement of lines within a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Ragged right
    #[default]
    Left,
    /// Ragged left
    Right,
    /// Each line centered
    Centered,
    /// Inter-word gaps stretched to fill every line but the last
    Justified,
}

/// Distance between consecutive baselines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leading {
    /// A multiple of the largest font size on the line
    Multiplied(f32),
    /// A fixed distance in points
    Fixed(f32),
}

impl Default for Leading {
    fn default() -> Self {
        Leading::Multiplied(1.2)
    }
}

pub(crate) fn check_font_size(size: f32) -> Result<f32> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(Error::InvalidArgument(format!("font size must be positive, got {}", size)))
    }
}
