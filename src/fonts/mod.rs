//! Fonts: the 14 standard fonts and embedded TrueType fonts.

mod font_subsetter;
mod standard14;
mod truetype;

pub use font_subsetter::FontSubsetter;
pub use standard14::StandardFont;
pub use truetype::TrueTypeFont;

use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// A font usable by text elements.
///
/// Fonts are shared by reference: cloning a `Font` is cheap and every page
/// that registers the same font resolves to the same indirect object.
#[derive(Debug, Clone)]
pub enum Font {
    /// One of the Standard 14 fonts, written as a simple `Type1` font
    Standard(StandardFont),
    /// An embedded TrueType font, written as a `Type0` composite font
    TrueType(Arc<TrueTypeFont>),
}

impl Font {
    /// Look up a Standard 14 font by name.
    pub fn standard(name: &str) -> Result<Self> {
        Ok(Font::Standard(StandardFont::from_name(name)?))
    }

    /// Helvetica, the default font of every text element.
    pub fn helvetica() -> Self {
        Font::Standard(StandardFont::Helvetica)
    }

    /// Courier, the default font of code snippets.
    pub fn courier() -> Self {
        Font::Standard(StandardFont::Courier)
    }

    /// Load a TrueType font from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Font::TrueType(Arc::new(TrueTypeFont::from_file(path)?)))
    }

    /// Parse a TrueType font from memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Font::TrueType(Arc::new(TrueTypeFont::from_bytes(data)?)))
    }

    /// Base font name.
    pub fn name(&self) -> &str {
        match self {
            Font::Standard(f) => f.name(),
            Font::TrueType(f) => f.postscript_name(),
        }
    }

    /// Advance width of a character in 1/1000 em.
    pub fn advance_width(&self, ch: char) -> i32 {
        match self {
            Font::Standard(f) => f.advance_width(ch) as i32,
            Font::TrueType(f) => f.advance_width(ch) as i32,
        }
    }

    /// Ascender in 1/1000 em.
    pub fn ascent(&self) -> i32 {
        match self {
            Font::Standard(f) => f.ascent(),
            Font::TrueType(f) => f.ascent(),
        }
    }

    /// Descender in 1/1000 em (negative).
    pub fn descent(&self) -> i32 {
        match self {
            Font::Standard(f) => f.descent(),
            Font::TrueType(f) => f.descent(),
        }
    }

    /// Width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: i32 = text.chars().map(|c| self.advance_width(c)).sum();
        units as f32 * font_size / 1000.0
    }

    /// Height of a line (ascent minus descent) in points at `font_size`.
    pub fn line_height(&self, font_size: f32) -> f32 {
        (self.ascent() - self.descent()) as f32 * font_size / 1000.0
    }

    /// Encode text into the byte codes shown by `Tj`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Font::Standard(f) => f.encode(text),
            Font::TrueType(f) => f.encode(text),
        }
    }

    /// Whether the font uses two-byte codes.
    pub fn is_composite(&self) -> bool {
        matches!(self, Font::TrueType(_))
    }

    /// Identity of the underlying font, used for resource de-duplication.
    pub(crate) fn same_as(&self, other: &Font) -> bool {
        match (self, other) {
            (Font::Standard(a), Font::Standard(b)) => a == b,
            (Font::TrueType(a), Font::TrueType(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::helvetica()
    }
}

impl From<StandardFont> for Font {
    fn from(f: StandardFont) -> Self {
        Font::Standard(f)
    }
}
