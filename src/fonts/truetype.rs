//! TrueType fonts for embedding.
//!
//! The face is parsed once with `ttf-parser` and the tables needed for
//! layout (cmap lookup, horizontal advances, vertical metrics) are copied
//! out, so the font holds no borrow of its own data.

use crate::error::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use ttf_parser::{Face, GlyphId};

/// A parsed TrueType font.
#[derive(Debug)]
pub struct TrueTypeFont {
    postscript_name: String,
    data: Bytes,
    glyph_lookup: HashMap<char, u16>,
    /// Advance widths by glyph id, in 1/1000 em
    glyph_widths: Vec<u16>,
    ascent: i32,
    descent: i32,
    cap_height: i32,
    bbox: (i32, i32, i32, i32),
    italic_angle: f32,
    flags: u32,
    stem_v: i32,
}

impl TrueTypeFont {
    /// Parse a font from raw TTF data.
    pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self> {
        let data: Bytes = data.into();
        if data.is_empty() {
            return Err(Error::Resource("font data is empty".to_string()));
        }
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Resource(format!("failed to parse font: {}", e)))?;
        if face.tables().glyf.is_none() {
            return Err(Error::Resource(
                "only TrueType outlines (glyf) can be embedded".to_string(),
            ));
        }

        let units_per_em = face.units_per_em().max(1) as i32;
        let to_pdf = |v: i32| v * 1000 / units_per_em;

        let mut glyph_lookup = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|cp| {
                    if let Some(ch) = char::from_u32(cp) {
                        if let Some(gid) = subtable.glyph_index(cp) {
                            glyph_lookup.entry(ch).or_insert(gid.0);
                        }
                    }
                });
            }
        }

        let glyph_widths = (0..face.number_of_glyphs())
            .map(|gid| {
                let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0) as i32;
                to_pdf(advance).clamp(0, u16::MAX as i32) as u16
            })
            .collect();

        let postscript_name = face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|name| name.to_string())
            .map(|name| name.replace(' ', ""))
            .unwrap_or_else(|| "Embedded".to_string());

        let bbox = face.global_bounding_box();
        let ascent = to_pdf(face.ascender() as i32);

        let mut flags = 1 << 5; // Nonsymbolic
        if face.is_monospaced() {
            flags |= 1;
        }
        if face.is_italic() {
            flags |= 1 << 6;
        }

        Ok(Self {
            postscript_name,
            glyph_lookup,
            glyph_widths,
            ascent,
            descent: to_pdf(face.descender() as i32),
            cap_height: face.capital_height().map(|h| to_pdf(h as i32)).unwrap_or(ascent),
            bbox: (
                to_pdf(bbox.x_min as i32),
                to_pdf(bbox.y_min as i32),
                to_pdf(bbox.x_max as i32),
                to_pdf(bbox.y_max as i32),
            ),
            italic_angle: face.italic_angle().unwrap_or(0.0),
            flags,
            stem_v: if face.is_bold() { 140 } else { 80 },
            data,
        })
    }

    /// Load a font from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Resource(format!("cannot read font {}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// PostScript name, without subset tag.
    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    /// Raw font program.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Glyph id for a character, if the font maps it.
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.glyph_lookup.get(&ch).copied()
    }

    /// Advance width of a glyph in 1/1000 em.
    pub fn glyph_width(&self, gid: u16) -> u16 {
        self.glyph_widths.get(gid as usize).copied().unwrap_or(0)
    }

    /// Advance width of a character in 1/1000 em; unmapped characters use `.notdef`.
    pub fn advance_width(&self, ch: char) -> u16 {
        self.glyph_width(self.glyph_id(ch).unwrap_or(0))
    }

    /// Number of glyphs in the font.
    pub fn glyph_count(&self) -> u16 {
        self.glyph_widths.len() as u16
    }

    /// Ascender in 1/1000 em.
    pub fn ascent(&self) -> i32 {
        self.ascent
    }

    /// Descender in 1/1000 em.
    pub fn descent(&self) -> i32 {
        self.descent
    }

    /// Cap height in 1/1000 em.
    pub fn cap_height(&self) -> i32 {
        self.cap_height
    }

    /// Font bounding box in 1/1000 em.
    pub fn bbox(&self) -> (i32, i32, i32, i32) {
        self.bbox
    }

    /// Italic angle in degrees.
    pub fn italic_angle(&self) -> f32 {
        self.italic_angle
    }

    /// FontDescriptor flags.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Estimated vertical stem width.
    pub fn stem_v(&self) -> i32 {
        self.stem_v
    }

    /// Encode text as big-endian glyph ids (Identity-H).
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let gid = self.glyph_id(ch).unwrap_or_else(|| {
                log::warn!("{} has no glyph for {:?}", self.postscript_name, ch);
                0
            });
            out.extend_from_slice(&gid.to_be_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_font_is_resource_error() {
        assert!(matches!(TrueTypeFont::from_bytes(Vec::new()), Err(Error::Resource(_))));
    }

    #[test]
    fn test_garbage_font_is_resource_error() {
        let err = TrueTypeFont::from_bytes(b"definitely not a font".to_vec()).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let err = TrueTypeFont::from_file("/nonexistent/font.ttf").unwrap_err();
        assert!(format!("{}", err).contains("cannot read font"));
    }
}
