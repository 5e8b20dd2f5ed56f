//! Metrics and encoding for the 14 standard PDF fonts.
//!
//! Widths cover the printable ASCII range (codes 32..=126) in 1/1000 em.
//! Characters from the rest of WinAnsiEncoding borrow the width of their
//! unaccented base letter, which is how the AFM tables relate for Latin-1.

use crate::error::{Error, Result};
use phf::phf_map;

/// One of the fourteen fonts every conforming viewer provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    /// Helvetica
    Helvetica,
    /// Helvetica-Bold
    HelveticaBold,
    /// Helvetica-Oblique
    HelveticaOblique,
    /// Helvetica-BoldOblique
    HelveticaBoldOblique,
    /// Times-Roman
    TimesRoman,
    /// Times-Bold
    TimesBold,
    /// Times-Italic
    TimesItalic,
    /// Times-BoldItalic
    TimesBoldItalic,
    /// Courier
    Courier,
    /// Courier-Bold
    CourierBold,
    /// Courier-Oblique
    CourierOblique,
    /// Courier-BoldOblique
    CourierBoldOblique,
    /// Symbol
    Symbol,
    /// ZapfDingbats
    ZapfDingbats,
}

static BY_NAME: phf::Map<&'static str, StandardFont> = phf_map! {
    "Helvetica" => StandardFont::Helvetica,
    "Helvetica-Bold" => StandardFont::HelveticaBold,
    "Helvetica-Oblique" => StandardFont::HelveticaOblique,
    "Helvetica-BoldOblique" => StandardFont::HelveticaBoldOblique,
    "Times-Roman" => StandardFont::TimesRoman,
    "Times-Bold" => StandardFont::TimesBold,
    "Times-Italic" => StandardFont::TimesItalic,
    "Times-BoldItalic" => StandardFont::TimesBoldItalic,
    "Courier" => StandardFont::Courier,
    "Courier-Bold" => StandardFont::CourierBold,
    "Courier-Oblique" => StandardFont::CourierOblique,
    "Courier-BoldOblique" => StandardFont::CourierBoldOblique,
    "Symbol" => StandardFont::Symbol,
    "ZapfDingbats" => StandardFont::ZapfDingbats,
};

/// WinAnsiEncoding codes 0x80..=0x9F, which differ from Latin-1.
static WIN_ANSI_SPECIALS: phf::Map<char, u8> = phf_map! {
    '€' => 0x80, '‚' => 0x82, 'ƒ' => 0x83, '„' => 0x84, '…' => 0x85, '†' => 0x86,
    '‡' => 0x87, 'ˆ' => 0x88, '‰' => 0x89, 'Š' => 0x8A, '‹' => 0x8B, 'Œ' => 0x8C,
    'Ž' => 0x8E, '‘' => 0x91, '’' => 0x92, '“' => 0x93, '”' => 0x94, '•' => 0x95,
    '–' => 0x96, '—' => 0x97, '˜' => 0x98, '™' => 0x99, 'š' => 0x9A, '›' => 0x9B,
    'œ' => 0x9C, 'ž' => 0x9E, 'Ÿ' => 0x9F,
};

/// ASCII stand-in used to size characters outside 32..=126.
static WIDTH_PROXY: phf::Map<char, char> = phf_map! {
    'À' => 'A', 'Á' => 'A', 'Â' => 'A', 'Ã' => 'A', 'Ä' => 'A', 'Å' => 'A',
    'Ç' => 'C', 'È' => 'E', 'É' => 'E', 'Ê' => 'E', 'Ë' => 'E',
    'Ì' => 'I', 'Í' => 'I', 'Î' => 'I', 'Ï' => 'I', 'Ð' => 'D', 'Ñ' => 'N',
    'Ò' => 'O', 'Ó' => 'O', 'Ô' => 'O', 'Õ' => 'O', 'Ö' => 'O', 'Ø' => 'O',
    'Ù' => 'U', 'Ú' => 'U', 'Û' => 'U', 'Ü' => 'U', 'Ý' => 'Y', 'Ÿ' => 'Y',
    'Š' => 'S', 'Ž' => 'Z', 'Œ' => 'W', 'Æ' => 'W',
    'à' => 'a', 'á' => 'a', 'â' => 'a', 'ã' => 'a', 'ä' => 'a', 'å' => 'a',
    'ç' => 'c', 'è' => 'e', 'é' => 'e', 'ê' => 'e', 'ë' => 'e',
    'ì' => 'i', 'í' => 'i', 'î' => 'i', 'ï' => 'i', 'ð' => 'o', 'ñ' => 'n',
    'ò' => 'o', 'ó' => 'o', 'ô' => 'o', 'õ' => 'o', 'ö' => 'o', 'ø' => 'o',
    'ù' => 'u', 'ú' => 'u', 'û' => 'u', 'ü' => 'u', 'ý' => 'y', 'ÿ' => 'y',
    'š' => 's', 'ž' => 'z', 'œ' => 'm', 'æ' => 'm', 'ß' => 'b',
    '‘' => '\'', '’' => '\'', '‚' => ',', '“' => '"', '”' => '"', '„' => '"',
    '‹' => '<', '›' => '>', '–' => '_', '—' => 'M', '…' => 'M', '•' => 'o',
    '€' => '$', '£' => '$', '¥' => '$', '¢' => '$', '©' => 'O', '®' => 'O',
    '°' => 'o', '±' => '+', '×' => '+', '÷' => '+', '§' => '$', '¶' => '$',
    '\u{a0}' => ' ', '·' => '.', '¡' => '!', '¿' => '?', '«' => '<', '»' => '>',
};

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

const SYMBOL: [u16; 95] = [
    250, 333, 713, 500, 549, 833, 778, 439, 333, 333, 500, 549, 250, 549, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 549, 549, 549, 444,
    549, 722, 667, 722, 612, 611, 763, 603, 722, 333, 631, 722, 686, 889, 722, 722,
    768, 741, 556, 592, 611, 690, 439, 768, 645, 795, 611, 333, 863, 333, 658, 500,
    500, 631, 549, 549, 494, 439, 521, 411, 603, 329, 603, 549, 549, 576, 521, 549,
    549, 521, 549, 603, 439, 576, 713, 686, 493, 686, 494, 480, 200, 480, 549,
];

const ZAPF_DINGBATS: [u16; 95] = [
    278, 974, 961, 974, 980, 719, 789, 790, 791, 690, 960, 939, 549, 855, 911, 933,
    911, 945, 974, 755, 846, 762, 761, 571, 677, 763, 760, 759, 754, 494, 552, 537,
    577, 692, 786, 788, 788, 790, 793, 794, 816, 823, 789, 841, 823, 833, 816, 831,
    923, 744, 723, 749, 790, 792, 695, 776, 768, 792, 759, 707, 708, 682, 701, 826,
    815, 789, 789, 707, 687, 696, 689, 786, 787, 713, 791, 785, 791, 873, 761, 762,
    762, 759, 759, 892, 892, 788, 784, 438, 138, 277, 415, 392, 392, 668, 668,
];

impl StandardFont {
    /// All fourteen fonts, in the order viewers traditionally list them.
    pub const ALL: [StandardFont; 14] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::TimesRoman,
        StandardFont::TimesBold,
        StandardFont::TimesItalic,
        StandardFont::TimesBoldItalic,
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
        StandardFont::Symbol,
        StandardFont::ZapfDingbats,
    ];

    /// Look a font up by its PostScript name.
    ///
    /// ```
    /// use quire::fonts::StandardFont;
    ///
    /// assert_eq!(StandardFont::from_name("Times-Bold").unwrap(), StandardFont::TimesBold);
    /// assert!(StandardFont::from_name("Arial").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        BY_NAME
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidArgument(format!("unknown standard font '{}'", name)))
    }

    /// PostScript name used as `/BaseFont`.
    pub fn name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Symbol and ZapfDingbats carry their own built-in encoding.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    fn widths(&self) -> Option<&'static [u16; 95]> {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaOblique => Some(&HELVETICA),
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique => Some(&HELVETICA_BOLD),
            StandardFont::TimesRoman => Some(&TIMES_ROMAN),
            StandardFont::TimesBold => Some(&TIMES_BOLD),
            StandardFont::TimesItalic => Some(&TIMES_ITALIC),
            StandardFont::TimesBoldItalic => Some(&TIMES_BOLD_ITALIC),
            StandardFont::Symbol => Some(&SYMBOL),
            StandardFont::ZapfDingbats => Some(&ZAPF_DINGBATS),
            // Every Courier glyph is 600 units wide.
            _ => None,
        }
    }

    fn ascii_width(&self, byte: u8) -> u16 {
        match self.widths() {
            Some(table) if (32..=126).contains(&byte) => table[(byte - 32) as usize],
            Some(table) => table[0],
            None => 600,
        }
    }

    /// Advance width of a character in 1/1000 em.
    pub fn advance_width(&self, ch: char) -> u16 {
        if (' '..='~').contains(&ch) {
            return self.ascii_width(ch as u8);
        }
        match WIDTH_PROXY.get(&ch) {
            Some(&proxy) => self.ascii_width(proxy as u8),
            None => self.ascii_width(b'o'),
        }
    }

    /// Ascender in 1/1000 em.
    pub fn ascent(&self) -> i32 {
        match self {
            StandardFont::Helvetica
            | StandardFont::HelveticaOblique
            | StandardFont::HelveticaBold
            | StandardFont::HelveticaBoldOblique => 718,
            StandardFont::TimesRoman | StandardFont::TimesItalic => 683,
            StandardFont::TimesBold | StandardFont::TimesBoldItalic => 676,
            StandardFont::Courier | StandardFont::CourierOblique => 629,
            StandardFont::CourierBold | StandardFont::CourierBoldOblique => 626,
            StandardFont::Symbol => 1010,
            StandardFont::ZapfDingbats => 820,
        }
    }

    /// Descender in 1/1000 em (negative).
    pub fn descent(&self) -> i32 {
        match self {
            StandardFont::Helvetica
            | StandardFont::HelveticaOblique
            | StandardFont::HelveticaBold
            | StandardFont::HelveticaBoldOblique => -207,
            StandardFont::TimesRoman | StandardFont::TimesItalic => -217,
            StandardFont::TimesBold | StandardFont::TimesBoldItalic => -205,
            StandardFont::Courier | StandardFont::CourierOblique => -157,
            StandardFont::CourierBold | StandardFont::CourierBoldOblique => -142,
            StandardFont::Symbol => -293,
            StandardFont::ZapfDingbats => -143,
        }
    }

    /// Encode a character into the font's single-byte encoding.
    ///
    /// Text fonts use WinAnsiEncoding. The symbolic fonts only accept the
    /// printable ASCII range, which their built-in encodings map to glyphs.
    pub fn encode_char(&self, ch: char) -> Option<u8> {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            return Some(code as u8);
        }
        if self.is_symbolic() {
            return None;
        }
        if (0xA0..=0xFF).contains(&code) {
            return Some(code as u8);
        }
        WIN_ANSI_SPECIALS.get(&ch).copied()
    }

    /// Encode text, replacing unencodable characters with `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| {
                self.encode_char(ch).unwrap_or_else(|| {
                    log::warn!("{} cannot encode {:?}, substituting '?'", self.name(), ch);
                    b'?'
                })
            })
            .collect()
    }
}

impl std::fmt::Display for StandardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
