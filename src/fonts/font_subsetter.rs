//! Font subsetting for PDF embedding.
//!
//! Tracks the characters shown through an embedded font and, at write time,
//! rewrites the font program so that only those glyphs keep their outlines.
//! Glyph ids are preserved (unused slots become empty glyphs), which keeps
//! `CIDToGIDMap /Identity` valid without renumbering the content streams.
//! Subset fonts are named with a six-letter tag, e.g. `EJKQWA+DejaVuSans`.

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::collections::{BTreeMap, BTreeSet};

/// Tables copied into the subset program. Layout tables (GSUB, GPOS, kern)
/// are dropped since text is positioned glyph by glyph.
const KEPT_TABLES: [&[u8; 4]; 13] = [
    b"OS/2", b"cmap", b"cvt ", b"fpgm", b"glyf", b"head", b"hhea", b"hmtx", b"loca", b"maxp",
    b"name", b"post", b"prep",
];

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// Records which characters and glyphs a document uses.
#[derive(Debug, Default, Clone)]
pub struct FontSubsetter {
    /// Used characters mapped to their glyph ids
    used_chars: BTreeMap<char, u16>,
    /// Used glyph ids, always including `.notdef`
    used_glyphs: BTreeSet<u16>,
}

impl FontSubsetter {
    /// Create a new font subsetter.
    pub fn new() -> Self {
        let mut used_glyphs = BTreeSet::new();
        used_glyphs.insert(0);
        Self {
            used_chars: BTreeMap::new(),
            used_glyphs,
        }
    }

    /// Record a character as used.
    pub fn use_char(&mut self, ch: char, glyph_id: u16) {
        self.used_chars.insert(ch, glyph_id);
        self.used_glyphs.insert(glyph_id);
    }

    /// Record every character of a string, resolving glyphs with `lookup`.
    pub fn use_string(&mut self, text: &str, lookup: impl Fn(char) -> Option<u16>) {
        for ch in text.chars() {
            if let Some(gid) = lookup(ch) {
                self.use_char(ch, gid);
            }
        }
    }

    /// Used glyph ids.
    pub fn used_glyphs(&self) -> &BTreeSet<u16> {
        &self.used_glyphs
    }

    /// Used characters and their glyph ids.
    pub fn used_chars(&self) -> &BTreeMap<char, u16> {
        &self.used_chars
    }

    /// Whether no character has been recorded.
    pub fn is_empty(&self) -> bool {
        self.used_chars.is_empty()
    }

    /// Six uppercase letters derived from the glyph set.
    ///
    /// Uses FNV-1a so the tag is stable across runs and toolchains.
    pub fn subset_tag(&self) -> String {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for gid in &self.used_glyphs {
            for byte in gid.to_be_bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
        }
        (0..6)
            .map(|_| {
                let letter = (b'A' + (hash % 26) as u8) as char;
                hash /= 26;
                letter
            })
            .collect()
    }

    /// `TAG+Name` as used for `/BaseFont` and `/FontName`.
    pub fn subset_font_name(&self, base_name: &str) -> String {
        format!("{}+{}", self.subset_tag(), base_name)
    }

    /// Generate a ToUnicode CMap mapping glyph ids back to text.
    pub fn to_unicode_cmap(&self) -> String {
        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

        let mut by_gid: BTreeMap<u16, char> = BTreeMap::new();
        for (&ch, &gid) in &self.used_chars {
            by_gid.entry(gid).or_insert(ch);
        }
        let mappings: Vec<(u16, char)> = by_gid.into_iter().collect();

        // At most 100 entries per bfchar block.
        for chunk in mappings.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(gid, ch) in chunk {
                let mut units = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect();
                cmap.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\nend\n");
        cmap
    }

    /// Build a subset font program keeping the used glyphs and every
    /// component they reference.
    pub fn subset_program(&self, font_data: &[u8]) -> Result<Vec<u8>> {
        let tables = read_table_directory(font_data)?;
        let table = |tag: &[u8; 4]| -> Result<&[u8]> {
            tables
                .get(tag)
                .copied()
                .ok_or_else(|| Error::Resource(format!("font has no '{}' table", String::from_utf8_lossy(tag))))
        };

        let head = table(b"head")?;
        let maxp = table(b"maxp")?;
        if head.len() < 54 || maxp.len() < 6 {
            return Err(Error::Resource("truncated head or maxp table".to_string()));
        }
        let long_loca = BigEndian::read_i16(&head[50..52]) != 0;
        let num_glyphs = BigEndian::read_u16(&maxp[4..6]);
        let offsets = parse_loca(table(b"loca")?, long_loca, num_glyphs)?;
        let glyf = table(b"glyf")?;

        let keep = close_over_components(glyf, &offsets, &self.used_glyphs)?;
        let (new_glyf, new_loca) = rebuild_glyf(glyf, &offsets, &keep)?;
        log::debug!("font subset keeps {} of {} glyphs", keep.len(), num_glyphs);

        let mut new_head = head.to_vec();
        BigEndian::write_u32(&mut new_head[8..12], 0);
        BigEndian::write_i16(&mut new_head[50..52], 1);

        let mut out_tables: Vec<([u8; 4], Vec<u8>)> = Vec::new();
        for tag in KEPT_TABLES {
            let data = match tag {
                b"glyf" => new_glyf.clone(),
                b"loca" => new_loca.clone(),
                b"head" => new_head.clone(),
                _ => match tables.get(tag) {
                    Some(data) => data.to_vec(),
                    None => continue,
                },
            };
            out_tables.push((*tag, data));
        }
        write_sfnt(&out_tables)
    }
}

fn read_table_directory(data: &[u8]) -> Result<BTreeMap<[u8; 4], &[u8]>> {
    let truncated = || Error::Resource("truncated font table directory".to_string());
    if data.len() < 12 {
        return Err(truncated());
    }
    let num_tables = BigEndian::read_u16(&data[4..6]) as usize;
    let mut tables = BTreeMap::new();
    for i in 0..num_tables {
        let rec = data.get(12 + i * 16..28 + i * 16).ok_or_else(truncated)?;
        let tag = [rec[0], rec[1], rec[2], rec[3]];
        let offset = BigEndian::read_u32(&rec[8..12]) as usize;
        let length = BigEndian::read_u32(&rec[12..16]) as usize;
        let body = data
            .get(offset..offset.saturating_add(length))
            .ok_or_else(|| Error::Resource(format!("table '{}' out of bounds", String::from_utf8_lossy(&tag))))?;
        tables.insert(tag, body);
    }
    Ok(tables)
}

fn parse_loca(loca: &[u8], long: bool, num_glyphs: u16) -> Result<Vec<usize>> {
    let count = num_glyphs as usize + 1;
    let needed = if long { count * 4 } else { count * 2 };
    if loca.len() < needed {
        return Err(Error::Resource("loca table shorter than glyph count".to_string()));
    }
    Ok((0..count)
        .map(|i| {
            if long {
                BigEndian::read_u32(&loca[i * 4..]) as usize
            } else {
                BigEndian::read_u16(&loca[i * 2..]) as usize * 2
            }
        })
        .collect())
}

fn glyph_slice<'a>(glyf: &'a [u8], offsets: &[usize], gid: u16) -> Result<&'a [u8]> {
    let i = gid as usize;
    if i + 1 >= offsets.len() {
        return Ok(&[]);
    }
    glyf.get(offsets[i]..offsets[i + 1])
        .ok_or_else(|| Error::Resource(format!("glyph {} out of bounds", gid)))
}

/// Component glyph ids referenced by a composite glyph.
fn component_ids(glyph: &[u8]) -> Vec<u16> {
    let mut ids = Vec::new();
    if glyph.len() < 10 || BigEndian::read_i16(&glyph[0..2]) >= 0 {
        return ids;
    }
    let mut pos = 10;
    while pos + 4 <= glyph.len() {
        let flags = BigEndian::read_u16(&glyph[pos..]);
        ids.push(BigEndian::read_u16(&glyph[pos + 2..]));
        pos += 4;
        pos += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            pos += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            pos += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            pos += 8;
        }
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    ids
}

fn close_over_components(glyf: &[u8], offsets: &[usize], used: &BTreeSet<u16>) -> Result<BTreeSet<u16>> {
    let mut keep = BTreeSet::new();
    let mut pending: Vec<u16> = used.iter().copied().collect();
    pending.push(0);
    while let Some(gid) = pending.pop() {
        if !keep.insert(gid) {
            continue;
        }
        for component in component_ids(glyph_slice(glyf, offsets, gid)?) {
            if !keep.contains(&component) {
                pending.push(component);
            }
        }
    }
    Ok(keep)
}

fn rebuild_glyf(glyf: &[u8], offsets: &[usize], keep: &BTreeSet<u16>) -> Result<(Vec<u8>, Vec<u8>)> {
    let num_glyphs = offsets.len().saturating_sub(1);
    let mut new_glyf = Vec::new();
    let mut new_loca = Vec::with_capacity((num_glyphs + 1) * 4);
    for gid in 0..num_glyphs {
        new_loca.write_u32::<BigEndian>(new_glyf.len() as u32)?;
        if keep.contains(&(gid as u16)) {
            new_glyf.extend_from_slice(glyph_slice(glyf, offsets, gid as u16)?);
            while new_glyf.len() % 4 != 0 {
                new_glyf.push(0);
            }
        }
    }
    new_loca.write_u32::<BigEndian>(new_glyf.len() as u32)?;
    Ok((new_glyf, new_loca))
}

fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn write_sfnt(tables: &[([u8; 4], Vec<u8>)]) -> Result<Vec<u8>> {
    let num_tables = tables.len() as u16;
    let entry_selector = 15 - num_tables.max(1).leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 16;

    let mut out = Vec::new();
    out.write_u32::<BigEndian>(0x0001_0000)?;
    out.write_u16::<BigEndian>(num_tables)?;
    out.write_u16::<BigEndian>(search_range)?;
    out.write_u16::<BigEndian>(entry_selector)?;
    out.write_u16::<BigEndian>(num_tables * 16 - search_range)?;

    let mut offset = 12 + tables.len() * 16;
    let mut head_offset = None;
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        out.write_u32::<BigEndian>(table_checksum(data))?;
        out.write_u32::<BigEndian>(offset as u32)?;
        out.write_u32::<BigEndian>(data.len() as u32)?;
        if tag == b"head" {
            head_offset = Some(offset);
        }
        offset += (data.len() + 3) & !3;
    }
    for (_, data) in tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }

    if let Some(head) = head_offset {
        let adjustment = 0xB1B0_AFBAu32.wrapping_sub(table_checksum(&out));
        BigEndian::write_u32(&mut out[head + 8..head + 12], adjustment);
    }
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Simple glyph: one contour, bounding box, nothing else.
    fn simple_glyph(marker: u8) -> Vec<u8> {
        vec![0, 1, 0, 0, 0, 0, 0, 10, 0, 10, marker, marker]
    }

    /// Composite glyph referencing `components` with byte offsets.
    fn composite_glyph(components: &[u16]) -> Vec<u8> {
        let mut g = vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 10, 0, 10];
        for (i, &c) in components.iter().enumerate() {
            let flags: u16 = if i + 1 < components.len() { MORE_COMPONENTS } else { 0 };
            g.extend_from_slice(&flags.to_be_bytes());
            g.extend_from_slice(&c.to_be_bytes());
            g.extend_from_slice(&[0, 0]);
        }
        g
    }

    /// Build a minimal sfnt with head/maxp/loca/glyf/hhea/hmtx tables.
    pub(crate) fn synthetic_font(glyphs: &[Vec<u8>]) -> Vec<u8> {
        let mut glyf = Vec::new();
        let mut loca = Vec::new();
        for g in glyphs {
            loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());
            glyf.extend_from_slice(g);
            while glyf.len() % 4 != 0 {
                glyf.push(0);
            }
        }
        loca.extend_from_slice(&(glyf.len() as u32).to_be_bytes());

        let mut head = vec![0u8; 54];
        head[50..52].copy_from_slice(&1i16.to_be_bytes());
        let mut maxp = vec![0, 0, 0x50, 0, 0, 0];
        maxp[4..6].copy_from_slice(&(glyphs.len() as u16).to_be_bytes());

        let tables = vec![
            (*b"glyf", glyf),
            (*b"head", head),
            (*b"hhea", vec![0u8; 36]),
            (*b"loca", loca),
            (*b"maxp", maxp),
            (*b"GSUB", vec![1, 2, 3, 4]),
        ];
        write_sfnt(&tables).unwrap()
    }

    #[test]
    fn test_subsetter_tracks_glyphs() {
        let mut s = FontSubsetter::new();
        assert!(s.is_empty());
        s.use_char('A', 36);
        s.use_char('B', 37);
        s.use_char('A', 36);
        assert_eq!(s.used_chars().len(), 2);
        assert_eq!(s.used_glyphs().iter().copied().collect::<Vec<_>>(), vec![0, 36, 37]);
    }

    #[test]
    fn test_subset_tag_deterministic() {
        let mut a = FontSubsetter::new();
        a.use_string("AB", |c| Some(c as u16));
        let mut b = FontSubsetter::new();
        b.use_string("BA", |c| Some(c as u16));
        assert_eq!(a.subset_tag(), b.subset_tag());
        assert_eq!(a.subset_tag().len(), 6);
        assert!(a.subset_tag().chars().all(|c| c.is_ascii_uppercase()));
        assert!(a.subset_font_name("Demo").ends_with("+Demo"));
    }

    #[test]
    fn test_to_unicode_cmap() {
        let mut s = FontSubsetter::new();
        s.use_char('A', 1);
        s.use_char('😀', 2);
        let cmap = s.to_unicode_cmap();
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0001> <0041>"));
        assert!(cmap.contains("<0002> <D83DDE00>"));
        assert!(cmap.contains("endcmap"));
    }

    #[test]
    fn test_component_ids() {
        assert_eq!(component_ids(&composite_glyph(&[3, 5])), vec![3, 5]);
        assert!(component_ids(&simple_glyph(1)).is_empty());
    }

    #[test]
    fn test_subset_program_keeps_used_and_components() {
        let glyphs = vec![
            simple_glyph(0xA0),
            simple_glyph(0xA1),
            simple_glyph(0xA2),
            simple_glyph(0xA3),
            composite_glyph(&[3]),
        ];
        let font = synthetic_font(&glyphs);

        let mut s = FontSubsetter::new();
        s.use_char('x', 4);
        let subset = s.subset_program(&font).unwrap();

        let tables = read_table_directory(&subset).unwrap();
        assert!(!tables.contains_key(b"GSUB"));
        let maxp = tables[b"maxp"];
        assert_eq!(BigEndian::read_u16(&maxp[4..6]), 5);

        let offsets = parse_loca(tables[b"loca"], true, 5).unwrap();
        let glyf = tables[b"glyf"];
        // .notdef, glyph 3 (component) and glyph 4 keep outlines.
        assert!(!glyph_slice(glyf, &offsets, 0).unwrap().is_empty());
        assert!(glyph_slice(glyf, &offsets, 1).unwrap().is_empty());
        assert!(glyph_slice(glyf, &offsets, 2).unwrap().is_empty());
        assert_eq!(glyph_slice(glyf, &offsets, 3).unwrap()[10], 0xA3);
        assert!(!glyph_slice(glyf, &offsets, 4).unwrap().is_empty());
    }

    #[test]
    fn test_subset_program_checksum_adjustment() {
        let font = synthetic_font(&[simple_glyph(1), simple_glyph(2)]);
        let subset = FontSubsetter::new().subset_program(&font).unwrap();
        assert_eq!(table_checksum(&subset), 0xB1B0_AFBA);
    }

    #[test]
    fn test_subset_program_rejects_garbage() {
        let err = FontSubsetter::new().subset_program(b"nope").unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
