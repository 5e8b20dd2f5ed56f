//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.

use super::object_serializer::ObjectSerializer;
use super::object_table::ObjectTable;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::fonts::{Font, FontSubsetter, StandardFont, TrueTypeFont};
use crate::object::{Dictionary, Filter, Object, ObjectRef, Stream};
use crate::page::{Annotation, Page};
use crate::writer::ImageData;
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Whether to compress page content streams
    pub compress: bool,
    /// Whether to compress embedded font programs and ToUnicode maps
    pub compress_fonts: bool,
    /// Producer entry of the Info dictionary
    pub producer: Option<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            compress: false,
            compress_fonts: true,
            producer: None,
        }
    }
}

impl WriterConfig {
    /// Set the version written in the header.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Enable or disable content stream compression.
    ///
    /// When enabled, content streams are compressed using FlateDecode
    /// (zlib/deflate) to reduce file size.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Enable or disable font program compression.
    pub fn with_compress_fonts(mut self, compress: bool) -> Self {
        self.compress_fonts = compress;
        self
    }

    /// Set the producer.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }
}

/// A font shared by one or more pages, with the union of characters shown.
struct FontEntry {
    font: Font,
    used: BTreeSet<char>,
    reference: Option<ObjectRef>,
}

/// Serializes a [`Document`] into PDF bytes.
pub struct PdfWriter<'a> {
    config: &'a WriterConfig,
}

impl<'a> PdfWriter<'a> {
    /// Create a writer using `config`.
    pub fn new(config: &'a WriterConfig) -> Self {
        Self { config }
    }

    /// Build the complete PDF file.
    pub fn write_document(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut table = ObjectTable::new();
        let catalog = table.reserve();
        let pages_root = table.reserve();
        let page_refs: Vec<ObjectRef> = doc.pages().iter().map(|_| table.reserve()).collect();

        let mut fonts = collect_fonts(doc.pages());
        for entry in &mut fonts {
            entry.reference = Some(self.add_font(&mut table, &entry.font, &entry.used)?);
        }
        let mut images: Vec<(Arc<ImageData>, ObjectRef)> = Vec::new();

        for (index, page) in doc.pages().iter().enumerate() {
            let page_dict = self.add_page(&mut table, page, index, pages_root, &page_refs, &fonts, &mut images)?;
            table.set(page_refs[index], Object::Dictionary(page_dict));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.insert("Type".to_string(), Object::name("Pages"));
        pages_dict.insert(
            "Kids".to_string(),
            Object::Array(page_refs.iter().map(|r| Object::Reference(*r)).collect()),
        );
        pages_dict.insert("Count".to_string(), Object::from(page_refs.len()));
        table.set(pages_root, Object::Dictionary(pages_dict));

        let mut catalog_dict = Dictionary::new();
        catalog_dict.insert("Type".to_string(), Object::name("Catalog"));
        catalog_dict.insert("Pages".to_string(), Object::Reference(pages_root));
        if let Some(outlines) = doc.outline().build(&mut table, &page_refs)? {
            catalog_dict.insert("Outlines".to_string(), Object::Reference(outlines));
            catalog_dict.insert("PageMode".to_string(), Object::name("UseOutlines"));
        }
        table.set(catalog, Object::Dictionary(catalog_dict));

        let mut roots = vec![catalog];
        if !doc.info().is_empty() || self.config.producer.is_some() {
            let info = doc.info().to_dict(self.config.producer.as_deref());
            roots.push(table.add(Object::Dictionary(info)));
        }

        let (objects, roots) = table.renumber(&roots)?;
        log::debug!(
            "writing {} objects for {} pages and {} fonts",
            objects.len(),
            doc.page_count(),
            fonts.len()
        );
        self.emit(&objects, &roots)
    }

    fn emit(&self, objects: &[Object], roots: &[ObjectRef]) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::new();
        let mut output = Vec::new();

        // PDF Header
        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (index, obj) in objects.iter().enumerate() {
            offsets.push(output.len());
            output.extend_from_slice(&serializer.serialize_indirect(index as u32 + 1, 0, obj)?);
        }

        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", objects.len() + 1)?;
        // Object 0 is always free
        output.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            write!(output, "{:010} 00000 n \n", offset)?;
        }
        log::trace!("xref at {} with {} entries", xref_start, offsets.len() + 1);

        let mut trailer = Dictionary::new();
        trailer.insert("Size".to_string(), Object::from(objects.len() + 1));
        if let Some(root) = roots.first() {
            trailer.insert("Root".to_string(), Object::Reference(*root));
        }
        if let Some(info) = roots.get(1) {
            trailer.insert("Info".to_string(), Object::Reference(*info));
        }

        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &Object::Dictionary(trailer))?;
        write!(output, "\nstartxref\n{}\n%%EOF\n", xref_start)?;
        Ok(output)
    }

    fn add_page(
        &self,
        table: &mut ObjectTable,
        page: &Page,
        index: usize,
        parent: ObjectRef,
        page_refs: &[ObjectRef],
        fonts: &[FontEntry],
        images: &mut Vec<(Arc<ImageData>, ObjectRef)>,
    ) -> Result<Dictionary> {
        let resources = page.resources();
        let mut resource_dict = Dictionary::new();

        if !resources.fonts().is_empty() {
            let mut font_dict = Dictionary::new();
            for (alias, resource) in resources.fonts() {
                let reference = fonts
                    .iter()
                    .find(|e| e.font.same_as(resource.font()))
                    .and_then(|e| e.reference)
                    .ok_or_else(|| Error::Serialization(format!("font {} was not emitted", alias)))?;
                font_dict.insert(alias.clone(), Object::Reference(reference));
            }
            resource_dict.insert("Font".to_string(), Object::Dictionary(font_dict));
        }

        if !resources.images().is_empty() {
            let mut xobject_dict = Dictionary::new();
            for (alias, image) in resources.images() {
                let reference = match images.iter().find(|(i, _)| Arc::ptr_eq(i, image)) {
                    Some((_, r)) => *r,
                    None => {
                        let r = add_image(table, image);
                        images.push((Arc::clone(image), r));
                        r
                    },
                };
                xobject_dict.insert(alias.clone(), Object::Reference(reference));
            }
            resource_dict.insert("XObject".to_string(), Object::Dictionary(xobject_dict));
        }

        if !resources.ext_gstates().is_empty() {
            let mut gs_dict = Dictionary::new();
            for (alias, state) in resources.ext_gstates() {
                let r = table.add(Object::Dictionary(state.to_dict()));
                gs_dict.insert(alias.clone(), Object::Reference(r));
            }
            resource_dict.insert("ExtGState".to_string(), Object::Dictionary(gs_dict));
        }

        let content = page.content_stream().as_bytes().to_vec();
        let stream = if self.config.compress {
            Stream::with_filters(Dictionary::new(), content, vec![Filter::FlateDecode])
        } else {
            Stream::new(Dictionary::new(), content)
        };
        let contents = table.add(stream);

        let mut dict = Dictionary::new();
        dict.insert("Type".to_string(), Object::name("Page"));
        dict.insert("Parent".to_string(), Object::Reference(parent));
        dict.insert("MediaBox".to_string(), Object::rect(0.0, 0.0, page.width(), page.height()));
        dict.insert("Resources".to_string(), Object::Dictionary(resource_dict));
        dict.insert("Contents".to_string(), Object::Reference(contents));

        if !page.annotations().is_empty() {
            let mut annots = Vec::with_capacity(page.annotations().len());
            for annotation in page.annotations() {
                let r = add_annotation(table, annotation, page_refs[index], page_refs)?;
                annots.push(Object::Reference(r));
            }
            dict.insert("Annots".to_string(), Object::Array(annots));
        }
        Ok(dict)
    }

    fn add_font(&self, table: &mut ObjectTable, font: &Font, used: &BTreeSet<char>) -> Result<ObjectRef> {
        match font {
            Font::Standard(f) => Ok(table.add(Object::Dictionary(standard_font_dict(*f)))),
            Font::TrueType(f) => self.add_truetype_font(table, f, used),
        }
    }

    fn add_truetype_font(
        &self,
        table: &mut ObjectTable,
        font: &TrueTypeFont,
        used: &BTreeSet<char>,
    ) -> Result<ObjectRef> {
        let mut subsetter = FontSubsetter::new();
        for ch in used {
            subsetter.use_char(*ch, font.glyph_id(*ch).unwrap_or(0));
        }
        let base_font = subsetter.subset_font_name(font.postscript_name());
        let program = subsetter.subset_program(font.data())?;
        log::debug!(
            "embedding {} with {} glyphs ({} bytes)",
            base_font,
            subsetter.used_glyphs().len(),
            program.len()
        );

        let font_filters = if self.config.compress_fonts {
            vec![Filter::FlateDecode]
        } else {
            Vec::new()
        };

        let mut file_dict = Dictionary::new();
        file_dict.insert("Length1".to_string(), Object::from(program.len()));
        let font_file = table.add(Stream::with_filters(file_dict, program, font_filters.clone()));

        let (llx, lly, urx, ury) = font.bbox();
        let mut descriptor = Dictionary::new();
        descriptor.insert("Type".to_string(), Object::name("FontDescriptor"));
        descriptor.insert("FontName".to_string(), Object::name(base_font.clone()));
        descriptor.insert("Flags".to_string(), Object::from(font.flags()));
        descriptor.insert(
            "FontBBox".to_string(),
            Object::Array(vec![llx.into(), lly.into(), urx.into(), ury.into()]),
        );
        descriptor.insert("ItalicAngle".to_string(), Object::real(font.italic_angle()));
        descriptor.insert("Ascent".to_string(), Object::from(font.ascent()));
        descriptor.insert("Descent".to_string(), Object::from(font.descent()));
        descriptor.insert("CapHeight".to_string(), Object::from(font.cap_height()));
        descriptor.insert("StemV".to_string(), Object::from(font.stem_v()));
        descriptor.insert("FontFile2".to_string(), Object::Reference(font_file));
        let descriptor = table.add(Object::Dictionary(descriptor));

        let mut system_info = Dictionary::new();
        system_info.insert("Registry".to_string(), Object::string("Adobe"));
        system_info.insert("Ordering".to_string(), Object::string("Identity"));
        system_info.insert("Supplement".to_string(), Object::Integer(0));

        let mut cid_font = Dictionary::new();
        cid_font.insert("Type".to_string(), Object::name("Font"));
        cid_font.insert("Subtype".to_string(), Object::name("CIDFontType2"));
        cid_font.insert("BaseFont".to_string(), Object::name(base_font.clone()));
        cid_font.insert("CIDSystemInfo".to_string(), Object::Dictionary(system_info));
        cid_font.insert("FontDescriptor".to_string(), Object::Reference(descriptor));
        cid_font.insert("W".to_string(), widths_array(font, subsetter.used_glyphs()));
        cid_font.insert("CIDToGIDMap".to_string(), Object::name("Identity"));
        let cid_font = table.add(Object::Dictionary(cid_font));

        let to_unicode = table.add(Stream::with_filters(
            Dictionary::new(),
            subsetter.to_unicode_cmap().into_bytes(),
            font_filters,
        ));

        let mut type0 = Dictionary::new();
        type0.insert("Type".to_string(), Object::name("Font"));
        type0.insert("Subtype".to_string(), Object::name("Type0"));
        type0.insert("BaseFont".to_string(), Object::name(base_font));
        type0.insert("Encoding".to_string(), Object::name("Identity-H"));
        type0.insert("DescendantFonts".to_string(), Object::Array(vec![Object::Reference(cid_font)]));
        type0.insert("ToUnicode".to_string(), Object::Reference(to_unicode));
        Ok(table.add(Object::Dictionary(type0)))
    }
}

/// Group the fonts of every page, merging aliases that name the same font.
fn collect_fonts(pages: &[Page]) -> Vec<FontEntry> {
    let mut entries: Vec<FontEntry> = Vec::new();
    for page in pages {
        for resource in page.resources().fonts().values() {
            match entries.iter_mut().find(|e| e.font.same_as(resource.font())) {
                Some(entry) => entry.used.extend(resource.used_chars().iter().copied()),
                None => entries.push(FontEntry {
                    font: resource.font().clone(),
                    used: resource.used_chars().clone(),
                    reference: None,
                }),
            }
        }
    }
    entries
}

fn standard_font_dict(font: StandardFont) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.insert("Type".to_string(), Object::name("Font"));
    dict.insert("Subtype".to_string(), Object::name("Type1"));
    dict.insert("BaseFont".to_string(), Object::name(font.name()));
    if !font.is_symbolic() {
        dict.insert("Encoding".to_string(), Object::name("WinAnsiEncoding"));
    }
    dict
}

/// `W` array grouping runs of consecutive glyph ids: `[g [w1 w2 ...] ...]`.
fn widths_array(font: &TrueTypeFont, glyphs: &BTreeSet<u16>) -> Object {
    let mut out = Vec::new();
    let mut run: Vec<Object> = Vec::new();
    let mut run_start = 0u16;
    let mut previous: Option<u16> = None;

    for &gid in glyphs {
        if previous.map_or(true, |p| p + 1 != gid) {
            if !run.is_empty() {
                out.push(Object::from(run_start as i64));
                out.push(Object::Array(std::mem::take(&mut run)));
            }
            run_start = gid;
        }
        run.push(Object::from(font.glyph_width(gid) as i64));
        previous = Some(gid);
    }
    if !run.is_empty() {
        out.push(Object::from(run_start as i64));
        out.push(Object::Array(run));
    }
    Object::Array(out)
}

fn add_image(table: &mut ObjectTable, image: &ImageData) -> ObjectRef {
    let mut stream = image.to_stream();
    if let Some(mask) = image.soft_mask_stream() {
        let mask_ref = table.add(mask);
        stream.dict.insert("SMask".to_string(), Object::Reference(mask_ref));
    }
    table.add(stream)
}

fn add_annotation(
    table: &mut ObjectTable,
    annotation: &Annotation,
    page_ref: ObjectRef,
    page_refs: &[ObjectRef],
) -> Result<ObjectRef> {
    let rect = annotation.rect();
    let mut dict = Dictionary::new();
    dict.insert("Type".to_string(), Object::name("Annot"));
    dict.insert("Subtype".to_string(), Object::name(annotation.subtype()));
    dict.insert("Rect".to_string(), Object::rect(rect.x, rect.y, rect.width, rect.height));
    if let Some(name) = annotation.name() {
        dict.insert("NM".to_string(), Object::text(name));
    }
    dict.insert("P".to_string(), Object::Reference(page_ref));
    for (key, value) in annotation.entries() {
        dict.insert(key.clone(), value.clone());
    }
    if let Some(target) = annotation.destination() {
        let target_ref = page_refs.get(target).ok_or_else(|| {
            Error::Serialization(format!(
                "link targets page {} but the document has {}",
                target,
                page_refs.len()
            ))
        })?;
        dict.insert(
            "Dest".to_string(),
            Object::Array(vec![Object::Reference(*target_ref), Object::name("Fit")]),
        );
    }
    for (key, stream) in annotation.streams() {
        let r = table.add(stream.clone());
        dict.insert(key.clone(), Object::Reference(r));
    }
    Ok(table.add(Object::Dictionary(dict)))
}
