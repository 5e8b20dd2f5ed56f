//! Pages: size, content stream, resources and annotations.
//!
//! A [`Page`] is the unit layout elements paint into. Painting appends
//! operators to the page's [`ContentStream`] and registers fonts, images
//! and graphics states in its [`Resources`], each under a short local alias.

use crate::error::Result;
use crate::fonts::Font;
use crate::geometry::Rect;
use crate::object::{Dictionary, Object, Stream};
use crate::writer::{ContentStreamBuilder, ImageData};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Standard page sizes, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    /// ISO A3 (842 x 1191)
    A3,
    /// ISO A4 (595 x 842)
    #[default]
    A4,
    /// ISO A5 (420 x 595)
    A5,
    /// US Letter (612 x 792)
    Letter,
    /// US Legal (612 x 1008)
    Legal,
    /// US Tabloid (792 x 1224)
    Tabloid,
    /// Any width and height
    Custom(f32, f32),
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A3 => (842.0, 1191.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::A5 => (420.0, 595.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom(w, h) => (*w, *h),
        }
    }

    /// The same size with width and height swapped.
    pub fn landscape(&self) -> PageSize {
        let (w, h) = self.dimensions();
        PageSize::Custom(h, w)
    }
}

/// An ExtGState resource; only opacity is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtGState {
    /// Fill opacity (`ca`)
    pub fill_opacity: Option<f32>,
    /// Stroke opacity (`CA`)
    pub stroke_opacity: Option<f32>,
}

impl ExtGState {
    /// A graphics state with the given fill opacity.
    pub fn fill_opacity(opacity: f32) -> Self {
        Self {
            fill_opacity: Some(opacity.clamp(0.0, 1.0)),
            stroke_opacity: None,
        }
    }

    pub(crate) fn to_dict(self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("Type".to_string(), Object::name("ExtGState"));
        if let Some(ca) = self.fill_opacity {
            dict.insert("ca".to_string(), Object::real(ca));
        }
        if let Some(ca) = self.stroke_opacity {
            dict.insert("CA".to_string(), Object::real(ca));
        }
        dict
    }
}

/// A font registered on a page together with every character shown through it.
#[derive(Debug, Clone)]
pub struct FontResource {
    font: Font,
    used_chars: BTreeSet<char>,
}

impl FontResource {
    /// The registered font.
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Characters painted with this alias.
    pub fn used_chars(&self) -> &BTreeSet<char> {
        &self.used_chars
    }
}

/// Per-page resource dictionary.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    fonts: IndexMap<String, FontResource>,
    images: IndexMap<String, Arc<ImageData>>,
    ext_gstates: IndexMap<String, ExtGState>,
}

impl Resources {
    /// Fonts by alias.
    pub fn fonts(&self) -> &IndexMap<String, FontResource> {
        &self.fonts
    }

    /// Image XObjects by alias.
    pub fn images(&self) -> &IndexMap<String, Arc<ImageData>> {
        &self.images
    }

    /// Graphics states by alias.
    pub fn ext_gstates(&self) -> &IndexMap<String, ExtGState> {
        &self.ext_gstates
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty() && self.images.is_empty() && self.ext_gstates.is_empty()
    }

    fn register_font(&mut self, font: &Font) -> String {
        if let Some((alias, _)) = self.fonts.iter().find(|(_, r)| r.font.same_as(font)) {
            return alias.clone();
        }
        let alias = fresh_alias("F", self.fonts.keys());
        self.fonts.insert(
            alias.clone(),
            FontResource {
                font: font.clone(),
                used_chars: BTreeSet::new(),
            },
        );
        alias
    }

    fn record_text(&mut self, alias: &str, text: &str) {
        if let Some(resource) = self.fonts.get_mut(alias) {
            resource.used_chars.extend(text.chars());
        }
    }

    fn register_image(&mut self, image: &Arc<ImageData>) -> String {
        if let Some((alias, _)) = self.images.iter().find(|(_, i)| Arc::ptr_eq(i, image)) {
            return alias.clone();
        }
        let alias = fresh_alias("Im", self.images.keys());
        self.images.insert(alias.clone(), Arc::clone(image));
        alias
    }

    fn mark(&self) -> ResourcesMark {
        ResourcesMark {
            used_chars: self.fonts.values().map(|r| r.used_chars.clone()).collect(),
            images: self.images.len(),
            ext_gstates: self.ext_gstates.len(),
        }
    }

    fn rollback(&mut self, mark: ResourcesMark) {
        self.fonts.truncate(mark.used_chars.len());
        for (resource, used) in self.fonts.values_mut().zip(mark.used_chars) {
            resource.used_chars = used;
        }
        self.images.truncate(mark.images);
        self.ext_gstates.truncate(mark.ext_gstates);
    }

    fn register_ext_gstate(&mut self, state: ExtGState) -> String {
        if let Some((alias, _)) = self.ext_gstates.iter().find(|(_, s)| **s == state) {
            return alias.clone();
        }
        let alias = fresh_alias("GS", self.ext_gstates.keys());
        self.ext_gstates.insert(alias.clone(), state);
        alias
    }
}

/// Resource state captured by [`Page::mark`]. Registration only appends, so
/// counts are enough, except for the characters recorded on existing fonts.
#[derive(Debug, Clone)]
struct ResourcesMark {
    used_chars: Vec<BTreeSet<char>>,
    images: usize,
    ext_gstates: usize,
}

/// Everything a paint can add to a page, as it was at some point.
///
/// Taken with [`Page::mark`] before painting and restored with
/// [`Page::rollback`] when the paint fails.
#[derive(Debug, Clone)]
pub struct PageMark {
    content: usize,
    resources: ResourcesMark,
    annotations: usize,
}

/// Mint `{prefix}{n}` with the smallest positive `n` not already taken.
fn fresh_alias<'a>(prefix: &str, taken: impl Iterator<Item = &'a String>) -> String {
    let used: BTreeSet<u32> = taken
        .filter_map(|alias| alias.strip_prefix(prefix)?.parse().ok())
        .collect();
    let n = (1u32..).find(|n| !used.contains(n)).unwrap_or(1);
    format!("{}{}", prefix, n)
}

/// The byte buffer of PDF operators that paints a page.
///
/// Append-only, except that a failed paint can roll back to a mark.
#[derive(Debug, Clone, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    /// Raw operator bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been painted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a newline unless the buffer is empty or already ends in one.
    pub fn ensure_trailing_newline(&mut self) {
        if !self.data.is_empty() && !self.data.ends_with(b"\n") {
            self.data.push(b'\n');
        }
    }

    /// Append raw bytes.
    pub fn append_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append the operators of a builder, starting on a fresh line.
    pub fn append(&mut self, ops: &ContentStreamBuilder) -> Result<()> {
        let bytes = ops.build()?;
        self.ensure_trailing_newline();
        self.data.extend_from_slice(&bytes);
        Ok(())
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }
}

/// An annotation as persisted on a page.
///
/// Annotation layout elements build one of these when painted. The writer
/// adds `/Type`, `/P` and `/NM`, resolves `destination` to a page
/// reference and writes every entry of `streams` as an indirect stream.
#[derive(Debug, Clone)]
pub struct Annotation {
    subtype: String,
    rect: Rect,
    entries: Dictionary,
    destination: Option<usize>,
    streams: IndexMap<String, Stream>,
    name: Option<String>,
}

impl Annotation {
    /// Create an annotation of the given subtype covering `rect`.
    pub fn new(subtype: impl Into<String>, rect: Rect) -> Self {
        Self {
            subtype: subtype.into(),
            rect,
            entries: Dictionary::new(),
            destination: None,
            streams: IndexMap::new(),
            name: None,
        }
    }

    /// Set a dictionary entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Jump to a page (0-based) when activated.
    pub fn set_destination(&mut self, page_index: usize) -> &mut Self {
        self.destination = Some(page_index);
        self
    }

    /// Attach a stream written as an indirect object under `key`.
    pub fn set_stream(&mut self, key: impl Into<String>, stream: Stream) -> &mut Self {
        self.streams.insert(key.into(), stream);
        self
    }

    /// Annotation subtype, such as `Link` or `Highlight`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Rectangle on the page.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Extra dictionary entries.
    pub fn entries(&self) -> &Dictionary {
        &self.entries
    }

    /// Destination page index, for internal links.
    pub fn destination(&self) -> Option<usize> {
        self.destination
    }

    /// Streams keyed by dictionary entry.
    pub fn streams(&self) -> &IndexMap<String, Stream> {
        &self.streams
    }

    /// The unique `NM` assigned when added to a page.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A single page of a document.
#[derive(Debug, Clone)]
pub struct Page {
    width: f32,
    height: f32,
    content: ContentStream,
    resources: Resources,
    annotations: Vec<Annotation>,
}

impl Page {
    /// An empty A4 portrait page.
    pub fn new() -> Self {
        Self::with_size(PageSize::A4)
    }

    /// An empty page of the given size.
    pub fn with_size(size: PageSize) -> Self {
        let (width, height) = size.dimensions();
        Self {
            width,
            height,
            content: ContentStream::default(),
            resources: Resources::default(),
            annotations: Vec::new(),
        }
    }

    /// Width and height in points.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Change the page size.
    pub fn set_size(&mut self, size: PageSize) -> &mut Self {
        let (width, height) = size.dimensions();
        self.width = width;
        self.height = height;
        self
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The page's MediaBox.
    pub fn media_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// The operator buffer.
    pub fn content_stream(&self) -> &ContentStream {
        &self.content
    }

    /// Mutable access to the operator buffer.
    pub fn content_stream_mut(&mut self) -> &mut ContentStream {
        &mut self.content
    }

    /// The resource dictionary.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Register a font, returning its alias (`F1`, `F2`, ...).
    pub fn register_font(&mut self, font: &Font) -> String {
        self.resources.register_font(font)
    }

    /// Record characters shown through a font alias, for subsetting.
    pub fn record_text(&mut self, alias: &str, text: &str) {
        self.resources.record_text(alias, text);
    }

    /// Register an image XObject, returning its alias (`Im1`, ...).
    pub fn register_image(&mut self, image: &Arc<ImageData>) -> String {
        self.resources.register_image(image)
    }

    /// Register a graphics state, returning its alias (`GS1`, ...).
    pub fn register_ext_gstate(&mut self, state: ExtGState) -> String {
        self.resources.register_ext_gstate(state)
    }

    /// Append an annotation and assign it a unique `annotation-NNN` name.
    pub fn add_annotation(&mut self, mut annotation: Annotation) -> String {
        let used: BTreeSet<u32> = self
            .annotations
            .iter()
            .filter_map(|a| a.name.as_deref()?.strip_prefix("annotation-")?.parse().ok())
            .collect();
        let n = (1u32..).find(|n| !used.contains(n)).unwrap_or(1);
        let name = format!("annotation-{:03}", n);
        annotation.name = Some(name.clone());
        self.annotations.push(annotation);
        name
    }

    /// Annotations in paint order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Capture the content, resources and annotations painted so far.
    pub fn mark(&self) -> PageMark {
        PageMark {
            content: self.content.len(),
            resources: self.resources.mark(),
            annotations: self.annotations.len(),
        }
    }

    /// Drop everything painted since `mark` was taken.
    pub fn rollback(&mut self, mark: PageMark) {
        self.content.truncate(mark.content);
        self.resources.rollback(mark.resources);
        self.annotations.truncate(mark.annotations);
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
