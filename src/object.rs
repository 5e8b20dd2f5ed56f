//! PDF object types.
//!
//! These are the typed values every other layer builds: pages, fonts,
//! annotations and images all end up as trees of [`Object`]s that the
//! writer serializes. Dictionaries keep insertion order so that repeated
//! serialization of the same document is byte-identical.

use bytes::Bytes;
use indexmap::IndexMap;

/// A PDF dictionary: unique names mapped to values, in insertion order.
pub type Dictionary = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array). Rendered as a literal or hex string by the writer.
    String(Vec<u8>),
    /// Name (written with a leading /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dictionary),
    /// Stream (dictionary + payload + filter chain)
    Stream(Stream),
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

/// Stream filters understood by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// zlib/deflate compression
    FlateDecode,
    /// LZW compression (early change = 1)
    LZWDecode,
    /// Two hex digits per byte, terminated by `>`
    ASCIIHexDecode,
    /// JPEG data, never re-encoded by the writer
    DCTDecode,
}

impl Filter {
    /// PDF name of the filter, without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::FlateDecode => "FlateDecode",
            Filter::LZWDecode => "LZWDecode",
            Filter::ASCIIHexDecode => "ASCIIHexDecode",
            Filter::DCTDecode => "DCTDecode",
        }
    }
}

/// A stream: dictionary, payload and the filters that apply to it.
///
/// `filters` is listed in decode order, the same order that appears in
/// the `/Filter` entry. When `encoded` is false the payload is raw and the
/// writer runs the chain; when true the payload already carries every
/// filter and is emitted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Stream dictionary, without `/Length` and `/Filter`
    pub dict: Dictionary,
    /// Payload bytes
    pub data: Bytes,
    /// Filter chain in decode order
    pub filters: Vec<Filter>,
    /// Whether `data` is already encoded
    pub encoded: bool,
}

impl Stream {
    /// Create an unfiltered stream.
    pub fn new(dict: Dictionary, data: impl Into<Bytes>) -> Self {
        Self {
            dict,
            data: data.into(),
            filters: Vec::new(),
            encoded: false,
        }
    }

    /// Create a stream whose payload the writer encodes through `filters`.
    pub fn with_filters(dict: Dictionary, data: impl Into<Bytes>, filters: Vec<Filter>) -> Self {
        Self {
            dict,
            data: data.into(),
            filters,
            encoded: false,
        }
    }

    /// Create a stream whose payload is already encoded with `filters`.
    pub fn encoded(dict: Dictionary, data: impl Into<Bytes>, filters: Vec<Filter>) -> Self {
        Self {
            dict,
            data: data.into(),
            filters,
            encoded: true,
        }
    }

    /// Append a filter to the end of the decode chain.
    pub fn push_filter(&mut self, filter: Filter) {
        if !self.filters.contains(&filter) {
            self.filters.push(filter);
        }
    }
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream(_) => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Create a name object.
    pub fn name(s: impl Into<String>) -> Self {
        Object::Name(s.into())
    }

    /// Create a string object from raw bytes or ASCII text.
    pub fn string(s: impl AsRef<[u8]>) -> Self {
        Object::String(s.as_ref().to_vec())
    }

    /// Create a PDF text string.
    ///
    /// ASCII text is stored as-is; anything else is encoded as UTF-16BE
    /// with a byte order mark, which the writer renders in hex form.
    pub fn text(s: &str) -> Self {
        if s.is_ascii() {
            return Object::String(s.as_bytes().to_vec());
        }
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes)
    }

    /// Create a real object.
    pub fn real(value: f32) -> Self {
        Object::Real(value as f64)
    }

    /// Create a rectangle array `[llx lly urx ury]`.
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Object::Array(vec![
            Object::real(x),
            Object::real(y),
            Object::real(x + width),
            Object::real(y + height),
        ])
    }

    /// Create a color component array from RGB floats.
    pub fn color_array(r: f32, g: f32, b: f32) -> Self {
        Object::Array(vec![Object::real(r), Object::real(g), Object::real(b)])
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to real number. Integers widen.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(r) => Some(*r),
            Object::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to string (bytes).
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Visit every reference reachable from this value without crossing
    /// into other indirect objects.
    pub fn for_each_reference(&self, f: &mut impl FnMut(ObjectRef)) {
        match self {
            Object::Reference(r) => f(*r),
            Object::Array(arr) => arr.iter().for_each(|o| o.for_each_reference(f)),
            Object::Dictionary(d) => d.values().for_each(|o| o.for_each_reference(f)),
            Object::Stream(s) => s.dict.values().for_each(|o| o.for_each_reference(f)),
            _ => {},
        }
    }

    /// Rewrite every reference reachable from this value.
    pub fn map_references(&mut self, f: &mut impl FnMut(ObjectRef) -> ObjectRef) {
        match self {
            Object::Reference(r) => *r = f(*r),
            Object::Array(arr) => arr.iter_mut().for_each(|o| o.map_references(f)),
            Object::Dictionary(d) => d.values_mut().for_each(|o| o.map_references(f)),
            Object::Stream(s) => s.dict.values_mut().for_each(|o| o.map_references(f)),
            _ => {},
        }
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Boolean(b)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<u32> for Object {
    fn from(i: u32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<usize> for Object {
    fn from(i: usize) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<f32> for Object {
    fn from(r: f32) -> Self {
        Object::Real(r as f64)
    }
}

impl From<f64> for Object {
    fn from(r: f64) -> Self {
        Object::Real(r)
    }
}

impl From<ObjectRef> for Object {
    fn from(r: ObjectRef) -> Self {
        Object::Reference(r)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Object::Dictionary(d)
    }
}

impl From<Vec<Object>> for Object {
    fn from(v: Vec<Object>) -> Self {
        Object::Array(v)
    }
}

impl From<Stream> for Object {
    fn from(s: Stream) -> Self {
        Object::Stream(s)
    }
}

/// Build a [`Dictionary`] from `key => value` pairs.
///
/// ```
/// use quire::{dict, object::Object};
///
/// let d = dict! { "Type" => Object::name("Page"), "Rotate" => 90 };
/// assert_eq!(d.len(), 2);
/// ```
#[macro_export]
macro_rules! dict {
    () => { $crate::object::Dictionary::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut d = $crate::object::Dictionary::new();
        $( d.insert(($key).to_string(), $crate::object::Object::from($value)); )+
        d
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Object::Null.type_name(), "Null");
        assert_eq!(Object::name("Page").type_name(), "Name");
        assert_eq!(Object::Stream(Stream::new(Dictionary::new(), Vec::new())).type_name(), "Stream");
    }

    #[test]
    fn test_text_string_ascii() {
        assert_eq!(Object::text("Hello"), Object::String(b"Hello".to_vec()));
    }

    #[test]
    fn test_text_string_utf16() {
        let obj = Object::text("é");
        assert_eq!(obj.as_string().unwrap(), &[0xFE, 0xFF, 0x00, 0xE9]);
    }

    #[test]
    fn test_dict_macro_preserves_order() {
        let d = dict! { "Type" => Object::name("Catalog"), "Count" => 3, "A" => true };
        let keys: Vec<_> = d.keys().cloned().collect();
        assert_eq!(keys, vec!["Type", "Count", "A"]);
        assert_eq!(d["Count"].as_integer(), Some(3));
    }

    #[test]
    fn test_rect_array() {
        let r = Object::rect(10.0, 20.0, 100.0, 50.0);
        let arr = r.as_array().unwrap();
        assert_eq!(arr[2].as_real(), Some(110.0));
        assert_eq!(arr[3].as_real(), Some(70.0));
    }

    #[test]
    fn test_reference_walk_and_map() {
        let mut obj = Object::Array(vec![
            Object::Reference(ObjectRef::new(3, 0)),
            Object::Dictionary(dict! { "P" => ObjectRef::new(4, 0) }),
        ]);
        let mut seen = Vec::new();
        obj.for_each_reference(&mut |r| seen.push(r.id));
        assert_eq!(seen, vec![3, 4]);

        obj.map_references(&mut |r| ObjectRef::new(r.id * 10, 0));
        let mut seen = Vec::new();
        obj.for_each_reference(&mut |r| seen.push(r.id));
        assert_eq!(seen, vec![30, 40]);
    }

    #[test]
    fn test_push_filter_dedups() {
        let mut s = Stream::new(Dictionary::new(), b"abc".to_vec());
        s.push_filter(Filter::FlateDecode);
        s.push_filter(Filter::FlateDecode);
        assert_eq!(s.filters, vec![Filter::FlateDecode]);
        assert_eq!(Filter::DCTDecode.name(), "DCTDecode");
    }
}
