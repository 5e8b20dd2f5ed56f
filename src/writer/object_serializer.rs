//! PDF object serialization.
//!
//! Converts [`Object`] values to their byte representation. Every primitive
//! has exactly one encoding, so serializing the same object graph twice
//! yields identical bytes.

use super::filters;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, Stream};
use std::io::Write;

/// Format a real number: fixed point, at most 7 decimals, trailing zeros
/// trimmed, never in scientific notation.
///
/// ```
/// use quire::writer::format_real;
///
/// assert_eq!(format_real(0.5), "0.5");
/// assert_eq!(format_real(12.0), "12");
/// assert_eq!(format_real(1.0 / 3.0), "0.3333333");
/// assert_eq!(format_real(1e-9), "0");
/// ```
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{:.7}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" | "-" => "0".to_string(),
        s => s.to_string(),
    }
}

/// Whether a byte may appear unescaped inside a name.
fn is_regular_name_byte(byte: u8) -> bool {
    (b'!'..=b'~').contains(&byte)
        && !matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        )
}

/// Serializer for PDF objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a new object serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize an object to a string (for debugging and tests).
    pub fn serialize_to_string(&self, obj: &Object) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.serialize(obj)?).to_string())
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{object}\nendobj\n`
    pub fn serialize_indirect(&self, id: u32, gen: u16, obj: &Object) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        writeln!(buf, "{} {} obj", id, gen)?;
        self.write_object(&mut buf, obj)?;
        write!(buf, "\nendobj\n")?;
        Ok(buf)
    }

    /// Write an object to a buffer.
    pub fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> Result<()> {
        match obj {
            Object::Null => write!(w, "null")?,
            Object::Boolean(b) => write!(w, "{}", if *b { "true" } else { "false" })?,
            Object::Integer(i) => write!(w, "{}", i)?,
            Object::Real(r) => write!(w, "{}", format_real(*r))?,
            Object::String(s) => self.write_string(w, s)?,
            Object::Name(n) => self.write_name(w, n)?,
            Object::Array(arr) => self.write_array(w, arr)?,
            Object::Dictionary(dict) => self.write_dictionary(w, dict)?,
            Object::Stream(stream) => self.write_stream(w, stream)?,
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen)?,
        }
        Ok(())
    }

    /// Write a PDF string.
    ///
    /// Printable ASCII uses literal syntax `(...)`, escaping only the
    /// parentheses and backslash. Anything else is written as `<...>`.
    fn write_string<W: Write>(&self, w: &mut W, data: &[u8]) -> std::io::Result<()> {
        if data.iter().all(|b| (0x20..=0x7E).contains(b)) {
            w.write_all(b"(")?;
            for &byte in data {
                match byte {
                    b'(' | b')' | b'\\' => w.write_all(&[b'\\', byte])?,
                    _ => w.write_all(&[byte])?,
                }
            }
            w.write_all(b")")
        } else {
            w.write_all(b"<")?;
            for byte in data {
                write!(w, "{:02X}", byte)?;
            }
            w.write_all(b">")
        }
    }

    /// Write a PDF name, escaping irregular bytes as `#XX`.
    fn write_name<W: Write>(&self, w: &mut W, name: &str) -> std::io::Result<()> {
        w.write_all(b"/")?;
        for byte in name.bytes() {
            if is_regular_name_byte(byte) {
                w.write_all(&[byte])?;
            } else {
                write!(w, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> Result<()> {
        w.write_all(b"[")?;
        for obj in arr {
            w.write_all(b" ")?;
            self.write_object(w, obj)?;
        }
        w.write_all(b" ]")?;
        Ok(())
    }

    fn write_dictionary<W: Write>(&self, w: &mut W, dict: &Dictionary) -> Result<()> {
        w.write_all(b"<<")?;
        for (key, value) in dict {
            w.write_all(b" ")?;
            self.write_name(w, key)?;
            w.write_all(b" ")?;
            self.write_object(w, value)?;
        }
        w.write_all(b" >>")?;
        Ok(())
    }

    /// Write a PDF stream.
    ///
    /// The payload runs through the stream's filters and `/Length` is set to
    /// the encoded size. A pre-encoded stream that already declares a
    /// different `/Length` is rejected.
    fn write_stream<W: Write>(&self, w: &mut W, stream: &Stream) -> Result<()> {
        let payload = filters::encode_stream(stream)?;

        if let Some(declared) = stream.dict.get("Length") {
            if declared.as_integer() != Some(payload.len() as i64) {
                return Err(Error::Serialization(format!(
                    "stream declares Length {:?} but its encoded payload is {} bytes",
                    declared,
                    payload.len()
                )));
            }
        }

        let mut dict = stream.dict.clone();
        dict.insert("Length".to_string(), Object::Integer(payload.len() as i64));
        match stream.filters.as_slice() {
            [] => {
                dict.shift_remove("Filter");
            },
            [single] => {
                dict.insert("Filter".to_string(), Object::name(single.name()));
            },
            chain => {
                let names = chain.iter().map(|f| Object::name(f.name())).collect();
                dict.insert("Filter".to_string(), Object::Array(names));
            },
        }

        self.write_dictionary(w, &dict)?;
        w.write_all(b"\nstream\n")?;
        w.write_all(&payload)?;
        w.write_all(b"\nendstream")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;
    use crate::object::{Filter, ObjectRef};

    fn ser(obj: &Object) -> String {
        ObjectSerializer::new().serialize_to_string(obj).unwrap()
    }

    #[test]
    fn test_serialize_scalars() {
        assert_eq!(ser(&Object::Null), "null");
        assert_eq!(ser(&Object::Boolean(true)), "true");
        assert_eq!(ser(&Object::Integer(-42)), "-42");
        assert_eq!(ser(&Object::Reference(ObjectRef::new(5, 0))), "5 0 R");
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(1.23456789), "1.2345679");
        assert_eq!(format_real(-0.25), "-0.25");
        assert_eq!(format_real(-0.00000001), "0");
        assert_eq!(format_real(1e20), "100000000000000000000");
        assert_eq!(format_real(f64::NAN), "0");
    }

    #[test]
    fn test_serialize_name_escaping() {
        assert_eq!(ser(&Object::name("Type")), "/Type");
        assert_eq!(ser(&Object::name("A B")), "/A#20B");
        assert_eq!(ser(&Object::name("x#y")), "/x#23y");
        assert_eq!(ser(&Object::name("a(b)")), "/a#28b#29");
        assert_eq!(ser(&Object::name("é")), "/#C3#A9");
    }

    #[test]
    fn test_serialize_literal_string() {
        assert_eq!(ser(&Object::string("Hello (World) \\")), "(Hello \\(World\\) \\\\)");
    }

    #[test]
    fn test_serialize_hex_string() {
        assert_eq!(ser(&Object::String(vec![0x00, 0xFF, 0x41])), "<00FF41>");
        assert_eq!(ser(&Object::string("line\n")), "<6C696E650A>");
    }

    #[test]
    fn test_serialize_array() {
        let arr = Object::Array(vec![Object::Integer(1), Object::Real(2.5), Object::name("X")]);
        assert_eq!(ser(&arr), "[ 1 2.5 /X ]");
        assert_eq!(ser(&Object::Array(vec![])), "[ ]");
    }

    #[test]
    fn test_serialize_dictionary() {
        let d = Object::Dictionary(dict! { "Type" => Object::name("Page"), "Count" => 2 });
        assert_eq!(ser(&d), "<< /Type /Page /Count 2 >>");
        assert_eq!(ser(&Object::Dictionary(Dictionary::new())), "<< >>");
    }

    #[test]
    fn test_serialize_stream_sets_length() {
        let s = Object::Stream(Stream::new(Dictionary::new(), b"0 0 m 10 10 l S".to_vec()));
        let out = ser(&s);
        assert_eq!(out, "<< /Length 15 >>\nstream\n0 0 m 10 10 l S\nendstream");
    }

    #[test]
    fn test_serialize_flate_stream() {
        let data = b"q 1 0 0 rg 0 0 10 10 re f Q\n".repeat(10);
        let s = Object::Stream(Stream::with_filters(Dictionary::new(), data.clone(), vec![Filter::FlateDecode]));
        let bytes = ObjectSerializer::new().serialize(&s).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Filter /FlateDecode"));

        let start = bytes.windows(8).position(|w| w == b"stream\n").unwrap() + 7;
        let end = bytes.len() - b"\nendstream".len();
        let payload = &bytes[start..end];
        assert!(text.contains(&format!("/Length {}", payload.len())));
        assert_eq!(filters::decompress_data(payload).unwrap(), data);
    }

    #[test]
    fn test_serialize_filter_chain_as_array() {
        let s = Object::Stream(Stream::with_filters(
            Dictionary::new(),
            b"abc".to_vec(),
            vec![Filter::ASCIIHexDecode, Filter::FlateDecode],
        ));
        assert!(ser(&s).contains("/Filter [ /ASCIIHexDecode /FlateDecode ]"));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let s = Object::Stream(Stream::encoded(
            dict! { "Length" => 99 },
            vec![0xFF, 0xD8, 0xFF, 0xD9],
            vec![Filter::DCTDecode],
        ));
        let err = ObjectSerializer::new().serialize(&s).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_serialize_indirect() {
        let bytes = ObjectSerializer::new()
            .serialize_indirect(3, 0, &Object::Integer(7))
            .unwrap();
        assert_eq!(bytes, b"3 0 obj\n7\nendobj\n");
    }
}
