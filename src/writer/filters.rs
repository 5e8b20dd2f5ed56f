//! Stream filter encoding.
//!
//! A stream lists its filters in decode order, so encoding walks the chain
//! backwards: for `[/ASCIIHexDecode /FlateDecode]` the payload is deflated
//! first and the compressed bytes are then hex-encoded.

use crate::error::{Error, Result};
use crate::object::{Filter, Stream};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Compress data using Flate/Deflate.
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress Flate/Deflate data.
pub fn decompress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut out = Vec::new();
    std::io::Read::read_to_end(&mut decoder, &mut out)?;
    Ok(out)
}

fn lzw_encode(data: &[u8]) -> Result<Vec<u8>> {
    weezl::encode::Encoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
        .encode(data)
        .map_err(|e| Error::Serialization(format!("LZW encoding failed: {}", e)))
}

fn lzw_decode(data: &[u8]) -> Result<Vec<u8>> {
    weezl::decode::Decoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
        .decode(data)
        .map_err(|e| Error::Serialization(format!("LZW decoding failed: {}", e)))
}

fn hex_encode(data: &[u8]) -> Vec<u8> {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = Vec::with_capacity(data.len() * 2 + 1);
    for &b in data {
        out.push(HEX[(b >> 4) as usize]);
        out.push(HEX[(b & 0x0F) as usize]);
    }
    out.push(b'>');
    out
}

fn hex_decode(data: &[u8]) -> Result<Vec<u8>> {
    let digits: Vec<u8> = data
        .iter()
        .copied()
        .take_while(|&b| b != b'>')
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let nibble = |c: u8| -> Result<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| Error::Serialization(format!("invalid hex digit 0x{:02X}", c)))
    };
    digits
        .chunks(2)
        .map(|pair| {
            let hi = nibble(pair[0])?;
            let lo = if pair.len() == 2 { nibble(pair[1])? } else { 0 };
            Ok((hi << 4) | lo)
        })
        .collect()
}

/// Encode `data` with a single filter.
pub fn encode(filter: Filter, data: &[u8]) -> Result<Vec<u8>> {
    match filter {
        Filter::FlateDecode => compress_data(data),
        Filter::LZWDecode => lzw_encode(data),
        Filter::ASCIIHexDecode => Ok(hex_encode(data)),
        Filter::DCTDecode => Ok(data.to_vec()),
    }
}

/// Decode `data` with a single filter.
pub fn decode(filter: Filter, data: &[u8]) -> Result<Vec<u8>> {
    match filter {
        Filter::FlateDecode => decompress_data(data),
        Filter::LZWDecode => lzw_decode(data),
        Filter::ASCIIHexDecode => hex_decode(data),
        Filter::DCTDecode => Ok(data.to_vec()),
    }
}

/// Produce the bytes that go between `stream` and `endstream`.
pub fn encode_stream(stream: &Stream) -> Result<Vec<u8>> {
    if stream.encoded {
        return Ok(stream.data.to_vec());
    }
    let mut data = stream.data.to_vec();
    for filter in stream.filters.iter().rev() {
        let before = data.len();
        data = encode(*filter, &data)?;
        log::trace!("{} encoded {} -> {} bytes", filter.name(), before, data.len());
    }
    Ok(data)
}

/// Undo every filter of an encoded payload, in declared order.
pub fn decode_chain(filters: &[Filter], data: &[u8]) -> Result<Vec<u8>> {
    let mut out = data.to_vec();
    for filter in filters {
        out = decode(*filter, &out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Dictionary;

    #[test]
    fn test_flate_roundtrip() {
        let data = b"BT /F1 12 Tf (Hello) Tj ET\n".repeat(20);
        let encoded = encode(Filter::FlateDecode, &data).unwrap();
        assert!(encoded.len() < data.len());
        assert_eq!(decode(Filter::FlateDecode, &encoded).unwrap(), data);
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(encode(Filter::ASCIIHexDecode, &[0x00, 0xAB, 0x7F]).unwrap(), b"00AB7F>");
        assert_eq!(decode(Filter::ASCIIHexDecode, b"00 AB 7>").unwrap(), vec![0x00, 0xAB, 0x70]);
    }

    #[test]
    fn test_dct_passthrough() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xD9];
        assert_eq!(encode(Filter::DCTDecode, &jpeg).unwrap(), jpeg.to_vec());
    }

    #[test]
    fn test_chain_encodes_in_reverse() {
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec();
        let stream = Stream::with_filters(
            Dictionary::new(),
            data.clone(),
            vec![Filter::ASCIIHexDecode, Filter::FlateDecode],
        );
        let encoded = encode_stream(&stream).unwrap();
        assert!(encoded.iter().all(|b| b.is_ascii_hexdigit() || *b == b'>'));
        assert_eq!(decode_chain(&stream.filters, &encoded).unwrap(), data);
    }

    #[test]
    fn test_lzw_roundtrip() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT".to_vec();
        let encoded = encode(Filter::LZWDecode, &data).unwrap();
        assert_eq!(decode(Filter::LZWDecode, &encoded).unwrap(), data);
    }

    #[test]
    fn test_pre_encoded_stream_untouched() {
        let stream = Stream::encoded(Dictionary::new(), vec![1u8, 2, 3], vec![Filter::FlateDecode]);
        assert_eq!(encode_stream(&stream).unwrap(), vec![1, 2, 3]);
    }
}
