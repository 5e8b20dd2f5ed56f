//! End-to-end tests for document serialization.
//!
//! Files are written to a temporary directory and re-parsed with regular
//! expressions to check the header, object count, xref offsets and
//! trailer.

use quire::layout::{Image, PageLayout, Paragraph, SingleColumnLayout};
use quire::writer::ColorSpace;
use quire::{Document, Error, Page, PageSize, WriterConfig};
use regex::bytes::Regex;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn count_objects(bytes: &[u8]) -> usize {
    Regex::new(r"(?m)^\d+ 0 obj$").unwrap().find_iter(bytes).count()
}

/// Check that every in-use xref entry points at `N G obj` for its index.
fn assert_xref_integrity(bytes: &[u8]) {
    let startxref = Regex::new(r"startxref\n(\d+)\n%%EOF").unwrap();
    let offset: usize = std::str::from_utf8(&startxref.captures(bytes).unwrap()[1])
        .unwrap()
        .parse()
        .unwrap();
    assert!(bytes[offset..].starts_with(b"xref\n"));

    let header = Regex::new(r"^xref\n0 (\d+)\n").unwrap();
    let caps = header.captures(&bytes[offset..]).unwrap();
    let count: usize = std::str::from_utf8(&caps[1]).unwrap().parse().unwrap();
    let mut pos = offset + caps[0].len();

    let entry = Regex::new(r"^(\d{10}) (\d{5}) ([nf]) \n").unwrap();
    for index in 0..count {
        let line = &bytes[pos..pos + 20];
        let caps = entry.captures(line).unwrap_or_else(|| panic!("bad xref entry {}", index));
        if &caps[3] == b"n" {
            let at: usize = std::str::from_utf8(&caps[1]).unwrap().parse().unwrap();
            let generation: u16 = std::str::from_utf8(&caps[2]).unwrap().parse().unwrap();
            let expected = format!("{} {} obj", index, generation);
            assert!(
                bytes[at..].starts_with(expected.as_bytes()),
                "xref entry {} points at {:?}",
                index,
                String::from_utf8_lossy(&bytes[at..at + 20.min(bytes.len() - at)])
            );
        }
        pos += 20;
    }
    let trailer = Regex::new(r"trailer\n<< /Size (\d+) ").unwrap();
    let size: usize = std::str::from_utf8(&trailer.captures(bytes).unwrap()[1]).unwrap().parse().unwrap();
    assert_eq!(size, count);
}

#[test]
fn test_empty_document_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");

    let mut doc = Document::new();
    doc.append_page(Page::new());
    doc.write(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    // Binary marker: line two is a comment of four high-bit bytes.
    assert!(bytes[9..].starts_with(b"%") && bytes[10..14].iter().all(|b| *b >= 0x80));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert_eq!(count_objects(&bytes), 4);
    assert_xref_integrity(&bytes);
}

#[test]
fn test_write_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("only.pdf");
    let mut doc = Document::new();
    doc.append_page(Page::new());
    doc.write(&path).unwrap();
    doc.write(&path).unwrap();
    let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(names, vec![std::ffi::OsString::from("only.pdf")]);
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::new();
    doc.append_page(Page::new());
    let err = doc.write(dir.path().join("missing").join("out.pdf")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_xref_integrity_with_content() {
    init_logging();
    let mut doc = Document::new();
    doc.set_title("Xref").set_author("Tester");
    {
        let mut layout = SingleColumnLayout::new(&mut doc);
        for i in 0..30 {
            layout
                .add(&mut Paragraph::new(format!("Paragraph number {} with some body text.", i)))
                .unwrap();
        }
        let mut image = Image::from_raw(2, 2, 8, ColorSpace::DeviceRGB, vec![255u8; 12]).unwrap();
        layout.add(&mut image).unwrap();
    }
    doc.add_outline("Start", 0, 0);

    for config in [WriterConfig::default(), WriterConfig::default().with_compress(true)] {
        let bytes = doc.to_bytes_with(&config).unwrap();
        assert_xref_integrity(&bytes);
    }
}

#[test]
fn test_media_box_follows_page_size() {
    let mut doc = Document::new();
    doc.append_page(Page::with_size(PageSize::Letter));
    doc.append_page(Page::with_size(PageSize::A4.landscape()));
    let bytes = doc.to_bytes().unwrap();
    let media_box = Regex::new(r"/MediaBox \[ 0 0 (\d+) (\d+) \]").unwrap();
    let boxes: Vec<(Vec<u8>, Vec<u8>)> = media_box
        .captures_iter(&bytes)
        .map(|c| (c[1].to_vec(), c[2].to_vec()))
        .collect();
    assert_eq!(
        boxes,
        vec![
            (b"612".to_vec(), b"792".to_vec()),
            (b"842".to_vec(), b"595".to_vec())
        ]
    );
}

#[test]
fn test_compressed_content_is_smaller() {
    let mut doc = Document::new();
    {
        let mut layout = SingleColumnLayout::new(&mut doc);
        layout.add(&mut Paragraph::new("repeat ".repeat(400))).unwrap();
    }
    let plain = doc.to_bytes().unwrap();
    let compressed = doc.to_bytes_with(&WriterConfig::default().with_compress(true)).unwrap();
    assert!(compressed.len() < plain.len());
    assert!(Regex::new(r"/Filter /FlateDecode").unwrap().is_match(&compressed));
}
