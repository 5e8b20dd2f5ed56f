//! Integration tests for the layout engine: text emission, page flow and
//! the save/restore discipline of painted content.

use quire::layout::{
    CodeSnippet, HorizontalAlignment, LayoutElement, LineArt, MultiColumnLayout, OrderedList, PageLayout, Paragraph,
    RegexLexer, SingleColumnLayout, TextAlignment, UnorderedList,
};
use quire::{Color, Document, Page, Rect, Size};
use regex::Regex;

fn content(page: &Page) -> String {
    String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned()
}

/// `q` and `Q` operators balance and never go negative.
fn assert_balanced(text: &str) {
    let mut depth = 0i32;
    for op in text.split_whitespace() {
        match op {
            "q" => depth += 1,
            "Q" => {
                depth -= 1;
                assert!(depth >= 0, "Q without q");
            },
            _ => {},
        }
    }
    assert_eq!(depth, 0, "unbalanced q/Q");
}

#[test]
fn test_single_paragraph() {
    let mut doc = Document::new();
    {
        let mut layout = SingleColumnLayout::new(&mut doc);
        layout
            .add(&mut Paragraph::new("Hello, World!").with_font_size(12.0).unwrap())
            .unwrap();
    }
    let page = &doc.pages()[0];
    let text = content(page);
    let bt = text.find("BT").unwrap();
    let tj = text.find("(Hello, World!) Tj").unwrap();
    let et = text.find("ET").unwrap();
    assert!(bt < tj && tj < et);

    let fonts = page.resources().fonts();
    assert_eq!(fonts.len(), 1);
    assert_eq!(fonts.values().next().unwrap().font().name(), "Helvetica");
    assert_balanced(&text);

    let bytes = doc.to_bytes().unwrap();
    let written = String::from_utf8_lossy(&bytes);
    assert!(written.contains("/BaseFont /Helvetica"));
}

#[test]
fn test_overflow_page_break() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut doc = Document::new();
    let body: String = "The quick brown fox jumps over the lazy dog. ".repeat(12).chars().take(500).collect();
    assert_eq!(body.chars().count(), 500);

    let mut painted = Vec::new();
    {
        let mut layout = SingleColumnLayout::new(&mut doc);
        for _ in 0..60 {
            let mut paragraph = Paragraph::new(body.clone());
            layout.add(&mut paragraph).unwrap();
            painted.push((layout.page_index(), paragraph.previous_paint_box().unwrap()));
        }
    }

    assert!(doc.page_count() >= 2);
    // Every paragraph sits wholly inside the flowable area of its page.
    for (page_index, area) in &painted {
        let (width, height) = doc.pages()[*page_index].size();
        assert!(area.bottom() >= height * 0.1 - 1e-3);
        assert!(area.top() <= height * 0.9 + 1e-3);
        assert!(area.right() <= width * 0.9 + 1e-3);
    }
    for page in doc.pages() {
        assert_balanced(&content(page));
    }
}

#[test]
fn test_paragraph_too_tall_is_overflow() {
    let mut doc = Document::new();
    let mut layout = SingleColumnLayout::new(&mut doc);
    let mut huge = Paragraph::new("word ".repeat(5000));
    let err = layout.add(&mut huge).unwrap_err();
    assert!(err.is_overflow());
    drop(layout);
    assert_eq!(doc.page_count(), 1);
    assert!(doc.pages()[0].content_stream().is_empty());
}

#[test]
fn test_multi_column_flow() {
    let mut doc = Document::new();
    {
        let mut layout = MultiColumnLayout::new(&mut doc, 2).unwrap();
        for i in 0..80 {
            layout.add(&mut Paragraph::new(format!("Entry {}", i))).unwrap();
        }
    }
    let text = content(&doc.pages()[0]);
    // Left column starts at 10% of the A4 width; the right one is further in.
    let positions = Regex::new(r"(?m)^([\d.]+) [\d.]+ Td$").unwrap();
    let xs: Vec<f32> = positions
        .captures_iter(&text)
        .map(|c| c[1].parse().unwrap())
        .collect();
    assert!(xs.iter().any(|x| (x - 59.5).abs() < 1e-3));
    assert!(xs.iter().any(|x| *x > 595.0 / 2.0));
}

#[test]
fn test_mixed_elements_balance() {
    let mut doc = Document::new();
    {
        let mut layout = SingleColumnLayout::new(&mut doc);
        let mut heading = Paragraph::new("Report")
            .with_font_size(20.0)
            .unwrap()
            .with_text_alignment(TextAlignment::Centered)
            .with_background_color(Color::LIGHT_GRAY);
        layout.add(&mut heading).unwrap();

        let mut list = UnorderedList::new()
            .with_item(Paragraph::new("first"))
            .with_item(OrderedList::new().with_item(Paragraph::new("nested")));
        layout.add(&mut list).unwrap();

        let mut code = CodeSnippet::new("fn main() {\n    println!(\"hi\");\n}")
            .with_lexer(RegexLexer::rust())
            .with_line_numbers(true);
        layout.add(&mut code).unwrap();

        let mut star = LineArt::star(60.0, 60.0, 5)
            .unwrap()
            .with_fill_color(Color::YELLOW)
            .with_horizontal_alignment(HorizontalAlignment::Middle);
        layout.add(&mut star).unwrap();
    }
    let text = content(&doc.pages()[0]);
    assert_balanced(&text);
    assert!(text.contains("(Report) Tj"));
    assert!(text.contains("(nested) Tj"));
    assert!(text.contains("(fn) Tj"));
}

#[test]
fn test_failed_paint_leaves_stream_untouched() {
    let mut page = Page::new();
    let mut paragraph = Paragraph::new("does not fit");
    let before = page.content_stream().len();
    let err = paragraph.paint(Rect::new(0.0, 0.0, 10.0, 5.0), &mut page).unwrap_err();
    assert!(err.is_overflow());
    assert_eq!(page.content_stream().len(), before);
}

#[test]
fn test_size_is_memoized_per_available_space() {
    let paragraph = Paragraph::new("memo");
    let a = paragraph.get_size(Size::new(100.0, 100.0));
    let b = paragraph.get_size(Size::new(100.0, 100.0));
    assert_eq!(a, b);
}
