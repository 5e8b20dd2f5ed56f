//! Whitespace tokenizing, greedy line breaking and line emission.
//!
//! Text is split into pieces (words, collapsible spaces and forced breaks),
//! each tagged with the index of its style. Consecutive words with no space
//! between them form one unbreakable unit, so a word may change style midway.

use super::{Leading, TextAlignment};
use crate::color::Color;
use crate::error::Result;
use crate::fonts::Font;
use crate::geometry::{Rect, EPSILON};
use crate::page::Page;
use crate::writer::ContentStreamBuilder;

/// Font, size and color of a run of text.
#[derive(Debug, Clone)]
pub(crate) struct TextStyle {
    pub font: Font,
    pub font_size: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn width(&self, text: &str) -> f32 {
        self.font.text_width(text, self.font_size)
    }

    pub fn ascent(&self) -> f32 {
        self.font.ascent() as f32 * self.font_size / 1000.0
    }

    /// Negative.
    pub fn descent(&self) -> f32 {
        self.font.descent() as f32 * self.font_size / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceKind {
    Word,
    Space,
    Break,
}

#[derive(Debug, Clone)]
pub(crate) struct Piece {
    pub text: String,
    pub style: usize,
    pub width: f32,
    pub kind: PieceKind,
}

/// How whitespace inside a run is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Whitespace {
    /// Runs of whitespace collapse to one breakable space.
    Collapse { respect_newlines: bool },
    /// Text is kept verbatim and never split.
    Preserve,
}

/// Split `text` into pieces and append them to `out`.
pub(crate) fn tokenize(text: &str, style_index: usize, style: &TextStyle, mode: Whitespace, out: &mut Vec<Piece>) {
    let word = |s: &str| Piece {
        text: s.to_string(),
        style: style_index,
        width: style.width(s),
        kind: PieceKind::Word,
    };

    let respect_newlines = match mode {
        Whitespace::Preserve => {
            if !text.is_empty() {
                out.push(word(text));
            }
            return;
        },
        Whitespace::Collapse { respect_newlines } => respect_newlines,
    };

    let mut current = String::new();
    for ch in text.chars() {
        if !ch.is_whitespace() {
            current.push(ch);
            continue;
        }
        if !current.is_empty() {
            out.push(word(&current));
            current.clear();
        }
        if ch == '\n' && respect_newlines {
            if matches!(out.last(), Some(p) if p.kind == PieceKind::Space) {
                out.pop();
            }
            out.push(Piece {
                text: String::new(),
                style: style_index,
                width: 0.0,
                kind: PieceKind::Break,
            });
        } else if !matches!(out.last(), Some(p) if p.kind != PieceKind::Word) {
            out.push(Piece {
                text: " ".to_string(),
                style: style_index,
                width: style.width(" "),
                kind: PieceKind::Space,
            });
        }
    }
    if !current.is_empty() {
        out.push(word(&current));
    }
}

/// One laid-out line.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    pub pieces: Vec<Piece>,
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Largest font size on the line
    pub font_size: f32,
    /// Last line of a paragraph; never justified
    pub ends_paragraph: bool,
}

impl Line {
    fn new(pieces: Vec<Piece>, styles: &[TextStyle], fallback_style: usize, ends_paragraph: bool) -> Self {
        let mut ascent: f32 = 0.0;
        let mut descent: f32 = 0.0;
        let mut font_size: f32 = 0.0;
        let used: Vec<usize> = if pieces.is_empty() {
            vec![fallback_style]
        } else {
            pieces.iter().map(|p| p.style).collect()
        };
        for index in used {
            if let Some(style) = styles.get(index) {
                ascent = ascent.max(style.ascent());
                descent = descent.min(style.descent());
                font_size = font_size.max(style.font_size);
            }
        }
        Line {
            width: pieces.iter().map(|p| p.width).sum(),
            pieces,
            ascent,
            descent,
            font_size,
            ends_paragraph,
        }
    }

    /// Distance from the previous baseline.
    pub fn leading(&self, leading: Leading) -> f32 {
        match leading {
            Leading::Multiplied(factor) => factor * self.font_size,
            Leading::Fixed(value) => value,
        }
    }

    fn space_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.kind == PieceKind::Space).count()
    }
}

/// Greedy line breaking at `max_width`.
///
/// A unit wider than `max_width` is placed on a line of its own.
pub(crate) fn break_lines(pieces: &[Piece], styles: &[TextStyle], max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Vec<Piece> = Vec::new();
    let mut current_width = 0.0;
    let mut pending_space: Option<&Piece> = None;
    let mut last_style = 0;

    let mut i = 0;
    while i < pieces.len() {
        let piece = &pieces[i];
        last_style = piece.style;
        match piece.kind {
            PieceKind::Break => {
                lines.push(Line::new(std::mem::take(&mut current), styles, piece.style, true));
                current_width = 0.0;
                pending_space = None;
                i += 1;
            },
            PieceKind::Space => {
                if !current.is_empty() {
                    pending_space = Some(piece);
                }
                i += 1;
            },
            PieceKind::Word => {
                let end = pieces[i..]
                    .iter()
                    .position(|p| p.kind != PieceKind::Word)
                    .map_or(pieces.len(), |n| i + n);
                let unit = &pieces[i..end];
                let unit_width: f32 = unit.iter().map(|p| p.width).sum();
                let space_width = pending_space.map_or(0.0, |s| s.width);

                if !current.is_empty() && current_width + space_width + unit_width > max_width + EPSILON {
                    lines.push(Line::new(std::mem::take(&mut current), styles, piece.style, false));
                    current_width = 0.0;
                } else if let Some(space) = pending_space {
                    current.push(space.clone());
                    current_width += space.width;
                }
                pending_space = None;
                current.extend(unit.iter().cloned());
                current_width += unit_width;
                i = end;
            },
        }
    }
    if !current.is_empty() {
        lines.push(Line::new(current, styles, last_style, true));
    } else if let Some(last) = lines.last_mut() {
        last.ends_paragraph = true;
    }
    lines
}

/// Total height of stacked lines: first ascent, leadings, last descent.
pub(crate) fn lines_height(lines: &[Line], leading: Leading) -> f32 {
    let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
        return 0.0;
    };
    let leadings: f32 = lines.iter().skip(1).map(|l| l.leading(leading)).sum();
    first.ascent + leadings - last.descent
}

/// Widest line.
pub(crate) fn lines_width(lines: &[Line]) -> f32 {
    lines.iter().map(|l| l.width).fold(0.0, f32::max)
}

/// Emit text operators for `lines` inside `area`, top-down.
pub(crate) fn paint_lines(
    lines: &[Line],
    styles: &[TextStyle],
    area: Rect,
    alignment: TextAlignment,
    leading: Leading,
    page: &mut Page,
) -> Result<()> {
    let mut ops = ContentStreamBuilder::new();
    let mut baseline = area.top();

    for (index, line) in lines.iter().enumerate() {
        baseline -= if index == 0 { line.ascent } else { line.leading(leading) };

        let free = (area.width - line.width).max(0.0);
        let spaces = line.space_count();
        let (mut x, gap_extra) = match alignment {
            TextAlignment::Left => (area.x, 0.0),
            TextAlignment::Right => (area.x + free, 0.0),
            TextAlignment::Centered => (area.x + free / 2.0, 0.0),
            TextAlignment::Justified if !line.ends_paragraph && spaces > 0 => (area.x, free / spaces as f32),
            TextAlignment::Justified => (area.x, 0.0),
        };

        // Merge same-style pieces into runs; justified spaces split runs.
        let mut run = String::new();
        let mut run_style = None;
        let mut run_x = x;
        let mut run_width = 0.0;
        for piece in &line.pieces {
            let split = gap_extra > 0.0 && piece.kind == PieceKind::Space;
            if run_style != Some(piece.style) || split {
                if let Some(style) = run_style {
                    emit_run(&mut ops, page, &styles[style], &run, run_x, baseline);
                }
                run.clear();
                run_style = None;
                run_x = x;
                run_width = 0.0;
            }
            if split {
                x += piece.width + gap_extra;
                run_x = x;
                continue;
            }
            run_style = Some(piece.style);
            run.push_str(&piece.text);
            run_width += piece.width;
            x = run_x + run_width;
        }
        if let Some(style) = run_style {
            emit_run(&mut ops, page, &styles[style], &run, run_x, baseline);
        }
    }
    page.content_stream_mut().append(&ops)
}

fn emit_run(ops: &mut ContentStreamBuilder, page: &mut Page, style: &TextStyle, text: &str, x: f32, y: f32) {
    if text.is_empty() {
        return;
    }
    let alias = page.register_font(&style.font);
    page.record_text(&alias, text);
    ops.begin_text()
        .set_font(&alias, style.font_size)
        .set_fill_color(style.color)
        .move_text(x, y)
        .show_text(style.font.encode(text))
        .end_text();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courier(size: f32) -> TextStyle {
        TextStyle {
            font: Font::courier(),
            font_size: size,
            color: Color::BLACK,
        }
    }

    fn pieces(text: &str, mode: Whitespace) -> Vec<Piece> {
        let mut out = Vec::new();
        tokenize(text, 0, &courier(10.0), mode, &mut out);
        out
    }

    fn line_texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.pieces.iter().map(|p| p.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_whitespace_collapses() {
        let p = pieces("  a \t b  ", Whitespace::Collapse { respect_newlines: false });
        let kinds: Vec<PieceKind> = p.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![PieceKind::Space, PieceKind::Word, PieceKind::Space, PieceKind::Word, PieceKind::Space]
        );
    }

    #[test]
    fn test_preserve_keeps_text() {
        let p = pieces("  let x = 1;", Whitespace::Preserve);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].text, "  let x = 1;");
        assert!((p[0].width - 72.0).abs() < 1e-4);
    }

    #[test]
    fn test_break_at_width() {
        // Courier 10pt: 6pt per character.
        let styles = [courier(10.0)];
        let p = pieces("aaa bbb ccc", Whitespace::Collapse { respect_newlines: false });
        let lines = break_lines(&p, &styles, 42.0);
        assert_eq!(line_texts(&lines), vec!["aaa bbb", "ccc"]);
        assert!((lines[0].width - 42.0).abs() < 1e-4);
        assert!(!lines[0].ends_paragraph);
        assert!(lines[1].ends_paragraph);
    }

    #[test]
    fn test_long_word_on_own_line() {
        let styles = [courier(10.0)];
        let p = pieces("a verylongword b", Whitespace::Collapse { respect_newlines: false });
        let lines = break_lines(&p, &styles, 30.0);
        assert_eq!(line_texts(&lines), vec!["a", "verylongword", "b"]);
    }

    #[test]
    fn test_respect_newlines() {
        let styles = [courier(10.0)];
        let p = pieces("one\n\ntwo", Whitespace::Collapse { respect_newlines: true });
        let lines = break_lines(&p, &styles, 500.0);
        assert_eq!(line_texts(&lines), vec!["one", "", "two"]);
        assert!(lines.iter().all(|l| l.ends_paragraph));
    }

    #[test]
    fn test_newline_collapses_without_respect() {
        let styles = [courier(10.0)];
        let p = pieces("one\ntwo", Whitespace::Collapse { respect_newlines: false });
        assert_eq!(line_texts(&break_lines(&p, &styles, 500.0)), vec!["one two"]);
    }

    #[test]
    fn test_adjacent_words_do_not_break() {
        let styles = [courier(10.0), courier(10.0)];
        let mut p = Vec::new();
        tokenize("ab", 0, &styles[0], Whitespace::Collapse { respect_newlines: false }, &mut p);
        tokenize("cd ef", 1, &styles[1], Whitespace::Collapse { respect_newlines: false }, &mut p);
        let lines = break_lines(&p, &styles, 30.0);
        assert_eq!(line_texts(&lines), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_lines_height() {
        let styles = [courier(10.0)];
        let p = pieces("a b", Whitespace::Collapse { respect_newlines: false });
        let lines = break_lines(&p, &styles, 6.0);
        assert_eq!(lines.len(), 2);
        // Courier ascent 6.29, descent -1.57, leading 12
        let h = lines_height(&lines, Leading::Multiplied(1.2));
        assert!((h - (6.29 + 12.0 + 1.57)).abs() < 1e-3);
        assert_eq!(lines_height(&[], Leading::default()), 0.0);
    }

    #[test]
    fn test_justified_splits_runs() {
        let styles = [courier(10.0)];
        let p = pieces("aa bb cc dd", Whitespace::Collapse { respect_newlines: false });
        let lines = break_lines(&p, &styles, 60.0);
        let mut page = Page::new();
        let area = Rect::new(0.0, 0.0, 60.0, 100.0);
        paint_lines(&lines, &styles, area, TextAlignment::Justified, Leading::default(), &mut page).unwrap();
        let text = String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned();
        // First line "aa bb cc" is justified word by word; the last line is not.
        assert!(text.contains("(aa) Tj"));
        assert!(text.contains("(cc) Tj"));
        assert!(text.contains("48 "));
        assert!(text.contains("(dd) Tj"));
    }

    #[test]
    fn test_left_line_is_one_run() {
        let styles = [courier(10.0)];
        let p = pieces("Hello, World!", Whitespace::Collapse { respect_newlines: false });
        let lines = break_lines(&p, &styles, 500.0);
        let mut page = Page::new();
        paint_lines(&lines, &styles, Rect::new(0.0, 0.0, 500.0, 50.0), TextAlignment::Left, Leading::default(), &mut page)
            .unwrap();
        let text = String::from_utf8_lossy(page.content_stream().as_bytes()).into_owned();
        assert!(text.contains("BT\n/F1 10 Tf\n0 0 0 rg\n"));
        assert!(text.contains("(Hello, World!) Tj\nET\n"));
    }
}
