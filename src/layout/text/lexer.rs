//! Line-oriented syntax highlighting for code snippets.

use crate::color::{Color, Rgb};
use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

/// Classes of source tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word
    Keyword,
    /// String or character literal
    String,
    /// Comment to end of line
    Comment,
    /// Numeric literal
    Number,
    /// Anything else
    Text,
}

/// A classified slice of a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token class
    pub kind: TokenKind,
    /// Source text
    pub text: String,
}

/// Splits one line of source into classified tokens.
///
/// Concatenating the token texts must reproduce the line.
pub trait SyntaxLexer {
    /// Tokenize a single line (no trailing newline).
    fn tokenize(&self, line: &str) -> Vec<Token>;
}

/// A lexer driven by anchored regular expressions, tried in order.
#[derive(Debug, Clone)]
pub struct RegexLexer {
    rules: Vec<(TokenKind, Regex)>,
}

const RUST_KEYWORDS: &str = "as|async|await|break|const|continue|crate|dyn|else|enum|extern|false|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|self|Self|static|struct|super|trait|true|type|unsafe|use|where|while";

const PYTHON_KEYWORDS: &str = "False|None|True|and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield";

lazy_static! {
    static ref RUST: RegexLexer = RegexLexer::compile(&[
        (TokenKind::Comment, r"//.*"),
        (TokenKind::String, r#""(?:[^"\\]|\\.)*"?"#),
        (TokenKind::String, r"'(?:[^'\\]|\\.)'"),
        (TokenKind::Keyword, format!(r"(?:{})\b", RUST_KEYWORDS).as_str()),
        (TokenKind::Number, r"\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?(?:[iuf](?:8|16|32|64|128|size))?\b"),
    ])
    .unwrap();
    static ref PYTHON: RegexLexer = RegexLexer::compile(&[
        (TokenKind::Comment, r"#.*"),
        (TokenKind::String, r#""(?:[^"\\]|\\.)*"?"#),
        (TokenKind::String, r"'(?:[^'\\]|\\.)*'?"),
        (TokenKind::Keyword, format!(r"(?:{})\b", PYTHON_KEYWORDS).as_str()),
        (TokenKind::Number, r"\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?j?\b"),
    ])
    .unwrap();
}

impl RegexLexer {
    /// Build a lexer from `(kind, pattern)` rules. The first rule that
    /// matches at the current position wins.
    pub fn new(rules: &[(TokenKind, &str)]) -> Result<Self> {
        Self::compile(rules)
    }

    fn compile(rules: &[(TokenKind, &str)]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|(kind, pattern)| {
                Regex::new(&format!("^(?:{})", pattern))
                    .map(|re| (*kind, re))
                    .map_err(|e| Error::InvalidArgument(format!("invalid lexer pattern {:?}: {}", pattern, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Rust keywords, literals and line comments.
    pub fn rust() -> Self {
        RUST.clone()
    }

    /// Python keywords, literals and comments.
    pub fn python() -> Self {
        PYTHON.clone()
    }
}

impl SyntaxLexer for RegexLexer {
    fn tokenize(&self, line: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut pos = 0;
        while pos < line.len() {
            let rest = &line[pos..];
            // Identifiers are consumed whole so keywords never match mid-word.
            let ident_len = rest
                .char_indices()
                .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                .map_or(rest.len(), |(i, _)| i);
            let at_word_start = !line[..pos].ends_with(|c: char| c.is_alphanumeric() || c == '_');

            let matched = self
                .rules
                .iter()
                .filter(|(kind, _)| at_word_start || !matches!(kind, TokenKind::Keyword | TokenKind::Number))
                .find_map(|(kind, re)| re.find(rest).filter(|m| !m.is_empty()).map(|m| (*kind, m.end())));

            let (kind, len) = match matched {
                Some((kind, len)) => (kind, len),
                None if ident_len > 0 => (TokenKind::Text, ident_len),
                None => (TokenKind::Text, rest.chars().next().map_or(1, char::len_utf8)),
            };
            let text = &rest[..len];
            match tokens.last_mut() {
                Some(last) if last.kind == kind && kind == TokenKind::Text => last.text.push_str(text),
                _ => tokens.push(Token {
                    kind,
                    text: text.to_string(),
                }),
            }
            pos += len;
        }
        tokens
    }
}

/// Colors per token kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntaxTheme {
    /// Keywords
    pub keyword: Color,
    /// String literals
    pub string: Color,
    /// Comments
    pub comment: Color,
    /// Numbers
    pub number: Color,
    /// Everything else
    pub text: Color,
}

impl SyntaxTheme {
    /// Color for a token kind.
    pub fn color(&self, kind: TokenKind) -> Color {
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::String => self.string,
            TokenKind::Comment => self.comment,
            TokenKind::Number => self.number,
            TokenKind::Text => self.text,
        }
    }

    /// Every token in one color.
    pub fn monochrome(color: Color) -> Self {
        Self {
            keyword: color,
            string: color,
            comment: color,
            number: color,
            text: color,
        }
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self {
            keyword: Color::Rgb(Rgb::new(0, 51, 179)),
            string: Color::Rgb(Rgb::new(6, 125, 23)),
            comment: Color::Rgb(Rgb::new(140, 140, 140)),
            number: Color::Rgb(Rgb::new(23, 80, 235)),
            text: Color::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens.iter().map(|t| (t.kind, t.text.as_str())).collect()
    }

    #[test]
    fn test_rust_line() {
        let tokens = RegexLexer::rust().tokenize("let x = 42; // answer");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Keyword, "let"),
                (TokenKind::Text, " x = "),
                (TokenKind::Number, "42"),
                (TokenKind::Text, "; "),
                (TokenKind::Comment, "// answer"),
            ]
        );
    }

    #[test]
    fn test_keyword_inside_identifier_is_text() {
        let tokens = RegexLexer::rust().tokenize("letter fnord x1");
        assert_eq!(kinds(&tokens), vec![(TokenKind::Text, "letter fnord x1")]);
    }

    #[test]
    fn test_python_string() {
        let tokens = RegexLexer::python().tokenize("print('hi')");
        assert_eq!(
            kinds(&tokens),
            vec![(TokenKind::Text, "print("), (TokenKind::String, "'hi'"), (TokenKind::Text, ")")]
        );
    }

    #[test]
    fn test_tokens_reassemble_line() {
        let line = "    fn main() { println!(\"{}\", 1.5e3); }";
        let joined: String = RegexLexer::rust().tokenize(line).into_iter().map(|t| t.text).collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(RegexLexer::new(&[(TokenKind::Keyword, "(")]).is_err());
    }

    #[test]
    fn test_theme_lookup() {
        let theme = SyntaxTheme::monochrome(Color::RED);
        assert_eq!(theme.color(TokenKind::Comment), Color::RED);
    }
}
