// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # quire
//!
//! Programmatic PDF generation: build pages from layout elements and
//! serialize them to a standards-conformant PDF 1.7 file.
//!
//! ## Core Features
//!
//! - **Object model**: typed PDF values, streams with Flate/LZW/ASCIIHex/DCT filters
//! - **Layout engine**: paragraphs, mixed-style text, code snippets, lists,
//!   tables with row and column spans, shapes, line art, maps and images
//! - **Page layouts**: single and multi-column flow with automatic page breaks
//! - **Fonts**: the Standard 14 fonts plus embedded, subsetted TrueType fonts
//! - **Annotations**: links, notes, free text, markup, shapes, ink and sound
//! - **Writer**: deterministic object numbering, classic xref table, outlines,
//!   atomic file writes
//!
//! ## Quick Start
//!
//! ```
//! use quire::layout::{PageLayout, Paragraph, SingleColumnLayout};
//! use quire::Document;
//!
//! # fn main() -> quire::Result<()> {
//! let mut doc = Document::new();
//! let mut layout = SingleColumnLayout::new(&mut doc);
//! layout.add(&mut Paragraph::new("Hello, World!").with_font_size(12.0)?)?;
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Primitives
pub mod object;

// Values shared by the document model and layout
pub mod color;
pub mod geometry;

// Document model
pub mod document;
pub mod fonts;
pub mod page;

// Layout engine
pub mod annotations;
pub mod layout;

// Serialization
pub mod writer;

pub use color::{Cmyk, Color, Grayscale, Hsv, Rgb};
pub use document::{Document, DocumentInfo};
pub use error::{Error, Result};
pub use fonts::{Font, StandardFont};
pub use geometry::{Point, Rect, Size};
pub use page::{Page, PageSize};
pub use writer::WriterConfig;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
