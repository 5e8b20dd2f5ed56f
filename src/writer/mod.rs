//! PDF writing module.
//!
//! Turns a [`Document`](crate::Document) into bytes.
//!
//! ## Architecture
//!
//! ```text
//! Document (pages, resources, annotations, outline)
//!     ↓
//! [PdfWriter] (fonts, images, pages → ObjectTable)
//!     ↓
//! [ObjectTable] (validate references, renumber breadth-first)
//!     ↓
//! [ObjectSerializer] (objects → bytes, stream filters)
//!     ↓
//! header, body, xref, trailer
//! ```
//!
//! Layout elements use [`ContentStreamBuilder`] to produce page operators.
//!
//! ```
//! use quire::{Document, Page};
//!
//! let mut doc = Document::new();
//! doc.append_page(Page::new());
//! let bytes = doc.to_bytes().unwrap();
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! ```

mod content_stream;
pub mod filters;
pub(crate) mod image_handler;
mod object_serializer;
mod object_table;
mod outline_builder;
mod pdf_writer;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp, LineCap, LineJoin};
pub use image_handler::{ColorSpace, ImageData, ImageEncoding};
pub use object_serializer::{format_real, ObjectSerializer};
pub use object_table::ObjectTable;
pub use outline_builder::{OutlineBuilder, OutlineItem};
pub use pdf_writer::{PdfWriter, WriterConfig};
