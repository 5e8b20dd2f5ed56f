//! The document: an ordered list of pages plus metadata and outlines.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use crate::page::Page;
use crate::writer::{OutlineBuilder, PdfWriter, WriterConfig};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    /// Document title
    pub title: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Subject
    pub subject: Option<String>,
    /// Keywords
    pub keywords: Option<String>,
    /// Application that created the content
    pub creator: Option<String>,
    /// Creation date
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    /// Whether no entry is set.
    pub fn is_empty(&self) -> bool {
        *self == DocumentInfo::default()
    }

    /// Build the `/Info` dictionary, adding `producer` when given.
    pub fn to_dict(&self, producer: Option<&str>) -> Dictionary {
        let mut dict = Dictionary::new();
        let text_entries = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
        ];
        for (key, value) in text_entries {
            if let Some(v) = value {
                dict.insert(key.to_string(), Object::text(v));
            }
        }
        if let Some(producer) = producer {
            dict.insert("Producer".to_string(), Object::text(producer));
        }
        if let Some(date) = &self.creation_date {
            dict.insert("CreationDate".to_string(), Object::string(format_pdf_date(date)));
        }
        dict
    }
}

/// Format a timestamp as a PDF date string, `D:YYYYMMDDHHmmSS+00'00'`.
pub fn format_pdf_date(date: &DateTime<Utc>) -> String {
    format!("{}+00'00'", date.format("D:%Y%m%d%H%M%S"))
}

/// A PDF document under construction.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pages: Vec<Page>,
    info: DocumentInfo,
    outline: OutlineBuilder,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn append_page(&mut self, page: Page) -> &mut Self {
        self.pages.push(page);
        self
    }

    /// Pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// A page by index.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// A page by index, mutably.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Metadata.
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.info.title = Some(title.into());
        self
    }

    /// Set the author.
    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.info.author = Some(author.into());
        self
    }

    /// Set the subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.info.subject = Some(subject.into());
        self
    }

    /// Set the keywords.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) -> &mut Self {
        self.info.keywords = Some(keywords.into());
        self
    }

    /// Set the creator application.
    pub fn set_creator(&mut self, creator: impl Into<String>) -> &mut Self {
        self.info.creator = Some(creator.into());
        self
    }

    /// Set the creation date.
    pub fn set_creation_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.info.creation_date = Some(date);
        self
    }

    /// Add a bookmark to a page. `level` 0 is top level.
    pub fn add_outline(&mut self, title: impl Into<String>, page_index: usize, level: usize) -> &mut Self {
        self.outline.add(title, page_index, level);
        self
    }

    /// Outline entries.
    pub fn outline(&self) -> &OutlineBuilder {
        &self.outline
    }

    /// Serialize with the default configuration.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&WriterConfig::default())
    }

    /// Serialize with a custom configuration.
    pub fn to_bytes_with(&self, config: &WriterConfig) -> Result<Vec<u8>> {
        PdfWriter::new(config).write_document(self)
    }

    /// Write to `path` with the default configuration.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_with(path, &WriterConfig::default())
    }

    /// Write to `path`.
    ///
    /// Bytes go to a temporary file next to the destination which is renamed
    /// over it on success, so the destination is never left half-written.
    pub fn write_with(&self, path: impl AsRef<Path>, config: &WriterConfig) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes_with(config)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pdf_date_format() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_pdf_date(&date), "D:20240309070501+00'00'");
    }

    #[test]
    fn test_info_empty_by_default() {
        let doc = Document::new();
        assert!(doc.info().is_empty());
        assert!(doc.info().to_dict(None).is_empty());
    }

    #[test]
    fn test_info_dict() {
        let mut doc = Document::new();
        doc.set_title("Report").set_author("Jane");
        let dict = doc.info().to_dict(Some("quire"));
        assert_eq!(dict["Title"], Object::string("Report"));
        assert_eq!(dict["Author"], Object::string("Jane"));
        assert_eq!(dict["Producer"], Object::string("quire"));
        assert!(!dict.contains_key("CreationDate"));
    }

    #[test]
    fn test_pages() {
        let mut doc = Document::new();
        doc.append_page(Page::new()).append_page(Page::new());
        assert_eq!(doc.page_count(), 2);
        assert!(doc.page(1).is_some());
        assert!(doc.page_mut(2).is_none());
    }

    #[test]
    fn test_write_to_missing_directory_fails_cleanly() {
        let mut doc = Document::new();
        doc.append_page(Page::new());
        assert!(matches!(doc.write("/nonexistent-dir/out.pdf"), Err(Error::Io(_))));
    }
}
