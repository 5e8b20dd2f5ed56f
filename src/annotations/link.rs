use super::{check_size, Common};
use crate::error::Result;
use crate::geometry::{Rect, Size};
use crate::object::Object;
use crate::page::Annotation;
use crate::dict;

fn no_border(annotation: &mut Annotation) {
    annotation.set("Border", Object::Array(vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)]));
    annotation.set("H", Object::name("I"));
}

/// A clickable area that jumps to another page of the same document.
///
/// The target is a 0-based page index, resolved to a page reference when
/// the document is written; a target past the last page fails then.
#[derive(Debug, Clone)]
pub struct LinkAnnotation {
    common: Common,
    size: Size,
    page_index: usize,
}

impl LinkAnnotation {
    /// Link area of `width` x `height` points targeting `page_index`.
    pub fn new(page_index: usize, width: f32, height: f32) -> Result<Self> {
        Ok(Self {
            common: Common::default(),
            size: check_size("Link", width, height)?,
            page_index,
        })
    }

    /// Target page.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let mut annotation = Annotation::new("Link", rect);
        no_border(&mut annotation);
        annotation.set_destination(self.page_index);
        Ok(annotation)
    }
}

annotation_element!(LinkAnnotation, "LinkAnnotation");

/// A clickable area that opens a URI.
#[derive(Debug, Clone)]
pub struct UriAnnotation {
    common: Common,
    size: Size,
    uri: String,
}

impl UriAnnotation {
    /// Link area of `width` x `height` points opening `uri`.
    pub fn new(uri: impl Into<String>, width: f32, height: f32) -> Result<Self> {
        Ok(Self {
            common: Common::default(),
            size: check_size("URI", width, height)?,
            uri: uri.into(),
        })
    }

    /// The target URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    fn annotation(&self, rect: Rect) -> Result<Annotation> {
        let mut annotation = Annotation::new("Link", rect);
        no_border(&mut annotation);
        annotation.set(
            "A",
            Object::Dictionary(dict! {
                "Type" => Object::name("Action"),
                "S" => Object::name("URI"),
                "URI" => Object::string(&self.uri),
            }),
        );
        Ok(annotation)
    }
}

annotation_element!(UriAnnotation, "UriAnnotation");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutElement;
    use crate::page::Page;

    #[test]
    fn test_link_records_destination() {
        let mut page = Page::new();
        let mut link = LinkAnnotation::new(3, 50.0, 12.0).unwrap();
        link.paint(Rect::new(10.0, 10.0, 100.0, 100.0), &mut page).unwrap();
        let annotation = &page.annotations()[0];
        assert_eq!(annotation.subtype(), "Link");
        assert_eq!(annotation.destination(), Some(3));
        assert_eq!(annotation.rect(), Rect::new(10.0, 98.0, 50.0, 12.0));
        assert_eq!(link.name(), Some("annotation-001"));
    }

    #[test]
    fn test_uri_action() {
        let mut page = Page::new();
        let mut link = UriAnnotation::new("https://example.com", 50.0, 12.0).unwrap();
        link.paint(Rect::new(0.0, 0.0, 100.0, 100.0), &mut page).unwrap();
        let action = page.annotations()[0].entries().get("A").and_then(Object::as_dict).unwrap();
        assert_eq!(action.get("S").and_then(Object::as_name), Some("URI"));
        assert_eq!(action.get("URI").and_then(Object::as_string), Some(&b"https://example.com"[..]));
    }

    #[test]
    fn test_names_are_unique_per_page() {
        let mut page = Page::new();
        let mut first = UriAnnotation::new("a", 5.0, 5.0).unwrap();
        let mut second = UriAnnotation::new("b", 5.0, 5.0).unwrap();
        first.paint(Rect::new(0.0, 0.0, 10.0, 10.0), &mut page).unwrap();
        second.paint(Rect::new(0.0, 0.0, 10.0, 10.0), &mut page).unwrap();
        assert_eq!(second.name(), Some("annotation-002"));
    }

    #[test]
    fn test_negative_size_rejected() {
        assert!(LinkAnnotation::new(0, -1.0, 5.0).is_err());
    }
}
