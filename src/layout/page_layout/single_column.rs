use super::{MultiColumnLayout, PageLayout};
use crate::document::Document;
use crate::error::Result;
use crate::geometry::Rect;
use crate::layout::{LayoutElement, Sides};

/// One column spanning the page between the margins.
#[derive(Debug)]
pub struct SingleColumnLayout<'a> {
    inner: MultiColumnLayout<'a>,
}

impl<'a> SingleColumnLayout<'a> {
    /// Start on the document's last page, appending an A4 page if it has none.
    pub fn new(document: &'a mut Document) -> Self {
        Self {
            inner: MultiColumnLayout::with_columns(document, 1),
        }
    }

    /// Page margins in points.
    pub fn with_margins(self, margins: Sides<f32>) -> Self {
        Self {
            inner: self.inner.with_margins(margins),
        }
    }

    /// Space between consecutive elements.
    pub fn with_vertical_spacing(self, spacing: f32) -> Self {
        Self {
            inner: self.inner.with_vertical_spacing(spacing),
        }
    }

    /// The flowable area of the current page.
    pub fn column_rect(&self) -> Rect {
        self.inner.column_rects()[0]
    }
}

impl PageLayout for SingleColumnLayout<'_> {
    fn add(&mut self, element: &mut dyn LayoutElement) -> Result<()> {
        self.inner.add(element)
    }

    fn next_page(&mut self) -> Result<()> {
        self.inner.next_page()
    }

    fn next_column(&mut self) -> Result<()> {
        self.inner.next_column()
    }

    fn page_index(&self) -> usize {
        self.inner.page_index()
    }
}
