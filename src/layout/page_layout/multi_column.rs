use super::PageLayout;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::layout::{LayoutElement, Sides};
use crate::page::{Page, PageSize};

/// Fraction of the page width or height used as margin on each side.
const DEFAULT_MARGIN: f32 = 0.1;
/// Fraction of the page width between adjacent columns.
const DEFAULT_GUTTER: f32 = 0.05;
const DEFAULT_VERTICAL_SPACING: f32 = 5.0;

/// Flows elements through `n` equal-width columns per page.
#[derive(Debug)]
pub struct MultiColumnLayout<'a> {
    document: &'a mut Document,
    columns: usize,
    margins: Option<Sides<f32>>,
    gutter: Option<f32>,
    vertical_spacing: f32,
    page_index: usize,
    column: usize,
    /// Top of the free space in the current column; `None` when the
    /// column is still empty.
    cursor: Option<f32>,
}

impl<'a> MultiColumnLayout<'a> {
    /// Lay out into `columns` columns, starting on the document's last page.
    ///
    /// An A4 page is appended when the document has none.
    pub fn new(document: &'a mut Document, columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(Error::InvalidArgument("a layout needs at least one column".to_string()));
        }
        Ok(Self::with_columns(document, columns))
    }

    /// Two columns.
    pub fn two_columns(document: &'a mut Document) -> Self {
        Self::with_columns(document, 2)
    }

    /// Three columns.
    pub fn three_columns(document: &'a mut Document) -> Self {
        Self::with_columns(document, 3)
    }

    pub(super) fn with_columns(document: &'a mut Document, columns: usize) -> Self {
        if document.page_count() == 0 {
            document.append_page(Page::with_size(PageSize::A4));
        }
        let page_index = document.page_count() - 1;
        Self {
            document,
            columns: columns.max(1),
            margins: None,
            gutter: None,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            page_index,
            column: 0,
            cursor: None,
        }
    }

    /// Page margins in points, replacing the default 10% per side.
    pub fn with_margins(mut self, margins: Sides<f32>) -> Self {
        self.margins = Some(margins);
        self
    }

    /// Space between columns in points, replacing 5% of the page width.
    pub fn with_gutter(mut self, gutter: f32) -> Self {
        self.gutter = Some(gutter.max(0.0));
        self
    }

    /// Space between consecutive elements in a column.
    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.vertical_spacing = spacing.max(0.0);
        self
    }

    /// Number of columns per page.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Index of the current column.
    pub fn column_index(&self) -> usize {
        self.column
    }

    fn page_size(&self) -> (f32, f32) {
        self.document
            .page(self.page_index)
            .map(|page| page.size())
            .unwrap_or_else(|| PageSize::A4.dimensions())
    }

    /// Rectangles of every column on the current page.
    pub fn column_rects(&self) -> Vec<Rect> {
        let (width, height) = self.page_size();
        let margins = self.margins.unwrap_or(Sides::new(
            height * DEFAULT_MARGIN,
            width * DEFAULT_MARGIN,
            height * DEFAULT_MARGIN,
            width * DEFAULT_MARGIN,
        ));
        let gutter = self.gutter.unwrap_or(width * DEFAULT_GUTTER);
        let usable = (width - margins.left - margins.right).max(0.0);
        let column_width = ((usable - gutter * (self.columns - 1) as f32) / self.columns as f32).max(0.0);
        let column_height = (height - margins.top - margins.bottom).max(0.0);
        (0..self.columns)
            .map(|i| {
                Rect::new(
                    margins.left + i as f32 * (column_width + gutter),
                    margins.bottom,
                    column_width,
                    column_height,
                )
            })
            .collect()
    }

    fn current_column(&self) -> Rect {
        let rects = self.column_rects();
        rects[self.column.min(rects.len() - 1)]
    }
}

impl PageLayout for MultiColumnLayout<'_> {
    fn add(&mut self, element: &mut dyn LayoutElement) -> Result<()> {
        let margin = *element.layout_box().margin();
        loop {
            let column = self.current_column();
            let top = self.cursor.unwrap_or_else(|| column.top());
            let inner_width = (column.width - margin.left - margin.right).max(0.0);
            let size = element.get_size(Size::new(inner_width, column.height));
            let needed = margin.top + size.height + margin.bottom;

            if Size::new(size.width, needed).fits_in(&Size::new(inner_width, top - column.bottom())) {
                let area = Rect::new(
                    column.x + margin.left,
                    top - margin.top - size.height,
                    inner_width,
                    size.height,
                );
                let page = self
                    .document
                    .page_mut(self.page_index)
                    .ok_or_else(|| Error::InvalidArgument(format!("page {} no longer exists", self.page_index)))?;
                element.paint(area, page)?;
                self.cursor = Some(top - needed - self.vertical_spacing);
                return Ok(());
            }

            let fits_fresh_column = Size::new(size.width, needed).fits_in(&Size::new(inner_width, column.height));
            if self.cursor.is_none() || !fits_fresh_column {
                // Not even an empty column holds it: a break would not help.
                return Err(Error::overflow(
                    element.kind(),
                    (size.width, needed),
                    (inner_width, column.height),
                ));
            }
            log::debug!(
                "{} of height {} does not fit in column {} of page {}",
                element.kind(),
                needed,
                self.column,
                self.page_index
            );
            self.next_column()?;
        }
    }

    fn next_page(&mut self) -> Result<()> {
        let (width, height) = self.page_size();
        self.page_index += 1;
        if self.page_index >= self.document.page_count() {
            self.document.append_page(Page::with_size(PageSize::Custom(width, height)));
        }
        self.column = 0;
        self.cursor = None;
        log::debug!("page break: now on page {}", self.page_index);
        Ok(())
    }

    fn next_column(&mut self) -> Result<()> {
        if self.column + 1 < self.columns {
            self.column += 1;
            self.cursor = None;
            log::debug!("column break: now in column {} of page {}", self.column, self.page_index);
            Ok(())
        } else {
            self.next_page()
        }
    }

    fn page_index(&self) -> usize {
        self.page_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::Block;

    #[test]
    fn test_zero_columns_rejected() {
        let mut doc = Document::new();
        assert!(MultiColumnLayout::new(&mut doc, 0).is_err());
    }

    #[test]
    fn test_column_geometry() {
        let mut doc = Document::new();
        let layout = MultiColumnLayout::two_columns(&mut doc);
        let rects = layout.column_rects();
        // A4: 59.5pt side margins, 29.75pt gutter.
        let width = (595.0 - 119.0 - 29.75) / 2.0;
        assert!((rects[0].x - 59.5).abs() < 1e-3);
        assert!((rects[0].width - width).abs() < 1e-3);
        assert!((rects[1].x - (59.5 + width + 29.75)).abs() < 1e-3);
        assert!((rects[0].height - 842.0 * 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_overflow_moves_to_next_column_then_page() {
        let mut doc = Document::new();
        {
            let mut layout = MultiColumnLayout::two_columns(&mut doc)
                .with_margins(Sides::all(0.0))
                .with_gutter(0.0)
                .with_vertical_spacing(0.0);
            // A4 column height is 842: two 400pt blocks per column.
            for _ in 0..5 {
                layout.add(&mut Block::new(100.0, 400.0)).unwrap();
            }
            assert_eq!(layout.column_index(), 0);
            assert_eq!(layout.page_index(), 1);
        }
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_too_tall_for_empty_column_is_overflow() {
        let mut doc = Document::new();
        let mut layout = MultiColumnLayout::new(&mut doc, 1).unwrap();
        let err = layout.add(&mut Block::new(10.0, 10_000.0)).unwrap_err();
        assert!(err.is_overflow());
        drop(layout);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_oversized_in_last_column_keeps_position() {
        let mut doc = Document::new();
        let mut layout = MultiColumnLayout::two_columns(&mut doc);
        layout.next_column().unwrap();
        layout.add(&mut Block::new(10.0, 10.0)).unwrap();
        let err = layout.add(&mut Block::new(10.0, 10_000.0)).unwrap_err();
        assert!(err.is_overflow());
        assert_eq!((layout.page_index(), layout.column_index()), (0, 1));
        drop(layout);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages()[0].content_stream().as_bytes().iter().filter(|b| **b == b'q').count(), 1);
    }

    #[test]
    fn test_forced_breaks() {
        let mut doc = Document::new();
        let mut layout = MultiColumnLayout::three_columns(&mut doc);
        layout.next_column().unwrap();
        layout.next_column().unwrap();
        assert_eq!(layout.page_index(), 0);
        layout.next_column().unwrap();
        assert_eq!(layout.page_index(), 1);
        layout.next_page().unwrap();
        assert_eq!(layout.page_index(), 2);
        drop(layout);
        assert_eq!(doc.page_count(), 3);
    }
}
