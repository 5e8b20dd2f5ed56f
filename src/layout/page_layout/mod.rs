//! Flowing elements onto pages.
//!
//! A page layout keeps a cursor in a column of the current page. Each
//! added element is measured against the column, painted below the
//! previous one, and moved to the next column (then the next page) when
//! the remaining space is too short. Pages are appended to the document
//! on demand; an element too large for an empty column is an
//! [`Error::Overflow`](crate::Error::Overflow) and never causes a page to
//! be appended.

mod multi_column;
mod single_column;

pub use multi_column::MultiColumnLayout;
pub use single_column::SingleColumnLayout;

use crate::error::Result;
use crate::layout::LayoutElement;

/// Places elements top-down on the pages of a document.
pub trait PageLayout {
    /// Measure and paint `element` at the cursor, breaking columns and
    /// pages as needed.
    fn add(&mut self, element: &mut dyn LayoutElement) -> Result<()>;

    /// Continue on a fresh page.
    fn next_page(&mut self) -> Result<()>;

    /// Continue in the next column, or on a fresh page after the last one.
    fn next_column(&mut self) -> Result<()>;

    /// Index of the page the cursor is on.
    fn page_index(&self) -> usize;
}
