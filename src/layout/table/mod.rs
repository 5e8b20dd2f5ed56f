//! Tables: a grid of cells with row and column spans.
//!
//! Cells are added in reading order. Each one lands in the top-left-most
//! free region of the grid large enough for its span; occupied slots are
//! never overwritten. Column widths come from a [`ColumnWidths`] strategy,
//! either fixed ratios or measured content.

mod fixed;
mod flexible;

pub use fixed::FixedWidths;
pub use flexible::FlexibleWidths;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::layout::{paint_decoration, LayoutBox, LayoutElement, Sides};
use crate::page::Page;
use crate::writer::ContentStreamBuilder;

/// A table whose column widths are fixed fractions of the available width.
pub type FixedColumnWidthTable = Table<FixedWidths>;

/// A table whose column widths follow the measured content.
pub type FlexibleColumnWidthTable = Table<FlexibleWidths>;

/// One cell of a table, wrapping any layout element.
pub struct TableCell {
    layout: LayoutBox,
    content: Box<dyn LayoutElement>,
    row_span: usize,
    column_span: usize,
}

impl std::fmt::Debug for TableCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCell")
            .field("content", &self.content.kind())
            .field("row_span", &self.row_span)
            .field("column_span", &self.column_span)
            .finish()
    }
}

impl TableCell {
    /// A 1x1 cell with a 1pt black border.
    pub fn new(content: impl LayoutElement + 'static) -> Self {
        let mut layout = LayoutBox::default();
        layout.set_border_width(Sides::all(1.0));
        Self {
            layout,
            content: Box::new(content),
            row_span: 1,
            column_span: 1,
        }
    }

    /// Span `n` rows.
    pub fn with_row_span(mut self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidArgument("row span must be at least 1".to_string()));
        }
        self.row_span = n;
        Ok(self)
    }

    /// Span `n` columns.
    pub fn with_column_span(mut self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidArgument("column span must be at least 1".to_string()));
        }
        self.column_span = n;
        Ok(self)
    }

    /// Rows spanned.
    pub fn row_span(&self) -> usize {
        self.row_span
    }

    /// Columns spanned.
    pub fn column_span(&self) -> usize {
        self.column_span
    }

    /// Decorate the whole slot, then paint the content inside the padding.
    ///
    /// The slot may be taller or wider than the cell's own size.
    fn paint_slot(&mut self, slot: Rect, page: &mut Page) -> Result<()> {
        let mark = page.mark();
        let mut open = ContentStreamBuilder::new();
        open.save_state();
        paint_decoration(&self.layout, slot, &mut open);
        page.content_stream_mut().append(&open)?;

        let p = *self.layout.padding();
        let inner = slot.inset(p.top, p.right, p.bottom, p.left);
        if let Err(e) = self.content.paint(inner, page) {
            page.rollback(mark);
            return Err(e);
        }

        let mut close = ContentStreamBuilder::new();
        close.restore_state();
        page.content_stream_mut().append(&close)?;
        self.layout.set_previous_paint_box(slot);
        Ok(())
    }
}

impl LayoutElement for TableCell {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "TableCell"
    }

    fn content_size(&self, available: Size) -> Size {
        self.content.get_size(available)
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        self.content.paint(area, page)
    }
}

#[derive(Debug)]
struct PlacedCell {
    cell: TableCell,
    row: usize,
    column: usize,
}

/// How a table turns the available width into column widths.
pub trait ColumnWidths {
    /// Widths of `columns` columns, given each cell with its first column.
    fn resolve(&self, cells: &[(usize, &TableCell)], columns: usize, available_width: f32) -> Vec<f32>;
}

/// A grid of [`TableCell`]s.
#[derive(Debug)]
pub struct Table<W> {
    layout: LayoutBox,
    rows: usize,
    columns: usize,
    widths: W,
    cells: Vec<PlacedCell>,
    occupied: Vec<Vec<bool>>,
    row_colors: Option<(Color, Color)>,
}

impl<W: ColumnWidths> Table<W> {
    fn with_strategy(rows: usize, columns: usize, widths: W) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidArgument(format!(
                "table needs at least one row and one column, got {}x{}",
                rows, columns
            )));
        }
        Ok(Self {
            layout: LayoutBox::default(),
            rows,
            columns,
            widths,
            cells: Vec::new(),
            occupied: vec![vec![false; columns]; rows],
            row_colors: None,
        })
    }

    /// A plain grid of 1x1 cells, one inner vector per row.
    pub(crate) fn from_rows(columns: usize, rows: Vec<Vec<TableCell>>, widths: W) -> Self {
        let row_count = rows.len().max(1);
        let mut cells = Vec::new();
        let mut occupied = vec![vec![false; columns]; row_count];
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().take(columns).enumerate() {
                occupied[r][c] = true;
                cells.push(PlacedCell { cell, row: r, column: c });
            }
        }
        Self {
            layout: LayoutBox::default(),
            rows: row_count,
            columns,
            widths,
            cells,
            occupied,
            row_colors: None,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Add a cell in the top-left-most free region that fits its span.
    pub fn add(&mut self, cell: TableCell) -> Result<&mut Self> {
        let (rs, cs) = (cell.row_span, cell.column_span);
        if rs > self.rows || cs > self.columns {
            return Err(Error::InvalidArgument(format!(
                "cell spanning {}x{} does not fit a {}x{} table",
                rs, cs, self.rows, self.columns
            )));
        }
        let slot = (0..=self.rows - rs)
            .flat_map(|r| (0..=self.columns - cs).map(move |c| (r, c)))
            .find(|&(r, c)| self.region_free(r, c, rs, cs));
        let Some((row, column)) = slot else {
            return Err(Error::InvalidArgument(format!(
                "no free {}x{} region left in the table",
                rs, cs
            )));
        };
        for r in row..row + rs {
            for c in column..column + cs {
                self.occupied[r][c] = true;
            }
        }
        self.cells.push(PlacedCell { cell, row, column });
        self.layout.invalidate();
        Ok(self)
    }

    /// Wrap `element` in a 1x1 cell and add it.
    pub fn add_element(&mut self, element: impl LayoutElement + 'static) -> Result<&mut Self> {
        self.add(TableCell::new(element))
    }

    fn region_free(&self, row: usize, column: usize, rs: usize, cs: usize) -> bool {
        (row..row + rs).all(|r| (column..column + cs).all(|c| !self.occupied[r][c]))
    }

    /// Grid position `(row, column)` of every cell, in insertion order.
    pub fn placements(&self) -> Vec<(usize, usize)> {
        self.cells.iter().map(|p| (p.row, p.column)).collect()
    }

    /// The cells, in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.cells.iter().map(|p| &p.cell)
    }

    /// Same padding on every existing cell.
    pub fn set_padding_on_all_cells(mut self, top: f32, right: f32, bottom: f32, left: f32) -> Self {
        for placed in &mut self.cells {
            placed.cell.layout.set_padding(Sides::new(top, right, bottom, left));
        }
        self.layout.invalidate();
        self
    }

    /// Same border width on every side of every existing cell.
    pub fn set_border_width_on_all_cells(mut self, width: f32) -> Self {
        for placed in &mut self.cells {
            placed.cell.layout.set_border_width(Sides::all(width));
        }
        self
    }

    /// Alternate background colors by the row a cell starts in.
    pub fn even_odd_row_colors(mut self, even: Color, odd: Color) -> Self {
        self.row_colors = Some((even, odd));
        self
    }

    /// Remove every cell border.
    pub fn no_borders(self) -> Self {
        self.set_border_width_on_all_cells(0.0)
    }

    fn resolve_widths(&self, available_width: f32) -> Vec<f32> {
        let cells: Vec<(usize, &TableCell)> = self.cells.iter().map(|p| (p.column, &p.cell)).collect();
        self.widths.resolve(&cells, self.columns, available_width)
    }

    fn row_heights(&self, widths: &[f32]) -> Vec<f32> {
        let mut heights = vec![0.0f32; self.rows];
        for placed in &self.cells {
            let width: f32 = widths[placed.column..placed.column + placed.cell.column_span].iter().sum();
            let height = placed.cell.get_size(Size::new(width, f32::INFINITY)).height;
            let share = height / placed.cell.row_span as f32;
            for h in &mut heights[placed.row..placed.row + placed.cell.row_span] {
                *h = h.max(share);
            }
        }
        heights
    }
}

impl<W: ColumnWidths> LayoutElement for Table<W> {
    fn layout_box(&self) -> &LayoutBox {
        &self.layout
    }

    fn layout_box_mut(&mut self) -> &mut LayoutBox {
        &mut self.layout
    }

    fn kind(&self) -> &'static str {
        "Table"
    }

    fn content_size(&self, available: Size) -> Size {
        let widths = self.resolve_widths(available.width);
        let heights = self.row_heights(&widths);
        Size::new(widths.iter().sum(), heights.iter().sum())
    }

    fn paint_content(&mut self, area: Rect, page: &mut Page) -> Result<()> {
        let widths = self.resolve_widths(area.width);
        let heights = self.row_heights(&widths);
        let free = self.occupied.iter().flatten().filter(|o| !**o).count();
        if free > 0 {
            log::debug!("table painted with {} empty slots", free);
        }

        let row_colors = self.row_colors;
        for placed in &mut self.cells {
            let (r, c) = (placed.row, placed.column);
            let (rs, cs) = (placed.cell.row_span, placed.cell.column_span);
            let x = area.x + widths[..c].iter().sum::<f32>();
            let top = area.top() - heights[..r].iter().sum::<f32>();
            let width: f32 = widths[c..c + cs].iter().sum();
            let height: f32 = heights[r..r + rs].iter().sum();

            if let Some((even, odd)) = row_colors {
                if placed.cell.layout.background_color().is_none() {
                    let color = if r % 2 == 0 { even } else { odd };
                    placed.cell.layout.set_background_color(Some(color));
                }
            }
            placed.cell.paint_slot(Rect::new(x, top - height, width, height), page)?;
        }
        Ok(())
    }
}
