use super::{ColumnWidths, FlexibleColumnWidthTable, Table, TableCell};
use crate::error::Result;
use crate::geometry::{Size, EPSILON};
use crate::layout::LayoutElement;

/// Column widths measured from the cells.
///
/// Every column starts at its narrowest width. Leftover width is then
/// shared equally among the columns that would still grow, until either
/// the budget runs out or every column reaches its widest width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlexibleWidths;

fn spread(target: &mut [f32], first: usize, span: usize, needed: f32) {
    let current: f32 = target[first..first + span].iter().sum();
    if needed > current {
        let extra = (needed - current) / span as f32;
        for w in &mut target[first..first + span] {
            *w += extra;
        }
    }
}

impl ColumnWidths for FlexibleWidths {
    fn resolve(&self, cells: &[(usize, &TableCell)], columns: usize, available_width: f32) -> Vec<f32> {
        let mut min = vec![0.0f32; columns];
        let mut max = vec![0.0f32; columns];
        let narrow = Size::new(0.0, f32::INFINITY);
        let wide = Size::new(f32::INFINITY, f32::INFINITY);

        // Single-column cells first, so spanning cells only add what is missing.
        let mut ordered: Vec<&(usize, &TableCell)> = cells.iter().collect();
        ordered.sort_by_key(|(_, cell)| cell.column_span());
        for (column, cell) in ordered {
            let span = cell.column_span();
            spread(&mut min, *column, span, cell.get_size(narrow).width);
            spread(&mut max, *column, span, cell.get_size(wide).width.min(available_width));
        }
        for (lo, hi) in min.iter().zip(max.iter_mut()) {
            *hi = hi.max(*lo);
        }

        let mut widths = min;
        let mut remaining = available_width - widths.iter().sum::<f32>();
        loop {
            let growing: Vec<usize> = (0..columns).filter(|&c| max[c] - widths[c] > EPSILON).collect();
            if growing.is_empty() || remaining <= EPSILON {
                break;
            }
            let share = remaining / growing.len() as f32;
            for c in growing {
                let step = share.min(max[c] - widths[c]);
                widths[c] += step;
                remaining -= step;
            }
        }
        log::debug!("flexible table columns resolved to {:?} of {}", widths, available_width);
        widths
    }
}

impl FlexibleColumnWidthTable {
    /// A `rows` x `columns` table sized to its content.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        Table::with_strategy(rows, columns, FlexibleWidths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::Block;
    use crate::layout::Paragraph;

    #[test]
    fn test_fixed_content_keeps_natural_width() {
        let mut table = FlexibleColumnWidthTable::new(1, 2).unwrap().no_borders();
        table.add_element(Block::new(30.0, 5.0)).unwrap();
        table.add_element(Block::new(50.0, 5.0)).unwrap();
        assert_eq!(table.resolve_widths(500.0), vec![30.0, 50.0]);
        assert_eq!(table.get_size(Size::new(500.0, 100.0)).width, 80.0);
    }

    #[test]
    fn test_text_grows_until_budget() {
        let mut table = FlexibleColumnWidthTable::new(1, 2).unwrap();
        table.add_element(Block::new(20.0, 5.0)).unwrap();
        table
            .add_element(Paragraph::new("one two three four five six seven eight nine ten"))
            .unwrap();
        let widths = table.resolve_widths(150.0);
        assert_eq!(widths[0], 20.0);
        assert!((widths.iter().sum::<f32>() - 150.0).abs() < 1e-2);
    }

    #[test]
    fn test_spanning_cell_spreads() {
        let mut table = FlexibleColumnWidthTable::new(2, 2).unwrap();
        table.add(TableCell::new(Block::new(100.0, 5.0)).with_column_span(2).unwrap()).unwrap();
        table.add_element(Block::new(10.0, 5.0)).unwrap();
        table.add_element(Block::new(10.0, 5.0)).unwrap();
        // Each TableCell carries a 1pt border but no padding.
        assert_eq!(table.resolve_widths(500.0), vec![50.0, 50.0]);
    }
}
