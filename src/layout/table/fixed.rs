use super::{ColumnWidths, FixedColumnWidthTable, Table, TableCell};
use crate::error::{Error, Result};

/// Column widths as fractions of the available width.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWidths {
    ratios: Vec<f32>,
}

impl ColumnWidths for FixedWidths {
    fn resolve(&self, _cells: &[(usize, &TableCell)], columns: usize, available_width: f32) -> Vec<f32> {
        let total: f32 = self.ratios.iter().sum();
        if self.ratios.len() != columns || total <= 0.0 {
            return vec![available_width / columns as f32; columns];
        }
        self.ratios.iter().map(|r| available_width * r / total).collect()
    }
}

impl FixedColumnWidthTable {
    /// A `rows` x `columns` table with equal column widths.
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        Table::with_strategy(
            rows,
            columns,
            FixedWidths {
                ratios: vec![1.0; columns],
            },
        )
    }

    /// Relative column widths; normalized to the available width.
    pub fn with_column_ratios(mut self, ratios: Vec<f32>) -> Result<Self> {
        if ratios.len() != self.columns {
            return Err(Error::InvalidArgument(format!(
                "expected {} column ratios, got {}",
                self.columns,
                ratios.len()
            )));
        }
        if ratios.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(Error::InvalidArgument("column ratios must be positive".to_string()));
        }
        self.widths.ratios = ratios;
        self.layout.invalidate();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::layout::tests::Block;
    use crate::layout::LayoutElement;

    #[test]
    fn test_equal_columns_fill_width() {
        let mut table = FixedColumnWidthTable::new(1, 4).unwrap();
        table.add_element(Block::new(5.0, 5.0)).unwrap();
        assert_eq!(table.get_size(Size::new(400.0, 100.0)).width, 400.0);
        assert_eq!(table.resolve_widths(400.0), vec![100.0; 4]);
    }

    #[test]
    fn test_ratios() {
        let table = FixedColumnWidthTable::new(1, 2).unwrap().with_column_ratios(vec![1.0, 3.0]).unwrap();
        assert_eq!(table.resolve_widths(200.0), vec![50.0, 150.0]);
    }

    #[test]
    fn test_bad_ratios() {
        assert!(FixedColumnWidthTable::new(1, 2).unwrap().with_column_ratios(vec![1.0]).is_err());
        assert!(FixedColumnWidthTable::new(1, 2).unwrap().with_column_ratios(vec![1.0, -1.0]).is_err());
    }
}
