//! The cell matrix and its dimensions.
//!
//! `GridModel` owns the register rows plus the column widths and row heights
//! that size them. The three are only ever replaced together, so
//! `row_count() == dimensions().row_count()` and
//! `col_count() == dimensions().col_count()` hold after every call.

mod dimensions;

pub use dimensions::Dimensions;

use crate::error::{GridError, Result};
use crate::types::{Cell, CellFormatting, Position};

#[derive(Debug, Clone, Default)]
pub struct GridModel {
    rows: Vec<Vec<Cell>>,
    col_count: usize,
    dimensions: Dimensions,
    default_col_width: f32,
    default_row_height: f32,
}

impl GridModel {
    pub fn new(default_col_width: f32, default_row_height: f32) -> Self {
        Self {
            rows: Vec::new(),
            col_count: 0,
            dimensions: Dimensions::default(),
            default_col_width,
            default_row_height,
        }
    }

    /// Replace the matrix and reset all sizes to defaults.
    ///
    /// Rows must all share the length of the first row. On error nothing is
    /// modified.
    pub fn load_initial(&mut self, rows: Vec<Vec<Cell>>) -> Result<()> {
        let col_count = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != col_count)
        {
            return Err(GridError::RaggedRows {
                row,
                expected: col_count,
                found,
            });
        }

        self.dimensions = Dimensions::uniform(
            rows.len(),
            col_count,
            self.default_col_width,
            self.default_row_height,
        );
        self.col_count = col_count;
        self.rows = rows;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.rows.get(pos.row as usize)?.get(pos.col as usize)
    }

    pub fn cell_value(&self, pos: Position) -> Option<&str> {
        self.get_cell(pos).map(|c| c.value.as_str())
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.get_cell(pos).is_some()
    }

    /// Iterator over rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Overwrite a cell's value, returning the previous one.
    pub fn set_cell_value(&mut self, pos: Position, value: impl Into<String>) -> Result<String> {
        let cell = self
            .rows
            .get_mut(pos.row as usize)
            .and_then(|r| r.get_mut(pos.col as usize))
            .ok_or(GridError::OutOfBounds(pos))?;
        Ok(std::mem::replace(&mut cell.value, value.into()))
    }

    /// Merge `patch` into the formatting of every listed cell.
    ///
    /// Positions outside the matrix are skipped. Returns how many cells changed.
    pub fn apply_formatting(&mut self, positions: &[Position], patch: &CellFormatting) -> usize {
        let mut applied = 0;
        for pos in positions {
            let Some(cell) = self
                .rows
                .get_mut(pos.row as usize)
                .and_then(|r| r.get_mut(pos.col as usize))
            else {
                continue;
            };
            cell.formatting
                .get_or_insert_with(CellFormatting::default)
                .merge(patch);
            applied += 1;
        }
        applied
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn dimensions_mut(&mut self) -> &mut Dimensions {
        &mut self.dimensions
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};

    fn matrix(rows: usize, cols: usize) -> Vec<Vec<Cell>> {
        (0..rows)
            .map(|r| (0..cols).map(|c| Cell::new(format!("r{r}c{c}"))).collect())
            .collect()
    }

    fn model() -> GridModel {
        GridModel::new(DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT)
    }

    #[test]
    fn load_syncs_dimensions() {
        let mut m = model();
        m.load_initial(matrix(4, 3)).unwrap();
        assert_eq!(m.row_count(), 4);
        assert_eq!(m.col_count(), 3);
        assert_eq!(m.dimensions().row_count(), 4);
        assert_eq!(m.dimensions().col_count(), 3);
        assert_eq!(m.dimensions().col_width(2), Some(DEFAULT_COL_WIDTH));
    }

    #[test]
    fn reload_resets_sizes() {
        let mut m = model();
        m.load_initial(matrix(2, 2)).unwrap();
        m.dimensions_mut().set_col_width(0, 300.0);
        m.load_initial(matrix(5, 6)).unwrap();
        assert_eq!(m.dimensions().col_count(), 6);
        assert_eq!(m.dimensions().col_width(0), Some(DEFAULT_COL_WIDTH));
    }

    #[test]
    fn ragged_load_keeps_previous_matrix() {
        let mut m = model();
        m.load_initial(matrix(2, 2)).unwrap();

        let mut ragged = matrix(3, 3);
        ragged[2].pop();
        let err = m.load_initial(ragged).unwrap_err();
        assert!(matches!(
            err,
            GridError::RaggedRows {
                row: 2,
                expected: 3,
                found: 2
            }
        ));
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.dimensions().col_count(), 2);
    }

    #[test]
    fn set_value_returns_previous() {
        let mut m = model();
        m.load_initial(matrix(2, 2)).unwrap();
        let prev = m.set_cell_value(Position::new(1, 1), "any text at all").unwrap();
        assert_eq!(prev, "r1c1");
        assert_eq!(m.cell_value(Position::new(1, 1)), Some("any text at all"));
    }

    #[test]
    fn set_value_out_of_bounds() {
        let mut m = model();
        m.load_initial(matrix(1, 1)).unwrap();
        let err = m.set_cell_value(Position::new(0, 5), "x").unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds(_)));
    }

    #[test]
    fn apply_formatting_last_write_wins() {
        let mut m = model();
        m.load_initial(matrix(2, 2)).unwrap();
        let targets = [Position::new(0, 0), Position::new(1, 1), Position::new(9, 9)];

        let red = CellFormatting::default().with_text_color("red");
        assert_eq!(m.apply_formatting(&targets, &red), 2);
        let blue_bold = CellFormatting::bold().with_text_color("blue");
        m.apply_formatting(&targets[..1], &blue_bold);

        let first = m.get_cell(Position::new(0, 0)).unwrap().formatting.clone().unwrap();
        assert_eq!(first.text_color.as_deref(), Some("blue"));
        assert_eq!(first.bold, Some(true));
        let second = m.get_cell(Position::new(1, 1)).unwrap().formatting.clone().unwrap();
        assert_eq!(second.text_color.as_deref(), Some("red"));
        assert_eq!(second.bold, None);
        assert!(m.get_cell(Position::new(0, 1)).unwrap().formatting.is_none());
    }

    #[test]
    fn empty_load() {
        let mut m = model();
        m.load_initial(Vec::new()).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.col_count(), 0);
    }
}
