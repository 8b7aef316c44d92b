//! Column widths and row heights.
//!
//! Sizes are clamped to the configured minimums on every write. Positions are
//! computed on demand from the raw arrays so nothing can drift after a resize.

use crate::config::{MIN_COL_WIDTH, MIN_ROW_HEIGHT};

#[derive(Debug, Clone, Default)]
pub struct Dimensions {
    col_widths: Vec<f32>,
    row_heights: Vec<f32>,
}

impl Dimensions {
    /// Uniform sizes for a `rows` x `cols` matrix
    pub fn uniform(rows: usize, cols: usize, col_width: f32, row_height: f32) -> Self {
        Self {
            col_widths: vec![col_width.max(MIN_COL_WIDTH); cols],
            row_heights: vec![row_height.max(MIN_ROW_HEIGHT); rows],
        }
    }

    pub fn col_widths(&self) -> &[f32] {
        &self.col_widths
    }

    pub fn row_heights(&self) -> &[f32] {
        &self.row_heights
    }

    pub fn col_count(&self) -> usize {
        self.col_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    pub fn col_width(&self, col: u32) -> Option<f32> {
        self.col_widths.get(col as usize).copied()
    }

    pub fn row_height(&self, row: u32) -> Option<f32> {
        self.row_heights.get(row as usize).copied()
    }

    /// Set a column width, clamped to the minimum. Returns the stored width.
    pub fn set_col_width(&mut self, col: u32, width: f32) -> Option<f32> {
        let slot = self.col_widths.get_mut(col as usize)?;
        *slot = clamp_size(width, MIN_COL_WIDTH);
        Some(*slot)
    }

    /// Set a row height, clamped to the minimum. Returns the stored height.
    pub fn set_row_height(&mut self, row: u32, height: f32) -> Option<f32> {
        let slot = self.row_heights.get_mut(row as usize)?;
        *slot = clamp_size(height, MIN_ROW_HEIGHT);
        Some(*slot)
    }

    /// Left edge of a column in content coordinates (gutter excluded)
    pub fn col_left(&self, col: u32) -> f32 {
        self.col_widths.iter().take(col as usize).sum()
    }

    /// Top edge of a row in content coordinates
    pub fn row_top(&self, row: u32) -> f32 {
        self.row_heights.iter().take(row as usize).sum()
    }

    pub fn total_width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    pub fn total_height(&self) -> f32 {
        self.row_heights.iter().sum()
    }

    /// Column containing content x, if any
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        index_at(&self.col_widths, x)
    }

    /// Row containing content y, if any
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        index_at(&self.row_heights, y)
    }
}

fn clamp_size(size: f32, min: f32) -> f32 {
    if size.is_nan() {
        min
    } else {
        size.max(min)
    }
}

fn index_at(sizes: &[f32], offset: f32) -> Option<u32> {
    if offset < 0.0 {
        return None;
    }
    let mut edge = 0.0;
    for (i, size) in sizes.iter().enumerate() {
        edge += size;
        if offset < edge {
            return u32::try_from(i).ok();
        }
    }
    None
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

    #[test]
    fn uniform_sizes() {
        let dims = Dimensions::uniform(3, 4, 128.0, 32.0);
        assert_eq!(dims.col_count(), 4);
        assert_eq!(dims.row_count(), 3);
        assert_eq!(dims.total_width(), 512.0);
        assert_eq!(dims.col_left(2), 256.0);
        assert_eq!(dims.row_top(2), 64.0);
    }

    #[test]
    fn setters_clamp() {
        let mut dims = Dimensions::uniform(2, 2, 128.0, 32.0);
        assert_eq!(dims.set_col_width(0, 10.0), Some(MIN_COL_WIDTH));
        assert_eq!(dims.set_row_height(1, -5.0), Some(MIN_ROW_HEIGHT));
        assert_eq!(dims.set_col_width(1, f32::NAN), Some(MIN_COL_WIDTH));
        assert_eq!(dims.set_col_width(5, 100.0), None);
    }

    #[test]
    fn lookup_by_offset() {
        let dims = Dimensions::uniform(3, 3, 100.0, 20.0);
        assert_eq!(dims.col_at_x(0.0), Some(0));
        assert_eq!(dims.col_at_x(99.9), Some(0));
        assert_eq!(dims.col_at_x(100.0), Some(1));
        assert_eq!(dims.col_at_x(300.0), None);
        assert_eq!(dims.col_at_x(-1.0), None);
        assert_eq!(dims.row_at_y(45.0), Some(2));
    }
}
