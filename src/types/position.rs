use serde::{Deserialize, Serialize};

/// A cell position (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl From<(u32, u32)> for Position {
    fn from((row, col): (u32, u32)) -> Self {
        Self { row, col }
    }
}

/// Closed rectangle of cells between two corners, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl CellRange {
    /// Normalize two arbitrary corners into a range
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            top: a.row.min(b.row),
            left: a.col.min(b.col),
            bottom: a.row.max(b.row),
            right: a.col.max(b.col),
        }
    }

    /// Single-cell range
    pub fn single(pos: Position) -> Self {
        Self::from_corners(pos, pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= self.top && pos.row <= self.bottom && pos.col >= self.left && pos.col <= self.right
    }

    pub fn row_count(&self) -> u32 {
        self.bottom - self.top + 1
    }

    pub fn col_count(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Number of cells in the range
    pub fn len(&self) -> usize {
        self.row_count() as usize * self.col_count() as usize
    }

    /// A range always holds at least one cell
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.top..=self.bottom)
            .flat_map(move |row| (self.left..=self.right).map(move |col| Position { row, col }))
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

    #[test]
    fn corners_are_order_independent() {
        let a = CellRange::from_corners(Position::new(3, 1), Position::new(1, 4));
        let b = CellRange::from_corners(Position::new(1, 4), Position::new(3, 1));
        assert_eq!(a, b);
        assert_eq!((a.top, a.left, a.bottom, a.right), (1, 1, 3, 4));
    }

    #[test]
    fn positions_row_major() {
        let range = CellRange::from_corners(Position::new(0, 0), Position::new(1, 1));
        let positions: Vec<_> = range.positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1)
            ]
        );
        assert_eq!(range.len(), 4);
    }
}
