//! Sticky offsets for pinned column groups and header rows.
//!
//! All offsets are recomputed from the live `Dimensions` on every call, so a
//! resize of any pinned column or header row is reflected immediately.

use serde::Serialize;

use crate::config::GridConfig;
use crate::grid::Dimensions;
use crate::types::Position;

/// Sticky insets for one cell. `None` means the axis is not pinned.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyOffsets {
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub top: Option<f32>,
}

impl StickyOffsets {
    pub fn is_pinned(&self) -> bool {
        self.left.is_some() || self.right.is_some() || self.top.is_some()
    }
}

/// Left inset of a leading pinned column: the gutter plus every leading pinned
/// column before it.
pub fn leading_left(col: u32, dims: &Dimensions, config: &GridConfig) -> Option<f32> {
    if !config.is_leading_pinned(col) {
        return None;
    }
    let before: f32 = config
        .leading_pinned
        .iter()
        .filter(|&&c| c < col)
        .filter_map(|&c| dims.col_width(c))
        .sum();
    Some(config.gutter_width + before)
}

/// Right inset of a trailing pinned column: every trailing pinned column after it.
pub fn trailing_right(col: u32, dims: &Dimensions, config: &GridConfig) -> Option<f32> {
    if !config.is_trailing_pinned(col) {
        return None;
    }
    Some(
        config
            .trailing_pinned
            .iter()
            .filter(|&&c| c > col)
            .filter_map(|&c| dims.col_width(c))
            .sum(),
    )
}

/// Top inset of a pinned header row
pub fn header_top(row: u32, dims: &Dimensions, config: &GridConfig) -> Option<f32> {
    if !config.is_header_row(row) {
        return None;
    }
    Some(
        config
            .pinned_header_rows
            .iter()
            .filter(|&&r| r < row)
            .filter_map(|&r| dims.row_height(r))
            .sum(),
    )
}

pub fn sticky(pos: Position, dims: &Dimensions, config: &GridConfig) -> StickyOffsets {
    StickyOffsets {
        left: leading_left(pos.col, dims, config),
        right: trailing_right(pos.col, dims, config),
        top: header_top(pos.row, dims, config),
    }
}

/// Combined height of all pinned header rows
pub fn header_height(dims: &Dimensions, config: &GridConfig) -> f32 {
    config
        .pinned_header_rows
        .iter()
        .filter_map(|&r| dims.row_height(r))
        .sum()
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

    fn config() -> GridConfig {
        GridConfig {
            leading_pinned: vec![0, 1],
            trailing_pinned: vec![6, 7, 8],
            pinned_header_rows: vec![0, 1],
            status_columns: vec![6, 7, 8],
            ..GridConfig::default()
        }
    }

    #[test]
    fn leading_offsets_include_gutter() {
        let cfg = config();
        let dims = Dimensions::uniform(4, 9, 128.0, 32.0);
        assert_eq!(leading_left(0, &dims, &cfg), Some(cfg.gutter_width));
        assert_eq!(leading_left(1, &dims, &cfg), Some(cfg.gutter_width + 128.0));
        assert_eq!(leading_left(2, &dims, &cfg), None);
    }

    #[test]
    fn resizing_pinned_column_shifts_next_offset() {
        let cfg = config();
        let mut dims = Dimensions::uniform(4, 9, 128.0, 32.0);
        let before = leading_left(1, &dims, &cfg).unwrap();
        dims.set_col_width(0, 200.0);
        let after = leading_left(1, &dims, &cfg).unwrap();
        assert_eq!(after - before, 72.0);
    }

    #[test]
    fn trailing_offsets_count_columns_to_the_right() {
        let cfg = config();
        let mut dims = Dimensions::uniform(4, 9, 128.0, 32.0);
        dims.set_col_width(8, 60.0);
        assert_eq!(trailing_right(8, &dims, &cfg), Some(0.0));
        assert_eq!(trailing_right(7, &dims, &cfg), Some(60.0));
        assert_eq!(trailing_right(6, &dims, &cfg), Some(188.0));
        assert_eq!(trailing_right(5, &dims, &cfg), None);
    }

    #[test]
    fn header_rows_stack() {
        let cfg = config();
        let mut dims = Dimensions::uniform(4, 9, 128.0, 32.0);
        dims.set_row_height(0, 40.0);
        assert_eq!(header_top(0, &dims, &cfg), Some(0.0));
        assert_eq!(header_top(1, &dims, &cfg), Some(40.0));
        assert_eq!(header_top(2, &dims, &cfg), None);
        assert_eq!(header_height(&dims, &cfg), 72.0);
    }

    #[test]
    fn sticky_combines_axes() {
        let cfg = config();
        let dims = Dimensions::uniform(4, 9, 128.0, 32.0);
        let corner = sticky(Position::new(0, 0), &dims, &cfg);
        assert_eq!(corner.left, Some(cfg.gutter_width));
        assert_eq!(corner.top, Some(0.0));
        assert_eq!(corner.right, None);
        assert!(!sticky(Position::new(3, 4), &dims, &cfg).is_pinned());
    }
}
