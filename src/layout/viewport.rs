//! Viewport state: scroll position, size and pointer hit testing.

use serde::Serialize;

use super::frozen::{header_top, leading_left, trailing_right};
use crate::config::GridConfig;
use crate::grid::Dimensions;
use crate::types::Position;

/// Distance in pixels from a trailing/bottom edge that grabs the resize handle
pub const RESIZE_HANDLE_SIZE: f32 = 4.0;

/// What lies under a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerTarget {
    Cell { row: u32, col: u32 },
    ColumnResizeHandle { col: u32 },
    RowResizeHandle { row: u32 },
    None,
}

/// The visible area of the scroll container
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Horizontal scroll offset in pixels
    pub scroll_x: f32,
    /// Vertical scroll offset in pixels
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 1280.0,
            height: 720.0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Set absolute scroll position, clamped to the content extent
    pub fn set_scroll(&mut self, x: f32, y: f32, dims: &Dimensions, config: &GridConfig) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(dims, config);
    }

    pub fn scroll_by(&mut self, dx: f32, dy: f32, dims: &Dimensions, config: &GridConfig) {
        self.set_scroll(self.scroll_x + dx, self.scroll_y + dy, dims, config);
    }

    pub fn clamp_scroll(&mut self, dims: &Dimensions, config: &GridConfig) {
        let content_width = config.gutter_width + dims.total_width();
        let max_x = (content_width - self.width).max(0.0);
        let max_y = (dims.total_height() - self.height).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    /// Screen x of a column's left edge with sticky clamping applied
    pub fn column_screen_x(&self, col: u32, dims: &Dimensions, config: &GridConfig) -> f32 {
        let natural = config.gutter_width + dims.col_left(col) - self.scroll_x;
        if let Some(left) = leading_left(col, dims, config) {
            return natural.max(left);
        }
        if let Some(right) = trailing_right(col, dims, config) {
            let width = dims.col_width(col).unwrap_or_default();
            return natural.min(self.width - right - width);
        }
        natural
    }

    /// Screen y of a row's top edge with sticky clamping applied
    pub fn row_screen_y(&self, row: u32, dims: &Dimensions, config: &GridConfig) -> f32 {
        let natural = dims.row_top(row) - self.scroll_y;
        match header_top(row, dims, config) {
            Some(top) => natural.max(top),
            None => natural,
        }
    }

    /// Resolve a screen point to what the user would be pointing at.
    ///
    /// Pinned rows and columns are tested before scrolled ones since they
    /// paint on top.
    pub fn hit_test(&self, x: f32, y: f32, dims: &Dimensions, config: &GridConfig) -> PointerTarget {
        let Some(row) = self.row_at_screen_y(y, dims, config) else {
            return PointerTarget::None;
        };

        if x < config.gutter_width {
            let bottom = self.row_screen_y(row, dims, config) + dims.row_height(row).unwrap_or_default();
            if bottom - y <= RESIZE_HANDLE_SIZE {
                return PointerTarget::RowResizeHandle { row };
            }
            return PointerTarget::None;
        }

        let Some(col) = self.col_at_screen_x(x, dims, config) else {
            return PointerTarget::None;
        };

        if config.is_header_row(row) {
            let right = self.column_screen_x(col, dims, config) + dims.col_width(col).unwrap_or_default();
            if right - x <= RESIZE_HANDLE_SIZE {
                return PointerTarget::ColumnResizeHandle { col };
            }
        }

        PointerTarget::Cell { row, col }
    }

    /// Cell position under a screen point, ignoring resize handles
    pub fn cell_at(&self, x: f32, y: f32, dims: &Dimensions, config: &GridConfig) -> Option<Position> {
        if x < config.gutter_width {
            return None;
        }
        let row = self.row_at_screen_y(y, dims, config)?;
        let col = self.col_at_screen_x(x, dims, config)?;
        Some(Position::new(row, col))
    }

    fn col_at_screen_x(&self, x: f32, dims: &Dimensions, config: &GridConfig) -> Option<u32> {
        let pinned = config
            .leading_pinned
            .iter()
            .chain(config.trailing_pinned.iter())
            .copied();
        for col in pinned {
            let Some(width) = dims.col_width(col) else {
                continue;
            };
            let left = self.column_screen_x(col, dims, config);
            if x >= left && x < left + width {
                return Some(col);
            }
        }
        dims.col_at_x(x + self.scroll_x - config.gutter_width)
    }

    fn row_at_screen_y(&self, y: f32, dims: &Dimensions, config: &GridConfig) -> Option<u32> {
        for &row in &config.pinned_header_rows {
            let Some(height) = dims.row_height(row) else {
                continue;
            };
            let top = self.row_screen_y(row, dims, config);
            if y >= top && y < top + height {
                return Some(row);
            }
        }
        dims.row_at_y(y + self.scroll_y)
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

    fn setup() -> (Dimensions, GridConfig) {
        let config = GridConfig {
            leading_pinned: vec![0, 1],
            trailing_pinned: vec![8, 9],
            pinned_header_rows: vec![0],
            status_columns: vec![8, 9],
            gutter_width: 48.0,
            ..GridConfig::default()
        };
        (Dimensions::uniform(100, 10, 100.0, 30.0), config)
    }

    fn viewport(scroll_x: f32, scroll_y: f32) -> Viewport {
        Viewport {
            scroll_x,
            scroll_y,
            width: 600.0,
            height: 400.0,
        }
    }

    #[test]
    fn unscrolled_columns_at_natural_position() {
        let (dims, cfg) = setup();
        let vp = viewport(0.0, 0.0);
        assert_eq!(vp.column_screen_x(0, &dims, &cfg), 48.0);
        assert_eq!(vp.column_screen_x(3, &dims, &cfg), 348.0);
    }

    #[test]
    fn leading_pinned_sticks_when_scrolled() {
        let (dims, cfg) = setup();
        let vp = viewport(250.0, 0.0);
        assert_eq!(vp.column_screen_x(0, &dims, &cfg), 48.0);
        assert_eq!(vp.column_screen_x(1, &dims, &cfg), 148.0);
        assert_eq!(vp.column_screen_x(3, &dims, &cfg), 98.0);
    }

    #[test]
    fn trailing_pinned_sticks_to_right_edge() {
        let (dims, cfg) = setup();
        let vp = viewport(0.0, 0.0);
        assert_eq!(vp.column_screen_x(9, &dims, &cfg), 500.0);
        assert_eq!(vp.column_screen_x(8, &dims, &cfg), 400.0);
    }

    #[test]
    fn header_row_sticks_when_scrolled() {
        let (dims, cfg) = setup();
        let vp = viewport(0.0, 300.0);
        assert_eq!(vp.row_screen_y(0, &dims, &cfg), 0.0);
        assert_eq!(vp.row_screen_y(12, &dims, &cfg), 60.0);
    }

    #[test]
    fn pinned_cells_win_hit_test() {
        let (dims, cfg) = setup();
        let vp = viewport(250.0, 300.0);
        // Column 2 scrolled under the leading group; header row over row 10
        assert_eq!(
            vp.hit_test(60.0, 10.0, &dims, &cfg),
            PointerTarget::Cell { row: 0, col: 0 }
        );
        assert_eq!(
            vp.hit_test(550.0, 100.0, &dims, &cfg),
            PointerTarget::Cell { row: 13, col: 9 }
        );
        assert_eq!(
            vp.hit_test(260.0, 100.0, &dims, &cfg),
            PointerTarget::Cell { row: 13, col: 4 }
        );
    }

    #[test]
    fn resize_handles() {
        let (dims, cfg) = setup();
        let vp = viewport(0.0, 0.0);
        assert_eq!(
            vp.hit_test(246.0, 10.0, &dims, &cfg),
            PointerTarget::ColumnResizeHandle { col: 1 }
        );
        // Same x outside the header row is a plain cell
        assert_eq!(
            vp.hit_test(246.0, 40.0, &dims, &cfg),
            PointerTarget::Cell { row: 1, col: 1 }
        );
        assert_eq!(
            vp.hit_test(10.0, 58.0, &dims, &cfg),
            PointerTarget::RowResizeHandle { row: 1 }
        );
        assert_eq!(vp.hit_test(10.0, 40.0, &dims, &cfg), PointerTarget::None);
    }

    #[test]
    fn outside_content_is_none() {
        let (dims, cfg) = setup();
        let vp = viewport(0.0, 0.0);
        assert_eq!(vp.hit_test(100.0, 5000.0, &dims, &cfg), PointerTarget::None);
    }

    #[test]
    fn clamp_scroll_to_content() {
        let (dims, cfg) = setup();
        let mut vp = viewport(0.0, 0.0);
        vp.set_scroll(-20.0, 99999.0, &dims, &cfg);
        assert_eq!(vp.scroll_x, 0.0);
        assert_eq!(vp.scroll_y, 3000.0 - 400.0);
        vp.scroll_by(10_000.0, 0.0, &dims, &cfg);
        assert_eq!(vp.scroll_x, 48.0 + 1000.0 - 600.0);
    }
}
