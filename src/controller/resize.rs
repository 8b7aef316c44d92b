//! Pointer-driven column / row resizing.

use tracing::debug;

use crate::grid::Dimensions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAxis {
    Column,
    Row,
}

/// Resize interaction state machine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing {
        axis: ResizeAxis,
        index: u32,
        /// Pointer coordinate along the axis at drag start
        start_coord: f32,
        start_size: f32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    state: ResizeState,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Grab the handle of column/row `index`. Returns false if it does not exist.
    pub fn begin(&mut self, axis: ResizeAxis, index: u32, coord: f32, dims: &Dimensions) -> bool {
        let size = match axis {
            ResizeAxis::Column => dims.col_width(index),
            ResizeAxis::Row => dims.row_height(index),
        };
        let Some(start_size) = size else {
            return false;
        };
        debug!(?axis, index, start_size, "resize started");
        self.state = ResizeState::Resizing {
            axis,
            index,
            start_coord: coord,
            start_size,
        };
        true
    }

    /// Apply a global pointer move. Returns the new size while resizing.
    pub fn drag(&mut self, coord: f32, dims: &mut Dimensions) -> Option<f32> {
        let ResizeState::Resizing {
            axis,
            index,
            start_coord,
            start_size,
        } = self.state
        else {
            return None;
        };
        let requested = start_size + (coord - start_coord);
        match axis {
            ResizeAxis::Column => dims.set_col_width(index, requested),
            ResizeAxis::Row => dims.set_row_height(index, requested),
        }
    }

    /// Release the handle. Returns true if a resize was in progress.
    pub fn end(&mut self) -> bool {
        let was_active = self.is_active();
        if let ResizeState::Resizing { axis, index, .. } = self.state {
            debug!(?axis, index, "resize finished");
        }
        self.state = ResizeState::Idle;
        was_active
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
    use crate::config::{MIN_COL_WIDTH, MIN_ROW_HEIGHT};

    #[test]
    fn drag_tracks_delta_from_start() {
        let mut dims = Dimensions::uniform(3, 3, 128.0, 32.0);
        let mut ctl = ResizeController::new();
        assert!(ctl.begin(ResizeAxis::Column, 1, 400.0, &dims));
        assert_eq!(ctl.drag(450.0, &mut dims), Some(178.0));
        assert_eq!(ctl.drag(420.0, &mut dims), Some(148.0));
        assert!(ctl.end());
        assert_eq!(dims.col_width(1), Some(148.0));
        assert_eq!(dims.col_width(0), Some(128.0));
        assert_eq!(dims.col_width(2), Some(128.0));
    }

    #[test]
    fn clamps_to_minimum() {
        let mut dims = Dimensions::uniform(3, 3, 128.0, 32.0);
        let mut ctl = ResizeController::new();
        ctl.begin(ResizeAxis::Column, 0, 100.0, &dims);
        assert_eq!(ctl.drag(-1000.0, &mut dims), Some(MIN_COL_WIDTH));
        ctl.end();

        ctl.begin(ResizeAxis::Row, 2, 50.0, &dims);
        assert_eq!(ctl.drag(0.0, &mut dims), Some(MIN_ROW_HEIGHT));
        ctl.end();
    }

    #[test]
    fn drag_when_idle_is_noop() {
        let mut dims = Dimensions::uniform(1, 1, 128.0, 32.0);
        let mut ctl = ResizeController::new();
        assert_eq!(ctl.drag(10.0, &mut dims), None);
        assert!(!ctl.end());
    }

    #[test]
    fn begin_on_missing_index_fails() {
        let dims = Dimensions::uniform(1, 1, 128.0, 32.0);
        let mut ctl = ResizeController::new();
        assert!(!ctl.begin(ResizeAxis::Row, 7, 0.0, &dims));
        assert!(!ctl.is_active());
    }
}
