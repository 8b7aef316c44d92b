//! Drag-to-select state machine.

use tracing::debug;

use crate::types::{CellRange, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Selecting,
}

/// Rectangular selection driven by pointer down / enter / up.
///
/// The selection persists after the drag ends; only the phase returns to idle.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    phase: SelectionPhase,
    anchor: Option<Position>,
    current: Option<Position>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn is_selecting(&self) -> bool {
        self.phase == SelectionPhase::Selecting
    }

    /// Start a drag at `pos`. The cell becomes the anchor and the whole selection.
    pub fn pointer_down(&mut self, pos: Position) {
        debug!(row = pos.row, col = pos.col, "selection started");
        self.phase = SelectionPhase::Selecting;
        self.anchor = Some(pos);
        self.current = Some(pos);
    }

    /// Extend the drag to `pos`. Returns true when the range changed.
    pub fn pointer_enter(&mut self, pos: Position) -> bool {
        if self.phase != SelectionPhase::Selecting || self.current == Some(pos) {
            return false;
        }
        self.current = Some(pos);
        true
    }

    /// End the drag wherever the pointer was released.
    pub fn pointer_up(&mut self) {
        if self.phase == SelectionPhase::Selecting {
            debug!(cells = self.range().map_or(0, |r| r.len()), "selection finished");
        }
        self.phase = SelectionPhase::Idle;
    }

    pub fn clear(&mut self) {
        self.phase = SelectionPhase::Idle;
        self.anchor = None;
        self.current = None;
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    pub fn range(&self) -> Option<CellRange> {
        Some(CellRange::from_corners(self.anchor?, self.current?))
    }

    /// Selected positions in row-major order
    pub fn positions(&self) -> Vec<Position> {
        self.range()
            .map(|r| r.positions().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.range().is_some_and(|r| r.contains(pos))
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
    fn click_without_drag_selects_one_cell() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Position::new(2, 3));
        sel.pointer_up();
        assert_eq!(sel.positions(), vec![Position::new(2, 3)]);
        assert_eq!(sel.phase(), SelectionPhase::Idle);
    }

    #[test]
    fn enter_ignored_when_idle() {
        let mut sel = SelectionController::new();
        assert!(!sel.pointer_enter(Position::new(1, 1)));
        assert!(sel.range().is_none());

        sel.pointer_down(Position::new(0, 0));
        sel.pointer_up();
        assert!(!sel.pointer_enter(Position::new(4, 4)));
        assert_eq!(sel.positions().len(), 1);
    }

    #[test]
    fn drag_backwards_normalizes() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Position::new(3, 3));
        assert!(sel.pointer_enter(Position::new(2, 1)));
        let range = sel.range().unwrap();
        assert_eq!((range.top, range.left, range.bottom, range.right), (2, 1, 3, 3));
        assert_eq!(sel.anchor(), Some(Position::new(3, 3)));
    }

    #[test]
    fn repeated_enter_same_cell_is_no_change() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Position::new(0, 0));
        assert!(sel.pointer_enter(Position::new(1, 1)));
        assert!(!sel.pointer_enter(Position::new(1, 1)));
    }
}
