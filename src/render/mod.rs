//! Per-paint snapshot of everything the host needs to draw the grid.
//!
//! The frame is plain serializable data: the browser binding hands it to JS
//! through `serde_wasm_bindgen` or applies it to DOM nodes via `dom`.

pub mod css;
#[cfg(target_arch = "wasm32")]
pub mod dom;

use serde::Serialize;

use crate::config::GridConfig;
use crate::controller::{cell_kind, CellKind, EditController, ResizeAxis, SelectionController};
use crate::grid::GridModel;
use crate::layout::{sticky, StickyOffsets};
use crate::search::{highlight, SearchState, TextSegment};
use crate::types::{Cell, CellFormatting, CellRange, Position};

pub use css::CssDecl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellRole {
    Header,
    Status,
    Text,
}

impl From<CellKind> for CellRole {
    fn from(kind: CellKind) -> Self {
        match kind {
            CellKind::Header => CellRole::Header,
            CellKind::Status => CellRole::Status,
            CellKind::FreeText => CellRole::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCell {
    pub row: u32,
    pub col: u32,
    /// Committed value, or the draft while this cell is being edited
    pub text: String,
    pub role: CellRole,
    pub width: f32,
    pub sticky: StickyOffsets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting: Option<CellFormatting>,
    /// Formatting and sticky offsets as CSS
    pub style: Vec<CssDecl>,
    pub selected: bool,
    pub is_match: bool,
    pub current_match: bool,
    pub editing: bool,
    /// Search highlight runs; empty when the cell is not a match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<TextSegment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRow {
    pub row: u32,
    pub height: f32,
    pub is_header: bool,
    /// Sticky top inset for pinned header rows
    pub sticky_top: Option<f32>,
    pub cells: Vec<RenderCell>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSummary {
    pub term: String,
    pub match_count: usize,
    pub current_index: Option<usize>,
    pub current: Option<Position>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub gutter_width: f32,
    pub col_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    pub total_width: f32,
    pub total_height: f32,
    pub rows: Vec<RenderRow>,
    pub selection: Option<CellRange>,
    pub editing: Option<Position>,
    pub resizing: Option<ResizeAxis>,
    pub search: SearchSummary,
}

impl RenderFrame {
    pub fn cell(&self, pos: Position) -> Option<&RenderCell> {
        self.rows
            .iter()
            .find(|r| r.row == pos.row)?
            .cells
            .iter()
            .find(|c| c.col == pos.col)
    }
}

/// Borrowed view state needed to build a frame
pub struct FrameSource<'a> {
    pub model: &'a GridModel,
    pub config: &'a GridConfig,
    pub selection: &'a SelectionController,
    pub edit: &'a EditController,
    pub search: &'a SearchState,
    pub resizing: Option<ResizeAxis>,
}

/// Renders a single cell with the same flags and styling a full frame gives it
pub fn build_cell(src: &FrameSource<'_>, pos: Position) -> Option<RenderCell> {
    let cell = src.model.get_cell(pos)?;
    Some(render_cell(src, pos, cell))
}

fn render_cell(src: &FrameSource<'_>, pos: Position, cell: &Cell) -> RenderCell {
    let dims = src.model.dimensions();
    let offsets = sticky(pos, dims, src.config);
    let editing = src.edit.session().filter(|s| s.position == pos);
    let is_match = src.search.is_match(pos);

    let mut style = cell
        .formatting
        .as_ref()
        .map(css::formatting_declarations)
        .unwrap_or_default();
    style.extend(css::sticky_declarations(&offsets));

    RenderCell {
        row: pos.row,
        col: pos.col,
        text: editing.map_or_else(|| cell.value.clone(), |s| s.draft.clone()),
        role: cell_kind(pos, src.config).into(),
        width: dims.col_width(pos.col).unwrap_or_default(),
        sticky: offsets,
        formatting: cell.formatting.clone(),
        style,
        selected: src.selection.range().is_some_and(|r| r.contains(pos)),
        is_match,
        current_match: src.search.is_current(pos),
        editing: editing.is_some(),
        segments: if is_match && editing.is_none() {
            highlight(&cell.value, src.search.term())
        } else {
            Vec::new()
        },
    }
}

pub fn build_frame(src: &FrameSource<'_>) -> RenderFrame {
    let dims = src.model.dimensions();
    let term = src.search.term();

    let mut rows = Vec::with_capacity(src.model.row_count());
    for (r, cells) in src.model.rows().enumerate() {
        let Ok(row) = u32::try_from(r) else { break };
        let mut rendered = Vec::with_capacity(cells.len());
        for (c, cell) in cells.iter().enumerate() {
            let Ok(col) = u32::try_from(c) else { break };
            rendered.push(render_cell(src, Position::new(row, col), cell));
        }
        rows.push(RenderRow {
            row,
            height: dims.row_height(row).unwrap_or_default(),
            is_header: src.config.is_header_row(row),
            sticky_top: crate::layout::header_top(row, dims, src.config),
            cells: rendered,
        });
    }

    RenderFrame {
        gutter_width: src.config.gutter_width,
        col_widths: dims.col_widths().to_vec(),
        row_heights: dims.row_heights().to_vec(),
        total_width: src.config.gutter_width + dims.total_width(),
        total_height: dims.total_height(),
        rows,
        selection: src.selection.range(),
        editing: src.edit.session().map(|s| s.position),
        resizing: src.resizing,
        search: SearchSummary {
            term: term.to_string(),
            match_count: src.search.match_count(),
            current_index: src.search.current_index(),
            current: src.search.current(),
        },
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
    use crate::persistence::FieldTable;

    struct Fixture {
        model: GridModel,
        config: GridConfig,
        selection: SelectionController,
        edit: EditController,
        search: SearchState,
    }

    impl Fixture {
        fn new() -> Self {
            let config = GridConfig {
                leading_pinned: vec![0],
                trailing_pinned: vec![2],
                status_columns: vec![2],
                fields: FieldTable::new(["uhid", "name", "status"]),
                ..GridConfig::default()
            };
            let mut model = GridModel::new(config.default_col_width, config.default_row_height);
            model
                .load_initial(vec![
                    vec![Cell::new("UHID"), Cell::new("Patient"), Cell::new("Status")],
                    vec![Cell::new("U-1"), Cell::new("Meena"), Cell::new("")],
                    vec![Cell::new("U-2"), Cell::new("Ramesh"), Cell::new("")],
                ])
                .unwrap();
            Self {
                model,
                config,
                selection: SelectionController::new(),
                edit: EditController::new(),
                search: SearchState::new(),
            }
        }

        fn frame(&self) -> RenderFrame {
            build_frame(&FrameSource {
                model: &self.model,
                config: &self.config,
                selection: &self.selection,
                edit: &self.edit,
                search: &self.search,
                resizing: None,
            })
        }
    }

    #[test]
    fn frame_mirrors_model() {
        let fx = Fixture::new();
        let frame = fx.frame();
        assert_eq!(frame.rows.len(), 3);
        assert_eq!(frame.col_widths.len(), 3);
        assert!(frame.rows[0].is_header);
        assert_eq!(frame.rows[0].sticky_top, Some(0.0));
        assert_eq!(frame.cell(Position::new(1, 2)).unwrap().role, CellRole::Status);
        assert_eq!(frame.cell(Position::new(0, 2)).unwrap().role, CellRole::Header);
    }

    #[test]
    fn flags_selection_and_matches() {
        let mut fx = Fixture::new();
        fx.selection.pointer_down(Position::new(1, 0));
        fx.selection.pointer_enter(Position::new(2, 1));
        fx.search.set_term("me", &fx.model);
        fx.search.next();
        let frame = fx.frame();

        assert!(frame.cell(Position::new(2, 1)).unwrap().selected);
        assert!(!frame.cell(Position::new(0, 0)).unwrap().selected);

        let meena = frame.cell(Position::new(1, 1)).unwrap();
        let ramesh = frame.cell(Position::new(2, 1)).unwrap();
        assert!(meena.is_match && !meena.current_match);
        assert!(ramesh.is_match && ramesh.current_match);
        assert_eq!(ramesh.segments.len(), 3);
        assert_eq!(frame.search.current, Some(Position::new(2, 1)));
    }

    #[test]
    fn editing_cell_shows_draft() {
        let mut fx = Fixture::new();
        fx.edit.begin(Position::new(1, 1), &mut fx.model, &fx.config);
        fx.edit.set_draft("Meena R");
        let frame = fx.frame();
        let cell = frame.cell(Position::new(1, 1)).unwrap();
        assert!(cell.editing);
        assert_eq!(cell.text, "Meena R");
        assert_eq!(frame.editing, Some(Position::new(1, 1)));
        assert_eq!(fx.model.cell_value(Position::new(1, 1)), Some("Meena"));
    }

    #[test]
    fn single_cell_matches_full_frame() {
        let mut fx = Fixture::new();
        fx.selection.pointer_down(Position::new(1, 0));
        fx.search.set_term("me", &fx.model);
        fx.search.next();
        let frame = fx.frame();
        let src = FrameSource {
            model: &fx.model,
            config: &fx.config,
            selection: &fx.selection,
            edit: &fx.edit,
            search: &fx.search,
            resizing: None,
        };
        for pos in [Position::new(1, 0), Position::new(2, 1), Position::new(0, 2)] {
            assert_eq!(build_cell(&src, pos).as_ref(), frame.cell(pos));
        }
        assert!(build_cell(&src, Position::new(2, 1)).unwrap().current_match);
        assert!(build_cell(&src, Position::new(5, 0)).is_none());
    }

    #[test]
    fn pinned_cells_carry_sticky_style() {
        let fx = Fixture::new();
        let frame = fx.frame();
        let uhid = frame.cell(Position::new(1, 0)).unwrap();
        assert_eq!(uhid.sticky.left, Some(fx.config.gutter_width));
        assert!(uhid.style.iter().any(|d| d.property == "position"));
        let name = frame.cell(Position::new(1, 1)).unwrap();
        assert!(name.style.is_empty());
    }
}
