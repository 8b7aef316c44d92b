//! Inline editing of free-text cells and the status-column operations.
//!
//! The controller owns at most one `EditSession`. Every local mutation it
//! performs produces a `PendingWrite` describing what to send to the gateway
//! and how to undo the change if the caller's failure policy asks for it.

use tracing::debug;

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::persistence::{CellWrite, StatusCode};
use crate::types::Position;

/// How a cell reacts to click and double-click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Pinned header row, never edited or written
    Header,
    /// Set to accepted / rejected, never opened for editing
    Status,
    FreeText,
}

pub fn cell_kind(pos: Position, config: &GridConfig) -> CellKind {
    if config.is_header_row(pos.row) {
        CellKind::Header
    } else if config.is_status_column(pos.col) {
        CellKind::Status
    } else {
        CellKind::FreeText
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub position: Position,
    pub draft: String,
    /// Value the cell held when the session opened
    pub original: String,
}

/// A local change that still has to reach the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub position: Position,
    pub write: CellWrite,
    /// Value now shown in the cell (the glyph for status cells)
    pub local_value: String,
    /// Value the cell held before this change
    pub previous: String,
}

/// Keys the editor understands, named as in `KeyboardEvent.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Char(char),
    Backspace,
    Enter,
    Escape,
    Other,
}

impl EditKey {
    pub fn parse(key: &str) -> Self {
        match key {
            "Enter" => EditKey::Enter,
            "Escape" | "Esc" => EditKey::Escape,
            "Backspace" => EditKey::Backspace,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => EditKey::Char(c),
                    _ => EditKey::Other,
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum KeyOutcome {
    /// No session, or a key the editor does not handle
    Ignored,
    DraftChanged,
    Committed(Result<PendingWrite>),
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct EditController {
    session: Option<EditSession>,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_editing_at(&self, pos: Position) -> bool {
        self.session.as_ref().is_some_and(|s| s.position == pos)
    }

    /// Open an editor on `pos`.
    ///
    /// Any open session is committed first and its outcome returned. The new
    /// session only opens on free-text cells inside the matrix.
    pub fn begin(
        &mut self,
        pos: Position,
        model: &mut GridModel,
        config: &GridConfig,
    ) -> Option<Result<PendingWrite>> {
        if self.is_editing_at(pos) {
            return None;
        }
        let committed = self.commit(model, config);

        if cell_kind(pos, config) != CellKind::FreeText {
            return committed;
        }
        if let Some(value) = model.cell_value(pos) {
            debug!(row = pos.row, col = pos.col, "edit started");
            self.session = Some(EditSession {
                position: pos,
                draft: value.to_string(),
                original: value.to_string(),
            });
        }
        committed
    }

    pub fn key(&mut self, key: EditKey, model: &mut GridModel, config: &GridConfig) -> KeyOutcome {
        let Some(session) = self.session.as_mut() else {
            return KeyOutcome::Ignored;
        };
        match key {
            EditKey::Char(c) => {
                session.draft.push(c);
                KeyOutcome::DraftChanged
            }
            EditKey::Backspace => {
                session.draft.pop();
                KeyOutcome::DraftChanged
            }
            EditKey::Enter => match self.commit(model, config) {
                Some(result) => KeyOutcome::Committed(result),
                None => KeyOutcome::Ignored,
            },
            EditKey::Escape => {
                self.cancel();
                KeyOutcome::Cancelled
            }
            EditKey::Other => KeyOutcome::Ignored,
        }
    }

    /// Replace the whole draft, e.g. from an `<input>` element's value
    pub fn set_draft(&mut self, value: impl Into<String>) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.draft = value.into();
                true
            }
            None => false,
        }
    }

    /// Write the draft into the model and close the session.
    ///
    /// The local value is kept even when the write cannot be addressed.
    pub fn commit(&mut self, model: &mut GridModel, config: &GridConfig) -> Option<Result<PendingWrite>> {
        let session = self.session.take()?;
        debug!(
            row = session.position.row,
            col = session.position.col,
            "edit committed"
        );
        Some(apply_local(model, config, session.position, session.draft, None))
    }

    /// Drop the draft without touching the model
    pub fn cancel(&mut self) -> Option<EditSession> {
        let session = self.session.take();
        if let Some(s) = &session {
            debug!(row = s.position.row, col = s.position.col, "edit cancelled");
        }
        session
    }

    /// Mark a status cell as accepted
    pub fn set_accepted(
        &self,
        pos: Position,
        model: &mut GridModel,
        config: &GridConfig,
    ) -> Result<PendingWrite> {
        set_status(pos, StatusCode::Accepted, model, config)
    }

    /// Mark a status cell as rejected
    pub fn set_rejected(
        &self,
        pos: Position,
        model: &mut GridModel,
        config: &GridConfig,
    ) -> Result<PendingWrite> {
        set_status(pos, StatusCode::Rejected, model, config)
    }
}

fn set_status(
    pos: Position,
    code: StatusCode,
    model: &mut GridModel,
    config: &GridConfig,
) -> Result<PendingWrite> {
    match cell_kind(pos, config) {
        CellKind::Header => return Err(GridError::HeaderRow(pos.row)),
        CellKind::FreeText => return Err(GridError::NotStatusColumn(pos.col)),
        CellKind::Status => {}
    }
    let glyph = match code {
        StatusCode::Accepted => config.markers.accepted.clone(),
        StatusCode::Rejected => config.markers.rejected.clone(),
    };
    debug!(row = pos.row, col = pos.col, status = code.as_str(), "status set");
    apply_local(model, config, pos, glyph, Some(code.as_str()))
}

/// Set the local value, then address the write. `stored` overrides the value
/// sent to the gateway.
fn apply_local(
    model: &mut GridModel,
    config: &GridConfig,
    pos: Position,
    local_value: String,
    stored: Option<&str>,
) -> Result<PendingWrite> {
    if config.is_header_row(pos.row) {
        return Err(GridError::HeaderRow(pos.row));
    }
    // The row key must be read before the cell changes: the identity column
    // itself is editable.
    let value = stored.map_or_else(|| local_value.clone(), str::to_string);
    let addressed = address_write(model, config, pos, value);
    let previous = model.set_cell_value(pos, local_value.clone())?;
    let write = addressed?;
    Ok(PendingWrite {
        position: pos,
        write,
        local_value,
        previous,
    })
}

/// Build the gateway request for a cell from its row key and column field
pub fn address_write(
    model: &GridModel,
    config: &GridConfig,
    pos: Position,
    value: String,
) -> Result<CellWrite> {
    let row_key = model
        .cell_value(Position::new(pos.row, config.identity_column))
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(GridError::MissingRowKey(pos.row))?;
    let field = config
        .fields
        .field(pos.col)
        .ok_or(GridError::UnmappedColumn(pos.col))?;
    Ok(CellWrite {
        row_key: row_key.to_string(),
        column: pos.col,
        field: field.to_string(),
        value,
    })
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
    use crate::types::Cell;
    use test_case::test_case;

    fn config() -> GridConfig {
        GridConfig {
            leading_pinned: vec![0],
            trailing_pinned: vec![3],
            status_columns: vec![3],
            fields: FieldTable::new(["uhid", "name", "", "discharge"]),
            ..GridConfig::default()
        }
    }

    fn model() -> GridModel {
        let mut m = GridModel::new(128.0, 32.0);
        let rows = vec![
            vec!["UHID", "Name", "Notes", "Discharge"],
            vec!["U-1", "Asha", "", ""],
            vec!["", "Ravi", "", ""],
        ];
        m.load_initial(
            rows.into_iter()
                .map(|r| r.into_iter().map(Cell::new).collect())
                .collect(),
        )
        .unwrap();
        m
    }

    #[test_case("a", EditKey::Char('a'))]
    #[test_case("Enter", EditKey::Enter)]
    #[test_case("Escape", EditKey::Escape)]
    #[test_case("Backspace", EditKey::Backspace)]
    #[test_case("Shift", EditKey::Other)]
    #[test_case("\u{0900}", EditKey::Char('\u{0900}'))]
    fn parse_keys(key: &str, expected: EditKey) {
        assert_eq!(EditKey::parse(key), expected);
    }

    #[test_case(0, 1, CellKind::Header)]
    #[test_case(0, 3, CellKind::Header)]
    #[test_case(1, 3, CellKind::Status)]
    #[test_case(2, 1, CellKind::FreeText)]
    fn classifies_cells(row: u32, col: u32, expected: CellKind) {
        assert_eq!(cell_kind(Position::new(row, col), &config()), expected);
    }

    #[test]
    fn typing_only_touches_draft() {
        let cfg = config();
        let mut m = model();
        let mut edit = EditController::new();
        assert!(edit.begin(Position::new(1, 1), &mut m, &cfg).is_none());
        edit.key(EditKey::Backspace, &mut m, &cfg);
        edit.key(EditKey::Char('!'), &mut m, &cfg);
        assert_eq!(edit.session().unwrap().draft, "Ash!");
        assert_eq!(m.cell_value(Position::new(1, 1)), Some("Asha"));
    }

    #[test]
    fn enter_commits_with_row_key_and_field() {
        let cfg = config();
        let mut m = model();
        let mut edit = EditController::new();
        edit.begin(Position::new(1, 1), &mut m, &cfg);
        edit.set_draft("Asha K");
        let KeyOutcome::Committed(Ok(pending)) = edit.key(EditKey::Enter, &mut m, &cfg) else {
            panic!("expected commit");
        };
        assert_eq!(pending.write.row_key, "U-1");
        assert_eq!(pending.write.field, "name");
        assert_eq!(pending.write.value, "Asha K");
        assert_eq!(pending.previous, "Asha");
        assert_eq!(m.cell_value(Position::new(1, 1)), Some("Asha K"));
        assert!(!edit.is_editing());
    }

    #[test]
    fn identity_edit_is_keyed_by_previous_value() {
        let cfg = config();
        let mut m = model();
        let mut edit = EditController::new();
        edit.begin(Position::new(1, 0), &mut m, &cfg);
        edit.set_draft("U-9");
        let pending = edit.commit(&mut m, &cfg).unwrap().unwrap();
        assert_eq!(pending.write.row_key, "U-1");
        assert_eq!(pending.write.value, "U-9");
        assert_eq!(m.cell_value(Position::new(1, 0)), Some("U-9"));

        // Typing a key into a keyless row does not make the write addressable
        edit.begin(Position::new(2, 0), &mut m, &cfg);
        edit.set_draft("U-2");
        let err = edit.commit(&mut m, &cfg).unwrap().unwrap_err();
        assert!(matches!(err, GridError::MissingRowKey(2)));
        assert_eq!(m.cell_value(Position::new(2, 0)), Some("U-2"));
    }

    #[test]
    fn escape_leaves_model_untouched() {
        let cfg = config();
        let mut m = model();
        let mut edit = EditController::new();
        edit.begin(Position::new(1, 1), &mut m, &cfg);
        edit.set_draft("discarded");
        assert!(matches!(edit.key(EditKey::Escape, &mut m, &cfg), KeyOutcome::Cancelled));
        assert_eq!(m.cell_value(Position::new(1, 1)), Some("Asha"));
    }

    #[test]
    fn second_begin_commits_first() {
        let cfg = config();
        let mut m = model();
        let mut edit = EditController::new();
        edit.begin(Position::new(1, 1), &mut m, &cfg);
        edit.set_draft("first");
        let committed = edit.begin(Position::new(1, 2), &mut m, &cfg).unwrap();
        // Column 2 is unmapped, but the commit was for column 1
        assert_eq!(committed.unwrap().write.value, "first");
        assert_eq!(m.cell_value(Position::new(1, 1)), Some("first"));
        assert_eq!(edit.session().unwrap().position, Position::new(1, 2));
    }

    #[test]
    fn header_and_status_cells_never_open() {
        let cfg = config();
        let mut m = model();
        let mut edit = EditController::new();
        edit.begin(Position::new(0, 1), &mut m, &cfg);
        assert!(!edit.is_editing());
        edit.begin(Position::new(1, 3), &mut m, &cfg);
        assert!(!edit.is_editing());
    }

    #[test]
    fn missing_key_keeps_local_value() {
        let cfg = config();
        let mut m = model();
        let mut edit = EditController::new();
        edit.begin(Position::new(2, 1), &mut m, &cfg);
        edit.set_draft("Ravi S");
        let err = edit.commit(&mut m, &cfg).unwrap().unwrap_err();
        assert!(matches!(err, GridError::MissingRowKey(2)));
        assert_eq!(m.cell_value(Position::new(2, 1)), Some("Ravi S"));
    }

    #[test]
    fn unmapped_column_is_not_addressable() {
        let cfg = config();
        let mut m = model();
        let err = address_write(&m, &cfg, Position::new(1, 2), "x".into()).unwrap_err();
        assert!(matches!(err, GridError::UnmappedColumn(2)));
        m.set_cell_value(Position::new(1, 0), "  ").unwrap();
        let err = address_write(&m, &cfg, Position::new(1, 1), "x".into()).unwrap_err();
        assert!(matches!(err, GridError::MissingRowKey(1)));
    }

    #[test]
    fn status_sets_glyph_and_sends_code() {
        let cfg = config();
        let mut m = model();
        let edit = EditController::new();
        let pos = Position::new(1, 3);

        let accepted = edit.set_accepted(pos, &mut m, &cfg).unwrap();
        assert_eq!(m.cell_value(pos), Some(cfg.markers.accepted.as_str()));
        assert_eq!(accepted.write.value, "accepted");
        assert_eq!(accepted.write.field, "discharge");

        // Absolute set, not a toggle
        edit.set_accepted(pos, &mut m, &cfg).unwrap();
        assert_eq!(m.cell_value(pos), Some(cfg.markers.accepted.as_str()));

        let rejected = edit.set_rejected(pos, &mut m, &cfg).unwrap();
        assert_eq!(m.cell_value(pos), Some(cfg.markers.rejected.as_str()));
        assert_eq!(rejected.write.value, "rejected");
        assert_eq!(rejected.previous, cfg.markers.accepted);
    }

    #[test]
    fn status_refused_outside_status_columns() {
        let cfg = config();
        let mut m = model();
        let edit = EditController::new();
        assert!(matches!(
            edit.set_accepted(Position::new(0, 3), &mut m, &cfg),
            Err(GridError::HeaderRow(0))
        ));
        assert!(matches!(
            edit.set_rejected(Position::new(1, 1), &mut m, &cfg),
            Err(GridError::NotStatusColumn(1))
        ));
        assert_eq!(m.cell_value(Position::new(0, 3)), Some("Discharge"));
    }
}
