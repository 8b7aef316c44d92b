//! `GridView`: the single owner of grid state and its event dispatcher.
//!
//! Every pointer and keyboard event enters here and is routed to exactly one
//! controller, in priority order resize, edit, selection. Gateway writes are
//! spawned only after the state borrow is released; their completions find
//! the state again through a `Weak` handle, so a dropped view simply ignores
//! late results.

mod clipboard;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{GridConfig, WriteFailurePolicy};
use crate::controller::{
    cell_kind, CellKind, EditController, EditKey, EditSession, KeyOutcome, PendingWrite,
    ResizeAxis, ResizeController, ResizeState, SelectionController,
};
use crate::error::{GridError, Result};
use crate::grid::GridModel;
use crate::layout::{PointerTarget, Viewport};
use crate::persistence::{PersistenceGateway, StatusCode};
use crate::render::{build_cell, build_frame, FrameSource, RenderCell, RenderFrame};
use crate::search::SearchState;
use crate::types::{CellFormatting, CellRange, Position};

/// Runs a fire-and-forget future on the host's executor
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Notifications queued for the host, drained with [`GridView::drain_events`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridEvent {
    #[serde(rename_all = "camelCase")]
    SelectionChanged { range: Option<CellRange> },
    #[serde(rename_all = "camelCase")]
    WriteSaved { position: Position, field: String },
    #[serde(rename_all = "camelCase")]
    WriteFailed { position: Position, message: String },
    /// The failed value was replaced by the pre-edit value
    #[serde(rename_all = "camelCase")]
    RolledBack { position: Position, value: String },
    #[serde(rename_all = "camelCase")]
    LoadFailed { message: String },
}

/// Outcome of a local mutation, keyed by the cell it touched
type Outcome = (Position, Result<PendingWrite>);

struct GridState {
    config: GridConfig,
    model: GridModel,
    viewport: Viewport,
    selection: SelectionController,
    resize: ResizeController,
    edit: EditController,
    search: SearchState,
    /// Set when a resize ends so the synthesized click is ignored
    swallow_click: bool,
    events: Vec<GridEvent>,
    listener: Option<Rc<dyn Fn()>>,
}

impl GridState {
    fn frame_source(&self) -> FrameSource<'_> {
        let resizing = match self.resize.state() {
            ResizeState::Resizing { axis, .. } => Some(axis),
            ResizeState::Idle => None,
        };
        FrameSource {
            model: &self.model,
            config: &self.config,
            selection: &self.selection,
            edit: &self.edit,
            search: &self.search,
            resizing,
        }
    }

    fn emit_selection(&mut self) {
        self.events.push(GridEvent::SelectionChanged {
            range: self.selection.range(),
        });
    }

    fn commit_edit(&mut self) -> Option<Outcome> {
        let pos = self.edit.session()?.position;
        let result = self.edit.commit(&mut self.model, &self.config)?;
        self.search.refresh(&self.model);
        Some((pos, result))
    }

    fn pointer_down(&mut self, target: PointerTarget, x: f32, y: f32) -> Vec<Outcome> {
        self.swallow_click = false;
        if self.resize.is_active() {
            return Vec::new();
        }
        let mut outcomes = Vec::new();
        match target {
            PointerTarget::ColumnResizeHandle { col } => {
                outcomes.extend(self.commit_edit());
                self.resize
                    .begin(ResizeAxis::Column, col, x, self.model.dimensions());
            }
            PointerTarget::RowResizeHandle { row } => {
                outcomes.extend(self.commit_edit());
                self.resize
                    .begin(ResizeAxis::Row, row, y, self.model.dimensions());
            }
            PointerTarget::Cell { row, col } => {
                let pos = Position::new(row, col);
                if self.edit.is_editing_at(pos) || !self.model.contains(pos) {
                    return outcomes;
                }
                outcomes.extend(self.commit_edit());
                let before = self.selection.range();
                self.selection.pointer_down(pos);
                if self.selection.range() != before {
                    self.emit_selection();
                }
            }
            PointerTarget::None => {}
        }
        outcomes
    }

    fn pointer_enter(&mut self, pos: Position) -> bool {
        if self.resize.is_active() || !self.model.contains(pos) {
            return false;
        }
        let changed = self.selection.pointer_enter(pos);
        if changed {
            self.emit_selection();
        }
        changed
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if let ResizeState::Resizing { axis, .. } = self.resize.state() {
            let coord = match axis {
                ResizeAxis::Column => x,
                ResizeAxis::Row => y,
            };
            return self.resize.drag(coord, self.model.dimensions_mut()).is_some();
        }
        if !self.selection.is_selecting() {
            return false;
        }
        match self
            .viewport
            .cell_at(x, y, self.model.dimensions(), &self.config)
        {
            Some(pos) => self.pointer_enter(pos),
            None => false,
        }
    }

    fn pointer_up(&mut self) {
        if self.resize.end() {
            self.swallow_click = true;
        }
        self.selection.pointer_up();
    }

    fn click(&mut self, pos: Position) -> Vec<Outcome> {
        if std::mem::take(&mut self.swallow_click) || self.resize.is_active() {
            return Vec::new();
        }
        if cell_kind(pos, &self.config) != CellKind::Status {
            return Vec::new();
        }
        let result = self
            .edit
            .set_accepted(pos, &mut self.model, &self.config);
        self.search.refresh(&self.model);
        vec![(pos, result)]
    }

    fn double_click(&mut self, pos: Position) -> Vec<Outcome> {
        if self.resize.is_active() {
            return Vec::new();
        }
        match cell_kind(pos, &self.config) {
            CellKind::Header => Vec::new(),
            CellKind::Status => {
                let result = self
                    .edit
                    .set_rejected(pos, &mut self.model, &self.config);
                self.search.refresh(&self.model);
                vec![(pos, result)]
            }
            CellKind::FreeText => {
                // An editor never coexists with a drag in progress
                self.selection.pointer_up();
                let prior = self.edit.session().map(|s| s.position);
                let committed = self.edit.begin(pos, &mut self.model, &self.config);
                self.search.refresh(&self.model);
                prior.zip(committed).into_iter().collect()
            }
        }
    }

    fn key_down(&mut self, key: &str) -> (bool, Vec<Outcome>) {
        let pos = self.edit.session().map(|s| s.position);
        match self.edit.key(EditKey::parse(key), &mut self.model, &self.config) {
            KeyOutcome::Ignored => (false, Vec::new()),
            KeyOutcome::DraftChanged | KeyOutcome::Cancelled => (true, Vec::new()),
            KeyOutcome::Committed(result) => {
                self.search.refresh(&self.model);
                (true, pos.map(|p| (p, result)).into_iter().collect())
            }
        }
    }

    /// Sort outcomes into writes to spawn and immediate failures
    fn settle(&mut self, outcomes: Vec<Outcome>) -> Vec<PendingWrite> {
        let mut writes = Vec::new();
        for (position, result) in outcomes {
            match result {
                Ok(pending) => writes.push(pending),
                Err(err) => {
                    warn!(row = position.row, col = position.col, error = %err, "write not attempted");
                    self.events.push(GridEvent::WriteFailed {
                        position,
                        message: err.to_string(),
                    });
                }
            }
        }
        writes
    }

    fn complete_write(&mut self, pending: PendingWrite, result: Result<()>) {
        let position = pending.position;
        match result {
            Ok(()) => {
                debug!(row = position.row, col = position.col, field = %pending.write.field, "write saved");
                self.events.push(GridEvent::WriteSaved {
                    position,
                    field: pending.write.field,
                });
            }
            Err(err) => {
                warn!(row = position.row, col = position.col, field = %pending.write.field, error = %err, "write failed");
                self.events.push(GridEvent::WriteFailed {
                    position,
                    message: err.to_string(),
                });
                if self.config.write_failure == WriteFailurePolicy::Revert
                    && self.model.cell_value(position) == Some(pending.local_value.as_str())
                    && self
                        .model
                        .set_cell_value(position, pending.previous.clone())
                        .is_ok()
                {
                    self.search.refresh(&self.model);
                    self.events.push(GridEvent::RolledBack {
                        position,
                        value: pending.previous,
                    });
                }
            }
        }
    }
}

/// Cloneable handle to one grid instance
#[derive(Clone)]
pub struct GridView {
    state: Rc<RefCell<GridState>>,
    gateway: Rc<dyn PersistenceGateway>,
    spawner: Spawner,
}

impl GridView {
    /// Create an empty view. The configuration is validated first.
    pub fn new(
        config: GridConfig,
        gateway: Rc<dyn PersistenceGateway>,
        spawner: Spawner,
    ) -> Result<Self> {
        let mut config = config;
        config.normalize();
        config.validate()?;
        let model = GridModel::new(config.default_col_width, config.default_row_height);
        let state = GridState {
            config,
            model,
            viewport: Viewport::new(),
            selection: SelectionController::new(),
            resize: ResizeController::new(),
            edit: EditController::new(),
            search: SearchState::new(),
            swallow_click: false,
            events: Vec::new(),
            listener: None,
        };
        Ok(Self {
            state: Rc::new(RefCell::new(state)),
            gateway,
            spawner,
        })
    }

    /// Fetch the register from the gateway and replace the matrix.
    ///
    /// On failure the grid shows only the field labels as a header row.
    pub async fn load(&self) -> Result<()> {
        let rows = self.gateway.load_rows().await;
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        let loaded = rows.and_then(|rows| s.model.load_initial(rows));
        s.selection.clear();
        s.edit.cancel();
        match loaded {
            Ok(()) => {
                info!(
                    rows = s.model.row_count(),
                    cols = s.model.col_count(),
                    "register loaded"
                );
                s.search.refresh(&s.model);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "register load failed");
                let header = s.config.fields.header_row();
                let fallback = if header.is_empty() { Vec::new() } else { vec![header] };
                // A single row cannot be ragged
                let _ = s.model.load_initial(fallback);
                s.search.refresh(&s.model);
                s.events.push(GridEvent::LoadFailed {
                    message: err.to_string(),
                });
                Err(match err {
                    load @ GridError::Load(_) => load,
                    other => GridError::Load(other.to_string()),
                })
            }
        }
    }

    /// Called after asynchronous completions change state
    pub fn set_listener(&self, listener: Option<Rc<dyn Fn()>>) {
        self.state.borrow_mut().listener = listener;
    }

    pub fn set_viewport_size(&self, width: f32, height: f32) {
        let mut s = self.state.borrow_mut();
        s.viewport.resize(width, height);
        let GridState {
            viewport,
            model,
            config,
            ..
        } = &mut *s;
        viewport.clamp_scroll(model.dimensions(), config);
    }

    pub fn set_scroll(&self, x: f32, y: f32) {
        let mut s = self.state.borrow_mut();
        let GridState {
            viewport,
            model,
            config,
            ..
        } = &mut *s;
        viewport.set_scroll(x, y, model.dimensions(), config);
    }

    pub fn hit_test(&self, x: f32, y: f32) -> PointerTarget {
        let s = self.state.borrow();
        s.viewport.hit_test(x, y, s.model.dimensions(), &s.config)
    }

    pub fn pointer_down(&self, target: PointerTarget, x: f32, y: f32) {
        let outcomes = self.state.borrow_mut().pointer_down(target, x, y);
        self.dispatch(outcomes);
    }

    /// Hit-test a screen point, then treat it as a pointer-down
    pub fn pointer_down_at(&self, x: f32, y: f32) -> PointerTarget {
        let target = self.hit_test(x, y);
        self.pointer_down(target, x, y);
        target
    }

    pub fn pointer_enter(&self, pos: Position) -> bool {
        self.state.borrow_mut().pointer_enter(pos)
    }

    /// Global pointer move. Drives an active resize, otherwise extends a drag selection.
    pub fn pointer_move(&self, x: f32, y: f32) -> bool {
        self.state.borrow_mut().pointer_move(x, y)
    }

    /// Global pointer up
    pub fn pointer_up(&self) {
        self.state.borrow_mut().pointer_up();
    }

    /// Single click. Sets status cells to accepted.
    pub fn click(&self, pos: Position) {
        let outcomes = self.state.borrow_mut().click(pos);
        self.dispatch(outcomes);
    }

    /// Double click. Opens the editor on free-text cells, sets status cells to rejected.
    pub fn double_click(&self, pos: Position) {
        let outcomes = self.state.borrow_mut().double_click(pos);
        self.dispatch(outcomes);
    }

    /// Returns true when the key was consumed by the editor
    pub fn key_down(&self, key: &str) -> bool {
        let (handled, outcomes) = self.state.borrow_mut().key_down(key);
        self.dispatch(outcomes);
        handled
    }

    pub fn set_draft(&self, value: &str) -> bool {
        self.state.borrow_mut().edit.set_draft(value)
    }

    /// Editor lost focus: commit
    pub fn blur(&self) {
        let outcome = self.state.borrow_mut().commit_edit();
        self.dispatch(outcome.into_iter().collect());
    }

    pub fn cancel_edit(&self) -> Option<EditSession> {
        self.state.borrow_mut().edit.cancel()
    }

    pub fn set_accepted(&self, pos: Position) -> Result<()> {
        self.set_status(pos, StatusCode::Accepted)
    }

    pub fn set_rejected(&self, pos: Position) -> Result<()> {
        self.set_status(pos, StatusCode::Rejected)
    }

    fn set_status(&self, pos: Position, code: StatusCode) -> Result<()> {
        let result = {
            let mut guard = self.state.borrow_mut();
            let s = &mut *guard;
            let result = match code {
                StatusCode::Accepted => s.edit.set_accepted(pos, &mut s.model, &s.config),
                StatusCode::Rejected => s.edit.set_rejected(pos, &mut s.model, &s.config),
            };
            s.search.refresh(&s.model);
            result
        };
        match result {
            Err(
                err @ (GridError::HeaderRow(_)
                | GridError::NotStatusColumn(_)
                | GridError::OutOfBounds(_)),
            ) => Err(err),
            other => {
                self.dispatch(vec![(pos, other)]);
                Ok(())
            }
        }
    }

    /// Merge `patch` into every selected cell. Returns how many cells changed.
    pub fn apply_formatting_to_selection(&self, patch: &CellFormatting) -> usize {
        let mut s = self.state.borrow_mut();
        let positions = s.selection.positions();
        let applied = s.model.apply_formatting(&positions, patch);
        debug!(cells = applied, "formatting applied");
        applied
    }

    pub fn set_search_term(&self, term: &str) -> Option<Position> {
        let mut s = self.state.borrow_mut();
        let GridState { search, model, .. } = &mut *s;
        search.set_term(term, model);
        search.current()
    }

    pub fn search_next(&self) -> Option<Position> {
        self.state.borrow_mut().search.next()
    }

    pub fn search_prev(&self) -> Option<Position> {
        self.state.borrow_mut().search.previous()
    }

    pub fn render(&self) -> RenderFrame {
        build_frame(&self.state.borrow().frame_source())
    }

    /// One cell as `render` would draw it, without building the whole frame
    pub fn render_cell(&self, pos: Position) -> Option<RenderCell> {
        build_cell(&self.state.borrow().frame_source(), pos)
    }

    pub fn drain_events(&self) -> Vec<GridEvent> {
        std::mem::take(&mut self.state.borrow_mut().events)
    }

    /// The selected rectangle as TSV, for clipboard copy
    pub fn selection_text(&self) -> Option<String> {
        let s = self.state.borrow();
        let range = s.selection.range()?;
        Some(clipboard::range_to_tsv(&s.model, range))
    }

    pub fn selection_range(&self) -> Option<CellRange> {
        self.state.borrow().selection.range()
    }

    pub fn selected_positions(&self) -> Vec<Position> {
        self.state.borrow().selection.positions()
    }

    pub fn edit_session(&self) -> Option<EditSession> {
        self.state.borrow().edit.session().cloned()
    }

    pub fn is_resizing(&self) -> bool {
        self.state.borrow().resize.is_active()
    }

    pub fn search_current(&self) -> Option<Position> {
        self.state.borrow().search.current()
    }

    pub fn search_matches(&self) -> Vec<Position> {
        self.state.borrow().search.matches().to_vec()
    }

    pub fn cell_value(&self, pos: Position) -> Option<String> {
        self.state.borrow().model.cell_value(pos).map(str::to_string)
    }

    pub fn cell_formatting(&self, pos: Position) -> Option<CellFormatting> {
        self.state
            .borrow()
            .model
            .get_cell(pos)
            .and_then(|c| c.formatting.clone())
    }

    pub fn row_count(&self) -> usize {
        self.state.borrow().model.row_count()
    }

    pub fn col_count(&self) -> usize {
        self.state.borrow().model.col_count()
    }

    pub fn col_width(&self, col: u32) -> Option<f32> {
        self.state.borrow().model.dimensions().col_width(col)
    }

    pub fn row_height(&self, row: u32) -> Option<f32> {
        self.state.borrow().model.dimensions().row_height(row)
    }

    pub fn config(&self) -> GridConfig {
        self.state.borrow().config.clone()
    }

    /// Spawn gateway writes for successful outcomes. Must be called with no
    /// borrow of the state held.
    fn dispatch(&self, outcomes: Vec<Outcome>) {
        if outcomes.is_empty() {
            return;
        }
        let writes = self.state.borrow_mut().settle(outcomes);
        for pending in writes {
            debug!(
                row = pending.position.row,
                col = pending.position.col,
                field = %pending.write.field,
                "write dispatched"
            );
            let request = self.gateway.write_cell(pending.write.clone());
            let weak: Weak<RefCell<GridState>> = Rc::downgrade(&self.state);
            (self.spawner)(Box::pin(async move {
                let result = request.await;
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let listener = {
                    let mut s = state.borrow_mut();
                    s.complete_write(pending, result);
                    s.listener.clone()
                };
                if let Some(listener) = listener {
                    listener();
                }
            }));
        }
    }
}
