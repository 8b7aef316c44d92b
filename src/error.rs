//! Structured error types for ipdgrid.

use crate::types::Position;

/// All errors that can occur while loading, editing or persisting the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The gateway failed to deliver the initial matrix.
    #[error("Load failed: {0}")]
    Load(String),

    /// The gateway rejected a cell write.
    #[error("Write failed: {0}")]
    Write(String),

    /// Rows of differing length were supplied to the model.
    #[error("Ragged matrix: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A position outside the current matrix.
    #[error("Position ({}, {}) is outside the grid", .0.row, .0.col)]
    OutOfBounds(Position),

    /// Writes to pinned header rows are never attempted.
    #[error("Row {0} is a header row and cannot be written")]
    HeaderRow(u32),

    /// The identity column of the row is empty.
    #[error("Row {0} has no identity key")]
    MissingRowKey(u32),

    /// No storage field is mapped to the column.
    #[error("Column {0} has no storage field")]
    UnmappedColumn(u32),

    #[error("Column {0} is not a status column")]
    NotStatusColumn(u32),

    /// Invalid grid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
