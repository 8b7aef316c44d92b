//! Backend contract for loading the register and writing single cells.
//!
//! The backend itself lives outside this crate. Writes are fire-and-forget
//! from the grid's point of view: the view hands the returned future to its
//! spawner and only observes the outcome through notifications.

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Cell;

/// Static column index to storage field name table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTable(Vec<String>);

impl FieldTable {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// Storage field for a column, if mapped. Empty names count as unmapped.
    pub fn field(&self, col: u32) -> Option<&str> {
        self.0
            .get(col as usize)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A header row labelled with the field names, used as the empty state
    pub fn header_row(&self) -> Vec<Cell> {
        self.0.iter().map(|name| Cell::new(name.as_str())).collect()
    }
}

/// Value persisted for status-toggle cells (never the glyph shown in the UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    Accepted,
    Rejected,
}

impl StatusCode {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::Accepted => "accepted",
            StatusCode::Rejected => "rejected",
        }
    }
}

/// A single-cell write keyed by row identity and storage field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellWrite {
    /// Stable key read from the row's identity column
    pub row_key: String,
    /// Grid column the write originated from
    pub column: u32,
    /// Storage field the column maps to
    pub field: String,
    pub value: String,
}

/// The backend-as-a-service seam.
///
/// Both futures are `'static` so implementations must clone whatever
/// handles they need before returning.
pub trait PersistenceGateway {
    /// Full row-major matrix including the header row
    fn load_rows(&self) -> LocalBoxFuture<'static, Result<Vec<Vec<Cell>>>>;

    /// Persist one cell
    fn write_cell(&self, write: CellWrite) -> LocalBoxFuture<'static, Result<()>>;
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
    fn field_lookup() {
        let table = FieldTable::new(["uhid", "", "ward"]);
        assert_eq!(table.field(0), Some("uhid"));
        assert_eq!(table.field(1), None);
        assert_eq!(table.field(2), Some("ward"));
        assert_eq!(table.field(9), None);
    }

    #[test]
    fn status_code_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&StatusCode::Rejected).unwrap(),
            "\"rejected\""
        );
        assert_eq!(StatusCode::Accepted.as_str(), "accepted");
    }

    #[test]
    fn header_row_from_fields() {
        let table = FieldTable::new(["uhid", "name"]);
        let header = table.header_row();
        assert_eq!(header.len(), 2);
        assert_eq!(header[1].value, "name");
    }
}
