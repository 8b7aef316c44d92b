//! Grid configuration: pinned groups, status columns, storage field table.
//!
//! Everything here is static for the life of a view. Pinned and status
//! columns are never derived from data.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::persistence::FieldTable;

/// Minimum column width in pixels
pub const MIN_COL_WIDTH: f32 = 50.0;

/// Minimum row height in pixels
pub const MIN_ROW_HEIGHT: f32 = 20.0;

/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: f32 = 128.0;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 32.0;

/// Default width of the row-number gutter in pixels
pub const DEFAULT_GUTTER_WIDTH: f32 = 48.0;

/// Glyphs shown in status-toggle cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusMarkers {
    pub accepted: String,
    pub rejected: String,
}

impl Default for StatusMarkers {
    fn default() -> Self {
        Self {
            accepted: "\u{2713}".to_string(),
            rejected: "\u{2717}".to_string(),
        }
    }
}

/// What happens to the local value when a gateway write fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteFailurePolicy {
    /// Keep the optimistic local edit and notify
    #[default]
    Retain,
    /// Restore the pre-edit value (if untouched since) and notify
    Revert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Columns pinned to the left edge
    pub leading_pinned: Vec<u32>,
    /// Columns pinned to the right edge
    pub trailing_pinned: Vec<u32>,
    /// Header rows pinned to the top edge; also read-only
    pub pinned_header_rows: Vec<u32>,
    /// Columns whose cells are set by click / double-click
    pub status_columns: Vec<u32>,
    /// Column holding each row's stable storage key
    pub identity_column: u32,
    /// Column index to storage field name
    pub fields: FieldTable,
    pub gutter_width: f32,
    pub default_col_width: f32,
    pub default_row_height: f32,
    pub markers: StatusMarkers,
    pub write_failure: WriteFailurePolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            leading_pinned: vec![0, 1],
            trailing_pinned: (38..=42).collect(),
            pinned_header_rows: vec![0],
            status_columns: (38..=42).collect(),
            identity_column: 0,
            fields: FieldTable::default(),
            gutter_width: DEFAULT_GUTTER_WIDTH,
            default_col_width: DEFAULT_COL_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            markers: StatusMarkers::default(),
            write_failure: WriteFailurePolicy::Retain,
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: GridConfig = serde_json::from_str(json)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Sort and dedup the index sets so offset math can walk them in order
    pub fn normalize(&mut self) {
        for set in [
            &mut self.leading_pinned,
            &mut self.trailing_pinned,
            &mut self.pinned_header_rows,
            &mut self.status_columns,
        ] {
            set.sort_unstable();
            set.dedup();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(col) = self
            .leading_pinned
            .iter()
            .find(|c| self.trailing_pinned.contains(c))
        {
            return Err(GridError::Config(format!(
                "column {col} is pinned both leading and trailing"
            )));
        }
        if self.status_columns.contains(&self.identity_column) {
            return Err(GridError::Config(format!(
                "identity column {} cannot be a status column",
                self.identity_column
            )));
        }
        if self.default_col_width.is_nan() || self.default_col_width < MIN_COL_WIDTH {
            return Err(GridError::Config(format!(
                "default column width must be at least {MIN_COL_WIDTH}"
            )));
        }
        if self.default_row_height.is_nan() || self.default_row_height < MIN_ROW_HEIGHT {
            return Err(GridError::Config(format!(
                "default row height must be at least {MIN_ROW_HEIGHT}"
            )));
        }
        if self.gutter_width.is_nan() || self.gutter_width < 0.0 {
            return Err(GridError::Config("gutter width must not be negative".into()));
        }
        Ok(())
    }

    pub fn is_status_column(&self, col: u32) -> bool {
        self.status_columns.contains(&col)
    }

    pub fn is_header_row(&self, row: u32) -> bool {
        self.pinned_header_rows.contains(&row)
    }

    pub fn is_leading_pinned(&self, col: u32) -> bool {
        self.leading_pinned.contains(&col)
    }

    pub fn is_trailing_pinned(&self, col: u32) -> bool {
        self.trailing_pinned.contains(&col)
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
    fn defaults_are_valid() {
        let config = GridConfig::default();
        config.validate().unwrap();
        assert!(config.is_leading_pinned(1));
        assert!(config.is_trailing_pinned(40));
        assert!(config.is_status_column(42));
        assert!(config.is_header_row(0));
        assert!(!config.is_header_row(1));
    }

    #[test]
    fn predicates_hold_for_unsorted_lists() {
        let config = GridConfig {
            status_columns: vec![42, 38],
            leading_pinned: vec![1, 0],
            trailing_pinned: vec![40, 39],
            pinned_header_rows: vec![2, 0],
            ..GridConfig::default()
        };
        assert!(config.is_status_column(42));
        assert!(config.is_status_column(38));
        assert!(config.is_leading_pinned(0));
        assert!(config.is_trailing_pinned(40));
        assert!(config.is_header_row(2));
        assert!(!config.is_header_row(1));
    }

    #[test]
    fn from_json_partial_keeps_defaults() {
        let config = GridConfig::from_json(
            r#"{"leadingPinned":[1,0,1],"fields":["uhid","name"],"writeFailure":"revert"}"#,
        )
        .unwrap();
        assert_eq!(config.leading_pinned, vec![0, 1]);
        assert_eq!(config.write_failure, WriteFailurePolicy::Revert);
        assert_eq!(config.default_col_width, DEFAULT_COL_WIDTH);
        assert_eq!(config.fields.field(1), Some("name"));
    }

    #[test]
    fn overlapping_pinned_groups_rejected() {
        let err = GridConfig::from_json(r#"{"leadingPinned":[0,5],"trailingPinned":[5]}"#)
            .unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn undersized_defaults_rejected() {
        let err = GridConfig::from_json(r#"{"defaultColWidth":10}"#).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = GridConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, GridError::Json(_)));
    }
}
