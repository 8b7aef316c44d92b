//! ipdgrid - interactive data grid for the IPD patient register
//!
//! A spreadsheet-style grid engine compiled to WebAssembly:
//! - Drag-to-select rectangular ranges
//! - Resizable rows and columns
//! - Pinned leading/trailing column groups and header rows
//! - Inline editing with commit/cancel and accepted/rejected status columns
//! - Case-insensitive search with highlighting
//!
//! Natively it builds as a plain library so every controller can be driven
//! headlessly.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { IpdGrid } from 'ipdgrid';
//! await init();
//! const grid = new IpdGrid(config, () => api.loadRows(), (w) => api.writeCell(w));
//! await grid.load();
//! const frame = grid.renderFrame();
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod layout;
pub mod persistence;
pub mod render;
pub mod search;
pub mod types;
pub mod view;

use wasm_bindgen::prelude::*;

pub use config::{GridConfig, StatusMarkers, WriteFailurePolicy};
pub use error::{GridError, Result};
pub use grid::{Dimensions, GridModel};
pub use persistence::{CellWrite, FieldTable, PersistenceGateway, StatusCode};
pub use types::*;
pub use view::{GridEvent, GridView, Spawner};

#[cfg(target_arch = "wasm32")]
pub use view::wasm::IpdGrid;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
