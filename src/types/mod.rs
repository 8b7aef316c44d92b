//! Data types for the register grid.

mod cell;
mod position;

pub use cell::*;
pub use position::*;
