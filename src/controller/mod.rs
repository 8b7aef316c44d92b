//! Interaction state machines.
//!
//! Each controller is independent and synchronous. Mutual exclusion between
//! them is enforced by the view's dispatcher, which consults them in the
//! order resize, edit, selection.

pub mod edit;
pub mod resize;
pub mod selection;

pub use edit::{
    address_write, cell_kind, CellKind, EditController, EditKey, EditSession, KeyOutcome,
    PendingWrite,
};
pub use resize::{ResizeAxis, ResizeController, ResizeState};
pub use selection::{SelectionController, SelectionPhase};
