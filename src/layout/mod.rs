//! Layout: sticky offsets for pinned panes and viewport hit testing.
//!
//! - `frozen` computes the CSS-sticky insets of pinned columns and header rows
//! - `viewport` maps between screen points and cells, including resize handles

pub mod frozen;
mod viewport;

pub use frozen::{header_height, header_top, leading_left, sticky, trailing_right, StickyOffsets};
pub use viewport::{PointerTarget, Viewport, RESIZE_HANDLE_SIZE};
