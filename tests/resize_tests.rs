//! Column and row resizing, minimum clamps and dispatcher priority.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{pos, Harness, DISCHARGE, NAME, REMARKS};
use ipdgrid::config::{MIN_COL_WIDTH, MIN_ROW_HEIGHT};
use ipdgrid::layout::PointerTarget;
use test_case::test_case;

#[test_case(&[40.0, -500.0, 12.0]; "shrink past minimum")]
#[test_case(&[300.0, -1000.0, 1000.0, -77.0]; "oscillating")]
#[test_case(&[f32::NAN, 5.0]; "nan coordinate")]
fn widths_and_heights_never_drop_below_minimum(deltas: &[f32]) {
    let h = Harness::new();
    for (i, delta) in deltas.iter().enumerate() {
        let col = u32::try_from(i % 4).unwrap();
        h.view
            .pointer_down(PointerTarget::ColumnResizeHandle { col }, 500.0, 0.0);
        h.view.pointer_move(500.0 + delta, 0.0);
        h.view.pointer_up();

        let row = u32::try_from(i % 3).unwrap() + 1;
        h.view
            .pointer_down(PointerTarget::RowResizeHandle { row }, 0.0, 300.0);
        h.view.pointer_move(0.0, 300.0 + delta);
        h.view.pointer_up();
    }
    let frame = h.view.render();
    assert!(frame.col_widths.iter().all(|w| *w >= MIN_COL_WIDTH));
    assert!(frame.row_heights.iter().all(|h| *h >= MIN_ROW_HEIGHT));
}

#[test]
fn resizing_one_column_leaves_others() {
    let h = Harness::new();
    h.view
        .pointer_down(PointerTarget::ColumnResizeHandle { col: REMARKS }, 700.0, 10.0);
    h.view.pointer_move(760.0, 10.0);
    h.view.pointer_move(790.0, 40.0);
    h.view.pointer_up();
    assert_eq!(h.view.col_width(REMARKS), Some(128.0 + 90.0));
    for col in (0..8).filter(|c| *c != REMARKS) {
        assert_eq!(h.view.col_width(col), Some(128.0));
    }
}

#[test]
fn row_resize_uses_vertical_axis() {
    let h = Harness::new();
    h.view
        .pointer_down(PointerTarget::RowResizeHandle { row: 2 }, 10.0, 96.0);
    h.view.pointer_move(400.0, 120.0);
    h.view.pointer_up();
    assert_eq!(h.view.row_height(2), Some(56.0));
    assert_eq!(h.view.row_height(1), Some(32.0));
}

#[test]
fn resize_suppresses_selection() {
    let h = Harness::new();
    h.view
        .pointer_down(PointerTarget::ColumnResizeHandle { col: NAME }, 300.0, 10.0);
    assert!(h.view.is_resizing());
    // A cell under the pointer mid-drag must not start or extend a selection
    h.view.pointer_down(PointerTarget::Cell { row: 2, col: 2 }, 320.0, 80.0);
    assert!(!h.view.pointer_enter(pos(3, 3)));
    h.view.pointer_move(320.0, 80.0);
    h.view.pointer_up();
    assert_eq!(h.view.selection_range(), None);
    assert_eq!(h.view.col_width(NAME), Some(148.0));
}

#[test]
fn click_after_resize_is_swallowed() {
    let mut h = Harness::new();
    h.view
        .pointer_down(PointerTarget::ColumnResizeHandle { col: DISCHARGE }, 900.0, 10.0);
    h.view.pointer_move(880.0, 10.0);
    h.view.pointer_up();
    // The browser follows pointerup with a click on the cell under the pointer
    h.view.click(pos(1, DISCHARGE));
    h.settle();
    assert_eq!(h.value(1, DISCHARGE), "");
    assert!(h.gateway.writes().is_empty());

    // Only the first click is swallowed
    h.view.click(pos(1, DISCHARGE));
    h.settle();
    assert_eq!(h.value(1, DISCHARGE), "\u{2713}");
}

#[test]
fn resize_commits_open_edit() {
    let mut h = Harness::new();
    h.view.double_click(pos(1, REMARKS));
    h.view.set_draft("Card");
    h.view
        .pointer_down(PointerTarget::ColumnResizeHandle { col: REMARKS }, 700.0, 10.0);
    h.view.pointer_up();
    h.settle();
    assert!(h.view.edit_session().is_none());
    assert_eq!(h.value(1, REMARKS), "Card");
    assert_eq!(h.gateway.writes().len(), 1);
}

#[test]
fn handles_found_by_hit_test() {
    let h = Harness::new();
    h.view.set_viewport_size(2000.0, 600.0);
    // Right edge of column 1 in the header row: 48 + 2 * 128
    assert_eq!(
        h.view.hit_test(48.0 + 256.0 - 1.0, 16.0),
        PointerTarget::ColumnResizeHandle { col: 1 }
    );
    // Bottom edge of row 1 in the gutter
    assert_eq!(
        h.view.hit_test(20.0, 64.0 - 1.0),
        PointerTarget::RowResizeHandle { row: 1 }
    );
}
