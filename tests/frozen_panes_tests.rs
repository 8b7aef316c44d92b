//! Pinned column groups and header rows: offsets, hit testing and frames.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{pos, row, Harness, DISCHARGE, DOCTOR, LAB, NAME, PHARMACY, REMARKS, UHID};
use ipdgrid::layout::{PointerTarget, StickyOffsets};
use ipdgrid::GridConfig;

fn small_grid() -> Harness {
    let config = GridConfig {
        leading_pinned: vec![0, 1],
        trailing_pinned: Vec::new(),
        pinned_header_rows: vec![0],
        status_columns: Vec::new(),
        ..GridConfig::default()
    };
    Harness::with(
        config,
        vec![
            row(&["A", "B", "C"]),
            row(&["1", "2", "3"]),
            row(&["4", "5", "6"]),
        ],
    )
}

#[test]
fn widening_first_pinned_column_shifts_the_second() {
    let h = small_grid();
    let before = h.view.render().cell(pos(1, 1)).unwrap().sticky.left.unwrap();
    assert_eq!(before, 48.0 + 128.0);

    h.view
        .pointer_down(PointerTarget::ColumnResizeHandle { col: 0 }, 176.0, 10.0);
    h.view.pointer_move(248.0, 10.0);
    h.view.pointer_up();

    assert_eq!(h.view.col_width(0), Some(200.0));
    let after = h.view.render().cell(pos(1, 1)).unwrap().sticky.left.unwrap();
    assert_eq!(after - before, 72.0);
    // Unpinned columns carry no horizontal inset
    assert_eq!(h.view.render().cell(pos(1, 2)).unwrap().sticky, StickyOffsets::default());
}

#[test]
fn trailing_offsets_sum_columns_to_the_right() {
    let h = Harness::new();
    let frame = h.view.render();
    let right = |col| frame.cell(pos(2, col)).unwrap().sticky.right;
    assert_eq!(right(DISCHARGE), Some(0.0));
    assert_eq!(right(LAB), Some(128.0));
    assert_eq!(right(PHARMACY), Some(256.0));
    assert_eq!(right(REMARKS), None);
}

#[test]
fn trailing_offsets_follow_resize() {
    let h = Harness::new();
    h.view
        .pointer_down(PointerTarget::ColumnResizeHandle { col: DISCHARGE }, 1000.0, 10.0);
    h.view.pointer_move(972.0, 10.0);
    h.view.pointer_up();
    let frame = h.view.render();
    assert_eq!(frame.cell(pos(1, LAB)).unwrap().sticky.right, Some(100.0));
    assert_eq!(frame.cell(pos(1, PHARMACY)).unwrap().sticky.right, Some(228.0));
}

#[test]
fn header_cells_pin_top_and_corner() {
    let h = Harness::new();
    let frame = h.view.render();
    assert_eq!(frame.rows[0].sticky_top, Some(0.0));
    assert!(frame.rows[0].is_header);
    assert_eq!(frame.rows[1].sticky_top, None);

    let corner = frame.cell(pos(0, UHID)).unwrap();
    assert_eq!(corner.sticky.left, Some(48.0));
    assert_eq!(corner.sticky.top, Some(0.0));
    assert!(corner
        .style
        .iter()
        .any(|d| d.property == "z-index" && d.value == "3"));

    let body = frame.cell(pos(3, REMARKS)).unwrap();
    assert!(!body.sticky.is_pinned());
    assert!(body.style.is_empty());
}

#[test]
fn hit_testing_prefers_pinned_columns() {
    let h = Harness::new();
    // Content is 48 + 8 * 128 = 1072 wide
    h.view.set_viewport_size(800.0, 100.0);
    h.view.set_scroll(200.0, 40.0);

    // Column 2 scrolls under the leading group
    assert_eq!(h.view.hit_test(110.0, 50.0), PointerTarget::Cell { row: 2, col: UHID });
    assert_eq!(h.view.hit_test(200.0, 50.0), PointerTarget::Cell { row: 2, col: NAME });
    // Remarks scrolls under the trailing group
    assert_eq!(
        h.view.hit_test(450.0, 50.0),
        PointerTarget::Cell { row: 2, col: PHARMACY }
    );
    // Between the groups the scrolled column is hit
    assert_eq!(
        h.view.hit_test(340.0, 50.0),
        PointerTarget::Cell { row: 2, col: DOCTOR }
    );
    // The header row stays at the top while scrolled
    assert_eq!(h.view.hit_test(380.0, 10.0), PointerTarget::Cell { row: 0, col: REMARKS });
}

#[test]
fn scroll_is_clamped_to_content() {
    let h = Harness::new();
    h.view.set_viewport_size(800.0, 100.0);
    h.view.set_scroll(5000.0, 5000.0);
    // max x = 1072 - 800, max y = 160 - 100
    assert_eq!(h.view.hit_test(799.0, 99.0), PointerTarget::Cell { row: 4, col: DISCHARGE });
    h.view.set_scroll(-10.0, -10.0);
    assert_eq!(h.view.hit_test(60.0, 40.0), PointerTarget::Cell { row: 1, col: UHID });
}
