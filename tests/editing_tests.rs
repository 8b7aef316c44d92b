//! Inline editing, status columns and the writes they produce.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{pos, Harness, DISCHARGE, DOCTOR, LAB, NAME, PHARMACY, REMARKS, UHID, WARD};
use ipdgrid::{CellWrite, GridError, GridEvent};
use test_case::test_case;

#[test]
fn enter_commits_and_writes_once() {
    let mut h = Harness::new();
    h.edit(1, REMARKS, "Insurance");
    h.settle();
    assert_eq!(h.value(1, REMARKS), "Insurance");
    assert!(h.view.edit_session().is_none());
    assert_eq!(
        h.gateway.writes(),
        vec![CellWrite {
            row_key: "IPD-001".into(),
            column: REMARKS,
            field: "remarks".into(),
            value: "Insurance".into(),
        }]
    );
    assert!(h.events().contains(&GridEvent::WriteSaved {
        position: pos(1, REMARKS),
        field: "remarks".into(),
    }));
}

#[test]
fn editing_uhid_writes_to_the_original_row() {
    let mut h = Harness::new();
    h.edit(1, UHID, "IPD-999");
    h.settle();
    assert_eq!(h.value(1, UHID), "IPD-999");
    assert_eq!(
        h.gateway.writes(),
        vec![CellWrite {
            row_key: "IPD-001".into(),
            column: UHID,
            field: "uhid".into(),
            value: "IPD-999".into(),
        }]
    );

    // Later edits on the row follow the new key
    h.edit(1, WARD, "ICU");
    h.settle();
    assert_eq!(h.gateway.writes()[1].row_key, "IPD-999");
}

#[test]
fn typed_keys_build_the_draft() {
    let mut h = Harness::new();
    h.view.double_click(pos(2, WARD));
    for key in ["Backspace", "Backspace", "Backspace", "C", "C", "U", "Shift"] {
        h.view.key_down(key);
    }
    assert_eq!(h.view.edit_session().unwrap().draft, "CCU");
    // The model only changes on commit
    assert_eq!(h.value(2, WARD), "ICU");
    h.view.key_down("Enter");
    h.settle();
    assert_eq!(h.value(2, WARD), "CCU");
}

#[test]
fn escape_discards_the_draft() {
    let mut h = Harness::new();
    h.view.double_click(pos(1, DOCTOR));
    h.view.set_draft("Dr. Nobody");
    assert!(h.view.key_down("Escape"));
    h.settle();
    assert_eq!(h.value(1, DOCTOR), "Dr. Rao");
    assert!(h.view.edit_session().is_none());
    assert!(h.gateway.writes().is_empty());
}

#[test]
fn keys_without_session_are_not_consumed() {
    let h = Harness::new();
    assert!(!h.view.key_down("Enter"));
    assert!(!h.view.key_down("a"));
}

#[test]
fn editing_a_second_cell_commits_the_first() {
    let mut h = Harness::new();
    h.view.double_click(pos(1, WARD));
    h.view.set_draft("Surgical");
    h.view.double_click(pos(3, WARD));
    h.settle();

    assert_eq!(h.value(1, WARD), "Surgical");
    let session = h.view.edit_session().unwrap();
    assert_eq!(session.position, pos(3, WARD));
    assert_eq!(session.original, "Maternity");
    let writes = h.gateway.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].row_key, "IPD-001");
}

#[test]
fn double_click_on_open_editor_keeps_draft() {
    let h = Harness::new();
    h.view.double_click(pos(1, NAME));
    h.view.set_draft("Anita S.");
    h.view.double_click(pos(1, NAME));
    assert_eq!(h.view.edit_session().unwrap().draft, "Anita S.");
    assert!(h.gateway.writes().is_empty());
}

#[test]
fn blur_commits() {
    let mut h = Harness::new();
    h.view.double_click(pos(3, REMARKS));
    h.view.set_draft("Bank transfer");
    h.view.blur();
    h.settle();
    assert_eq!(h.value(3, REMARKS), "Bank transfer");
    assert_eq!(h.gateway.writes().len(), 1);
}

#[test]
fn selecting_another_cell_commits() {
    let mut h = Harness::new();
    h.view.double_click(pos(2, DOCTOR));
    h.view.set_draft("Dr. Bose");
    h.view
        .pointer_down(ipdgrid::layout::PointerTarget::Cell { row: 3, col: 1 }, 0.0, 0.0);
    h.view.pointer_up();
    h.settle();
    assert_eq!(h.value(2, DOCTOR), "Dr. Bose");
    assert!(h.view.edit_session().is_none());
}

#[test]
fn unchanged_commit_still_writes() {
    let mut h = Harness::new();
    h.view.double_click(pos(1, WARD));
    h.view.key_down("Enter");
    h.settle();
    assert_eq!(h.gateway.writes().len(), 1);
    assert_eq!(h.gateway.writes()[0].value, "General");
}

#[test_case(UHID; "identity")]
#[test_case(REMARKS; "free text")]
#[test_case(PHARMACY; "status")]
fn header_row_is_read_only(col: u32) {
    let mut h = Harness::new();
    let before = h.value(0, col);
    h.view.double_click(pos(0, col));
    h.view.click(pos(0, col));
    assert!(h.view.edit_session().is_none());
    h.settle();
    assert_eq!(h.value(0, col), before);
    assert!(h.gateway.writes().is_empty());
}

#[test]
fn status_columns_never_open_editor() {
    let h = Harness::new();
    h.view.double_click(pos(1, LAB));
    assert!(h.view.edit_session().is_none());
}

#[test_case("", "\u{2713}"; "from empty")]
#[test_case("\u{2717}", "\u{2713}"; "from rejected")]
#[test_case("\u{2713}", "\u{2713}"; "from accepted")]
fn click_sets_accepted_regardless_of_prior(prior: &str, shown: &str) {
    let mut h = Harness::new();
    if !prior.is_empty() {
        h.view.set_rejected(pos(1, PHARMACY)).unwrap();
        if prior == "\u{2713}" {
            h.view.set_accepted(pos(1, PHARMACY)).unwrap();
        }
    }
    h.settle();
    assert_eq!(h.value(1, PHARMACY), prior);

    h.view.click(pos(1, PHARMACY));
    h.settle();
    assert_eq!(h.value(1, PHARMACY), shown);
    let last = h.gateway.writes().pop().unwrap();
    assert_eq!(last.value, "accepted");
    assert_eq!(last.field, "pharmacy_status");
}

#[test]
fn double_click_sets_rejected() {
    let mut h = Harness::new();
    h.view.click(pos(2, DISCHARGE));
    h.view.double_click(pos(2, DISCHARGE));
    h.settle();
    assert_eq!(h.value(2, DISCHARGE), "\u{2717}");
    let values: Vec<String> = h.gateway.writes().into_iter().map(|w| w.value).collect();
    assert_eq!(values, ["accepted", "rejected"]);
    assert!(h.gateway.writes().iter().all(|w| w.row_key == "IPD-002"));
}

#[test]
fn status_setters_send_their_own_code() {
    let mut h = Harness::new();
    h.view.set_accepted(pos(3, LAB)).unwrap();
    h.settle();
    assert_eq!(h.value(3, LAB), "\u{2713}");
    h.view.set_rejected(pos(3, LAB)).unwrap();
    h.settle();
    assert_eq!(h.value(3, LAB), "\u{2717}");

    let sent: Vec<(String, String)> = h
        .gateway
        .writes()
        .into_iter()
        .map(|w| (w.field, w.value))
        .collect();
    assert_eq!(
        sent,
        [
            ("lab_status".to_string(), "accepted".to_string()),
            ("lab_status".to_string(), "rejected".to_string()),
        ]
    );
}

#[test]
fn status_refusals_are_errors() {
    let h = Harness::new();
    assert!(matches!(
        h.view.set_accepted(pos(0, LAB)),
        Err(GridError::HeaderRow(0))
    ));
    assert!(matches!(
        h.view.set_rejected(pos(1, WARD)),
        Err(GridError::NotStatusColumn(c)) if c == WARD
    ));
    assert!(matches!(
        h.view.set_accepted(pos(40, LAB)),
        Err(GridError::OutOfBounds(_))
    ));
    assert!(h.gateway.writes().is_empty());
}

#[test]
fn missing_row_key_keeps_local_value_without_write() {
    let mut h = Harness::new();
    h.events();
    h.view.click(pos(4, LAB));
    h.edit(4, REMARKS, "Referred");
    h.settle();

    assert_eq!(h.value(4, LAB), "\u{2713}");
    assert_eq!(h.value(4, REMARKS), "Referred");
    assert!(h.gateway.writes().is_empty());
    let failures: Vec<_> = h
        .events()
        .into_iter()
        .filter(|e| matches!(e, GridEvent::WriteFailed { .. }))
        .collect();
    assert_eq!(failures.len(), 2);
}

#[test]
fn unmapped_column_is_reported() {
    let mut config = common::register_config();
    config.fields = ipdgrid::FieldTable::new(["uhid", "patient_name"]);
    let mut h = Harness::with(config, common::register_rows());
    h.events();
    h.edit(1, WARD, "Oncology");
    h.settle();
    assert_eq!(h.value(1, WARD), "Oncology");
    assert!(h.gateway.writes().is_empty());
    assert_eq!(
        h.events(),
        vec![GridEvent::WriteFailed {
            position: pos(1, WARD),
            message: GridError::UnmappedColumn(WARD).to_string(),
        }]
    );
}

#[test]
fn row_key_is_trimmed() {
    let mut rows = common::register_rows();
    rows[2][0] = ipdgrid::Cell::new("  IPD-002 ");
    let mut h = Harness::with(common::register_config(), rows);
    h.view.click(pos(2, PHARMACY));
    h.settle();
    assert_eq!(h.gateway.writes()[0].row_key, "IPD-002");
}
