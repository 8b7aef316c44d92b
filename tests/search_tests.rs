//! Search through the view: matching, navigation and frame highlighting.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{pos, Harness, DOCTOR, REMARKS};
use ipdgrid::search::{highlight, TextSegment};
use test_case::test_case;

#[test_case("Cash"; "as typed")]
#[test_case("cash"; "lower")]
#[test_case("CASH"; "upper")]
fn search_is_case_insensitive(term: &str) {
    let h = Harness::new();
    assert_eq!(h.view.set_search_term(term), Some(pos(1, REMARKS)));
    assert_eq!(h.view.search_matches(), vec![pos(1, REMARKS), pos(2, REMARKS)]);
}

#[test]
fn navigation_wraps_both_ways() {
    let h = Harness::new();
    h.view.set_search_term("dr");
    let expected = [pos(0, DOCTOR), pos(1, DOCTOR), pos(2, DOCTOR), pos(3, DOCTOR), pos(4, DOCTOR)];
    assert_eq!(h.view.search_matches(), expected);
    assert_eq!(h.view.search_current(), Some(expected[0]));

    for want in expected.iter().skip(1).chain(expected.iter().take(1)) {
        assert_eq!(h.view.search_next(), Some(*want));
    }
    assert_eq!(h.view.search_prev(), Some(expected[4]));
    assert_eq!(h.view.search_prev(), Some(expected[3]));
}

#[test]
fn no_matches_has_no_current() {
    let h = Harness::new();
    assert_eq!(h.view.set_search_term("zzz"), None);
    assert_eq!(h.view.search_next(), None);
    assert_eq!(h.view.search_prev(), None);
    let frame = h.view.render();
    assert_eq!(frame.search.match_count, 0);
    assert_eq!(frame.search.current_index, None);
}

#[test]
fn empty_term_clears_matches() {
    let h = Harness::new();
    h.view.set_search_term("cash");
    h.view.set_search_term("");
    assert!(h.view.search_matches().is_empty());
    assert!(h.view.render().rows.iter().all(|r| r.cells.iter().all(|c| !c.is_match)));
}

#[test]
fn edits_refresh_matches() {
    let mut h = Harness::new();
    h.view.set_search_term("cash");
    h.view.search_next();
    assert_eq!(h.view.search_current(), Some(pos(2, REMARKS)));

    h.edit(2, REMARKS, "Settled");
    h.settle();
    assert_eq!(h.view.search_matches(), vec![pos(1, REMARKS)]);
    // The index is clamped into the shorter list
    assert_eq!(h.view.search_current(), Some(pos(1, REMARKS)));

    h.edit(3, REMARKS, "Cash deposit");
    h.settle();
    assert_eq!(h.view.search_matches(), vec![pos(1, REMARKS), pos(3, REMARKS)]);
}

#[test]
fn frame_marks_matches_and_current() {
    let h = Harness::new();
    h.view.set_search_term("cash");
    h.view.search_next();
    let frame = h.view.render();

    let first = frame.cell(pos(1, REMARKS)).unwrap();
    assert!(first.is_match);
    assert!(!first.current_match);

    let current = frame.cell(pos(2, REMARKS)).unwrap();
    assert!(current.current_match);
    assert_eq!(
        current.segments,
        vec![
            TextSegment { text: "cash".into(), matched: true },
            TextSegment { text: " flow pending".into(), matched: false },
        ]
    );

    let miss = frame.cell(pos(3, REMARKS)).unwrap();
    assert!(!miss.is_match);
    assert!(miss.segments.is_empty());

    assert_eq!(frame.search.term, "cash");
    assert_eq!(frame.search.match_count, 2);
    assert_eq!(frame.search.current_index, Some(1));
}

#[test]
fn single_cell_render_agrees_with_frame() {
    let h = Harness::new();
    h.view.set_search_term("cash");
    h.view.search_next();
    h.view.double_click(pos(1, DOCTOR));
    h.view.set_draft("Dr. Iyer");
    let frame = h.view.render();

    for p in [pos(1, REMARKS), pos(2, REMARKS), pos(1, DOCTOR), pos(0, 0)] {
        assert_eq!(h.view.render_cell(p).as_ref(), frame.cell(p));
    }
    let current = h.view.render_cell(pos(2, REMARKS)).unwrap();
    assert!(current.current_match);
    assert_eq!(current.segments.len(), 2);
    assert_eq!(h.view.render_cell(pos(1, DOCTOR)).unwrap().text, "Dr. Iyer");
    assert!(h.view.render_cell(pos(99, 0)).is_none());
}

#[test]
fn editing_cell_shows_draft_without_segments() {
    let h = Harness::new();
    h.view.set_search_term("cash");
    h.view.double_click(pos(1, REMARKS));
    h.view.set_draft("Cash and card");
    let frame = h.view.render();
    let cell = frame.cell(pos(1, REMARKS)).unwrap();
    assert!(cell.editing);
    assert_eq!(cell.text, "Cash and card");
    assert!(cell.segments.is_empty());
}

#[test_case("Cash on cash", "CASH"; "repeated")]
#[test_case("İstanbul ward", "i"; "multi-char fold")]
#[test_case("Ünal, Ümit", "ü"; "non-ascii")]
#[test_case("", "x"; "empty text")]
fn segments_reassemble_the_text(text: &str, term: &str) {
    let joined: String = highlight(text, term).into_iter().map(|s| s.text).collect();
    assert_eq!(joined, text);
}
