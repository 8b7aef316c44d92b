//! Case-insensitive search over the register with current-match tracking.
//!
//! Matching folds both sides with `char::to_lowercase`, so it works for any
//! script. Occurrences are reported as byte ranges into the original text and
//! never split a source character.

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::grid::GridModel;
use crate::types::Position;

/// A run of text that either matches the search term or doesn't
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub text: String,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy)]
struct FoldedChar {
    ch: char,
    /// Byte span of the source character this came from
    start: usize,
    end: usize,
}

fn fold(text: &str) -> Vec<FoldedChar> {
    text.char_indices()
        .flat_map(|(start, c)| {
            let end = start + c.len_utf8();
            c.to_lowercase().map(move |ch| FoldedChar { ch, start, end })
        })
        .collect()
}

/// A folded search term, reusable across many cells
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: Vec<char>,
}

impl Matcher {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.chars().flat_map(char::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Non-overlapping occurrences in `text`, left to right
    pub fn find(&self, text: &str) -> Vec<Range<usize>> {
        let n = self.needle.len();
        if n == 0 {
            return Vec::new();
        }
        let hay = fold(text);
        let mut found = Vec::new();
        let mut next_free = 0;
        for (i, window) in hay.windows(n).enumerate() {
            if i < next_free || !window.iter().map(|f| f.ch).eq(self.needle.iter().copied()) {
                continue;
            }
            let (Some(first), Some(last)) = (window.first(), window.last()) else {
                continue;
            };
            // Reject matches that cover only part of a multi-char fold
            let starts_clean = i == 0 || hay.get(i - 1).map_or(true, |p| p.start != first.start);
            let ends_clean = hay.get(i + n).map_or(true, |p| p.start != last.start);
            if starts_clean && ends_clean {
                found.push(first.start..last.end);
                next_free = i + n;
            }
        }
        found
    }

    pub fn is_match(&self, text: &str) -> bool {
        !self.find(text).is_empty()
    }
}

/// Split `text` into matched and unmatched runs.
///
/// Concatenating the segments always yields `text` again. An empty term gives
/// a single unmatched segment (or none for empty text).
pub fn highlight(text: &str, term: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for range in Matcher::new(term).find(text) {
        if let Some(before) = text.get(cursor..range.start).filter(|s| !s.is_empty()) {
            segments.push(TextSegment {
                text: before.to_string(),
                matched: false,
            });
        }
        if let Some(hit) = text.get(range.clone()) {
            segments.push(TextSegment {
                text: hit.to_string(),
                matched: true,
            });
        }
        cursor = range.end;
    }
    if let Some(rest) = text.get(cursor..).filter(|s| !s.is_empty()) {
        segments.push(TextSegment {
            text: rest.to_string(),
            matched: false,
        });
    }
    segments
}

/// Search term, its matches in row-major order and the current match
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: String,
    matches: Vec<Position>,
    current: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self) -> &[Position] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<Position> {
        self.matches.get(self.current?).copied()
    }

    pub fn is_match(&self, pos: Position) -> bool {
        self.matches.binary_search(&pos).is_ok()
    }

    pub fn is_current(&self, pos: Position) -> bool {
        self.current() == Some(pos)
    }

    /// Replace the term and jump to the first match
    pub fn set_term(&mut self, term: impl Into<String>, model: &GridModel) {
        self.term = term.into();
        self.matches = find_matches(model, &self.term);
        self.current = if self.matches.is_empty() { None } else { Some(0) };
        debug!(term = %self.term, matches = self.matches.len(), "search updated");
    }

    /// Recompute after the matrix changed, keeping the current index in range
    pub fn refresh(&mut self, model: &GridModel) {
        self.matches = find_matches(model, &self.term);
        self.current = match self.matches.len() {
            0 => None,
            len => Some(self.current.unwrap_or(0).min(len - 1)),
        };
    }

    pub fn next(&mut self) -> Option<Position> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        self.current = Some(self.current.map_or(0, |i| (i + 1) % len));
        self.current()
    }

    pub fn previous(&mut self) -> Option<Position> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        self.current = Some(match self.current {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.current()
    }
}

/// Row-major positions whose value contains `term`
pub fn find_matches(model: &GridModel, term: &str) -> Vec<Position> {
    let matcher = Matcher::new(term);
    if matcher.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (r, row) in model.rows().enumerate() {
        let Ok(r) = u32::try_from(r) else { break };
        for (c, cell) in row.iter().enumerate() {
            let Ok(c) = u32::try_from(c) else { break };
            if matcher.is_match(&cell.value) {
                out.push(Position::new(r, c));
            }
        }
    }
    out
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
    use crate::types::Cell;
    use test_case::test_case;

    fn model(rows: &[&[&str]]) -> GridModel {
        let mut m = GridModel::new(128.0, 32.0);
        m.load_initial(
            rows.iter()
                .map(|r| r.iter().map(|v| Cell::new(*v)).collect())
                .collect(),
        )
        .unwrap();
        m
    }

    #[test_case("Cardiology", "CARD", vec![0..4])]
    #[test_case("aaaa", "aa", vec![0..2, 2..4])]
    #[test_case("ward 3, ward 4", "Ward", vec![0..4, 8..12])]
    #[test_case("ÉCOLE école", "école", vec![0..6, 7..13])]
    #[test_case("plain", "", vec![])]
    #[test_case("plain", "x", vec![])]
    fn finds_ranges(text: &str, term: &str, expected: Vec<Range<usize>>) {
        assert_eq!(Matcher::new(term).find(text), expected);
    }

    #[test]
    fn does_not_match_half_of_a_fold() {
        // 'İ' lowercases to "i\u{307}"; a bare "i" must not match into it
        assert!(Matcher::new("i").find("İ").is_empty());
        assert_eq!(Matcher::new("i\u{307}").find("İ"), vec![0..2]);
    }

    #[test]
    fn highlight_reassembles() {
        let segments = highlight("Dr. Rao / dr. rao", "DR. RAO");
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "Dr. Rao / dr. rao");
        let flags: Vec<bool> = segments.iter().map(|s| s.matched).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn highlight_without_term() {
        assert_eq!(
            highlight("abc", ""),
            vec![TextSegment {
                text: "abc".into(),
                matched: false
            }]
        );
        assert!(highlight("", "a").is_empty());
    }

    #[test]
    fn matches_are_row_major() {
        let m = model(&[&["x", "ax"], &["b", "X"]]);
        let mut s = SearchState::new();
        s.set_term("x", &m);
        assert_eq!(
            s.matches(),
            &[Position::new(0, 0), Position::new(0, 1), Position::new(1, 1)]
        );
        assert_eq!(s.current_index(), Some(0));
    }

    #[test]
    fn next_and_previous_wrap() {
        let m = model(&[&["a", "a", "a"]]);
        let mut s = SearchState::new();
        s.set_term("a", &m);
        assert_eq!(s.previous(), Some(Position::new(0, 2)));
        assert_eq!(s.next(), Some(Position::new(0, 0)));
        assert_eq!(s.next(), Some(Position::new(0, 1)));
        assert_eq!(s.next(), Some(Position::new(0, 2)));
        assert_eq!(s.next(), Some(Position::new(0, 0)));
    }

    #[test]
    fn empty_term_has_no_current() {
        let m = model(&[&["a"]]);
        let mut s = SearchState::new();
        s.set_term("", &m);
        assert_eq!(s.current_index(), None);
        assert_eq!(s.next(), None);
        assert_eq!(s.previous(), None);
    }

    #[test]
    fn refresh_clamps_current() {
        let mut m = model(&[&["a", "a", "a"]]);
        let mut s = SearchState::new();
        s.set_term("a", &m);
        s.previous();
        assert_eq!(s.current_index(), Some(2));

        m.set_cell_value(Position::new(0, 2), "b").unwrap();
        m.set_cell_value(Position::new(0, 1), "b").unwrap();
        s.refresh(&m);
        assert_eq!(s.current_index(), Some(0));

        m.set_cell_value(Position::new(0, 0), "b").unwrap();
        s.refresh(&m);
        assert_eq!(s.current_index(), None);
    }
}
