//! TSV serialization of the selected rectangle for clipboard copy.

use crate::grid::GridModel;
use crate::types::CellRange;

/// Quote a value for TSV if it contains a tab, newline or quote.
/// Internal quotes are doubled.
pub(crate) fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains(['\t', '\n', '\r', '"']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Rows of the range joined by newlines, cells by tabs
pub(crate) fn range_to_tsv(model: &GridModel, range: CellRange) -> String {
    let mut out = String::new();
    for row in range.top..=range.bottom {
        if row > range.top {
            out.push('\n');
        }
        for col in range.left..=range.right {
            if col > range.left {
                out.push('\t');
            }
            if let Some(value) = model.cell_value((row, col).into()) {
                out.push_str(&escape_cell_value(value));
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
    use crate::types::{Cell, Position};
    use test_case::test_case;

    #[test_case("plain", "plain")]
    #[test_case("a\tb", "\"a\tb\"")]
    #[test_case("line\nbreak", "\"line\nbreak\"")]
    #[test_case("say \"hi\"", "\"say \"\"hi\"\"\"")]
    fn escapes(input: &str, expected: &str) {
        assert_eq!(escape_cell_value(input), expected);
    }

    #[test]
    fn rectangle_to_tsv() {
        let mut model = GridModel::new(128.0, 32.0);
        model
            .load_initial(vec![
                vec![Cell::new("a"), Cell::new("b"), Cell::new("c")],
                vec![Cell::new("d"), Cell::new("e\tf"), Cell::new("g")],
            ])
            .unwrap();
        let range = CellRange::from_corners(Position::new(1, 1), Position::new(0, 0));
        assert_eq!(range_to_tsv(&model, range), "a\tb\nd\t\"e\tf\"");
    }
}
