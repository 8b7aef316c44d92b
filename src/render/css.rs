//! CSS declarations for rendered cells.
//!
//! Kept free of DOM types so styling can be checked natively.

use serde::Serialize;

use crate::layout::StickyOffsets;
use crate::types::CellFormatting;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssDecl {
    pub property: &'static str,
    pub value: String,
}

impl CssDecl {
    fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

/// Stacking order of pinned cells so corners stay above both edges
pub fn z_index(sticky: &StickyOffsets) -> u8 {
    let col_pinned = sticky.left.is_some() || sticky.right.is_some();
    match (sticky.top.is_some(), col_pinned) {
        (true, true) => 3,
        (true, false) => 2,
        (false, true) => 1,
        (false, false) => 0,
    }
}

pub fn formatting_declarations(formatting: &CellFormatting) -> Vec<CssDecl> {
    let mut decls = Vec::new();
    if let Some(bold) = formatting.bold {
        decls.push(CssDecl::new("font-weight", if bold { "bold" } else { "normal" }));
    }
    if let Some(italic) = formatting.italic {
        decls.push(CssDecl::new("font-style", if italic { "italic" } else { "normal" }));
    }
    if let Some(underline) = formatting.underline {
        decls.push(CssDecl::new(
            "text-decoration",
            if underline { "underline" } else { "none" },
        ));
    }
    if let Some(size) = formatting.font_size {
        decls.push(CssDecl::new("font-size", format!("{size}px")));
    }
    if let Some(family) = &formatting.font_family {
        decls.push(CssDecl::new("font-family", family.as_str()));
    }
    if let Some(color) = &formatting.text_color {
        decls.push(CssDecl::new("color", color.as_str()));
    }
    if let Some(color) = &formatting.background_color {
        decls.push(CssDecl::new("background-color", color.as_str()));
    }
    if let Some(align) = formatting.text_align {
        decls.push(CssDecl::new("text-align", align.as_css()));
    }
    if let Some(borders) = &formatting.borders {
        let sides = [
            ("border-top", &borders.top),
            ("border-right", &borders.right),
            ("border-bottom", &borders.bottom),
            ("border-left", &borders.left),
        ];
        for (property, value) in sides {
            if let Some(value) = value {
                decls.push(CssDecl::new(property, value.as_str()));
            }
        }
    }
    decls
}

pub fn sticky_declarations(sticky: &StickyOffsets) -> Vec<CssDecl> {
    if !sticky.is_pinned() {
        return Vec::new();
    }
    let mut decls = vec![CssDecl::new("position", "sticky")];
    if let Some(left) = sticky.left {
        decls.push(CssDecl::new("left", format!("{left}px")));
    }
    if let Some(right) = sticky.right {
        decls.push(CssDecl::new("right", format!("{right}px")));
    }
    if let Some(top) = sticky.top {
        decls.push(CssDecl::new("top", format!("{top}px")));
    }
    decls.push(CssDecl::new("z-index", z_index(sticky).to_string()));
    decls
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
    use crate::types::{Borders, TextAlign};

    #[test]
    fn formatting_to_css() {
        let mut fmt = CellFormatting::bold()
            .with_background("#fff3cd")
            .with_align(TextAlign::Center);
        fmt.font_size = Some(14.0);
        fmt.borders = Some(Borders {
            bottom: Some("2px solid #333".into()),
            ..Borders::default()
        });
        let decls = formatting_declarations(&fmt);
        let pairs: Vec<(&str, &str)> = decls.iter().map(|d| (d.property, d.value.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("font-weight", "bold"),
                ("font-size", "14px"),
                ("background-color", "#fff3cd"),
                ("text-align", "center"),
                ("border-bottom", "2px solid #333"),
            ]
        );
    }

    #[test]
    fn unpinned_cells_have_no_sticky_css() {
        assert!(sticky_declarations(&StickyOffsets::default()).is_empty());
    }

    #[test]
    fn corner_cell_stacks_highest() {
        let corner = StickyOffsets {
            left: Some(48.0),
            right: None,
            top: Some(0.0),
        };
        let decls = sticky_declarations(&corner);
        assert_eq!(decls.first().unwrap().value, "sticky");
        assert!(decls.contains(&CssDecl::new("left", "48px")));
        assert!(decls.contains(&CssDecl::new("z-index", "3")));
    }
}
