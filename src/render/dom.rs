//! Apply rendered cells to host-owned DOM elements.

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use super::RenderCell;

fn flag(el: &HtmlElement, name: &str, on: bool) -> Result<(), JsValue> {
    if on {
        el.set_attribute(name, "")
    } else {
        el.remove_attribute(name)
    }
}

/// Write a cell's size, sticky offsets, formatting, state flags and text
/// into `el`. Search matches are wrapped in `<mark>` elements.
pub fn apply_cell(document: &Document, el: &HtmlElement, cell: &RenderCell) -> Result<(), JsValue> {
    let style = el.style();
    style.set_css_text("");
    style.set_property("width", &format!("{}px", cell.width))?;
    for decl in &cell.style {
        style.set_property(decl.property, &decl.value)?;
    }

    flag(el, "data-selected", cell.selected)?;
    flag(el, "data-match", cell.is_match)?;
    flag(el, "data-current-match", cell.current_match)?;
    flag(el, "data-editing", cell.editing)?;

    if cell.segments.is_empty() {
        el.set_text_content(Some(&cell.text));
        return Ok(());
    }
    el.set_text_content(None);
    for segment in &cell.segments {
        let tag = if segment.matched { "mark" } else { "span" };
        let node = document.create_element(tag)?;
        node.set_text_content(Some(&segment.text));
        el.append_child(&node)?;
    }
    Ok(())
}
