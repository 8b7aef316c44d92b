//! Browser binding: `IpdGrid` wraps a `GridView` for JavaScript hosts.
//!
//! The host supplies two functions returning Promises: `load()` resolving to
//! a row-major array of cells, and `write(cellWrite)` resolving when the
//! backend has stored the value.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::HtmlElement;

use super::{GridView, Spawner};
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::persistence::{CellWrite, PersistenceGateway};
use crate::render::dom;
use crate::types::{Cell, CellFormatting, Position};

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn to_js<T: serde::Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Gateway backed by host JS functions
struct JsGateway {
    load: Function,
    write: Function,
}

async fn call_promise(function: Function, arg: Option<JsValue>) -> std::result::Result<JsValue, JsValue> {
    let returned = match arg {
        Some(arg) => function.call1(&JsValue::NULL, &arg)?,
        None => function.call0(&JsValue::NULL)?,
    };
    JsFuture::from(Promise::resolve(&returned)).await
}

impl PersistenceGateway for JsGateway {
    fn load_rows(&self) -> LocalBoxFuture<'static, Result<Vec<Vec<Cell>>>> {
        let load = self.load.clone();
        Box::pin(async move {
            let value = call_promise(load, None)
                .await
                .map_err(|e| GridError::Load(js_message(&e)))?;
            serde_wasm_bindgen::from_value(value).map_err(|e| GridError::Load(e.to_string()))
        })
    }

    fn write_cell(&self, write: CellWrite) -> LocalBoxFuture<'static, Result<()>> {
        let function = self.write.clone();
        Box::pin(async move {
            let arg = serde_wasm_bindgen::to_value(&write).map_err(|e| GridError::Write(e.to_string()))?;
            call_promise(function, Some(arg))
                .await
                .map(|_| ())
                .map_err(|e| GridError::Write(js_message(&e)))
        })
    }
}

#[wasm_bindgen]
pub struct IpdGrid {
    view: GridView,
}

#[wasm_bindgen]
impl IpdGrid {
    /// `config` may be `undefined` for the default register layout.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, load: Function, write: Function) -> std::result::Result<IpdGrid, JsValue> {
        console_error_panic_hook::set_once();
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| GridError::Config(e.to_string()))?
        };
        let spawner: Spawner =
            Rc::new(|task: LocalBoxFuture<'static, ()>| wasm_bindgen_futures::spawn_local(task));
        let view = GridView::new(config, Rc::new(JsGateway { load, write }), spawner)?;
        Ok(IpdGrid { view })
    }

    /// Resolves once the register is shown; rejects with the load error
    pub fn load(&self) -> Promise {
        let view = self.view.clone();
        future_to_promise(async move {
            view.load().await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Called after a background write settles so the host can re-render
    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&self, callback: Option<Function>) {
        let listener: Option<Rc<dyn Fn()>> = callback.map(|f| {
            Rc::new(move || {
                let _ = f.call0(&JsValue::NULL);
            }) as Rc<dyn Fn()>
        });
        self.view.set_listener(listener);
    }

    #[wasm_bindgen(js_name = "setViewport")]
    pub fn set_viewport(&self, width: f32, height: f32) {
        self.view.set_viewport_size(width, height);
    }

    #[wasm_bindgen(js_name = "setScroll")]
    pub fn set_scroll(&self, x: f32, y: f32) {
        self.view.set_scroll(x, y);
    }

    /// Returns the hit target as `{ kind, ... }`
    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&self, x: f32, y: f32) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.view.pointer_down_at(x, y))
    }

    #[wasm_bindgen(js_name = "pointerEnter")]
    pub fn pointer_enter(&self, row: u32, col: u32) -> bool {
        self.view.pointer_enter(Position::new(row, col))
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&self, x: f32, y: f32) -> bool {
        self.view.pointer_move(x, y)
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&self) {
        self.view.pointer_up();
    }

    pub fn click(&self, row: u32, col: u32) {
        self.view.click(Position::new(row, col));
    }

    #[wasm_bindgen(js_name = "doubleClick")]
    pub fn double_click(&self, row: u32, col: u32) {
        self.view.double_click(Position::new(row, col));
    }

    /// Returns true when the host should `preventDefault()`
    #[wasm_bindgen(js_name = "keyDown")]
    pub fn key_down(&self, key: &str) -> bool {
        self.view.key_down(key)
    }

    #[wasm_bindgen(js_name = "setDraft")]
    pub fn set_draft(&self, value: &str) -> bool {
        self.view.set_draft(value)
    }

    pub fn blur(&self) {
        self.view.blur();
    }

    #[wasm_bindgen(js_name = "cancelEdit")]
    pub fn cancel_edit(&self) {
        self.view.cancel_edit();
    }

    #[wasm_bindgen(js_name = "setAccepted")]
    pub fn set_accepted(&self, row: u32, col: u32) -> std::result::Result<(), JsValue> {
        Ok(self.view.set_accepted(Position::new(row, col))?)
    }

    #[wasm_bindgen(js_name = "setRejected")]
    pub fn set_rejected(&self, row: u32, col: u32) -> std::result::Result<(), JsValue> {
        Ok(self.view.set_rejected(Position::new(row, col))?)
    }

    /// `patch` uses the camelCase `CellFormatting` shape
    #[wasm_bindgen(js_name = "applyFormatting")]
    pub fn apply_formatting(&self, patch: JsValue) -> std::result::Result<usize, JsValue> {
        let patch: CellFormatting = serde_wasm_bindgen::from_value(patch)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.view.apply_formatting_to_selection(&patch))
    }

    #[wasm_bindgen(js_name = "setSearchTerm")]
    pub fn set_search_term(&self, term: &str) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.view.set_search_term(term))
    }

    #[wasm_bindgen(js_name = "searchNext")]
    pub fn search_next(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.view.search_next())
    }

    #[wasm_bindgen(js_name = "searchPrev")]
    pub fn search_prev(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.view.search_prev())
    }

    #[wasm_bindgen(js_name = "renderFrame")]
    pub fn render_frame(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.view.render())
    }

    /// Style a host-created cell element from the current grid state
    #[wasm_bindgen(js_name = "renderCell")]
    pub fn render_cell(&self, el: HtmlElement, row: u32, col: u32) -> std::result::Result<(), JsValue> {
        let Some(cell) = self.view.render_cell(Position::new(row, col)) else {
            return Ok(());
        };
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Ok(());
        };
        dom::apply_cell(&document, &el, &cell)
    }

    #[wasm_bindgen(js_name = "takeEvents")]
    pub fn take_events(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.view.drain_events())
    }

    #[wasm_bindgen(js_name = "selectionText")]
    pub fn selection_text(&self) -> Option<String> {
        self.view.selection_text()
    }
}
