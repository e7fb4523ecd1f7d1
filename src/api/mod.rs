//! JS-facing API
//!
//! `NoteEditor` wraps [`RichTextEditor`] for the browser widget. The host
//! measures glyphs with the real font and passes the numbers in as a
//! [`MeasuredMetrics`] table; everything else is plain JSON-like values.

pub mod helpers;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::editor::{EditorCommand, EditorConfig, EditorHost, RichTextEditor};
use crate::models::FormatKind;
use crate::renderers::font_metrics::MeasuredMetrics;
use crate::renderers::html;
use crate::text::cursor::Selection;
use helpers::{deserialize, deserialize_or_default, serialize, time_ms, validation_error};

/// Scroll notifications forwarded to a JS callback
struct JsScrollHost {
    callback: js_sys::Function,
}

impl EditorHost for JsScrollHost {
    fn scroll_to_reveal(&mut self, y: f32) {
        if let Err(e) = self.callback.call1(&JsValue::NULL, &JsValue::from_f64(f64::from(y))) {
            log::warn!("Scroll callback failed: {:?}", e);
        }
    }
}

/// Caret and selection snapshot for the host
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaretInfo {
    cursor: usize,
    x: f32,
    y: f32,
    selection: Option<Selection>,
}

fn parse_format(name: &str) -> Result<FormatKind, JsValue> {
    name.parse::<FormatKind>()
        .map_err(|e| validation_error(e.to_string()))
}

#[wasm_bindgen]
pub struct NoteEditor {
    inner: RichTextEditor<MeasuredMetrics>,
}

#[wasm_bindgen]
impl NoteEditor {
    /// Create an editor. `config` and `metrics` may be omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, metrics: JsValue) -> Result<NoteEditor, JsValue> {
        let config: EditorConfig = deserialize_or_default(config, "Invalid editor config")?;
        let metrics: MeasuredMetrics = deserialize_or_default(metrics, "Invalid font metrics")?;
        log::debug!("Creating note editor, width {}", config.layout.width);
        Ok(NoteEditor {
            inner: RichTextEditor::new(metrics, config),
        })
    }

    #[wasm_bindgen(js_name = setMetrics)]
    pub fn set_metrics(&mut self, metrics: JsValue) -> Result<(), JsValue> {
        let metrics: MeasuredMetrics = deserialize(metrics, "Invalid font metrics")?;
        self.inner.set_metrics(metrics);
        Ok(())
    }

    /// Register `callback(y)`, called after every mutation
    #[wasm_bindgen(js_name = setScrollCallback)]
    pub fn set_scroll_callback(&mut self, callback: js_sys::Function) {
        self.inner.set_host(Box::new(JsScrollHost { callback }));
    }

    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&mut self, width: f32) {
        self.inner.set_width(width);
    }

    /// Run a command such as `{ command: "text", text: "a" }`. Returns
    /// `{ changed, clipboard }`.
    #[wasm_bindgen(js_name = handleCommand)]
    pub fn handle_command(&mut self, command: JsValue) -> Result<JsValue, JsValue> {
        let command: EditorCommand = deserialize(command, "Invalid editor command")?;
        let result = self.inner.handle_command(command);
        serialize(&result, "Failed to serialize command result")
    }

    #[wasm_bindgen(js_name = mousePress)]
    pub fn mouse_press(&mut self, x: f32, y: f32, time: f64) {
        self.inner.mouse_press(x, y, time_ms(time));
    }

    #[wasm_bindgen(js_name = mouseDrag)]
    pub fn mouse_drag(&mut self, x: f32, y: f32) {
        self.inner.mouse_drag(x, y);
    }

    #[wasm_bindgen(js_name = mouseRelease)]
    pub fn mouse_release(&mut self, time: f64) {
        self.inner.mouse_release(time_ms(time));
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, x: f32, y: f32, time: f64) {
        self.inner.double_click(x, y, time_ms(time));
    }

    #[wasm_bindgen(js_name = applyFormat)]
    pub fn apply_format(&mut self, format: &str) -> Result<bool, JsValue> {
        Ok(self.inner.apply_format(parse_format(format)?))
    }

    #[wasm_bindgen(js_name = removeFormat)]
    pub fn remove_format(&mut self, format: &str) -> Result<bool, JsValue> {
        Ok(self.inner.remove_format(parse_format(format)?))
    }

    pub fn unformat(&mut self) -> bool {
        self.inner.unformat()
    }

    /// Glyph placements for painting
    #[wasm_bindgen(js_name = getLayout)]
    pub fn get_layout(&mut self) -> Result<JsValue, JsValue> {
        serialize(self.inner.layout(), "Failed to serialize layout")
    }

    #[wasm_bindgen(js_name = getCaret)]
    pub fn get_caret(&mut self) -> Result<JsValue, JsValue> {
        let (x, y) = self.inner.caret_point();
        let info = CaretInfo {
            cursor: self.inner.cursor(),
            x,
            y,
            selection: self.inner.selection(),
        };
        serialize(&info, "Failed to serialize caret")
    }

    #[wasm_bindgen(js_name = contentHeight)]
    pub fn content_height(&mut self) -> f32 {
        self.inner.content_height()
    }

    /// Load interchange JSON; unreadable input is kept as plain text
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, json: &str) {
        self.inner.load_json(json);
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> String {
        self.inner.to_json()
    }

    #[wasm_bindgen(js_name = setMarkerText)]
    pub fn set_marker_text(&mut self, text: &str) {
        self.inner.set_marker_text(text);
    }

    #[wasm_bindgen(js_name = markerText)]
    pub fn marker_text(&self) -> String {
        self.inner.marker_text()
    }

    #[wasm_bindgen(js_name = displayText)]
    pub fn display_text(&self) -> String {
        self.inner.display_text()
    }
}

/// HTML preview of marker text
#[wasm_bindgen(js_name = markerTextToHtml)]
pub fn marker_text_to_html(text: &str) -> String {
    html::marker_text_to_html(text)
}
