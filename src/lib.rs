//! Rich-text note editor WASM module
//!
//! Fragment-based rich text with markdown-style markers, word-wrap layout,
//! caret/selection handling and editing for the note widgets of the roadmap
//! canvas.

pub mod error;
pub mod models;
pub mod parse;
pub mod renderers;
pub mod text;
pub mod editor;
pub mod api;

// Re-export commonly used types
pub use editor::{CommandResult, EditorCommand, EditorConfig, EditorHost, RichTextEditor};
pub use error::InterchangeError;
pub use models::{Document, EditorState, FormatKind, FormatSet, Fragment};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::warn!("Logger was already initialized");
    }

    log::info!("Note editor WASM module initialized");
}
