//! Editor state management
//!
//! `EditorState` bundles the document with the caret offset and the current
//! selection. Offsets are character indices into the display text.

use serde::{Deserialize, Serialize};

use super::document::Document;
use crate::text::cursor::Selection;

/// Document plus caret and selection
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EditorState {
    /// The document being edited
    pub document: Document,

    /// Caret offset, `0..=len(display text)`
    pub cursor: usize,

    /// Current selection (an empty one counts as none)
    pub selection: Option<Selection>,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            cursor: 0,
            selection: None,
        }
    }

    /// State with the caret at the end of the document
    pub fn at_end(document: Document) -> Self {
        let cursor = document.char_len();
        Self {
            document,
            cursor,
            selection: None,
        }
    }

    /// Move the caret and drop any selection
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.document.char_len());
        self.selection = None;
    }

    /// Selection if it covers at least one character
    pub fn active_selection(&self) -> Option<Selection> {
        self.selection.filter(|sel| !sel.is_empty())
    }

    pub fn has_selection(&self) -> bool {
        self.active_selection().is_some()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Clamp the caret and selection to the document bounds
    pub fn validate_cursor(&mut self) {
        let len = self.document.char_len();
        self.cursor = self.cursor.min(len);
        if let Some(sel) = self.selection.as_mut() {
            sel.anchor = sel.anchor.min(len);
            sel.head = sel.head.min(len);
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Document::new())
    }
}
