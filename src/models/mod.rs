//! Data models for the note editor
//!
//! Fragments, format sets, the fragment store and the editor state, plus the
//! structured interchange form used for persistence.

pub mod format;
pub mod fragment;
pub mod document;
pub mod editor_state;
pub mod interchange;

// Re-export commonly used types
pub use format::{FormatKind, FormatSet};
pub use fragment::Fragment;
pub use document::Document;
pub use editor_state::EditorState;
pub use interchange::FragmentRecord;
