//! Parsing module for the note editor
//!
//! Turns marker text back into formatted fragments.

pub mod markers;

// Re-export commonly used types
pub use markers::{decode_document, decode_fragments, decode_text, DecodeResult};
