//! Renderers module for the note editor
//!
//! Marker text encoding, font metrics, word-wrap layout and the HTML preview.

pub mod markers;
pub mod font_metrics;
pub mod layout_engine;
pub mod html;

// Re-export commonly used types
pub use font_metrics::{FixedWidthMetrics, FontExtents, FontMetrics, MeasuredMetrics, StyleMetrics};
pub use layout_engine::{GlyphPlacement, LayoutConfig, LayoutEngine, TextLayout};
pub use markers::{combined_markers, encode};
