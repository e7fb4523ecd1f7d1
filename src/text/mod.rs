//! Text editing core
//!
//! Caret and selection handling, geometry-based navigation and the edit
//! operations that mutate the fragment store.
//!
//! ## Modules
//!
//! - `cursor`: selection and click tracking
//! - `navigation`: offset/pixel mapping and caret movement over a layout
//! - `edit`: insert, delete, format and clipboard operations

pub mod cursor;
pub mod navigation;
pub mod edit;

// Re-exports for convenience
pub use cursor::{ClickTracker, Selection};
pub use edit::{BackspaceOutcome, BackspacePolicy, CopyResult};
