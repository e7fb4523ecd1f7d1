//! Marker text encoder
//!
//! Turns fragments back into the flat marker text used for the clipboard and
//! raw-text persistence: `***x***` (bold + italic), `**x**`, `*x*`, `__x__`,
//! `~~x~~`. The first format in a fragment's list is the outermost marker.

use crate::models::{FormatSet, Fragment};

/// Opening and closing marker strings for a format list
///
/// Exactly {Bold, Italic} collapses to `***`. Anything else concatenates the
/// individual markers in list order for the opening and in reverse for the
/// closing.
pub fn combined_markers(formats: &FormatSet) -> (String, String) {
    if formats.is_bold_italic() {
        return ("***".to_string(), "***".to_string());
    }
    let opening: String = formats.iter().map(|k| k.marker()).collect();
    let closing: String = formats.iter().rev().map(|k| k.marker()).collect();
    (opening, closing)
}

/// Marker text for one fragment
pub fn encode_fragment(fragment: &Fragment) -> String {
    if fragment.is_plain() {
        return fragment.text.clone();
    }
    let (opening, closing) = combined_markers(&fragment.formats);
    format!("{}{}{}", opening, fragment.text, closing)
}

/// Marker text for a fragment sequence
pub fn encode(fragments: &[Fragment]) -> String {
    fragments.iter().map(encode_fragment).collect()
}

/// Re-expose a formatted fragment's markers as plain text
///
/// Returns the plain fragment and the character offset inside it that sits
/// right before the closing marker sequence.
pub fn unformat_fragment(fragment: &Fragment) -> (Fragment, usize) {
    let (opening, closing) = combined_markers(&fragment.formats);
    let caret = opening.chars().count() + fragment.char_len();
    let text = format!("{}{}{}", opening, fragment.text, closing);
    (Fragment::plain(text), caret)
}
