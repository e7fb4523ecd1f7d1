//! Fragment: a run of text sharing one format set

use serde::{Deserialize, Serialize};

use super::format::{FormatKind, FormatSet};

/// Contiguous run of text with one format set
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub formats: FormatSet,
}

impl Fragment {
    pub fn new(text: impl Into<String>, formats: FormatSet) -> Self {
        Self {
            text: text.into(),
            formats,
        }
    }

    /// Unformatted fragment
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, FormatSet::new())
    }

    /// Fragment carrying the given kinds, in order
    pub fn styled(text: impl Into<String>, kinds: &[FormatKind]) -> Self {
        Self::new(text, FormatSet::from_kinds(kinds.iter().copied()))
    }

    pub fn is_plain(&self) -> bool {
        self.formats.is_empty()
    }

    /// Length in characters (the unit of every editor offset)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Characters `start..end` (character indices, clamped) with the same formats
    pub fn slice(&self, start: usize, end: usize) -> Fragment {
        Fragment::new(char_slice(&self.text, start, end), self.formats.clone())
    }
}

/// Byte index of the `char_idx`-th character, or the string length past the end
pub(crate) fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Substring by character indices, clamped to the string
pub(crate) fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let from = byte_index(s, start);
    let to = byte_index(s, end.max(start));
    &s[from..to]
}
