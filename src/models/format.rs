//! Format kinds and ordered format sets
//!
//! A fragment's formats are an ordered set: insertion order is kept because it
//! decides how markers nest when the fragment is encoded, and a kind can only
//! appear once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InterchangeError;

/// One inline text style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    #[serde(rename = "strike")]
    Strikethrough,
}

impl FormatKind {
    /// All kinds, in declaration order
    pub const ALL: [FormatKind; 4] = [
        FormatKind::Bold,
        FormatKind::Italic,
        FormatKind::Underline,
        FormatKind::Strikethrough,
    ];

    /// Marker string that wraps text carrying this format
    pub fn marker(self) -> &'static str {
        match self {
            FormatKind::Bold => "**",
            FormatKind::Italic => "*",
            FormatKind::Underline => "__",
            FormatKind::Strikethrough => "~~",
        }
    }

    /// Name used by the interchange form
    pub fn name(self) -> &'static str {
        match self {
            FormatKind::Bold => "bold",
            FormatKind::Italic => "italic",
            FormatKind::Underline => "underline",
            FormatKind::Strikethrough => "strike",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatKind {
    type Err = InterchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(FormatKind::Bold),
            "italic" => Ok(FormatKind::Italic),
            "underline" => Ok(FormatKind::Underline),
            "strike" => Ok(FormatKind::Strikethrough),
            other => Err(InterchangeError::UnknownFormat(other.to_string())),
        }
    }
}

/// Ordered set of format kinds (application order, no duplicates)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<FormatKind>", into = "Vec<FormatKind>")]
pub struct FormatSet(Vec<FormatKind>);

impl FormatSet {
    /// Empty set (plain text)
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a set from kinds in order, dropping repeats
    pub fn from_kinds<I: IntoIterator<Item = FormatKind>>(kinds: I) -> Self {
        let mut set = Self::new();
        for kind in kinds {
            set.insert(kind);
        }
        set
    }

    /// Append a kind if it is not already present. Returns true when added.
    pub fn insert(&mut self, kind: FormatKind) -> bool {
        if self.contains(kind) {
            return false;
        }
        self.0.push(kind);
        true
    }

    /// Remove a kind. Returns true when it was present.
    pub fn remove(&mut self, kind: FormatKind) -> bool {
        let before = self.0.len();
        self.0.retain(|k| *k != kind);
        self.0.len() != before
    }

    /// Copy of this set with the given kinds appended
    pub fn extended(&self, kinds: &[FormatKind]) -> Self {
        let mut set = self.clone();
        for kind in kinds {
            set.insert(*kind);
        }
        set
    }

    pub fn contains(&self, kind: FormatKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = FormatKind> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[FormatKind] {
        &self.0
    }

    /// True for exactly {Bold, Italic} in either order
    pub fn is_bold_italic(&self) -> bool {
        self.0.len() == 2 && self.contains(FormatKind::Bold) && self.contains(FormatKind::Italic)
    }

    /// Same kinds regardless of order
    pub fn same_kinds(&self, other: &FormatSet) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl From<Vec<FormatKind>> for FormatSet {
    fn from(kinds: Vec<FormatKind>) -> Self {
        Self::from_kinds(kinds)
    }
}

impl From<FormatSet> for Vec<FormatKind> {
    fn from(set: FormatSet) -> Self {
        set.0
    }
}

impl FromIterator<FormatKind> for FormatSet {
    fn from_iter<I: IntoIterator<Item = FormatKind>>(iter: I) -> Self {
        Self::from_kinds(iter)
    }
}
