//! Fragment store: the authoritative document state
//!
//! A document is an ordered sequence of fragments. Every mutation rebuilds the
//! sequence and finishes with [`Document::merge`], which restores the two
//! invariants:
//!
//! - the sequence is never empty (an empty document is one empty plain fragment)
//! - no two adjacent fragments are both unformatted

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::fragment::{char_slice, Fragment};

/// Ordered sequence of fragments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Fragment>", into = "Vec<Fragment>")]
pub struct Document {
    fragments: Vec<Fragment>,
}

impl Document {
    /// Empty document: a single empty plain fragment
    pub fn new() -> Self {
        Self {
            fragments: vec![Fragment::plain("")],
        }
    }

    /// Document from fragments, normalized
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let mut doc = Self { fragments };
        doc.merge();
        doc
    }

    /// Document holding one plain fragment
    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_fragments(vec![Fragment::plain(text)])
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Replace the whole sequence, then normalize
    pub fn set_fragments(&mut self, fragments: Vec<Fragment>) {
        self.fragments = fragments;
        self.merge();
    }

    /// Concatenation of all fragment texts
    pub fn display_text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Display text length in characters
    pub fn char_len(&self) -> usize {
        self.fragments.iter().map(Fragment::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.text.is_empty())
    }

    /// Collapse the sequence so it satisfies the store invariants
    ///
    /// Empty fragments are dropped, consecutive plain fragments are joined,
    /// formatted fragments pass through untouched.
    pub fn merge(&mut self) {
        let mut merged: Vec<Fragment> = Vec::with_capacity(self.fragments.len());
        let mut buffer = String::new();

        for frag in self.fragments.drain(..) {
            if frag.text.is_empty() {
                continue;
            }
            if frag.is_plain() {
                buffer.push_str(&frag.text);
            } else {
                if !buffer.is_empty() {
                    merged.push(Fragment::plain(std::mem::take(&mut buffer)));
                }
                merged.push(frag);
            }
        }
        if !buffer.is_empty() {
            merged.push(Fragment::plain(buffer));
        }
        if merged.is_empty() {
            merged.push(Fragment::plain(""));
        }

        self.fragments = merged;
    }

    /// Whether the store invariants hold
    pub fn is_normalized(&self) -> bool {
        !self.fragments.is_empty()
            && self
                .fragments
                .windows(2)
                .all(|pair| !(pair[0].is_plain() && pair[1].is_plain()))
    }

    /// Character range of each fragment within the display text
    pub fn spans(&self) -> impl Iterator<Item = (Range<usize>, &Fragment)> + '_ {
        let mut acc = 0;
        self.fragments.iter().map(move |frag| {
            let start = acc;
            acc += frag.char_len();
            (start..acc, frag)
        })
    }

    /// Fragment that receives text typed at `offset`, with the local offset
    ///
    /// The first fragment whose end is at or after the offset wins, so a caret
    /// on a boundary belongs to the fragment on its left. `None` when the
    /// offset is past the end of the text.
    pub fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        self.spans()
            .enumerate()
            .find(|(_, (span, _))| offset <= span.end)
            .map(|(index, (span, _))| (index, offset - span.start))
    }

    /// Slices of every fragment overlapping `range`, formats preserved
    pub fn slices(&self, range: Range<usize>) -> Vec<Fragment> {
        self.spans()
            .filter(|(span, _)| span.end > range.start && span.start < range.end)
            .map(|(span, frag)| {
                let left = range.start.saturating_sub(span.start);
                let right = range.end.min(span.end) - span.start;
                frag.slice(left, right)
            })
            .filter(|frag| !frag.text.is_empty())
            .collect()
    }

    /// Fragments with `range` cut out; partially covered fragments keep their
    /// surviving left and right slices
    pub fn without_range(&self, range: Range<usize>) -> Vec<Fragment> {
        let mut kept = Vec::with_capacity(self.fragments.len());
        for (span, frag) in self.spans() {
            if span.end <= range.start || span.start >= range.end {
                kept.push(frag.clone());
                continue;
            }
            let len = span.end - span.start;
            let left = range.start.saturating_sub(span.start);
            let right = span.end.saturating_sub(range.end);
            if left > 0 {
                kept.push(frag.slice(0, left));
            }
            if right > 0 {
                kept.push(frag.slice(len - right, len));
            }
        }
        kept
    }

    /// Split into the fragments before and after `offset`
    pub fn split_at(&self, offset: usize) -> (Vec<Fragment>, Vec<Fragment>) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        for (span, frag) in self.spans() {
            if span.end <= offset {
                before.push(frag.clone());
            } else if span.start >= offset {
                after.push(frag.clone());
            } else {
                let local = offset - span.start;
                let text = &frag.text;
                before.push(Fragment::new(char_slice(text, 0, local), frag.formats.clone()));
                after.push(Fragment::new(
                    char_slice(text, local, span.end - span.start),
                    frag.formats.clone(),
                ));
            }
        }
        (before, after)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Fragment>> for Document {
    fn from(fragments: Vec<Fragment>) -> Self {
        Self::from_fragments(fragments)
    }
}

impl From<Document> for Vec<Fragment> {
    fn from(doc: Document) -> Self {
        doc.fragments
    }
}
