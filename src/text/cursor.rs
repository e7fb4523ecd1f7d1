//! Cursor and selection management for text editing
//!
//! Positions are plain character offsets into the display text.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Selection state (anchor + head)
///
/// Order-independent: callers act on [`Selection::range`], which is always
/// `min..max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: usize,
    /// Moving end (follows the caret)
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Collapsed selection (caret only)
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Check if selection is empty (anchor == head)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Normalized range `min..max`
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.range().contains(&offset)
    }
}

/// Detects the click after a double-click that makes a triple-click
///
/// Timestamps come from the host event (milliseconds); the core never reads a
/// clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTracker {
    window_ms: u64,
    double_click_release: Option<u64>,
    pending_double: bool,
}

impl ClickTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            double_click_release: None,
            pending_double: false,
        }
    }

    /// Record a double-click at `time_ms`
    ///
    /// Hosts that deliver the double-click before its release get the window
    /// restarted by [`ClickTracker::on_release`]; hosts that deliver it after
    /// the release count from the double-click itself.
    pub fn on_double_click(&mut self, time_ms: u64) {
        self.double_click_release = Some(time_ms);
        self.pending_double = true;
    }

    /// Record a button release
    pub fn on_release(&mut self, time_ms: u64) {
        if self.pending_double {
            self.double_click_release = Some(time_ms);
        } else {
            self.double_click_release = None;
        }
        self.pending_double = false;
    }

    /// Whether a press at `time_ms` completes a triple-click. Consumes the
    /// pending double-click either way.
    pub fn is_triple_click(&mut self, time_ms: u64) -> bool {
        match self.double_click_release.take() {
            Some(released) => time_ms.saturating_sub(released) <= self.window_ms,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_range() {
        // Forward selection
        let sel = Selection::new(2, 5);
        assert_eq!(sel.range(), 2..5);

        // Backward selection (head < anchor)
        let sel = Selection::new(5, 2);
        assert_eq!(sel.range(), 2..5);
        assert!(sel.contains(2));
        assert!(!sel.contains(5));
    }

    #[test]
    fn test_collapsed_selection_is_empty() {
        assert!(Selection::collapsed(3).is_empty());
        assert!(!Selection::new(3, 4).is_empty());
    }

    #[test]
    fn test_triple_click_within_window() {
        let mut clicks = ClickTracker::new(500);
        clicks.on_double_click(900);
        clicks.on_release(1_000);
        assert!(clicks.is_triple_click(1_300));
        // consumed
        assert!(!clicks.is_triple_click(1_350));
    }

    #[test]
    fn test_triple_click_too_slow_or_without_double() {
        let mut clicks = ClickTracker::new(500);
        clicks.on_double_click(900);
        clicks.on_release(1_000);
        assert!(!clicks.is_triple_click(1_600));

        clicks.on_release(2_000);
        assert!(!clicks.is_triple_click(2_100));
    }

    #[test]
    fn test_double_click_after_release() {
        let mut clicks = ClickTracker::new(500);
        clicks.on_release(1_000);
        clicks.on_double_click(1_010);
        assert!(clicks.is_triple_click(1_400));
    }
}
