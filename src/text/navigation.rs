//! Caret geometry and navigation over a computed layout
//!
//! Maps between display-text offsets, pixel positions and (line, column)
//! pairs. Every function takes a [`TextLayout`] computed for the current
//! document; stale offsets are clamped, never rejected.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::renderers::layout_engine::{GlyphPlacement, TextLayout};

/// Direction for up/down caret movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalDirection {
    Up,
    Down,
}

/// Caret position expressed as visual line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

/// Pixel position (left edge, baseline) of the caret at `offset`
pub fn offset_to_point(layout: &TextLayout, offset: usize) -> (f32, f32) {
    let placement = layout.placement(offset);
    (placement.x, placement.y)
}

/// Offset under a pixel position
///
/// An exact hit (vertical band and horizontal span both contain the point)
/// wins. Otherwise the line is the one whose band contains `y`, or the one
/// with the nearest baseline, and `x` is clamped to that line: left of the
/// first placement gives the line start, right of the last gives the last
/// placement on the line.
pub fn point_to_offset(layout: &TextLayout, x: f32, y: f32) -> usize {
    if let Some(hit) = layout
        .placements
        .iter()
        .find(|p| p.band_contains(y) && p.span_contains(x))
    {
        return hit.offset;
    }

    let line = layout
        .placements
        .iter()
        .find(|p| p.band_contains(y))
        .or_else(|| {
            layout
                .placements
                .iter()
                .min_by(|a, b| (a.y - y).abs().total_cmp(&(b.y - y).abs()))
        })
        .map_or(0, |p| p.line);

    let mut on_line = layout.line_placements(line).peekable();
    let Some(first) = on_line.peek().copied() else {
        return layout.text_len();
    };
    if x < first.x {
        return first.offset;
    }
    on_line
        .take_while(|p| p.x <= x)
        .last()
        .map_or(first.offset, |p| p.offset)
}

/// Visual line and column of an offset
pub fn line_col(layout: &TextLayout, offset: usize) -> LineCol {
    let placement = layout.placement(offset);
    let line_start = layout.line_range(placement.line).start;
    LineCol {
        line: placement.line,
        col: placement.offset - line_start,
    }
}

/// Offset for a visual line and column, clamped to the line
pub fn offset_at_line_col(layout: &TextLayout, pos: LineCol) -> usize {
    let line = pos.line.min(layout.last_line());
    let range = layout.line_range(line);
    (range.start + pos.col).min(range.end.saturating_sub(1).max(range.start))
}

/// Offset reached by moving one visual line up or down
///
/// Picks the placement on the adjacent line whose x is closest to the
/// caret's x. Moving up from the first line goes to the document start;
/// moving down from the last line goes to the document end.
pub fn move_vertical(layout: &TextLayout, offset: usize, direction: VerticalDirection) -> usize {
    let current = layout.placement(offset.min(layout.text_len()));
    let target_line = match direction {
        VerticalDirection::Up if current.line == 0 => return 0,
        VerticalDirection::Up => current.line - 1,
        VerticalDirection::Down if current.line >= layout.last_line() => return layout.text_len(),
        VerticalDirection::Down => current.line + 1,
    };
    nearest_on_line(layout, target_line, current.x).map_or(current.offset, |p| p.offset)
}

fn nearest_on_line(layout: &TextLayout, line: usize, x: f32) -> Option<&GlyphPlacement> {
    layout
        .line_placements(line)
        .min_by(|a, b| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
}

/// First offset of the visual line holding `offset`
pub fn line_start(layout: &TextLayout, offset: usize) -> usize {
    layout.line_range(layout.placement(offset).line).start
}

/// Last caret stop of the visual line holding `offset`
pub fn line_end(layout: &TextLayout, offset: usize) -> usize {
    let range = layout.line_range(layout.placement(offset).line);
    range.end.saturating_sub(1).max(range.start)
}

/// Alphanumeric word around an offset (empty range when there is none)
pub fn word_bounds(text: &str, offset: usize) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    let offset = offset.min(chars.len());
    let mut left = offset;
    let mut right = offset;
    while left > 0 && chars[left - 1].is_alphanumeric() {
        left -= 1;
    }
    while right < chars.len() && chars[right].is_alphanumeric() {
        right += 1;
    }
    left..right
}
