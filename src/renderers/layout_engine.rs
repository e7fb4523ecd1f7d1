//! Layout Engine - positions every character of the display text
//!
//! Takes the fragment sequence, the available width and a metrics provider,
//! and produces one [`GlyphPlacement`] per display-text offset plus a final
//! virtual placement where the caret rests after the last character.
//!
//! Wrapping is greedy and whitespace-granular: a word that does not fit on the
//! current line moves to the next one, but a word is never split, even when it
//! is wider than the whole line. Whitespace runs never trigger a wrap; they
//! hang past the right edge and the next word wraps instead. Tabs advance by a
//! fixed width and `\n` always starts a new line.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::font_metrics::{FontExtents, FontMetrics};
use crate::models::{Document, FormatSet};

/// Width of the caret placement after the last character
const VIRTUAL_PLACEMENT_WIDTH: f32 = 2.0;

/// Configuration for layout calculations
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Width of the editing area in pixels
    pub width: f32,

    /// Left margin in pixels (x of every line start)
    pub margin_left: f32,

    /// Baseline y of the first line
    pub margin_top: f32,

    /// Right margin in pixels
    pub margin_right: f32,

    /// Added to the font height to get the line height
    pub line_spacing: f32,

    /// Tab advance, in multiples of the space width
    pub tab_width_in_spaces: f32,
}

impl LayoutConfig {
    /// Layout config with the default margins and the given width
    pub fn with_width(width: f32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Wrap limit a token may not cross (unless it starts a line)
    ///
    /// Compared against pen positions that already include `margin_left`.
    pub fn max_text_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            margin_left: 10.0,
            margin_top: 30.0,
            margin_right: 10.0,
            line_spacing: 4.0,
            tab_width_in_spaces: 6.0,
        }
    }
}

// ============================================================================
// Output types
// ============================================================================

/// Position and size assigned to one display-text offset
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlyphPlacement {
    /// Offset into the display text
    pub offset: usize,

    /// Character at this offset (`None` for the virtual end placement)
    pub ch: Option<char>,

    /// Left edge
    pub x: f32,

    /// Baseline
    pub y: f32,

    /// Advance
    pub width: f32,

    /// Visual line index, counting wrapped lines
    pub line: usize,

    pub ascent: f32,
    pub descent: f32,

    /// Index of the fragment this character belongs to
    pub fragment: Option<usize>,

    pub is_tab: bool,
    pub is_virtual: bool,
}

impl GlyphPlacement {
    /// Vertical band `y - ascent ..= y + descent` contains `target_y`
    pub fn band_contains(&self, target_y: f32) -> bool {
        self.y - self.ascent <= target_y && target_y <= self.y + self.descent
    }

    /// Horizontal span `x .. x + width` contains `target_x`
    pub fn span_contains(&self, target_x: f32) -> bool {
        self.x <= target_x && target_x < self.x + self.width
    }
}

/// Result of a layout pass
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextLayout {
    /// One placement per offset, then the virtual end placement
    pub placements: Vec<GlyphPlacement>,

    pub line_count: usize,

    pub line_height: f32,

    /// Height the widget needs to show every line
    pub content_height: f32,
}

impl TextLayout {
    /// Virtual placement at `offset = len(display text)`
    pub fn end_placement(&self) -> &GlyphPlacement {
        // Never empty: compute_layout always appends the virtual placement
        &self.placements[self.placements.len() - 1]
    }

    /// Placement for an offset, falling back to the end placement
    pub fn placement(&self, offset: usize) -> &GlyphPlacement {
        self.placements
            .get(offset)
            .unwrap_or_else(|| self.end_placement())
    }

    /// Display text length covered by this layout
    pub fn text_len(&self) -> usize {
        self.end_placement().offset
    }

    pub fn last_line(&self) -> usize {
        self.line_count.saturating_sub(1)
    }

    /// Placements on a visual line, in offset order
    pub fn line_placements(&self, line: usize) -> impl Iterator<Item = &GlyphPlacement> + '_ {
        self.placements.iter().filter(move |p| p.line == line)
    }

    /// Offsets on a visual line (first..=last placement)
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let mut placements = self.line_placements(line);
        match placements.next() {
            Some(first) => {
                let last = placements.last().map_or(first.offset, |p| p.offset);
                first.offset..last + 1
            }
            None => {
                let end = self.text_len();
                end..end
            }
        }
    }

    /// Baseline y of a visual line
    pub fn line_y(&self, line: usize) -> Option<f32> {
        self.line_placements(line).next().map(|p| p.y)
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

/// Token kinds the layout pass distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Space,
    Tab,
    Newline,
}

/// A run of fragment text handled as one unit by the wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lazy tokenizer over one fragment's text
///
/// Words and whitespace runs come out as separate tokens. Tabs and newlines
/// are always single-character tokens.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

fn classify(ch: char) -> TokenKind {
    match ch {
        '\n' => TokenKind::Newline,
        '\t' => TokenKind::Tab,
        c if c.is_whitespace() => TokenKind::Space,
        _ => TokenKind::Word,
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let kind = classify(first);
        let len = match kind {
            TokenKind::Newline | TokenKind::Tab => first.len_utf8(),
            TokenKind::Word | TokenKind::Space => self
                .rest
                .char_indices()
                .find(|(_, c)| classify(*c) != kind)
                .map_or(self.rest.len(), |(i, _)| i),
        };
        let (text, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(Token { kind, text })
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Running pen position during a layout pass
struct Pen {
    x: f32,
    y: f32,
    line: usize,
    offset: usize,
}

/// Main layout engine, parameterized over the metrics provider
#[derive(Debug, Clone)]
pub struct LayoutEngine<M> {
    metrics: M,
}

impl<M: FontMetrics> LayoutEngine<M> {
    pub fn new(metrics: M) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: M) {
        self.metrics = metrics;
    }

    /// Height of one line for the base font
    pub fn line_height(&self, config: &LayoutConfig) -> f32 {
        self.metrics.extents(&FormatSet::new()).height + config.line_spacing
    }

    /// Lay out the whole document
    pub fn compute_layout(&self, document: &Document, config: &LayoutConfig) -> TextLayout {
        let plain = FormatSet::new();
        let base = self.metrics.extents(&plain);
        let line_height = base.height + config.line_spacing;
        let tab_width = self.metrics.char_width(&plain, ' ') * config.tab_width_in_spaces;
        let limit = config.max_text_width();

        let mut placements = Vec::with_capacity(document.char_len() + 1);
        let mut pen = Pen {
            x: config.margin_left,
            y: config.margin_top,
            line: 0,
            offset: 0,
        };

        for (index, fragment) in document.fragments().iter().enumerate() {
            let formats = &fragment.formats;
            let extents = self.metrics.extents(formats);
            let mut place = |pen: &mut Pen, ch: char, width: f32, is_tab: bool| {
                placements.push(GlyphPlacement {
                    offset: pen.offset,
                    ch: Some(ch),
                    x: pen.x,
                    y: pen.y,
                    width,
                    line: pen.line,
                    ascent: extents.ascent,
                    descent: extents.descent,
                    fragment: Some(index),
                    is_tab,
                    is_virtual: false,
                });
                pen.x += width;
                pen.offset += 1;
            };

            for token in tokenize(&fragment.text) {
                match token.kind {
                    TokenKind::Newline => {
                        place(&mut pen, '\n', 0.0, false);
                        pen.x = config.margin_left;
                        pen.y += line_height;
                        pen.line += 1;
                    }
                    TokenKind::Tab => place(&mut pen, '\t', tab_width, true),
                    TokenKind::Space | TokenKind::Word => {
                        let token_width = self.metrics.text_width(formats, token.text);
                        if pen.x + token_width > limit && pen.x > config.margin_left {
                            pen.x = config.margin_left;
                            pen.y += line_height;
                            pen.line += 1;
                        }
                        for ch in token.text.chars() {
                            let width = self.metrics.char_width(formats, ch);
                            place(&mut pen, ch, width, false);
                        }
                    }
                }
            }
        }

        placements.push(virtual_placement(&pen, base));
        log::trace!(
            "Layout computed: {} placements on {} lines",
            placements.len(),
            pen.line + 1
        );

        TextLayout {
            placements,
            line_count: pen.line + 1,
            line_height,
            content_height: pen.y + base.height,
        }
    }
}

fn virtual_placement(pen: &Pen, extents: FontExtents) -> GlyphPlacement {
    GlyphPlacement {
        offset: pen.offset,
        ch: None,
        x: pen.x,
        y: pen.y,
        width: VIRTUAL_PLACEMENT_WIDTH,
        line: pen.line,
        ascent: extents.ascent,
        descent: extents.descent,
        fragment: None,
        is_tab: false,
        is_virtual: true,
    }
}
