//! Font metrics providers for the layout engine
//!
//! The layout engine never talks to a font backend. It asks a [`FontMetrics`]
//! implementation for advances and vertical extents, keyed by the format set
//! of the fragment being laid out. The host measures glyphs with the real font
//! and hands the numbers over as a [`MeasuredMetrics`] table;
//! [`FixedWidthMetrics`] gives exact, font-free numbers for tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{FormatKind, FormatSet};

/// Vertical metrics of one font style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontExtents {
    /// Distance from baseline to the top of the tallest glyph
    pub ascent: f32,
    /// Distance from baseline to the bottom of the lowest glyph
    pub descent: f32,
    /// Font height (ascent + descent + leading)
    pub height: f32,
}

impl Default for FontExtents {
    fn default() -> Self {
        Self {
            ascent: 13.0,
            descent: 4.0,
            height: 17.0,
        }
    }
}

/// Width and extent lookups for a format set
pub trait FontMetrics {
    /// Advance of a single character
    fn char_width(&self, formats: &FormatSet, ch: char) -> f32;

    /// Advance of a whole word or whitespace run
    fn text_width(&self, formats: &FormatSet, text: &str) -> f32 {
        text.chars().map(|ch| self.char_width(formats, ch)).sum()
    }

    /// Vertical metrics
    fn extents(&self, formats: &FormatSet) -> FontExtents;
}

impl<M: FontMetrics + ?Sized> FontMetrics for &M {
    fn char_width(&self, formats: &FormatSet, ch: char) -> f32 {
        (**self).char_width(formats, ch)
    }

    fn text_width(&self, formats: &FormatSet, text: &str) -> f32 {
        (**self).text_width(formats, text)
    }

    fn extents(&self, formats: &FormatSet) -> FontExtents {
        (**self).extents(formats)
    }
}

impl<M: FontMetrics + ?Sized> FontMetrics for Box<M> {
    fn char_width(&self, formats: &FormatSet, ch: char) -> f32 {
        (**self).char_width(formats, ch)
    }

    fn text_width(&self, formats: &FormatSet, text: &str) -> f32 {
        (**self).text_width(formats, text)
    }

    fn extents(&self, formats: &FormatSet) -> FontExtents {
        (**self).extents(formats)
    }
}

// ============================================================================
// Fixed-width provider
// ============================================================================

/// Every character advances by the same amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthMetrics {
    pub char_width: f32,
    /// Extra advance per character for bold text
    pub bold_extra: f32,
    pub extents: FontExtents,
}

impl FixedWidthMetrics {
    pub fn new(char_width: f32) -> Self {
        Self {
            char_width,
            bold_extra: 0.0,
            extents: FontExtents::default(),
        }
    }

    pub fn with_bold_extra(mut self, extra: f32) -> Self {
        self.bold_extra = extra;
        self
    }

    pub fn with_extents(mut self, extents: FontExtents) -> Self {
        self.extents = extents;
        self
    }
}

impl Default for FixedWidthMetrics {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl FontMetrics for FixedWidthMetrics {
    fn char_width(&self, formats: &FormatSet, _ch: char) -> f32 {
        if formats.contains(FormatKind::Bold) {
            self.char_width + self.bold_extra
        } else {
            self.char_width
        }
    }

    fn extents(&self, _formats: &FormatSet) -> FontExtents {
        self.extents
    }
}

// ============================================================================
// Host-measured provider
// ============================================================================

/// Advance for characters the host did not measure
pub const DEFAULT_FALLBACK_WIDTH: f32 = 12.0;

/// Measured widths for one font style (regular, bold, italic, bold italic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleMetrics {
    /// Width per character, as measured by the host
    pub char_widths: HashMap<char, f32>,
    /// Width used for characters missing from the table
    pub fallback_width: f32,
    pub extents: Option<FontExtents>,
}

impl Default for StyleMetrics {
    fn default() -> Self {
        Self {
            char_widths: HashMap::new(),
            fallback_width: DEFAULT_FALLBACK_WIDTH,
            extents: None,
        }
    }
}

/// Widths measured by the host with the real font
///
/// Underline and strikethrough do not change advances, so only the
/// bold/italic combination selects a style table. Missing styles fall back
/// to `regular`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeasuredMetrics {
    pub regular: StyleMetrics,
    pub bold: Option<StyleMetrics>,
    pub italic: Option<StyleMetrics>,
    pub bold_italic: Option<StyleMetrics>,
    /// Extents used when a style table has none
    pub extents: FontExtents,
}

impl MeasuredMetrics {
    fn style(&self, formats: &FormatSet) -> &StyleMetrics {
        let bold = formats.contains(FormatKind::Bold);
        let italic = formats.contains(FormatKind::Italic);
        let chosen = match (bold, italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref()),
            (true, false) => self.bold.as_ref(),
            (false, true) => self.italic.as_ref(),
            (false, false) => None,
        };
        chosen.unwrap_or(&self.regular)
    }
}

impl FontMetrics for MeasuredMetrics {
    fn char_width(&self, formats: &FormatSet, ch: char) -> f32 {
        let style = self.style(formats);
        style
            .char_widths
            .get(&ch)
            .copied()
            .unwrap_or(style.fallback_width)
    }

    fn extents(&self, formats: &FormatSet) -> FontExtents {
        self.style(formats).extents.unwrap_or(self.extents)
    }
}
