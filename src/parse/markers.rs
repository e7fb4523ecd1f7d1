//! Recursive descent marker decoder
//!
//! Scans marker text against a fixed precedence table. At each scan position
//! the leftmost match among all patterns wins; when two patterns start at the
//! same position the one listed first wins. The plain run before a match keeps
//! the active formats, the inner text of the match is parsed again with the
//! pattern's formats added, and scanning resumes after the match.
//!
//! Asterisk spans nest: while looking for the closing marker of `*`, `**` or
//! `***`, a run of asterisks of the closing length closes the span and any
//! other run must open a balanced inner span, so `**~~*x*~~**` is bold around
//! struck italic. For the other patterns the inner text may not contain the
//! marker character itself. Neither rule needs backtracking.

use std::ops::Range;

use crate::models::{Document, FormatKind, FormatSet, Fragment};

/// One delimiter pair in the precedence table
#[derive(Debug, Clone, Copy)]
pub struct MarkerPattern {
    pub open: &'static str,
    pub close: &'static str,
    /// Character the inner text may not contain
    pub forbidden: char,
    pub formats: &'static [FormatKind],
}

/// Precedence table, tested in this order at every position
pub const MARKER_PATTERNS: [MarkerPattern; 6] = [
    MarkerPattern {
        open: "***",
        close: "***",
        forbidden: '*',
        formats: &[FormatKind::Bold, FormatKind::Italic],
    },
    MarkerPattern {
        open: "__",
        close: "__",
        forbidden: '_',
        formats: &[FormatKind::Underline],
    },
    MarkerPattern {
        open: "**",
        close: "**",
        forbidden: '*',
        formats: &[FormatKind::Bold],
    },
    MarkerPattern {
        open: "*",
        close: "*",
        forbidden: '*',
        formats: &[FormatKind::Italic],
    },
    MarkerPattern {
        open: "~~",
        close: "~~",
        forbidden: '~',
        formats: &[FormatKind::Strikethrough],
    },
    // Accepted on input only; the encoder always writes `*x*`
    MarkerPattern {
        open: "_",
        close: "_",
        forbidden: '_',
        formats: &[FormatKind::Italic],
    },
];

/// A located marker pair (byte offsets into the scanned text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    pub start: usize,
    pub end: usize,
    pub inner: Range<usize>,
    pub pattern: usize,
}

/// Fragments produced by a decode, plus whether any marker pair was consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    pub fragments: Vec<Fragment>,
    pub found_marker: bool,
}

impl MarkerPattern {
    /// Match of this pattern starting exactly at byte `pos`
    fn match_at(&self, text: &str, pos: usize) -> Option<MarkerMatch> {
        let rest = &text[pos..];
        if !rest.starts_with(self.open) {
            return None;
        }
        let inner_start = pos + self.open.len();
        let inner_end = if self.forbidden == '*' {
            balanced_close(text, inner_start, self.close)?
        } else {
            let inner_len = text[inner_start..].find(self.forbidden)?;
            if inner_len == 0 || !text[inner_start + inner_len..].starts_with(self.close) {
                return None;
            }
            inner_start + inner_len
        };
        Some(MarkerMatch {
            start: pos,
            end: inner_end + self.close.len(),
            inner: inner_start..inner_end,
            pattern: 0,
        })
    }

    /// Leftmost match at or after byte `from`
    fn find(&self, text: &str, from: usize) -> Option<MarkerMatch> {
        text[from..]
            .char_indices()
            .find_map(|(i, _)| self.match_at(text, from + i))
    }
}

fn asterisk_run(text: &str, pos: usize) -> usize {
    text[pos..].bytes().take_while(|b| *b == b'*').count()
}

/// Byte offset of the closing asterisk marker for a span whose inner text
/// starts at `from`
///
/// Runs of a different length open nested spans, which are skipped whole.
fn balanced_close(text: &str, from: usize, close: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(step) = text[pos..].find('*') {
        pos += step;
        let run = asterisk_run(text, pos);
        if run == close.len() {
            // empty spans are literal
            return (pos > from).then_some(pos);
        }
        if run > 3 {
            return None;
        }
        let nested_close = balanced_close(text, pos + run, &text[pos..pos + run])?;
        pos = nested_close + run;
    }
    None
}

/// Nearest match among all patterns at or after byte `from`
pub fn nearest_match(text: &str, from: usize) -> Option<MarkerMatch> {
    let mut nearest: Option<MarkerMatch> = None;
    for (index, pattern) in MARKER_PATTERNS.iter().enumerate() {
        if let Some(mut found) = pattern.find(text, from) {
            found.pattern = index;
            // Strictly smaller start only: earlier table entries win ties
            if nearest.as_ref().map_or(true, |n| found.start < n.start) {
                nearest = Some(found);
            }
        }
    }
    nearest
}

fn parse(text: &str, active: &FormatSet) -> DecodeResult {
    let mut fragments = Vec::new();
    let mut found_marker = false;
    let mut pos = 0;

    while pos < text.len() {
        let Some(found) = nearest_match(text, pos) else {
            fragments.push(Fragment::new(&text[pos..], active.clone()));
            break;
        };

        if found.start > pos {
            fragments.push(Fragment::new(&text[pos..found.start], active.clone()));
        }
        found_marker = true;

        let inner_active = active.extended(MARKER_PATTERNS[found.pattern].formats);
        let inner = parse(&text[found.inner.clone()], &inner_active);
        fragments.extend(inner.fragments);

        pos = found.end;
    }

    DecodeResult {
        fragments,
        found_marker,
    }
}

/// Decode marker text into fragments
pub fn decode_text(text: &str) -> DecodeResult {
    let result = parse(text, &FormatSet::new());
    if !result.found_marker {
        return DecodeResult {
            fragments: vec![Fragment::plain(text)],
            found_marker: false,
        };
    }
    result
}

/// Decode marker text into a normalized document
pub fn decode_document(text: &str) -> Document {
    Document::from_fragments(decode_text(text).fragments)
}

/// Re-parse the plain fragments of a sequence
///
/// Formatted fragments pass through untouched, so decoding an already
/// decoded sequence changes nothing. Plain fragments without complete marker
/// pairs are returned unchanged.
pub fn decode_fragments(fragments: &[Fragment]) -> DecodeResult {
    let mut result = Vec::with_capacity(fragments.len());
    let mut changed = false;

    for frag in fragments {
        if !frag.is_plain() {
            result.push(frag.clone());
            continue;
        }
        let decoded = decode_text(&frag.text);
        if decoded.found_marker {
            log::debug!("Decoded markers in {:?} into {} fragments", frag.text, decoded.fragments.len());
            changed = true;
            result.extend(decoded.fragments);
        } else {
            result.push(frag.clone());
        }
    }

    DecodeResult {
        fragments: result,
        found_marker: changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::markers::encode;

    fn kinds(frag: &Fragment) -> Vec<FormatKind> {
        frag.formats.iter().collect()
    }

    #[test]
    fn test_decode_bold_and_italic() {
        let result = decode_text("**bold** and *italic*");
        assert!(result.found_marker);
        assert_eq!(
            result.fragments,
            vec![
                Fragment::styled("bold", &[FormatKind::Bold]),
                Fragment::plain(" and "),
                Fragment::styled("italic", &[FormatKind::Italic]),
            ]
        );
        assert_eq!(encode(&result.fragments), "**bold** and *italic*");
    }

    #[test]
    fn test_triple_marker_wins_tie() {
        let result = decode_text("***both***");
        assert_eq!(result.fragments.len(), 1);
        assert_eq!(kinds(&result.fragments[0]), vec![FormatKind::Bold, FormatKind::Italic]);
        assert_eq!(result.fragments[0].text, "both");
    }

    #[test]
    fn test_nested_markers_accumulate_formats() {
        let result = decode_text("__**x**__ ~~*y*~~");
        assert_eq!(
            result.fragments,
            vec![
                Fragment::styled("x", &[FormatKind::Underline, FormatKind::Bold]),
                Fragment::plain(" "),
                Fragment::styled("y", &[FormatKind::Strikethrough, FormatKind::Italic]),
            ]
        );
    }

    #[test]
    fn test_nearest_match_beats_precedence() {
        // `~~` starts before `**`, so it is taken first
        let result = decode_text("~~a~~ **b**");
        assert_eq!(kinds(&result.fragments[0]), vec![FormatKind::Strikethrough]);
        assert_eq!(kinds(&result.fragments[2]), vec![FormatKind::Bold]);
    }

    #[test]
    fn test_underscore_italic_accepted() {
        let result = decode_text("an _aside_ here");
        assert_eq!(
            result.fragments,
            vec![
                Fragment::plain("an "),
                Fragment::styled("aside", &[FormatKind::Italic]),
                Fragment::plain(" here"),
            ]
        );
    }

    #[test]
    fn test_no_markers_returns_input_unchanged() {
        let result = decode_text("2 * 3 = 6");
        assert!(!result.found_marker);
        assert_eq!(result.fragments, vec![Fragment::plain("2 * 3 = 6")]);
    }

    #[test]
    fn test_unclosed_and_empty_markers_stay_literal() {
        assert!(!decode_text("**open").found_marker);
        assert!(!decode_text("****").found_marker);
        assert!(!decode_text("~~ ~").found_marker);
    }

    #[test]
    fn test_multibyte_text_around_markers() {
        let result = decode_text("привет **мир**!");
        assert_eq!(
            result.fragments,
            vec![
                Fragment::plain("привет "),
                Fragment::styled("мир", &[FormatKind::Bold]),
                Fragment::plain("!"),
            ]
        );
    }

    #[test]
    fn test_asterisk_spans_nest_around_other_markers() {
        let result = decode_text("a **~~*x*~~** b");
        assert_eq!(
            result.fragments,
            vec![
                Fragment::plain("a "),
                Fragment::styled("x", &[FormatKind::Bold, FormatKind::Strikethrough, FormatKind::Italic]),
                Fragment::plain(" b"),
            ]
        );

        let result = decode_text("*__**x**__*");
        assert_eq!(
            kinds(&result.fragments[0]),
            vec![FormatKind::Italic, FormatKind::Underline, FormatKind::Bold]
        );
    }

    #[test]
    fn test_unbalanced_inner_asterisks_fall_back_to_shorter_match() {
        // `**` never closes, so only `*a*` is italic
        let result = decode_text("**a*b**");
        assert_eq!(
            result.fragments,
            vec![
                Fragment::plain("*"),
                Fragment::styled("a", &[FormatKind::Italic]),
                Fragment::plain("b**"),
            ]
        );
    }

    #[test]
    fn test_decode_fragments_leaves_formatted_alone() {
        let input = vec![
            Fragment::styled("**kept**", &[FormatKind::Italic]),
            Fragment::plain(" then *this*"),
        ];
        let result = decode_fragments(&input);
        assert!(result.found_marker);
        assert_eq!(result.fragments[0], input[0]);
        assert_eq!(result.fragments[2], Fragment::styled("this", &[FormatKind::Italic]));

        let again = decode_fragments(&result.fragments);
        assert!(!again.found_marker);
        assert_eq!(again.fragments, result.fragments);
    }
}
