//! Edit engine: mutations of the fragment store
//!
//! Every operation rebuilds the fragment sequence from the current one and
//! hands it back through [`Document::set_fragments`], which restores the
//! store invariants. Caret and selection are updated alongside; stale offsets
//! are clamped first.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::models::fragment::byte_index;
use crate::models::interchange::{self, FragmentRecord};
use crate::models::{Document, EditorState, FormatKind, FormatSet, Fragment};
use crate::parse::markers::decode_fragments;
use crate::renderers::markers::{encode, unformat_fragment};

/// What a plain backspace (no selection, nothing to un-format) rebuilds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackspacePolicy {
    /// Remove the character from its own fragment; other formatting survives
    #[default]
    LocalFragment,
    /// Rebuild the whole document as one plain fragment, dropping all
    /// formatting; whitespace-only results reset to the empty document
    CollapseDocument,
}

/// What a backspace ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackspaceOutcome {
    DeletedSelection,
    Unformatted,
    DeletedChar,
    Nothing,
}

/// Logical clipboard payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    /// Marker text for the external clipboard
    pub text: String,
    /// Structured records of the copied slices
    pub fragments: Vec<FragmentRecord>,
}

fn selection_range(state: &EditorState) -> Option<Range<usize>> {
    let len = state.document.char_len();
    state.active_selection().map(|sel| {
        let range = sel.range();
        range.start.min(len)..range.end.min(len)
    })
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Join neighbours that carry exactly the same formats
fn coalesce(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut out: Vec<Fragment> = Vec::with_capacity(fragments.len());
    for frag in fragments.into_iter().filter(|f| !f.text.is_empty()) {
        match out.last_mut() {
            Some(last) if last.formats == frag.formats => last.text.push_str(&frag.text),
            _ => out.push(frag),
        }
    }
    out
}

// ============================================================================
// Insertion and deletion
// ============================================================================

/// Insert typed text at the caret
///
/// An active selection is deleted first. Text lands in the fragment holding
/// the caret (the left one on a boundary); at the very end of a document
/// whose last fragment is formatted it starts a new plain fragment.
pub fn insert_text(state: &mut EditorState, text: &str) {
    if text.is_empty() {
        return;
    }
    delete_selection(state);
    state.validate_cursor();

    let offset = state.cursor;
    let total = state.document.char_len();
    let mut fragments = state.document.fragments().to_vec();

    match state.document.locate(offset) {
        Some((index, local)) if !(offset == total && !fragments[index].is_plain()) => {
            let frag = &mut fragments[index];
            let at = byte_index(&frag.text, local);
            frag.text.insert_str(at, text);
        }
        _ => fragments.push(Fragment::plain(text)),
    }

    state.document.set_fragments(fragments);
    state.cursor = offset + char_count(text);
    state.clear_selection();
}

/// Delete the selected range. Returns false when nothing is selected.
pub fn delete_selection(state: &mut EditorState) -> bool {
    let Some(range) = selection_range(state) else {
        return false;
    };
    let kept = state.document.without_range(range.clone());
    state.document.set_fragments(kept);
    state.cursor = range.start;
    state.clear_selection();
    true
}

/// Backspace: delete the selection, peel a format, or delete one character
pub fn backspace(state: &mut EditorState, policy: BackspacePolicy) -> BackspaceOutcome {
    if delete_selection(state) {
        return BackspaceOutcome::DeletedSelection;
    }
    state.clear_selection();
    state.validate_cursor();
    if unformat_at_cursor(state) {
        return BackspaceOutcome::Unformatted;
    }
    if state.cursor == 0 {
        return BackspaceOutcome::Nothing;
    }

    let target = state.cursor - 1;
    match policy {
        BackspacePolicy::LocalFragment => {
            let fragments = state
                .document
                .spans()
                .map(|(span, frag)| {
                    if span.contains(&target) {
                        let local = target - span.start;
                        let mut text = frag.text.clone();
                        let at = byte_index(&text, local);
                        text.remove(at);
                        Fragment::new(text, frag.formats.clone())
                    } else {
                        frag.clone()
                    }
                })
                .collect();
            state.document.set_fragments(fragments);
            state.cursor = target;
        }
        BackspacePolicy::CollapseDocument => {
            let mut text = state.document.display_text();
            let at = byte_index(&text, target);
            text.remove(at);
            if text.trim().is_empty() {
                state.document = Document::new();
                state.cursor = 0;
            } else {
                state.document = Document::plain(text);
                state.cursor = target;
            }
        }
    }
    BackspaceOutcome::DeletedChar
}

// ============================================================================
// Un-format
// ============================================================================

/// Turn the formatted fragment at the caret back into raw marker text
///
/// Applies when the caret is at the start, inside, or at the end of a
/// formatted fragment (the first such fragment wins). The caret ends up
/// right before the closing markers.
pub fn unformat_at_cursor(state: &mut EditorState) -> bool {
    let pos = state.cursor;
    let Some((index, start)) = state
        .document
        .spans()
        .enumerate()
        .find(|(_, (span, frag))| !frag.is_plain() && span.start <= pos && pos <= span.end)
        .map(|(index, (span, _))| (index, span.start))
    else {
        return false;
    };

    let mut fragments = state.document.fragments().to_vec();
    let (plain, caret) = unformat_fragment(&fragments[index]);
    log::debug!("Un-formatting fragment {} into {:?}", index, plain.text);
    fragments[index] = plain;

    state.document.set_fragments(fragments);
    state.cursor = start + caret;
    state.clear_selection();
    true
}

/// Re-expose markers for every formatted slice inside the selection
///
/// Parts of a fragment outside the selection keep their formats. The caret
/// lands before the closing markers of the first un-formatted slice.
pub fn unformat_selection(state: &mut EditorState) -> bool {
    let Some(range) = selection_range(state) else {
        return false;
    };

    let mut fragments = Vec::new();
    let mut new_offset = 0;
    let mut caret = None;

    for (span, frag) in state.document.spans() {
        let overlaps = span.end > range.start && span.start < range.end;
        if !overlaps || frag.is_plain() {
            new_offset += frag.char_len();
            fragments.push(frag.clone());
            continue;
        }

        let len = span.end - span.start;
        let left = range.start.saturating_sub(span.start);
        let right = range.end.min(span.end) - span.start;

        let before = frag.slice(0, left);
        let (exposed, local_caret) = unformat_fragment(&frag.slice(left, right));
        let after = frag.slice(right, len);

        new_offset += before.char_len();
        caret.get_or_insert(new_offset + local_caret);
        new_offset += exposed.char_len() + after.char_len();

        fragments.extend([before, exposed, after]);
    }

    let Some(caret) = caret else {
        return false;
    };
    state.document.set_fragments(fragments);
    state.cursor = caret;
    state.clear_selection();
    true
}

// ============================================================================
// Formatting
// ============================================================================

/// Re-scan plain fragments for complete marker pairs
///
/// When anything was decoded the caret moves to the end of the text.
pub fn apply_formatting_by_markers(state: &mut EditorState) -> bool {
    let result = decode_fragments(state.document.fragments());
    if !result.found_marker {
        return false;
    }
    state.document.set_fragments(result.fragments);
    state.cursor = state.document.char_len();
    state.clear_selection();
    true
}

fn restyle_selection(state: &mut EditorState, restyle: impl Fn(&mut FormatSet) -> bool) -> bool {
    let Some(range) = selection_range(state) else {
        return false;
    };

    let mut changed = false;
    let mut fragments = Vec::new();
    for (span, frag) in state.document.spans() {
        if span.end <= range.start || span.start >= range.end {
            fragments.push(frag.clone());
            continue;
        }
        let len = span.end - span.start;
        let left = range.start.saturating_sub(span.start);
        let right = range.end.min(span.end) - span.start;

        let mut middle = frag.slice(left, right);
        changed |= restyle(&mut middle.formats);
        fragments.extend([frag.slice(0, left), middle, frag.slice(right, len)]);
    }

    if changed {
        state.document.set_fragments(coalesce(fragments));
    }
    changed
}

/// Add a format to every selected slice. The selection is kept.
pub fn apply_format(state: &mut EditorState, kind: FormatKind) -> bool {
    restyle_selection(state, |formats| formats.insert(kind))
}

/// Strip a format from every selected slice. The selection is kept.
pub fn remove_format(state: &mut EditorState, kind: FormatKind) -> bool {
    restyle_selection(state, |formats| formats.remove(kind))
}

// ============================================================================
// Clipboard
// ============================================================================

/// Marker text and records for the selected slices
pub fn copy_selection(state: &EditorState) -> Option<CopyResult> {
    let range = selection_range(state)?;
    let slices = state.document.slices(range);
    Some(CopyResult {
        text: encode(&slices),
        fragments: interchange::to_records(&slices),
    })
}

/// Copy, then delete the selection
pub fn cut_selection(state: &mut EditorState) -> Option<CopyResult> {
    let copied = copy_selection(state)?;
    delete_selection(state);
    Some(copied)
}

/// Paste text as one new plain fragment at the caret
///
/// Markers in the pasted text stay literal until the next marker pass.
pub fn paste(state: &mut EditorState, text: &str) {
    if text.is_empty() {
        return;
    }
    delete_selection(state);
    state.validate_cursor();

    let offset = state.cursor;
    let (mut fragments, after) = state.document.split_at(offset);
    fragments.push(Fragment::plain(text));
    fragments.extend(after);

    state.document.set_fragments(fragments);
    state.cursor = offset + char_count(text);
    state.clear_selection();
}

// ============================================================================
// Whole-document replacement
// ============================================================================

/// State loaded from interchange JSON
///
/// Malformed input never fails: it becomes one plain fragment holding the
/// input verbatim, with the caret at the end.
pub fn load_interchange(input: &str) -> EditorState {
    match interchange::from_json(input) {
        Ok(document) => EditorState::at_end(document),
        Err(e) => {
            log::warn!("Falling back to plain text for unreadable note data: {}", e);
            EditorState::at_end(Document::plain(input))
        }
    }
}

/// Replace the document with marker text and apply its formatting
pub fn set_marker_text(state: &mut EditorState, text: &str) {
    *state = EditorState::at_end(Document::plain(text));
    apply_formatting_by_markers(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::cursor::Selection;

    fn state(fragments: Vec<Fragment>, cursor: usize) -> EditorState {
        let mut state = EditorState::new(Document::from_fragments(fragments));
        state.cursor = cursor;
        state
    }

    fn bold(text: &str) -> Fragment {
        Fragment::styled(text, &[FormatKind::Bold])
    }

    #[test]
    fn test_insert_into_plain_fragment() {
        let mut s = state(vec![Fragment::plain("ab")], 1);
        insert_text(&mut s, "c");
        assert_eq!(s.document.fragments(), &[Fragment::plain("acb")]);
        assert_eq!(s.cursor, 2);
    }

    #[test]
    fn test_insert_on_boundary_extends_left_fragment() {
        let mut s = state(vec![bold("ab"), Fragment::plain("cd")], 2);
        insert_text(&mut s, "x");
        assert_eq!(s.document.fragments(), &[bold("abx"), Fragment::plain("cd")]);
    }

    #[test]
    fn test_insert_after_trailing_formatted_fragment_is_plain() {
        let mut s = state(vec![Fragment::plain("a "), bold("b")], 3);
        insert_text(&mut s, " c");
        assert_eq!(
            s.document.fragments(),
            &[Fragment::plain("a "), bold("b"), Fragment::plain(" c")]
        );
        assert_eq!(s.cursor, 5);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut s = state(vec![Fragment::plain("abcdef")], 0);
        s.selection = Some(Selection::new(4, 1));
        insert_text(&mut s, "X");
        assert_eq!(s.document.display_text(), "aXef");
        assert_eq!(s.cursor, 2);
    }

    #[test]
    fn test_delete_selection_scenario() {
        let mut s = state(vec![Fragment::plain("abcdef")], 0);
        s.selection = Some(Selection::new(2, 5));
        assert!(delete_selection(&mut s));
        assert_eq!(s.document.display_text(), "abf");
        assert_eq!(s.cursor, 2);
        assert!(s.selection.is_none());
    }

    #[test]
    fn test_delete_selection_trims_partial_fragments() {
        let mut s = state(vec![Fragment::plain("ab"), bold("cde"), Fragment::plain("fg")], 0);
        s.selection = Some(Selection::new(1, 6));
        delete_selection(&mut s);
        assert_eq!(s.document.fragments(), &[Fragment::plain("ag")]);
        assert!(s.document.is_normalized());
    }

    #[test]
    fn test_delete_everything_leaves_empty_document() {
        let mut s = state(vec![bold("abc")], 0);
        s.selection = Some(Selection::new(0, 3));
        delete_selection(&mut s);
        assert_eq!(s.document, Document::new());
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn test_backspace_peels_format_at_end() {
        let mut s = state(vec![Fragment::plain("a "), bold("hi")], 4);
        assert_eq!(backspace(&mut s, BackspacePolicy::default()), BackspaceOutcome::Unformatted);
        assert_eq!(s.document.fragments(), &[Fragment::plain("a **hi**")]);
        // before the closing "**"
        assert_eq!(s.cursor, 6);
    }

    #[test]
    fn test_backspace_peels_format_from_start() {
        let mut s = state(vec![Fragment::plain("ab"), Fragment::styled("c", &[FormatKind::Strikethrough])], 2);
        assert_eq!(backspace(&mut s, BackspacePolicy::default()), BackspaceOutcome::Unformatted);
        assert_eq!(s.document.display_text(), "ab~~c~~");
        assert_eq!(s.cursor, 5);
    }

    #[test]
    fn test_backspace_peels_format_from_inside() {
        let mut s = state(vec![bold("abcd")], 2);
        assert_eq!(backspace(&mut s, BackspacePolicy::default()), BackspaceOutcome::Unformatted);
        assert_eq!(s.document.fragments(), &[Fragment::plain("**abcd**")]);
        assert_eq!(s.cursor, 6);

        let mut s = state(vec![Fragment::plain("x "), bold("abcd"), Fragment::plain(" y")], 4);
        assert_eq!(backspace(&mut s, BackspacePolicy::LocalFragment), BackspaceOutcome::Unformatted);
        assert_eq!(s.document.fragments(), &[Fragment::plain("x **abcd** y")]);
        assert_eq!(s.cursor, 8);
    }

    #[test]
    fn test_backspace_local_keeps_other_formatting() {
        let mut s = state(vec![bold("x"), Fragment::plain(" abc")], 4);
        assert_eq!(backspace(&mut s, BackspacePolicy::LocalFragment), BackspaceOutcome::DeletedChar);
        assert_eq!(s.document.fragments(), &[bold("x"), Fragment::plain(" ac")]);
        assert_eq!(s.cursor, 3);
    }

    #[test]
    fn test_backspace_collapse_drops_all_formatting() {
        let mut s = state(vec![bold("x"), Fragment::plain(" abc")], 4);
        backspace(&mut s, BackspacePolicy::CollapseDocument);
        assert_eq!(s.document.fragments(), &[Fragment::plain("x ac")]);
        assert_eq!(s.cursor, 3);

        let mut s = state(vec![Fragment::plain(" a")], 2);
        backspace(&mut s, BackspacePolicy::CollapseDocument);
        assert_eq!(s.document, Document::new());
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn test_backspace_at_start_does_nothing() {
        let mut s = state(vec![Fragment::plain("abc")], 0);
        assert_eq!(backspace(&mut s, BackspacePolicy::default()), BackspaceOutcome::Nothing);
        assert_eq!(s.document.display_text(), "abc");
    }

    #[test]
    fn test_unformat_selection_keeps_outer_parts() {
        let mut s = state(vec![Fragment::plain("a"), bold("bcd")], 0);
        s.selection = Some(Selection::new(2, 3));
        assert!(unformat_selection(&mut s));
        assert_eq!(
            s.document.fragments(),
            &[Fragment::plain("a"), bold("b"), Fragment::plain("**c**"), bold("d")]
        );
        assert_eq!(s.cursor, 5);
    }

    #[test]
    fn test_apply_formatting_by_markers_moves_caret_to_end() {
        let mut s = state(vec![Fragment::plain("say **hi** now")], 3);
        assert!(apply_formatting_by_markers(&mut s));
        assert_eq!(
            s.document.fragments(),
            &[Fragment::plain("say "), bold("hi"), Fragment::plain(" now")]
        );
        assert_eq!(s.cursor, 10);

        let snapshot = s.clone();
        assert!(!apply_formatting_by_markers(&mut s));
        assert_eq!(s, snapshot);
    }

    #[test]
    fn test_apply_and_remove_format() {
        let mut s = state(vec![Fragment::plain("abcd")], 0);
        s.selection = Some(Selection::new(1, 3));
        assert!(apply_format(&mut s, FormatKind::Underline));
        let underline = Fragment::styled("bc", &[FormatKind::Underline]);
        assert_eq!(
            s.document.fragments(),
            &[Fragment::plain("a"), underline, Fragment::plain("d")]
        );
        assert!(!apply_format(&mut s, FormatKind::Underline));

        assert!(remove_format(&mut s, FormatKind::Underline));
        assert_eq!(s.document.fragments(), &[Fragment::plain("abcd")]);
    }

    #[test]
    fn test_apply_format_coalesces_equal_neighbours() {
        let mut s = state(vec![bold("ab"), Fragment::plain("cd")], 0);
        s.selection = Some(Selection::new(2, 4));
        apply_format(&mut s, FormatKind::Bold);
        assert_eq!(s.document.fragments(), &[bold("abcd")]);
    }

    #[test]
    fn test_copy_builds_marker_text() {
        let mut s = state(vec![Fragment::plain("x "), bold("bold"), Fragment::plain(" y")], 0);
        s.selection = Some(Selection::new(1, 7));
        let copied = copy_selection(&s).unwrap();
        assert_eq!(copied.text, " **bold** ");
        assert_eq!(copied.fragments.len(), 3);
        assert_eq!(s.document.display_text(), "x bold y");
    }

    #[test]
    fn test_cut_removes_selection() {
        let mut s = state(vec![Fragment::plain("hello")], 0);
        s.selection = Some(Selection::new(0, 2));
        let copied = cut_selection(&mut s).unwrap();
        assert_eq!(copied.text, "he");
        assert_eq!(s.document.display_text(), "llo");
    }

    #[test]
    fn test_paste_splits_formatted_fragment_without_decoding() {
        let mut s = state(vec![bold("abcd")], 2);
        paste(&mut s, "*x*");
        assert_eq!(
            s.document.fragments(),
            &[bold("ab"), Fragment::plain("*x*"), bold("cd")]
        );
        assert_eq!(s.cursor, 5);
    }

    #[test]
    fn test_load_interchange_fallback() {
        let s = load_interchange("not json");
        assert_eq!(s.document.fragments(), &[Fragment::plain("not json")]);
        assert_eq!(s.cursor, 8);
    }

    #[test]
    fn test_set_marker_text() {
        let mut s = EditorState::default();
        set_marker_text(&mut s, "~~old~~ new");
        assert_eq!(
            s.document.fragments(),
            &[Fragment::styled("old", &[FormatKind::Strikethrough]), Fragment::plain(" new")]
        );
        assert_eq!(s.cursor, 7);
    }
}
