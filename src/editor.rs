//! Rich-text note editor
//!
//! `RichTextEditor` owns the editor state, the layout engine and a cached
//! layout, and turns host input (commands, mouse events, persistence calls)
//! into edit engine operations. All calls run to completion on the caller's
//! thread.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::models::{interchange, Document, EditorState, FormatKind};
use crate::renderers::font_metrics::FontMetrics;
use crate::renderers::layout_engine::{LayoutConfig, LayoutEngine, TextLayout};
use crate::renderers::markers::encode;
use crate::text::cursor::{ClickTracker, Selection};
use crate::text::edit::{self, BackspaceOutcome, BackspacePolicy, CopyResult};
use crate::text::navigation::{self, VerticalDirection};

/// Editor settings
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub layout: LayoutConfig,

    /// Max delay between a double-click and the press that makes it a
    /// triple-click
    pub triple_click_window_ms: u64,

    pub backspace_policy: BackspacePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            triple_click_window_ms: 500,
            backspace_policy: BackspacePolicy::default(),
        }
    }
}

/// Callbacks into the embedding widget
pub trait EditorHost {
    /// Called after every mutation with the baseline y of the caret line
    fn scroll_to_reveal(&mut self, y: f32);
}

/// Keyboard-level editor command
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum EditorCommand {
    /// Typed text
    Text { text: String },
    /// Space, followed by a marker formatting pass
    Space,
    /// Paragraph break
    Enter,
    /// Line break (Shift+Enter)
    SoftBreak,
    Backspace,
    Left { #[serde(default)] extend: bool },
    Right { #[serde(default)] extend: bool },
    Up { #[serde(default)] extend: bool },
    Down { #[serde(default)] extend: bool },
    /// Start of the visual line
    Home { #[serde(default)] extend: bool },
    /// End of the visual line
    End { #[serde(default)] extend: bool },
    SelectAll,
    Copy,
    Cut,
    Paste { text: String },
}

/// Result of a command
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CommandResult {
    /// Whether the document changed
    pub changed: bool,
    /// Clipboard payload for copy and cut
    pub clipboard: Option<CopyResult>,
}

impl CommandResult {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            clipboard: None,
        }
    }
}

/// Editor façade over the fragment store, layout and edit engines
pub struct RichTextEditor<M: FontMetrics> {
    state: EditorState,
    engine: LayoutEngine<M>,
    config: EditorConfig,
    /// Last layout with the fingerprint of the content and config it was
    /// computed for
    cache: Option<(u64, TextLayout)>,
    clicks: ClickTracker,
    dragging: bool,
    host: Option<Box<dyn EditorHost>>,
}

impl<M: FontMetrics> RichTextEditor<M> {
    pub fn new(metrics: M, config: EditorConfig) -> Self {
        let clicks = ClickTracker::new(config.triple_click_window_ms);
        Self {
            state: EditorState::default(),
            engine: LayoutEngine::new(metrics),
            config,
            cache: None,
            clicks,
            dragging: false,
            host: None,
        }
    }

    pub fn set_host(&mut self, host: Box<dyn EditorHost>) {
        self.host = Some(host);
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn selection(&self) -> Option<Selection> {
        self.state.active_selection()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn display_text(&self) -> String {
        self.state.document.display_text()
    }

    /// Document re-encoded as marker text
    pub fn marker_text(&self) -> String {
        encode(self.state.document.fragments())
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// Resize the editing area
    pub fn set_width(&mut self, width: f32) {
        self.config.layout.width = width;
    }

    pub fn set_metrics(&mut self, metrics: M) {
        self.engine.set_metrics(metrics);
        self.cache = None;
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.state.document.hash(&mut hasher);
        let layout = &self.config.layout;
        for value in [
            layout.width,
            layout.margin_left,
            layout.margin_top,
            layout.margin_right,
            layout.line_spacing,
            layout.tab_width_in_spaces,
        ] {
            value.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Layout for the current document and width, computed on first use
    pub fn layout(&mut self) -> &TextLayout {
        let key = self.fingerprint();
        if matches!(&self.cache, Some((cached, _)) if *cached == key) {
            log::trace!("Layout cache hit");
        } else {
            self.cache = None;
        }

        let engine = &self.engine;
        let document = &self.state.document;
        let config = &self.config.layout;
        &self
            .cache
            .get_or_insert_with(|| (key, engine.compute_layout(document, config)))
            .1
    }

    /// Height the widget needs to show every line
    pub fn content_height(&mut self) -> f32 {
        self.layout().content_height
    }

    /// Caret position (left edge, baseline)
    pub fn caret_point(&mut self) -> (f32, f32) {
        let cursor = self.state.cursor;
        navigation::offset_to_point(self.layout(), cursor)
    }

    fn notify_host(&mut self) {
        if self.host.is_none() {
            return;
        }
        let (_, y) = self.caret_point();
        if let Some(host) = self.host.as_mut() {
            host.scroll_to_reveal(y);
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Dispatch one keyboard command
    pub fn handle_command(&mut self, command: EditorCommand) -> CommandResult {
        self.state.validate_cursor();
        let result = match command {
            EditorCommand::Text { text } => {
                edit::insert_text(&mut self.state, &text);
                CommandResult::changed(!text.is_empty())
            }
            EditorCommand::Space => {
                edit::insert_text(&mut self.state, " ");
                edit::apply_formatting_by_markers(&mut self.state);
                CommandResult::changed(true)
            }
            EditorCommand::Enter => {
                edit::insert_text(&mut self.state, "\n\n");
                CommandResult::changed(true)
            }
            EditorCommand::SoftBreak => {
                edit::insert_text(&mut self.state, "\n");
                CommandResult::changed(true)
            }
            EditorCommand::Backspace => {
                let outcome = edit::backspace(&mut self.state, self.config.backspace_policy);
                CommandResult::changed(outcome != BackspaceOutcome::Nothing)
            }
            EditorCommand::Left { extend } => {
                let target = match self.state.active_selection() {
                    Some(sel) if !extend => sel.start(),
                    _ => self.state.cursor.saturating_sub(1),
                };
                self.move_caret(target, extend);
                CommandResult::default()
            }
            EditorCommand::Right { extend } => {
                let target = match self.state.active_selection() {
                    Some(sel) if !extend => sel.end(),
                    _ => (self.state.cursor + 1).min(self.state.document.char_len()),
                };
                self.move_caret(target, extend);
                CommandResult::default()
            }
            EditorCommand::Up { extend } => {
                self.move_vertical(VerticalDirection::Up, extend);
                CommandResult::default()
            }
            EditorCommand::Down { extend } => {
                self.move_vertical(VerticalDirection::Down, extend);
                CommandResult::default()
            }
            EditorCommand::Home { extend } => {
                let cursor = self.state.cursor;
                let target = navigation::line_start(self.layout(), cursor);
                self.move_caret(target, extend);
                CommandResult::default()
            }
            EditorCommand::End { extend } => {
                let cursor = self.state.cursor;
                let target = navigation::line_end(self.layout(), cursor);
                self.move_caret(target, extend);
                CommandResult::default()
            }
            EditorCommand::SelectAll => {
                self.select_all();
                CommandResult::default()
            }
            EditorCommand::Copy => CommandResult {
                changed: false,
                clipboard: edit::copy_selection(&self.state),
            },
            EditorCommand::Cut => {
                let clipboard = edit::cut_selection(&mut self.state);
                CommandResult {
                    changed: clipboard.is_some(),
                    clipboard,
                }
            }
            EditorCommand::Paste { text } => {
                edit::paste(&mut self.state, &text);
                CommandResult::changed(!text.is_empty())
            }
        };

        if result.changed {
            self.notify_host();
        }
        result
    }

    /// Place the caret, growing the selection from its anchor when `extend`
    fn move_caret(&mut self, target: usize, extend: bool) {
        let target = target.min(self.state.document.char_len());
        if extend {
            let anchor = self
                .state
                .selection
                .map_or(self.state.cursor, |sel| sel.anchor);
            self.state.selection = Some(Selection::new(anchor, target));
            self.state.cursor = target;
        } else {
            self.state.set_cursor(target);
        }
    }

    /// Up/Down. Without Shift an active selection only collapses to its
    /// start (Up) or end (Down).
    fn move_vertical(&mut self, direction: VerticalDirection, extend: bool) {
        if let Some(sel) = self.state.active_selection().filter(|_| !extend) {
            let target = match direction {
                VerticalDirection::Up => sel.start(),
                VerticalDirection::Down => sel.end(),
            };
            self.move_caret(target, false);
            return;
        }
        let cursor = self.state.cursor;
        let target = navigation::move_vertical(self.layout(), cursor, direction);
        self.move_caret(target, extend);
    }

    pub fn select_all(&mut self) {
        let len = self.state.document.char_len();
        self.state.selection = Some(Selection::new(0, len));
        self.state.cursor = len;
    }

    // ------------------------------------------------------------------------
    // Mouse
    // ------------------------------------------------------------------------

    /// Button press: place the caret and start a drag selection, or select
    /// everything when it completes a triple-click
    pub fn mouse_press(&mut self, x: f32, y: f32, time_ms: u64) {
        if self.clicks.is_triple_click(time_ms) {
            self.select_all();
            self.dragging = false;
            return;
        }
        let offset = navigation::point_to_offset(self.layout(), x, y);
        self.state.cursor = offset;
        self.state.selection = Some(Selection::collapsed(offset));
        self.dragging = true;
    }

    /// Pointer move with the button held
    pub fn mouse_drag(&mut self, x: f32, y: f32) {
        if !self.dragging {
            return;
        }
        let offset = navigation::point_to_offset(self.layout(), x, y);
        let anchor = self
            .state
            .selection
            .map_or(self.state.cursor, |sel| sel.anchor);
        self.state.selection = Some(Selection::new(anchor, offset));
        self.state.cursor = offset;
    }

    pub fn mouse_release(&mut self, time_ms: u64) {
        self.dragging = false;
        self.clicks.on_release(time_ms);
    }

    /// Select the word under the pointer
    pub fn double_click(&mut self, x: f32, y: f32, time_ms: u64) {
        let offset = navigation::point_to_offset(self.layout(), x, y);
        let word = navigation::word_bounds(&self.state.document.display_text(), offset);
        if !word.is_empty() {
            self.state.selection = Some(Selection::new(word.start, word.end));
            self.state.cursor = word.end;
        }
        self.dragging = false;
        self.clicks.on_double_click(time_ms);
    }

    /// Offset under a pixel position
    pub fn hit_test(&mut self, x: f32, y: f32) -> usize {
        navigation::point_to_offset(self.layout(), x, y)
    }

    // ------------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------------

    pub fn apply_format(&mut self, kind: FormatKind) -> bool {
        let changed = edit::apply_format(&mut self.state, kind);
        if changed {
            self.notify_host();
        }
        changed
    }

    pub fn remove_format(&mut self, kind: FormatKind) -> bool {
        let changed = edit::remove_format(&mut self.state, kind);
        if changed {
            self.notify_host();
        }
        changed
    }

    /// Expose markers: the selected slices when there is a selection,
    /// otherwise the formatted fragment at the caret
    pub fn unformat(&mut self) -> bool {
        let changed = if self.state.has_selection() {
            edit::unformat_selection(&mut self.state)
        } else {
            edit::unformat_at_cursor(&mut self.state)
        };
        if changed {
            self.notify_host();
        }
        changed
    }

    pub fn apply_formatting_by_markers(&mut self) -> bool {
        let changed = edit::apply_formatting_by_markers(&mut self.state);
        if changed {
            self.notify_host();
        }
        changed
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Replace the document from interchange JSON; malformed input becomes
    /// plain text
    pub fn load_json(&mut self, input: &str) {
        self.state = edit::load_interchange(input);
        self.notify_host();
    }

    /// Interchange JSON for the current document
    pub fn to_json(&self) -> String {
        match interchange::to_json(&self.state.document) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize note: {}", e);
                "[]".to_string()
            }
        }
    }

    /// Replace the document with marker text and apply its formatting
    pub fn set_marker_text(&mut self, text: &str) {
        edit::set_marker_text(&mut self.state, text);
        self.notify_host();
    }
}
