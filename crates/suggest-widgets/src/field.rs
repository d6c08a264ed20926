#![forbid(unsafe_code)]

//! The search field controller.
//!
//! [`SearchField`] owns the query text, the candidate set, the ranked
//! results, the selection, and the stopped-typing timer, and sequences them
//! on every input:
//!
//! ```text
//! text change ─► query ─► rank ─► inline completion ─► prefix pre-select ─► redraw
//!      │
//!      └─► restart debounce ─(800 ms quiet)─► StoppedTyping
//! ```
//!
//! Input arrives either as toolkit-neutral [`FieldEvent`]s (hosts with their
//! own text widget) or as terminal [`Event`]s through
//! [`handle_input`](SearchField::handle_input), which edits the built-in
//! [`FieldBuffer`]. Outputs are queued as [`FieldAction`]s and drained by the
//! host. Programmatic writes to the text (inline completion, committing a
//! row) never feed back into the text-change pipeline.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use suggest_widgets::field::{FieldAction, FieldEvent, SearchField};
//!
//! let mut field = SearchField::new();
//! field.set_candidates(["Apple", "Apricot", "Banana"]);
//!
//! let t0 = Instant::now();
//! field.handle_event(&FieldEvent::text("Ap"), t0);
//! assert_eq!(field.results().len(), 2);
//!
//! field.poll(t0 + Duration::from_millis(800));
//! let actions = field.drain_actions();
//! assert!(actions.contains(&FieldAction::StoppedTyping { text: "Ap".into() }));
//! ```

use std::ops::Range;
use std::time::Instant;

use suggest_core::debounce::{Debouncer, STOPPED_TYPING_INTERVAL};
use suggest_core::event::{Event, KeyCode, KeyEvent};

use crate::buffer::{BufferChange, FieldBuffer};
use crate::candidate::Candidate;
use crate::config::FieldConfig;
use crate::inline::{grapheme_len, should_preselect, InlineCompleter};
use crate::matcher::{rank, MatchMode, RankedResults};
use crate::selection::{CommitOutcome, Direction, SelectionController, SelectionState};
use crate::style::{Style, Theme};
use crate::view::{PanelView, PanelVisibility};

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Toolkit-neutral input to a [`SearchField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// The host's text widget changed. `selection` is in grapheme indices;
    /// an empty range is a bare caret.
    TextChanged {
        /// Full field text.
        text: String,
        /// Caret or selection.
        selection: Range<usize>,
    },
    /// The field gained focus.
    FocusGained,
    /// The field lost focus.
    FocusLost,
    /// Arrow-key navigation.
    Navigate(Direction),
    /// Enter.
    Confirm,
    /// Escape.
    Dismiss,
    /// Pointer click on visible row `i`.
    RowClicked(usize),
    /// Pointer click outside the panel.
    ClickOutside,
    /// The host replaced the candidate set.
    CandidatesReplaced(Vec<Candidate>),
}

impl FieldEvent {
    /// A text change with the caret at the end.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = grapheme_len(&text);
        Self::TextChanged {
            text,
            selection: end..end,
        }
    }
}

/// Output from a [`SearchField`], drained with [`SearchField::drain_actions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// A row was committed. Never emitted for the automatic pre-selection.
    Selected(Candidate),
    /// No text change for the stopped-typing interval. Carries the query.
    StoppedTyping {
        /// The query at the time the timer fired.
        text: String,
    },
    /// The panel or field needs repainting.
    Redraw,
}

// ---------------------------------------------------------------------------
// SearchField
// ---------------------------------------------------------------------------

/// Autocomplete controller for one single-line field.
#[derive(Debug, Clone)]
pub struct SearchField {
    config: FieldConfig,
    theme: Theme,
    highlight_style: Style,
    buffer: FieldBuffer,
    candidates: Vec<Candidate>,
    results: RankedResults,
    inline: InlineCompleter,
    selection: SelectionController,
    debounce: Debouncer,
    /// Asked to show via focus, typing, or `show_panel`.
    panel_requested: bool,
    focused: bool,
    loading: bool,
    interacted: bool,
    actions: Vec<FieldAction>,
    needs_redraw: bool,
}

impl Default for SearchField {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchField {
    /// A field with default configuration and no candidates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            theme: Theme::default(),
            highlight_style: Style::default_highlight(),
            buffer: FieldBuffer::new(),
            candidates: Vec::new(),
            results: RankedResults::empty(),
            inline: InlineCompleter::new(),
            selection: SelectionController::new(),
            debounce: Debouncer::new(STOPPED_TYPING_INTERVAL),
            panel_requested: false,
            focused: false,
            loading: false,
            interacted: false,
            actions: Vec::new(),
            needs_redraw: false,
        }
    }

    // --- Builder methods ---

    /// Set the configuration (builder).
    #[must_use]
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self.results.set_limit(config.max_results);
        self
    }

    /// Set the theme (builder).
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the highlight style (builder).
    #[must_use]
    pub fn with_highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    /// Set the initial candidates (builder).
    #[must_use]
    pub fn with_candidates<I>(mut self, candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Candidate>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    // --- Accessors ---

    /// Current configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Current theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Current highlight style.
    pub fn highlight_style(&self) -> Style {
        self.highlight_style
    }

    /// Full field text.
    pub fn value(&self) -> &str {
        self.buffer.value()
    }

    /// Text used for matching (before the selection start).
    pub fn query(&self) -> &str {
        self.buffer.query()
    }

    /// The built-in text buffer.
    pub fn buffer(&self) -> &FieldBuffer {
        &self.buffer
    }

    /// The candidate set.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Results of the last pass (uncapped length via `len`).
    pub fn results(&self) -> &RankedResults {
        &self.results
    }

    /// Selection state.
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    /// Whether the next confirm is swallowed by the pre-selection.
    pub fn suppress_next_commit(&self) -> bool {
        self.selection.suppress_next_commit()
    }

    /// Whether the field has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the loading indicator is on.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the user has changed the text since creation.
    pub fn interacted_with(&self) -> bool {
        self.interacted
    }

    /// Panel visibility, decided on the uncapped match count.
    pub fn panel_visibility(&self) -> PanelVisibility {
        if !self.panel_requested {
            PanelVisibility::Hidden
        } else if self.results.is_empty() {
            PanelVisibility::VisibleEmpty
        } else {
            PanelVisibility::VisibleWithResults
        }
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> PanelView {
        PanelView::build(
            self.panel_visibility(),
            self.results.visible(),
            self.results.len(),
            self.selection.active_index(),
            self.loading,
            self.theme,
            self.highlight_style,
            self.config.max_list_height,
        )
    }

    /// When the pending stopped-typing timer is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    // --- Host operations ---

    /// Replace the candidate set and re-run the current pass.
    ///
    /// Does not restart the stopped-typing timer.
    pub fn set_candidates<I>(&mut self, candidates: I)
    where
        I: IntoIterator,
        I::Item: Into<Candidate>,
    {
        self.replace_candidates(candidates.into_iter().map(Into::into).collect());
    }

    /// Request the panel and list every candidate (show-all pass).
    ///
    /// Rows containing the query stay highlighted. Used after an async fetch
    /// whose results need not contain the typed text.
    pub fn show_panel(&mut self) {
        self.panel_requested = true;
        self.show_all();
        self.request_redraw();
    }

    /// Hide the panel. Results are kept.
    pub fn hide_panel(&mut self) {
        if self.panel_requested {
            self.panel_requested = false;
            self.request_redraw();
        }
    }

    /// Turn the loading indicator on.
    pub fn show_loading_indicator(&mut self) {
        self.set_loading(true);
    }

    /// Turn the loading indicator off.
    pub fn stop_loading_indicator(&mut self) {
        self.set_loading(false);
    }

    /// Replace the configuration. A new cap applies to the current results.
    pub fn set_config(&mut self, config: FieldConfig) {
        suggest_core::debug!(
            max_results = config.max_results,
            max_list_height = config.max_list_height,
            start_visible = config.start_visible,
            "field config changed"
        );
        self.config = config;
        self.results.set_limit(config.max_results);
        self.selection.set_row_count(self.results.visible_len());
        self.request_redraw();
    }

    /// Replace the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.request_redraw();
    }

    /// Edit the theme in place.
    pub fn update_theme(&mut self, f: impl FnOnce(&mut Theme)) {
        f(&mut self.theme);
        self.request_redraw();
    }

    /// Replace the highlight style.
    pub fn set_highlight_style(&mut self, style: Style) {
        self.highlight_style = style;
        self.request_redraw();
    }

    /// Write the text without running the text-change pipeline.
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.buffer.set_value(text);
        self.request_redraw();
    }

    /// Fire the stopped-typing timer if due. Returns `true` if it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.debounce.poll(now) {
            return false;
        }
        let text = self.buffer.query().to_owned();
        suggest_core::debug!(query = text.as_str(), "stopped typing");
        self.actions.push(FieldAction::StoppedTyping { text });
        true
    }

    /// Take queued actions. A pending redraw is reported once, last.
    pub fn drain_actions(&mut self) -> Vec<FieldAction> {
        let mut actions = std::mem::take(&mut self.actions);
        if std::mem::take(&mut self.needs_redraw) {
            actions.push(FieldAction::Redraw);
        }
        actions
    }

    // --- Event handling ---

    /// Handle a toolkit-neutral event. Returns `true` if anything changed.
    pub fn handle_event(&mut self, event: &FieldEvent, now: Instant) -> bool {
        match event {
            FieldEvent::TextChanged { text, selection } => {
                self.buffer
                    .set_value_with_selection(text.as_str(), selection.clone());
                self.text_changed(now);
                true
            }
            FieldEvent::FocusGained => {
                self.focus_gained();
                true
            }
            FieldEvent::FocusLost => {
                self.focus_lost();
                true
            }
            FieldEvent::Navigate(direction) => self.navigate(*direction),
            FieldEvent::Confirm => self.confirm(),
            FieldEvent::Dismiss => {
                self.selection.deselect();
                let was_shown = self.panel_requested;
                self.hide_panel();
                was_shown
            }
            FieldEvent::RowClicked(index) => {
                // Only drawn rows can be clicked.
                if !self.panel_visibility().shows_rows() {
                    return false;
                }
                match self.selection.click(*index) {
                    Some(index) => {
                        self.commit_row(index);
                        true
                    }
                    None => false,
                }
            }
            FieldEvent::ClickOutside => {
                self.selection.deselect();
                self.hide_panel();
                self.request_redraw();
                true
            }
            FieldEvent::CandidatesReplaced(candidates) => {
                self.replace_candidates(candidates.clone());
                true
            }
        }
    }

    /// Handle a terminal event against the built-in buffer.
    ///
    /// Returns `true` if anything changed. `Event::Tick` polls the timer.
    pub fn handle_input(&mut self, event: &Event, now: Instant) -> bool {
        match event {
            Event::Key(key) if key.is_actionable() => self.handle_key(key, now),
            Event::Paste(paste) => {
                if self.buffer.insert_str(&paste.text) {
                    self.text_changed(now);
                    true
                } else {
                    false
                }
            }
            Event::Focus(true) => self.handle_event(&FieldEvent::FocusGained, now),
            Event::Focus(false) => self.handle_event(&FieldEvent::FocusLost, now),
            Event::Resize { .. } => {
                self.request_redraw();
                true
            }
            Event::Tick => self.poll(now),
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        match key.code {
            KeyCode::Up => self.navigate(Direction::Up),
            KeyCode::Down => self.navigate(Direction::Down),
            KeyCode::Enter => self.confirm(),
            KeyCode::Escape => self.handle_event(&FieldEvent::Dismiss, now),
            KeyCode::Tab => self.accept_first(),
            _ => match self.buffer.handle_key(key) {
                BufferChange::Edited => {
                    self.text_changed(now);
                    true
                }
                BufferChange::CaretMoved => {
                    self.request_redraw();
                    true
                }
                BufferChange::Unchanged => false,
            },
        }
    }

    // --- Pipeline ---

    fn text_changed(&mut self, now: Instant) {
        let _span = suggest_core::debug_span!("text_changed").entered();
        self.interacted = true;
        self.panel_requested = true;
        self.debounce.restart(now);
        if self.buffer.query().is_empty() {
            self.clear_results();
        } else {
            self.refilter();
        }
        self.request_redraw();
    }

    /// Prefix pass, inline completion, then pre-selection.
    fn refilter(&mut self) {
        // Captured before completion rewrites the text.
        let query = self.buffer.query().to_owned();
        let results = rank(&self.candidates, &query, MatchMode::PREFIX)
            .with_limit(self.config.max_results);
        self.replace_results(results);

        if self.config.inline_completion {
            if let Some(completion) = self.inline.complete(&self.results, &query) {
                self.buffer
                    .set_value_with_selection(completion.text, completion.selection);
            }
            // The list may have been rebuilt under a stale query: only
            // pre-select when the top row still extends what was typed.
            if should_preselect(&self.results, &query) {
                self.selection.auto_select_first();
            }
        } else if !self.results.is_empty() {
            self.inline.observe(&query);
        }

        suggest_core::debug!(
            query = query.as_str(),
            prefix_count = self.results.prefix_count(),
            total = self.results.len(),
            shown = self.results.visible_len(),
            "refilter"
        );
    }

    /// Every candidate in source order; no completion or pre-selection.
    fn show_all(&mut self) {
        let results = rank(&self.candidates, self.buffer.query(), MatchMode::SHOW_ALL)
            .with_limit(self.config.max_results);
        self.replace_results(results);
    }

    fn replace_results(&mut self, results: RankedResults) {
        self.results = results;
        self.selection.reset(self.results.visible_len());
    }

    fn clear_results(&mut self) {
        self.replace_results(RankedResults::empty().with_limit(self.config.max_results));
    }

    fn replace_candidates(&mut self, candidates: Vec<Candidate>) {
        suggest_core::debug!(count = candidates.len(), "candidates replaced");
        self.candidates = candidates;
        if !self.buffer.query().is_empty() {
            self.refilter();
        } else if self.config.start_visible && self.panel_requested {
            self.show_all();
        } else {
            self.clear_results();
        }
        self.request_redraw();
    }

    fn focus_gained(&mut self) {
        self.focused = true;
        if self.config.start_visible {
            self.panel_requested = true;
            self.show_all();
        }
        self.request_redraw();
    }

    fn focus_lost(&mut self) {
        self.focused = false;
        self.panel_requested = false;
        self.clear_results();
        self.request_redraw();
    }

    fn navigate(&mut self, direction: Direction) -> bool {
        if !self.panel_requested {
            // Down re-opens a dismissed panel that still has results.
            if direction == Direction::Down && !self.results.is_empty() {
                self.panel_requested = true;
                self.request_redraw();
                return true;
            }
            return false;
        }
        let moved = self.selection.navigate(direction);
        if moved {
            self.request_redraw();
        }
        moved
    }

    fn confirm(&mut self) -> bool {
        let outcome = if self.panel_visibility().shows_rows() {
            self.selection.confirm()
        } else {
            CommitOutcome::Nothing
        };
        let changed = match outcome {
            CommitOutcome::Commit(index) => {
                self.commit_row(index);
                true
            }
            CommitOutcome::Suppressed => {
                suggest_core::trace!("confirm absorbed by pre-selection");
                self.buffer.collapse_to_end();
                true
            }
            CommitOutcome::Nothing => false,
        };
        let was_shown = self.panel_requested;
        self.selection.deselect();
        self.hide_panel();
        changed || was_shown
    }

    fn accept_first(&mut self) -> bool {
        if !self.panel_visibility().shows_rows() {
            return false;
        }
        match self.selection.click(0) {
            Some(index) => {
                self.commit_row(index);
                true
            }
            None => false,
        }
    }

    fn commit_row(&mut self, index: usize) {
        let Some(candidate) = self.results.get(index).cloned() else {
            return;
        };
        suggest_core::info!(index, title = candidate.title(), "selection committed");
        self.buffer.set_value(candidate.title());
        self.inline.set_baseline(grapheme_len(self.buffer.query()));
        self.actions.push(FieldAction::Selected(candidate));
        if self.config.hide_on_select {
            self.panel_requested = false;
        }
        self.request_redraw();
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.request_redraw();
        }
    }

    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }
}
