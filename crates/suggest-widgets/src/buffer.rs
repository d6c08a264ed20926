#![forbid(unsafe_code)]

//! Single-line text buffer behind a search field.
//!
//! Caret and selection are grapheme indices. The buffer knows nothing about
//! matching; it reports whether a key edited the text so the field can run
//! its text-change pipeline only for real edits. Programmatic writes
//! (`set_value*`, `collapse_to_end`) never report anything.

use std::ops::Range;

use suggest_core::event::{KeyCode, KeyEvent, Modifiers};
use unicode_segmentation::UnicodeSegmentation;

/// Effect of a key on the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferChange {
    /// Key not handled, or handled with no effect.
    Unchanged,
    /// Caret or selection moved; text is the same.
    CaretMoved,
    /// Text changed.
    Edited,
}

/// Grapheme-aware text with a caret and an optional selection anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBuffer {
    value: String,
    /// Caret (grapheme index).
    cursor: usize,
    /// Selection spans anchor..cursor (either order) when set.
    selection_anchor: Option<usize>,
}

impl FieldBuffer {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Value access ---

    /// The full text.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Caret position (grapheme index).
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text length in graphemes.
    pub fn len(&self) -> usize {
        self.grapheme_count()
    }

    /// Ordered selection range in graphemes, if a non-empty one exists.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.selection_anchor?;
        let (start, end) = self.selection_range(anchor);
        (start < end).then_some(start..end)
    }

    /// Selected text, if any.
    pub fn selected_text(&self) -> Option<&str> {
        let range = self.selection()?;
        let byte_start = self.grapheme_byte_offset(range.start);
        let byte_end = self.grapheme_byte_offset(range.end);
        Some(&self.value[byte_start..byte_end])
    }

    /// Text before the selection start, or before the caret with no selection.
    ///
    /// An inline-completed suffix is selected, so it never reaches matching.
    pub fn query(&self) -> &str {
        let start = self.selection().map_or(self.cursor, |r| r.start);
        &self.value[..self.grapheme_byte_offset(start)]
    }

    // --- Programmatic writes ---

    /// Replace the text; caret at end, no selection.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = sanitize(value.into());
        self.cursor = self.grapheme_count();
        self.selection_anchor = None;
    }

    /// Replace the text and select `selection` (grapheme indices, clamped).
    ///
    /// The caret ends at the selection end.
    pub fn set_value_with_selection(&mut self, value: impl Into<String>, selection: Range<usize>) {
        self.value = sanitize(value.into());
        let max = self.grapheme_count();
        let end = selection.end.min(max);
        let start = selection.start.min(end);
        self.cursor = end;
        self.selection_anchor = (start < end).then_some(start);
    }

    /// Drop the selection and put the caret at the end.
    pub fn collapse_to_end(&mut self) {
        self.selection_anchor = None;
        self.cursor = self.grapheme_count();
    }

    /// Clear all text.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.selection_anchor = None;
    }

    /// Replace the selection (if any) with `text` at the caret.
    ///
    /// Line breaks become spaces. Returns `true` if the text changed.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let text = sanitize(text.to_owned());
        let deleted = self.delete_selection();
        if text.is_empty() {
            return deleted;
        }
        let byte_offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert_str(byte_offset, &text);
        // Joiners can merge clusters, so recount up to the inserted end.
        self.cursor = self.value[..byte_offset + text.len()].graphemes(true).count();
        true
    }

    // --- Key handling ---

    /// Apply an editing or caret key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> BufferChange {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        let shift = key.modifiers.contains(Modifiers::SHIFT);
        let caret_before = (self.cursor, self.selection_anchor);

        let edited = match key.code {
            KeyCode::Char('a') if ctrl => {
                self.select_all();
                false
            }
            KeyCode::Char(c) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf))
            }
            KeyCode::Backspace => {
                if self.selection().is_some() {
                    self.delete_selection()
                } else {
                    self.selection_anchor = None;
                    if ctrl {
                        self.delete_word_back()
                    } else {
                        self.delete_char_back()
                    }
                }
            }
            KeyCode::Delete => {
                if self.selection().is_some() {
                    self.delete_selection()
                } else {
                    self.selection_anchor = None;
                    if ctrl {
                        self.delete_word_forward()
                    } else {
                        self.delete_char_forward()
                    }
                }
            }
            KeyCode::Left => {
                if ctrl {
                    self.move_cursor_word_left(shift);
                } else if shift {
                    self.ensure_selection_anchor();
                    self.cursor = self.cursor.saturating_sub(1);
                } else {
                    self.move_cursor_left();
                }
                false
            }
            KeyCode::Right => {
                if ctrl {
                    self.move_cursor_word_right(shift);
                } else if shift {
                    self.ensure_selection_anchor();
                    self.cursor = (self.cursor + 1).min(self.grapheme_count());
                } else {
                    self.move_cursor_right();
                }
                false
            }
            KeyCode::Home => {
                self.anchor_for(shift);
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.anchor_for(shift);
                self.cursor = self.grapheme_count();
                false
            }
            _ => return BufferChange::Unchanged,
        };

        if edited {
            BufferChange::Edited
        } else if caret_before != (self.cursor, self.selection_anchor) {
            BufferChange::CaretMoved
        } else {
            BufferChange::Unchanged
        }
    }

    // --- Editing operations ---

    fn delete_char_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(self.cursor - 1);
        let byte_end = self.grapheme_byte_offset(self.cursor);
        self.value.drain(byte_start..byte_end);
        self.cursor -= 1;
        true
    }

    fn delete_char_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(self.cursor);
        let byte_end = self.grapheme_byte_offset(self.cursor + 1);
        self.value.drain(byte_start..byte_end);
        true
    }

    fn delete_word_back(&mut self) -> bool {
        let end = self.cursor;
        self.move_cursor_word_left(false);
        self.delete_between(self.cursor, end)
    }

    fn delete_word_forward(&mut self) -> bool {
        let start = self.cursor;
        self.move_cursor_word_right(false);
        let end = self.cursor;
        self.cursor = start;
        self.delete_between(start, end)
    }

    fn delete_between(&mut self, start: usize, end: usize) -> bool {
        if start >= end {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(start);
        let byte_end = self.grapheme_byte_offset(end);
        self.value.drain(byte_start..byte_end);
        self.cursor = start;
        true
    }

    /// Delete selected text. Returns `true` if anything was removed.
    fn delete_selection(&mut self) -> bool {
        match self.selection_anchor.take() {
            Some(anchor) => {
                let (start, end) = self.selection_range(anchor);
                self.delete_between(start, end)
            }
            None => false,
        }
    }

    // --- Selection ---

    /// Select all text.
    pub fn select_all(&mut self) {
        self.selection_anchor = Some(0);
        self.cursor = self.grapheme_count();
    }

    fn anchor_for(&mut self, shift: bool) {
        if shift {
            self.ensure_selection_anchor();
        } else {
            self.selection_anchor = None;
        }
    }

    fn ensure_selection_anchor(&mut self) {
        if self.selection_anchor.is_none() {
            self.selection_anchor = Some(self.cursor);
        }
    }

    fn selection_range(&self, anchor: usize) -> (usize, usize) {
        if anchor <= self.cursor {
            (anchor, self.cursor)
        } else {
            (self.cursor, anchor)
        }
    }

    // --- Cursor movement ---

    fn move_cursor_left(&mut self) {
        if let Some(anchor) = self.selection_anchor.take() {
            self.cursor = self.cursor.min(anchor);
        } else if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn move_cursor_right(&mut self) {
        if let Some(anchor) = self.selection_anchor.take() {
            self.cursor = self.cursor.max(anchor);
        } else if self.cursor < self.grapheme_count() {
            self.cursor += 1;
        }
    }

    fn move_cursor_word_left(&mut self, select: bool) {
        self.anchor_for(select);
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut pos = self.cursor.min(graphemes.len());
        if pos == 0 {
            return;
        }
        let target = word_class(graphemes[pos - 1]);
        while pos > 0 && word_class(graphemes[pos - 1]) == target {
            pos -= 1;
        }
        self.cursor = pos;
    }

    fn move_cursor_word_right(&mut self, select: bool) {
        self.anchor_for(select);
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let max = graphemes.len();
        let mut pos = self.cursor;
        if pos >= max {
            return;
        }
        let target = word_class(graphemes[pos]);
        while pos < max && word_class(graphemes[pos]) == target {
            pos += 1;
        }
        self.cursor = pos;
    }

    // --- Internal helpers ---

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// 0 = whitespace, 1 = word, 2 = punctuation.
fn word_class(g: &str) -> u8 {
    if g.chars().all(char::is_whitespace) {
        0
    } else if g.chars().any(char::is_alphanumeric) {
        1
    } else {
        2
    }
}

fn sanitize(mut text: String) -> String {
    if text.contains(['\n', '\r']) {
        text = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn typed(text: &str) -> FieldBuffer {
        let mut b = FieldBuffer::new();
        for c in text.chars() {
            b.handle_key(&press(KeyCode::Char(c)));
        }
        b
    }

    #[test]
    fn typing_appends_and_reports_edit() {
        let mut b = typed("Ap");
        assert_eq!(b.handle_key(&press(KeyCode::Char('p'))), BufferChange::Edited);
        assert_eq!(b.value(), "App");
        assert_eq!(b.cursor(), 3);
        assert_eq!(b.query(), "App");
    }

    #[test]
    fn query_excludes_selected_suffix() {
        let mut b = FieldBuffer::new();
        b.set_value_with_selection("Apple", 3..5);
        assert_eq!(b.query(), "App");
        assert_eq!(b.selected_text(), Some("le"));
        assert_eq!(b.cursor(), 5);
    }

    #[test]
    fn query_stops_at_caret_without_selection() {
        let mut b = typed("Apple");
        b.handle_key(&press(KeyCode::Left));
        b.handle_key(&press(KeyCode::Left));
        assert_eq!(b.query(), "App");
    }

    #[test]
    fn typing_over_selection_replaces_it() {
        let mut b = FieldBuffer::new();
        b.set_value_with_selection("Apple", 3..5);
        assert_eq!(b.handle_key(&press(KeyCode::Char('r'))), BufferChange::Edited);
        assert_eq!(b.value(), "Appr");
        assert!(b.selection().is_none());
    }

    #[test]
    fn backspace_deletes_selection_first() {
        let mut b = FieldBuffer::new();
        b.set_value_with_selection("Apple", 3..5);
        b.handle_key(&press(KeyCode::Backspace));
        assert_eq!(b.value(), "App");
        assert_eq!(b.cursor(), 3);
    }

    #[test]
    fn backspace_at_start_is_unchanged() {
        let mut b = FieldBuffer::new();
        assert_eq!(b.handle_key(&press(KeyCode::Backspace)), BufferChange::Unchanged);
        let mut b = typed("a");
        b.handle_key(&press(KeyCode::Home));
        assert_eq!(b.handle_key(&press(KeyCode::Backspace)), BufferChange::Unchanged);
        assert_eq!(b.handle_key(&press(KeyCode::Delete)), BufferChange::Edited);
        assert!(b.is_empty());
    }

    #[test]
    fn caret_keys_report_caret_moved() {
        let mut b = typed("ab");
        assert_eq!(b.handle_key(&press(KeyCode::Left)), BufferChange::CaretMoved);
        assert_eq!(b.handle_key(&press(KeyCode::End)), BufferChange::CaretMoved);
        assert_eq!(b.handle_key(&press(KeyCode::End)), BufferChange::Unchanged);
        assert_eq!(b.handle_key(&press(KeyCode::Up)), BufferChange::Unchanged);
    }

    #[test]
    fn ctrl_backspace_deletes_word() {
        let mut b = typed("Emma Bloom");
        let key = KeyEvent::new(KeyCode::Backspace).with_modifiers(Modifiers::CTRL);
        assert_eq!(b.handle_key(&key), BufferChange::Edited);
        assert_eq!(b.value(), "Emma ");
    }

    #[test]
    fn ctrl_delete_deletes_word_forward() {
        let mut b = typed("Emma Bloom");
        b.handle_key(&press(KeyCode::Home));
        let key = KeyEvent::new(KeyCode::Delete).with_modifiers(Modifiers::CTRL);
        b.handle_key(&key);
        assert_eq!(b.value(), " Bloom");
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn shift_left_extends_selection() {
        let mut b = typed("abc");
        let key = KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::SHIFT);
        b.handle_key(&key);
        b.handle_key(&key);
        assert_eq!(b.selection(), Some(1..3));
        assert_eq!(b.query(), "a");
    }

    #[test]
    fn ctrl_a_selects_all() {
        let mut b = typed("abc");
        let key = KeyEvent::new(KeyCode::Char('a')).with_modifiers(Modifiers::CTRL);
        assert_eq!(b.handle_key(&key), BufferChange::CaretMoved);
        assert_eq!(b.selected_text(), Some("abc"));
    }

    #[test]
    fn graphemes_are_single_caret_steps() {
        let mut b = FieldBuffer::new();
        b.insert_str("e\u{301}t\u{e9}");
        assert_eq!(b.len(), 3);
        b.handle_key(&press(KeyCode::Backspace));
        b.handle_key(&press(KeyCode::Backspace));
        assert_eq!(b.value(), "e\u{301}");
    }

    #[test]
    fn zero_width_joiner_merges_clusters_without_losing_caret() {
        let mut b = FieldBuffer::new();
        b.insert_str("\u{1F468}\u{1F469}");
        assert_eq!(b.len(), 2);
        b.handle_key(&press(KeyCode::Left));
        assert_eq!(b.handle_key(&press(KeyCode::Char('\u{200D}'))), BufferChange::Edited);
        assert_eq!(b.len(), 1);
        assert!(b.cursor() <= b.len());
        assert_eq!(b.cursor(), 1);
        b.handle_key(&press(KeyCode::Backspace));
        assert!(b.is_empty());
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut b = FieldBuffer::new();
        assert!(b.insert_str("a\r\nb\nc"));
        assert_eq!(b.value(), "a b c");
        assert!(!b.insert_str(""));
    }

    #[test]
    fn set_value_with_selection_clamps() {
        let mut b = FieldBuffer::new();
        b.set_value_with_selection("abc", 2..10);
        assert_eq!(b.selection(), Some(2..3));
        b.set_value_with_selection("abc", 3..3);
        assert!(b.selection().is_none());
        b.collapse_to_end();
        assert_eq!(b.cursor(), 3);
    }
}
