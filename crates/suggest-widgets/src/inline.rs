#![forbid(unsafe_code)]

//! Inline completion of the typed query.
//!
//! When the user lengthens the query and the top-ranked title starts with
//! exactly what was typed, the field text is replaced by that title and the
//! appended suffix is selected, so the next keystroke overwrites it.
//!
//! Lengths and the selection are measured in grapheme clusters, the same
//! unit the field buffer uses for its caret.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::matcher::RankedResults;

/// A proposed rewrite of the field text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCompletion {
    /// New field text (the first result's title).
    pub text: String,
    /// Selected suffix, in grapheme indices.
    pub selection: Range<usize>,
}

/// Tracks the previous query length so only lengthening edits complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineCompleter {
    previous_len: usize,
}

impl InlineCompleter {
    /// A completer with a zero baseline.
    #[must_use]
    pub const fn new() -> Self {
        Self { previous_len: 0 }
    }

    /// Query length recorded after the last evaluated pass.
    #[inline]
    #[must_use]
    pub const fn previous_len(&self) -> usize {
        self.previous_len
    }

    /// Record `len` as the baseline (e.g. after a committed selection).
    pub fn set_baseline(&mut self, len: usize) {
        self.previous_len = len;
    }

    /// Record the length of `query` as the baseline.
    pub fn observe(&mut self, query: &str) {
        self.previous_len = grapheme_len(query);
    }

    /// Decide without touching the baseline.
    #[must_use]
    pub fn propose(&self, results: &RankedResults, query: &str) -> Option<InlineCompletion> {
        let first = results.first()?;
        let query_len = grapheme_len(query);
        if query_len <= self.previous_len || !should_preselect(results, query) {
            return None;
        }
        Some(InlineCompletion {
            text: first.title().to_owned(),
            selection: query_len..grapheme_len(first.title()),
        })
    }

    /// Decide and advance the baseline.
    ///
    /// With no results the baseline is left alone; otherwise it becomes the
    /// length of `query` whether or not a completion is returned.
    pub fn complete(&mut self, results: &RankedResults, query: &str) -> Option<InlineCompletion> {
        results.first()?;
        let proposal = self.propose(results, query);
        self.observe(query);
        if let Some(completion) = &proposal {
            suggest_core::debug!(
                query,
                completed = completion.text.as_str(),
                "inline completion"
            );
        }
        proposal
    }
}

/// Whether the first result should be pre-highlighted for `query`.
///
/// True when the query is non-empty and the top title starts with it,
/// compared case-sensitively against the literal typed text.
#[must_use]
pub fn should_preselect(results: &RankedResults, query: &str) -> bool {
    !query.is_empty()
        && results
            .first()
            .is_some_and(|first| first.title().starts_with(query))
}

pub(crate) fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}
