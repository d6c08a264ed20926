#![forbid(unsafe_code)]

//! Two-tier candidate ranking.
//!
//! A match pass partitions the candidate set into a prefix tier (titles that
//! start with the query) followed by a substring tier (titles that merely
//! contain it). Each tier keeps the source order; there is no secondary
//! sort. Comparison is case-insensitive per character.
//!
//! # Example
//!
//! ```
//! use suggest_widgets::candidate::Candidate;
//! use suggest_widgets::matcher::{rank, MatchMode};
//!
//! let set: Vec<Candidate> = ["Apple", "Apricot", "Banana"].into_iter().map(Candidate::from).collect();
//! let ranked = rank(&set, "Ap", MatchMode::PREFIX);
//! let titles: Vec<_> = ranked.visible().iter().map(|c| c.title()).collect();
//! assert_eq!(titles, ["Apple", "Apricot"]);
//! assert_eq!(ranked.visible()[0].highlight(), Some(0..2));
//! ```

use std::ops::Range;

use rustc_hash::FxHashSet;

use crate::candidate::Candidate;

/// Which tiers a match pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchMode {
    /// Run the prefix tier. When `false` every candidate is included
    /// (the "show everything" pass) and only highlighted where it contains
    /// the query.
    pub prefix_pass: bool,
}

impl MatchMode {
    /// Prefix tier then substring tier.
    pub const PREFIX: Self = Self { prefix_pass: true };
    /// Every candidate, in source order.
    pub const SHOW_ALL: Self = Self { prefix_pass: false };
}

/// Output of one match pass.
///
/// Holds every match; [`visible`](Self::visible) applies the result cap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankedResults {
    items: Vec<Candidate>,
    prefix_count: usize,
    /// 0 = unlimited.
    limit: usize,
}

impl RankedResults {
    /// An empty result list.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cap the visible rows (builder). `0` means unlimited.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Change the cap in place.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// The cap (`0` = unlimited).
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of matches before the cap.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there were no matches at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many of the matches came from the prefix tier.
    #[inline]
    pub fn prefix_count(&self) -> usize {
        self.prefix_count
    }

    /// Number of rows after the cap.
    #[inline]
    pub fn visible_len(&self) -> usize {
        if self.limit > 0 {
            self.items.len().min(self.limit)
        } else {
            self.items.len()
        }
    }

    /// The capped rows, in rank order.
    #[inline]
    pub fn visible(&self) -> &[Candidate] {
        &self.items[..self.visible_len()]
    }

    /// Visible row `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.visible().get(index)
    }

    /// The top-ranked row.
    #[inline]
    pub fn first(&self) -> Option<&Candidate> {
        self.get(0)
    }

    /// Every match, ignoring the cap.
    #[inline]
    pub fn all(&self) -> &[Candidate] {
        &self.items
    }
}

/// Rank `candidates` against `query`.
///
/// Never fails: an empty set yields empty results.
#[must_use]
pub fn rank(candidates: &[Candidate], query: &str, mode: MatchMode) -> RankedResults {
    let mut items = Vec::new();

    if mode.prefix_pass {
        for candidate in candidates {
            if let Some(range) = prefix_range(candidate.title(), query) {
                items.push(candidate.clone().with_highlight(Some(range)));
            }
        }
    }
    let prefix_count = items.len();

    let rest: Vec<Candidate> = {
        let prefix_titles: FxHashSet<&str> = items.iter().map(Candidate::title).collect();
        candidates
            .iter()
            .filter(|candidate| !prefix_titles.contains(candidate.title()))
            .filter_map(|candidate| {
                let found = find_ignore_case(candidate.title(), query);
                (!mode.prefix_pass || found.is_some())
                    .then(|| candidate.clone().with_highlight(found))
            })
            .collect()
    };
    items.extend(rest);

    suggest_core::trace!(
        query,
        prefix_pass = mode.prefix_pass,
        prefix_count,
        total = items.len(),
        "match pass"
    );

    RankedResults {
        items,
        prefix_count,
        limit: 0,
    }
}

#[inline]
fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte length of `haystack[start..]` that matches `needle` case-insensitively.
fn match_len_at(haystack: &str, start: usize, needle: &str) -> Option<usize> {
    let mut hay = haystack[start..].char_indices();
    for n in needle.chars() {
        let (_, h) = hay.next()?;
        if !chars_eq_ignore_case(h, n) {
            return None;
        }
    }
    Some(hay.next().map_or(haystack.len() - start, |(i, _)| i))
}

/// Highlight range when `title` starts with `query`, ignoring case.
///
/// An empty query is a prefix of everything but highlights nothing.
#[must_use]
pub fn prefix_range(title: &str, query: &str) -> Option<Range<usize>> {
    match_len_at(title, 0, query).map(|len| 0..len)
}

/// First case-insensitive occurrence of `needle` in `haystack`, as a byte range.
///
/// Returns `None` for an empty needle.
#[must_use]
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .char_indices()
        .find_map(|(start, _)| match_len_at(haystack, start, needle).map(|len| start..start + len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(titles: &[&str]) -> Vec<Candidate> {
        titles.iter().copied().map(Candidate::from).collect()
    }

    fn titles(results: &RankedResults) -> Vec<&str> {
        results.visible().iter().map(Candidate::title).collect()
    }

    #[test]
    fn prefix_tier_first_in_source_order() {
        let c = set(&["Apple", "Apricot", "Banana"]);
        let r = rank(&c, "Ap", MatchMode::PREFIX);
        assert_eq!(titles(&r), ["Apple", "Apricot"]);
        assert_eq!(r.prefix_count(), 2);
        assert!(r.visible().iter().all(|c| c.highlight() == Some(0..2)));
    }

    #[test]
    fn substring_tier_highlights_location() {
        let c = set(&["Apple", "Apricot", "Banana"]);
        let r = rank(&c, "an", MatchMode::PREFIX);
        assert_eq!(titles(&r), ["Banana"]);
        assert_eq!(r.prefix_count(), 0);
        assert_eq!(r.visible()[0].highlight(), Some(1..3));
    }

    #[test]
    fn tiers_are_not_interleaved() {
        let c = set(&["Grape", "apricot", "Papaya", "Apple"]);
        let r = rank(&c, "ap", MatchMode::PREFIX);
        assert_eq!(titles(&r), ["apricot", "Apple", "Grape", "Papaya"]);
        assert_eq!(r.prefix_count(), 2);
        assert_eq!(r.visible()[2].highlight(), Some(2..4));
    }

    #[test]
    fn show_all_keeps_everything_in_source_order() {
        let c = set(&["Banana", "Apple", "Cherry"]);
        let r = rank(&c, "", MatchMode::SHOW_ALL);
        assert_eq!(titles(&r), ["Banana", "Apple", "Cherry"]);
        assert!(r.visible().iter().all(|c| c.highlight().is_none()));

        let r = rank(&c, "an", MatchMode::SHOW_ALL);
        assert_eq!(titles(&r), ["Banana", "Apple", "Cherry"]);
        assert_eq!(r.visible()[0].highlight(), Some(1..3));
        assert!(r.visible()[1].highlight().is_none());
    }

    #[test]
    fn duplicate_titles_of_prefix_tier_are_skipped() {
        let c = set(&["Apple", "Pineapple", "Apple"]);
        let r = rank(&c, "app", MatchMode::PREFIX);
        assert_eq!(titles(&r), ["Apple", "Apple", "Pineapple"]);
    }

    #[test]
    fn empty_inputs() {
        assert!(rank(&[], "x", MatchMode::PREFIX).is_empty());
        assert!(rank(&[], "", MatchMode::SHOW_ALL).is_empty());
        // An empty query prefix-matches everything with an empty highlight.
        let r = rank(&set(&["a", "b"]), "", MatchMode::PREFIX);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn limit_caps_visible_but_not_len() {
        let c = set(&["a1", "a2", "a3", "a4", "a5"]);
        let r = rank(&c, "a", MatchMode::PREFIX).with_limit(2);
        assert_eq!(r.len(), 5);
        assert_eq!(r.visible_len(), 2);
        assert_eq!(titles(&r), ["a1", "a2"]);
        assert!(r.get(2).is_none());
        assert_eq!(r.all().len(), 5);
    }

    #[test]
    fn case_insensitive_non_ascii() {
        assert_eq!(prefix_range("Émile", "é"), Some(0..2));
        assert_eq!(find_ignore_case("café crème", "CRÈ"), Some(6..10));
        assert_eq!(find_ignore_case("abc", ""), None);
        assert_eq!(find_ignore_case("ab", "abc"), None);
    }
}
