#![forbid(unsafe_code)]

//! Suggestion items.
//!
//! A [`Candidate`] is a title with an optional rich-text rendering and a
//! highlight range. The title is what the matcher compares against and what
//! gets written into the field on selection; the rich title only affects
//! presentation.

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::style::Style;

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// The text.
    pub text: String,
    /// Its style.
    pub style: Style,
}

impl Span {
    /// Create a styled span.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create an unstyled span.
    pub fn raw(text: impl Into<String>) -> Self {
        Self::styled(text, Style::new())
    }
}

/// Rich text: a sequence of styled spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    /// Build from spans. Empty spans are dropped.
    pub fn new(spans: impl IntoIterator<Item = Span>) -> Self {
        Self {
            spans: spans.into_iter().filter(|s| !s.text.is_empty()).collect(),
        }
    }

    /// The spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// The concatenated plain text.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One suggestion entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    title: String,
    rich_title: Option<StyledText>,
    /// Byte range into `title`; always on char boundaries and non-empty.
    highlight: Option<Range<usize>>,
}

impl Candidate {
    /// Create a plain candidate.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rich_title: None,
            highlight: None,
        }
    }

    /// Create a candidate from rich text; the title is its plain text.
    pub fn from_styled(rich: StyledText) -> Self {
        Self {
            title: rich.plain(),
            rich_title: Some(rich),
            highlight: None,
        }
    }

    /// Attach rich text for display (builder). The title is unchanged.
    #[must_use]
    pub fn with_rich_title(mut self, rich: StyledText) -> Self {
        self.rich_title = Some(rich);
        self
    }

    /// Set the highlight range in bytes (builder).
    ///
    /// The range is clamped to the title and snapped down to char
    /// boundaries; a range that ends up empty clears the highlight.
    #[must_use]
    pub fn with_highlight(mut self, range: Option<Range<usize>>) -> Self {
        self.set_highlight(range);
        self
    }

    /// Set the highlight range in bytes, clamped like [`with_highlight`](Self::with_highlight).
    pub fn set_highlight(&mut self, range: Option<Range<usize>>) {
        self.highlight = range.and_then(|r| clamp_range(&self.title, r));
    }

    /// The matchable title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rich display text, if any.
    #[inline]
    pub fn rich_title(&self) -> Option<&StyledText> {
        self.rich_title.as_ref()
    }

    /// The clamped highlight range, if any.
    #[inline]
    pub fn highlight(&self) -> Option<Range<usize>> {
        self.highlight.clone()
    }

    /// The highlighted slice of the title.
    pub fn highlighted_text(&self) -> Option<&str> {
        self.highlight.clone().map(|r| &self.title[r])
    }
}

impl From<&str> for Candidate {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<String> for Candidate {
    fn from(title: String) -> Self {
        Self::new(title)
    }
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn clamp_range(title: &str, range: Range<usize>) -> Option<Range<usize>> {
    let end = floor_char_boundary(title, range.end.min(title.len()));
    let start = floor_char_boundary(title, range.start.min(end));
    (start < end).then_some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[test]
    fn plain_candidate() {
        let c = Candidate::from("Apple");
        assert_eq!(c.title(), "Apple");
        assert!(c.rich_title().is_none());
        assert!(c.highlight().is_none());
    }

    #[test]
    fn highlight_is_clamped_to_title() {
        let c = Candidate::new("Apple").with_highlight(Some(3..99));
        assert_eq!(c.highlight(), Some(3..5));
        assert_eq!(c.highlighted_text(), Some("le"));
    }

    #[test]
    fn inverted_or_out_of_bounds_range_clears_highlight() {
        assert!(Candidate::new("Apple").with_highlight(Some(10..20)).highlight().is_none());
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = 4..2;
        assert!(Candidate::new("Apple").with_highlight(Some(inverted)).highlight().is_none());
        assert!(Candidate::new("").with_highlight(Some(0..1)).highlight().is_none());
    }

    #[test]
    fn highlight_snaps_to_char_boundaries() {
        // 'é' is two bytes (1..3).
        let c = Candidate::new("Réseau").with_highlight(Some(0..2));
        assert_eq!(c.highlight(), Some(0..1));
        let c = Candidate::new("Réseau").with_highlight(Some(2..4));
        assert_eq!(c.highlight(), Some(1..4));
    }

    #[test]
    fn styled_candidate_title_is_plain_text() {
        let rich = StyledText::new([
            Span::styled("Emma", Style::new().bold()),
            Span::raw(""),
            Span::raw(" Bloom"),
        ]);
        assert_eq!(rich.spans().len(), 2);
        let c = Candidate::from_styled(rich);
        assert_eq!(c.title(), "Emma Bloom");
        assert!(c.rich_title().is_some());
    }
}
