#![forbid(unsafe_code)]

//! Presentation snapshot of the suggestion panel.
//!
//! [`PanelView`] is everything a renderer needs after a refresh: which rows
//! to draw, which one is highlighted, how tall the panel is, and the styled
//! segments of every row with the highlight style already applied. Pointer
//! hits are mapped back to result indices with [`PanelView::row_at`].

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::candidate::Candidate;
use crate::style::{Style, Theme};

/// Whether and how the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelVisibility {
    /// Not requested, or dismissed.
    #[default]
    Hidden,
    /// Requested, but the last pass matched nothing.
    VisibleEmpty,
    /// Requested and showing rows.
    VisibleWithResults,
}

impl PanelVisibility {
    /// Whether rows are on screen.
    #[inline]
    #[must_use]
    pub const fn shows_rows(self) -> bool {
        matches!(self, Self::VisibleWithResults)
    }
}

/// A run of row text with its resolved style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSegment {
    /// The text.
    pub text: String,
    /// Theme text style, span style, and (if highlighted) highlight style, layered.
    pub style: Style,
    /// Whether this run is inside the match highlight.
    pub highlighted: bool,
}

/// One rendered result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Index into the visible results.
    pub index: usize,
    /// Whether this row is the active selection.
    pub selected: bool,
    /// The ranked candidate (with its highlight range).
    pub candidate: Candidate,
    /// Styled runs, left to right.
    pub segments: SmallVec<[StyledSegment; 4]>,
}

/// Snapshot of the panel after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// Visibility state.
    pub visibility: PanelVisibility,
    /// Every visible (capped) row. Empty unless rows are shown.
    pub rows: Vec<RowView>,
    /// Active row index, if any.
    pub active: Option<usize>,
    /// Whether the host's loading indicator is on.
    pub loading: bool,
    /// Panel height in terminal rows.
    pub height: u16,
    /// First row inside the height window (keeps `active` in view).
    pub scroll: usize,
    /// Matches before the result cap.
    pub total_matches: usize,
    /// Panel theme.
    pub theme: Theme,
    /// Style applied over matched text.
    pub highlight: Style,
}

impl PanelView {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn build(
        visibility: PanelVisibility,
        results: &[Candidate],
        total_matches: usize,
        active: Option<usize>,
        loading: bool,
        theme: Theme,
        highlight: Style,
        max_list_height: u16,
    ) -> Self {
        let row_height = theme.row_height.max(1);
        let rows: Vec<RowView> = if visibility.shows_rows() {
            results
                .iter()
                .enumerate()
                .map(|(index, candidate)| RowView {
                    index,
                    selected: active == Some(index),
                    candidate: candidate.clone(),
                    segments: row_segments(candidate, &theme, highlight),
                })
                .collect()
        } else {
            Vec::new()
        };

        let full = u16::try_from(rows.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(row_height);
        let height = if max_list_height > 0 {
            full.min(max_list_height)
        } else {
            full
        };

        let window = usize::from(height / row_height).max(1);
        let scroll = match active {
            Some(i) if i >= window => i + 1 - window,
            _ => 0,
        };

        Self {
            visibility,
            rows,
            active,
            loading,
            height,
            scroll,
            total_matches,
            theme,
            highlight,
        }
    }

    /// Rows inside the height window.
    #[must_use]
    pub fn visible_rows(&self) -> &[RowView] {
        let per_row = usize::from(self.theme.row_height.max(1));
        let window = usize::from(self.height) / per_row;
        let start = self.scroll.min(self.rows.len());
        let end = (start + window).min(self.rows.len());
        &self.rows[start..end]
    }

    /// Result index at a row offset from the panel top.
    #[must_use]
    pub fn row_at(&self, offset: u16) -> Option<usize> {
        if offset >= self.height {
            return None;
        }
        let slot = usize::from(offset / self.theme.row_height.max(1));
        self.visible_rows().get(slot).map(|row| row.index)
    }

    /// Plain text lines for simple hosts and snapshot tests.
    ///
    /// The active row starts with `> `, others with two spaces; matched text
    /// is wrapped in brackets; lines wider than `width` end in `…`. A
    /// trailing `  loading…` line is added while loading.
    #[must_use]
    pub fn render_lines(&self, width: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .visible_rows()
            .iter()
            .map(|row| {
                let mut line = String::from(if row.selected { "> " } else { "  " });
                for seg in &row.segments {
                    if seg.highlighted {
                        line.push('[');
                        line.push_str(&seg.text);
                        line.push(']');
                    } else {
                        line.push_str(&seg.text);
                    }
                }
                truncate_to_width(&line, width)
            })
            .collect();
        if self.loading {
            lines.push(truncate_to_width("  loading…", width));
        }
        lines
    }
}

fn row_segments(
    candidate: &Candidate,
    theme: &Theme,
    highlight: Style,
) -> SmallVec<[StyledSegment; 4]> {
    let base: SmallVec<[(&str, Style); 4]> = match candidate.rich_title() {
        Some(rich) => rich
            .spans()
            .iter()
            .map(|span| (span.text.as_str(), theme.text.patch(span.style)))
            .collect(),
        None => SmallVec::from_iter([(candidate.title(), theme.text)]),
    };

    // A rich title that differs from the matchable title cannot carry the range.
    let plain_len: usize = base.iter().map(|(text, _)| text.len()).sum();
    let range = candidate.highlight().filter(|r| {
        let consistent = candidate.rich_title().is_none_or(|rich| rich.plain() == candidate.title());
        consistent && r.end <= plain_len
    });

    let mut segments = SmallVec::new();
    let mut offset = 0usize;
    for (text, style) in base {
        let span_start = offset;
        let span_end = offset + text.len();
        offset = span_end;

        let Some(hl) = range.clone().filter(|r| r.start < span_end && r.end > span_start) else {
            push_segment(&mut segments, text, style, false);
            continue;
        };
        let cut_start = hl.start.max(span_start) - span_start;
        let cut_end = hl.end.min(span_end) - span_start;
        push_segment(&mut segments, &text[..cut_start], style, false);
        push_segment(
            &mut segments,
            &text[cut_start..cut_end],
            style.patch(highlight),
            true,
        );
        push_segment(&mut segments, &text[cut_end..], style, false);
    }
    segments
}

fn push_segment(
    segments: &mut SmallVec<[StyledSegment; 4]>,
    text: &str,
    style: Style,
    highlighted: bool,
) {
    if !text.is_empty() {
        segments.push(StyledSegment {
            text: text.to_owned(),
            style,
            highlighted,
        });
    }
}

fn truncate_to_width(line: &str, width: usize) -> String {
    if line.width() <= width {
        return line.to_owned();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for g in line.graphemes(true) {
        let w = g.width();
        if used + w > width - 1 {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('…');
    out
}
