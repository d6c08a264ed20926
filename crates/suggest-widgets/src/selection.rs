#![forbid(unsafe_code)]

//! Row selection state for the suggestion panel.
//!
//! The controller only tracks which visible row is highlighted and whether
//! that highlight came from the automatic prefix pre-selection. It never
//! touches field text; the field acts on the [`CommitOutcome`] it returns.
//!
//! # State Machine
//!
//! ```text
//!                 Down (rows > 0)
//!  NoSelection ───────────────────► RowSelected(0)
//!       ▲                               │  Up/Down: ±1, clamped
//!       │ reset / deselect              ▼
//!       └──────────────────────── RowSelected(i)
//! ```
//!
//! `auto_select_first` enters `RowSelected(0)` with the one-shot
//! `suppress_next_commit` flag set; the next [`confirm`](SelectionController::confirm)
//! consumes the flag instead of committing.

/// Highlighted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing highlighted.
    #[default]
    NoSelection,
    /// Visible row `index` highlighted.
    RowSelected(usize),
}

impl SelectionState {
    /// The highlighted index, if any.
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::NoSelection => None,
            Self::RowSelected(i) => Some(i),
        }
    }
}

/// Keyboard navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
}

/// What a confirm keystroke resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Commit visible row `index`.
    Commit(usize),
    /// The highlight was the automatic pre-selection; nothing to commit.
    Suppressed,
    /// No row highlighted.
    Nothing,
}

/// Selection state plus the one-shot commit suppression flag.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
    suppress_next_commit: bool,
    /// Number of rendered (capped) rows.
    row_count: usize,
}

impl SelectionController {
    /// A controller with no rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Highlighted row, if any.
    #[inline]
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.state.index()
    }

    /// Whether the next confirm will be swallowed.
    #[inline]
    #[must_use]
    pub fn suppress_next_commit(&self) -> bool {
        self.suppress_next_commit
    }

    /// Number of rows selection is bounded by.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Results were replaced: drop the selection and adopt the new row count.
    pub fn reset(&mut self, row_count: usize) {
        self.state = SelectionState::NoSelection;
        self.suppress_next_commit = false;
        self.row_count = row_count;
    }

    /// Change the row bound without replacing results (e.g. a new cap).
    ///
    /// A highlight past the new bound is dropped.
    pub fn set_row_count(&mut self, row_count: usize) {
        self.row_count = row_count;
        if self.state.index().is_some_and(|i| i >= row_count) {
            self.deselect();
        }
    }

    /// Clear the highlight without committing.
    pub fn deselect(&mut self) {
        self.state = SelectionState::NoSelection;
        self.suppress_next_commit = false;
    }

    /// Move the highlight one row. Returns `true` if it moved.
    ///
    /// Out-of-range moves are no-ops; there is no wraparound. Any explicit
    /// navigation clears the pre-selection flag.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if self.row_count == 0 {
            return false;
        }
        let next = match (self.state, direction) {
            (SelectionState::NoSelection, Direction::Down) => Some(0),
            (SelectionState::NoSelection, Direction::Up) => None,
            (SelectionState::RowSelected(i), Direction::Up) => i.checked_sub(1),
            (SelectionState::RowSelected(i), Direction::Down) => {
                (i + 1 < self.row_count).then_some(i + 1)
            }
        };
        self.suppress_next_commit = false;
        match next {
            Some(i) => {
                self.state = SelectionState::RowSelected(i);
                true
            }
            None => false,
        }
    }

    /// Pre-highlight row 0 after inline completion, arming suppression.
    pub fn auto_select_first(&mut self) -> bool {
        if self.row_count == 0 {
            return false;
        }
        self.state = SelectionState::RowSelected(0);
        self.suppress_next_commit = true;
        true
    }

    /// Explicit selection of row `index` (pointer click).
    ///
    /// Returns the index to commit, or `None` when out of range.
    pub fn click(&mut self, index: usize) -> Option<usize> {
        if index >= self.row_count {
            return None;
        }
        self.state = SelectionState::RowSelected(index);
        self.suppress_next_commit = false;
        Some(index)
    }

    /// Resolve a confirm keystroke.
    pub fn confirm(&mut self) -> CommitOutcome {
        match self.state {
            SelectionState::NoSelection => CommitOutcome::Nothing,
            SelectionState::RowSelected(_) if self.suppress_next_commit => {
                self.suppress_next_commit = false;
                CommitOutcome::Suppressed
            }
            SelectionState::RowSelected(i) => CommitOutcome::Commit(i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_rows(n: usize) -> SelectionController {
        let mut s = SelectionController::new();
        s.reset(n);
        s
    }

    #[test]
    fn down_from_nothing_selects_first() {
        let mut s = with_rows(3);
        assert!(s.navigate(Direction::Down));
        assert_eq!(s.state(), SelectionState::RowSelected(0));
    }

    #[test]
    fn up_from_nothing_is_noop() {
        let mut s = with_rows(3);
        assert!(!s.navigate(Direction::Up));
        assert_eq!(s.state(), SelectionState::NoSelection);
    }

    #[test]
    fn no_wraparound_at_either_end() {
        let mut s = with_rows(3);
        s.click(2);
        assert!(!s.navigate(Direction::Down));
        assert_eq!(s.active_index(), Some(2));
        s.click(0);
        assert!(!s.navigate(Direction::Up));
        assert_eq!(s.active_index(), Some(0));
    }

    #[test]
    fn no_navigation_without_rows() {
        let mut s = with_rows(0);
        assert!(!s.navigate(Direction::Down));
        assert!(!s.auto_select_first());
        assert_eq!(s.click(0), None);
        assert_eq!(s.confirm(), CommitOutcome::Nothing);
    }

    #[test]
    fn auto_select_suppresses_one_confirm() {
        let mut s = with_rows(2);
        assert!(s.auto_select_first());
        assert!(s.suppress_next_commit());
        assert_eq!(s.confirm(), CommitOutcome::Suppressed);
        assert_eq!(s.confirm(), CommitOutcome::Commit(0));
    }

    #[test]
    fn navigation_clears_suppression() {
        let mut s = with_rows(2);
        s.auto_select_first();
        s.navigate(Direction::Down);
        assert!(!s.suppress_next_commit());
        assert_eq!(s.confirm(), CommitOutcome::Commit(1));
    }

    #[test]
    fn click_clears_suppression_and_commits() {
        let mut s = with_rows(2);
        s.auto_select_first();
        assert_eq!(s.click(1), Some(1));
        assert!(!s.suppress_next_commit());
        assert_eq!(s.click(5), None);
        assert_eq!(s.active_index(), Some(1));
    }

    #[test]
    fn reset_invalidates() {
        let mut s = with_rows(3);
        s.click(1);
        s.reset(5);
        assert_eq!(s.state(), SelectionState::NoSelection);
        assert_eq!(s.row_count(), 5);
    }

    #[test]
    fn shrinking_row_count_drops_stale_highlight() {
        let mut s = with_rows(5);
        s.click(4);
        s.set_row_count(2);
        assert_eq!(s.state(), SelectionState::NoSelection);
        s.click(1);
        s.set_row_count(3);
        assert_eq!(s.active_index(), Some(1));
    }
}
