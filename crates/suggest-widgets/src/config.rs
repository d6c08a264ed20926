#![forbid(unsafe_code)]

//! Search field configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Behaviour knobs for a [`SearchField`](crate::field::SearchField).
///
/// The stopped-typing interval is fixed at
/// [`STOPPED_TYPING_INTERVAL`](suggest_core::debounce::STOPPED_TYPING_INTERVAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldConfig {
    /// Maximum rows shown. Visibility decisions still use the full count.
    /// Default: 0 (unlimited)
    pub max_results: usize,

    /// Maximum panel height in terminal rows. Presentation only.
    /// Default: 0 (unlimited)
    pub max_list_height: u16,

    /// Show every candidate when the field gains focus, even with no query.
    /// Default: false
    pub start_visible: bool,

    /// Autofill the top prefix match into the field with the suffix selected.
    /// Default: true
    pub inline_completion: bool,

    /// Hide the panel after a row is committed.
    /// Default: false
    pub hide_on_select: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_results: 0,
            max_list_height: 0,
            start_visible: false,
            inline_completion: true,
            hide_on_select: false,
        }
    }
}

impl FieldConfig {
    /// Set the result cap (builder).
    #[must_use]
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set the panel height cap (builder).
    #[must_use]
    pub fn with_max_list_height(mut self, rows: u16) -> Self {
        self.max_list_height = rows;
        self
    }

    /// Set start-visible (builder).
    #[must_use]
    pub fn with_start_visible(mut self, enabled: bool) -> Self {
        self.start_visible = enabled;
        self
    }

    /// Enable or disable inline completion (builder).
    #[must_use]
    pub fn with_inline_completion(mut self, enabled: bool) -> Self {
        self.inline_completion = enabled;
        self
    }

    /// Set hide-on-select (builder).
    #[must_use]
    pub fn with_hide_on_select(mut self, enabled: bool) -> Self {
        self.hide_on_select = enabled;
        self
    }
}
