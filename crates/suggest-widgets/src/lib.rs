#![forbid(unsafe_code)]

//! Autocomplete engine for single-line search fields.
//!
//! Candidates are ranked against the typed query in two tiers (prefix, then
//! substring), the top prefix match can be completed inline with its suffix
//! selected, and keyboard or pointer selection commits a row back into the
//! field. [`SearchField`] ties these together behind an event interface and
//! exposes a [`PanelView`] for rendering.

pub mod buffer;
pub mod candidate;
pub mod config;
pub mod field;
pub mod inline;
pub mod matcher;
pub mod selection;
pub mod style;
pub mod view;

pub use candidate::{Candidate, Span, StyledText};
pub use config::FieldConfig;
pub use field::{FieldAction, FieldEvent, SearchField};
pub use matcher::{rank, MatchMode, RankedResults};
pub use selection::{Direction, SelectionState};
pub use style::{Rgba, Style, StyleFlags, Theme};
pub use view::{PanelView, PanelVisibility, RowView};
