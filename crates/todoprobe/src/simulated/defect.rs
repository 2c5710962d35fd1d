//! Injectable application defects for mutation runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A deliberate bug the simulated app can be built with.
///
/// Each defect breaks one observable TodoMVC behavior; a healthy scenario
/// set fails at least one scenario for every defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppDefect {
    /// New item text is stored untrimmed
    NoTrim,
    /// New items are inserted at the top of the list
    AppendAtTop,
    /// The list is never written to storage
    NoPersistence,
    /// Counter always says "items"
    CountAlwaysPlural,
    /// Toggle-all keeps its last clicked state instead of following items
    ToggleAllIgnoresItems,
    /// Escape commits the edit instead of cancelling
    EscapeCommits,
    /// Edited text is stored untrimmed
    EditNoTrim,
    /// Committing an empty edit keeps the old item
    EmptyEditKeepsItem,
    /// The clear-completed button renders even with nothing completed
    ClearCompletedAlwaysVisible,
    /// Filters change the URL but every item stays listed
    FilterIgnored,
    /// The new-todo input keeps its text after submit
    InputNotCleared,
    /// The toggle and label stay visible while editing
    EditKeepsControlsVisible,
    /// The new-todo input is not focused on load
    NoAutofocus,
    /// The "All" link keeps the `selected` class whatever the filter
    FilterHighlightStuck,
}

impl AppDefect {
    /// Every defect
    pub const ALL: [Self; 14] = [
        Self::NoTrim,
        Self::AppendAtTop,
        Self::NoPersistence,
        Self::CountAlwaysPlural,
        Self::ToggleAllIgnoresItems,
        Self::EscapeCommits,
        Self::EditNoTrim,
        Self::EmptyEditKeepsItem,
        Self::ClearCompletedAlwaysVisible,
        Self::FilterIgnored,
        Self::InputNotCleared,
        Self::EditKeepsControlsVisible,
        Self::NoAutofocus,
        Self::FilterHighlightStuck,
    ];

    /// Stable kebab-case name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoTrim => "no-trim",
            Self::AppendAtTop => "append-at-top",
            Self::NoPersistence => "no-persistence",
            Self::CountAlwaysPlural => "count-always-plural",
            Self::ToggleAllIgnoresItems => "toggle-all-ignores-items",
            Self::EscapeCommits => "escape-commits",
            Self::EmptyEditKeepsItem => "empty-edit-keeps-item",
            Self::EditNoTrim => "edit-no-trim",
            Self::ClearCompletedAlwaysVisible => "clear-completed-always-visible",
            Self::FilterIgnored => "filter-ignored",
            Self::InputNotCleared => "input-not-cleared",
            Self::EditKeepsControlsVisible => "edit-keeps-controls-visible",
            Self::NoAutofocus => "no-autofocus",
            Self::FilterHighlightStuck => "filter-highlight-stuck",
        }
    }
}

impl fmt::Display for AppDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
