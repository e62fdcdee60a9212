//! Core data types for the IVR statistics browser

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Label shown for the "no location filter" entry of the location selector
pub const ALL_LOCATIONS: &str = "All Locations";

/// Outcome label for calls the caller hung up on
pub const RELEASED_BY_CALLER: &str = "Released by caller";

/// Outcome label for calls the IVR terminated
pub const RELEASED_BY_IVR: &str = "Released by IVR";

/// How a call left the IVR flow
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Outcome {
    /// Caller hung up before choosing anything
    ReleasedByCaller,
    /// IVR timed out or otherwise dropped the call
    ReleasedByIvr,
    /// Caller made a selection, rendered as `selection -> destination`
    Routed(String),
}

impl Outcome {
    /// Display label of this outcome
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::ReleasedByCaller => RELEASED_BY_CALLER,
            Self::ReleasedByIvr => RELEASED_BY_IVR,
            Self::Routed(route) => route,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Outcome {
    fn from(label: String) -> Self {
        match label.as_str() {
            RELEASED_BY_CALLER => Self::ReleasedByCaller,
            RELEASED_BY_IVR => Self::ReleasedByIvr,
            _ => Self::Routed(label),
        }
    }
}

impl From<&str> for Outcome {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Routed(route) => route,
            other => other.label().to_string(),
        }
    }
}

/// One row of the IVR call log
///
/// Records are built once by the loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Originating site (IVR description)
    pub location: String,

    /// Call start time
    pub timestamp: NaiveDateTime,

    /// Formatted origin number
    pub caller: String,

    /// Formatted dialed number (the IVR's DID)
    pub destination: String,

    /// Call length in seconds
    pub duration: u64,

    /// How the call left the IVR
    pub outcome: Outcome,
}

impl CallRecord {
    /// Calendar day the call started on
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Location selection driving the location predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocationFilter {
    /// No location predicate
    #[default]
    All,
    /// Only records whose location equals this name exactly
    Named(String),
}

impl LocationFilter {
    /// Build a selection from selector text, mapping the sentinel and blank text to [`Self::All`]
    #[must_use]
    pub fn from_selection(selection: &str) -> Self {
        let selection = selection.trim();
        if selection.is_empty() || selection == ALL_LOCATIONS {
            Self::All
        } else {
            Self::Named(selection.to_string())
        }
    }

    /// Whether a record at `location` passes this selection
    #[must_use]
    pub fn matches(&self, location: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == location,
        }
    }
}

impl std::fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_LOCATIONS),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<Option<&str>> for LocationFilter {
    fn from(selection: Option<&str>) -> Self {
        selection.map_or(Self::All, Self::from_selection)
    }
}
