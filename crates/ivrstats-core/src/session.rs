//! Browsing session: record store, current filter and the visible view

use crate::filter::{DateRange, RecordFilter};
use crate::store::{LoadedData, RecordStore, selector_entries};
use crate::summary::CallSummary;
use crate::types::{CallRecord, LocationFilter};
use crate::{Error, Result};
use tracing::{debug, warn};

/// Raw text of the start and end date fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFields {
    /// Start field text, e.g. `Start: 2024-01-01`
    pub start: String,
    /// End field text, e.g. `End: 2024-01-31`
    pub end: String,
}

impl DateFields {
    /// Date fields holding the given text
    #[must_use]
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// User action that changes what the session displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A location was picked in the selector
    ///
    /// The date fields are re-applied when both hold a date.
    LocationChanged {
        /// Selected location
        location: LocationFilter,
        /// Current date field text
        dates: DateFields,
    },

    /// The date filter was requested
    ApplyDateFilter {
        /// Current location selection
        location: LocationFilter,
        /// Current date field text
        dates: DateFields,
    },

    /// Every filter was cleared
    ClearFilter,
}

/// State of one browsing session
///
/// Owns the record store for its whole lifetime. The visible view is kept
/// as positions into the store so it always reflects the store contents.
#[derive(Debug, Clone, Default)]
pub struct Session {
    locations: Vec<String>,
    store: RecordStore,
    filter: RecordFilter,
    visible: Vec<usize>,
}

impl Session {
    /// Start a session over a loaded store with every record visible
    #[must_use]
    pub fn new(locations: Vec<String>, store: RecordStore) -> Self {
        let visible = (0..store.len()).collect();
        Self {
            locations,
            store,
            filter: RecordFilter::default(),
            visible,
        }
    }

    /// Session with no locations and no records, used after a failed load
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Harvested location names
    #[must_use]
    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Entries of the location selector, "All Locations" first
    #[must_use]
    pub fn selector_entries(&self) -> Vec<String> {
        selector_entries(&self.locations)
    }

    /// The full record store
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Filter currently applied to the view
    #[must_use]
    pub const fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// Records currently visible, in store order
    pub fn visible(&self) -> impl Iterator<Item = &CallRecord> + '_ {
        self.visible.iter().filter_map(|&index| self.store.get(index))
    }

    /// Number of visible records
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Totals over the visible records
    #[must_use]
    pub fn summary(&self) -> CallSummary {
        CallSummary::from_records(self.visible())
    }

    /// Dispatch one command
    ///
    /// On error the current filter and view are left as they were.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteDateRange`] when a date filter is requested
    /// without both bounds, [`Error::InvalidDateRange`] for a reversed range,
    /// a validation error for a malformed date, and
    /// [`Error::UnknownLocation`] for a location outside the harvested list.
    pub fn handle(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Handling command");

        let result = match command {
            Command::LocationChanged { location, dates } => {
                self.location_changed(location, &dates)
            }
            Command::ApplyDateFilter { location, dates } => {
                self.apply_date_filter(location, &dates)
            }
            Command::ClearFilter => {
                self.clear_filter();
                Ok(())
            }
        };

        if let Err(e) = &result {
            warn!(error = %e, "Command rejected");
        }
        result
    }

    /// Select a location, re-applying the date fields when both hold a date
    ///
    /// # Errors
    ///
    /// See [`Session::handle`]. A half-filled date range is ignored here
    /// rather than reported.
    pub fn location_changed(&mut self, location: LocationFilter, dates: &DateFields) -> Result<()> {
        self.ensure_known(&location)?;
        let dates = match DateRange::parse(&dates.start, &dates.end) {
            Ok(range) => range,
            Err(Error::IncompleteDateRange) => None,
            Err(e) => return Err(e),
        };
        self.apply(RecordFilter::new(location, dates));
        Ok(())
    }

    /// Apply the date fields together with the current location selection
    ///
    /// # Errors
    ///
    /// See [`Session::handle`].
    pub fn apply_date_filter(
        &mut self,
        location: LocationFilter,
        dates: &DateFields,
    ) -> Result<()> {
        self.ensure_known(&location)?;
        let range = DateRange::parse(&dates.start, &dates.end)?.ok_or(Error::IncompleteDateRange)?;
        self.apply(RecordFilter::new(location, Some(range)));
        Ok(())
    }

    /// Drop every filter and show the whole store
    pub fn clear_filter(&mut self) {
        self.apply(RecordFilter::default());
    }

    fn ensure_known(&self, location: &LocationFilter) -> Result<()> {
        match location {
            LocationFilter::Named(name) if !self.locations.contains(name) => {
                Err(Error::UnknownLocation {
                    location: name.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn apply(&mut self, filter: RecordFilter) {
        self.visible = if filter.is_unfiltered() {
            (0..self.store.len()).collect()
        } else {
            filter.matching_indices(self.store.records())
        };
        self.filter = filter;

        let summary = self.summary();
        debug!(
            location = %self.filter.location,
            dates = ?self.filter.dates,
            visible = summary.total,
            "View updated"
        );
        if summary.kicked_off > 0 {
            warn!(kicked_off = summary.kicked_off, "Calls released by the IVR in view");
        }
    }
}

impl From<LoadedData> for Session {
    fn from(data: LoadedData) -> Self {
        Self::new(data.locations, data.store)
    }
}
