//! Location and date-range filtering over the record store

use crate::format::parse_date_field;
use crate::types::{CallRecord, LocationFilter};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar days
///
/// Only constructed with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range from its first and last day
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDateRange`] if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from the raw text of the start and end date fields
    ///
    /// Returns `Ok(None)` when neither field holds a date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteDateRange`] if only one bound is set, a
    /// validation error if either bound is malformed, and
    /// [`Error::InvalidDateRange`] if the end comes before the start.
    pub fn parse(start: &str, end: &str) -> Result<Option<Self>> {
        match (
            parse_date_field("start", start)?,
            parse_date_field("end", end)?,
        ) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            (None, None) => Ok(None),
            _ => Err(Error::IncompleteDateRange),
        }
    }

    /// First day of the range
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls within the range, bounds included
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Combined location and date predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Location selection
    pub location: LocationFilter,
    /// Optional inclusive date range
    pub dates: Option<DateRange>,
}

impl RecordFilter {
    /// Filter on location and optional date range
    #[must_use]
    pub const fn new(location: LocationFilter, dates: Option<DateRange>) -> Self {
        Self { location, dates }
    }

    /// Whether this filter lets every record through
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        matches!(self.location, LocationFilter::All) && self.dates.is_none()
    }

    /// Whether `record` satisfies both predicates
    #[must_use]
    pub fn matches(&self, record: &CallRecord) -> bool {
        self.location.matches(&record.location)
            && self.dates.is_none_or(|range| range.contains(record.date()))
    }

    /// Apply the filter, keeping the input order
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [CallRecord]) -> Vec<&'a CallRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    /// Positions in `records` of the entries passing the filter
    #[must_use]
    pub fn matching_indices(&self, records: &[CallRecord]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(index, _)| index)
            .collect()
    }
}

/// Filter `records` on location and optional date range, keeping their order
#[must_use]
pub fn filter_records<'a>(
    records: &'a [CallRecord],
    location: &LocationFilter,
    dates: Option<&DateRange>,
) -> Vec<&'a CallRecord> {
    RecordFilter::new(location.clone(), dates.copied()).apply(records)
}
