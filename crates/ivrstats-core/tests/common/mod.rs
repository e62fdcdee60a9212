//! Shared fixtures for the ivrstats-core integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use ivrstats_core::{CallLogSource, CallRecord, Error, Outcome, Result};

/// Build a record at `location` on `date` with the given outcome
pub fn record(location: &str, date: &str, outcome: Outcome) -> CallRecord {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("fixture date");
    CallRecord {
        location: location.to_string(),
        timestamp: day.and_hms_opt(10, 30, 0).expect("fixture time"),
        caller: "(555) 123-4567".to_string(),
        destination: "(555) 000-1000".to_string(),
        duration: 125,
        outcome,
    }
}

/// Three calls: two at "A" in January, one at "B" in February
pub fn three_call_log() -> Vec<CallRecord> {
    vec![
        record("A", "2024-01-01", Outcome::ReleasedByCaller),
        record("A", "2024-01-15", Outcome::ReleasedByIvr),
        record("B", "2024-02-01", Outcome::from("1 -> Sales")),
    ]
}

/// A mixed log over three locations and two months
pub fn mixed_call_log() -> Vec<CallRecord> {
    vec![
        record("North", "2024-01-02", Outcome::ReleasedByCaller),
        record("South", "2024-01-05", Outcome::ReleasedByIvr),
        record("North", "2024-01-20", Outcome::from("2 -> Support")),
        record("East", "2024-01-31", Outcome::ReleasedByIvr),
        record("North", "2024-02-01", Outcome::ReleasedByIvr),
        record("South", "2024-02-14", Outcome::ReleasedByCaller),
        record("North", "2024-02-29", Outcome::ReleasedByCaller),
    ]
}

/// In-memory stand-in for the FreePBX database
pub struct MemorySource {
    pub locations: Vec<String>,
    pub records: Vec<CallRecord>,
    pub fail_call_log: bool,
}

impl MemorySource {
    pub fn new(locations: &[&str], records: Vec<CallRecord>) -> Self {
        Self {
            locations: locations.iter().map(ToString::to_string).collect(),
            records,
            fail_call_log: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail_call_log = true;
        self
    }
}

#[async_trait]
impl CallLogSource for MemorySource {
    async fn fetch_locations(&self) -> Result<Vec<String>> {
        Ok(self.locations.clone())
    }

    async fn fetch_call_log(&self) -> Result<Vec<CallRecord>> {
        if self.fail_call_log {
            return Err(Error::Database("Call log query failed: connection reset".to_string()));
        }
        Ok(self.records.clone())
    }
}
