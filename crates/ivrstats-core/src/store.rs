//! Record store and the loader that fills it from the backing query

use crate::Result;
use crate::types::{ALL_LOCATIONS, CallRecord};
use async_trait::async_trait;
use tracing::{error, info};

/// Source of the call log and the known location names
///
/// Implemented by the database adapter; tests substitute in-memory sources.
#[async_trait]
pub trait CallLogSource {
    /// Names of the locations offered in the location selector
    async fn fetch_locations(&self) -> Result<Vec<String>>;

    /// Every call log row, newest first
    async fn fetch_call_log(&self) -> Result<Vec<CallRecord>>;
}

/// Immutable list of every call record loaded for the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<CallRecord>,
}

impl RecordStore {
    /// Wrap a fully loaded record list
    #[must_use]
    pub const fn new(records: Vec<CallRecord>) -> Self {
        Self { records }
    }

    /// All records in load order
    #[must_use]
    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CallRecord> {
        self.records.get(index)
    }
}

impl From<Vec<CallRecord>> for RecordStore {
    fn from(records: Vec<CallRecord>) -> Self {
        Self::new(records)
    }
}

/// Everything fetched from the backing store at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedData {
    /// Harvested location names, without the "All Locations" entry
    pub locations: Vec<String>,
    /// The call log
    pub store: RecordStore,
}

impl LoadedData {
    /// Entries of the location selector, "All Locations" first
    #[must_use]
    pub fn selector_entries(&self) -> Vec<String> {
        selector_entries(&self.locations)
    }
}

/// Entries of the location selector for `locations`, "All Locations" first
#[must_use]
pub fn selector_entries(locations: &[String]) -> Vec<String> {
    std::iter::once(ALL_LOCATIONS.to_string())
        .chain(locations.iter().cloned())
        .collect()
}

/// Fetch the location list and then the call log
///
/// The call log is only fetched once the location list has loaded. Either
/// failure discards everything fetched so far; no retry is attempted.
///
/// # Errors
///
/// Returns the first error reported by `source`.
pub async fn load<S>(source: &S) -> Result<LoadedData>
where
    S: CallLogSource + Sync + ?Sized,
{
    let locations = source.fetch_locations().await.inspect_err(|e| {
        error!(error = %e, "Failed to load location list");
    })?;
    info!(count = locations.len(), "Loaded location list");

    let records = source.fetch_call_log().await.inspect_err(|e| {
        error!(error = %e, "Failed to load call log");
    })?;
    info!(count = records.len(), "Loaded call log");

    Ok(LoadedData {
        locations,
        store: RecordStore::new(records),
    })
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::types::Outcome;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        locations: Result<Vec<String>>,
        records: Result<Vec<CallRecord>>,
        call_log_fetches: AtomicUsize,
    }

    impl FixedSource {
        fn new(locations: Result<Vec<String>>, records: Result<Vec<CallRecord>>) -> Self {
            Self {
                locations,
                records,
                call_log_fetches: AtomicUsize::new(0),
            }
        }

        fn call_log_fetches(&self) -> usize {
            self.call_log_fetches.load(Ordering::SeqCst)
        }
    }

    fn clone_result<T: Clone>(result: &Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value.clone()),
            Err(e) => Err(Error::Database(e.to_string())),
        }
    }

    #[async_trait]
    impl CallLogSource for FixedSource {
        async fn fetch_locations(&self) -> Result<Vec<String>> {
            clone_result(&self.locations)
        }

        async fn fetch_call_log(&self) -> Result<Vec<CallRecord>> {
            self.call_log_fetches.fetch_add(1, Ordering::SeqCst);
            clone_result(&self.records)
        }
    }

    fn sample_record() -> CallRecord {
        CallRecord {
            location: "West".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 4, 2)
                .unwrap()
                .and_hms_opt(10, 15, 0)
                .unwrap(),
            caller: "(555) 123-4567".to_string(),
            destination: "(555) 000-1000".to_string(),
            duration: 75,
            outcome: Outcome::from("2 -> 3002"),
        }
    }

    #[tokio::test]
    async fn test_load_success() {
        let source = FixedSource::new(
            Ok(vec!["West".to_string(), "East".to_string()]),
            Ok(vec![sample_record()]),
        );

        let loaded = load(&source).await.unwrap();

        assert_eq!(source.call_log_fetches(), 1);

        assert_eq!(loaded.locations, vec!["West", "East"]);
        assert_eq!(loaded.store.len(), 1);
        assert_eq!(
            loaded.selector_entries(),
            vec!["All Locations", "West", "East"]
        );
    }

    #[tokio::test]
    async fn test_load_call_log_failure_populates_nothing() {
        let source = FixedSource::new(
            Ok(vec!["West".to_string()]),
            Err(Error::Database("Table 'cdr' doesn't exist".to_string())),
        );

        let err = load(&source).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[tokio::test]
    async fn test_load_location_failure_skips_call_log() {
        let source = FixedSource::new(
            Err(Error::Database("connection reset".to_string())),
            Ok(vec![sample_record()]),
        );

        let err = load(&source).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(source.call_log_fetches(), 0);
    }

    #[test]
    fn test_store_accessors() {
        let store = RecordStore::from(vec![sample_record()]);

        assert!(!store.is_empty());
        assert_eq!(store.get(0), Some(&sample_record()));
        assert_eq!(store.get(1), None);
        assert!(RecordStore::default().is_empty());
    }
}
