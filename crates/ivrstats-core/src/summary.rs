//! Aggregate call counts for a set of records

use crate::types::{CallRecord, Outcome};
use serde::{Deserialize, Serialize};

/// Totals shown next to the call table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSummary {
    /// Number of calls
    pub total: usize,
    /// Calls released by the caller
    pub abandoned: usize,
    /// Calls released by the IVR
    pub kicked_off: usize,
}

impl CallSummary {
    /// Count totals over `records` in one pass
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CallRecord>,
    {
        records
            .into_iter()
            .fold(Self::default(), |mut summary, record| {
                summary.total += 1;
                match record.outcome {
                    Outcome::ReleasedByCaller => summary.abandoned += 1,
                    Outcome::ReleasedByIvr => summary.kicked_off += 1,
                    Outcome::Routed(_) => {}
                }
                summary
            })
    }

    /// Calls that reached a menu selection
    #[must_use]
    pub const fn routed(&self) -> usize {
        self.total
            .saturating_sub(self.abandoned)
            .saturating_sub(self.kicked_off)
    }
}

impl std::fmt::Display for CallSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {}  Abandoned: {}  Kicked off: {}",
            self.total, self.abandoned, self.kicked_off
        )
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn record(outcome: Outcome) -> CallRecord {
        CallRecord {
            location: "A".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            caller: "(555) 123-4567".to_string(),
            destination: "(555) 000-1000".to_string(),
            duration: 12,
            outcome,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = CallSummary::from_records(&[]);
        assert_eq!(summary, CallSummary::default());
        assert_eq!(summary.routed(), 0);
    }

    #[test]
    fn test_counts_by_outcome() {
        let records = vec![
            record(Outcome::ReleasedByCaller),
            record(Outcome::ReleasedByIvr),
            record(Outcome::from("1 -> 2001")),
            record(Outcome::ReleasedByCaller),
        ];

        let summary = CallSummary::from_records(&records);

        assert_eq!(
            summary,
            CallSummary {
                total: 4,
                abandoned: 2,
                kicked_off: 1,
            }
        );
        assert_eq!(summary.routed(), 1);
    }

    #[test]
    fn test_routed_saturates_on_inconsistent_counts() {
        let summary = CallSummary {
            total: 2,
            abandoned: 2,
            kicked_off: 1,
        };
        assert_eq!(summary.routed(), 0);
    }

    #[test]
    fn test_display() {
        let summary = CallSummary {
            total: 10,
            abandoned: 3,
            kicked_off: 0,
        };
        assert_eq!(summary.to_string(), "Total: 10  Abandoned: 3  Kicked off: 0");
    }

    fn arb_outcome() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            Just(Outcome::ReleasedByCaller),
            Just(Outcome::ReleasedByIvr),
            "[0-9] -> [0-9]{4}".prop_map(Outcome::Routed),
        ]
    }

    proptest! {
        #[test]
        fn test_summary_bounds(outcomes in prop::collection::vec(arb_outcome(), 0..100)) {
            let records: Vec<CallRecord> = outcomes.into_iter().map(record).collect();
            let summary = CallSummary::from_records(&records);

            prop_assert_eq!(summary.total, records.len());
            prop_assert!(summary.abandoned + summary.kicked_off <= summary.total);
        }
    }
}
