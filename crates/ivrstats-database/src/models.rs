//! Database models for the FreePBX CDR queries

use chrono::NaiveDateTime;
use ivrstats_core::format::format_phone;
use ivrstats_core::{CallRecord, Outcome};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the IVR call log join
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CallLogRowDb {
    /// IVR description, shown as the location; NULL in FreePBX when unset
    pub ivrname: Option<String>,

    /// IVR id the call entered
    pub ivrid: Option<String>,

    /// Call start time
    pub tstamp: NaiveDateTime,

    /// Caller number as stored in the CDR
    pub caller: String,

    /// Dialed DID
    pub callednum: String,

    /// Billed seconds
    pub calllength: i64,

    /// How the call left the IVR; NULL when the menu entry has no selection
    pub endresult: Option<String>,
}

impl CallLogRowDb {
    /// Convert into a call record with formatted numbers
    ///
    /// NULL text columns become empty labels.
    #[must_use]
    pub fn into_record(self) -> CallRecord {
        CallRecord {
            location: self.ivrname.unwrap_or_default(),
            timestamp: self.tstamp,
            caller: format_phone(&self.caller),
            destination: format_phone(&self.callednum),
            duration: u64::try_from(self.calllength).unwrap_or(0),
            outcome: Outcome::from(self.endresult.unwrap_or_default()),
        }
    }
}

impl From<CallLogRowDb> for CallRecord {
    fn from(row: CallLogRowDb) -> Self {
        row.into_record()
    }
}

/// One row of the location list query
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationRowDb {
    /// IVR description
    pub description: String,
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn row(calllength: i64, endresult: &str) -> CallLogRowDb {
        CallLogRowDb {
            ivrname: Some("Lincoln Elementary".to_string()),
            ivrid: Some("3".to_string()),
            tstamp: NaiveDate::from_ymd_opt(2024, 9, 3)
                .unwrap()
                .and_hms_opt(7, 45, 12)
                .unwrap(),
            caller: "15551234567".to_string(),
            callednum: "5559876543".to_string(),
            calllength,
            endresult: Some(endresult.to_string()),
        }
    }

    #[test]
    fn test_row_into_record() {
        let record = row(125, "1 -> 2001").into_record();

        assert_eq!(record.location, "Lincoln Elementary");
        assert_eq!(record.caller, "(555) 123-4567");
        assert_eq!(record.destination, "(555) 987-6543");
        assert_eq!(record.duration, 125);
        assert_eq!(record.outcome, Outcome::Routed("1 -> 2001".to_string()));
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 9, 3).unwrap());
    }

    #[test]
    fn test_row_outcome_labels() {
        assert_eq!(
            CallRecord::from(row(3, "Released by caller")).outcome,
            Outcome::ReleasedByCaller
        );
        assert_eq!(
            CallRecord::from(row(3, "Released by IVR")).outcome,
            Outcome::ReleasedByIvr
        );
    }

    #[test]
    fn test_negative_length_clamped() {
        assert_eq!(row(-1, "Released by IVR").into_record().duration, 0);
    }

    #[test]
    fn test_null_text_columns_become_empty_labels() {
        let mut unnamed = row(42, "Released by caller");
        unnamed.ivrname = None;
        unnamed.endresult = None;

        let record = unnamed.into_record();

        assert_eq!(record.location, "");
        assert_eq!(record.outcome, Outcome::Routed(String::new()));
        assert_eq!(record.outcome.to_string(), "");
        assert_eq!(record.duration, 42);
    }

    #[test]
    fn test_short_numbers_pass_through() {
        let mut short = row(10, "Released by caller");
        short.caller = "101".to_string();

        assert_eq!(short.into_record().caller, "101");
    }
}
