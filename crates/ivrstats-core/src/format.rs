//! Display formatting for call log fields

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Width of a `YYYY-MM-DD` date
const DATE_LEN: usize = 10;

/// Number of trailing digits used for a North American phone number
const PHONE_DIGITS: usize = 10;

/// Label carried by the start date field
pub const START_LABEL: &str = "Start:";

/// Label carried by the end date field
pub const END_LABEL: &str = "End:";

/// Format a call length in seconds as `HH:MM:SS`
///
/// The hour field is zero padded to two digits and grows past that for
/// calls of 100 hours or more.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Format a raw number as `(AAA) BBB-CCCC` from its last ten characters
///
/// Shorter input is returned unchanged. No attempt is made to check that
/// the input is numeric.
#[must_use]
pub fn format_phone(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let Some(tail) = chars.len().checked_sub(PHONE_DIGITS).and_then(|at| chars.get(at..)) else {
        return raw.to_string();
    };

    let (area, rest) = tail.split_at(3);
    let (exchange, subscriber) = rest.split_at(3);

    format!(
        "({}) {}-{}",
        area.iter().collect::<String>(),
        exchange.iter().collect::<String>(),
        subscriber.iter().collect::<String>()
    )
}

/// Format a call start time as shown in the timestamp column
#[must_use]
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%d %I:%M:%S %p").to_string()
}

/// Parse a date bound typed or picked into a date field
///
/// Fields carry a label such as `Start: 2024-01-31`; the label is dropped
/// and the last ten characters are read as `YYYY-MM-DD`. A field holding
/// only its label (or nothing) is unset and yields `None`.
///
/// # Errors
///
/// Returns a validation error naming `field` if anything besides the label
/// is present and it is not a valid `YYYY-MM-DD` value.
pub fn parse_date_field(field: &str, text: &str) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    let value = text
        .strip_prefix(START_LABEL)
        .or_else(|| text.strip_prefix(END_LABEL))
        .unwrap_or(text)
        .trim();
    if value.is_empty() {
        return Ok(None);
    }

    let chars: Vec<char> = value.chars().collect();
    let tail: String = chars
        .len()
        .checked_sub(DATE_LEN)
        .and_then(|at| chars.get(at..))
        .ok_or_else(|| Error::validation(field, format!("{value:?} is not a YYYY-MM-DD date")))?
        .iter()
        .collect();

    NaiveDate::parse_from_str(&tail, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| Error::validation(field, format!("{tail:?} is not a YYYY-MM-DD date: {e}")))
}
