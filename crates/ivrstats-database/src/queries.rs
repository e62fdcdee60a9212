//! Queries against the FreePBX `asterisk` and `asteriskcdrdb` schemas

use crate::models::{CallLogRowDb, LocationRowDb};
use ivrstats_core::{CallRecord, Error, Result};
use sqlx::MySqlPool;

/// Joins the CDR table with the IVR configuration, one row per call start
/// time, newest first.
///
/// `endresult` is `Released by caller` when the caller hung up (`s`),
/// `Released by IVR` when the IVR timed out (`t`), and otherwise the menu
/// selection followed by its destination extension.
const CALL_LOG_QUERY: &str = r"
    SELECT
        asterisk.ivr_details.description AS ivrname,
        ivrid,
        tstamp,
        caller,
        callednum,
        calllength,
        CASE
            WHEN strcmp(sq2.selected, 's') = 0
                THEN 'Released by caller'
            WHEN strcmp(sq2.selected, 't') = 0
                THEN 'Released by IVR'
            WHEN char_length(sq2.selected) = 4
                THEN concat(ie.selection, ' -> ', sq2.selected)
            ELSE
                concat(ie.selection, ' -> ', substr(ie.dest, 17, 4))
        END AS endresult
    FROM (
        SELECT DISTINCT
            calldate AS tstamp,
            substr(asterisk.incoming.destination, 5, 1) AS ivrid,
            asterisk.incoming.extension AS ivrext,
            src AS caller,
            did AS callednum,
            dst AS selected,
            billsec AS calllength
        FROM asteriskcdrdb.cdr
        JOIN asterisk.incoming ON asterisk.incoming.extension = did
    ) sq2
    JOIN asterisk.ivr_entries ie
        ON (substr(ie.dest, 17, 4) = sq2.selected OR char_length(sq2.selected) = 1)
        AND ie.ivr_id = sq2.ivrid
    JOIN asterisk.ivr_details ON asterisk.ivr_details.id = sq2.ivrid
    WHERE sq2.callednum IN (ivrext)
    GROUP BY tstamp
    ORDER BY tstamp DESC
";

/// IVR descriptions not matching the exclusion pattern, in table order
const LOCATION_QUERY: &str =
    "SELECT description FROM asterisk.ivr_details WHERE description NOT LIKE ?";

/// Call log operations
#[derive(Debug)]
pub struct CallLogQueries;

impl CallLogQueries {
    /// Fetch the complete call log
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_all(pool: &MySqlPool) -> Result<Vec<CallRecord>> {
        tracing::debug!("Executing call log query");

        let rows = sqlx::query_as::<_, CallLogRowDb>(CALL_LOG_QUERY)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                tracing::error!("Database query error in fetch_all: {}", e);
                Error::Database(format!("Call log query failed: {e}"))
            })?;

        tracing::info!("Call log query returned {} rows", rows.len());
        Ok(rows.into_iter().map(CallLogRowDb::into_record).collect())
    }
}

/// Location list operations
#[derive(Debug)]
pub struct LocationQueries;

impl LocationQueries {
    /// Fetch location names, skipping descriptions that contain `excluded_marker`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_known(pool: &MySqlPool, excluded_marker: &str) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, LocationRowDb>(LOCATION_QUERY)
            .bind(exclusion_pattern(excluded_marker))
            .fetch_all(pool)
            .await
            .map_err(|e| {
                tracing::error!("Database query error in fetch_known: {}", e);
                Error::Database(format!("Location query failed: {e}"))
            })?;

        Ok(rows.into_iter().map(|row| row.description).collect())
    }
}

/// `LIKE` pattern matching any description that contains `marker`
///
/// `%`, `_` and `\` in the marker are escaped so they match literally.
#[must_use]
pub fn exclusion_pattern(marker: &str) -> String {
    let mut pattern = String::with_capacity(marker.len() + 2);
    pattern.push('%');
    for c in marker.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
