//! Plain-text rendering of the call table and totals

use ivrstats_core::CallRecord;
use ivrstats_core::CallSummary;
use ivrstats_core::format::{format_duration, format_timestamp};
use std::io::{self, Write};

/// Column headings of the call table
pub const HEADINGS: [&str; 6] = [
    "Location:",
    "Timestamp:",
    "Caller:",
    "IVR's DID:",
    "Call Length:",
    "End Result:",
];

/// Display cells of one record, in heading order
#[must_use]
pub fn row_cells(record: &CallRecord) -> [String; 6] {
    [
        record.location.clone(),
        format_timestamp(&record.timestamp),
        record.caller.clone(),
        record.destination.clone(),
        format_duration(record.duration),
        record.outcome.to_string(),
    ]
}

/// Write `records` as a left-aligned table sized to its widest cells
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_table<'a, W, I>(out: &mut W, records: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CallRecord>,
{
    let rows: Vec<[String; 6]> = records.into_iter().map(row_cells).collect();

    let mut widths = HEADINGS.map(|heading| heading.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, &widths, HEADINGS.iter().copied())?;
    for row in &rows {
        write_line(out, &widths, row.iter().map(String::as_str))?;
    }
    Ok(())
}

/// Write the totals line
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_summary<W: Write>(out: &mut W, summary: &CallSummary) -> io::Result<()> {
    writeln!(out, "{summary}")
}

fn write_line<'a, W: Write>(
    out: &mut W,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}
