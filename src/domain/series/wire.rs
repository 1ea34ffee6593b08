//! Wire format for samples: the device's CSV.
//!
//! Fields are split on `,` with no quoting or escaping, so labels containing
//! commas are not supported.

use super::Sample;
use crate::error::RowError;
use serde::{Deserialize, Serialize};

/// Outcome of a table parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    pub accepted: usize,
    pub rejected: usize,
}

/// Parse one `label,value` row.
///
/// Surrounding whitespace (including the `\r` of the device's CRLF line
/// endings) is ignored.
pub fn parse_row(raw: &str) -> Result<Sample, RowError> {
    let row = raw.trim();
    if row.is_empty() {
        return Err(RowError::Empty);
    }

    let fields: Vec<&str> = row.split(',').collect();
    if fields.len() != 2 {
        return Err(RowError::ColumnCount(fields.len()));
    }

    let label = fields[0].trim();
    if label.is_empty() {
        return Err(RowError::MissingLabel);
    }

    let raw_value = fields[1].trim();
    let value: f64 = raw_value
        .parse()
        .map_err(|_| RowError::InvalidValue(raw_value.to_string()))?;
    if !value.is_finite() {
        return Err(RowError::NonFinite(raw_value.to_string()));
    }

    Ok(Sample::new(label, value))
}

/// Parse a header-plus-rows table.
///
/// The first non-blank line is the header and is discarded. Blank lines are
/// skipped; malformed rows are dropped and counted in the report.
pub fn parse_table(raw: &str) -> (Vec<Sample>, ParseReport) {
    let mut lines = raw
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());
    lines.next();

    let mut samples = Vec::new();
    let mut report = ParseReport::default();

    for (index, line) in lines {
        match parse_row(line) {
            Ok(sample) => {
                samples.push(sample);
                report.accepted += 1;
            }
            Err(e) => {
                tracing::debug!(line = index + 1, error = %e, "Dropping malformed row");
                report.rejected += 1;
            }
        }
    }

    (samples, report)
}
