//! Error taxonomy for report building.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while normalizing worklogs or constructing report inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A duration string had a missing or non-numeric magnitude.
    #[error("invalid duration format {input:?}: {reason}")]
    InvalidDurationFormat { input: String, reason: String },

    /// A date range was constructed with its start after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A report month could not be parsed as `YYYY-MM`.
    #[error("invalid month {input:?}: expected YYYY-MM")]
    InvalidMonth { input: String },
}
