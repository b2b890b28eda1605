//! Core domain logic for the timesheet generator.
//!
//! This crate contains the fundamental types and logic for:
//! - Duration parsing: normalizing `"1w 2d 3h 30m"` style text to hours
//! - Filtering: selecting worklogs by author and date
//! - Aggregation: per-day issue lists and logged time
//! - Reports: flat timesheet rows and monthly daily summaries
//!
//! Issues are consumed already fetched from the tracker; nothing here does I/O.

pub mod daily;
pub mod duration;
mod error;
pub mod filter;
pub mod report;
pub mod types;
pub mod worklog;

pub use daily::{DailyAggregator, DailyStats, ReportMonth};
pub use duration::{WorkDuration, parse_hours};
pub use error::ReportError;
pub use filter::{ALL_AUTHORS, AuthorFilter, DateCriterion, DateRange, WorklogFilter};
pub use report::{
    DailyReport, FlatReport, ROW_DATE_FORMAT, RejectedEntry, ReportRow, build_daily_report,
    build_flat_report,
};
pub use types::{AuthorName, IssueKey, ValidationError};
pub use worklog::{Issue, WorkEntry, Worklog, parse_timestamp};
