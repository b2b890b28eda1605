//! Per-day accumulation of touched issues and logged time.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

use crate::error::ReportError;
use crate::filter::DateRange;
use crate::types::IssueKey;
use crate::worklog::WorkEntry;

/// Issues touched and time logged on one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyStats {
    /// Issue keys in first-seen order, without repeats.
    issues: Vec<IssueKey>,
    seconds: u64,
}

impl DailyStats {
    pub const fn total_logged_seconds(&self) -> u64 {
        self.seconds
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "a day's logged seconds stay far below 2^52"
    )]
    pub fn logged_hours(&self) -> f64 {
        self.seconds as f64 / 3600.0
    }

    /// Issue keys joined for display, e.g. `PROJ-1, PROJ-4`.
    pub fn issues_display(&self) -> String {
        self.issues
            .iter()
            .map(IssueKey::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn record(&mut self, key: &IssueKey, seconds: u64) {
        if !self.issues.contains(key) {
            self.issues.push(key.clone());
        }
        self.seconds = self.seconds.saturating_add(seconds);
    }
}

/// Accumulates [`DailyStats`] per calendar day.
///
/// Accumulation is per worklog: an issue is listed once per day, while every
/// worklog added for that day contributes its seconds to the total. Stats for
/// a day are created on the first entry added for it.
#[derive(Debug, Clone, Default)]
pub struct DailyAggregator {
    days: BTreeMap<NaiveDate, DailyStats>,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one worklog's contribution to `day`.
    ///
    /// When the entry's logged time cannot be determined the stats are left
    /// untouched and the error is returned.
    pub fn add_entry(&mut self, day: NaiveDate, entry: &WorkEntry<'_>) -> Result<(), ReportError> {
        let seconds = entry.logged_seconds()?;
        self.days
            .entry(day)
            .or_default()
            .record(entry.issue_key(), seconds);
        Ok(())
    }

    /// Stats for `day`, or `None` when nothing was logged.
    pub fn stats(&self, day: NaiveDate) -> Option<&DailyStats> {
        self.days.get(&day)
    }

    pub fn into_days(self) -> BTreeMap<NaiveDate, DailyStats> {
        self.days
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportMonth {
    first_day: NaiveDate,
}

impl ReportMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    /// Every day of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let month = self.first_day.month();
        self.first_day
            .iter_days()
            .take_while(move |day| day.month() == month)
    }

    /// The month as a half-open day range.
    pub fn range(&self) -> DateRange {
        let next = self.first_day.checked_add_months(Months::new(1));
        match DateRange::new(self.first_day, next) {
            Ok(range) => range,
            Err(_) => DateRange::starting(self.first_day),
        }
    }
}

impl FromStr for ReportMonth {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReportError::InvalidMonth {
            input: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}
