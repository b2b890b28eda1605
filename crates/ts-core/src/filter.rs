//! Worklog selection by author and date.

use std::fmt;

use chrono::NaiveDate;

use crate::error::ReportError;
use crate::types::AuthorName;
use crate::worklog::WorkEntry;

/// Sentinel accepted in place of a user list to report everyone.
pub const ALL_AUTHORS: &str = "all";

/// Which worklog authors belong in a report.
///
/// A user list is kept as the lower-cased filter text. An author matches when
/// that text *contains* the author's lower-cased name, so `"alice,bob"` also
/// matches an author called `"ali"`. Callers rely on partial-name filters, so
/// this is not an exact set membership test.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthorFilter {
    /// Every author matches.
    #[default]
    All,
    /// Lower-cased filter text, e.g. `"alice,bob"`.
    Users(String),
}

impl AuthorFilter {
    /// Builds a filter from user input. Blank input and `all` (any case) report everyone.
    pub fn parse(users: &str) -> Self {
        let users = users.trim();
        if users.is_empty() || users.eq_ignore_ascii_case(ALL_AUTHORS) {
            Self::All
        } else {
            Self::Users(users.to_lowercase())
        }
    }

    pub fn matches(&self, author: &AuthorName) -> bool {
        match self {
            Self::All => true,
            Self::Users(users) => users.contains(&author.as_str().to_lowercase()),
        }
    }
}

impl fmt::Display for AuthorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_AUTHORS}"),
            Self::Users(users) => write!(f, "{users}"),
        }
    }
}

/// A half-open span of calendar days: `start` is included, `end` is not.
///
/// Without an `end` the range is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting a start after the end.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, ReportError> {
        if let Some(end) = end.filter(|end| start > *end) {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range with no upper bound.
    pub const fn starting(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && self.end.is_none_or(|end| day < end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "[{}, {end})", self.start),
            None => write!(f, "[{}, ..)", self.start),
        }
    }
}

/// How a worklog's logged day is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCriterion {
    /// Logged day falls within a half-open range (flat reports).
    Range(DateRange),
    /// Logged day equals one calendar day (daily aggregation).
    Day(NaiveDate),
}

impl DateCriterion {
    pub fn matches_day(&self, day: NaiveDate) -> bool {
        match self {
            Self::Range(range) => range.contains(day),
            Self::Day(target) => day == *target,
        }
    }
}

/// Decides whether a single worklog belongs in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogFilter {
    authors: AuthorFilter,
    dates: DateCriterion,
}

impl WorklogFilter {
    pub const fn new(authors: AuthorFilter, dates: DateCriterion) -> Self {
        Self { authors, dates }
    }

    /// Pure predicate over author and logged day.
    pub fn matches(&self, entry: &WorkEntry<'_>) -> bool {
        self.authors.matches(entry.author_name()) && self.dates.matches_day(entry.logged_day())
    }
}
