//! Report building over already-fetched issues.
//!
//! Two modes share the same filtering rules:
//! - flat: one [`ReportRow`] per matching worklog within a half-open date range
//! - daily: one [`DailyStats`] per calendar day of a month
//!
//! Output follows input issue order, then worklog order within each issue.
//! A worklog whose logged time cannot be read is skipped and recorded as a
//! [`RejectedEntry`]; the rest of the report is still built.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::daily::{DailyAggregator, DailyStats, ReportMonth};
use crate::error::ReportError;
use crate::duration::parse_hours;
use crate::filter::{AuthorFilter, DateCriterion, DateRange, WorklogFilter};
use crate::types::{AuthorName, IssueKey};
use crate::worklog::{Issue, WorkEntry};

/// Date format used in flat report rows.
pub const ROW_DATE_FORMAT: &str = "%m/%d/%Y";

/// One line of a flat timesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub project: String,
    pub issue_type: String,
    pub issue_key: IssueKey,
    pub summary: String,
    pub author: AuthorName,
    pub hours: f64,
    pub date: NaiveDate,
}

impl ReportRow {
    fn from_entry(entry: &WorkEntry<'_>, hours: f64) -> Self {
        Self {
            project: entry.project_name().to_string(),
            issue_type: entry.issue_type_name().to_string(),
            issue_key: entry.issue_key().clone(),
            summary: entry.summary().to_string(),
            author: entry.author_name().clone(),
            hours,
            date: entry.row_day(),
        }
    }

    /// The row date as `MM/DD/YYYY`.
    pub fn formatted_date(&self) -> String {
        self.date.format(ROW_DATE_FORMAT).to_string()
    }
}

/// A worklog left out of a report because its logged time was unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub issue_key: IssueKey,
    pub author: AuthorName,
    pub day: NaiveDate,
    pub error: ReportError,
}

impl RejectedEntry {
    fn new(entry: &WorkEntry<'_>, error: ReportError) -> Self {
        Self {
            issue_key: entry.issue_key().clone(),
            author: entry.author_name().clone(),
            day: entry.logged_day(),
            error,
        }
    }
}

/// Result of [`build_flat_report`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatReport {
    pub rows: Vec<ReportRow>,
    pub rejected: Vec<RejectedEntry>,
}

impl FlatReport {
    pub fn total_hours(&self) -> f64 {
        self.rows.iter().map(|row| row.hours).sum()
    }
}

/// Result of [`build_daily_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub month: ReportMonth,
    pub days: BTreeMap<NaiveDate, DailyStats>,
    pub rejected: Vec<RejectedEntry>,
}

impl DailyReport {
    /// Stats for `day`, or `None` when nothing matching was logged.
    pub fn stats(&self, day: NaiveDate) -> Option<&DailyStats> {
        self.days.get(&day)
    }

    /// Every day of the month paired with its stats, in calendar order.
    pub fn calendar(&self) -> impl Iterator<Item = (NaiveDate, Option<&DailyStats>)> {
        self.month.days().map(|day| (day, self.stats(day)))
    }

    /// Seconds logged over the whole month, saturating at `u64::MAX`.
    pub fn total_logged_seconds(&self) -> u64 {
        self.days
            .values()
            .map(DailyStats::total_logged_seconds)
            .fold(0, u64::saturating_add)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "hours are only displayed; rounding past 2^52 seconds is acceptable"
    )]
    pub fn total_logged_hours(&self) -> f64 {
        self.total_logged_seconds() as f64 / 3600.0
    }
}

fn warn_rejected(entry: &WorkEntry<'_>, error: &ReportError) {
    tracing::warn!(
        issue = %entry.issue_key(),
        author = %entry.author_name(),
        day = %entry.logged_day(),
        %error,
        "skipping worklog"
    );
}

/// Builds one row per worklog whose author matches and whose logged day
/// falls within `range`.
pub fn build_flat_report(issues: &[Issue], authors: &AuthorFilter, range: DateRange) -> FlatReport {
    let filter = WorklogFilter::new(authors.clone(), DateCriterion::Range(range));
    let mut report = FlatReport::default();

    for entry in issues.iter().flat_map(Issue::entries) {
        if !filter.matches(&entry) {
            continue;
        }
        match parse_hours(entry.duration_text()) {
            Ok(hours) => report.rows.push(ReportRow::from_entry(&entry, hours)),
            Err(error) => {
                warn_rejected(&entry, &error);
                report.rejected.push(RejectedEntry::new(&entry, error));
            }
        }
    }

    tracing::debug!(
        issues = issues.len(),
        rows = report.rows.len(),
        rejected = report.rejected.len(),
        %range,
        %authors,
        "built flat report"
    );
    report
}

/// Aggregates matching worklogs into per-day stats for every day of `month`.
pub fn build_daily_report(issues: &[Issue], authors: &AuthorFilter, month: ReportMonth) -> DailyReport {
    let in_month = WorklogFilter::new(authors.clone(), DateCriterion::Range(month.range()));
    let candidates: Vec<WorkEntry<'_>> = issues
        .iter()
        .flat_map(Issue::entries)
        .filter(|entry| in_month.matches(entry))
        .collect();

    let mut aggregator = DailyAggregator::new();
    let mut rejected = Vec::new();

    for day in month.days() {
        let filter = WorklogFilter::new(authors.clone(), DateCriterion::Day(day));
        for entry in candidates.iter().filter(|entry| filter.matches(entry)) {
            if let Err(error) = aggregator.add_entry(day, entry) {
                warn_rejected(entry, &error);
                rejected.push(RejectedEntry::new(entry, error));
            }
        }
    }

    let days = aggregator.into_days();
    tracing::debug!(
        issues = issues.len(),
        days = days.len(),
        rejected = rejected.len(),
        %month,
        %authors,
        "built daily report"
    );
    DailyReport {
        month,
        days,
        rejected,
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "hour values here are exactly representable"
)]
mod tests {
    use super::*;
    use crate::worklog::fixtures::{at, issue, worklog};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> DateRange {
        DateRange::new(day(2024, 1, 1), Some(day(2024, 2, 1))).unwrap()
    }

    #[test]
    fn single_day_worklog_becomes_one_row() {
        let issues = vec![
            issue("PROJ-1").with_worklog(worklog("alice", "1d", at(2024, 1, 5))),
            issue("PROJ-2"),
        ];

        let report = build_flat_report(&issues, &AuthorFilter::parse("alice"), january());

        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.hours, 8.0);
        assert_eq!(row.formatted_date(), "01/05/2024");
        assert_eq!(row.issue_key.as_str(), "PROJ-1");
        assert_eq!(row.project, "Platform");
        assert_eq!(row.issue_type, "Task");
        assert_eq!(row.summary, "Summary of PROJ-1");
        assert_eq!(row.author.as_str(), "alice");
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn rows_follow_issue_then_worklog_order() {
        let issues = vec![
            issue("PROJ-9")
                .with_worklog(worklog("bob", "2h", at(2024, 1, 20)))
                .with_worklog(worklog("alice", "1h", at(2024, 1, 3))),
            issue("PROJ-1").with_worklog(worklog("alice", "30m", at(2024, 1, 1))),
        ];

        let report = build_flat_report(&issues, &AuthorFilter::All, january());

        let order: Vec<_> = report
            .rows
            .iter()
            .map(|row| (row.issue_key.as_str(), row.author.as_str()))
            .collect();
        assert_eq!(order, [("PROJ-9", "bob"), ("PROJ-9", "alice"), ("PROJ-1", "alice")]);
        assert_eq!(report.total_hours(), 3.5);
    }

    #[test]
    fn range_boundaries_are_half_open() {
        let issues = vec![
            issue("PROJ-1")
                .with_worklog(worklog("alice", "1h", at(2024, 1, 1)))
                .with_worklog(worklog("alice", "2h", at(2024, 2, 1))),
        ];

        let report = build_flat_report(&issues, &AuthorFilter::All, january());

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].date, day(2024, 1, 1));
    }

    #[test]
    fn unmatched_authors_are_left_out() {
        let issues = vec![
            issue("PROJ-1")
                .with_worklog(worklog("alice", "1h", at(2024, 1, 5)))
                .with_worklog(worklog("charlie", "1h", at(2024, 1, 5)))
                .with_worklog(worklog("Bob", "1h", at(2024, 1, 5))),
        ];

        let report = build_flat_report(&issues, &AuthorFilter::parse("alice,bob"), january());

        let authors: Vec<_> = report.rows.iter().map(|row| row.author.as_str()).collect();
        assert_eq!(authors, ["alice", "Bob"]);
    }

    #[test]
    fn bad_duration_is_rejected_without_dropping_other_rows() {
        let issues = vec![
            issue("PROJ-1")
                .with_worklog(worklog("alice", "1h", at(2024, 1, 5)))
                .with_worklog(worklog("alice", "oops h", at(2024, 1, 6)))
                .with_worklog(worklog("alice", "2h", at(2024, 1, 7))),
        ];

        let report = build_flat_report(&issues, &AuthorFilter::All, january());

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        let rejected = &report.rejected[0];
        assert_eq!(rejected.issue_key.as_str(), "PROJ-1");
        assert_eq!(rejected.day, day(2024, 1, 6));
        assert!(matches!(
            rejected.error,
            ReportError::InvalidDurationFormat { .. }
        ));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let issues = vec![issue("PROJ-1").with_worklog(worklog("alice", "1h", at(2024, 1, 5)))];
        let before = issues.clone();

        let _ = build_flat_report(&issues, &AuthorFilter::All, january());
        let _ = build_daily_report(&issues, &AuthorFilter::All, ReportMonth::new(2024, 1).unwrap());

        assert_eq!(issues, before);
    }

    #[test]
    fn daily_report_groups_by_day() {
        let issues = vec![
            issue("PROJ-1")
                .with_worklog(worklog("alice", "1h", at(2024, 1, 5)))
                .with_worklog(worklog("alice", "2h", at(2024, 1, 5)))
                .with_worklog(worklog("alice", "4h", at(2024, 1, 8))),
            issue("PROJ-2")
                .with_worklog(worklog("alice", "30m", at(2024, 1, 5)))
                .with_worklog(worklog("bob", "8h", at(2024, 1, 5))),
        ];

        let report = build_daily_report(
            &issues,
            &AuthorFilter::parse("alice"),
            ReportMonth::new(2024, 1).unwrap(),
        );

        let fifth = report.stats(day(2024, 1, 5)).unwrap();
        assert_eq!(fifth.issues_display(), "PROJ-1, PROJ-2");
        assert_eq!(fifth.total_logged_seconds(), 3 * 3600 + 1800);

        let eighth = report.stats(day(2024, 1, 8)).unwrap();
        assert_eq!(eighth.issues_display(), "PROJ-1");
        assert_eq!(eighth.total_logged_seconds(), 4 * 3600);

        assert!(report.stats(day(2024, 1, 6)).is_none());
        assert_eq!(report.total_logged_seconds(), 7 * 3600 + 1800);
    }

    #[test]
    fn daily_report_ignores_other_months() {
        let issues = vec![
            issue("PROJ-1")
                .with_worklog(worklog("alice", "1h", at(2023, 12, 31)))
                .with_worklog(worklog("alice", "1h", at(2024, 2, 1))),
        ];

        let report = build_daily_report(&issues, &AuthorFilter::All, ReportMonth::new(2024, 1).unwrap());

        assert!(report.days.is_empty());
    }

    #[test]
    fn daily_calendar_lists_every_day() {
        let issues = vec![issue("PROJ-1").with_worklog(worklog("alice", "1h", at(2024, 2, 10)))];

        let report = build_daily_report(&issues, &AuthorFilter::All, ReportMonth::new(2024, 2).unwrap());

        let calendar: Vec<_> = report.calendar().collect();
        assert_eq!(calendar.len(), 29);
        assert_eq!(calendar.iter().filter(|(_, stats)| stats.is_some()).count(), 1);
        assert_eq!(calendar[9].0, day(2024, 2, 10));
        assert!(calendar[9].1.is_some());
    }

    #[test]
    fn row_date_prefers_creation_day_while_filtering_on_logged_day() {
        let mut late = worklog("alice", "1h", at(2024, 1, 31));
        late.created = Some(at(2024, 2, 2));
        let mut early = worklog("alice", "1h", at(2023, 12, 30));
        early.created = Some(at(2024, 1, 2));
        let issues = vec![issue("PROJ-1").with_worklog(late).with_worklog(early)];

        let report = build_flat_report(&issues, &AuthorFilter::All, january());

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].formatted_date(), "02/02/2024");
    }

    #[test]
    fn daily_total_saturates_instead_of_overflowing() {
        let mut huge = worklog("alice", "1h", at(2024, 1, 5));
        huge.time_spent_seconds = Some(u64::MAX);
        let mut one = worklog("alice", "1h", at(2024, 1, 6));
        one.time_spent_seconds = Some(1);
        let issues = vec![issue("PROJ-1").with_worklog(huge).with_worklog(one)];

        let report = build_daily_report(&issues, &AuthorFilter::All, ReportMonth::new(2024, 1).unwrap());

        assert_eq!(report.stats(day(2024, 1, 6)).unwrap().total_logged_seconds(), 1);
        assert_eq!(report.total_logged_seconds(), u64::MAX);
        assert!(report.total_logged_hours().is_finite());
    }

    #[test]
    fn daily_total_hours() {
        let issues = vec![
            issue("PROJ-1")
                .with_worklog(worklog("alice", "1h 30m", at(2024, 1, 5)))
                .with_worklog(worklog("alice", "6h", at(2024, 1, 9))),
        ];

        let report = build_daily_report(&issues, &AuthorFilter::All, ReportMonth::new(2024, 1).unwrap());

        assert_eq!(report.total_logged_hours(), 7.5);
    }

    #[test]
    fn daily_report_rejects_bad_duration_but_keeps_day() {
        let issues = vec![
            issue("PROJ-1")
                .with_worklog(worklog("alice", "2h", at(2024, 1, 5)))
                .with_worklog(worklog("alice", "d", at(2024, 1, 5))),
        ];

        let report = build_daily_report(&issues, &AuthorFilter::All, ReportMonth::new(2024, 1).unwrap());

        assert_eq!(report.rejected.len(), 1);
        let rejected = &report.rejected[0];
        assert_eq!(rejected.author.as_str(), "alice");
        assert_eq!(rejected.day, day(2024, 1, 5));
        let stats = report.stats(day(2024, 1, 5)).unwrap();
        assert_eq!(stats.total_logged_seconds(), 7200);
    }
}
