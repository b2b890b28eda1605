//! Issues and their worklogs, as delivered by the issue tracker client.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::duration::WorkDuration;
use crate::error::ReportError;
use crate::types::{AuthorName, IssueKey};

/// Timestamp format used by the tracker's REST API, e.g. `2024-01-05T10:00:00.000+0100`.
const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// A tracked work item with its logged time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: IssueKey,
    /// Project display name.
    pub project: String,
    /// Issue type display name (e.g. "Bug", "Task").
    pub issue_type: String,
    pub summary: String,
    /// Worklogs in the order the tracker returned them.
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

/// A single logged-time record attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    pub author: AuthorName,
    /// Raw compound duration, e.g. `"1d 2h"`.
    pub time_spent: String,
    /// When the work was started, in the author's UTC offset.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub started: DateTime<FixedOffset>,
    /// Logged time in seconds as counted by the tracker, when it supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<u64>,
    /// When the worklog record itself was created, when the tracker supplies it.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<DateTime<FixedOffset>>,
}

impl Issue {
    /// Creates an issue without worklogs.
    pub fn new(
        key: IssueKey,
        project: impl Into<String>,
        issue_type: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            key,
            project: project.into(),
            issue_type: issue_type.into(),
            summary: summary.into(),
            worklogs: Vec::new(),
        }
    }

    /// Appends a worklog, keeping tracker order.
    #[must_use]
    pub fn with_worklog(mut self, worklog: Worklog) -> Self {
        self.worklogs.push(worklog);
        self
    }

    /// Iterates the issue's worklogs as flattened entries, in worklog order.
    pub fn entries(&self) -> impl Iterator<Item = WorkEntry<'_>> {
        self.worklogs.iter().map(move |worklog| WorkEntry {
            issue: self,
            worklog,
        })
    }
}

impl Worklog {
    pub fn new(
        author: AuthorName,
        time_spent: impl Into<String>,
        started: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            author,
            time_spent: time_spent.into(),
            started,
            time_spent_seconds: None,
            created: None,
        }
    }
}

/// A read-only view of one worklog together with the issue it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct WorkEntry<'a> {
    issue: &'a Issue,
    worklog: &'a Worklog,
}

impl<'a> WorkEntry<'a> {
    pub const fn issue_key(&self) -> &'a IssueKey {
        &self.issue.key
    }

    pub fn project_name(&self) -> &'a str {
        &self.issue.project
    }

    pub fn issue_type_name(&self) -> &'a str {
        &self.issue.issue_type
    }

    pub fn summary(&self) -> &'a str {
        &self.issue.summary
    }

    pub const fn author_name(&self) -> &'a AuthorName {
        &self.worklog.author
    }

    pub fn duration_text(&self) -> &'a str {
        &self.worklog.time_spent
    }

    /// Calendar day the work was logged on, in the author's own offset.
    pub fn logged_day(&self) -> NaiveDate {
        self.worklog.started.date_naive()
    }

    /// Day printed on a timesheet row: the worklog's creation day when known,
    /// otherwise the logged day.
    pub fn row_day(&self) -> NaiveDate {
        self.worklog
            .created
            .map_or_else(|| self.logged_day(), |created| created.date_naive())
    }

    /// Parses the raw duration text.
    pub fn duration(&self) -> Result<WorkDuration, ReportError> {
        WorkDuration::parse(&self.worklog.time_spent)
    }

    /// Logged seconds, preferring the tracker's own count over the parsed text.
    pub fn logged_seconds(&self) -> Result<u64, ReportError> {
        match self.worklog.time_spent_seconds {
            Some(seconds) => Ok(seconds),
            None => self.duration().map(WorkDuration::seconds),
        }
    }
}

/// Accepts RFC 3339 as well as the tracker's `+hhmm` offset form.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_timestamp(&s))
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Parses a worklog timestamp.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_str(s, TRACKER_TIMESTAMP_FORMAT))
}


#[cfg(test)]
mod tests {
    use super::fixtures::{at, issue, worklog};
    use super::*;

    #[test]
    fn deserializes_tracker_issue() {
        let json = r#"{
            "key": "PROJ-7",
            "project": "Platform",
            "issueType": "Bug",
            "summary": "Crash on start",
            "worklogs": [
                {"author": "alice", "timeSpent": "1h 30m", "started": "2024-01-05T10:00:00.000+0100"},
                {"author": "bob", "timeSpent": "2h", "started": "2024-01-06T09:00:00Z", "timeSpentSeconds": 7200}
            ]
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key.as_str(), "PROJ-7");
        assert_eq!(issue.issue_type, "Bug");
        assert_eq!(issue.worklogs.len(), 2);
        assert_eq!(issue.worklogs[0].started.offset().local_minus_utc(), 3600);
        assert_eq!(issue.worklogs[1].time_spent_seconds, Some(7200));
        assert_eq!(issue.worklogs[0].created, None);
    }

    #[test]
    fn created_timestamp_sets_row_day_only() {
        let json = r#"{"author": "alice", "timeSpent": "1h",
                       "started": "2024-01-05T10:00:00Z",
                       "created": "2024-01-09T08:15:00.000+0100"}"#;
        let log: Worklog = serde_json::from_str(json).unwrap();
        let issue = issue("PROJ-1").with_worklog(log);
        let entry = issue.entries().next().unwrap();

        assert_eq!(entry.logged_day(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(entry.row_day(), NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn row_day_falls_back_to_logged_day() {
        let issue = issue("PROJ-1").with_worklog(worklog("alice", "1h", at(2024, 1, 5)));
        let entry = issue.entries().next().unwrap();
        assert_eq!(entry.row_day(), entry.logged_day());
    }

    #[test]
    fn garbage_created_timestamp_is_rejected() {
        let json = r#"{"author": "alice", "timeSpent": "1h",
                       "started": "2024-01-05T10:00:00Z", "created": "later"}"#;
        let result: Result<Worklog, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn missing_author_is_rejected() {
        let json = r#"{"timeSpent": "1h", "started": "2024-01-05T10:00:00Z"}"#;
        let result: Result<Worklog, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn empty_author_is_rejected() {
        let json = r#"{"author": "", "timeSpent": "1h", "started": "2024-01-05T10:00:00Z"}"#;
        let result: Result<Worklog, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let json = r#"{"author": "alice", "timeSpent": "1h", "started": "yesterday"}"#;
        let result: Result<Worklog, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn logged_day_uses_author_offset() {
        // 23:30 at +02:00 is still Jan 5 for the author, although Jan 5 21:30 UTC.
        let started = parse_timestamp("2024-01-05T23:30:00+02:00").unwrap();
        let issue = issue("PROJ-1").with_worklog(worklog("alice", "1h", started));
        let entry = issue.entries().next().unwrap();
        assert_eq!(entry.logged_day(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn entries_preserve_worklog_order() {
        let issue = issue("PROJ-1")
            .with_worklog(worklog("alice", "1h", at(2024, 1, 2)))
            .with_worklog(worklog("bob", "2h", at(2024, 1, 1)));
        let authors: Vec<_> = issue.entries().map(|e| e.author_name().as_str()).collect();
        assert_eq!(authors, ["alice", "bob"]);
    }

    #[test]
    fn logged_seconds_prefers_tracker_count() {
        let mut log = worklog("alice", "1h", at(2024, 1, 2));
        log.time_spent_seconds = Some(3660);
        let issue = issue("PROJ-1").with_worklog(log);
        let entry = issue.entries().next().unwrap();
        assert_eq!(entry.logged_seconds().unwrap(), 3660);
        assert_eq!(entry.duration().unwrap().seconds(), 3600);
    }
}
