//! Shared utilities for CLI commands.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ts_core::{AuthorFilter, RejectedEntry};

use crate::Config;
use crate::cli::SourceArgs;
use crate::input::STDIO_PATH;

/// Values accepted in place of an end date to leave a range open.
const OPEN_END_VALUES: [&str; 2] = ["now", "now()"];

/// Parse a calendar day given as `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2024-01-31)"))
}

/// Parse an optional end date, where `now()` means no upper bound.
pub fn parse_end_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    match s.map(str::trim) {
        None => Ok(None),
        Some(s) if s.is_empty() || OPEN_END_VALUES.iter().any(|v| s.eq_ignore_ascii_case(v)) => {
            Ok(None)
        }
        Some(s) => parse_date(s).map(Some),
    }
}

/// Author filter from `--users`, falling back to the configured users.
pub fn author_filter(source: &SourceArgs, config: &Config) -> AuthorFilter {
    AuthorFilter::parse(source.users.as_deref().unwrap_or(&config.users))
}

/// Where a report goes: `--output`, or `default_name` in the configured output directory.
pub fn output_path(source: &SourceArgs, config: &Config, default_name: &str) -> PathBuf {
    source
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(default_name))
}

/// Opens `path` for writing, or stdout when it is `-`.
pub fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == STDIO_PATH {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Reports skipped worklogs, failing in strict mode.
pub fn check_rejected(rejected: &[RejectedEntry], strict: bool) -> Result<()> {
    if rejected.is_empty() {
        return Ok(());
    }
    for entry in rejected {
        eprintln!(
            "Skipped worklog by {} on {} ({}): {}",
            entry.author, entry.issue_key, entry.day, entry.error
        );
    }
    if strict {
        anyhow::bail!("{} worklog(s) had unreadable durations", rejected.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(parse_date("01/31/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_end_date_open_values() {
        assert_eq!(parse_end_date(None).unwrap(), None);
        assert_eq!(parse_end_date(Some("now()")).unwrap(), None);
        assert_eq!(parse_end_date(Some("NOW")).unwrap(), None);
        assert_eq!(
            parse_end_date(Some("2024-02-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert!(parse_end_date(Some("tomorrow")).is_err());
    }

    #[test]
    fn test_author_filter_falls_back_to_config() {
        let config = Config {
            users: "alice".to_string(),
            ..Config::default()
        };
        let mut source = SourceArgs {
            input: PathBuf::from("-"),
            users: None,
            output: None,
            strict: false,
        };
        assert_eq!(
            author_filter(&source, &config),
            AuthorFilter::Users("alice".to_string())
        );

        source.users = Some("ALL".to_string());
        assert_eq!(author_filter(&source, &config), AuthorFilter::All);
    }

    #[test]
    fn test_output_path_defaults_to_output_dir() {
        let config = Config {
            output_dir: PathBuf::from("/tmp/reports"),
            ..Config::default()
        };
        let source = SourceArgs {
            input: PathBuf::from("-"),
            users: None,
            output: None,
            strict: false,
        };
        assert_eq!(
            output_path(&source, &config, "timesheet.txt"),
            PathBuf::from("/tmp/reports/timesheet.txt")
        );
    }

    #[test]
    fn test_check_rejected_strict() {
        let entry = RejectedEntry {
            issue_key: ts_core::IssueKey::new("PROJ-1").unwrap(),
            author: ts_core::AuthorName::new("alice").unwrap(),
            day: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            error: ts_core::parse_hours("h").unwrap_err(),
        };
        assert!(check_rejected(&[], true).is_ok());
        assert!(check_rejected(std::slice::from_ref(&entry), false).is_ok());
        let err = check_rejected(&[entry], true).unwrap_err();
        assert_eq!(err.to_string(), "1 worklog(s) had unreadable durations");
    }
}
