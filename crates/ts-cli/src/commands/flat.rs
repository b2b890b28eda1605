//! Flat command: one tab-separated row per matching worklog.

use std::io::Write;

use anyhow::{Context, Result};
use ts_core::{DateRange, FlatReport, Issue, build_flat_report};

use super::util::{
    author_filter, check_rejected, open_output, output_path, parse_date, parse_end_date,
};
use crate::Config;
use crate::cli::FlatArgs;
use crate::input::load_issues;
use crate::output::{format_hours, write_flat_tsv};

/// Default file name for flat reports.
pub const DEFAULT_OUTPUT: &str = "timesheet.txt";

/// Builds the flat report for already-loaded issues.
pub fn generate(issues: &[Issue], args: &FlatArgs, config: &Config) -> Result<FlatReport> {
    let start = parse_date(&args.start)?;
    let end = parse_end_date(args.end.as_deref())?;
    let range = DateRange::new(start, end)?;
    let authors = author_filter(&args.source, config);

    tracing::info!(%range, %authors, "building flat report");
    Ok(build_flat_report(issues, &authors, range))
}

/// Runs the flat command.
pub fn run(args: &FlatArgs, config: &Config) -> Result<()> {
    let issues = load_issues(&args.source.input)?;
    let report = generate(&issues, args, config)?;
    check_rejected(&report.rejected, args.source.strict)?;

    let path = output_path(&args.source, config, DEFAULT_OUTPUT);
    let mut writer = open_output(&path)?;
    write_flat_tsv(&mut writer, &report)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer.flush()?;

    eprintln!(
        "Wrote {} rows ({} hours) to {}",
        report.rows.len(),
        format_hours(report.total_hours()),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::SourceArgs;
    use crate::input::parse_issues;

    fn args(start: &str, end: Option<&str>, users: Option<&str>) -> FlatArgs {
        FlatArgs {
            start: start.to_string(),
            end: end.map(String::from),
            source: SourceArgs {
                input: PathBuf::from("-"),
                users: users.map(String::from),
                output: None,
                strict: false,
            },
        }
    }

    fn issues() -> Vec<Issue> {
        let json = r#"[
            {"key": "PROJ-1", "project": "Platform", "issueType": "Task", "summary": "First",
             "worklogs": [{"author": "alice", "timeSpent": "1d", "started": "2024-01-05T10:00:00.000+0100"}]},
            {"key": "PROJ-2", "project": "Platform", "issueType": "Bug", "summary": "Second", "worklogs": []}
        ]"#;
        parse_issues(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_generate_single_row() {
        let report = generate(
            &issues(),
            &args("2024-01-01", Some("2024-02-01"), Some("alice")),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(report.rows.len(), 1);
        assert!((report.rows[0].hours - 8.0).abs() < f64::EPSILON);
        assert_eq!(report.rows[0].formatted_date(), "01/05/2024");
    }

    #[test]
    fn test_generate_open_end() {
        let report = generate(
            &issues(),
            &args("2024-01-01", Some("now()"), None),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_generate_uses_configured_users() {
        let config = Config {
            users: "bob".to_string(),
            ..Config::default()
        };
        let report = generate(&issues(), &args("2024-01-01", None, None), &config).unwrap();
        assert!(report.rows.is_empty());
    }

    #[test]
    fn test_generate_rejects_inverted_range() {
        let err = generate(
            &issues(),
            &args("2024-02-01", Some("2024-01-01"), None),
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid date range"));
    }
}
