//! Daily command: per-day issue lists and logged hours for one month.

use std::io::Write;

use anyhow::{Context, Result};
use ts_core::{DailyReport, Issue, ReportMonth, build_daily_report};

use super::util::{author_filter, check_rejected, open_output, output_path};
use crate::Config;
use crate::cli::DailyArgs;
use crate::input::load_issues;
use crate::output::{format_hours, write_daily_csv};

/// Default file name for daily reports.
pub const DEFAULT_OUTPUT: &str = "timesheet.csv";

/// Builds the daily report for already-loaded issues.
pub fn generate(issues: &[Issue], args: &DailyArgs, config: &Config) -> Result<DailyReport> {
    let month: ReportMonth = args.month.parse()?;
    let authors = author_filter(&args.source, config);

    tracing::info!(%month, %authors, "building daily report");
    Ok(build_daily_report(issues, &authors, month))
}

/// Runs the daily command.
pub fn run(args: &DailyArgs, config: &Config) -> Result<()> {
    let issues = load_issues(&args.source.input)?;
    let report = generate(&issues, args, config)?;
    check_rejected(&report.rejected, args.source.strict)?;

    let path = output_path(&args.source, config, DEFAULT_OUTPUT);
    let mut writer = open_output(&path)?;
    write_daily_csv(&mut writer, &report, config.fixed_hours)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer.flush()?;

    eprintln!(
        "Wrote {} days ({} with logged work, {} hours) to {}",
        report.month.days().count(),
        report.days.len(),
        format_hours(report.total_logged_hours()),
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

    fn args(month: &str, users: Option<&str>) -> DailyArgs {
        DailyArgs {
            month: month.to_string(),
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
             "worklogs": [
                {"author": "alice", "timeSpent": "2h", "started": "2024-03-04T09:00:00Z", "timeSpentSeconds": 7200},
                {"author": "alice", "timeSpent": "1h", "started": "2024-03-04T15:00:00Z"},
                {"author": "bob", "timeSpent": "4h", "started": "2024-03-04T09:00:00Z"}
             ]}
        ]"#;
        parse_issues(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_generate_aggregates_per_day() {
        let report = generate(&issues(), &args("2024-03", Some("alice")), &Config::default()).unwrap();

        let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let stats = report.stats(day).unwrap();
        assert_eq!(stats.issues_display(), "PROJ-1");
        assert_eq!(stats.total_logged_seconds(), 3 * 3600);
    }

    #[test]
    fn test_generate_rejects_bad_month() {
        let err = generate(&issues(), &args("March", None), &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "invalid month \"March\": expected YYYY-MM");
    }
}
