//! Spreadsheet-friendly writers for built reports.

use std::borrow::Cow;
use std::io::Write;

use anyhow::Result;
use ts_core::{DailyReport, FlatReport, ROW_DATE_FORMAT};

/// Header of the tab-separated flat report.
pub const FLAT_HEADER: [&str; 7] = [
    "Project",
    "Type",
    "Key",
    "Title",
    "Username",
    "Time Spent",
    "Date",
];

/// Header of the daily CSV report.
pub const DAILY_HEADER: [&str; 4] = ["Date", "Issues", "Fixed Hours", "Logged Hours"];

/// Formats decimal hours without trailing zeros, e.g. `8`, `59.5`.
pub fn format_hours(hours: f64) -> String {
    format!("{hours}")
}

/// Makes free text safe for an unquoted TSV field.
///
/// Tabs and line breaks become single spaces; everything else, quotes
/// included, is written as is.
fn tsv_field(text: &str) -> Cow<'_, str> {
    if text.contains(['\t', '\n', '\r']) {
        Cow::Owned(text.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(text)
    }
}

/// Writes one tab-separated line per row, after the header.
///
/// Fields are never quoted.
pub fn write_flat_tsv<W: Write>(writer: W, report: &FlatReport) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    wtr.write_record(FLAT_HEADER)?;

    for row in &report.rows {
        wtr.write_record([
            &*tsv_field(&row.project),
            &*tsv_field(&row.issue_type),
            &*tsv_field(row.issue_key.as_str()),
            &*tsv_field(&row.summary),
            &*tsv_field(row.author.as_str()),
            format_hours(row.hours).as_str(),
            row.formatted_date().as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one CSV line per day of the report month, after the header.
///
/// Days without logged work keep the fixed hours and log zero.
pub fn write_daily_csv<W: Write>(writer: W, report: &DailyReport, fixed_hours: u32) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let fixed_hours = fixed_hours.to_string();

    wtr.write_record(DAILY_HEADER)?;

    for (day, stats) in report.calendar() {
        let issues = stats.map(ts_core::DailyStats::issues_display).unwrap_or_default();
        let logged = stats.map_or(0.0, ts_core::DailyStats::logged_hours);
        wtr.write_record([
            day.format(ROW_DATE_FORMAT).to_string().as_str(),
            issues.as_str(),
            fixed_hours.as_str(),
            format_hours(logged).as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
