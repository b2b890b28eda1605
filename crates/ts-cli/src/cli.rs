//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Timesheet generator for issue tracker worklogs.
///
/// Reads issues exported from the tracker and turns their worklogs into a
/// timesheet: a flat table of logged work, or a per-day summary for a month.
#[derive(Debug, Parser)]
#[command(name = "timesheet", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write one tab-separated row per matching worklog.
    Flat(FlatArgs),

    /// Write one CSV row per day of a month with touched issues and logged hours.
    Daily(DailyArgs),
}

/// Options shared by every report.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Issues JSON exported from the tracker, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Comma-separated usernames, or `all`. Defaults to the configured users.
    #[arg(short, long)]
    pub users: Option<String>,

    /// Output file, or `-` for stdout. Defaults to a file in the configured output directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail when any worklog has an unreadable duration instead of skipping it.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct FlatArgs {
    /// First day to include (YYYY-MM-DD).
    #[arg(short, long)]
    pub start: String,

    /// First day to exclude (YYYY-MM-DD), or `now()` for no upper bound.
    #[arg(short, long)]
    pub end: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct DailyArgs {
    /// Month to summarize (YYYY-MM).
    #[arg(short, long)]
    pub month: String,

    #[command(flatten)]
    pub source: SourceArgs,
}
