//! Timesheet generator CLI library.
//!
//! This crate provides the CLI interface for the timesheet generator.

mod cli;
pub mod commands;
mod config;
pub mod input;
pub mod output;

pub use cli::{Cli, Commands, DailyArgs, FlatArgs, SourceArgs};
pub use config::Config;
