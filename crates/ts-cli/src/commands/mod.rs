//! CLI subcommand implementations.

pub mod daily;
pub mod flat;
pub mod util;
