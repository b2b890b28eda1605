//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default number of hours a working day is expected to contain.
pub const DEFAULT_FIXED_HOURS: u32 = 8;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Author filter used when `--users` is not given.
    pub users: String,
    /// Directory default output files are written to.
    pub output_dir: PathBuf,
    /// Value of the fixed hours column in daily reports.
    pub fixed_hours: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users: ts_core::ALL_AUTHORS.to_string(),
            output_dir: PathBuf::from("."),
            fixed_hours: DEFAULT_FIXED_HOURS,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TIMESHEET_*)
        figment = figment.merge(Env::prefixed("TIMESHEET_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for timesheet.
///
/// On Linux: `~/.config/timesheet`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timesheet"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_reports_everyone() {
        let config = Config::default();
        assert_eq!(config.users, "all");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.fixed_hours, 8);
    }

    #[test]
    fn test_dirs_config_path_ends_with_timesheet() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "timesheet");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"users = "alice,bob""#).unwrap();
        writeln!(file, "fixed_hours = 6").unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.users, "alice,bob");
        assert_eq!(config.fixed_hours, 6);
    }
}
