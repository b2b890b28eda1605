//! Loading exported issues from a file or stdin.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use ts_core::Issue;

/// Path value meaning stdin or stdout.
pub const STDIO_PATH: &str = "-";

/// Reads a JSON array of issues from `path`, or from stdin when it is `-`.
pub fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    if path.as_os_str() == STDIO_PATH {
        let stdin = io::stdin();
        return parse_issues(stdin.lock()).context("failed to read issues from stdin");
    }

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_issues(BufReader::new(file))
        .with_context(|| format!("failed to read issues from {}", path.display()))
}

/// Parses a JSON array of issues.
pub fn parse_issues<R: Read>(reader: R) -> Result<Vec<Issue>> {
    let issues: Vec<Issue> = serde_json::from_reader(reader).context("invalid issues JSON")?;
    let worklogs: usize = issues.iter().map(|issue| issue.worklogs.len()).sum();
    tracing::debug!(issues = issues.len(), worklogs, "loaded issues");
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_issue_list() {
        let json = r#"[
            {"key": "PROJ-1", "project": "Platform", "issueType": "Task", "summary": "One",
             "worklogs": [{"author": "alice", "timeSpent": "1h", "started": "2024-01-05T10:00:00Z"}]},
            {"key": "PROJ-2", "project": "Platform", "issueType": "Bug", "summary": "Two"}
        ]"#;

        let issues = parse_issues(json.as_bytes()).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].worklogs.len(), 1);
        assert!(issues[1].worklogs.is_empty());
    }

    #[test]
    fn missing_fields_fail_with_context() {
        let json = r#"[{"key": "PROJ-1", "summary": "No project"}]"#;
        let err = parse_issues(json.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "invalid issues JSON");
        assert!(format!("{err:#}").contains("missing field"));
    }

    #[test]
    fn missing_file_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("issues.json");
        let err = load_issues(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to open"));
    }
}
