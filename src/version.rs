//! Version number extraction from captured version output.

use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("Invalid regex pattern"))
}

/// Extract the first `major.minor.patch` triple from version output.
///
/// Handles the usual shapes:
///
/// - `git version 2.43.0` -> 2.43.0
/// - `ripgrep 14.1.0 (rev e50df40a19)` -> 14.1.0
/// - `Python 3.12.1` -> 3.12.1
///
/// Returns `None` when no triple is present; two-part versions such as
/// `jq-1.7` are not guessed at.
///
/// # Example
///
/// ```rust
/// use command_probe::parse_version;
///
/// let version = parse_version("git version 2.43.0").unwrap();
/// assert_eq!(version.to_string(), "2.43.0");
/// assert!(parse_version("no version here").is_none());
/// ```
pub fn parse_version(output: &str) -> Option<Version> {
    let found = version_pattern().find(output)?;
    Version::parse(found.as_str()).ok()
}
