//! Where a resolved program lives.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Text shown for programs the shell knows but cannot point at.
pub const SHELL_BUILTIN_LABEL: &str = "Shell Builtin/Alias";

/// Result of a successful existence check.
///
/// # Example
///
/// ```rust
/// use command_probe::Location;
/// use std::path::Path;
///
/// let location = Location::Executable("/usr/bin/git".into());
/// assert_eq!(location.path(), Some(Path::new("/usr/bin/git")));
/// assert_eq!(location.to_string(), "/usr/bin/git");
///
/// assert_eq!(Location::ShellBuiltin.to_string(), "Shell Builtin/Alias");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Location {
    /// Found on `PATH`.
    Executable(PathBuf),

    /// Reported by the interactive shell's `command -v`.
    ///
    /// This is a path for executables only the login environment can see,
    /// an alias definition, or the bare name of a function or built-in.
    ShellReported(String),

    /// The shell accepted the name but printed nothing.
    ShellBuiltin,
}

impl Location {
    /// Path to the executable, when the location is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Executable(path) => Some(path),
            _ => None,
        }
    }

    /// Whether only the interactive shell could see the program.
    pub fn is_shell_only(&self) -> bool {
        matches!(self, Self::ShellReported(_) | Self::ShellBuiltin)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executable(path) => write!(f, "{}", path.display()),
            Self::ShellReported(text) => f.write_str(text),
            Self::ShellBuiltin => f.write_str(SHELL_BUILTIN_LABEL),
        }
    }
}
