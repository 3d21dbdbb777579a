//! The user's interactive shell.

use std::ffi::OsString;
use tokio::process::Command;

/// Shell used when `$SHELL` is unset or empty.
#[cfg(not(windows))]
const DEFAULT_SHELL: &str = "/bin/bash";

/// A shell program plus the arguments that make it evaluate one command
/// string.
///
/// # Example
///
/// ```rust
/// use command_probe::Shell;
///
/// // A non-interactive shell, e.g. for tests that must not read rc files.
/// let shell = Shell::new("/bin/sh", ["-c"]);
/// assert_eq!(shell.program(), "/bin/sh");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    program: OsString,
    args: Vec<OsString>,
}

impl Shell {
    /// A shell that runs `program` with `args` followed by the command string.
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The user's login shell from `$SHELL` (default `/bin/bash`), run as
    /// `-i -c <command>` so aliases, functions and rc-file `PATH` changes
    /// are visible.
    ///
    /// On Windows this is `cmd /C <command>`.
    #[cfg(not(windows))]
    pub fn from_env() -> Self {
        let program = std::env::var_os("SHELL")
            .filter(|shell| !shell.is_empty())
            .unwrap_or_else(|| OsString::from(DEFAULT_SHELL));
        Self::new(program, ["-i", "-c"])
    }

    #[cfg(windows)]
    pub fn from_env() -> Self {
        Self::new("cmd", ["/C"])
    }

    pub fn program(&self) -> &std::ffi::OsStr {
        &self.program
    }

    /// A command that makes this shell evaluate `line`.
    pub fn command(&self, line: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(line);
        command
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::from_env()
    }
}
