//! Existence resolution: is a program installed, a shell built-in, or absent?

use crate::execution::{Launcher, ProcessLauncher};
use crate::{Candidate, Location, ResolveError, ResolveOptions};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Locates programs, first on `PATH` and then through the interactive shell.
///
/// # Resolution Process
///
/// 1. Look the name up on `PATH`; a hit is final and no shell is started
/// 2. Ask the interactive shell `command -v <name>` (built-ins, aliases and
///    functions are invisible to a `PATH` lookup)
/// 3. Shell succeeded with output: that output is the location; succeeded
///    with no output: a shell built-in/alias; anything else: not found
///
/// The shell probe is bounded by [`ResolveOptions::shell_timeout`] and by the
/// cancellation token. The launcher restores the terminal after it.
///
/// Only the probe's standard output is read; its standard error (job-control
/// warnings from an interactive shell without a tty) is ignored.
#[derive(Debug, Clone)]
pub struct Resolver<L> {
    launcher: L,
    options: ResolveOptions,
}

impl<L: Launcher> Resolver<L> {
    /// Create a resolver that runs its shell probe through `launcher`.
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            options: ResolveOptions::default(),
        }
    }

    /// Replace the default [`ResolveOptions`].
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `program` to a [`Location`].
    pub async fn resolve(&self, program: &str, cancel: &CancellationToken) -> Result<Location, ResolveError> {
        if program.trim().is_empty() {
            return Err(ResolveError::not_found(program));
        }

        if let Some(path) = find_on_path(program) {
            debug!(program, path = %path.display(), "Found on PATH");
            return Ok(Location::Executable(path));
        }

        if cfg!(windows) {
            return Err(ResolveError::not_found(program));
        }

        self.probe_shell(program, cancel).await
    }

    async fn probe_shell(&self, program: &str, cancel: &CancellationToken) -> Result<Location, ResolveError> {
        let probe = Candidate::shell(["command", "-v", program]);
        debug!(program, "Not on PATH, asking the interactive shell");

        let captured = match self
            .launcher
            .launch(&probe, self.options.shell_timeout, cancel)
            .await
        {
            Ok(captured) => captured,
            Err(e) => {
                debug!(program, error = %e, "Shell probe abandoned");
                return Err(ResolveError::not_found(program));
            }
        };

        if !captured.exited_ok {
            debug!(program, exit_code = ?captured.exit_code, "Shell does not know the program");
            return Err(ResolveError::not_found(program));
        }

        // Interactive shells without a tty complain about job control on
        // stderr; only stdout carries the answer.
        let reported = captured.stdout.trim();
        if reported.is_empty() {
            Ok(Location::ShellBuiltin)
        } else {
            Ok(Location::ShellReported(reported.to_string()))
        }
    }
}

/// `PATH` lookup; the first match wins, as with `which` and `where`.
fn find_on_path(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Resolve `program` with real processes and the user's shell.
///
/// # Example
///
/// ```rust,no_run
/// use command_probe::resolve;
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     match resolve("git", &CancellationToken::new()).await {
///         Ok(location) => println!("git: {}", location),
///         Err(e) => eprintln!("{} ({})", e, e.fix_suggestion()),
///     }
/// }
/// ```
pub async fn resolve(program: &str, cancel: &CancellationToken) -> Result<Location, ResolveError> {
    Resolver::new(ProcessLauncher::from_env())
        .resolve(program, cancel)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Script, ScriptedLauncher};
    use crate::InvocationMode;

    const MISSING: &str = "definitely_not_a_real_program_xyz123";

    fn probe_for(program: &str) -> Candidate {
        Candidate::shell(["command", "-v", program])
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_path_hit_skips_shell() {
        let launcher = ScriptedLauncher::new();
        let location = Resolver::new(&launcher)
            .resolve("sh", &CancellationToken::new())
            .await
            .unwrap();

        let path = location.path().expect("sh should resolve to a path");
        assert!(path.exists());
        assert_eq!(launcher.count(InvocationMode::Shell), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_builtin_reported_by_shell() {
        let launcher = ScriptedLauncher::new().on(probe_for(MISSING), Script::exit(0, ""));
        let location = Resolver::new(&launcher)
            .resolve(MISSING, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(location, Location::ShellBuiltin);
        assert_eq!(location.to_string(), "Shell Builtin/Alias");
        assert_eq!(launcher.calls(), vec![probe_for(MISSING)]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_alias_reported_by_shell_ignores_stderr_noise() {
        let launcher = ScriptedLauncher::new().on(
            probe_for(MISSING),
            Script::exit_with_stderr(
                0,
                "alias xyz='ls -la'\n",
                "bash: cannot set terminal process group (-1): Inappropriate ioctl for device\n",
            ),
        );
        let location = Resolver::new(&launcher)
            .resolve(MISSING, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(location, Location::ShellReported("alias xyz='ls -la'".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_absent_everywhere_is_not_found() {
        let launcher = ScriptedLauncher::new().on(probe_for(MISSING), Script::exit(1, ""));
        let result = Resolver::new(&launcher)
            .resolve(MISSING, &CancellationToken::new())
            .await;

        assert_eq!(result, Err(ResolveError::not_found(MISSING)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hanging_shell_probe_is_not_found() {
        let launcher = ScriptedLauncher::new().on(probe_for(MISSING), Script::Hang);
        let result = Resolver::new(&launcher)
            .with_options(ResolveOptions {
                shell_timeout: std::time::Duration::from_millis(50),
            })
            .resolve(MISSING, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(ResolveError::NotFound { .. })));
        assert_eq!(launcher.deadlines(), vec![std::time::Duration::from_millis(50)]);
    }

    #[tokio::test]
    async fn test_blank_name_is_not_found_without_probing() {
        let launcher = ScriptedLauncher::new();
        let result = Resolver::new(&launcher)
            .resolve("  ", &CancellationToken::new())
            .await;

        assert!(result.is_err());
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn test_find_on_path_misses_nonexistent() {
        assert!(find_on_path(MISSING).is_none());
    }
}
