//! Running one candidate under a deadline and a cancellation token.

use super::{Shell, SttyRestorer, TerminalRestorer};
use crate::{AttemptError, Candidate, InvocationMode};
use std::future::Future;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// What a finished attempt printed, and how it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
    /// Exited with status zero.
    pub exited_ok: bool,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl Captured {
    /// Standard output followed by standard error.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }

    fn from_output(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exited_ok: output.status.success(),
            exit_code: output.status.code(),
        }
    }
}

/// Runs candidates.
///
/// An implementation must give up on the attempt when `deadline` elapses or
/// `cancel` fires, and must leave no child running afterwards.
/// [`ProcessLauncher`] is the real one; tests substitute scripted launchers.
pub trait Launcher {
    fn launch(
        &self,
        candidate: &Candidate,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Captured, AttemptError>> + Send;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(
        &self,
        candidate: &Candidate,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Captured, AttemptError>> + Send {
        (**self).launch(candidate, deadline, cancel)
    }
}

/// Spawns real processes.
///
/// Direct candidates are spawned with their argument vector; shell
/// candidates are handed to [`Shell`] as one string. Children get a null
/// stdin. On Unix each attempt runs in its own process group, and the whole
/// group is killed when the attempt times out or is cancelled, so nothing an
/// interactive shell forked outlives it. After every shell-mode attempt,
/// whatever its result, the terminal is restored with `R`.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher<R = SttyRestorer> {
    shell: Shell,
    restorer: R,
}

impl ProcessLauncher {
    /// Create a launcher that runs shell-mode candidates through `shell`.
    ///
    /// # Arguments
    ///
    /// * `shell` - Shell program and the arguments that precede the command
    ///   string, e.g. `$SHELL -i -c`
    pub fn new(shell: Shell) -> Self {
        Self {
            shell,
            restorer: SttyRestorer,
        }
    }

    /// Launcher using the user's interactive shell.
    pub fn from_env() -> Self {
        Self::new(Shell::from_env())
    }
}

impl<R> ProcessLauncher<R> {
    /// Replace what restores the terminal after shell-mode attempts.
    pub fn with_restorer<R2: TerminalRestorer>(self, restorer: R2) -> ProcessLauncher<R2> {
        ProcessLauncher {
            shell: self.shell,
            restorer,
        }
    }

    /// The shell used for shell-mode candidates.
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    fn command(&self, candidate: &Candidate) -> Result<Command, AttemptError> {
        let mut command = match candidate.mode() {
            InvocationMode::Direct => {
                let (program, args) = candidate.tokens().split_first().ok_or(AttemptError::Empty)?;
                let mut command = Command::new(program);
                command.args(args);
                command
            }
            InvocationMode::Shell => {
                if candidate.tokens().is_empty() {
                    return Err(AttemptError::Empty);
                }
                self.shell.command(&candidate.command_line())
            }
        };
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);
        Ok(command)
    }

    async fn run(
        &self,
        candidate: &Candidate,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> Result<Captured, AttemptError> {
        let child = self.command(candidate)?.spawn()?;
        let group = child.id();

        // Dropping the losing branch drops the child, which kills it.
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(AttemptError::Cancelled),
            result = timeout(deadline, child.wait_with_output()) => match result {
                Ok(output) => Ok(Captured::from_output(output?)),
                Err(_) => Err(AttemptError::Timeout(deadline)),
            },
        };

        if matches!(result, Err(AttemptError::Cancelled | AttemptError::Timeout(_))) {
            if let Some(group) = group {
                kill_group(group);
            }
        }
        result
    }
}

impl<R: TerminalRestorer + Sync> Launcher for ProcessLauncher<R> {
    async fn launch(
        &self,
        candidate: &Candidate,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> Result<Captured, AttemptError> {
        let result = self.run(candidate, deadline, cancel).await;
        if candidate.is_shell() {
            self.restorer.restore().await;
        }
        result
    }
}

/// Kill every process in the group led by `leader`.
#[cfg(unix)]
fn kill_group(leader: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(leader as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => tracing::debug!(leader, error = %e, "Could not kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_leader: u32) {}
