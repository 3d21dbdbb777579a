//! Terminal line-discipline restoration.

use std::future::Future;
#[cfg(not(windows))]
use std::process::Stdio;
#[cfg(not(windows))]
use std::time::Duration;
#[cfg(not(windows))]
use tokio::process::Command;

/// Upper bound on one `stty sane` run.
///
/// `stty` started from a background job is stopped by `SIGTTOU`; it is
/// killed once this elapses.
#[cfg(not(windows))]
const STTY_TIMEOUT: Duration = Duration::from_secs(2);

/// Reset the controlling terminal to sane line-discipline settings.
///
/// Interactive shells started with `-i` may switch the terminal into raw or
/// no-echo mode and exit without switching back, even when their own command
/// failed. This runs `stty sane` with stdin inherited from this process so
/// it acts on our terminal. The result is ignored: when stdin is not a
/// terminal `stty` simply fails, and there is nothing to report either way.
///
/// A no-op on Windows.
pub async fn restore_terminal() {
    #[cfg(not(windows))]
    {
        let mut command = Command::new("stty");
        command
            .arg("sane")
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        run_bounded(command, STTY_TIMEOUT).await;
    }
}

/// Run `command` to completion or until `bound` elapses, whichever is first.
/// Returns whether it finished in time.
#[cfg(not(windows))]
async fn run_bounded(mut command: Command, bound: Duration) -> bool {
    command.kill_on_drop(true);
    match tokio::time::timeout(bound, command.status()).await {
        Ok(status) => {
            tracing::trace!(?status, "restored terminal");
            true
        }
        Err(_) => {
            tracing::trace!(?bound, "terminal restore timed out");
            false
        }
    }
}

/// Something that puts the terminal back after an interactive shell.
///
/// [`ProcessLauncher`](super::ProcessLauncher) calls it once after every
/// shell-mode attempt. [`SttyRestorer`] is the real one.
pub trait TerminalRestorer {
    fn restore(&self) -> impl Future<Output = ()> + Send;
}

/// Restores the terminal with [`restore_terminal`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SttyRestorer;

impl TerminalRestorer for SttyRestorer {
    async fn restore(&self) {
        restore_terminal().await;
    }
}
