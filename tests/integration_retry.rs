//! Integration tests for the retry engine against real processes.
//!
//! Shell-mode candidates run through a plain `/bin/sh -c` so the user's rc
//! files play no part.

#![cfg(unix)]

use command_probe::{
    AttemptError, Candidate, Captured, InvocationMode, Launcher, ProcessLauncher, RetryEngine,
    RetryOptions, Shell, HELP_FALLBACKS,
};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Wraps the real launcher and records what it was asked to run.
struct RecordingLauncher {
    inner: ProcessLauncher,
    calls: Mutex<Vec<Candidate>>,
}

impl RecordingLauncher {
    fn new() -> Self {
        Self {
            inner: ProcessLauncher::new(Shell::new("/bin/sh", ["-c"])),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Candidate> {
        self.calls.lock().unwrap().clone()
    }

    fn shell_spawns(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.mode() == InvocationMode::Shell)
            .count()
    }
}

impl Launcher for RecordingLauncher {
    async fn launch(
        &self,
        candidate: &Candidate,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> Result<Captured, AttemptError> {
        self.calls.lock().unwrap().push(candidate.clone());
        self.inner.launch(candidate, deadline, cancel).await
    }
}

/// Write an executable shell script and return its path.
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn fast_options() -> RetryOptions {
    RetryOptions {
        direct_timeout: Duration::from_millis(500),
        shell_timeout: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn test_help_on_first_direct_attempt() {
    let dir = TempDir::new().unwrap();
    let help = "usage: tool [--verbose] [--output FILE] <input>...\n".repeat(10);
    let script = write_script(
        dir.path(),
        "tool",
        &format!("if [ \"$1\" = --help ]; then\ncat <<'EOF'\n{help}EOF\nexit 0\nfi\nexit 2"),
    );
    let program = script.to_str().unwrap();

    let launcher = RecordingLauncher::new();
    let outcome = RetryEngine::new(&launcher)
        .run(&CancellationToken::new(), &[], HELP_FALLBACKS, program)
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.output, help);
    assert_eq!(outcome.invocation, format!("{program} --help"));
    assert_eq!(launcher.shell_spawns(), 0);
}

#[tokio::test]
async fn test_help_on_stderr_with_failing_exit_is_accepted() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "stubborn",
        "echo 'stubborn: a tool that prints its usage to stderr and exits 1' >&2\nexit 1",
    );
    let program = script.to_str().unwrap();

    let launcher = RecordingLauncher::new();
    let outcome = RetryEngine::new(&launcher)
        .run(&CancellationToken::new(), &[], HELP_FALLBACKS, program)
        .await;

    assert!(outcome.success);
    assert!(outcome.output.starts_with("stubborn: a tool"));
    assert_eq!(launcher.calls().len(), 1);
}

#[tokio::test]
async fn test_not_found_output_is_rejected() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "picky",
        "case \"$1\" in\n-h) echo 'picky [-h] -- only understands the short flag, nothing else'; exit 0 ;;\n*) echo \"picky: $1: not found\"; exit 1 ;;\nesac",
    );
    let program = script.to_str().unwrap();

    let launcher = RecordingLauncher::new();
    let outcome = RetryEngine::new(&launcher)
        .run(&CancellationToken::new(), &[], HELP_FALLBACKS, program)
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.invocation, format!("{program} -h"));
    assert_eq!(launcher.calls().len(), 2);
}

#[tokio::test]
async fn test_hanging_candidate_does_not_block_the_next() {
    let launcher = RecordingLauncher::new();
    let engine = RetryEngine::new(&launcher).with_options(fast_options());
    let candidates = [
        Candidate::direct(["sleep", "30"]),
        Candidate::shell(["echo", "usage:", "fast"]),
    ];

    let start = Instant::now();
    let outcome = engine
        .run_candidates(&CancellationToken::new(), &candidates)
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.output, "usage: fast\n");
    assert_eq!(outcome.invocation, "echo usage: fast");
    assert!(
        start.elapsed() < Duration::from_secs(3),
        "took {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_hanging_shell_candidate_times_out() {
    let launcher = RecordingLauncher::new();
    let engine = RetryEngine::new(&launcher).with_options(RetryOptions {
        direct_timeout: Duration::from_millis(200),
        shell_timeout: Duration::from_millis(400),
    });
    let candidates = [Candidate::shell(["sleep", "30"])];

    let start = Instant::now();
    let outcome = engine
        .run_candidates(&CancellationToken::new(), &candidates)
        .await;

    assert!(!outcome.success);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancellation_stops_the_sequence() {
    let launcher = RecordingLauncher::new();
    let engine = RetryEngine::new(&launcher);
    let candidates = [
        Candidate::direct(["sleep", "30"]),
        Candidate::direct(["echo", "never"]),
    ];

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let outcome = engine.run_candidates(&cancel, &candidates).await;

    assert!(!outcome.success);
    assert_eq!(launcher.calls(), vec![Candidate::direct(["sleep", "30"])]);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_missing_program_exhausts() {
    let launcher = RecordingLauncher::new();
    let outcome = RetryEngine::new(&launcher)
        .with_options(fast_options())
        .run(
            &CancellationToken::new(),
            &[],
            HELP_FALLBACKS,
            "definitely_not_a_real_program_xyz123",
        )
        .await;

    assert!(!outcome.success);
    assert!(outcome.output.is_empty());
    assert!(outcome.invocation.is_empty());
    // three direct spawn failures, then the shell reports "not found"
    assert_eq!(launcher.calls().len(), 4);
    assert_eq!(launcher.shell_spawns(), 1);
}
