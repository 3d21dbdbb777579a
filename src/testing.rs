//! Scripted launcher for unit tests.

use crate::execution::{Captured, Launcher};
use crate::{AttemptError, Candidate, InvocationMode};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Canned behaviour for one candidate.
#[derive(Debug, Clone)]
pub(crate) enum Script {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Behaves as if the deadline elapsed.
    Hang,
    SpawnError,
}

impl Script {
    pub(crate) fn exit(code: i32, stdout: &str) -> Self {
        Self::Exit {
            code,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub(crate) fn exit_with_stderr(code: i32, stdout: &str, stderr: &str) -> Self {
        Self::Exit {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

/// Launcher that answers from a script and records every call.
///
/// Candidates without a script fail to spawn, like a missing program.
#[derive(Debug, Default)]
pub(crate) struct ScriptedLauncher {
    scripts: HashMap<Candidate, Script>,
    calls: Mutex<Vec<(Candidate, Duration)>>,
}

impl ScriptedLauncher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(mut self, candidate: Candidate, script: Script) -> Self {
        self.scripts.insert(candidate, script);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Candidate> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub(crate) fn deadlines(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().iter().map(|(_, d)| *d).collect()
    }

    pub(crate) fn count(&self, mode: InvocationMode) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c.mode() == mode)
            .count()
    }
}

impl Launcher for ScriptedLauncher {
    async fn launch(
        &self,
        candidate: &Candidate,
        deadline: Duration,
        _cancel: &CancellationToken,
    ) -> Result<Captured, AttemptError> {
        self.calls.lock().unwrap().push((candidate.clone(), deadline));

        match self.scripts.get(candidate) {
            Some(Script::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(Captured {
                stdout: stdout.clone(),
                stderr: stderr.clone(),
                exited_ok: *code == 0,
                exit_code: Some(*code),
            }),
            Some(Script::Hang) => Err(AttemptError::Timeout(deadline)),
            Some(Script::SpawnError) | None => Err(AttemptError::Spawn(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            ))),
        }
    }
}
