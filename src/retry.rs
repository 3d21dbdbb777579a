//! The retry execution engine.

use crate::execution::{Launcher, ProcessLauncher};
use crate::{plan_candidates, Candidate, HeuristicJudge, Judge, Outcome, RetryOptions};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Run candidates one at a time until one produces accepted output.
///
/// # Example
///
/// ```rust,no_run
/// use command_probe::{ProcessLauncher, RetryEngine, HELP_FALLBACKS};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let engine = RetryEngine::new(ProcessLauncher::from_env());
///     let outcome = engine
///         .run(&CancellationToken::new(), &[], HELP_FALLBACKS, "git")
///         .await;
///     if outcome.success {
///         println!("{} printed {} bytes", outcome.invocation, outcome.output.len());
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RetryEngine<L, J = HeuristicJudge> {
    launcher: L,
    judge: J,
    options: RetryOptions,
}

impl<L: Launcher> RetryEngine<L> {
    /// Create an engine with the default judge and deadlines.
    ///
    /// # Arguments
    ///
    /// * `launcher` - Runs each candidate; [`ProcessLauncher`] for real processes
    ///
    /// # Returns
    ///
    /// An engine using [`HeuristicJudge`] and [`RetryOptions::default`].
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            judge: HeuristicJudge,
            options: RetryOptions::default(),
        }
    }
}

impl<L: Launcher, J: Judge> RetryEngine<L, J> {
    /// Replace the success judgment.
    pub fn with_judge<J2: Judge>(self, judge: J2) -> RetryEngine<L, J2> {
        RetryEngine {
            launcher: self.launcher,
            judge,
            options: self.options,
        }
    }

    /// Replace the per-attempt deadlines.
    pub fn with_options(mut self, options: RetryOptions) -> Self {
        self.options = options;
        self
    }

    /// The launcher candidates are run with.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Plan candidates from `preferred`, `fallbacks` and `program`, then run
    /// them. See [`plan_candidates`] for the order.
    pub async fn run(
        &self,
        cancel: &CancellationToken,
        preferred: &[String],
        fallbacks: &[&[&str]],
        program: &str,
    ) -> Outcome {
        let candidates = plan_candidates(preferred, fallbacks, program);
        self.run_candidates(cancel, &candidates).await
    }

    /// Run `candidates` strictly in order and return the first accepted one.
    ///
    /// Timeouts, spawn failures and rejected output all move on to the next
    /// candidate. Once `cancel` fires the remaining candidates are skipped.
    pub async fn run_candidates(&self, cancel: &CancellationToken, candidates: &[Candidate]) -> Outcome {
        for candidate in candidates {
            if cancel.is_cancelled() {
                debug!(candidate = %candidate, "Cancelled, skipping remaining candidates");
                break;
            }

            let deadline = self.deadline(candidate);
            debug!(candidate = %candidate, ?deadline, "Trying candidate");

            let captured = match self.launcher.launch(candidate, deadline, cancel).await {
                Ok(captured) => captured,
                Err(e) => {
                    debug!(candidate = %candidate, error = %e, "Attempt abandoned");
                    continue;
                }
            };

            let output = captured.combined();
            if self.judge.accepts(&output, captured.exited_ok) {
                debug!(
                    candidate = %candidate,
                    exit_code = ?captured.exit_code,
                    length = output.len(),
                    "Accepted output"
                );
                return Outcome::accepted(output, candidate.command_line());
            }
            debug!(
                candidate = %candidate,
                exit_code = ?captured.exit_code,
                length = output.len(),
                "Rejected output"
            );
        }

        Outcome::exhausted()
    }

    fn deadline(&self, candidate: &Candidate) -> Duration {
        if candidate.is_shell() {
            self.options.shell_timeout
        } else {
            self.options.direct_timeout
        }
    }
}

/// Run the engine with real processes, the user's shell, default deadlines
/// and the default judgment.
///
/// `preferred` may be empty to signal that no advisory command exists.
///
/// # Example
///
/// ```rust,no_run
/// use command_probe::{run_with_fallback, VERSION_FALLBACKS};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let cancel = CancellationToken::new();
///     let preferred = vec!["git".to_string(), "--version".to_string()];
///     let outcome = run_with_fallback(&cancel, &preferred, VERSION_FALLBACKS, "git").await;
///     println!("{}", outcome.output);
/// }
/// ```
pub async fn run_with_fallback(
    cancel: &CancellationToken,
    preferred: &[String],
    fallbacks: &[&[&str]],
    program: &str,
) -> Outcome {
    RetryEngine::new(ProcessLauncher::from_env())
        .run(cancel, preferred, fallbacks, program)
        .await
}
