//! # command-probe
//!
//! Find out whether a program exists on this host and capture its help and
//! version text by running it.
//!
//! Programs are unreliable witnesses: some reject `--help`, some print help
//! to stderr and exit 1, some are shell built-ins or aliases that no `PATH`
//! lookup can see, and some hang when run without a terminal. This crate
//! reconciles a `PATH` lookup, an interactive-shell lookup and a sequence of
//! speculative invocations under per-attempt deadlines, and resets the
//! terminal after every interactive shell it starts.
//!
//! ## Features
//!
//! - [`resolve()`]: installed executable, shell built-in/alias, or not found
//! - [`run_with_fallback()`] / [`RetryEngine`]: bounded, de-duplicated,
//!   sequential candidate invocations, direct first and then through the
//!   user's shell
//! - [`Judge`]: pluggable "is this real output?" decision
//! - [`Advisor`]: seam for an external source of preferred help/version
//!   commands
//! - [`lookup()`] / [`Lookup`]: resolve, then help, then version, with an
//!   optional forced (degraded) mode
//!
//! ## Example
//!
//! ```rust,no_run
//! use command_probe::{resolve, run_with_fallback, HELP_FALLBACKS};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cancel = CancellationToken::new();
//!
//!     let location = match resolve("tar", &cancel).await {
//!         Ok(location) => location,
//!         Err(e) => return eprintln!("{}", e),
//!     };
//!     println!("tar: {}", location);
//!
//!     let outcome = run_with_fallback(&cancel, &[], HELP_FALLBACKS, "tar").await;
//!     if outcome.success {
//!         println!("$ {}\n{}", outcome.invocation, outcome.output);
//!     }
//! }
//! ```

mod advice;
mod candidate;
mod errors;
mod execution;
mod judge;
mod location;
mod lookup;
mod options;
mod outcome;
mod resolve;
mod retry;
mod version;

#[cfg(test)]
mod testing;

pub use advice::{Advisor, ConventionalAdvisor, NoAdvice, StaticAdvisor, Suggestion};
pub use candidate::{
    plan_candidates, quote_args, Candidate, InvocationMode, HELP_FALLBACKS, VERSION_FALLBACKS,
};
pub use errors::{AdviceError, AttemptError, LookupError, ResolveError};
pub use execution::{
    restore_terminal, Captured, Launcher, ProcessLauncher, Shell, SttyRestorer, TerminalRestorer,
};
pub use judge::{HeuristicJudge, Judge};
pub use location::{Location, SHELL_BUILTIN_LABEL};
pub use lookup::{lookup, Lookup, LookupReport, NOT_INSTALLED_NOTE, NOT_RUNNABLE_NOTE};
pub use options::{LookupOptions, ResolveOptions, RetryOptions, DIRECT_TIMEOUT, SHELL_TIMEOUT};
pub use outcome::Outcome;
pub use resolve::{resolve, Resolver};
pub use retry::{run_with_fallback, RetryEngine};
pub use version::parse_version;
