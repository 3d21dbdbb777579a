//! Error types for resolution, lookup and individual attempts.
//!
//! User-facing errors carry a `fix` field with an actionable suggestion,
//! exposed through `fix_suggestion()`. Attempt errors never leave the retry
//! engine; they exist so the engine can log why a candidate was abandoned.

use std::time::Duration;
use thiserror::Error;

/// The program could not be located.
///
/// # Example
///
/// ```rust
/// use command_probe::ResolveError;
///
/// let error = ResolveError::not_found("frobnicate");
/// assert_eq!(
///     error.to_string(),
///     "Command not found: frobnicate (not on PATH, and `command -v` in the interactive shell failed)"
/// );
/// assert!(error.fix_suggestion().contains("--force"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// Absent from both the `PATH` lookup and the interactive shell.
    #[error("Command not found: {program} (not on PATH, and `command -v` in the interactive shell failed)")]
    NotFound {
        /// The name that was looked up.
        program: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl ResolveError {
    /// Build [`ResolveError::NotFound`] for `program` with the standard fix.
    pub fn not_found(program: &str) -> Self {
        Self::NotFound {
            program: program.to_string(),
            fix: "Check the spelling or install it; use -f/--force to look it up anyway".to_string(),
        }
    }

    /// Get an actionable suggestion for fixing this error.
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::NotFound { fix, .. } => fix,
        }
    }
}

/// The advisory source failed to produce a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Advisor failed: {message}")]
pub struct AdviceError {
    /// Description of the failure, passed through unchanged.
    pub message: String,
}

impl AdviceError {
    /// Create an advice error carrying `message` verbatim.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that end a lookup.
///
/// # Example
///
/// ```rust
/// use command_probe::LookupError;
///
/// fn report(error: &LookupError) {
///     eprintln!("error: {}", error);
///     eprintln!("hint: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// The program does not exist on this host.
    #[error(transparent)]
    NotFound(#[from] ResolveError),

    /// The program exists but no candidate produced usable help text.
    #[error("Could not get help text for {program} (tried: {})", tried.join(", "))]
    HelpUnavailable {
        /// The program whose help was requested.
        program: String,
        /// Every candidate that was planned, in order.
        tried: Vec<String>,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The advisory source failed; its message is kept verbatim.
    #[error(transparent)]
    Advice(#[from] AdviceError),

    /// The caller cancelled the lookup.
    #[error("Lookup cancelled")]
    Cancelled,
}

impl LookupError {
    /// Get an actionable suggestion for fixing this error.
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::NotFound(e) => e.fix_suggestion(),
            Self::HelpUnavailable { fix, .. } => fix,
            Self::Advice(_) => "Retry, or run with --no-advice to use conventional flags only",
            Self::Cancelled => "Run the command again",
        }
    }
}

/// Why a single attempt was abandoned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    /// The attempt ran past its deadline and was killed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled while the attempt was running.
    #[error("cancelled")]
    Cancelled,

    /// The candidate had no tokens to run.
    #[error("empty candidate")]
    Empty,

    /// The process could not be started.
    #[error("spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
}
