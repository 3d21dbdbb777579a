//! Result of one retry-engine run.

use serde::Serialize;

/// The winning attempt of a retry-engine run, or the exhausted marker.
///
/// Only the first accepted attempt is kept; output of rejected attempts is
/// discarded.
///
/// # Example
///
/// ```rust
/// use command_probe::Outcome;
///
/// let outcome = Outcome::exhausted();
/// assert!(!outcome.success);
/// assert!(outcome.output.is_empty());
/// assert!(outcome.invocation.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Combined standard output and standard error.
    pub output: String,

    /// The invocation that produced `output`, tokens joined by spaces.
    pub invocation: String,

    /// Whether any attempt was accepted.
    pub success: bool,
}

impl Outcome {
    pub(crate) fn accepted(output: String, invocation: String) -> Self {
        Self {
            output,
            invocation,
            success: true,
        }
    }

    /// Every candidate failed, timed out or was skipped.
    pub fn exhausted() -> Self {
        Self::default()
    }
}
