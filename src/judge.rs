//! Deciding whether an attempt produced genuine output.

/// Decides whether an attempt's captured output is accepted.
///
/// `exited_ok` is true when the process exited with status zero. Any
/// `Fn(&str, bool) -> bool` closure is a judge too, which keeps alternate
/// heuristics easy to swap in and test.
///
/// # Example
///
/// ```rust
/// use command_probe::Judge;
///
/// let strict = |_output: &str, exited_ok: bool| exited_ok;
/// assert!(!strict.accepts("Usage: tool [options]", false));
/// ```
pub trait Judge {
    fn accepts(&self, output: &str, exited_ok: bool) -> bool;
}

impl<F> Judge for F
where
    F: Fn(&str, bool) -> bool,
{
    fn accepts(&self, output: &str, exited_ok: bool) -> bool {
        self(output, exited_ok)
    }
}

/// Minimum output length (exclusive) for a failed attempt to count.
const MIN_FAILED_OUTPUT_CHARS: usize = 50;

/// Marker that rejects a failed attempt's output regardless of length.
const NOT_FOUND_MARKER: &str = "not found";

/// Default judgment.
///
/// Accepts a zero exit status outright. A non-zero exit is still accepted
/// when the output is longer than 50 characters and does not mention
/// "not found" in any case: plenty of tools print a full help dump to stderr
/// and then exit 1, whereas shell errors such as `bash: foo: not found` are
/// short and carry the marker.
///
/// # Example
///
/// ```rust
/// use command_probe::{HeuristicJudge, Judge};
///
/// let judge = HeuristicJudge;
/// assert!(judge.accepts("", true));
/// assert!(!judge.accepts("bash: foo: not found", false));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicJudge;

impl Judge for HeuristicJudge {
    fn accepts(&self, output: &str, exited_ok: bool) -> bool {
        if exited_ok {
            return true;
        }
        output.chars().count() > MIN_FAILED_OUTPUT_CHARS
            && !output.to_lowercase().contains(NOT_FOUND_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_exit_with_empty_output_is_accepted() {
        assert!(HeuristicJudge.accepts("", true));
    }

    #[test]
    fn test_nonzero_exit_with_long_output_is_accepted() {
        let output = "x".repeat(60);
        assert!(HeuristicJudge.accepts(&output, false));
    }

    #[test]
    fn test_nonzero_exit_with_not_found_is_rejected() {
        let output = "bash: foo: not found";
        assert_eq!(output.len(), 20);
        assert!(!HeuristicJudge.accepts(output, false));
    }

    #[test]
    fn test_long_output_mentioning_not_found_is_rejected() {
        let output = format!("zsh: command NOT FOUND: frobnicate {}", "-".repeat(40));
        assert!(output.len() > 50);
        assert!(!HeuristicJudge.accepts(&output, false));
    }

    #[test]
    fn test_exactly_fifty_chars_is_rejected() {
        let output = "y".repeat(50);
        assert!(!HeuristicJudge.accepts(&output, false));
        let output = "y".repeat(51);
        assert!(HeuristicJudge.accepts(&output, false));
    }

    #[test]
    fn test_zero_exit_wins_over_not_found() {
        assert!(HeuristicJudge.accepts("pattern not found", true));
    }

    #[test]
    fn test_closure_judge() {
        let needs_usage = |output: &str, _exited_ok: bool| output.contains("Usage");
        assert!(needs_usage.accepts("Usage: x", false));
        assert!(!needs_usage.accepts("error", true));
    }
}
