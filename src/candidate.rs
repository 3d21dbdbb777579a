//! Candidate invocations and the order they are tried in.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Conventional help flags, tried in order after any advisory command.
pub const HELP_FALLBACKS: &[&[&str]] = &[&["--help"], &["-h"], &["help"]];

/// Conventional version flags, tried in order after any advisory command.
pub const VERSION_FALLBACKS: &[&[&str]] = &[&["--version"], &["-v"], &["version"]];

/// How a candidate is run.
///
/// # Example
///
/// ```rust
/// use command_probe::InvocationMode;
///
/// assert_eq!(InvocationMode::Direct.to_string(), "direct");
/// assert_eq!(InvocationMode::Shell.to_string(), "shell");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvocationMode {
    /// Spawned as a subprocess with an explicit argument vector.
    Direct,
    /// Handed as one string to the user's interactive shell.
    Shell,
}

/// One attempted invocation: program plus arguments, and how to run it.
///
/// Two candidates are the same attempt when both the mode and the
/// space-joined token sequence match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    tokens: Vec<String>,
    mode: InvocationMode,
}

impl Candidate {
    /// A candidate spawned directly.
    pub fn direct<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tokens, InvocationMode::Direct)
    }

    /// A candidate evaluated by the interactive shell.
    pub fn shell<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tokens, InvocationMode::Shell)
    }

    fn new<I, S>(tokens: I, mode: InvocationMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    /// The program and its arguments, in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// How the candidate is run.
    pub fn mode(&self) -> InvocationMode {
        self.mode
    }

    /// Whether the candidate goes through the interactive shell.
    pub fn is_shell(&self) -> bool {
        self.mode == InvocationMode::Shell
    }

    /// The tokens joined by single spaces.
    ///
    /// This is both the string handed to the shell in shell mode and the
    /// invocation reported back to callers.
    pub fn command_line(&self) -> String {
        self.tokens.join(" ")
    }

    fn identity(&self) -> (InvocationMode, String) {
        (self.mode, self.command_line())
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.command_line(), self.mode)
    }
}

/// Build the ordered, de-duplicated candidate list for one engine run.
///
/// Order:
/// 1. `preferred`, direct (skipped when empty)
/// 2. each fallback tuple prefixed with `program`, direct
/// 3. `preferred` again through the shell (skipped when empty)
/// 4. `program --help` through the shell
///
/// The last entry is always present, so the list is never empty.
///
/// # Example
///
/// ```rust
/// use command_probe::{plan_candidates, Candidate, HELP_FALLBACKS};
///
/// let preferred = vec!["git".to_string(), "--help".to_string()];
/// let plan = plan_candidates(&preferred, HELP_FALLBACKS, "git");
///
/// // The advisory command coincides with the first fallback and is kept once.
/// assert_eq!(plan[0], Candidate::direct(["git", "--help"]));
/// assert_eq!(plan[1], Candidate::direct(["git", "-h"]));
/// assert_eq!(plan.last(), Some(&Candidate::shell(["git", "--help"])));
/// ```
pub fn plan_candidates(preferred: &[String], fallbacks: &[&[&str]], program: &str) -> Vec<Candidate> {
    let mut plan = Plan::default();

    if !preferred.is_empty() {
        plan.push(Candidate::direct(preferred.iter().cloned()));
    }
    for args in fallbacks {
        let tokens = std::iter::once(program).chain(args.iter().copied());
        plan.push(Candidate::direct(tokens));
    }
    if !preferred.is_empty() {
        plan.push(Candidate::shell(preferred.iter().cloned()));
    }
    plan.push(Candidate::shell([program, "--help"]));

    plan.candidates
}

#[derive(Default)]
struct Plan {
    candidates: Vec<Candidate>,
    seen: HashSet<(InvocationMode, String)>,
}

impl Plan {
    fn push(&mut self, candidate: Candidate) {
        if self.seen.insert(candidate.identity()) {
            self.candidates.push(candidate);
        }
    }
}

/// Rebuild a printable command line, double-quoting arguments that contain
/// spaces or tabs.
///
/// ```rust
/// use command_probe::quote_args;
///
/// let args = ["git", "commit", "-m", "fix bug"];
/// assert_eq!(quote_args(&args), r#"git commit -m "fix bug""#);
/// ```
pub fn quote_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.contains(' ') || arg.contains('\t') {
                format!("{arg:?}")
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
