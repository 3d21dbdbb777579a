//! Advisory sources of preferred help and version commands.
//!
//! An advisor guesses the best command for fetching a program's help and
//! version text, typically a language model asked "how do I get help for
//! `<program>`?". Its guess only goes first in the retry order; conventional
//! flags and the shell fallback still follow it.

use crate::AdviceError;
use serde::Serialize;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Second-line marker meaning "this program has no version command".
const NO_VERSION_MARKER: &str = "NONE";

/// Preferred help and version argument vectors.
///
/// An empty vector means "no suggestion".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub help: Vec<String>,
    pub version: Vec<String>,
}

impl Suggestion {
    /// Parse the two-line answer format: help command on the first line,
    /// version command (or `NONE`) on the second.
    ///
    /// # Example
    ///
    /// ```rust
    /// use command_probe::Suggestion;
    ///
    /// let s = Suggestion::parse("git --help\ngit --version\n");
    /// assert_eq!(s.help, ["git", "--help"]);
    /// assert_eq!(s.version, ["git", "--version"]);
    ///
    /// let s = Suggestion::parse("help cd\nNONE");
    /// assert_eq!(s.help, ["help", "cd"]);
    /// assert!(s.version.is_empty());
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut lines = text.trim().lines();
        let help = lines.next().unwrap_or_default();
        let version = lines.next().unwrap_or_default();
        Self::from_lines(help, version)
    }

    /// Build from separate help and version command lines.
    pub fn from_lines(help: &str, version: &str) -> Self {
        let version = if version.trim() == NO_VERSION_MARKER {
            ""
        } else {
            version
        };
        Self {
            help: split_words(help),
            version: split_words(version),
        }
    }
}

fn split_words(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Source of [`Suggestion`]s.
///
/// Implementations should stop early when `cancel` fires. Errors are passed
/// to the caller unchanged; nothing retries an advisor.
pub trait Advisor {
    fn suggest(
        &self,
        cancel: &CancellationToken,
        program: &str,
    ) -> impl Future<Output = Result<Suggestion, AdviceError>> + Send;
}

impl<A: Advisor + ?Sized> Advisor for &A {
    fn suggest(
        &self,
        cancel: &CancellationToken,
        program: &str,
    ) -> impl Future<Output = Result<Suggestion, AdviceError>> + Send {
        (**self).suggest(cancel, program)
    }
}

/// Suggests `<program> --help` and `<program> --version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalAdvisor;

impl Advisor for ConventionalAdvisor {
    async fn suggest(&self, _cancel: &CancellationToken, program: &str) -> Result<Suggestion, AdviceError> {
        Ok(Suggestion {
            help: vec![program.to_string(), "--help".to_string()],
            version: vec![program.to_string(), "--version".to_string()],
        })
    }
}

/// Never suggests anything; only conventional fallbacks run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdvice;

impl Advisor for NoAdvice {
    async fn suggest(&self, _cancel: &CancellationToken, _program: &str) -> Result<Suggestion, AdviceError> {
        Ok(Suggestion::default())
    }
}

/// Always returns the same suggestion, e.g. one given on the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticAdvisor(pub Suggestion);

impl Advisor for StaticAdvisor {
    async fn suggest(&self, _cancel: &CancellationToken, _program: &str) -> Result<Suggestion, AdviceError> {
        Ok(self.0.clone())
    }
}
