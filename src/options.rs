//! Configuration for resolution, retries and whole lookups.
//!
//! All options are plain immutable values: build them once (the binary does
//! so from its parsed arguments) and pass them by reference.

use std::time::Duration;

/// Default deadline for a directly spawned candidate.
pub const DIRECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default deadline for a shell-mode candidate.
///
/// Interactive shells load profile and rc files before running anything, so
/// they get a longer allowance than direct spawns.
pub const SHELL_TIMEOUT: Duration = Duration::from_secs(8);

/// Per-attempt deadlines for the retry engine.
///
/// # Example
///
/// ```rust
/// use command_probe::RetryOptions;
/// use std::time::Duration;
///
/// let opts = RetryOptions {
///     shell_timeout: Duration::from_secs(15),
///     ..Default::default()
/// };
/// assert_eq!(opts.direct_timeout, Duration::from_secs(3));
/// ```
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Deadline for direct candidates.
    ///
    /// Default: 3 seconds
    pub direct_timeout: Duration,

    /// Deadline for shell-mode candidates.
    ///
    /// Default: 8 seconds
    pub shell_timeout: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            direct_timeout: DIRECT_TIMEOUT,
            shell_timeout: SHELL_TIMEOUT,
        }
    }
}

/// Options for the existence resolver.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Deadline for the interactive-shell probe.
    ///
    /// Default: 8 seconds
    pub shell_timeout: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            shell_timeout: SHELL_TIMEOUT,
        }
    }
}

/// Options for a full lookup (resolve, help, version).
///
/// # Example
///
/// ```rust
/// use command_probe::LookupOptions;
///
/// let opts = LookupOptions {
///     force: true,
///     ..Default::default()
/// };
/// assert!(opts.with_version);
/// ```
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Degrade instead of failing when the program is missing or its help
    /// cannot be captured.
    ///
    /// Default: `false`
    pub force: bool,

    /// Also capture version output.
    ///
    /// Default: `true`
    pub with_version: bool,

    /// Deadlines used for help and version retrieval.
    pub retry: RetryOptions,

    /// Options for the existence check.
    pub resolve: ResolveOptions,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            force: false,
            with_version: true,
            retry: RetryOptions::default(),
            resolve: ResolveOptions::default(),
        }
    }
}

impl LookupOptions {
    /// Use the same shell deadline for the existence probe and retries.
    pub fn with_shell_timeout(mut self, timeout: Duration) -> Self {
        self.retry.shell_timeout = timeout;
        self.resolve.shell_timeout = timeout;
        self
    }
}
