//! Full lookups: existence, then help text, then version text.

use crate::advice::Advisor;
use crate::execution::{Launcher, ProcessLauncher};
use crate::resolve::Resolver;
use crate::retry::RetryEngine;
use crate::version::parse_version;
use crate::{
    plan_candidates, Location, LookupError, LookupOptions, Outcome, ResolveError, HELP_FALLBACKS,
    VERSION_FALLBACKS,
};
use semver::Version;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Note used when a forced lookup finds nothing.
pub const NOT_INSTALLED_NOTE: &str = "not installed";

/// Note used when a forced lookup finds the program but cannot run it.
pub const NOT_RUNNABLE_NOTE: &str = "detected but could not be run";

/// Everything learned about one program.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub program: String,

    /// `None` when a forced lookup could not find the program.
    pub location: Option<Location>,

    /// Help retrieval result; `None` when degraded.
    pub help: Option<Outcome>,

    /// Version retrieval result; `None` when not requested or degraded.
    pub version: Option<Outcome>,

    /// Version number parsed from `version`, when one was found.
    pub parsed_version: Option<Version>,

    /// Set when `force` turned a failure into a partial report.
    pub degraded: Option<&'static str>,
}

impl LookupReport {
    fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            location: None,
            help: None,
            version: None,
            parsed_version: None,
            degraded: None,
        }
    }

    /// Whether force mode produced this report instead of an error.
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// The invocation whose output is in `help`, or the bare program name.
    pub fn help_invocation(&self) -> &str {
        match &self.help {
            Some(outcome) if outcome.success => &outcome.invocation,
            _ => &self.program,
        }
    }

    /// Location text for display, falling back to the degradation note.
    pub fn location_text(&self) -> String {
        match (&self.location, self.degraded) {
            (Some(location), None) => location.to_string(),
            (_, Some(note)) => note.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Drives the resolver and the retry engine for one program.
///
/// # Lookup Process
///
/// 1. Resolve the program; missing is fatal unless `force` is set
/// 2. Ask the advisor for preferred help and version commands
/// 3. Run the retry engine for help; exhaustion is fatal unless `force`
/// 4. If `with_version`, run the retry engine again for version text
#[derive(Debug, Clone)]
pub struct Lookup<L, A> {
    launcher: L,
    advisor: A,
    options: LookupOptions,
}

impl<L: Launcher, A: Advisor> Lookup<L, A> {
    /// Create a lookup.
    ///
    /// # Arguments
    ///
    /// * `launcher` - Runs the shell probe and every help/version candidate
    /// * `advisor` - Supplies the preferred help and version commands
    /// * `options` - Force mode, version retrieval and deadlines
    pub fn new(launcher: L, advisor: A, options: LookupOptions) -> Self {
        Self {
            launcher,
            advisor,
            options,
        }
    }

    /// The options this lookup runs with.
    pub fn options(&self) -> &LookupOptions {
        &self.options
    }

    pub async fn run(&self, program: &str, cancel: &CancellationToken) -> Result<LookupReport, LookupError> {
        let mut report = LookupReport::new(program);

        let resolver = Resolver::new(&self.launcher).with_options(self.options.resolve.clone());
        let resolved = resolver.resolve(program, cancel).await;
        ensure_not_cancelled(cancel)?;

        match resolved {
            Ok(location) => {
                info!(program, location = %location, "Resolved program");
                report.location = Some(location);
            }
            Err(e @ ResolveError::NotFound { .. }) => {
                if !self.options.force {
                    return Err(e.into());
                }
                info!(program, "Not found, continuing in forced mode");
                report.degraded = Some(NOT_INSTALLED_NOTE);
                return Ok(report);
            }
        }

        let suggestion = self.advisor.suggest(cancel, program).await?;
        debug!(program, ?suggestion, "Advisor suggestion");
        ensure_not_cancelled(cancel)?;

        let engine = RetryEngine::new(&self.launcher).with_options(self.options.retry.clone());

        let candidates = plan_candidates(&suggestion.help, HELP_FALLBACKS, program);
        let help = engine.run_candidates(cancel, &candidates).await;
        ensure_not_cancelled(cancel)?;

        if !help.success {
            if !self.options.force {
                return Err(LookupError::HelpUnavailable {
                    program: program.to_string(),
                    tried: candidates.iter().map(ToString::to_string).collect(),
                    fix: "The command may not run outside its launcher (e.g. an app-store alias); \
                          use -f/--force to look it up anyway"
                        .to_string(),
                });
            }
            info!(program, "No help text, continuing in forced mode");
            report.degraded = Some(NOT_RUNNABLE_NOTE);
            return Ok(report);
        }
        report.help = Some(help);

        if self.options.with_version {
            let version = engine
                .run(cancel, &suggestion.version, VERSION_FALLBACKS, program)
                .await;
            ensure_not_cancelled(cancel)?;
            if version.success {
                report.parsed_version = parse_version(&version.output);
            }
            report.version = Some(version);
        }

        Ok(report)
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), LookupError> {
    if cancel.is_cancelled() {
        Err(LookupError::Cancelled)
    } else {
        Ok(())
    }
}

/// Look `program` up with real processes and the user's shell.
///
/// # Example
///
/// ```rust,no_run
/// use command_probe::{lookup, ConventionalAdvisor, LookupOptions};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let cancel = CancellationToken::new();
///     match lookup("git", &ConventionalAdvisor, &LookupOptions::default(), &cancel).await {
///         Ok(report) => println!("{} at {}", report.program, report.location_text()),
///         Err(e) => eprintln!("{}\nhint: {}", e, e.fix_suggestion()),
///     }
/// }
/// ```
pub async fn lookup<A: Advisor>(
    program: &str,
    advisor: &A,
    options: &LookupOptions,
    cancel: &CancellationToken,
) -> Result<LookupReport, LookupError> {
    Lookup::new(ProcessLauncher::from_env(), advisor, options.clone())
        .run(program, cancel)
        .await
}
