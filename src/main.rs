use anyhow::Context;
use clap::Parser;
use command_probe::{
    quote_args, AdviceError, Advisor, ConventionalAdvisor, Lookup, LookupError, LookupOptions,
    LookupReport, NoAdvice, ProcessLauncher, RetryOptions, StaticAdvisor, Suggestion,
};
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Find a program and show its help and version text.
#[derive(Parser, Debug)]
#[command(name = "cmdprobe", version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n    cmdprobe git\n    cmdprobe -f some-uninstalled-tool\n    cmdprobe --suggest-help 'go help build' go build -o app ."
)]
struct Cli {
    /// Program to look up, optionally followed by the full command being asked about
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,

    /// Degrade instead of failing when the program is missing or cannot be run
    #[arg(short, long)]
    force: bool,

    /// Skip version retrieval
    #[arg(long)]
    no_version: bool,

    /// Preferred help command, tried before conventional flags
    #[arg(long, value_name = "COMMAND")]
    suggest_help: Option<String>,

    /// Preferred version command, or NONE
    #[arg(long, value_name = "COMMAND")]
    suggest_version: Option<String>,

    /// Only try conventional flags, with no preferred command
    #[arg(long, conflicts_with_all = ["suggest_help", "suggest_version"])]
    no_advice: bool,

    /// Deadline for direct attempts, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    direct_timeout: u64,

    /// Deadline for interactive-shell attempts, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 8)]
    shell_timeout: u64,

    /// Print the report as JSON
    #[arg(long, short = 'j')]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    fn options(&self) -> LookupOptions {
        LookupOptions {
            force: self.force,
            with_version: !self.no_version,
            retry: RetryOptions {
                direct_timeout: Duration::from_secs(self.direct_timeout),
                ..Default::default()
            },
            ..Default::default()
        }
        .with_shell_timeout(Duration::from_secs(self.shell_timeout))
    }

    fn advisor(&self) -> CliAdvisor {
        if self.no_advice {
            return CliAdvisor::None(NoAdvice);
        }
        if self.suggest_help.is_some() || self.suggest_version.is_some() {
            let help = self.suggest_help.as_deref().unwrap_or_default();
            let version = self.suggest_version.as_deref().unwrap_or_default();
            return CliAdvisor::Static(StaticAdvisor(Suggestion::from_lines(help, version)));
        }
        CliAdvisor::Conventional(ConventionalAdvisor)
    }
}

/// Advisor chosen from the command line.
enum CliAdvisor {
    Conventional(ConventionalAdvisor),
    Static(StaticAdvisor),
    None(NoAdvice),
}

impl Advisor for CliAdvisor {
    async fn suggest(&self, cancel: &CancellationToken, program: &str) -> Result<Suggestion, AdviceError> {
        match self {
            Self::Conventional(advisor) => advisor.suggest(cancel, program).await,
            Self::Static(advisor) => advisor.suggest(cancel, program).await,
            Self::None(advisor) => advisor.suggest(cancel, program).await,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "command_probe=debug,cmdprobe=debug",
        _ => "command_probe=trace,cmdprobe=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Cancel `cancel` on the first SIGINT or SIGTERM.
fn spawn_signal_bridge(cancel: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::debug!("Shutdown signal received, cancelling");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "SIGTERM handler unavailable");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn print_report(cli: &Cli, report: &LookupReport) {
    println!("command:  {}", quote_args(&cli.command));
    println!("location: {}", report.location_text());

    if let Some(version) = &report.parsed_version {
        println!("version:  {version}");
    } else if let Some(outcome) = &report.version {
        if !outcome.success {
            println!("version:  unavailable");
        }
    }

    match &report.help {
        Some(help) => {
            println!("\n$ {}", report.help_invocation());
            print!("{}", help.output);
            if !help.output.ends_with('\n') {
                println!();
            }
        }
        None => println!("\nNo local help text; degraded lookup."),
    }

    if let Some(version) = report.version.as_ref().filter(|v| v.success) {
        if report.parsed_version.is_none() {
            println!("\n$ {}", version.invocation);
            print!("{}", version.output);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cancel = CancellationToken::new();
    spawn_signal_bridge(cancel.clone());

    let lookup = Lookup::new(ProcessLauncher::from_env(), cli.advisor(), cli.options());
    let report = match lookup.run(cli.program(), &cancel).await {
        Ok(report) => report,
        Err(LookupError::Cancelled) => {
            eprintln!("cancelled");
            return Ok(ExitCode::from(130));
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("hint: {}", e.fix_suggestion());
            return Ok(ExitCode::FAILURE);
        }
    };

    if report.is_degraded() {
        eprintln!("warning: {} ({})", report.location_text(), cli.program());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        print_report(&cli, &report);
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_after_program_belong_to_command() {
        let cli = Cli::try_parse_from(["cmdprobe", "-f", "go", "build", "-v", "--json"]).unwrap();
        assert!(cli.force);
        assert!(!cli.json);
        assert_eq!(cli.program(), "go");
        assert_eq!(cli.command, ["go", "build", "-v", "--json"]);
    }

    #[test]
    fn test_options_from_flags() {
        let cli = Cli::try_parse_from([
            "cmdprobe",
            "--no-version",
            "--direct-timeout",
            "1",
            "--shell-timeout",
            "2",
            "ls",
        ])
        .unwrap();
        let options = cli.options();
        assert!(!options.force);
        assert!(!options.with_version);
        assert_eq!(options.retry.direct_timeout, Duration::from_secs(1));
        assert_eq!(options.retry.shell_timeout, Duration::from_secs(2));
        assert_eq!(options.resolve.shell_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["cmdprobe"]).is_err());
    }

    #[test]
    fn test_no_advice_conflicts_with_suggestions() {
        let result = Cli::try_parse_from(["cmdprobe", "--no-advice", "--suggest-help", "x -h", "x"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_static_advice_from_flags() {
        let cli = Cli::try_parse_from([
            "cmdprobe",
            "--suggest-help",
            "go help build",
            "--suggest-version",
            "NONE",
            "go",
        ])
        .unwrap();
        let suggestion = cli.advisor().suggest(&CancellationToken::new(), "go").await.unwrap();
        assert_eq!(suggestion.help, ["go", "help", "build"]);
        assert!(suggestion.version.is_empty());
    }

    #[tokio::test]
    async fn test_default_advice_is_conventional() {
        let cli = Cli::try_parse_from(["cmdprobe", "rg"]).unwrap();
        let suggestion = cli.advisor().suggest(&CancellationToken::new(), "rg").await.unwrap();
        assert_eq!(suggestion.help, ["rg", "--help"]);
    }
}
