//! ktscan CLI — the command-line interface for the ktscan Kotlin analyzer.
//!
//! Provides `ktscan analyze` for running the sensor over a project and
//! `ktscan clean` for discarding the run-to-run analysis cache.

#![warn(missing_docs)]

mod analyze;
mod clean;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// ktscan — an incremental static analyzer for Kotlin sources.
#[derive(Parser, Debug)]
#[command(name = "ktscan", version, about = "ktscan Kotlin analyzer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze the Kotlin sources of a project.
    Analyze(AnalyzeArgs),
    /// Remove the project's analysis cache.
    Clean {
        /// Project directory (defaults to the current directory).
        path: Option<String>,
    },
}

/// Arguments for the `ktscan analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Project directory (defaults to the current directory).
    pub path: Option<String>,

    /// Rule names to suppress (e.g., `--allow wildcard-import`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Output format for findings.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Parser worker-thread count override.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Disable the run-to-run content hash cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Treat per-file read and parse failures as a failed run.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Findings output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(default_log_level(cli.quiet, cli.verbose))
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Command::Analyze(ref args) => analyze::run(args, &global),
        Command::Clean { ref path } => clean::run(path.as_deref()),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Default log level when `RUST_LOG` is unset: `--verbose` lowers the
/// threshold to debug, `--quiet` raises it to errors only.
fn default_log_level(quiet: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    }
}
