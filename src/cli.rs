use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};
use tracing::debug;

use crate::config::{
    Config, DEFAULT_ANALYZER, DEFAULT_RESULTS_FILE, DEFAULT_SFCA_OUTPUT_FILE,
    DEFAULT_SUMMARY_FILE, DEFAULT_TARGET,
};
use crate::error::GateError;
use crate::types::Severity;

mod run_impl;

pub use run_impl::{GateRun, run_with_config};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sfca-gate",
    version,
    about = "Run sf code-analyzer against a target directory and summarize the violations",
    long_about = None
)]
pub struct Args {
    /// Path that output variables will be saved to (key=value lines for CI)
    #[arg(long = "results-file", value_name = "PATH", default_value = DEFAULT_RESULTS_FILE, value_hint = ValueHint::FilePath)]
    pub results_file: PathBuf,

    /// Path that sf code-analyzer's raw JSON results will be saved to
    #[arg(long = "sfca-output-file", value_name = "PATH", default_value = DEFAULT_SFCA_OUTPUT_FILE, value_hint = ValueHint::FilePath)]
    pub sfca_output_file: PathBuf,

    /// Path that the formatted Markdown summary will be saved to
    #[arg(long = "summary-file", value_name = "PATH", default_value = DEFAULT_SUMMARY_FILE, value_hint = ValueHint::FilePath)]
    pub summary_file: PathBuf,

    /// The directory to scan
    #[arg(long = "target", value_name = "DIR", default_value = DEFAULT_TARGET, value_hint = ValueHint::DirPath)]
    pub target: PathBuf,

    /// Most lenient severity (1=Critical .. 5=Info) that still fails the check
    #[arg(
        long = "threshold",
        value_name = "LEVEL",
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(1..=5)
    )]
    pub threshold: u8,

    /// Program that provides `code-analyzer run`
    #[arg(long = "analyzer", value_name = "PROGRAM", default_value = DEFAULT_ANALYZER, value_hint = ValueHint::CommandName)]
    pub analyzer: String,

    /// Verbose logging (-v info, -vv debug; RUST_LOG overrides)
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// # Errors
    /// Returns [`GateError::InvalidArgument`] if the threshold is not a known severity.
    pub fn into_config(self) -> Result<Config, GateError> {
        let threshold = Severity::from_level(self.threshold).ok_or_else(|| {
            GateError::InvalidArgument(format!("threshold {} is not in 1..=5", self.threshold))
        })?;
        Ok(Config {
            target: self.target,
            sfca_output_file: self.sfca_output_file,
            summary_file: self.summary_file,
            results_file: self.results_file,
            threshold,
            analyzer: self.analyzer,
        })
    }
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if any stage of the gate fails; nothing is retried.
pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = args.into_config()?;
    debug!(?config, "resolved configuration");
    run_with_config(&config)?;
    Ok(())
}

/// Initialize tracing on stderr; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
