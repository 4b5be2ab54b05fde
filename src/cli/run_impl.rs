use tracing::{Level, debug, info};

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::error::GateError;
use crate::normalize::normalize;
use crate::types::{Tally, Violation};
use crate::{analyzer, formatters, output};

/// What a completed run produced, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRun {
    /// Most severe first.
    pub violations: Vec<Violation>,
    pub tally: Tally,
    pub summary: String,
    pub outputs: String,
}

/// Runs the analyzer and writes the summary and results files.
///
/// Both output files are rendered before either is written, so a failure in
/// any earlier stage leaves existing outputs untouched.
///
/// # Errors
/// Returns the first [`GateError`] hit; no stage is retried.
pub fn run_with_config(config: &Config) -> Result<GateRun, GateError> {
    config.validate()?;

    let report = analyzer::run_analysis(
        &config.analyzer,
        &config.target,
        &config.sfca_output_file,
    )?;

    let target_root = config.target_root();
    let violations = normalize(&report, target_root.as_deref());
    info!("{} sf code-analyzer violations", violations.len());

    let (violations, tally) = aggregate(violations, config.threshold);
    if tracing::enabled!(Level::DEBUG) {
        if let Ok(json) = serde_json::to_string(&violations) {
            debug!("Violations: {json}");
        }
    }

    let summary = formatters::summary::format(&violations, &tally, config.threshold);
    let outputs = formatters::outputs::format(&tally);

    output::write_all(&[
        (config.summary_file.as_path(), summary.as_str()),
        (config.results_file.as_path(), outputs.as_str()),
    ])?;

    info!(
        passed = tally.passed(),
        above_threshold = tally.above_threshold,
        threshold = config.threshold.name(),
        "Wrote {} and {}",
        config.summary_file.display(),
        config.results_file.display()
    );

    Ok(GateRun {
        violations,
        tally,
        summary,
        outputs,
    })
}
