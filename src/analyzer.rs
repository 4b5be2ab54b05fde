use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::GateError;
use crate::types::RawReport;

/// Subcommand tokens passed ahead of the per-run flags.
const SUBCOMMAND: [&str; 2] = ["code-analyzer", "run"];

/// Builds the analyzer command line: `<program> code-analyzer run --output-file <output> --target <target>`.
pub fn analyzer_command(program: &str, target: &Path, output: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(SUBCOMMAND)
        .arg("--output-file")
        .arg(output)
        .arg("--target")
        .arg(target);
    cmd
}

/// Runs the analyzer against `target`, blocking until it exits, then reads the
/// JSON report it wrote to `output`.
///
/// # Errors
/// - [`GateError::AnalyzerLaunch`] if the program cannot be spawned.
/// - [`GateError::AnalyzerExecution`] if it exits non-zero.
/// - [`GateError::ReportUnreadable`] / [`GateError::ReportMalformed`] for a bad report.
pub fn run_analysis(program: &str, target: &Path, output: &Path) -> Result<RawReport, GateError> {
    let mut cmd = analyzer_command(program, target, output);
    info!(
        "Running sf code-analyzer: {program} {} --output-file {} --target {}",
        SUBCOMMAND.join(" "),
        output.display(),
        target.display()
    );

    let out = cmd.output().map_err(|source| GateError::AnalyzerLaunch {
        program: program.to_string(),
        source,
    })?;
    debug!(status = %out.status, "analyzer finished");

    if !out.status.success() {
        return Err(GateError::AnalyzerExecution {
            status: out.status,
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        });
    }

    read_report(output)
}

/// Parses a report previously written by the analyzer.
///
/// # Errors
/// Returns an error if the file is missing, unreadable or not valid JSON.
pub fn read_report(path: &Path) -> Result<RawReport, GateError> {
    let text = fs::read_to_string(path).map_err(|source| GateError::ReportUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| GateError::ReportMalformed {
        path: path.to_path_buf(),
        source,
    })
}
