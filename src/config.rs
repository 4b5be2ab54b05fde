use std::path::PathBuf;

use crate::error::GateError;
use crate::types::Severity;

pub const DEFAULT_RESULTS_FILE: &str = "results.txt";
pub const DEFAULT_SFCA_OUTPUT_FILE: &str = "sfca_results.json";
pub const DEFAULT_SUMMARY_FILE: &str = "static_analysis_summary.md";
pub const DEFAULT_TARGET: &str = "source/";
pub const DEFAULT_ANALYZER: &str = "sf";

/// Settings for a single gate run, fixed once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory handed to the analyzer; also the root findings are re-anchored on.
    pub target: PathBuf,
    /// Where the analyzer writes its raw JSON report.
    pub sfca_output_file: PathBuf,
    pub summary_file: PathBuf,
    /// key=value outputs for the CI pipeline.
    pub results_file: PathBuf,
    pub threshold: Severity,
    /// Program providing the `code-analyzer run` subcommand.
    pub analyzer: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: PathBuf::from(DEFAULT_TARGET),
            sfca_output_file: PathBuf::from(DEFAULT_SFCA_OUTPUT_FILE),
            summary_file: PathBuf::from(DEFAULT_SUMMARY_FILE),
            results_file: PathBuf::from(DEFAULT_RESULTS_FILE),
            threshold: Severity::High,
            analyzer: DEFAULT_ANALYZER.to_string(),
        }
    }
}

impl Config {
    /// Checks the pieces clap cannot: the target must be an existing directory
    /// and the analyzer program name must not be blank.
    ///
    /// # Errors
    /// Returns [`GateError::InvalidArgument`] describing the first problem found.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.analyzer.trim().is_empty() {
            return Err(GateError::InvalidArgument(
                "--analyzer must not be empty".to_string(),
            ));
        }
        if !self.target.is_dir() {
            return Err(GateError::InvalidArgument(format!(
                "target {} is not a directory",
                self.target.display()
            )));
        }
        Ok(())
    }

    /// The target rendered as a `/`-terminated prefix for re-anchoring finding paths.
    /// `None` when the target is the current directory, where no re-anchoring applies.
    pub fn target_root(&self) -> Option<String> {
        let raw = self.target.to_string_lossy().replace('\\', "/");
        let mut root = raw.as_str();
        while let Some(rest) = root.strip_prefix("./") {
            root = rest;
        }
        let root = root.trim_end_matches('/');
        if root.is_empty() || root == "." {
            return None;
        }
        Some(format!("{root}/"))
    }
}
