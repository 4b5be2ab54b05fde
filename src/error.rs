use std::path::PathBuf;
use std::process::ExitStatus;

/// Every way a gate run can fail. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to launch analyzer `{program}`: {source}")]
    AnalyzerLaunch {
        program: String,
        source: std::io::Error,
    },

    /// The analyzer ran but exited unsuccessfully.
    #[error("analyzer exited with {status}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    AnalyzerExecution {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("cannot read analyzer report {}: {source}", .path.display())]
    ReportUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("analyzer report {} is not valid JSON: {source}", .path.display())]
    ReportMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GateError::Io {
            path: path.into(),
            source,
        }
    }
}
