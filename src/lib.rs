//! Runs sf code-analyzer, tallies its violations by severity and writes a
//! Markdown summary plus `key=value` outputs for a CI pipeline.

pub mod aggregate;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatters;
pub mod normalize;
pub mod output;
pub mod types;

pub use cli::{GateRun, run_with_config};
pub use config::Config;
pub use error::GateError;
pub use types::{Severity, Tally, Violation};
