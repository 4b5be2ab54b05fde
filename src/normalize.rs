use std::fmt::Write as _;

use tracing::warn;

use crate::types::{RawFinding, RawLocation, RawReport, Severity, Violation};

pub const REPORTER: &str = "sf code-analyzer";

/// Maps every raw finding to a [`Violation`], in report order.
///
/// `target_root` is the `/`-terminated target directory (see `Config::target_root`);
/// finding paths are cut back to start at it.
pub fn normalize(report: &RawReport, target_root: Option<&str>) -> Vec<Violation> {
    report
        .violations
        .iter()
        .map(|f| normalize_finding(f, target_root))
        .collect()
}

pub fn normalize_finding(finding: &RawFinding, target_root: Option<&str>) -> Violation {
    let severity = severity_of(finding);
    Violation {
        icon: severity.icon(),
        location: join_locations(&finding.locations, target_root),
        message: finding.message.clone(),
        reported_by: REPORTER,
        rule: format!("{}:{}", finding.engine, finding.rule),
        severity,
    }
}

/// Missing severities are Info; out-of-range ones are coerced to Info as well.
fn severity_of(finding: &RawFinding) -> Severity {
    let Some(level) = finding.severity else {
        return Severity::Info;
    };
    u8::try_from(level)
        .ok()
        .and_then(Severity::from_level)
        .unwrap_or_else(|| {
            warn!(
                raw_level = level,
                rule = %finding.rule,
                "severity outside 1-5, treating as Info"
            );
            Severity::Info
        })
}

/// Renders each location as `path:line:column` (`?` for unknown parts), one per line.
pub fn join_locations(locations: &[RawLocation], target_root: Option<&str>) -> String {
    let mut out = String::new();
    for (i, loc) in locations.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let path = loc
            .file
            .as_deref()
            .map_or_else(|| "?".to_string(), |f| anchor_path(f, target_root));
        let _ = write!(
            out,
            "{path}:{}:{}",
            or_placeholder(loc.start_line),
            or_placeholder(loc.start_column)
        );
    }
    out
}

/// Drops whatever precedes the first occurrence of `root` so scanner-side
/// absolute paths don't leak into the report. Paths not containing the root
/// are kept as they are.
pub fn anchor_path(file: &str, target_root: Option<&str>) -> String {
    let Some(root) = target_root else {
        return file.to_string();
    };
    let normalized = file.replace('\\', "/");
    match normalized.split_once(root) {
        Some((_, rest)) => format!("{root}{rest}"),
        None => normalized,
    }
}

fn or_placeholder(n: Option<u64>) -> String {
    n.map_or_else(|| "?".to_string(), |n| n.to_string())
}
