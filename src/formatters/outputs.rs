use indexmap::IndexMap;

use crate::types::{Severity, Tally};

/// Output names in the order the CI step reads them.
pub fn entries(tally: &Tally) -> IndexMap<&'static str, usize> {
    let mut out = IndexMap::with_capacity(Severity::ALL.len() + 1);
    out.insert("num-violations-above-threshold", tally.above_threshold);
    for sev in Severity::ALL {
        out.insert(output_key(sev), tally.count(sev));
    }
    out
}

pub fn output_key(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "num-critical-severity-violations",
        Severity::High => "num-high-severity-violations",
        Severity::Medium => "num-medium-severity-violations",
        Severity::Low => "num-low-severity-violations",
        Severity::Info => "num-info-severity-violations",
    }
}

/// `key=value` lines joined by newlines, no trailing newline.
pub fn format(tally: &Tally) -> String {
    entries(tally)
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
