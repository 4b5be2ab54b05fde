use crate::types::{Severity, Tally, Violation};

/// Orders violations most severe first (stable, so equal severities keep report
/// order) and tallies them against `threshold`.
pub fn aggregate(mut violations: Vec<Violation>, threshold: Severity) -> (Vec<Violation>, Tally) {
    violations.sort_by_key(|v| v.severity);
    let mut tally = Tally::default();
    for v in &violations {
        tally.record(v.severity, threshold);
    }
    (violations, tally)
}
