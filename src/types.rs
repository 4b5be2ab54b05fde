use serde::{Deserialize, Deserializer, Serialize};

/// Severity levels reported by sf code-analyzer. Lower level = more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Severity {
    Critical = 1,
    High = 2,
    Medium = 3,
    Low = 4,
    Info = 5,
}

impl Severity {
    /// Most to least severe; the order buckets are rendered in.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Severity::Critical),
            2 => Some(Severity::High),
            3 => Some(Severity::Medium),
            4 => Some(Severity::Low),
            5 => Some(Severity::Info),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Critical => "⚫",
            Severity::High => "🔴",
            Severity::Medium => "🟠",
            Severity::Low => "🟡",
            Severity::Info => "⚪",
        }
    }

    /// Whether a violation of this severity counts against `threshold`.
    pub fn meets(self, threshold: Severity) -> bool {
        self <= threshold
    }

    fn index(self) -> usize {
        usize::from(self.level()) - 1
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s.level()
    }
}

/// Top level of the analyzer's JSON report. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub violations: Vec<RawFinding>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFinding {
    #[serde(default)]
    pub severity: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub engine: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: Vec<RawLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub start_line: Option<u64>,
    #[serde(default)]
    pub start_column: Option<u64>,
}

/// Treats an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A finding in the shape the summary renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub icon: &'static str,
    pub location: String,
    pub message: String,
    pub reported_by: &'static str,
    pub rule: String,
    pub severity: Severity,
}

/// Per-severity counts plus how many violations meet the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    counts: [usize; 5],
    pub above_threshold: usize,
}

impl Tally {
    pub fn record(&mut self, severity: Severity, threshold: Severity) {
        self.counts[severity.index()] += 1;
        if severity.meets(threshold) {
            self.above_threshold += 1;
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn passed(&self) -> bool {
        self.above_threshold == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_round_trip_through_from_level() {
        for sev in Severity::ALL {
            assert_eq!(Severity::from_level(sev.level()), Some(sev));
        }
        assert_eq!(Severity::from_level(0), None);
        assert_eq!(Severity::from_level(6), None);
    }

    #[test]
    fn lower_level_meets_higher_threshold() {
        assert!(Severity::Critical.meets(Severity::High));
        assert!(Severity::High.meets(Severity::High));
        assert!(!Severity::Medium.meets(Severity::High));
        assert!(Severity::Info.meets(Severity::Info));
    }

    #[test]
    fn tally_tracks_buckets_and_threshold() {
        let mut t = Tally::default();
        t.record(Severity::High, Severity::High);
        t.record(Severity::Info, Severity::High);
        t.record(Severity::Critical, Severity::High);
        assert_eq!(t.count(Severity::High), 1);
        assert_eq!(t.count(Severity::Medium), 0);
        assert_eq!(t.total(), 3);
        assert_eq!(t.above_threshold, 2);
        assert!(!t.passed());
        assert!(Tally::default().passed());
    }

    #[test]
    fn raw_report_tolerates_missing_fields() {
        let json = r#"{
            "runDir": "/tmp/x",
            "violations": [
                {"engine": "pmd", "rule": "ApexDoc"},
                {"severity": 2, "engine": "eslint", "rule": "no-var", "message": "m",
                 "locations": [{"file": "a.js", "startLine": 3}]}
            ]
        }"#;
        let report: RawReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.violations[0].severity, None);
        assert!(report.violations[0].locations.is_empty());
        assert_eq!(report.violations[1].locations[0].start_line, Some(3));
        assert_eq!(report.violations[1].locations[0].start_column, None);

        let empty: RawReport = serde_json::from_str("{}").unwrap();
        assert!(empty.violations.is_empty());
    }

    #[test]
    fn raw_report_treats_null_as_missing() {
        let json = r#"{
            "violations": [
                {"severity": null, "engine": null, "rule": null, "message": null, "locations": null},
                {"severity": 2, "engine": "pmd", "rule": "R", "message": null,
                 "locations": [{"file": null, "startLine": null, "startColumn": null}]}
            ]
        }"#;
        let report: RawReport = serde_json::from_str(json).unwrap();
        let first = &report.violations[0];
        assert_eq!(first.severity, None);
        assert_eq!(first.engine, "");
        assert_eq!(first.rule, "");
        assert_eq!(first.message, "");
        assert!(first.locations.is_empty());

        let second = &report.violations[1];
        assert_eq!(second.severity, Some(2));
        assert_eq!(second.message, "");
        assert_eq!(second.locations.len(), 1);
        assert_eq!(second.locations[0].file, None);
        assert_eq!(second.locations[0].start_line, None);

        let no_list: RawReport = serde_json::from_str(r#"{"violations": null}"#).unwrap();
        assert!(no_list.violations.is_empty());
    }

    #[test]
    fn violation_serializes_severity_as_level() {
        let v = Violation {
            icon: Severity::Low.icon(),
            location: "source/a.cls:1:1".to_string(),
            message: "m".to_string(),
            reported_by: "sf code-analyzer",
            rule: "pmd:X".to_string(),
            severity: Severity::Low,
        };
        let s = serde_json::to_string(&v).unwrap();
        assert!(s.contains("\"severity\":4"));
    }
}
