use crate::types::{Severity, Tally, Violation};

/// Renders the HTML-flavoured Markdown summary: status header, per-severity
/// recap, then the detail table (omitted when there is nothing to list).
pub fn format(violations: &[Violation], tally: &Tally, threshold: Severity) -> String {
    let mut lines = header(violations.len(), tally, threshold);
    lines.extend(recap(tally));
    lines.extend(table(violations));
    lines.join("\n")
}

fn header(total: usize, tally: &Tally, threshold: Severity) -> Vec<String> {
    let banner = if tally.passed() {
        "<h3>✅ Static Analysis: Check Passed</h3>"
    } else {
        "<h3>🚨 Static Analysis: Check Failed</h3>"
    };
    vec![
        banner.to_string(),
        format!(
            "Analyzed changed files, and found {total} potential violations. \
             {} meets or exceeds the set severity threshold: <code>{}</code><br/>",
            tally.above_threshold,
            threshold.name()
        ),
    ]
}

fn recap(tally: &Tally) -> Vec<String> {
    let mut lines = Vec::with_capacity(Severity::ALL.len() + 2);
    lines.push("<br/><blockquote>".to_string());
    for sev in Severity::ALL {
        lines.push(format!(
            "<b>{} {} {}</b> severity violation(s)<br/>",
            sev.icon(),
            tally.count(sev),
            sev.name()
        ));
    }
    lines.push("</blockquote>".to_string());
    lines
}

fn table(violations: &[Violation]) -> Vec<String> {
    if violations.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(violations.len() + 2);
    lines.push(
        "<table><tr><th> </th><th>Location</th><th>Rule</th><th>Message</th></tr>".to_string(),
    );
    for v in violations {
        lines.push(format!(
            "<tr><td>{}</td><td><sup>{}</sup></td><td><sup>{}</sup></td><td><sup>{}</sup></td></tr>",
            v.icon, v.location, v.rule, v.message
        ));
    }
    lines.push("</table>".to_string());
    lines
}
