//! Verdict aggregation over a set of findings.

use mandate_primitives::{FindingStatus, Verdict};

use crate::report::Finding;

/// Reduces findings to a normalized score and verdict by dominance of the
/// worst status present.
///
/// The reduction depends only on the set of statuses, never on finding
/// count, severity, or rule weight, and is therefore order-independent:
///
/// - no findings: `(1.0, pass)`
/// - any `fail`: `(0.5, fail)`
/// - else any `warn`: `(0.8, warn)`
/// - else: `(1.0, pass)`
///
/// This is the single canonical reduction; evaluation and reporting paths
/// must not diverge from it.
#[must_use]
pub fn aggregate(findings: &[Finding]) -> (f64, Verdict) {
    let mut saw_warn = false;
    for finding in findings {
        match finding.status {
            FindingStatus::Fail => return (0.5, Verdict::Fail),
            FindingStatus::Warn => saw_warn = true,
            FindingStatus::Pass => {}
        }
    }

    if saw_warn {
        (0.8, Verdict::Warn)
    } else {
        (1.0, Verdict::Pass)
    }
}

#[cfg(test)]
mod tests {
    use mandate_primitives::Severity;
    use serde_json::Map;

    use super::*;

    fn finding(id: &str, status: FindingStatus, severity: Severity) -> Finding {
        Finding {
            id: id.into(),
            title: format!("Rule {id}"),
            severity,
            status,
            message: String::new(),
            data: Map::new(),
        }
    }

    #[test]
    fn no_findings_is_a_full_score_pass() {
        let (score, verdict) = aggregate(&[]);
        assert!((score - 1.0).abs() < f64::EPSILON);
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn any_fail_dominates_regardless_of_order_and_severity() {
        let forward = [
            finding("a", FindingStatus::Pass, Severity::Critical),
            finding("b", FindingStatus::Warn, Severity::Low),
            finding("c", FindingStatus::Fail, Severity::Low),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        for set in [&forward[..], &reversed[..]] {
            let (score, verdict) = aggregate(set);
            assert!((score - 0.5).abs() < f64::EPSILON);
            assert_eq!(verdict, Verdict::Fail);
        }
    }

    #[test]
    fn warn_without_fail_scores_point_eight() {
        let findings = [
            finding("a", FindingStatus::Pass, Severity::Medium),
            finding("b", FindingStatus::Warn, Severity::Medium),
        ];
        let (score, verdict) = aggregate(&findings);
        assert!((score - 0.8).abs() < f64::EPSILON);
        assert_eq!(verdict, Verdict::Warn);
    }

    #[test]
    fn all_pass_is_a_full_score_pass() {
        let findings = [finding("a", FindingStatus::Pass, Severity::High)];
        let (score, verdict) = aggregate(&findings);
        assert!((score - 1.0).abs() < f64::EPSILON);
        assert_eq!(verdict, Verdict::Pass);
    }
}
