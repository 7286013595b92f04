//! Remediation triage planner.
//!
//! Turns one evaluation result into a prioritized remediation queue.
//! Input documents are treated as untrusted: every field degrades to a
//! documented default rather than erroring.

use mandate_config::EscalationSettings;
use mandate_engine::EvalResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use mandate_primitives::{Severity, Status};

/// Summary block of an evaluation document under triage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Verdict string as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    /// Score as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// One finding of an evaluation document under triage, stringly typed as it
/// arrives from persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingRecord {
    /// Finding id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Severity string as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Status string as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Narrative message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `EvalResponse`-shaped document consumed by the triage planner.
///
/// Deserializable from any stored evaluation result, including documents
/// written by other implementations; unknown fields are ignored and missing
/// fields default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationDocument {
    /// System the evaluation was for, when the writer recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
    /// Profile the evaluation ran against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// Summary block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<DocumentSummary>,
    /// Findings under triage.
    #[serde(default)]
    pub findings: Vec<FindingRecord>,
    /// Evaluation context; consulted for `system_id` as a fallback.
    #[serde(default)]
    pub context: Map<String, Value>,
}

impl EvaluationDocument {
    /// Returns the system id, falling back to the context's `system_id`.
    #[must_use]
    pub fn system_id(&self) -> Option<String> {
        self.system_id.clone().or_else(|| {
            self.context
                .get("system_id")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
    }
}

impl From<&EvalResponse> for EvaluationDocument {
    fn from(response: &EvalResponse) -> Self {
        Self {
            system_id: None,
            profile_id: Some(response.profile_id.clone()),
            summary: Some(DocumentSummary {
                verdict: Some(response.summary.verdict.to_string()),
                score: Some(response.summary.score),
            }),
            findings: response
                .findings
                .iter()
                .map(|finding| FindingRecord {
                    id: Some(finding.id.clone()),
                    title: Some(finding.title.clone()),
                    severity: Some(finding.severity.to_string()),
                    status: Some(finding.status.to_string()),
                    message: Some(finding.message.clone()),
                })
                .collect(),
            context: Map::new(),
        }
    }
}

/// One finding that needs remediation or review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationItem {
    /// Finding id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Normalized severity.
    pub severity: Severity,
    /// Normalized status.
    pub status: Status,
    /// Narrative message.
    pub message: String,
    /// Profile the finding came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// System the finding applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
    /// Recommended next step.
    pub recommended_action: String,
    /// Whether the finding escalates to human review.
    pub requires_hitl: bool,
    /// Priority rank; 0 is most urgent.
    pub priority: u8,
}

/// Structured remediation plan derived from one evaluation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationPlan {
    /// System under remediation, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
    /// Originating profile, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// Originating verdict, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    /// Originating score, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Items sorted by `(priority, id)` ascending.
    pub items: Vec<RemediationItem>,
}

/// Recommended action for a (status, severity) pair, from the fixed triage
/// table.
#[must_use]
pub fn recommended_action(severity: Severity, status: Status) -> &'static str {
    match status {
        Status::Fail => {
            if severity.is_elevated() {
                "Immediate remediation required; escalate to governance owner."
            } else {
                "Remediate in next governance sprint and document mitigation steps."
            }
        }
        Status::Warn => {
            if severity.is_elevated() {
                "Investigate root cause and plan remediation; consider HITL review."
            } else {
                "Monitor and address as part of regular maintenance."
            }
        }
        Status::Pass => "No remediation required; continue monitoring.",
        Status::Unknown => "Status unknown; manual review recommended.",
    }
}

/// Whether a finding escalates to human review under the supplied flags.
#[must_use]
pub fn requires_hitl(status: Status, escalation: &EscalationSettings) -> bool {
    match status {
        Status::Fail => escalation.hitl_on_fail,
        Status::Warn => escalation.hitl_on_warn,
        Status::Pass | Status::Unknown => false,
    }
}

/// Builds a remediation plan from an evaluation document.
///
/// Items are sorted by `(priority, id)` ascending, producing a stable,
/// deterministic queue.
#[must_use]
pub fn build_remediation_plan(
    document: &EvaluationDocument,
    escalation: &EscalationSettings,
) -> RemediationPlan {
    let system_id = document.system_id();
    let summary = document.summary.clone().unwrap_or_default();

    let mut items: Vec<RemediationItem> = document
        .findings
        .iter()
        .map(|finding| {
            let severity = Severity::normalize(finding.severity.as_deref());
            let status = Status::normalize(finding.status.as_deref());

            RemediationItem {
                id: finding.id.clone().unwrap_or_default(),
                title: finding.title.clone().unwrap_or_default(),
                severity,
                status,
                message: finding.message.clone().unwrap_or_default(),
                profile_id: document.profile_id.clone(),
                system_id: system_id.clone(),
                recommended_action: recommended_action(severity, status).to_owned(),
                requires_hitl: requires_hitl(status, escalation),
                priority: severity.priority(),
            }
        })
        .collect();

    items.sort_by(|a, b| (a.priority, &a.id).cmp(&(b.priority, &b.id)));

    debug!(
        system_id = system_id.as_deref().unwrap_or("unknown"),
        item_count = items.len(),
        "remediation plan built"
    );

    RemediationPlan {
        system_id,
        profile_id: document.profile_id.clone(),
        verdict: summary.verdict,
        score: summary.score,
        items,
    }
}

/// Convenience wrapper triaging an in-process [`EvalResponse`].
#[must_use]
pub fn plan_remediation(
    response: &EvalResponse,
    escalation: &EscalationSettings,
) -> RemediationPlan {
    build_remediation_plan(&EvaluationDocument::from(response), escalation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, severity: &str, status: &str) -> FindingRecord {
        FindingRecord {
            id: Some(id.to_owned()),
            title: Some(format!("Finding {id}")),
            severity: Some(severity.to_owned()),
            status: Some(status.to_owned()),
            message: Some(String::new()),
        }
    }

    fn document(findings: Vec<FindingRecord>) -> EvaluationDocument {
        EvaluationDocument {
            system_id: Some("sys-1".into()),
            profile_id: Some("baseline".into()),
            summary: Some(DocumentSummary {
                verdict: Some("fail".into()),
                score: Some(0.5),
            }),
            findings,
            context: Map::new(),
        }
    }

    #[test]
    fn items_sort_by_priority_then_id() {
        let plan = build_remediation_plan(
            &document(vec![
                record("b", "high", "fail"),
                record("a", "high", "fail"),
                record("z", "critical", "warn"),
            ]),
            &EscalationSettings::default(),
        );

        let order: Vec<&str> = plan.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, ["z", "a", "b"]);
    }

    #[test]
    fn escalation_flags_drive_requires_hitl() {
        let escalation = EscalationSettings {
            hitl_on_fail: true,
            hitl_on_warn: false,
        };
        let plan = build_remediation_plan(
            &document(vec![
                record("failed", "low", "fail"),
                record("warned", "critical", "warn"),
                record("passed", "high", "pass"),
            ]),
            &escalation,
        );

        let by_id = |id: &str| plan.items.iter().find(|i| i.id == id).unwrap();
        assert!(by_id("failed").requires_hitl);
        assert!(!by_id("warned").requires_hitl);
        assert!(!by_id("passed").requires_hitl);
    }

    #[test]
    fn action_table_buckets_by_status_and_severity() {
        assert_eq!(
            recommended_action(Severity::Critical, Status::Fail),
            "Immediate remediation required; escalate to governance owner."
        );
        assert_eq!(
            recommended_action(Severity::Low, Status::Fail),
            "Remediate in next governance sprint and document mitigation steps."
        );
        assert_eq!(
            recommended_action(Severity::High, Status::Warn),
            "Investigate root cause and plan remediation; consider HITL review."
        );
        assert_eq!(
            recommended_action(Severity::Medium, Status::Warn),
            "Monitor and address as part of regular maintenance."
        );
        assert_eq!(
            recommended_action(Severity::Critical, Status::Pass),
            "No remediation required; continue monitoring."
        );
        assert_eq!(
            recommended_action(Severity::Low, Status::Unknown),
            "Status unknown; manual review recommended."
        );
    }

    #[test]
    fn malformed_findings_degrade_to_defaults() {
        let plan = build_remediation_plan(
            &document(vec![FindingRecord::default()]),
            &EscalationSettings::default(),
        );

        let item = &plan.items[0];
        assert_eq!(item.id, "");
        assert_eq!(item.severity, Severity::Medium);
        assert_eq!(item.status, Status::Unknown);
        assert_eq!(
            item.recommended_action,
            "Status unknown; manual review recommended."
        );
        assert!(!item.requires_hitl);
    }

    #[test]
    fn system_id_falls_back_to_the_context() {
        let mut doc = document(vec![record("a", "low", "pass")]);
        doc.system_id = None;
        doc.context
            .insert("system_id".into(), Value::from("ctx-sys"));

        let plan = build_remediation_plan(&doc, &EscalationSettings::default());
        assert_eq!(plan.system_id.as_deref(), Some("ctx-sys"));
        assert_eq!(plan.items[0].system_id.as_deref(), Some("ctx-sys"));
    }
}
