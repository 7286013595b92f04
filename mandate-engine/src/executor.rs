//! Rule executor: runs a profile's rules in declaration order.

use mandate_primitives::{FindingStatus, Severity};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::report::Finding;
use crate::rules::{FindingDraft, RuleContext, RuleRegistry};
use crate::schema::PolicyProfile;

fn merged_params(declared: &Map<String, Value>, rule_id: &str) -> Map<String, Value> {
    let mut params = declared.clone();
    params
        .entry("severity".to_owned())
        .or_insert_with(|| Value::from("medium"));
    params
        .entry("title".to_owned())
        .or_insert_with(|| Value::from(format!("Rule {rule_id}")));
    params
}

fn complete(rule_id: &str, params: &Map<String, Value>, draft: FindingDraft) -> Finding {
    let severity = draft.severity.unwrap_or_else(|| {
        Severity::normalize(params.get("severity").and_then(Value::as_str))
    });
    let title = params
        .get("title")
        .and_then(Value::as_str)
        .map_or_else(|| format!("Rule {rule_id}"), str::to_owned);

    Finding {
        id: rule_id.to_owned(),
        title,
        severity,
        status: draft.status,
        message: draft.message,
        data: draft.data,
    }
}

/// Runs every rule declared by the profile against the supplied context and
/// evidence, in declaration order.
///
/// A rule yields at most one finding; inapplicable rules are silently
/// omitted. A rule that fails to execute is isolated into a synthetic
/// failing finding carrying the error detail, so one defective rule never
/// aborts or corrupts the rest of the run.
#[must_use]
pub fn run_rules(
    profile: &PolicyProfile,
    registry: &RuleRegistry,
    context: &Map<String, Value>,
    evidence: &Map<String, Value>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rule_ref in &profile.rules {
        let params = merged_params(&rule_ref.params, &rule_ref.id);
        let ctx = RuleContext::new(&rule_ref.id, &params, context, evidence);

        match registry.resolve(&rule_ref.id).evaluate(&ctx) {
            Ok(Some(draft)) => {
                debug!(rule_id = %rule_ref.id, status = %draft.status, "rule evaluated");
                findings.push(complete(&rule_ref.id, &params, draft));
            }
            Ok(None) => {
                debug!(rule_id = %rule_ref.id, "rule inapplicable, no finding");
            }
            Err(err) => {
                warn!(rule_id = %rule_ref.id, error = %err, "rule failed, isolating");
                let message = err.to_string();
                let draft = FindingDraft::new(FindingStatus::Fail, message.clone())
                    .with_data("error", Value::from(message));
                findings.push(complete(&rule_ref.id, &params, draft));
            }
        }
    }

    findings
}
