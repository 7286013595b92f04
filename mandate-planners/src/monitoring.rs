//! Monitoring cadence planner.
//!
//! Decides, per target system, whether governance evaluation should be
//! re-run. Each decision is independent and pure; snapshot retrieval is the
//! only I/O and runs with bounded concurrency.

use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use mandate_config::{MonitoringSettings, PolicyMappings, Settings};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::snapshot::{EvaluationSnapshot, SnapshotSource};

/// A system that may need governance re-evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringTarget {
    /// Logical system identifier.
    pub system_id: String,
    /// Use case hint for profile mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    /// System type hint for profile mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
    /// Explicit profile override, taking precedence over any mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_ref: Option<String>,
    /// Caller metadata, carried through into the action's `extra` field.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl MonitoringTarget {
    /// Creates a target with no hints.
    #[must_use]
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            use_case: None,
            system_type: None,
            profile_ref: None,
            metadata: Map::new(),
        }
    }

    /// Sets the use case hint.
    #[must_use]
    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = Some(use_case.into());
        self
    }

    /// Sets the system type hint.
    #[must_use]
    pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = Some(system_type.into());
        self
    }

    /// Pins an explicit profile reference.
    #[must_use]
    pub fn with_profile_ref(mut self, profile_ref: impl Into<String>) -> Self {
        self.profile_ref = Some(profile_ref.into());
        self
    }
}

/// The decision taken for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Re-run evaluation for the system.
    RunEvaluation,
    /// No evaluation needed this pass.
    Skip,
}

/// One monitoring decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringAction {
    /// System the decision applies to.
    pub system_id: String,
    /// The decision.
    pub action: ActionKind,
    /// Why the decision was taken.
    pub reason: String,
    /// Profile the system should be evaluated against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_ref: Option<String>,
    /// Use case hint echoed from the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    /// System type hint echoed from the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
    /// Timestamp of the last known evaluation, when parseable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_at: Option<DateTime<Utc>>,
    /// Verdict of the last known evaluation, lowercased.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verdict: Option<String>,
    /// Caller metadata echoed from the target.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// Ordered list of decisions for one planning pass.
///
/// Plans are produced fresh on every invocation; the planner owns no
/// persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringPlan {
    /// When the pass ran.
    pub generated_at: DateTime<Utc>,
    /// Decisions in target order.
    pub actions: Vec<MonitoringAction>,
}

/// Limits for a planning pass.
#[derive(Debug, Clone, Copy)]
pub struct PlanConfig {
    max_in_flight: NonZeroUsize,
}

impl PlanConfig {
    /// Creates a configuration with the supplied snapshot-retrieval
    /// concurrency limit.
    #[must_use]
    pub const fn new(max_in_flight: NonZeroUsize) -> Self {
        Self { max_in_flight }
    }

    /// Returns the snapshot-retrieval concurrency limit.
    #[must_use]
    pub const fn max_in_flight(self) -> NonZeroUsize {
        self.max_in_flight
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(8).expect("non-zero"))
    }
}

/// Outcome of the cadence decision for one target.
#[derive(Debug, Clone)]
struct CadenceDecision {
    rerun: bool,
    reason: String,
    evaluated_at: Option<DateTime<Utc>>,
    verdict: Option<String>,
}

/// Core decision function: whether a system needs re-evaluation.
///
/// Checks run in a fixed order and the first match wins:
///
/// 1. no previous evaluation;
/// 2. verdict is in `rerun_on_verdict` (case-insensitive);
/// 3. verdict is `warn` and `rerun_on_warn` is set;
/// 4. no parseable timestamp;
/// 5. age exceeds `max_age_days`;
/// 6. otherwise, skip.
fn needs_rerun(
    snapshot: Option<&EvaluationSnapshot>,
    cfg: &MonitoringSettings,
    now: DateTime<Utc>,
) -> CadenceDecision {
    let Some(snapshot) = snapshot else {
        return CadenceDecision {
            rerun: true,
            reason: "No previous evaluation found.".to_owned(),
            evaluated_at: None,
            verdict: None,
        };
    };

    let verdict = snapshot.verdict_lowercase();
    let evaluated_at = snapshot.evaluated_at();

    if cfg
        .rerun_on_verdict
        .iter()
        .any(|candidate| candidate.to_lowercase() == verdict)
    {
        return CadenceDecision {
            rerun: true,
            reason: format!("Verdict is '{verdict}', which requires re-evaluation."),
            evaluated_at,
            verdict: Some(verdict),
        };
    }

    if verdict == "warn" && cfg.rerun_on_warn {
        return CadenceDecision {
            rerun: true,
            reason: "Verdict is 'warn' and rerun_on_warn is enabled.".to_owned(),
            evaluated_at,
            verdict: Some(verdict),
        };
    }

    let Some(evaluated_at) = evaluated_at else {
        return CadenceDecision {
            rerun: true,
            reason: "Previous evaluation has no valid timestamp.".to_owned(),
            evaluated_at: None,
            verdict: Some(verdict),
        };
    };

    let age_days = (now - evaluated_at).num_seconds() as f64 / 86_400.0;
    if age_days > cfg.max_age_days {
        return CadenceDecision {
            rerun: true,
            reason: format!(
                "Last evaluation is {age_days:.1} days old (> {}).",
                cfg.max_age_days
            ),
            evaluated_at: Some(evaluated_at),
            verdict: Some(verdict),
        };
    }

    CadenceDecision {
        rerun: false,
        reason: "Within acceptable age and verdict thresholds.".to_owned(),
        evaluated_at: Some(evaluated_at),
        verdict: Some(verdict),
    }
}

/// Resolves the profile reference for a target.
///
/// Precedence: explicit target override, then the mapping table (consulted
/// only when the target names a use case), then the global default.
#[must_use]
pub fn resolve_profile(
    target: &MonitoringTarget,
    settings: &Settings,
    mappings: &PolicyMappings,
) -> Option<String> {
    if let Some(profile_ref) = &target.profile_ref {
        return Some(profile_ref.clone());
    }

    if let Some(use_case) = &target.use_case
        && let Some(resolved) = mappings.resolve(use_case, target.system_type.as_deref())
    {
        return Some(resolved.to_owned());
    }

    settings.defaults.profile_ref.clone()
}

fn decide(
    target: &MonitoringTarget,
    snapshot: Option<&EvaluationSnapshot>,
    settings: &Settings,
    mappings: &PolicyMappings,
    now: DateTime<Utc>,
) -> MonitoringAction {
    let decision = needs_rerun(snapshot, &settings.monitoring, now);
    debug!(
        system_id = %target.system_id,
        rerun = decision.rerun,
        reason = %decision.reason,
        "cadence decision"
    );

    MonitoringAction {
        system_id: target.system_id.clone(),
        action: if decision.rerun {
            ActionKind::RunEvaluation
        } else {
            ActionKind::Skip
        },
        reason: decision.reason,
        profile_ref: resolve_profile(target, settings, mappings),
        use_case: target.use_case.clone(),
        system_type: target.system_type.clone(),
        last_evaluated_at: decision.evaluated_at,
        last_verdict: decision.verdict,
        extra: target.metadata.clone(),
    }
}

/// Builds a monitoring plan for a set of targets.
///
/// Snapshot retrieval runs with at most `config.max_in_flight` requests in
/// flight; actions come back in target order. Decisions for already-processed
/// targets remain valid if the caller abandons the pass.
pub async fn plan_monitoring(
    targets: &[MonitoringTarget],
    source: &dyn SnapshotSource,
    settings: &Settings,
    mappings: &PolicyMappings,
    config: PlanConfig,
) -> MonitoringPlan {
    let now = Utc::now();

    let actions = futures::stream::iter(targets)
        .map(|target| async move {
            let snapshot = source.last_evaluation(&target.system_id).await;
            decide(target, snapshot.as_ref(), settings, mappings, now)
        })
        .buffered(config.max_in_flight().get())
        .collect::<Vec<_>>()
        .await;

    MonitoringPlan {
        generated_at: now,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::snapshot::SnapshotSummary;

    fn snapshot(verdict: &str, age_days: i64, now: DateTime<Utc>) -> EvaluationSnapshot {
        EvaluationSnapshot {
            summary: Some(SnapshotSummary {
                verdict: Some(verdict.to_owned()),
                evaluated_at: None,
            }),
            timestamp: Some((now - Duration::days(age_days)).to_rfc3339()),
            evaluated_at: None,
        }
    }

    fn cfg() -> MonitoringSettings {
        MonitoringSettings::default()
    }

    #[test]
    fn no_previous_evaluation_triggers_rerun() {
        let now = Utc::now();
        let decision = needs_rerun(None, &cfg(), now);
        assert!(decision.rerun);
        assert_eq!(decision.reason, "No previous evaluation found.");
    }

    #[test]
    fn fail_verdict_triggers_rerun_regardless_of_age() {
        let now = Utc::now();
        let decision = needs_rerun(Some(&snapshot("FAIL", 1, now)), &cfg(), now);
        assert!(decision.rerun);
        assert!(decision.reason.contains("'fail'"));
        assert_eq!(decision.verdict.as_deref(), Some("fail"));
    }

    #[test]
    fn warn_verdict_triggers_rerun_when_enabled() {
        let now = Utc::now();
        let decision = needs_rerun(Some(&snapshot("warn", 1, now)), &cfg(), now);
        assert!(decision.rerun);
        assert_eq!(
            decision.reason,
            "Verdict is 'warn' and rerun_on_warn is enabled."
        );

        let mut disabled = cfg();
        disabled.rerun_on_warn = false;
        let decision = needs_rerun(Some(&snapshot("warn", 1, now)), &disabled, now);
        assert!(!decision.rerun);
    }

    #[test]
    fn fresh_pass_is_skipped_and_stale_pass_is_rerun() {
        let now = Utc::now();

        let fresh = needs_rerun(Some(&snapshot("pass", 3, now)), &cfg(), now);
        assert!(!fresh.rerun);
        assert_eq!(fresh.reason, "Within acceptable age and verdict thresholds.");

        let stale = needs_rerun(Some(&snapshot("pass", 10, now)), &cfg(), now);
        assert!(stale.rerun);
        assert!(stale.reason.contains("days old"));
    }

    #[test]
    fn missing_timestamp_triggers_rerun() {
        let now = Utc::now();
        let snapshot = EvaluationSnapshot {
            summary: Some(SnapshotSummary {
                verdict: Some("pass".into()),
                evaluated_at: None,
            }),
            timestamp: Some("not a timestamp".into()),
            evaluated_at: None,
        };
        let decision = needs_rerun(Some(&snapshot), &cfg(), now);
        assert!(decision.rerun);
        assert_eq!(
            decision.reason,
            "Previous evaluation has no valid timestamp."
        );
    }

    #[test]
    fn profile_precedence_is_override_then_mapping_then_default() {
        let mut settings = Settings::default();
        settings.defaults.profile_ref = Some("default@1".into());

        let mut mappings = PolicyMappings::default();
        mappings.use_cases.insert(
            "chat".to_owned(),
            mandate_config::MappingTarget {
                profile_ref: Some("mapped@1".to_owned()),
            },
        );

        let pinned = MonitoringTarget::new("s1").with_profile_ref("pinned@1");
        assert_eq!(
            resolve_profile(&pinned, &settings, &mappings).as_deref(),
            Some("pinned@1")
        );

        let mapped = MonitoringTarget::new("s2").with_use_case("chat");
        assert_eq!(
            resolve_profile(&mapped, &settings, &mappings).as_deref(),
            Some("mapped@1")
        );

        let fallback = MonitoringTarget::new("s3");
        assert_eq!(
            resolve_profile(&fallback, &settings, &mappings).as_deref(),
            Some("default@1")
        );
    }

    struct StaticSource {
        verdict: &'static str,
    }

    #[async_trait]
    impl SnapshotSource for StaticSource {
        async fn last_evaluation(&self, system_id: &str) -> Option<EvaluationSnapshot> {
            if system_id == "new-system" {
                return None;
            }
            Some(snapshot(self.verdict, 1, Utc::now()))
        }
    }

    #[tokio::test]
    async fn plan_preserves_target_order() {
        let targets = vec![
            MonitoringTarget::new("new-system"),
            MonitoringTarget::new("warned-system"),
        ];
        let source = StaticSource { verdict: "warn" };
        let settings = Settings::default();
        let mappings = PolicyMappings::default();

        let plan = plan_monitoring(
            &targets,
            &source,
            &settings,
            &mappings,
            PlanConfig::default(),
        )
        .await;

        assert_eq!(plan.actions.len(), 2);
        assert_eq!(plan.actions[0].system_id, "new-system");
        assert_eq!(plan.actions[0].action, ActionKind::RunEvaluation);
        assert_eq!(plan.actions[1].system_id, "warned-system");
        assert_eq!(plan.actions[1].action, ActionKind::RunEvaluation);
        assert_eq!(plan.actions[1].last_verdict.as_deref(), Some("warn"));
    }
}
