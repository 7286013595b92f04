//! Planners consuming mandate evaluation results.
//!
//! Two independent, stateless decision functions: the monitoring cadence
//! planner decides which systems need re-evaluation; the remediation triage
//! planner turns one evaluation result into a prioritized remediation queue.
//! Neither calls the other, and neither owns persisted state.

#![warn(missing_docs, clippy::pedantic)]

mod monitoring;
mod remediation;
mod snapshot;

pub use monitoring::{
    ActionKind, MonitoringAction, MonitoringPlan, MonitoringTarget, PlanConfig, plan_monitoring,
    resolve_profile,
};
pub use remediation::{
    DocumentSummary, EvaluationDocument, FindingRecord, RemediationItem, RemediationPlan,
    build_remediation_plan, plan_remediation, recommended_action, requires_hitl,
};
pub use snapshot::{EvaluationSnapshot, SnapshotSource, SnapshotSummary, parse_timestamp};
