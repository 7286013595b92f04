//! Wire-level request and response shapes for evaluation calls.

use mandate_primitives::{FindingStatus, Severity, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Evaluation request payload, transport-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRequest {
    /// Profile reference, e.g. `iso_42001-global@1.2.0`.
    pub profile_ref: String,
    /// System-level context (system id, owner, environment, ...).
    #[serde(default)]
    pub context: Map<String, Value>,
    /// Evidence bundle (model cards, logs, configs, ...).
    #[serde(default)]
    pub evidence: Map<String, Value>,
}

impl EvalRequest {
    /// Creates a request with empty context and evidence.
    #[must_use]
    pub fn new(profile_ref: impl Into<String>) -> Self {
        Self {
            profile_ref: profile_ref.into(),
            context: Map::new(),
            evidence: Map::new(),
        }
    }

    /// Adds a context entry and returns the updated request.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Adds an evidence entry and returns the updated request.
    #[must_use]
    pub fn with_evidence(mut self, key: impl Into<String>, value: Value) -> Self {
        self.evidence.insert(key.into(), value);
        self
    }
}

/// One rule's evaluation outcome. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Mirrors the id of the rule that produced it.
    pub id: String,
    /// Display title, defaulted to `Rule <id>` when the rule declares none.
    pub title: String,
    /// Normalized severity.
    pub severity: Severity,
    /// Evaluation status.
    pub status: FindingStatus,
    /// Human-readable narrative.
    pub message: String,
    /// Free-form diagnostic payload.
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Summary block for one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Overall verdict.
    pub verdict: Verdict,
    /// Normalized score in `[0, 1]`.
    pub score: f64,
    /// Number of findings produced.
    pub finding_count: usize,
    /// Echo of the requested profile reference.
    pub profile_ref: String,
    /// Resolved profile id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

/// Full evaluation response. Created once per evaluation call; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalResponse {
    /// Echo of the requested profile reference.
    pub profile_ref: String,
    /// Resolved profile id.
    pub profile_id: String,
    /// Resolved profile version.
    pub version: String,
    /// Aggregate summary.
    pub summary: Summary,
    /// Findings in rule declaration order.
    #[serde(default)]
    pub findings: Vec<Finding>,
}
