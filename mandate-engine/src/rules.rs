//! Rule contract and the registry of rule implementations.
//!
//! Rule logic is pluggable: the executor fixes the contract (inputs to an
//! optional finding draft) and the params/defaults merge policy, while the
//! registry decides which implementation answers for a given rule id.

use std::collections::BTreeMap;
use std::sync::Arc;

use mandate_primitives::{FindingStatus, Severity};
use serde_json::{Map, Value};

use crate::error::EngineResult;

/// Immutable view handed to a rule for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    rule_id: &'a str,
    params: &'a Map<String, Value>,
    context: &'a Map<String, Value>,
    evidence: &'a Map<String, Value>,
}

impl<'a> RuleContext<'a> {
    /// Creates a rule context over the supplied maps.
    #[must_use]
    pub fn new(
        rule_id: &'a str,
        params: &'a Map<String, Value>,
        context: &'a Map<String, Value>,
        evidence: &'a Map<String, Value>,
    ) -> Self {
        Self {
            rule_id,
            params,
            context,
            evidence,
        }
    }

    /// Returns the id of the rule being evaluated.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        self.rule_id
    }

    /// Returns the merged rule parameters.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        self.params
    }

    /// Returns the system-level context.
    #[must_use]
    pub fn context(&self) -> &Map<String, Value> {
        self.context
    }

    /// Returns the evidence bundle.
    #[must_use]
    pub fn evidence(&self) -> &Map<String, Value> {
        self.evidence
    }

    /// Convenience accessor for a string-valued context key.
    #[must_use]
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }
}

/// Partial finding produced by a rule.
///
/// The executor completes the draft with the rule id, the title and severity
/// from the merged params, and normalization.
#[derive(Debug, Clone)]
pub struct FindingDraft {
    /// Evaluation outcome.
    pub status: FindingStatus,
    /// Human-readable narrative.
    pub message: String,
    /// Free-form diagnostic payload.
    pub data: Map<String, Value>,
    /// Optional severity override; `None` defers to the merged params.
    pub severity: Option<Severity>,
}

impl FindingDraft {
    /// Creates a draft with the given status and message.
    #[must_use]
    pub fn new(status: FindingStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: Map::new(),
            severity: None,
        }
    }

    /// Attaches a diagnostic entry to the draft.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

/// Trait implemented by rule bodies.
///
/// Evaluation must be pure with respect to the supplied context: identical
/// inputs always yield identical drafts. Returning `Ok(None)` means the rule
/// is inapplicable and produces no finding.
pub trait Rule: Send + Sync {
    /// Evaluates the rule against the supplied context and evidence.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RuleEvaluation`](crate::EngineError::RuleEvaluation)
    /// when the rule cannot execute; the executor converts the error into a
    /// synthetic failing finding rather than aborting the run.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> EngineResult<Option<FindingDraft>>;
}

/// Maps rule ids to implementations, with a fallback for unregistered ids.
pub struct RuleRegistry {
    rules: BTreeMap<String, Arc<dyn Rule>>,
    fallback: Arc<dyn Rule>,
}

impl RuleRegistry {
    /// Creates a registry with [`SystemNameRule`] as the fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback(Arc::new(SystemNameRule))
    }

    /// Creates a registry with the supplied fallback rule.
    #[must_use]
    pub fn with_fallback(fallback: Arc<dyn Rule>) -> Self {
        Self {
            rules: BTreeMap::new(),
            fallback,
        }
    }

    /// Registers an implementation for a rule id, replacing any existing one.
    pub fn register(&mut self, rule_id: impl Into<String>, rule: Arc<dyn Rule>) {
        self.rules.insert(rule_id.into(), rule);
    }

    /// Returns the implementation answering for the given rule id.
    #[must_use]
    pub fn resolve(&self, rule_id: &str) -> &Arc<dyn Rule> {
        self.rules.get(rule_id).unwrap_or(&self.fallback)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Baseline heuristic rule: passes for systems whose name marks them as demo
/// targets, warns otherwise.
#[derive(Debug, Clone, Copy)]
pub struct SystemNameRule;

impl Rule for SystemNameRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> EngineResult<Option<FindingDraft>> {
        let system_name = ctx
            .context_str("system_name")
            .or_else(|| ctx.context_str("system_id"))
            .unwrap_or("unknown-system");

        let draft = if system_name.to_lowercase().contains("demo") {
            FindingDraft::new(
                FindingStatus::Pass,
                format!(
                    "Rule {} passed for system '{system_name}'.",
                    ctx.rule_id()
                ),
            )
        } else {
            FindingDraft::new(
                FindingStatus::Warn,
                format!(
                    "Rule {} produced a warning for system '{system_name}'.",
                    ctx.rule_id()
                ),
            )
        };

        Ok(Some(
            draft
                .with_data("system", Value::from(system_name))
                .with_data("params", Value::Object(ctx.params().clone())),
        ))
    }
}

/// Checks that the evidence bundle contains every key named by the rule's
/// `required` param. Inapplicable (no finding) when the param is absent or
/// empty.
#[derive(Debug, Clone, Copy)]
pub struct RequiredEvidenceRule;

impl Rule for RequiredEvidenceRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> EngineResult<Option<FindingDraft>> {
        let required: Vec<&str> = ctx
            .params()
            .get("required")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        if required.is_empty() {
            return Ok(None);
        }

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|key| !ctx.evidence().contains_key(*key))
            .collect();

        let draft = if missing.is_empty() {
            FindingDraft::new(
                FindingStatus::Pass,
                format!("All required evidence present for rule {}.", ctx.rule_id()),
            )
        } else {
            FindingDraft::new(
                FindingStatus::Fail,
                format!(
                    "Missing required evidence for rule {}: {}.",
                    ctx.rule_id(),
                    missing.join(", ")
                ),
            )
            .with_data(
                "missing",
                Value::from(missing.iter().map(ToString::to_string).collect::<Vec<_>>()),
            )
        };

        Ok(Some(draft.with_data(
            "required",
            Value::from(required.iter().map(ToString::to_string).collect::<Vec<_>>()),
        )))
    }
}
