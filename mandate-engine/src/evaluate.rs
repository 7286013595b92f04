//! Evaluation entrypoint tying the registry, executor, and aggregator
//! together.

use std::sync::Arc;

use mandate_primitives::ProfileRef;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::executor::run_rules;
use crate::report::{EvalRequest, EvalResponse, Summary};
use crate::rules::RuleRegistry;
use crate::store::ProfileStore;
use crate::verdict::aggregate;

/// Single-pass, stateless evaluation function over a profile store and a
/// rule registry.
pub struct Evaluator {
    store: Arc<dyn ProfileStore>,
    registry: RuleRegistry,
}

impl Evaluator {
    /// Creates an evaluator with the default rule registry.
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            registry: RuleRegistry::new(),
        }
    }

    /// Creates an evaluator with a caller-assembled rule registry.
    #[must_use]
    pub fn with_registry(store: Arc<dyn ProfileStore>, registry: RuleRegistry) -> Self {
        Self { store, registry }
    }

    /// Evaluates the referenced profile against the request's context and
    /// evidence.
    ///
    /// Identical requests always yield identical responses. Per-rule failures
    /// surface as synthetic failing findings, never as errors.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ProfileNotFound`] / [`EngineError::VersionMismatch`]
    /// when the reference cannot be resolved and
    /// [`EngineError::ProfileValidation`] when the stored document is invalid.
    pub fn evaluate(&self, request: &EvalRequest) -> EngineResult<EvalResponse> {
        let profile_ref: ProfileRef =
            request
                .profile_ref
                .parse()
                .map_err(|_| EngineError::ProfileNotFound {
                    profile_ref: request.profile_ref.clone(),
                })?;

        let profile = self.store.resolve(&profile_ref)?;
        let findings = run_rules(&profile, &self.registry, &request.context, &request.evidence);
        let (score, verdict) = aggregate(&findings);

        debug!(
            profile_id = %profile.profile_id,
            version = %profile.version,
            finding_count = findings.len(),
            verdict = %verdict,
            "evaluation complete"
        );

        Ok(EvalResponse {
            profile_ref: request.profile_ref.clone(),
            profile_id: profile.profile_id.clone(),
            version: profile.version.clone(),
            summary: Summary {
                verdict,
                score,
                finding_count: findings.len(),
                profile_ref: request.profile_ref.clone(),
                profile_id: Some(profile.profile_id),
            },
            findings,
        })
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
