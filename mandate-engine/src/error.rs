//! Error taxonomy for profile resolution and evaluation.

use thiserror::Error;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the evaluation pipeline.
///
/// Profile resolution and validation errors are caller-actionable and
/// propagate unmodified. Per-rule failures never surface here; the executor
/// absorbs them into synthetic failing findings.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No profile document exists for the requested reference.
    #[error("profile not found: {profile_ref}")]
    ProfileNotFound {
        /// The reference that failed to resolve.
        profile_ref: String,
    },

    /// A pinned version was requested but the stored document carries a
    /// different version string.
    #[error(
        "profile not found: {profile_ref} (stored document has version {stored_version})"
    )]
    VersionMismatch {
        /// The reference that failed to resolve.
        profile_ref: String,
        /// Version carried by the stored document.
        stored_version: String,
    },

    /// Profile document failed structural or schema validation.
    #[error("profile validation failed{}: {message}", fmt_profile_id(.profile_id))]
    ProfileValidation {
        /// Identifier of the offending profile, when known.
        profile_id: Option<String>,
        /// Human-readable description of the violation.
        message: String,
    },

    /// A specific rule failed to execute.
    ///
    /// Constructed by rule implementations; the executor converts it into a
    /// synthetic failing finding instead of propagating.
    #[error("rule `{rule_id}` evaluation error: {message}")]
    RuleEvaluation {
        /// Identifier of the failing rule.
        rule_id: String,
        /// Human-readable failure detail.
        message: String,
    },

    /// Catch-all for unexpected failures during profile load.
    #[error("evaluation error: {message}")]
    Evaluation {
        /// Human-readable failure detail.
        message: String,
    },

    /// I/O failure while reading a profile document.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },

    /// Profile document could not be parsed as YAML.
    #[error("profile parse error: {source}")]
    Yaml {
        /// Source [`serde_yaml::Error`].
        #[from]
        source: serde_yaml::Error,
    },
}

impl EngineError {
    /// Helper to construct validation errors from string-like values.
    #[must_use]
    pub fn validation(profile_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::ProfileValidation {
            profile_id: profile_id.map(str::to_owned),
            message: message.into(),
        }
    }

    /// Returns `true` when the error should surface as "not found" to
    /// transport layers.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound { .. } | Self::VersionMismatch { .. }
        )
    }
}

fn fmt_profile_id(profile_id: &Option<String>) -> String {
    profile_id
        .as_deref()
        .map(|id| format!(" [{id}]"))
        .unwrap_or_default()
}
