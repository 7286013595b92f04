//! Profile document schema and structural validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EngineError, EngineResult};

/// Reference to a rule inside a profile, by id with optional params/weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRef {
    /// Rule identifier, unique within the owning profile.
    pub id: String,
    /// Relative weight reserved for weighted scoring. Currently informational;
    /// aggregation must not consume it.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Free-form parameters merged with executor defaults before evaluation.
    #[serde(default)]
    pub params: Map<String, Value>,
}

fn default_weight() -> f64 {
    1.0
}

/// Informational metadata block for a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Standards the profile maps to (e.g. `ISO 42001`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standards: Vec<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Owning teams or individuals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
}

/// A governance profile document.
///
/// `profile_id` and `version` together uniquely address one document; the
/// store keeps at most one document per id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyProfile {
    /// Stable profile identifier.
    pub profile_id: String,
    /// Version string, semantic or free-form.
    pub version: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Informational metadata.
    #[serde(default)]
    pub metadata: ProfileMetadata,
    /// Rules in declaration order. Order is preserved through evaluation but
    /// does not affect the aggregate verdict.
    #[serde(default)]
    pub rules: Vec<RuleRef>,
    /// Free-form configuration overrides.
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl PolicyProfile {
    /// Schema-level checks applied after deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ProfileValidation`] when a rule weight is
    /// negative or a rule id is duplicated.
    pub fn validate(&self) -> EngineResult<()> {
        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            if rule.weight < 0.0 {
                return Err(EngineError::validation(
                    Some(&self.profile_id),
                    format!("rule `{}` has negative weight {}", rule.id, rule.weight),
                ));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(EngineError::validation(
                    Some(&self.profile_id),
                    format!("duplicate rule id `{}`", rule.id),
                ));
            }
        }
        Ok(())
    }
}

/// Structural validation applied to a raw document before schema binding.
///
/// Enforces the presence of `profile_id` and `version` and that `rules`, if
/// present, is a sequence. Severity/status values are deliberately not
/// validated here; normalization happens when findings are produced.
///
/// # Errors
///
/// Returns [`EngineError::ProfileValidation`] on any violation, carrying the
/// document's profile id when one can be read.
pub fn validate_document(doc: &serde_yaml::Value) -> EngineResult<()> {
    if !doc.is_mapping() {
        return Err(EngineError::validation(
            None,
            "profile document root must be a mapping",
        ));
    }

    let profile_id = doc.get("profile_id").and_then(serde_yaml::Value::as_str);
    if profile_id.is_none() {
        return Err(EngineError::validation(
            None,
            "missing required field: profile_id",
        ));
    }
    if doc.get("version").is_none() {
        return Err(EngineError::validation(
            profile_id,
            "missing required field: version",
        ));
    }

    if let Some(rules) = doc.get("rules")
        && !rules.is_sequence()
        && !rules.is_null()
    {
        return Err(EngineError::validation(
            profile_id,
            "field `rules` must be a sequence if present",
        ));
    }

    Ok(())
}

/// Parses and validates a profile document from YAML text.
///
/// Runs structural validation first, then schema binding, then schema-level
/// checks.
///
/// # Errors
///
/// Returns [`EngineError::ProfileValidation`] for structural violations and
/// [`EngineError::Yaml`] when the text is not valid YAML or does not bind to
/// the profile shape.
pub fn parse_profile(text: &str) -> EngineResult<PolicyProfile> {
    let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
    validate_document(&doc)?;
    let profile: PolicyProfile = serde_yaml::from_value(doc)?;
    profile.validate()?;
    Ok(profile)
}
