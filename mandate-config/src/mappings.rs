//! Use-case / system-type to profile mapping table.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;

/// Match block of an override entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSpec {
    /// Use case the override applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    /// System type the override applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
}

/// Override entry, matched before the direct lookup tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingOverride {
    /// Conditions the target must satisfy.
    #[serde(default, rename = "match")]
    pub matches: MatchSpec,
    /// Profile reference selected when the conditions match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_ref: Option<String>,
}

/// Target of a direct use-case or system-type lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingTarget {
    /// Profile reference for this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_ref: Option<String>,
}

/// Profile mapping table: overrides first, then use cases, then system types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyMappings {
    /// Override entries, matched in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<MappingOverride>,
    /// Direct use-case lookups.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub use_cases: BTreeMap<String, MappingTarget>,
    /// Direct system-type lookups, consulted as a fallback.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub system_types: BTreeMap<String, MappingTarget>,
}

impl PolicyMappings {
    /// Loads mappings from a YAML file at an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::ConfigError) when the file cannot be
    /// read or parsed.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Loads mappings, falling back to an empty table when the file is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::ConfigError) when the file exists but
    /// cannot be read or parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolves the profile reference for a use case and optional system
    /// type.
    ///
    /// Resolution order: override entries (declaration order) first, then the
    /// use-case table, then the system-type table. An override matches when
    /// its `use_case` equals the queried one and either no system type was
    /// queried or the override's `system_type` equals it.
    #[must_use]
    pub fn resolve(&self, use_case: &str, system_type: Option<&str>) -> Option<&str> {
        for entry in &self.overrides {
            if entry.matches.use_case.as_deref() == Some(use_case)
                && (system_type.is_none()
                    || entry.matches.system_type.as_deref() == system_type)
            {
                return entry.profile_ref.as_deref();
            }
        }

        if let Some(target) = self.use_cases.get(use_case)
            && target.profile_ref.is_some()
        {
            return target.profile_ref.as_deref();
        }

        if let Some(system_type) = system_type
            && let Some(target) = self.system_types.get(system_type)
        {
            return target.profile_ref.as_deref();
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r"
overrides:
  - match:
      use_case: llm_agent_general
      system_type: realtime_api
    profile_ref: strict@2.0.0
use_cases:
  llm_agent_general:
    profile_ref: baseline@1.0.0
system_types:
  batch_pipeline:
    profile_ref: batch@1.0.0
";

    fn table() -> PolicyMappings {
        serde_yaml::from_str(TABLE).unwrap()
    }

    #[test]
    fn overrides_win_over_direct_lookups() {
        let mappings = table();
        assert_eq!(
            mappings.resolve("llm_agent_general", Some("realtime_api")),
            Some("strict@2.0.0")
        );
    }

    #[test]
    fn use_case_lookup_applies_when_no_override_matches() {
        let mappings = table();
        assert_eq!(
            mappings.resolve("llm_agent_general", Some("batch_pipeline")),
            Some("baseline@1.0.0")
        );
    }

    #[test]
    fn system_type_is_the_final_fallback() {
        let mappings = table();
        assert_eq!(
            mappings.resolve("unmapped_use_case", Some("batch_pipeline")),
            Some("batch@1.0.0")
        );
        assert_eq!(mappings.resolve("unmapped_use_case", None), None);
    }

    #[test]
    fn querying_without_system_type_matches_any_override_for_the_use_case() {
        let mappings = table();
        assert_eq!(
            mappings.resolve("llm_agent_general", None),
            Some("strict@2.0.0")
        );
    }
}
