//! Global engine settings.
//!
//! Settings are loaded once by the embedding process and passed explicitly
//! into planner calls; nothing in the workspace reads the process
//! environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;

/// Default profile selection used when neither a target override nor a
/// mapping entry applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    /// Global default profile reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_ref: Option<String>,
}

/// Thresholds consumed by the monitoring cadence planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSettings {
    /// Maximum acceptable age of the last evaluation, in days.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: f64,
    /// Verdicts that always trigger re-evaluation (matched
    /// case-insensitively).
    #[serde(default = "default_rerun_on_verdict")]
    pub rerun_on_verdict: Vec<String>,
    /// Whether a `warn` verdict triggers re-evaluation.
    #[serde(default = "default_true")]
    pub rerun_on_warn: bool,
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self {
            max_age_days: default_max_age_days(),
            rerun_on_verdict: default_rerun_on_verdict(),
            rerun_on_warn: true,
        }
    }
}

/// Escalation flags consumed by the remediation triage planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationSettings {
    /// Escalate failing findings to human review.
    #[serde(default = "default_true")]
    pub hitl_on_fail: bool,
    /// Escalate warning findings to human review.
    #[serde(default)]
    pub hitl_on_warn: bool,
}

impl Default for EscalationSettings {
    fn default() -> Self {
        Self {
            hitl_on_fail: true,
            hitl_on_warn: false,
        }
    }
}

/// Process-wide configuration, read-only at evaluation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Default profile selection.
    #[serde(default)]
    pub defaults: Defaults,
    /// Monitoring thresholds.
    #[serde(default)]
    pub monitoring: MonitoringSettings,
    /// Escalation flags.
    #[serde(default)]
    pub engine: EscalationSettings,
}

impl Settings {
    /// Loads settings from a YAML file at an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`](crate::ConfigError) when the file cannot be
    /// read or parsed.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Loads settings, falling back to defaults when the file is absent.
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
}

fn default_max_age_days() -> f64 {
    7.0
}

fn default_rerun_on_verdict() -> Vec<String> {
    vec!["fail".to_owned()]
}

fn default_true() -> bool {
    true
}
