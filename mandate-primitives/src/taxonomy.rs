//! Severity and status taxonomy shared by the engine and the planners.
//!
//! Free-text inputs from stored documents are folded into these enums by the
//! `normalize` constructors. The default-on-unknown policy is fixed and applies
//! at every call site: unrecognized severity becomes [`Severity::Medium`];
//! unrecognized status becomes [`FindingStatus::Warn`] inside the engine and
//! [`Status::Unknown`] at triage time.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Severity attached to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational or cosmetic issue.
    Low,
    /// Issue worth tracking; no immediate exposure.
    Medium,
    /// Significant exposure requiring prompt attention.
    High,
    /// Must be addressed immediately.
    Critical,
}

impl Severity {
    /// Folds a free-text severity into the canonical enum.
    ///
    /// Matching is case-insensitive and whitespace-trimmed; anything
    /// unrecognized (including `None`) maps to [`Severity::Medium`].
    #[must_use]
    pub fn normalize(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("low") => Self::Low,
            Some("high") => Self::High,
            Some("critical") => Self::Critical,
            _ => Self::Medium,
        }
    }

    /// Triage priority rank: 0 is most urgent.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Returns `true` for the severities that escalate recommended actions.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome status of a single rule evaluation.
///
/// The engine only ever emits these three values; stored documents with other
/// status strings are handled by the triage-side [`Status`] alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    /// The control is satisfied.
    Pass,
    /// The control is partially satisfied or degraded.
    Warn,
    /// The control is violated.
    Fail,
}

impl FindingStatus {
    /// Folds a free-text status into the engine alphabet.
    ///
    /// Unrecognized input (including `None`) maps to [`FindingStatus::Warn`].
    #[must_use]
    pub fn normalize(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("pass") => Self::Pass,
            Some("fail") => Self::Fail,
            _ => Self::Warn,
        }
    }

    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

impl Display for FindingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage-side status alphabet, extending [`FindingStatus`] with `Unknown`
/// for documents whose status cannot be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The control is satisfied.
    Pass,
    /// The control is partially satisfied or degraded.
    Warn,
    /// The control is violated.
    Fail,
    /// Status could not be recognized; requires manual review.
    Unknown,
}

impl Status {
    /// Folds a free-text status into the triage alphabet.
    ///
    /// Unrecognized input (including `None`) maps to [`Status::Unknown`].
    #[must_use]
    pub fn normalize(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("pass") => Self::Pass,
            Some("warn") => Self::Warn,
            Some("fail") => Self::Fail,
            _ => Self::Unknown,
        }
    }

    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FindingStatus> for Status {
    fn from(value: FindingStatus) -> Self {
        match value {
            FindingStatus::Pass => Self::Pass,
            FindingStatus::Warn => Self::Warn,
            FindingStatus::Fail => Self::Fail,
        }
    }
}

/// Coarse verdict summarizing all findings of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every finding passed (or no findings were produced).
    Pass,
    /// At least one warning, no failures.
    Warn,
    /// At least one failure.
    Fail,
}

impl Verdict {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
