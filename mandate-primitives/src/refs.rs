//! Addressing types for governance profiles and evaluated systems.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Address of a governance profile.
///
/// Rendered as `<profile_id>@<version>`, or the bare `<profile_id>` when no
/// version is pinned ("latest" semantics).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ProfileRef {
    profile_id: String,
    version: Option<String>,
}

impl ProfileRef {
    /// Creates a reference to the latest version of a profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfileRef`] when the id is empty.
    pub fn latest(profile_id: impl Into<String>) -> crate::Result<Self> {
        let profile_id = profile_id.into();
        if profile_id.trim().is_empty() {
            return Err(Error::InvalidProfileRef {
                value: profile_id,
                reason: "profile id cannot be empty",
            });
        }
        Ok(Self {
            profile_id,
            version: None,
        })
    }

    /// Creates a reference pinned to a specific profile version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProfileRef`] when the id or version is empty.
    pub fn pinned(profile_id: impl Into<String>, version: impl Into<String>) -> crate::Result<Self> {
        let mut parsed = Self::latest(profile_id)?;
        let version = version.into();
        if version.trim().is_empty() {
            return Err(Error::InvalidProfileRef {
                value: parsed.profile_id,
                reason: "pinned version cannot be empty",
            });
        }
        parsed.version = Some(version);
        Ok(parsed)
    }

    /// Returns the profile identifier component.
    #[must_use]
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Returns the pinned version, or `None` for "latest".
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns `true` when the reference pins a specific version.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.version.is_some()
    }
}

impl Display for ProfileRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{version}", self.profile_id),
            None => f.write_str(&self.profile_id),
        }
    }
}

impl FromStr for ProfileRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((id, version)) => Self::pinned(id, version),
            None => Self::latest(s),
        }
    }
}

impl From<ProfileRef> for String {
    fn from(value: ProfileRef) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ProfileRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Logical identifier of a system under governance (a deployment, service,
/// or agent), supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(String);

impl SystemId {
    /// Creates a system identifier after validating it is not empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSystemId`] when the value is empty or
    /// whitespace-only.
    pub fn new(value: impl Into<String>) -> crate::Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::InvalidSystemId {
                reason: "system id cannot be empty",
            });
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SystemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SystemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_pinned_ref() {
        let parsed: ProfileRef = "iso_42001-global@1.2.0".parse().expect("parse");
        assert_eq!(parsed.profile_id(), "iso_42001-global");
        assert_eq!(parsed.version(), Some("1.2.0"));
        assert_eq!(parsed.to_string(), "iso_42001-global@1.2.0");
    }

    #[test]
    fn bare_ref_means_latest() {
        let parsed: ProfileRef = "baseline".parse().expect("parse");
        assert_eq!(parsed.profile_id(), "baseline");
        assert!(!parsed.is_pinned());
        assert_eq!(parsed.to_string(), "baseline");
    }

    #[test]
    fn empty_components_are_rejected() {
        assert!("".parse::<ProfileRef>().is_err());
        assert!("baseline@".parse::<ProfileRef>().is_err());
        assert!("@1.0.0".parse::<ProfileRef>().is_err());
    }

    #[test]
    fn system_id_rejects_whitespace() {
        assert!(SystemId::new("  ").is_err());
        let id = SystemId::new("projA:chat-001").unwrap();
        assert_eq!(id.as_str(), "projA:chat-001");
    }
}
