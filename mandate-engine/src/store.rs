//! Profile registry backends.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use mandate_primitives::ProfileRef;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::schema::{PolicyProfile, parse_profile};

/// Trait implemented by profile registries.
///
/// Bare references ("latest") resolve whenever the profile id exists; pinned
/// references additionally require the stored document's version to match.
pub trait ProfileStore: Send + Sync {
    /// Resolves a profile reference to a validated profile document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ProfileNotFound`] when no document exists for
    /// the id, [`EngineError::VersionMismatch`] when a pinned version differs
    /// from the stored document, and [`EngineError::ProfileValidation`] when
    /// the document fails validation.
    fn resolve(&self, profile_ref: &ProfileRef) -> EngineResult<PolicyProfile>;
}

fn check_version(profile: PolicyProfile, profile_ref: &ProfileRef) -> EngineResult<PolicyProfile> {
    match profile_ref.version() {
        Some(requested) if requested != profile.version => Err(EngineError::VersionMismatch {
            profile_ref: profile_ref.to_string(),
            stored_version: profile.version,
        }),
        _ => Ok(profile),
    }
}

/// Registry backed by a directory of YAML documents, one per profile id.
///
/// `<dir>/<profile_id>.yaml` is the only layout; there is no multi-version
/// store per id.
#[derive(Debug)]
pub struct DirProfileStore {
    dir: PathBuf,
}

impl DirProfileStore {
    /// Creates a store rooted at the supplied directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory this store reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ProfileStore for DirProfileStore {
    fn resolve(&self, profile_ref: &ProfileRef) -> EngineResult<PolicyProfile> {
        let path = self.dir.join(format!("{}.yaml", profile_ref.profile_id()));
        if !path.exists() {
            return Err(EngineError::ProfileNotFound {
                profile_ref: profile_ref.to_string(),
            });
        }

        let text = std::fs::read_to_string(&path)?;
        let profile = parse_profile(&text)?;
        debug!(
            profile_id = %profile.profile_id,
            version = %profile.version,
            path = %path.display(),
            "profile document loaded"
        );
        check_version(profile, profile_ref)
    }
}

/// In-memory registry for tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<BTreeMap<String, PolicyProfile>>,
}

impl MemoryProfileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile, replacing any existing document with the same id.
    ///
    /// # Panics
    ///
    /// Panics if the internal profile map lock has been poisoned.
    pub fn insert(&self, profile: PolicyProfile) {
        let mut guard = self.profiles.write().expect("profile store poisoned");
        guard.insert(profile.profile_id.clone(), profile);
    }
}

impl ProfileStore for MemoryProfileStore {
    fn resolve(&self, profile_ref: &ProfileRef) -> EngineResult<PolicyProfile> {
        let guard = self.profiles.read().expect("profile store poisoned");
        let profile = guard
            .get(profile_ref.profile_id())
            .cloned()
            .ok_or_else(|| EngineError::ProfileNotFound {
                profile_ref: profile_ref.to_string(),
            })?;
        check_version(profile, profile_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, version: &str) -> PolicyProfile {
        parse_profile(&format!("profile_id: {id}\nversion: '{version}'\n")).unwrap()
    }

    #[test]
    fn memory_store_resolves_latest_regardless_of_version() {
        let store = MemoryProfileStore::new();
        store.insert(profile("baseline", "3.1.0"));

        let resolved = store.resolve(&"baseline".parse().unwrap()).unwrap();
        assert_eq!(resolved.version, "3.1.0");
    }

    #[test]
    fn pinned_version_must_match_stored_document() {
        let store = MemoryProfileStore::new();
        store.insert(profile("baseline", "1.0.0"));

        let resolved = store.resolve(&"baseline@1.0.0".parse().unwrap()).unwrap();
        assert_eq!(resolved.profile_id, "baseline");

        let err = store
            .resolve(&"baseline@2.0.0".parse().unwrap())
            .expect_err("mismatch must fail");
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = MemoryProfileStore::new();
        let err = store.resolve(&"ghost".parse().unwrap()).expect_err("nf");
        assert!(matches!(err, EngineError::ProfileNotFound { .. }));
    }

    #[test]
    fn dir_store_reads_yaml_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("baseline.yaml"),
            "profile_id: baseline\nversion: 2.0.0\nrules:\n  - id: check_logging\n",
        )
        .unwrap();

        let store = DirProfileStore::new(dir.path());
        let resolved = store.resolve(&"baseline@2.0.0".parse().unwrap()).unwrap();
        assert_eq!(resolved.rules.len(), 1);

        let err = store.resolve(&"missing".parse().unwrap()).expect_err("nf");
        assert!(matches!(err, EngineError::ProfileNotFound { .. }));
    }
}
