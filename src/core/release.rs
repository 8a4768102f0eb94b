//! core::release
//!
//! Release configuration: the recorded state of the previous release and
//! the pre-flight validation run before a new candidate is cut.
//!
//! # File format
//!
//! The config is a small JSON file, committed to the repository and updated
//! on every cut:
//!
//! ```json
//! {
//!     "version": "1.4.2",
//!     "commit": "abc123def4567890abc123def4567890abc12345",
//!     "notes": "..."
//! }
//! ```
//!
//! # Validation
//!
//! Before anything is prompted or pushed, the recorded state must be
//! consistent with the fetched branch tips:
//!
//! 1. the release branch tip is reachable from the development tip, and
//! 2. the recorded release commit is reachable from the release branch tip.
//!
//! Both checks go through the [`AncestryOracle`], which also warms its cache
//! for the selection-list query that follows.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ancestry::{AncestryOracle, CommitGraph, GraphError};
use super::types::Oid;
use super::version::Version;

/// Errors from loading, validating, or storing a release config.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The config file was not found where expected.
    #[error("unable to locate release config at {0}")]
    NotFound(PathBuf),

    /// The config file exists but could not be parsed.
    #[error("failed to read release configuration: {0}")]
    Malformed(String),

    /// The recorded commit does not exist in the repository.
    #[error("bad commit in config: {0} (does it exist on the development branch?)")]
    BadCommit(String),

    /// The release branch has diverged from development.
    #[error("release branch is not reachable from development")]
    ReleaseBranchNotReachable,

    /// The recorded release commit is not on the release branch.
    #[error("last release commit is not reachable from the release branch")]
    LastReleaseNotReachable,

    /// Underlying graph failure during validation.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialized shape of the config file.
#[derive(Debug, Serialize, Deserialize)]
struct ReleaseConfigFile {
    version: Version,
    commit: Oid,
    notes: String,
}

/// The release configuration, tied to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Version of the previous release.
    pub version: Version,
    /// Commit the previous release was cut from.
    pub commit: Oid,
    /// Notes recorded for the previous release.
    pub notes: String,
    /// Where the config was found; updates are written back here.
    path: PathBuf,
}

impl ReleaseConfig {
    /// Load a release config from `path`.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::NotFound`] if the file does not exist
    /// - [`ReleaseError::Malformed`] if it is not valid config JSON
    pub fn load(path: &Path) -> Result<Self, ReleaseError> {
        if !path.is_file() {
            return Err(ReleaseError::NotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        let file: ReleaseConfigFile =
            serde_json::from_str(&text).map_err(|e| ReleaseError::Malformed(e.to_string()))?;

        Ok(Self {
            version: file.version,
            commit: file.commit,
            notes: file.notes,
            path: path.to_path_buf(),
        })
    }

    /// Write the config back to where it was loaded from, pretty-printed.
    ///
    /// Returns the path written, so callers can stage it.
    pub fn store(&self) -> Result<&Path, ReleaseError> {
        let file = ReleaseConfigFile {
            version: self.version.clone(),
            commit: self.commit.clone(),
            notes: self.notes.clone(),
        };
        let text = serde_json::to_string_pretty(&file)
            .map_err(|e| ReleaseError::Malformed(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        Ok(&self.path)
    }

    /// The file this config lives in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate recorded state against the fetched branch tips.
    ///
    /// `development` is the fetched development tip, `release` the fetched
    /// release branch tip. Ordering violations are typed errors so the CLI
    /// can report exactly which invariant failed.
    pub fn pre_validate<G: CommitGraph>(
        &self,
        oracle: &mut AncestryOracle<G>,
        development: &Oid,
        release: &Oid,
    ) -> Result<(), ReleaseError> {
        if !oracle.is_ancestor(release, development)? {
            return Err(ReleaseError::ReleaseBranchNotReachable);
        }

        if !oracle.is_ancestor(&self.commit, release)? {
            return Err(ReleaseError::LastReleaseNotReachable);
        }

        Ok(())
    }
}

impl std::fmt::Display for ReleaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Version: {}", self.version)?;
        write!(f, "Commit:  {}", self.commit)?;
        if !self.notes.is_empty() {
            write!(f, "\nNotes:\n{}", self.notes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapGraph(HashMap<Oid, Vec<Oid>>);

    impl CommitGraph for MapGraph {
        fn parents_of(&self, id: &Oid) -> Result<Vec<Oid>, GraphError> {
            self.0
                .get(id)
                .cloned()
                .ok_or_else(|| GraphError::UnknownCommit(id.to_string()))
        }
    }

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    fn config_at(dir: &Path, version: &str, commit: &Oid) -> PathBuf {
        let path = dir.join("config.json");
        let json = serde_json::json!({
            "version": version,
            "commit": commit.as_str(),
            "notes": "previous notes",
        });
        std::fs::write(&path, json.to_string()).unwrap();
        path
    }

    #[test]
    fn load_and_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let commit = oid('a');
        let path = config_at(dir.path(), "1.2.3", &commit);

        let mut config = ReleaseConfig::load(&path).unwrap();
        assert_eq!(config.version.to_string(), "1.2.3");
        assert_eq!(config.commit, commit);
        assert_eq!(config.notes, "previous notes");

        config.version = Version::parse("1.3.0").unwrap();
        config.notes = String::new();
        config.store().unwrap();

        let reloaded = ReleaseConfig::load(&path).unwrap();
        assert_eq!(reloaded.version.to_string(), "1.3.0");
        assert!(reloaded.notes.is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReleaseConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ReleaseError::NotFound(_)));
    }

    #[test]
    fn malformed_json_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ReleaseConfig::load(&path).unwrap_err();
        assert!(matches!(err, ReleaseError::Malformed(_)));
    }

    #[test]
    fn bad_commit_hash_rejected_at_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"version": "1.0", "commit": "not-a-sha", "notes": ""}"#,
        )
        .unwrap();

        let err = ReleaseConfig::load(&path).unwrap_err();
        assert!(matches!(err, ReleaseError::Malformed(_)));
    }

    #[test]
    fn pre_validate_accepts_ordered_history() {
        // last <- release_tip <- dev_tip
        let (last, release_tip, dev_tip) = (oid('a'), oid('b'), oid('c'));
        let graph = MapGraph(HashMap::from([
            (last.clone(), vec![]),
            (release_tip.clone(), vec![last.clone()]),
            (dev_tip.clone(), vec![release_tip.clone()]),
        ]));
        let mut oracle = AncestryOracle::new(graph);

        let dir = tempfile::tempdir().unwrap();
        let config = ReleaseConfig::load(&config_at(dir.path(), "1.0", &last)).unwrap();

        config
            .pre_validate(&mut oracle, &dev_tip, &release_tip)
            .unwrap();
    }

    #[test]
    fn pre_validate_rejects_diverged_release_branch() {
        // release_tip is not behind dev_tip
        let (root, release_tip, dev_tip) = (oid('a'), oid('b'), oid('c'));
        let graph = MapGraph(HashMap::from([
            (root.clone(), vec![]),
            (release_tip.clone(), vec![root.clone()]),
            (dev_tip.clone(), vec![root.clone()]),
        ]));
        let mut oracle = AncestryOracle::new(graph);

        let dir = tempfile::tempdir().unwrap();
        let config = ReleaseConfig::load(&config_at(dir.path(), "1.0", &root)).unwrap();

        let err = config
            .pre_validate(&mut oracle, &dev_tip, &release_tip)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::ReleaseBranchNotReachable));
    }

    #[test]
    fn pre_validate_rejects_stray_release_commit() {
        // recorded commit sits on a side branch, not on the release branch
        let (root, stray, release_tip, dev_tip) = (oid('a'), oid('e'), oid('b'), oid('c'));
        let graph = MapGraph(HashMap::from([
            (root.clone(), vec![]),
            (stray.clone(), vec![root.clone()]),
            (release_tip.clone(), vec![root.clone()]),
            (dev_tip.clone(), vec![release_tip.clone()]),
        ]));
        let mut oracle = AncestryOracle::new(graph);

        let dir = tempfile::tempdir().unwrap();
        let config = ReleaseConfig::load(&config_at(dir.path(), "1.0", &stray)).unwrap();

        let err = config
            .pre_validate(&mut oracle, &dev_tip, &release_tip)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::LastReleaseNotReachable));
    }
}
