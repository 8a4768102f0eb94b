//! core::changelog
//!
//! Parses generated changelog files into release notes markdown.
//!
//! # Format
//!
//! Changelog generators drop one JSON file per version under `.changes/` at
//! the repository root:
//!
//! ```json
//! {
//!     "Date": "2026-08-21",
//!     "Entries": [
//!         { "Type": "feature", "Description": "added the thing" }
//!     ]
//! }
//! ```
//!
//! Key casing varies between generator versions, so keys are matched
//! case-insensitively. The rendered `notes.md` is committed alongside the
//! release config on the candidate branch.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Directory at the repository root where changelog files are generated.
const CHANGES_DIR: &str = ".changes";

/// Errors from changelog loading.
#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("failed to read changelog from \".changes\" directory: {path}")]
    NotFound { path: PathBuf },

    #[error("malformed changelog: {0}")]
    Malformed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single changelog entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Entry category, e.g. "feature" or "bugfix".
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description.
    pub description: String,
}

/// The changelog for one version.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Changelog {
    /// Release date as recorded by the generator.
    pub date: String,
    /// Entries in generator order.
    pub entries: Vec<ChangeEntry>,
}

impl Changelog {
    /// Load the changelog for `version` from `<root>/.changes/<version>.json`.
    ///
    /// # Errors
    ///
    /// - [`ChangelogError::NotFound`] if no file exists for the version
    /// - [`ChangelogError::Malformed`] if the JSON does not match the schema
    pub fn load(root: &Path, version: &str) -> Result<Self, ChangelogError> {
        let path = root.join(CHANGES_DIR).join(format!("{version}.json"));
        if !path.is_file() {
            return Err(ChangelogError::NotFound { path });
        }

        let text = std::fs::read_to_string(&path)?;
        Self::parse(&text)
    }

    /// Parse changelog JSON, normalizing key casing first.
    pub fn parse(text: &str) -> Result<Self, ChangelogError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ChangelogError::Malformed(e.to_string()))?;
        let normalized = lowercase_keys(value);
        serde_json::from_value(normalized).map_err(|e| ChangelogError::Malformed(e.to_string()))
    }

    /// Render the notes markdown for a release.
    ///
    /// `body` is the free-form notes entered by the operator; it may be
    /// empty, leaving just the heading and the changelog section.
    pub fn render_notes(&self, version: &str, body: &str) -> String {
        let mut out = format!("## {version} ({})\n{body}\n### Changelog\n", self.date);
        for entry in &self.entries {
            out.push_str(&format!("- **{}** - {}\n", entry.kind, entry.description));
        }
        out
    }
}

/// Lowercase every object key, recursively.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}
