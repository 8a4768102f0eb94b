//! core::version
//!
//! Dotted numeric version strings.
//!
//! # Design
//!
//! Release versions are plain dotted numbers (`1.4.2`, `2.0.1.377`). The
//! slot count is not fixed: teams using four-part build numbers and teams
//! using two-part versions both work, so this is deliberately not semver.
//! Comparison pads the shorter version with zeros, making `1.2` equal to
//! `1.2.0`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from version parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("empty version")]
    Empty,

    #[error("version can only contain numbers: {0}")]
    NotNumeric(String),
}

/// A dotted numeric version with an arbitrary number of slots.
///
/// # Example
///
/// ```
/// use relcut::core::version::Version;
///
/// let v: Version = "1.4.2".parse().unwrap();
/// assert_eq!(v.slot_count(), 3);
/// assert_eq!(v.bump(1).to_string(), "1.5.0");
///
/// let padded: Version = "1.4".parse().unwrap();
/// assert!(padded < v);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    slots: Vec<u64>,
}

impl Version {
    /// Parse a version from a dotted numeric string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Empty`] for an empty string and
    /// [`VersionError::NotNumeric`] if any dot-separated part is not a
    /// plain decimal number.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        if text.trim().is_empty() {
            return Err(VersionError::Empty);
        }

        let mut slots = Vec::new();
        for part in text.split('.') {
            let value: u64 = part
                .parse()
                .map_err(|_| VersionError::NotNumeric(text.to_string()))?;
            slots.push(value);
        }

        Ok(Self { slots })
    }

    /// Number of dot-separated slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Return a copy with slot `pos` incremented and every later slot reset
    /// to zero. `pos` past the last slot leaves the version unchanged apart
    /// from the resets, so callers clamp it to `slot_count() - 1`.
    pub fn bump(&self, pos: usize) -> Self {
        let mut slots = self.slots.clone();
        if let Some(slot) = slots.get_mut(pos) {
            *slot += 1;
        }
        for slot in slots.iter_mut().skip(pos + 1) {
            *slot = 0;
        }
        Self { slots }
    }

    /// Slot value at `pos`, treating missing slots as zero.
    fn slot(&self, pos: usize) -> u64 {
        self.slots.get(pos).copied().unwrap_or(0)
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let width = self.slot_count().max(other.slot_count());
        for pos in 0..width {
            match self.slot(pos).cmp(&other.slot(pos)) {
                std::cmp::Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self
            .slots
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn parses_dotted_numbers() {
        assert_eq!(v("1.4.2").slot_count(), 3);
        assert_eq!(v("7").slot_count(), 1);
        assert_eq!(v("2.0.1.377").slot_count(), 4);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Version::parse(""), Err(VersionError::Empty));
        assert_eq!(Version::parse("  "), Err(VersionError::Empty));
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert!(Version::parse("1.2.x").is_err());
        assert!(Version::parse("1..2").is_err());
        assert!(Version::parse("v1.2").is_err());
        assert!(Version::parse("1.-2").is_err());
    }

    #[test]
    fn comparison_pads_with_zeros() {
        assert_eq!(v("1.2"), v("1.2.0"));
        assert!(v("1.2") < v("1.2.1"));
        assert!(v("1.10") > v("1.9.9"));
        assert!(v("2") > v("1.999.999"));
    }

    #[test]
    fn bump_resets_lower_slots() {
        assert_eq!(v("1.4.2").bump(0).to_string(), "2.0.0");
        assert_eq!(v("1.4.2").bump(1).to_string(), "1.5.0");
        assert_eq!(v("1.4.2").bump(2).to_string(), "1.4.3");
    }

    #[test]
    fn bump_is_strictly_greater() {
        let base = v("3.1.4");
        for pos in 0..base.slot_count() {
            assert!(base.bump(pos) > base);
        }
    }

    #[test]
    fn display_roundtrip() {
        for s in ["1.4.2", "0.0.1", "10.20.30.40"] {
            assert_eq!(v(s).to_string(), s);
        }
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&v("1.4.2")).unwrap();
        assert_eq!(json, "\"1.4.2\"");
        let parsed: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, v("1.4.2"));
    }
}
