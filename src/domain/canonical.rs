//! Canonical URL newtype
//!
//! A canonical is a knowledge artifact's url, optionally pinned to a business
//! version with a `|` separator: `http://example.org/ValueSet/abc|1.0.0`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical reference newtype wrapper
///
/// # Examples
///
/// ```
/// use ersd_import::domain::canonical::Canonical;
///
/// let canonical = Canonical::from_parts("http://example.org/ValueSet/abc", Some("1.0.0")).unwrap();
/// assert_eq!(canonical.as_str(), "http://example.org/ValueSet/abc|1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Canonical(String);

impl Canonical {
    /// Creates a new Canonical from a string
    ///
    /// Returns `Err` if the string is empty or starts with the version separator.
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Canonical cannot be empty".to_string());
        }
        if value.starts_with('|') {
            return Err(format!("Canonical has no url part: {value}"));
        }
        Ok(Self(value))
    }

    /// Builds a canonical from a url and an optional version
    ///
    /// Blank versions are ignored.
    pub fn from_parts(url: &str, version: Option<&str>) -> Result<Self, String> {
        match version.map(str::trim).filter(|v| !v.is_empty()) {
            Some(version) => Self::new(format!("{url}|{version}")),
            None => Self::new(url),
        }
    }

    /// Returns the canonical as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Removes a `|version` suffix from a canonical string
pub fn strip_version(canonical: &str) -> &str {
    canonical
        .split_once('|')
        .map(|(url, _)| url)
        .unwrap_or(canonical)
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Canonical {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Canonical {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_rejects_empty() {
        assert!(Canonical::new("").is_err());
        assert!(Canonical::new("   ").is_err());
        assert!(Canonical::new("|1.0").is_err());
    }

    #[test]
    fn test_from_parts_without_version() {
        let canonical = Canonical::from_parts("http://example.org/Library/rctc", None).unwrap();
        assert_eq!(canonical.as_str(), "http://example.org/Library/rctc");

        let blank = Canonical::from_parts("http://example.org/Library/rctc", Some(" ")).unwrap();
        assert_eq!(blank.as_str(), "http://example.org/Library/rctc");
    }

    #[test]
    fn test_from_str_keeps_version() {
        let canonical = Canonical::from_str("http://example.org/ValueSet/vs|2024-01-01").unwrap();
        assert_eq!(canonical.to_string(), "http://example.org/ValueSet/vs|2024-01-01");
        assert_eq!(strip_version(canonical.as_str()), "http://example.org/ValueSet/vs");
    }

    #[test]
    fn test_strip_version() {
        assert_eq!(strip_version("a|b"), "a");
        assert_eq!(strip_version("a"), "a");
    }
}
