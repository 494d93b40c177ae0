//! Admin API version handling.
//!
//! Shopify releases API versions quarterly, named `YYYY-MM`. This job pins
//! one version for an entire run; [`ApiVersion::default`] is the version the
//! tag semantics were written against.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A validated Admin API version.
///
/// Accepts quarterly `YYYY-MM` version strings (the month must be a real
/// month) or the literal `unstable`.
///
/// # Example
///
/// ```rust
/// use order_tagger::ApiVersion;
///
/// let version: ApiVersion = "2024-07".parse().unwrap();
/// assert_eq!(version.to_string(), "2024-07");
/// assert_eq!(ApiVersion::default(), version);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// The version every pipeline run uses unless overridden.
    const PINNED: &'static str = "2024-07";

    /// Creates a new validated API version.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] if the string is neither
    /// `YYYY-MM` nor `unstable`.
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        let version = version.into();
        if version == "unstable" || Self::is_quarterly(&version) {
            return Ok(Self(version));
        }
        Err(ConfigError::InvalidApiVersion { version })
    }

    /// Returns `true` for quarterly `YYYY-MM` versions, `false` for `unstable`.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.0 != "unstable"
    }

    fn is_quarterly(version: &str) -> bool {
        let bytes = version.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return false;
        }
        if !version[..4].bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        matches!(version[5..].parse::<u8>(), Ok(month) if (1..=12).contains(&month))
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::PINNED.to_string())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_version_is_pinned() {
        assert_eq!(ApiVersion::default().to_string(), "2024-07");
        assert!(ApiVersion::default().is_stable());
    }

    #[test]
    fn parses_quarterly_versions() {
        assert!(ApiVersion::new("2024-01").is_ok());
        assert!(ApiVersion::new("2024-10").is_ok());
        assert!(ApiVersion::new("2025-04").is_ok());
    }

    #[test]
    fn accepts_unstable() {
        let version = ApiVersion::new("unstable").unwrap();
        assert!(!version.is_stable());
        assert_eq!(version.to_string(), "unstable");
    }

    #[test]
    fn rejects_malformed_versions() {
        for bad in ["", "2024", "2024-13", "2024-00", "24-07", "2024_07", "2024-7", "latest"] {
            assert!(
                matches!(ApiVersion::new(bad), Err(ConfigError::InvalidApiVersion { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn from_str_round_trips_display() {
        let version: ApiVersion = "2024-10".parse().unwrap();
        assert_eq!(version.as_ref(), "2024-10");
        assert_eq!(format!("{version}"), "2024-10");
    }
}
