//! MoySklad API version definitions.
//!
//! This module provides the [`ApiVersion`] enum for specifying which version
//! of the JSON API (`remap`) or the POS API (`posap`) to talk to. The version
//! becomes the last path segment of the base URL.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// MoySklad API version.
///
/// # Example
///
/// ```rust
/// use moysklad_api::ApiVersion;
///
/// let version: ApiVersion = "1.2".parse().unwrap();
/// assert_eq!(version, ApiVersion::V1_2);
/// assert_eq!(version, ApiVersion::latest());
/// assert_eq!(ApiVersion::pos_latest().to_string(), "1.0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Version 1.0 (the POS API's current version)
    V1_0,
    /// Version 1.1 of the JSON API
    V1_1,
    /// Version 1.2 of the JSON API
    V1_2,
    /// Any other `MAJOR.MINOR` version string.
    Custom(String),
}

impl ApiVersion {
    /// Returns the default JSON API version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V1_2
    }

    /// Returns the default POS API version.
    #[must_use]
    pub const fn pos_latest() -> Self {
        Self::V1_0
    }

    const fn ordinal(&self) -> u32 {
        match self {
            Self::V1_0 => 1,
            Self::V1_1 => 2,
            Self::V1_2 => 3,
            Self::Custom(_) => 100,
        }
    }

    fn is_valid_version_format(s: &str) -> bool {
        let mut parts = s.split('.');
        let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
            return false;
        };
        !major.is_empty()
            && !minor.is_empty()
            && major.chars().all(|c| c.is_ascii_digit())
            && minor.chars().all(|c| c.is_ascii_digit())
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => a.cmp(b),
            _ => self.ordinal().cmp(&other.ordinal()),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version_str = match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::Custom(s) => s,
        };
        f.write_str(version_str)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s {
            "1.0" => Ok(Self::V1_0),
            "1.1" => Ok(Self::V1_1),
            "1.2" => Ok(Self::V1_2),
            _ if Self::is_valid_version_format(s) => Ok(Self::Custom(s.to_string())),
            _ => Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            }),
        }
    }
}
