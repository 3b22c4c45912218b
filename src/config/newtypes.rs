//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around credential and URL strings
//! that validate their contents on construction. Secrets mask their values in
//! debug output so they never leak into logs.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// A validated MoySklad login (e.g., `admin@company`).
///
/// # Example
///
/// ```rust
/// use moysklad_api::Login;
///
/// let login = Login::new("admin@company").unwrap();
/// assert_eq!(login.as_ref(), "admin@company");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Login(String);

impl Login {
    /// Creates a new validated login.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLogin`] if the login is empty.
    pub fn new(login: impl Into<String>) -> Result<Self, ConfigError> {
        let login = login.into();
        if login.trim().is_empty() {
            return Err(ConfigError::EmptyLogin);
        }
        Ok(Self(login))
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated account password.
///
/// The `Debug` implementation masks the value, displaying only
/// `Password(*****)`.
///
/// # Example
///
/// ```rust
/// use moysklad_api::Password;
///
/// let password = Password::new("hunter2").unwrap();
/// assert_eq!(format!("{:?}", password), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

/// A point-of-sale access token, used as the Basic-auth secret for the
/// POS API when [`RequestConfig::use_pos_token`](crate::clients::RequestConfig::use_pos_token)
/// is set.
#[derive(Clone, PartialEq, Eq)]
pub struct PosToken(String);

impl PosToken {
    /// Creates a new validated POS token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPosToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::EmptyPosToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for PosToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PosToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PosToken(*****)")
    }
}

/// A validated API base URL.
///
/// Request paths are resolved against this URL with standard URL-join
/// semantics, so the stored URL always ends in `/`. A missing trailing slash
/// is appended on construction.
///
/// # Example
///
/// ```rust
/// use moysklad_api::EndpointUrl;
///
/// let url = EndpointUrl::new("https://online.moysklad.ru/api/remap/1.2").unwrap();
/// assert_eq!(url.as_ref(), "https://online.moysklad.ru/api/remap/1.2/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointUrl(Url);

impl EndpointUrl {
    /// Creates a new validated endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpointUrl`] if the URL cannot be parsed,
    /// is not `http`/`https`, or carries a query string or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let trimmed = raw.trim();
        let invalid = || ConfigError::InvalidEndpointUrl { url: raw.clone() };

        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let parsed = Url::parse(&with_slash).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid());
        }

        Ok(Self(parsed))
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// Resolves `path` against this base URL.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`url::ParseError`] if the joined URL is invalid.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path)
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Serialize for EndpointUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for EndpointUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
