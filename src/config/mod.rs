//! Configuration types for the MoySklad API client.
//!
//! This module provides the configuration types used to construct clients.
//!
//! # Overview
//!
//! - [`MoySkladConfig`]: credentials, endpoints and transport settings
//! - [`MoySkladConfigBuilder`]: a builder for [`MoySkladConfig`]
//! - [`Login`], [`Password`], [`PosToken`]: validated credential newtypes
//! - [`EndpointUrl`]: a validated base URL (always ends in `/`)
//! - [`ApiVersion`]: the API version segment of the base URLs
//!
//! # Example
//!
//! ```rust
//! use moysklad_api::{ApiVersion, Login, MoySkladConfig, Password};
//! use std::time::Duration;
//!
//! let config = MoySkladConfig::builder()
//!     .login(Login::new("admin@company").unwrap())
//!     .password(Password::new("secret").unwrap())
//!     .api_version(ApiVersion::V1_2)
//!     .pre_request_delay(Duration::from_millis(100))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.endpoint().as_ref(),
//!     "https://online.moysklad.ru/api/remap/1.2/"
//! );
//! ```

mod newtypes;
mod version;

pub use newtypes::{EndpointUrl, Login, Password, PosToken};
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Host serving both the JSON API and the POS API.
pub const DEFAULT_HOST: &str = "https://online.moysklad.ru";

/// Default delay applied before every request.
pub const DEFAULT_PRE_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Configuration for a MoySklad client.
///
/// The configuration is immutable once built and is shared read-only by
/// every request the client sends.
///
/// # Thread Safety
///
/// `MoySkladConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct MoySkladConfig {
    login: Login,
    password: Password,
    pos_token: Option<PosToken>,
    api_version: ApiVersion,
    pos_api_version: ApiVersion,
    endpoint: EndpointUrl,
    pos_endpoint: EndpointUrl,
    pre_request_delay: Duration,
    timeout: Option<Duration>,
    proxy: Option<String>,
    user_agent_prefix: Option<String>,
}

impl MoySkladConfig {
    /// Creates a new builder for constructing a `MoySkladConfig`.
    #[must_use]
    pub fn builder() -> MoySkladConfigBuilder {
        MoySkladConfigBuilder::new()
    }

    /// Returns the account login.
    #[must_use]
    pub const fn login(&self) -> &Login {
        &self.login
    }

    /// Returns the account password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }

    /// Returns the POS token, if configured.
    #[must_use]
    pub const fn pos_token(&self) -> Option<&PosToken> {
        self.pos_token.as_ref()
    }

    /// Returns the JSON API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the POS API version.
    #[must_use]
    pub const fn pos_api_version(&self) -> &ApiVersion {
        &self.pos_api_version
    }

    /// Returns the JSON API base URL.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Returns the POS API base URL.
    #[must_use]
    pub const fn pos_endpoint(&self) -> &EndpointUrl {
        &self.pos_endpoint
    }

    /// Returns the courtesy delay applied before every request.
    #[must_use]
    pub const fn pre_request_delay(&self) -> Duration {
        self.pre_request_delay
    }

    /// Returns the per-request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the proxy URL, if configured.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify MoySkladConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MoySkladConfig>();
};

/// Builder for constructing [`MoySkladConfig`] instances.
///
/// Required fields are `login` and `password`.
///
/// # Defaults
///
/// - `api_version`: [`ApiVersion::latest()`]
/// - `pos_api_version`: [`ApiVersion::pos_latest()`]
/// - `endpoint`: `https://online.moysklad.ru/api/remap/{api_version}/`
/// - `pos_endpoint`: `https://online.moysklad.ru/api/posap/{pos_api_version}/`
/// - `pre_request_delay`: 200 ms
/// - `timeout`, `proxy`, `pos_token`, `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct MoySkladConfigBuilder {
    login: Option<Login>,
    password: Option<Password>,
    pos_token: Option<PosToken>,
    api_version: Option<ApiVersion>,
    pos_api_version: Option<ApiVersion>,
    endpoint: Option<EndpointUrl>,
    pos_endpoint: Option<EndpointUrl>,
    pre_request_delay: Option<Duration>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    user_agent_prefix: Option<String>,
}

impl MoySkladConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the login (required).
    #[must_use]
    pub fn login(mut self, login: Login) -> Self {
        self.login = Some(login);
        self
    }

    /// Sets the password (required).
    #[must_use]
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Sets the POS token used by requests with `use_pos_token`.
    #[must_use]
    pub fn pos_token(mut self, token: PosToken) -> Self {
        self.pos_token = Some(token);
        self
    }

    /// Sets the JSON API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the POS API version.
    #[must_use]
    pub fn pos_api_version(mut self, version: ApiVersion) -> Self {
        self.pos_api_version = Some(version);
        self
    }

    /// Overrides the JSON API base URL. Takes precedence over `api_version`.
    #[must_use]
    pub fn endpoint(mut self, url: EndpointUrl) -> Self {
        self.endpoint = Some(url);
        self
    }

    /// Overrides the POS API base URL. Takes precedence over `pos_api_version`.
    #[must_use]
    pub fn pos_endpoint(mut self, url: EndpointUrl) -> Self {
        self.pos_endpoint = Some(url);
        self
    }

    /// Sets the delay applied before every request.
    #[must_use]
    pub const fn pre_request_delay(mut self, delay: Duration) -> Self {
        self.pre_request_delay = Some(delay);
        self
    }

    /// Sets the total timeout for a single request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Routes all requests through the given proxy URL.
    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`MoySkladConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `login` or `password`
    /// are not set.
    pub fn build(self) -> Result<MoySkladConfig, ConfigError> {
        let login = self
            .login
            .ok_or(ConfigError::MissingRequiredField { field: "login" })?;
        let password = self
            .password
            .ok_or(ConfigError::MissingRequiredField { field: "password" })?;

        let api_version = self.api_version.unwrap_or_else(ApiVersion::latest);
        let pos_api_version = self.pos_api_version.unwrap_or_else(ApiVersion::pos_latest);

        let endpoint = match self.endpoint {
            Some(url) => url,
            None => EndpointUrl::new(format!("{DEFAULT_HOST}/api/remap/{api_version}/"))?,
        };
        let pos_endpoint = match self.pos_endpoint {
            Some(url) => url,
            None => EndpointUrl::new(format!("{DEFAULT_HOST}/api/posap/{pos_api_version}/"))?,
        };

        Ok(MoySkladConfig {
            login,
            password,
            pos_token: self.pos_token,
            api_version,
            pos_api_version,
            endpoint,
            pos_endpoint,
            pre_request_delay: self.pre_request_delay.unwrap_or(DEFAULT_PRE_REQUEST_DELAY),
            timeout: self.timeout,
            proxy: self.proxy,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
