//! HTTP client facade for MoySklad API communication.
//!
//! This module provides the [`HttpClient`] type, which prepares requests,
//! paces them, hands them to a transport and classifies the outcome.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::clients::classify::classify;
use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::ApiResult;
use crate::clients::request_config::RequestConfig;
use crate::clients::transport::{HttpTransport, ReqwestTransport};
use crate::config::{EndpointUrl, MoySkladConfig, PosToken};
use crate::error::ConfigError;
use crate::query::Query;

/// HTTP client for the MoySklad JSON API and POS API.
///
/// Every call runs the same pipeline: prepare the request, sleep the
/// configured pre-request delay, send it, classify the response. There are
/// no retries.
///
/// The POS token starts as the configured one and can be replaced with
/// [`HttpClient::set_pos_token`]. Clones share it.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,no_run
/// use moysklad_api::clients::HttpClient;
/// use moysklad_api::query::{Filter, Query};
/// use moysklad_api::{Login, MoySkladConfig, Password};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MoySkladConfig::builder()
///     .login(Login::new("admin@company")?)
///     .password(Password::new("secret")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let query = Query::builder()
///     .add(Filter::new().eq("archived", false))
///     .build()?;
/// let result = client.get("entity/product", None, Some(&query), None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    config: MoySkladConfig,
    pos_token: Arc<RwLock<Option<PosToken>>>,
    transport: Arc<dyn HttpTransport>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client backed by [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &MoySkladConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client that sends through the given transport.
    #[must_use]
    pub fn with_transport(config: &MoySkladConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: config.clone(),
            pos_token: Arc::new(RwLock::new(config.pos_token().cloned())),
            transport,
        }
    }

    /// Returns the POS token used for `use_pos_token` requests.
    #[must_use]
    pub fn pos_token(&self) -> Option<PosToken> {
        self.pos_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the POS token, typically with one returned by
    /// [`urls::pos_attach_token`](crate::urls::pos_attach_token).
    ///
    /// `None` removes it, so `use_pos_token` requests fail with
    /// [`HttpError::PosTokenMissing`].
    pub fn set_pos_token(&self, token: Option<PosToken>) {
        *self.pos_token.write().unwrap_or_else(PoisonError::into_inner) = token;
        tracing::debug!(present = self.pos_token().is_some(), "POS token updated");
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &MoySkladConfig {
        &self.config
    }

    /// Returns the JSON API base URL.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        self.config.endpoint()
    }

    /// Returns the POS API base URL.
    #[must_use]
    pub const fn pos_endpoint(&self) -> &EndpointUrl {
        self.config.pos_endpoint()
    }

    /// Sends a GET request; an object payload is merged into the query.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get(
        &self,
        path: &str,
        payload: Option<Value>,
        query: Option<&Query>,
        options: Option<&RequestConfig>,
    ) -> Result<ApiResult, HttpError> {
        self.request(HttpMethod::Get, path, payload, query, options)
            .await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post(
        &self,
        path: &str,
        payload: Option<Value>,
        query: Option<&Query>,
        options: Option<&RequestConfig>,
    ) -> Result<ApiResult, HttpError> {
        self.request(HttpMethod::Post, path, payload, query, options)
            .await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put(
        &self,
        path: &str,
        payload: Option<Value>,
        query: Option<&Query>,
        options: Option<&RequestConfig>,
    ) -> Result<ApiResult, HttpError> {
        self.request(HttpMethod::Put, path, payload, query, options)
            .await
    }

    /// Sends a DELETE request. Success is always [`ApiResult::NoContent`].
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete(
        &self,
        path: &str,
        payload: Option<Value>,
        query: Option<&Query>,
        options: Option<&RequestConfig>,
    ) -> Result<ApiResult, HttpError> {
        self.request(HttpMethod::Delete, path, payload, query, options)
            .await
    }

    /// Sends a request and classifies the response.
    ///
    /// `path` is resolved against the JSON API endpoint, or the POS API
    /// endpoint when `options.use_pos_api` is set. Missing options mean
    /// [`RequestConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - a POS token is requested but not configured (`PosTokenMissing`)
    /// - the payload, a custom header or the path cannot be used
    ///   (`InvalidRequest`)
    /// - the transport fails (`Network`)
    /// - the API answers with an error status (`Api`, `RequestFailed`)
    /// - a success body is not JSON (`ResponseParse`)
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
        query: Option<&Query>,
        options: Option<&RequestConfig>,
    ) -> Result<ApiResult, HttpError> {
        let default_options = RequestConfig::default();
        let options = options.unwrap_or(&default_options);

        let pos_token = self.pos_token();
        let request = HttpRequest::prepare_with_pos_token(
            &self.config,
            pos_token.as_ref(),
            method,
            path,
            payload,
            query,
            options,
        )?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            pos_api = options.use_pos_api,
            params = request.params.len(),
            "Sending MoySklad API request"
        );

        let delay = self.config.pre_request_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.transport.send(&request).await;
        if let Ok(response) = &outcome {
            tracing::debug!(status = response.code, url = %request.url, "Received MoySklad API response");
            if options.debug_rate_limit {
                let rate_limit = response.rate_limit();
                if !rate_limit.is_empty() {
                    tracing::debug!(?rate_limit, "MoySklad rate limit");
                }
            }
        }

        let result = classify(method, options, outcome);
        if let Err(error) = &result {
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                error = %error,
                "MoySklad API request failed"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Login, Password};

    fn config() -> MoySkladConfig {
        MoySkladConfig::builder()
            .login(Login::new("admin@company").unwrap())
            .password(Password::new("password").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction() {
        let client = HttpClient::new(&config()).unwrap();

        assert_eq!(
            client.endpoint().as_ref(),
            "https://online.moysklad.ru/api/remap/1.2/"
        );
        assert_eq!(
            client.pos_endpoint().as_ref(),
            "https://online.moysklad.ru/api/posap/1.0/"
        );
        assert_eq!(client.config().user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_debug_hides_password() {
        let client = HttpClient::new(&config()).unwrap();
        let debug = format!("{client:?}");

        assert!(!debug.contains("\"password\""));
        assert!(debug.contains("HttpClient"));
    }

    #[test]
    fn test_set_pos_token_is_shared_by_clones() {
        let client = HttpClient::new(&config()).unwrap();
        let clone = client.clone();
        assert!(client.pos_token().is_none());

        client.set_pos_token(Some(PosToken::new("pos-token").unwrap()));
        assert_eq!(clone.pos_token().unwrap().as_ref(), "pos-token");
        assert!(clone.config().pos_token().is_none());

        clone.set_pos_token(None);
        assert!(client.pos_token().is_none());
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
