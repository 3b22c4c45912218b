//! The transport seam between request preparation and the network.
//!
//! [`HttpClient`](crate::clients::HttpClient) holds an
//! `Arc<dyn HttpTransport>`; production code uses [`ReqwestTransport`],
//! tests can substitute their own implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::MoySkladConfig;
use crate::error::ConfigError;

/// Error returned when a transport cannot complete an exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The reqwest client failed (connection, TLS, timeout, body read).
    #[error("Network error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Any other transport failure.
    #[error("Network error: {reason}")]
    Other {
        /// A description of the failure.
        reason: String,
    },
}

/// Sends prepared requests and returns raw responses.
///
/// Implementations must not interpret status codes; any completed exchange
/// is an `Ok` [`HttpResponse`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by `reqwest` with rustls.
///
/// Keeps one client that follows redirects and one that does not, picked per
/// request by [`HttpRequest::follow_redirects`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    following: reqwest::Client,
    not_following: reqwest::Client,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Builds both clients from the configured timeout and proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the proxy URL is invalid or the
    /// TLS backend cannot be initialized.
    pub fn new(config: &MoySkladConfig) -> Result<Self, ConfigError> {
        let following = Self::client(config, reqwest::redirect::Policy::default())?;
        let not_following = Self::client(config, reqwest::redirect::Policy::none())?;
        Ok(Self {
            following,
            not_following,
        })
    }

    fn client(
        config: &MoySkladConfig,
        policy: reqwest::redirect::Policy,
    ) -> Result<reqwest::Client, ConfigError> {
        let to_config_error = |e: reqwest::Error| ConfigError::Transport {
            reason: e.to_string(),
        };

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(policy);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = config.proxy() {
            builder = builder.proxy(reqwest::Proxy::all(proxy).map_err(to_config_error)?);
        }
        builder.build().map_err(to_config_error)
    }

    /// Parses response headers into a `HashMap` with lower-cased names.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.not_following
        };

        let url = request.url.clone();
        let mut req_builder = match request.method {
            HttpMethod::Get => client.get(url),
            HttpMethod::Post => client.post(url),
            HttpMethod::Put => client.put(url),
            HttpMethod::Delete => client.delete(url),
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }
        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        Ok(HttpResponse::new(code, headers, body))
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
            .build()
            .unwrap()
    }

    #[test]
    fn test_transport_builds_with_defaults() {
        assert!(ReqwestTransport::new(&config()).is_ok());
    }

    #[test]
    fn test_invalid_proxy_is_a_config_error() {
        let config = MoySkladConfig::builder()
            .login(Login::new("admin@company").unwrap())
            .password(Password::new("password").unwrap())
            .proxy("::not a proxy::")
            .build()
            .unwrap();

        assert!(matches!(
            ReqwestTransport::new(&config),
            Err(ConfigError::Transport { .. })
        ));
    }

    #[test]
    fn test_header_parsing_lowercases_and_groups() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.append("X-RateLimit-Remaining", "44".parse().unwrap());
        headers.append("Set-Cookie", "a=1".parse().unwrap());
        headers.append("Set-Cookie", "b=2".parse().unwrap());

        let parsed = ReqwestTransport::parse_response_headers(&headers);

        assert_eq!(parsed["x-ratelimit-remaining"], vec!["44".to_string()]);
        assert_eq!(parsed["set-cookie"].len(), 2);
    }

    #[test]
    fn test_transport_error_message() {
        let error = TransportError::Other {
            reason: "connection reset".to_string(),
        };
        assert_eq!(error.to_string(), "Network error: connection reset");
    }
}
