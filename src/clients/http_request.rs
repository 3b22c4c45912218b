//! Outbound request preparation.
//!
//! [`HttpRequest::prepare`] turns a verb, a path, an optional payload, an
//! assembled [`Query`] and per-request [`RequestConfig`] options into a
//! transport-ready request: credentials, headers, parameters, body and an
//! absolute URL.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::{Map, Value};
use url::Url;

use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::request_config::RequestConfig;
use crate::config::{MoySkladConfig, PosToken};
use crate::query::{param_value, Query};

/// Crate version, sent in the `User-Agent` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEBUG_RATE_LIMIT_HEADERS: [&str; 5] = [
    "X-RateLimit-Limit",
    "X-Lognex-Retry-TimeInterval",
    "X-RateLimit-Remaining",
    "X-Lognex-Reset",
    "X-Lognex-Retry-After",
];

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Reads; the payload is sent as query parameters.
    Get,
    /// Creates; the payload is sent as a JSON body.
    Post,
    /// Updates; the payload is sent as a JSON body.
    Put,
    /// Deletes; the payload is sent as a JSON body.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved Basic credentials of one request.
///
/// The `Debug` implementation masks the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    login: String,
    secret: String,
}

impl BasicCredentials {
    /// Creates credentials from a login and a secret (password or POS token).
    #[must_use]
    pub fn new(login: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            secret: secret.into(),
        }
    }

    /// Returns the login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Returns the secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns the `Authorization` header value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use moysklad_api::clients::BasicCredentials;
    ///
    /// let credentials = BasicCredentials::new("admin@company", "secret");
    /// assert_eq!(
    ///     credentials.authorization_header(),
    ///     "Basic YWRtaW5AY29tcGFueTpzZWNyZXQ="
    /// );
    /// ```
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.login, self.secret));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("login", &self.login)
            .field("secret", &"*****")
            .finish()
    }
}

/// A fully prepared request, ready for a transport.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL, without query parameters.
    pub url: Url,
    /// Request headers, including `Authorization`.
    pub headers: BTreeMap<String, String>,
    /// The credentials behind the `Authorization` header.
    pub credentials: BasicCredentials,
    /// Query parameters.
    pub params: BTreeMap<String, String>,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Whether the transport should follow redirects.
    pub follow_redirects: bool,
}

impl HttpRequest {
    /// Prepares a request against the configured endpoints.
    ///
    /// # Errors
    ///
    /// - [`HttpError::PosTokenMissing`] when `options.use_pos_token` is set
    ///   and the configuration has no POS token, on either surface
    /// - [`InvalidHttpRequestError::UnsupportedRequestShape`] for a GET with
    ///   a non-empty payload that is not an object
    /// - [`InvalidHttpRequestError::InvalidHeader`] when a custom header
    ///   name or value is not valid in HTTP
    /// - [`InvalidHttpRequestError::InvalidPath`] when `path` cannot be
    ///   resolved against the endpoint
    ///
    /// # Example
    ///
    /// ```rust
    /// use moysklad_api::clients::{HttpMethod, HttpRequest, RequestConfig};
    /// use moysklad_api::{Login, MoySkladConfig, Password};
    /// use serde_json::json;
    ///
    /// let config = MoySkladConfig::builder()
    ///     .login(Login::new("admin@company").unwrap())
    ///     .password(Password::new("secret").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// let request = HttpRequest::prepare(
    ///     &config,
    ///     HttpMethod::Get,
    ///     "entity/product",
    ///     Some(json!({"limit": 10})),
    ///     None,
    ///     &RequestConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     request.url.as_str(),
    ///     "https://online.moysklad.ru/api/remap/1.2/entity/product"
    /// );
    /// assert_eq!(request.params["limit"], "10");
    /// ```
    pub fn prepare(
        config: &MoySkladConfig,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
        query: Option<&Query>,
        options: &RequestConfig,
    ) -> Result<Self, HttpError> {
        Self::prepare_with_pos_token(
            config,
            config.pos_token(),
            method,
            path,
            payload,
            query,
            options,
        )
    }

    /// Like [`HttpRequest::prepare`], but authenticates POS requests with
    /// `pos_token` instead of the token stored in `config`.
    ///
    /// # Errors
    ///
    /// See [`HttpRequest::prepare`].
    pub fn prepare_with_pos_token(
        config: &MoySkladConfig,
        pos_token: Option<&PosToken>,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
        query: Option<&Query>,
        options: &RequestConfig,
    ) -> Result<Self, HttpError> {
        let pos_token = match (options.use_pos_token, pos_token) {
            (true, None) => return Err(HttpError::PosTokenMissing),
            (true, Some(token)) => Some(token),
            (false, _) => None,
        };

        let endpoint = if options.use_pos_api {
            config.pos_endpoint()
        } else {
            config.endpoint()
        };

        let secret = match pos_token {
            Some(token) if options.use_pos_api => token.as_ref(),
            _ => config.password().as_ref(),
        };
        let credentials = BasicCredentials::new(config.login().as_ref(), secret);

        let mut headers = build_headers(config, &credentials, options)?;

        let mut params = match query {
            Some(query) if !options.use_pos_api => query.url_params().clone(),
            _ => BTreeMap::new(),
        };

        let body = if options.ignore_request_body {
            None
        } else {
            let payload = payload
                .filter(|payload| !is_empty_payload(payload))
                .unwrap_or_else(|| Value::Object(Map::new()));
            match (method, payload) {
                (HttpMethod::Get, Value::Object(map)) => {
                    merge_params(&mut params, &map);
                    None
                }
                (HttpMethod::Get, _) => {
                    return Err(InvalidHttpRequestError::UnsupportedRequestShape { method }.into());
                }
                (_, payload) => Some(payload),
            }
        };

        if body.is_some() && !has_header(&headers, "Content-Type") {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let url = endpoint
            .join(path)
            .map_err(|_| InvalidHttpRequestError::InvalidPath {
                path: path.to_string(),
            })?;

        Ok(Self {
            method,
            url,
            headers,
            credentials,
            params,
            body,
            follow_redirects: options.follow_redirects,
        })
    }

    /// Returns the URL with the query parameters appended.
    #[must_use]
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.params);
        }
        url
    }

    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn build_headers(
    config: &MoySkladConfig,
    credentials: &BasicCredentials,
    options: &RequestConfig,
) -> Result<BTreeMap<String, String>, InvalidHttpRequestError> {
    let mut headers = BTreeMap::new();

    let user_agent_prefix = config
        .user_agent_prefix()
        .map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    headers.insert(
        "User-Agent".to_string(),
        format!("{user_agent_prefix}MoySklad API Library v{SDK_VERSION} | Rust {rust_version}"),
    );
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert(
        "Authorization".to_string(),
        credentials.authorization_header(),
    );

    if options.format_millisecond {
        headers.insert("X-Lognex-Format-Millisecond".to_string(), "true".to_string());
    }
    if options.disable_webhooks_dispatch {
        headers.insert("X-Lognex-WebHook-Disable".to_string(), "true".to_string());
    }
    if options.debug_rate_limit {
        for name in DEBUG_RATE_LIMIT_HEADERS {
            headers.insert(name.to_string(), "true".to_string());
        }
    }

    for (name, value) in &options.custom_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err()
        {
            return Err(InvalidHttpRequestError::InvalidHeader { name: name.clone() });
        }
        set_header(&mut headers, name, value);
    }

    Ok(headers)
}

fn set_header(headers: &mut BTreeMap<String, String>, name: &str, value: &str) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

fn has_header(headers: &BTreeMap<String, String>, name: &str) -> bool {
    headers.keys().any(|key| key.eq_ignore_ascii_case(name))
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn merge_params(params: &mut BTreeMap<String, String>, payload: &Map<String, Value>) {
    for (key, value) in payload {
        if let Some(value) = param_value(value) {
            params.insert(key.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointUrl, Login, Password, PosToken};
    use crate::query::{Filter, QueryElement, Select};
    use serde_json::json;

    fn config(pos_token: Option<&str>) -> MoySkladConfig {
        let mut builder = MoySkladConfig::builder()
            .login(Login::new("admin@company").unwrap())
            .password(Password::new("password").unwrap());
        if let Some(token) = pos_token {
            builder = builder.pos_token(PosToken::new(token).unwrap());
        }
        builder.build().unwrap()
    }

    fn prepare(
        config: &MoySkladConfig,
        method: HttpMethod,
        payload: Option<Value>,
        query: Option<&Query>,
        options: &RequestConfig,
    ) -> Result<HttpRequest, HttpError> {
        HttpRequest::prepare(config, method, "entity/product", payload, query, options)
    }

    #[test]
    fn test_basic_auth_with_password() {
        let request = prepare(
            &config(None),
            HttpMethod::Get,
            None,
            None,
            &RequestConfig::default(),
        )
        .unwrap();

        assert_eq!(request.credentials.secret(), "password");
        assert_eq!(
            request.header("authorization"),
            Some("Basic YWRtaW5AY29tcGFueTpwYXNzd29yZA==")
        );
    }

    #[test]
    fn test_pos_token_missing_is_checked_first() {
        let options = RequestConfig::new().use_pos_token(true);
        let result = HttpRequest::prepare(
            &config(None),
            HttpMethod::Get,
            "http://[",
            Some(json!([1])),
            None,
            &options,
        );
        assert!(matches!(result, Err(HttpError::PosTokenMissing)));

        let options = options.use_pos_api(true);
        let result = prepare(&config(None), HttpMethod::Get, None, None, &options);
        assert!(matches!(result, Err(HttpError::PosTokenMissing)));
    }

    #[test]
    fn test_pos_surface_uses_pos_endpoint_and_token() {
        let options = RequestConfig::new().use_pos_api(true).use_pos_token(true);
        let request = HttpRequest::prepare(
            &config(Some("pos-secret")),
            HttpMethod::Get,
            "admin/retailstore/",
            None,
            None,
            &options,
        )
        .unwrap();

        assert_eq!(
            request.url.as_str(),
            "https://online.moysklad.ru/api/posap/1.0/admin/retailstore/"
        );
        assert_eq!(request.credentials.secret(), "pos-secret");
    }

    #[test]
    fn test_pos_token_on_primary_surface_keeps_password() {
        let options = RequestConfig::new().use_pos_token(true);
        let request = prepare(
            &config(Some("pos-secret")),
            HttpMethod::Get,
            None,
            None,
            &options,
        )
        .unwrap();

        assert_eq!(request.credentials.secret(), "password");
        assert!(request.url.as_str().contains("/api/remap/1.2/"));
    }

    #[test]
    fn test_pos_surface_skips_query() {
        let query = Query::new([QueryElement::from(Select::new().limit(10))]).unwrap();
        let options = RequestConfig::new().use_pos_api(true);
        let request = prepare(&config(None), HttpMethod::Get, None, Some(&query), &options).unwrap();

        assert!(request.params.is_empty());
    }

    #[test]
    fn test_default_headers() {
        let request = prepare(
            &config(None),
            HttpMethod::Get,
            None,
            None,
            &RequestConfig::default(),
        )
        .unwrap();

        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("X-Lognex-WebHook-Disable"), Some("true"));
        assert!(request.header("X-Lognex-Format-Millisecond").is_none());
        assert!(request.header("X-RateLimit-Limit").is_none());
        assert!(request
            .header("User-Agent")
            .unwrap()
            .contains("MoySklad API Library v"));
    }

    #[test]
    fn test_optional_headers() {
        let options = RequestConfig::new()
            .format_millisecond(true)
            .disable_webhooks_dispatch(false)
            .debug_rate_limit(true);
        let request = prepare(&config(None), HttpMethod::Get, None, None, &options).unwrap();

        assert_eq!(request.header("X-Lognex-Format-Millisecond"), Some("true"));
        assert!(request.header("X-Lognex-WebHook-Disable").is_none());
        for name in DEBUG_RATE_LIMIT_HEADERS {
            assert_eq!(request.header(name), Some("true"), "missing {name}");
        }
    }

    #[test]
    fn test_custom_headers_override_defaults() {
        let options = RequestConfig::new()
            .header("accept", "text/csv")
            .header("X-Lognex-WebHook-Disable", "false");
        let request = prepare(&config(None), HttpMethod::Get, None, None, &options).unwrap();

        assert_eq!(request.header("Accept"), Some("text/csv"));
        assert_eq!(request.header("X-Lognex-WebHook-Disable"), Some("false"));
        assert_eq!(
            request
                .headers
                .keys()
                .filter(|key| key.eq_ignore_ascii_case("accept"))
                .count(),
            1
        );
    }

    #[test]
    fn test_invalid_custom_headers_are_rejected() {
        for options in [
            RequestConfig::new().header("X-Bad", "line\nbreak"),
            RequestConfig::new().header("Bad Name", "value"),
        ] {
            let result = prepare(&config(None), HttpMethod::Get, None, None, &options);

            match result {
                Err(HttpError::InvalidRequest(InvalidHttpRequestError::InvalidHeader { name })) => {
                    assert!(name == "X-Bad" || name == "Bad Name");
                }
                other => panic!("Expected InvalidHeader, got: {other:?}"),
            }
        }
    }

    #[test]
    fn test_explicit_pos_token_overrides_config() {
        let token = PosToken::new("fresh-token").unwrap();
        let options = RequestConfig::new().use_pos_api(true).use_pos_token(true);
        let request = HttpRequest::prepare_with_pos_token(
            &config(None),
            Some(&token),
            HttpMethod::Get,
            "admin/attach",
            None,
            None,
            &options,
        )
        .unwrap();

        assert_eq!(request.credentials.secret(), "fresh-token");
    }

    #[test]
    fn test_get_payload_merges_into_params_and_wins() {
        let query = Query::new([QueryElement::from("y=2"), QueryElement::from("x=0")]).unwrap();
        let request = prepare(
            &config(None),
            HttpMethod::Get,
            Some(json!({"x": 1, "flag": true, "name": "a", "skip": null, "nested": {"k": [1]}})),
            Some(&query),
            &RequestConfig::default(),
        )
        .unwrap();

        assert_eq!(request.params["x"], "1");
        assert_eq!(request.params["y"], "2");
        assert_eq!(request.params["flag"], "true");
        assert_eq!(request.params["name"], "a");
        assert_eq!(request.params["nested"], r#"{"k":[1]}"#);
        assert!(!request.params.contains_key("skip"));
        assert!(request.body.is_none());
        assert!(request.header("Content-Type").is_none());
    }

    #[test]
    fn test_get_with_non_object_payload_is_rejected() {
        let result = prepare(
            &config(None),
            HttpMethod::Get,
            Some(json!([1, 2])),
            None,
            &RequestConfig::default(),
        );
        assert!(matches!(
            result,
            Err(HttpError::InvalidRequest(
                InvalidHttpRequestError::UnsupportedRequestShape {
                    method: HttpMethod::Get
                }
            ))
        ));

        let result = prepare(
            &config(None),
            HttpMethod::Get,
            Some(json!(5)),
            None,
            &RequestConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_get_with_empty_array_is_accepted() {
        let request = prepare(
            &config(None),
            HttpMethod::Get,
            Some(json!([])),
            None,
            &RequestConfig::default(),
        )
        .unwrap();
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_post_payload_becomes_json_body() {
        let payload = json!([{"name": "a"}, {"name": "b"}]);
        let request = prepare(
            &config(None),
            HttpMethod::Post,
            Some(payload.clone()),
            None,
            &RequestConfig::default(),
        )
        .unwrap();

        assert_eq!(request.body, Some(payload));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_absent_payload_becomes_empty_object_body() {
        let request = prepare(
            &config(None),
            HttpMethod::Delete,
            None,
            None,
            &RequestConfig::default(),
        )
        .unwrap();
        assert_eq!(request.body, Some(json!({})));
    }

    #[test]
    fn test_ignore_request_body() {
        let options = RequestConfig::new().ignore_request_body(true);
        let request = prepare(
            &config(None),
            HttpMethod::Put,
            Some(json!({"name": "a"})),
            None,
            &options,
        )
        .unwrap();
        assert!(request.body.is_none());

        let request = prepare(
            &config(None),
            HttpMethod::Get,
            Some(json!([1])),
            None,
            &options,
        )
        .unwrap();
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_filter_query_is_carried() {
        let query = Query::new([QueryElement::from(Filter::new().eq("name", "x"))]).unwrap();
        let request = prepare(
            &config(None),
            HttpMethod::Get,
            None,
            Some(&query),
            &RequestConfig::default(),
        )
        .unwrap();

        assert_eq!(request.params["filter"], "name=x");
        assert!(request.full_url().as_str().ends_with("?filter=name%3Dx"));
    }

    #[test]
    fn test_invalid_path() {
        let result = HttpRequest::prepare(
            &config(None),
            HttpMethod::Get,
            "http://[",
            None,
            None,
            &RequestConfig::default(),
        );
        assert!(matches!(
            result,
            Err(HttpError::InvalidRequest(InvalidHttpRequestError::InvalidPath { .. }))
        ));
    }

    #[test]
    fn test_custom_endpoint() {
        let config = MoySkladConfig::builder()
            .login(Login::new("admin@company").unwrap())
            .password(Password::new("password").unwrap())
            .endpoint(EndpointUrl::new("http://127.0.0.1:8080/api").unwrap())
            .build()
            .unwrap();
        let request = prepare(&config, HttpMethod::Get, None, None, &RequestConfig::default())
            .unwrap();

        assert_eq!(
            request.url.as_str(),
            "http://127.0.0.1:8080/api/entity/product"
        );
    }

    #[test]
    fn test_credentials_debug_masks_secret() {
        let credentials = BasicCredentials::new("admin", "super-secret");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("admin"));
    }
}
