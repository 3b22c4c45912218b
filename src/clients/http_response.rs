//! HTTP response types for the MoySklad API client.
//!
//! [`HttpResponse`] is what a transport hands back; [`ApiResult`] and
//! [`ApiResponse`] are what the classifier makes of it.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Rate-limit counters echoed by the server.
///
/// Every field is `None` unless the matching header is present and numeric.
/// The server only sends most of these when the request asked for them via
/// [`crate::clients::RequestConfig::debug_rate_limit`].
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use moysklad_api::clients::RateLimitInfo;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-ratelimit-remaining".to_string(), vec!["44".to_string()]);
///
/// let info = RateLimitInfo::from_headers(&headers);
/// assert_eq!(info.remaining, Some(44));
/// assert_eq!(info.limit, None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed per window (`X-RateLimit-Limit`).
    pub limit: Option<u64>,
    /// Requests left in the current window (`X-RateLimit-Remaining`).
    pub remaining: Option<u64>,
    /// Window length in milliseconds (`X-Lognex-Retry-TimeInterval`).
    pub retry_time_interval: Option<u64>,
    /// Seconds until the window resets (`X-Lognex-Reset`).
    pub reset: Option<u64>,
    /// Milliseconds to wait before retrying (`X-Lognex-Retry-After`).
    pub retry_after: Option<u64>,
}

impl RateLimitInfo {
    /// Parses the counters from lower-cased response headers.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Self {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .and_then(|value| value.trim().parse::<u64>().ok())
        };

        Self {
            limit: number("x-ratelimit-limit"),
            remaining: number("x-ratelimit-remaining"),
            retry_time_interval: number("x-lognex-retry-timeinterval"),
            reset: number("x-lognex-reset"),
            retry_after: number("x-lognex-retry-after"),
        }
    }

    /// Returns `true` if no counter was present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.limit.is_none()
            && self.remaining.is_none()
            && self.retry_time_interval.is_none()
            && self.reset.is_none()
            && self.retry_after.is_none()
    }
}

/// A raw HTTP response as produced by a transport.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers with lower-cased names (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The undecoded response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response. Header names are lower-cased.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_lowercase())
                .or_default()
                .extend(values);
        }

        Self {
            code,
            headers: normalized,
            body,
        }
    }

    /// Returns `true` if the status code is below 400.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code < 400
    }

    /// Returns `true` for 301, 302, 303, 307 and 308.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self.code, 301 | 302 | 303 | 307 | 308)
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Location` header value, if present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns the rate-limit counters of this response.
    #[must_use]
    pub fn rate_limit(&self) -> RateLimitInfo {
        RateLimitInfo::from_headers(&self.headers)
    }
}

/// A successfully decoded API response.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers with lower-cased names.
    pub headers: HashMap<String, Vec<String>>,
    /// The full decoded body.
    pub data: Value,
    /// Rate-limit counters parsed from the headers.
    pub rate_limit: RateLimitInfo,
}

impl ApiResponse {
    /// Builds a response from a decoded body.
    #[must_use]
    pub fn new(response: HttpResponse, data: Value) -> Self {
        let rate_limit = response.rate_limit();
        Self {
            status: response.code,
            headers: response.headers,
            data,
            rate_limit,
        }
    }

    /// Returns the `context` block (employee, etc.), if present.
    #[must_use]
    pub fn context(&self) -> Option<&Value> {
        self.data.get("context")
    }

    /// Returns the `meta` block, if present.
    #[must_use]
    pub fn meta(&self) -> Option<&Value> {
        self.data.get("meta")
    }

    /// Returns the listed rows.
    ///
    /// For a bare JSON array body the array itself is the row list.
    #[must_use]
    pub fn rows(&self) -> Option<&Vec<Value>> {
        match &self.data {
            Value::Array(rows) => Some(rows),
            other => other.get("rows").and_then(Value::as_array),
        }
    }

    /// Returns the number of rows, or zero if there is no row list.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows().map_or(0, Vec::len)
    }

    /// Deserializes the full body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}

/// The classified outcome of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiResult {
    /// A decoded JSON body.
    Response(ApiResponse),
    /// A redirect that was not followed, with its target (possibly empty).
    Redirect(String),
    /// A successful DELETE.
    NoContent,
}

impl ApiResult {
    /// Returns the decoded response, if this is one.
    #[must_use]
    pub fn into_response(self) -> Option<ApiResponse> {
        match self {
            Self::Response(response) => Some(response),
            Self::Redirect(_) | Self::NoContent => None,
        }
    }

    /// Returns the redirect target, if this is a redirect.
    #[must_use]
    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            Self::Redirect(location) => Some(location),
            Self::Response(_) | Self::NoContent => None,
        }
    }

    /// Returns `true` for [`ApiResult::NoContent`].
    #[must_use]
    pub const fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }
}
