//! Per-request options.

use std::collections::BTreeMap;

/// Options for a single API call.
///
/// A plain value holder; setters consume and return the config so options
/// can be chained.
///
/// # Example
///
/// ```rust
/// use moysklad_api::clients::RequestConfig;
///
/// let options = RequestConfig::new()
///     .use_pos_api(true)
///     .use_pos_token(true)
///     .header("X-Trace", "42");
///
/// assert!(options.use_pos_api);
/// assert!(options.follow_redirects);
/// assert!(options.disable_webhooks_dispatch);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestConfig {
    /// Target the POS API surface instead of the JSON API.
    pub use_pos_api: bool,
    /// Authenticate with the POS token instead of the password.
    pub use_pos_token: bool,
    /// Drop the payload entirely.
    pub ignore_request_body: bool,
    /// Let the transport follow redirects.
    pub follow_redirects: bool,
    /// Ask for timestamps with millisecond precision.
    pub format_millisecond: bool,
    /// Suppress webhooks triggered by this request.
    pub disable_webhooks_dispatch: bool,
    /// Ask the server to echo rate-limit headers.
    pub debug_rate_limit: bool,
    /// Headers applied after all others.
    pub custom_headers: BTreeMap<String, String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            use_pos_api: false,
            use_pos_token: false,
            ignore_request_body: false,
            follow_redirects: true,
            format_millisecond: false,
            disable_webhooks_dispatch: true,
            debug_rate_limit: false,
            custom_headers: BTreeMap::new(),
        }
    }
}

impl RequestConfig {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`use_pos_api`](Self::use_pos_api).
    #[must_use]
    pub const fn use_pos_api(mut self, value: bool) -> Self {
        self.use_pos_api = value;
        self
    }

    /// Sets [`use_pos_token`](Self::use_pos_token).
    #[must_use]
    pub const fn use_pos_token(mut self, value: bool) -> Self {
        self.use_pos_token = value;
        self
    }

    /// Sets [`ignore_request_body`](Self::ignore_request_body).
    #[must_use]
    pub const fn ignore_request_body(mut self, value: bool) -> Self {
        self.ignore_request_body = value;
        self
    }

    /// Sets [`follow_redirects`](Self::follow_redirects).
    #[must_use]
    pub const fn follow_redirects(mut self, value: bool) -> Self {
        self.follow_redirects = value;
        self
    }

    /// Sets [`format_millisecond`](Self::format_millisecond).
    #[must_use]
    pub const fn format_millisecond(mut self, value: bool) -> Self {
        self.format_millisecond = value;
        self
    }

    /// Sets [`disable_webhooks_dispatch`](Self::disable_webhooks_dispatch).
    #[must_use]
    pub const fn disable_webhooks_dispatch(mut self, value: bool) -> Self {
        self.disable_webhooks_dispatch = value;
        self
    }

    /// Sets [`debug_rate_limit`](Self::debug_rate_limit).
    #[must_use]
    pub const fn debug_rate_limit(mut self, value: bool) -> Self {
        self.debug_rate_limit = value;
        self
    }

    /// Adds a custom header, replacing an earlier one of the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RequestConfig::default();

        assert!(!options.use_pos_api);
        assert!(!options.use_pos_token);
        assert!(!options.ignore_request_body);
        assert!(options.follow_redirects);
        assert!(!options.format_millisecond);
        assert!(options.disable_webhooks_dispatch);
        assert!(!options.debug_rate_limit);
        assert!(options.custom_headers.is_empty());
    }

    #[test]
    fn test_setters_chain() {
        let options = RequestConfig::new()
            .follow_redirects(false)
            .format_millisecond(true)
            .debug_rate_limit(true)
            .disable_webhooks_dispatch(false)
            .ignore_request_body(true);

        assert!(!options.follow_redirects);
        assert!(options.format_millisecond);
        assert!(options.debug_rate_limit);
        assert!(!options.disable_webhooks_dispatch);
        assert!(options.ignore_request_body);
    }

    #[test]
    fn test_header_last_write_wins() {
        let options = RequestConfig::new().header("X-A", "1").header("X-A", "2");
        assert_eq!(options.custom_headers.get("X-A"), Some(&"2".to_string()));
    }
}
