//! HTTP-specific error types for the MoySklad API client.
//!
//! Every call made through [`crate::clients::HttpClient`] either yields a
//! classified [`crate::clients::ApiResult`] or one of the [`HttpError`]
//! variants below.
//!
//! # Error Handling
//!
//! - [`HttpError::PosTokenMissing`]: a POS-token request without a token
//! - [`HttpError::InvalidQuery`] / [`HttpError::InvalidRequest`]: rejected
//!   before anything is sent
//! - [`HttpError::Network`]: the transport could not complete the exchange
//! - [`HttpError::Api`]: the API answered with a structured error list
//! - [`HttpError::RequestFailed`]: an error status without a usable error list
//! - [`HttpError::ResponseParse`]: a success status with a non-JSON body
//!
//! # Example
//!
//! ```rust,ignore
//! use moysklad_api::clients::HttpError;
//!
//! match client.get("entity/product", None, None, None).await {
//!     Ok(result) => println!("{result:?}"),
//!     Err(HttpError::Api(e)) => println!("API error {:?}: {}", e.code, e.error),
//!     Err(HttpError::RequestFailed(e)) => println!("HTTP {}: {}", e.code, e.response.body),
//!     Err(e) => println!("{e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::TransportError;
use crate::query::QueryError;

/// Error returned when the API answers with a JSON `errors` list.
///
/// The fields describe the first entry of the list; the full list is kept in
/// [`errors`](Self::errors).
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use moysklad_api::clients::{ApiResponseError, HttpResponse};
///
/// let error = ApiResponseError {
///     code: Some(3006),
///     error: "Entity not found".to_string(),
///     more_info: None,
///     errors: Vec::new(),
///     response: HttpResponse::new(412, HashMap::new(), String::new()),
/// };
///
/// assert_eq!(error.to_string(), "ApiError [3006]: Entity not found");
/// ```
#[derive(Debug, Error)]
#[error("ApiError [{}]: {}", .code.map_or_else(String::new, |code| code.to_string()), .error)]
pub struct ApiResponseError {
    /// The API error code of the first entry, if present.
    pub code: Option<i64>,
    /// The error text of the first entry.
    pub error: String,
    /// The documentation link of the first entry, if present.
    pub more_info: Option<String>,
    /// The full `errors` list.
    pub errors: Vec<Value>,
    /// The raw response.
    pub response: HttpResponse,
}

/// Error returned for an error status whose body carries no `errors` list.
#[derive(Debug, Error)]
#[error("RequestError [{code}]: {}", .response.body)]
pub struct RequestFailedError {
    /// The HTTP status code.
    pub code: u16,
    /// The raw response.
    pub response: HttpResponse,
}

/// Error returned when a success response body is not valid JSON.
#[derive(Debug, Error)]
#[error("Response decode error: {source}")]
pub struct ResponseParseError {
    /// The JSON decoding failure.
    #[source]
    pub source: serde_json::Error,
    /// The raw response.
    pub response: HttpResponse,
}

/// Error returned when a request cannot be built from its inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A GET request was given a payload that is not a JSON object.
    #[error("Cannot send a {method} request with a non-object payload.")]
    UnsupportedRequestShape {
        /// The method of the rejected request.
        method: HttpMethod,
    },

    /// A custom header name or value is not valid in HTTP.
    #[error("Invalid custom header '{name}'.")]
    InvalidHeader {
        /// The name of the rejected header.
        name: String,
    },

    /// The path cannot be resolved against the endpoint URL.
    #[error("Invalid request path '{path}'.")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },
}

/// Unified error type for all request-level failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request asks for the POS token but none is configured.
    #[error("POS token is used, but it's invalid or empty")]
    PosTokenMissing,

    /// Query assembly failed.
    ///
    /// The client never produces this variant: it takes an assembled
    /// [`Query`](crate::query::Query). It lets callers build a query and
    /// send it in one function with `?`.
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// Error status without a structured error list.
    #[error(transparent)]
    RequestFailed(#[from] RequestFailedError),

    /// Error status with a structured error list.
    #[error(transparent)]
    Api(#[from] ApiResponseError),

    /// Success status with an undecodable body.
    #[error(transparent)]
    ResponseParse(#[from] ResponseParseError),
}

impl HttpError {
    /// Returns the HTTP status of the response behind this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.response.code),
            Self::RequestFailed(e) => Some(e.code),
            Self::ResponseParse(e) => Some(e.response.code),
            _ => None,
        }
    }
}
