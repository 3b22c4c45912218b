//! HTTP client types for MoySklad API communication.
//!
//! This module provides the request/response layer: preparing
//! authenticated requests, sending them through a transport and
//! classifying what comes back.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async client facade (`get`, `post`, `put`, `delete`)
//! - [`RequestConfig`]: Per-request options (POS surface, headers, redirects)
//! - [`HttpRequest`]: A prepared request, see [`HttpRequest::prepare`]
//! - [`HttpResponse`]: A raw response from a transport
//! - [`ApiResult`] / [`ApiResponse`]: The classified outcome, see [`classify`]
//! - [`HttpTransport`]: The transport seam, implemented by [`ReqwestTransport`]
//! - [`HttpError`]: Every failure a call can produce
//!
//! # Example
//!
//! ```rust,no_run
//! use moysklad_api::clients::{ApiResult, HttpClient, RequestConfig};
//! use moysklad_api::{urls, Login, MoySkladConfig, Password, PosToken};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MoySkladConfig::builder()
//!     .login(Login::new("admin@company")?)
//!     .password(Password::new("secret")?)
//!     .pos_token(PosToken::new("pos-token")?)
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let options = RequestConfig::new().use_pos_api(true).use_pos_token(true);
//! let stores = client
//!     .get(&urls::pos_retail_store_query(), None, None, Some(&options))
//!     .await?;
//!
//! if let ApiResult::Response(response) = stores {
//!     println!("{} retail stores", response.row_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Retry Behavior
//!
//! The client never retries. Each call sleeps the configured pre-request
//! delay (200 ms by default) before sending, which keeps sequential callers
//! under the API rate limit.

mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod request_config;
mod transport;

pub use classify::classify;
pub use errors::{
    ApiResponseError, HttpError, InvalidHttpRequestError, RequestFailedError, ResponseParseError,
};
pub use http_client::HttpClient;
pub use http_request::{BasicCredentials, HttpMethod, HttpRequest, SDK_VERSION};
pub use http_response::{ApiResponse, ApiResult, HttpResponse, RateLimitInfo};
pub use request_config::RequestConfig;
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
