//! # MoySklad API Rust Client
//!
//! A Rust client for the MoySklad JSON API and POS API, providing type-safe
//! configuration, a query-string DSL and an async HTTP client that
//! classifies every response into a typed result.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`MoySkladConfig`] and [`MoySkladConfigBuilder`]
//! - Validated newtypes for credentials and endpoint URLs
//! - Filter, search, ordering, expand and paging fragments via [`query`]
//! - Async HTTP client with Basic authentication for both API surfaces via
//!   [`clients`]
//! - Response classification into [`ApiResult`] or a typed [`HttpError`]
//! - Resource path helpers via [`urls`]
//! - A credential-keyed [`ClientRegistry`]
//!
//! ## Quick Start
//!
//! ```rust
//! use moysklad_api::{ApiVersion, Login, MoySkladConfig, Password};
//!
//! let config = MoySkladConfig::builder()
//!     .login(Login::new("admin@company").unwrap())
//!     .password(Password::new("secret").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.endpoint().as_ref(),
//!     "https://online.moysklad.ru/api/remap/1.2/"
//! );
//! ```
//!
//! ## Making Requests
//!
//! ```rust,no_run
//! use moysklad_api::query::{Expand, Filter, Ordering, Query, Select};
//! use moysklad_api::{urls, ApiResult, HttpClient, HttpError, Login, MoySkladConfig, Password};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MoySkladConfig::builder()
//!     .login(Login::new("admin@company")?)
//!     .password(Password::new("secret")?)
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let query = Query::builder()
//!     .add(Filter::new().eq("applicable", true))
//!     .add(Ordering::new().desc("moment"))
//!     .add(Expand::new(["agent", "positions.assortment"]))
//!     .add(Select::new().limit(50))
//!     .build()?;
//!
//! match client.get(&urls::list("customerorder"), None, Some(&query), None).await {
//!     Ok(ApiResult::Response(response)) => println!("{} orders", response.row_count()),
//!     Ok(_) => {}
//!     Err(HttpError::Api(e)) => eprintln!("{e}"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the registry is a value the caller owns
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Thread-safe**: clients and the registry are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **No retries**: every failure surfaces as an [`HttpError`]

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod query;
pub mod time;
pub mod urls;

// Re-export public types at crate root for convenience
pub use api::{credentials_hash, ClientRegistry, MoySklad};
pub use config::{
    ApiVersion, EndpointUrl, Login, MoySkladConfig, MoySkladConfigBuilder, Password, PosToken,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiResponse, ApiResult, HttpClient, HttpError, HttpMethod, HttpResponse, RateLimitInfo,
    RequestConfig,
};
