//! Error types for the MoySklad API client.
//!
//! This module contains error types used throughout the crate for
//! configuration and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Errors raised while sending requests live in
//! [`crate::clients::HttpError`].
//!
//! # Example
//!
//! ```rust
//! use moysklad_api::{ConfigError, Login};
//!
//! let result = Login::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyLogin)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Login cannot be empty.
    #[error("Login cannot be empty. Please provide a valid MoySklad login (e.g., 'admin@company').")]
    EmptyLogin,

    /// Password cannot be empty.
    #[error("Password cannot be empty. Please provide a valid MoySklad password.")]
    EmptyPassword,

    /// POS token cannot be empty.
    #[error("POS token cannot be empty. Omit it instead of passing an empty token.")]
    EmptyPosToken,

    /// Endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Please provide an absolute http(s) URL (e.g., 'https://online.moysklad.ru/api/remap/1.2/').")]
    InvalidEndpointUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'MAJOR.MINOR' (e.g., '1.2').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A timestamp string does not match the API time format.
    #[error("Invalid timestamp '{value}'. Expected 'YYYY-MM-DD HH:MM:SS' with optional '.mmm'.")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
    },

    /// The HTTP transport could not be constructed.
    #[error("Failed to build HTTP transport: {reason}")]
    Transport {
        /// Why construction failed.
        reason: String,
    },
}
