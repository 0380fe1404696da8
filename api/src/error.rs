//! Error types for the storefront API client

use thiserror::Error;

/// Errors that can occur while configuring the API client
///
/// Request-time failures are reported as [`storefront_core::ApiError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Missing {0} environment variable")]
    MissingVar(&'static str),

    /// A URL setting is not an absolute http(s) URL
    #[error("{var} must be an http(s) URL, got {value:?}: {reason}")]
    InvalidUrl {
        /// Variable holding the URL
        var: &'static str,
        /// Offending value
        value: String,
        /// What is wrong with it
        reason: String,
    },

    /// The request timeout is not a positive number of seconds
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout {
        /// Variable holding the timeout
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
