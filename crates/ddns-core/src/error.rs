//! Error types for the DDNS synchronizer
//!
//! Every component returns [`Result`]; nothing is recovered locally. The
//! binary decides how a failure terminates the run.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message reported when the configured hostname has no zone or record
pub const NOT_FOUND_MESSAGE: &str = "no domain or subdomain found";

/// Core error type for the DDNS synchronizer
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration, detected before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the DNS provider API (zone list, record list, update)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Zone or record absent from the provider's listings.
    ///
    /// Displays the bare message so the user-visible line stays
    /// "no domain or subdomain found".
    #[error("{0}")]
    NotFound(String),

    /// Public IP probe failed (transport, timeout or HTTP status)
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider API error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// The zone-or-record lookup failure with its fixed message
    pub fn domain_not_found() -> Self {
        Self::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Returns true for the zone/record lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
