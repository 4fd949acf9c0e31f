//! Error types for generation providers
//!
//! Every backend maps its transport- and API-level failures onto this one
//! enum, so the pipeline can treat providers interchangeably.

use thiserror::Error;

/// Error type for structured-generation calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider produced no usable output at all
    #[error("Provider '{provider}' returned no output")]
    Empty { provider: String },

    /// The provider produced output that does not match the requested schema
    #[error("Malformed provider output: {message}")]
    Malformed { message: String },

    /// The backing API rejected the request
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network error occurred
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend is misconfigured (missing key, bad endpoint, ...)
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ProviderError {
    /// Create an empty-output error
    pub fn empty(provider: impl Into<String>) -> Self {
        Self::Empty { provider: provider.into() }
    }

    /// Create a malformed-output error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed { message: message.into() }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api { status, message: message.into() }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}

/// Transport failures surface as network errors
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network { message: err.to_string() }
    }
}

/// JSON that fails to parse is malformed output
impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed { message: err.to_string() }
    }
}
