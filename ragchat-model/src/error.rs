//! Error types for the `ragchat-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a language model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("Request to {provider} failed: {message}")]
    Request {
        /// The model provider that was being called.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("{provider} API returned {status}: {message}")]
    Api {
        /// The model provider that produced the error.
        provider: String,
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error detail extracted from the response body.
        message: String,
    },

    /// The provider answered with a body that could not be interpreted.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The model provider that produced the response.
        provider: String,
        /// A description of what was wrong.
        message: String,
    },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure injected by [`MockLlm`](crate::MockLlm).
    #[error("Mock model error: {0}")]
    Mock(String),
}

/// Result type alias for [`ModelError`].
pub type Result<T> = std::result::Result<T, ModelError>;
