//! Core error types

use thiserror::Error;

/// Error type shared by every locator crate.
///
/// `InvalidParameter` and `Internal` are the only variants produced by
/// locator construction, parsing and decoding. The remaining variants belong
/// to the configuration and CLI surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing input: empty buffers, empty endpoint lists,
    /// non-positive timestamps, malformed grammar, missing identity.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A guarantee of the cryptographic layer was broken.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidParameter`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidParameter(reason.into())
    }

    /// Shorthand for building an [`Error::Internal`].
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal(reason.into())
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }
}

/// Result type for locator operations.
pub type Result<T> = std::result::Result<T, Error>;
