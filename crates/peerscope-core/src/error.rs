//! Error types for PEERSCOPE.

use crate::domain::Domain;
use thiserror::Error;

/// Result type alias using `KernelError`.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors that can occur during kernel operations.
///
/// Statistically weak inputs (too few peers, all-noise clustering) are not
/// errors: they degrade into explanatory results instead. Only caller bugs
/// (bad shapes, bad configuration) surface here.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Input validation failed (batch too small, ragged rows, all-missing values).
    #[error("Input validation failed: {0}")]
    ValidationError(String),

    /// Input dimensions do not agree.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected dimension or length.
        expected: usize,
        /// Actual dimension or length.
        actual: usize,
    },

    /// Kernel not found in registry.
    #[error("Kernel not found: {0}")]
    KernelNotFound(String),

    /// Kernel already registered.
    #[error("Kernel already registered: {0}")]
    KernelAlreadyRegistered(String),

    /// Domain not supported by this build.
    #[error("Domain not supported: {0}")]
    DomainNotSupported(Domain),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl KernelError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        KernelError::ValidationError(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        KernelError::ConfigError(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        KernelError::InternalError(msg.into())
    }

    /// Create a kernel not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        KernelError::KernelNotFound(id.into())
    }

    /// Returns true if the caller can fix this by changing the input.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            KernelError::ValidationError(_)
                | KernelError::ShapeMismatch { .. }
                | KernelError::ConfigError(_)
        )
    }
}
