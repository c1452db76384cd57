//! Application-wide error types surfaced to the host system.

use thiserror::Error;

/// Application error types.
///
/// Every variant blocks the document lifecycle transition that triggered it;
/// none is retryable without the caller correcting the document or setup.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required setup (accounts, company defaults) is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Referenced master record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document data is inconsistent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Host collaborator failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal invariant broken.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for host responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
