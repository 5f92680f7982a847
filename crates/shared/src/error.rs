//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error categories.
///
/// Domain crates convert their detailed errors into one of these before the
/// error leaves the process boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found or not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation conflicts with the current state of the resource.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Mutation attempted against a locked tax year.
    #[error("Locked period: {0}")]
    LockedPeriod(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::InvalidArgument(_) => 400,
            Self::InvalidState(_) | Self::LockedPeriod(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::LockedPeriod(_) => "LOCKED_PERIOD",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the human-readable message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::InvalidArgument(msg)
            | Self::InvalidState(msg)
            | Self::LockedPeriod(msg)
            | Self::Database(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Returns true for server-side failures whose details must not leak to clients.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}
