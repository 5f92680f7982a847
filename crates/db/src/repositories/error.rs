//! Repository error type shared by every repository.

use milebook_core::ledger::LedgerError;
use milebook_shared::AppError;
use sea_orm::DbErr;

/// Errors returned by repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the ledger error, if a business rule failed.
    #[must_use]
    pub const fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Database(_) => None,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Ledger(err) => err.into(),
            RepositoryError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milebook_shared::types::TripId;

    #[test]
    fn test_ledger_errors_keep_their_category() {
        let err = RepositoryError::from(LedgerError::TripOverlap {
            existing: TripId::new(),
        });
        assert_eq!(err.error_code(), "TRIP_OVERLAP");
        assert_eq!(AppError::from(err).status_code(), 400);

        let err = RepositoryError::from(LedgerError::LockedPeriod(2024));
        assert_eq!(AppError::from(err).error_code(), "LOCKED_PERIOD");
    }

    #[test]
    fn test_database_errors_are_internal() {
        let err = RepositoryError::from(DbErr::Custom("connection reset".to_string()));
        assert!(err.as_ledger().is_none());
        let app = AppError::from(err);
        assert_eq!(app.status_code(), 500);
        assert!(app.is_internal());
    }
}
