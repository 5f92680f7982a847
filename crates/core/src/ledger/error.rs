//! Ledger error types for validation and state errors.
//!
//! This module defines every error the trip ledger, receipts and the
//! year-lock state machine can produce, grouped by the error kind callers
//! act on.

use milebook_shared::AppError;
use milebook_shared::types::{ReceiptId, TripId, VehicleId};
use thiserror::Error;

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced record does not exist or is not owned by the caller.
    NotFound,
    /// Input failed validation; the caller must correct it.
    InvalidArgument,
    /// Lock transition attempted from the wrong state.
    InvalidState,
    /// Mutation attempted against a locked year.
    LockedPeriod,
    /// Caller lacks the required capability.
    Forbidden,
    /// Unexpected failure.
    Internal,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Not Found ==========
    /// Vehicle does not exist or belongs to another user.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(VehicleId),

    /// Trip does not exist, is deleted, or belongs to another user.
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    /// Receipt does not exist, is deleted, or belongs to another user.
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(ReceiptId),

    // ========== Trip Validation ==========
    /// End odometer reading is not strictly greater than the start reading.
    #[error("End KM must be greater than Start KM")]
    EndNotAfterStart,

    /// Start odometer reading is below the vehicle's initial mileage.
    #[error("Start KM cannot be less than the vehicle's initial mileage ({initial_mileage} km)")]
    BelowInitialMileage {
        /// Odometer reading recorded when the vehicle was enrolled.
        initial_mileage: i64,
    },

    /// Odometer interval overlaps another active trip on the same vehicle.
    #[error("Trip overlaps with existing trip")]
    TripOverlap {
        /// The active trip whose interval collides.
        existing: TripId,
    },

    /// Odometer reading above the supported maximum.
    #[error("Odometer readings cannot exceed {max} km")]
    OdometerOutOfRange {
        /// Highest accepted reading.
        max: i64,
    },

    // ========== Vehicle Validation ==========
    /// Initial mileage is negative.
    #[error("Initial mileage cannot be negative")]
    NegativeInitialMileage,

    /// Vehicle name is blank.
    #[error("Vehicle name is required")]
    EmptyVehicleName,

    // ========== Receipt Validation ==========
    /// Receipt amount is zero or negative.
    #[error("Receipt amount must be greater than zero")]
    NonPositiveAmount,

    /// Receipt amount has sub-cent precision.
    #[error("Receipt amount cannot have more than 2 decimal places")]
    AmountPrecision,

    /// Receipt amount does not fit the storage representation.
    #[error("Receipt amount is too large")]
    AmountOutOfRange,

    /// Fuel volume is zero or negative.
    #[error("Fuel volume must be greater than zero")]
    NonPositiveVolume,

    /// Fuel volume has sub-millilitre precision.
    #[error("Fuel volume cannot have more than 3 decimal places")]
    VolumePrecision,

    // ========== Year Lock ==========
    /// Year is outside the supported calendar range.
    #[error("Year {0} is out of range")]
    YearOutOfRange(i32),

    /// Lock requested for a year that is already locked.
    #[error("Year {0} is already locked")]
    YearAlreadyLocked(i32),

    /// Unlock requested for a year that is not locked.
    #[error("Year {0} is not locked")]
    YearNotLocked(i32),

    /// Trip or receipt mutation in a locked year.
    #[error("Year {0} is locked; its trips and receipts cannot be changed")]
    LockedPeriod(i32),

    /// Unlock requested by an actor without the administrative capability.
    #[error("Only administrators can unlock a year")]
    UnlockNotPermitted,

    // ========== Internal ==========
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the broad kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VehicleNotFound(_) | Self::TripNotFound(_) | Self::ReceiptNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::EndNotAfterStart
            | Self::BelowInitialMileage { .. }
            | Self::TripOverlap { .. }
            | Self::OdometerOutOfRange { .. }
            | Self::NegativeInitialMileage
            | Self::EmptyVehicleName
            | Self::NonPositiveAmount
            | Self::AmountPrecision
            | Self::AmountOutOfRange
            | Self::NonPositiveVolume
            | Self::VolumePrecision
            | Self::YearOutOfRange(_) => ErrorKind::InvalidArgument,
            Self::YearAlreadyLocked(_) | Self::YearNotLocked(_) => ErrorKind::InvalidState,
            Self::LockedPeriod(_) => ErrorKind::LockedPeriod,
            Self::UnlockNotPermitted => ErrorKind::Forbidden,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::VehicleNotFound(_) => "VEHICLE_NOT_FOUND",
            Self::TripNotFound(_) => "TRIP_NOT_FOUND",
            Self::ReceiptNotFound(_) => "RECEIPT_NOT_FOUND",
            Self::EndNotAfterStart => "END_NOT_AFTER_START",
            Self::BelowInitialMileage { .. } => "BELOW_INITIAL_MILEAGE",
            Self::TripOverlap { .. } => "TRIP_OVERLAP",
            Self::OdometerOutOfRange { .. } => "ODOMETER_OUT_OF_RANGE",
            Self::NegativeInitialMileage => "NEGATIVE_INITIAL_MILEAGE",
            Self::EmptyVehicleName => "EMPTY_VEHICLE_NAME",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AmountPrecision => "AMOUNT_PRECISION",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::NonPositiveVolume => "NON_POSITIVE_VOLUME",
            Self::VolumePrecision => "VOLUME_PRECISION",
            Self::YearOutOfRange(_) => "YEAR_OUT_OF_RANGE",
            Self::YearAlreadyLocked(_) => "YEAR_ALREADY_LOCKED",
            Self::YearNotLocked(_) => "YEAR_NOT_LOCKED",
            Self::LockedPeriod(_) => "LOCKED_PERIOD",
            Self::UnlockNotPermitted => "UNLOCK_NOT_PERMITTED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Every ledger failure is caused by caller input or the current state,
    /// so none of them are.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::InvalidArgument => Self::InvalidArgument(message),
            ErrorKind::InvalidState => Self::InvalidState(message),
            ErrorKind::LockedPeriod => Self::LockedPeriod(message),
            ErrorKind::Forbidden => Self::Forbidden(message),
            ErrorKind::Internal => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LedgerError::VehicleNotFound(VehicleId::new()), ErrorKind::NotFound)]
    #[case(LedgerError::TripNotFound(TripId::new()), ErrorKind::NotFound)]
    #[case(LedgerError::EndNotAfterStart, ErrorKind::InvalidArgument)]
    #[case(LedgerError::BelowInitialMileage { initial_mileage: 10_000 }, ErrorKind::InvalidArgument)]
    #[case(LedgerError::TripOverlap { existing: TripId::new() }, ErrorKind::InvalidArgument)]
    #[case(LedgerError::OdometerOutOfRange { max: 10 }, ErrorKind::InvalidArgument)]
    #[case(LedgerError::YearAlreadyLocked(2024), ErrorKind::InvalidState)]
    #[case(LedgerError::YearNotLocked(2024), ErrorKind::InvalidState)]
    #[case(LedgerError::LockedPeriod(2024), ErrorKind::LockedPeriod)]
    #[case(LedgerError::UnlockNotPermitted, ErrorKind::Forbidden)]
    #[case(LedgerError::Internal("boom".into()), ErrorKind::Internal)]
    fn test_error_kinds(#[case] err: LedgerError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::EndNotAfterStart.error_code(), "END_NOT_AFTER_START");
        assert_eq!(
            LedgerError::TripOverlap { existing: TripId::new() }.error_code(),
            "TRIP_OVERLAP"
        );
        assert_eq!(LedgerError::LockedPeriod(2024).error_code(), "LOCKED_PERIOD");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LedgerError::EndNotAfterStart.to_string(),
            "End KM must be greater than Start KM"
        );
        assert_eq!(
            LedgerError::BelowInitialMileage { initial_mileage: 10_000 }.to_string(),
            "Start KM cannot be less than the vehicle's initial mileage (10000 km)"
        );
        assert_eq!(
            LedgerError::TripOverlap { existing: TripId::new() }.to_string(),
            "Trip overlaps with existing trip"
        );
        assert_eq!(
            LedgerError::YearAlreadyLocked(2024).to_string(),
            "Year 2024 is already locked"
        );
        assert_eq!(LedgerError::YearNotLocked(2024).to_string(), "Year 2024 is not locked");
    }

    #[test]
    fn test_conversion_to_app_error() {
        let app: AppError = LedgerError::YearAlreadyLocked(2024).into();
        assert_eq!(app.status_code(), 409);
        assert_eq!(app.error_code(), "INVALID_STATE");
        assert_eq!(app.message(), "Year 2024 is already locked");

        let app: AppError = LedgerError::LockedPeriod(2023).into();
        assert_eq!(app.error_code(), "LOCKED_PERIOD");

        let app: AppError = LedgerError::VehicleNotFound(VehicleId::new()).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = LedgerError::UnlockNotPermitted.into();
        assert_eq!(app.status_code(), 403);

        let app: AppError = LedgerError::EndNotAfterStart.into();
        assert_eq!(app.status_code(), 400);
    }
}
