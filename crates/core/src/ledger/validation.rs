//! Business rule validation for trips.
//!
//! The checks run in a fixed order so callers always see the first rule a
//! proposed trip breaks:
//! 1. ordering (`end > start`, `end <= MAX_ODOMETER`)
//! 2. mileage floor (`start >= vehicle.initial_mileage`)
//! 3. no overlap with another active trip of the same vehicle

use milebook_shared::types::TripId;

use super::error::LedgerError;
use super::interval::{MAX_ODOMETER, OdometerIndex, OdometerInterval};
use super::types::{TripFields, VehicleInfo};

/// Checks that the end reading is strictly after the start reading and
/// within the odometer range.
///
/// # Errors
///
/// Returns `LedgerError::EndNotAfterStart` or
/// `LedgerError::OdometerOutOfRange` otherwise.
pub fn validate_odometer_order(
    start_odometer: i64,
    end_odometer: i64,
) -> Result<OdometerInterval, LedgerError> {
    match OdometerInterval::new(start_odometer, end_odometer) {
        Ok(interval) if interval.end() > MAX_ODOMETER => {
            Err(LedgerError::OdometerOutOfRange { max: MAX_ODOMETER })
        }
        result => result,
    }
}

/// Checks that a trip does not start below the vehicle's enrollment reading.
///
/// # Errors
///
/// Returns `LedgerError::BelowInitialMileage` otherwise.
pub const fn validate_mileage_floor(
    interval: &OdometerInterval,
    vehicle: &VehicleInfo,
) -> Result<(), LedgerError> {
    if interval.start() < vehicle.initial_mileage {
        return Err(LedgerError::BelowInitialMileage {
            initial_mileage: vehicle.initial_mileage,
        });
    }
    Ok(())
}

/// Checks that no other active trip of the vehicle claims part of `interval`.
///
/// # Errors
///
/// Returns `LedgerError::TripOverlap` naming the colliding trip.
pub fn validate_no_overlap(
    interval: &OdometerInterval,
    existing: &OdometerIndex,
    exclude: Option<TripId>,
) -> Result<(), LedgerError> {
    match existing.find_overlap(interval, exclude) {
        Some(existing) => Err(LedgerError::TripOverlap { existing }),
        None => Ok(()),
    }
}

/// Runs all trip rules in order.
///
/// `exclude` is the trip being updated, if any; it never collides with itself.
///
/// # Errors
///
/// Returns the first rule violation.
pub fn validate_trip(
    fields: &TripFields,
    vehicle: &VehicleInfo,
    existing: &OdometerIndex,
    exclude: Option<TripId>,
) -> Result<OdometerInterval, LedgerError> {
    let interval = validate_odometer_order(fields.start_odometer, fields.end_odometer)?;
    validate_mileage_floor(&interval, vehicle)?;
    validate_no_overlap(&interval, existing, exclude)?;
    Ok(interval)
}
