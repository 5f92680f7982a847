//! Trip ledger service.
//!
//! Pure business logic for the trip lifecycle. Repositories load the
//! vehicle, its active intervals and the year-lock state, then call into this
//! service before anything is written.

use chrono::{Datelike, NaiveDate, Utc};
use milebook_shared::types::{TripId, UserId, VehicleId};

use super::error::LedgerError;
use super::interval::OdometerIndex;
use super::types::{RecordState, Trip, TripFields, VehicleInfo};
use super::validation::validate_trip;

/// Stateless trip ledger service.
pub struct TripLedgerService;

impl TripLedgerService {
    /// Resolves a vehicle lookup into a vehicle the user may log trips for.
    ///
    /// Vehicles owned by someone else are reported as missing so their
    /// existence is not leaked.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VehicleNotFound` if the vehicle is absent or foreign.
    pub fn ensure_vehicle_owned(
        vehicle: Option<VehicleInfo>,
        vehicle_id: VehicleId,
        user_id: UserId,
    ) -> Result<VehicleInfo, LedgerError> {
        vehicle
            .filter(|v| v.is_owned_by(user_id))
            .ok_or(LedgerError::VehicleNotFound(vehicle_id))
    }

    /// Builds the interval index from a vehicle's stored trips.
    ///
    /// Deleted trips and rows with an unusable range are left out.
    #[must_use]
    pub fn index_trips<'a, I>(trips: I) -> OdometerIndex
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        trips
            .into_iter()
            .filter(|t| t.is_active())
            .filter_map(|t| t.interval().map(|interval| (t.id, interval)))
            .collect()
    }

    /// Validates a new trip and builds the record to persist.
    ///
    /// # Errors
    ///
    /// Returns the first violated trip rule.
    pub fn create_trip(
        user_id: UserId,
        vehicle: &VehicleInfo,
        fields: TripFields,
        existing: &OdometerIndex,
    ) -> Result<Trip, LedgerError> {
        validate_trip(&fields, vehicle, existing, None)?;

        let now = Utc::now();
        Ok(Trip {
            id: TripId::new(),
            user_id,
            vehicle_id: vehicle.id,
            date: fields.date,
            start_odometer: fields.start_odometer,
            end_odometer: fields.end_odometer,
            purpose: normalize_purpose(fields.purpose),
            is_business: fields.is_business,
            state: RecordState::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validates a full-field update and applies it to `trip`.
    ///
    /// The same rules as creation apply; the trip is excluded from its own
    /// overlap check. `trip` is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::TripNotFound` for a deleted trip, otherwise the
    /// first violated trip rule.
    pub fn update_trip(
        trip: &mut Trip,
        vehicle: &VehicleInfo,
        fields: TripFields,
        existing: &OdometerIndex,
    ) -> Result<(), LedgerError> {
        if !trip.is_active() {
            return Err(LedgerError::TripNotFound(trip.id));
        }
        validate_trip(&fields, vehicle, existing, Some(trip.id))?;

        trip.date = fields.date;
        trip.start_odometer = fields.start_odometer;
        trip.end_odometer = fields.end_odometer;
        trip.purpose = normalize_purpose(fields.purpose);
        trip.is_business = fields.is_business;
        trip.updated_at = Utc::now();
        Ok(())
    }

    /// Soft-deletes a trip. Returns false if it was already deleted.
    pub fn delete_trip(trip: &mut Trip) -> bool {
        if !trip.is_active() {
            return false;
        }
        trip.state = RecordState::Deleted;
        trip.updated_at = Utc::now();
        true
    }

    /// Years whose lock state an update from `old_date` to `new_date` touches.
    #[must_use]
    pub fn affected_years(old_date: NaiveDate, new_date: NaiveDate) -> Vec<i32> {
        let (old, new) = (old_date.year(), new_date.year());
        if old == new { vec![old] } else { vec![old, new] }
    }

    /// Orders trips newest date first, ties broken by newest creation first.
    pub fn sort_newest_first(trips: &mut [Trip]) {
        trips.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }
}

/// Trims the purpose and drops it when blank.
fn normalize_purpose(purpose: Option<String>) -> Option<String> {
    purpose
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}
