//! Ledger domain types for trip creation and validation.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use milebook_shared::types::{TripId, UserId, VehicleId};
use serde::{Deserialize, Serialize};

use super::interval::OdometerInterval;

/// Whether a record takes part in reads and validation.
///
/// Deleted records stay in storage for audit history but are invisible to
/// every query and free their odometer interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    /// Visible and validated against.
    Active,
    /// Soft-deleted.
    Deleted,
}

impl RecordState {
    /// Maps the stored soft-delete flag to a state.
    #[must_use]
    pub const fn from_deleted_flag(is_deleted: bool) -> Self {
        if is_deleted { Self::Deleted } else { Self::Active }
    }

    /// Returns the soft-delete flag for storage.
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Returns true if the record is active.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// What the ledger needs to know about a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInfo {
    /// The vehicle ID.
    pub id: VehicleId,
    /// Owner of the vehicle.
    pub user_id: UserId,
    /// Odometer reading when the vehicle was enrolled. Fixed at creation.
    pub initial_mileage: i64,
}

impl VehicleInfo {
    /// Returns true if `user_id` owns the vehicle.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// User-editable trip fields, used for both creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripFields {
    /// Calendar date the trip was driven.
    pub date: NaiveDate,
    /// Odometer reading at departure.
    pub start_odometer: i64,
    /// Odometer reading on arrival.
    pub end_odometer: i64,
    /// Free-text purpose.
    pub purpose: Option<String>,
    /// Business trip (true) or private trip (false).
    pub is_business: bool,
}

/// A trip as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique identifier.
    pub id: TripId,
    /// Owning user.
    pub user_id: UserId,
    /// Vehicle the trip was driven with.
    pub vehicle_id: VehicleId,
    /// Calendar date the trip was driven.
    pub date: NaiveDate,
    /// Odometer reading at departure.
    pub start_odometer: i64,
    /// Odometer reading on arrival.
    pub end_odometer: i64,
    /// Free-text purpose.
    pub purpose: Option<String>,
    /// Business trip (true) or private trip (false).
    pub is_business: bool,
    /// Active or soft-deleted.
    pub state: RecordState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Kilometres driven.
    #[must_use]
    pub const fn distance(&self) -> i64 {
        self.end_odometer.saturating_sub(self.start_odometer)
    }

    /// The odometer interval claimed by this trip, or `None` for rows with
    /// an empty or inverted range.
    #[must_use]
    pub fn interval(&self) -> Option<OdometerInterval> {
        OdometerInterval::new(self.start_odometer, self.end_odometer).ok()
    }

    /// Calendar year the trip is filed under.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Returns true if the trip has not been soft-deleted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }
}
