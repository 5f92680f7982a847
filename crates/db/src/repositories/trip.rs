//! Trip repository.
//!
//! Every mutation runs in one serializable transaction: the vehicle, its
//! active intervals and the year-lock state are read on the same handle the
//! write goes through, so two concurrent requests cannot both claim the same
//! odometer range or slip past a lock.

use milebook_core::ledger::{Trip, TripFields, TripLedgerService};
use milebook_shared::types::{TripId, UserId, VehicleId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde_json::json;

use super::audit::{AuditEntry, AuditRepository};
use super::begin_serializable;
use super::error::RepositoryError;
use super::vehicle::load_owned_vehicle;
use super::year_lock::ensure_years_unlocked;
use crate::entities::trips;

/// Trip repository.
#[derive(Debug, Clone)]
pub struct TripRepository {
    db: DatabaseConnection,
}

impl TripRepository {
    /// Creates a new trip repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and stores a new trip.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` for a missing or foreign vehicle, the first
    /// violated trip rule, `LockedPeriod` if the trip's year is locked, or a
    /// database error.
    pub async fn create_trip(
        &self,
        user_id: UserId,
        vehicle_id: VehicleId,
        fields: TripFields,
    ) -> Result<Trip, RepositoryError> {
        let txn = begin_serializable(&self.db).await?;

        let vehicle = load_owned_vehicle(&txn, vehicle_id, user_id).await?;
        let existing = load_vehicle_trips(&txn, vehicle_id).await?;
        let index = TripLedgerService::index_trips(&existing);

        let trip = TripLedgerService::create_trip(user_id, &vehicle, fields, &index)?;
        ensure_years_unlocked(&txn, user_id, &[trip.year()]).await?;

        trips::ActiveModel::from(&trip).insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            user_id = %user_id,
            vehicle_id = %vehicle_id,
            trip_id = %trip.id,
            distance = trip.distance(),
            "Trip created"
        );
        self.audit(&trip, "create").await;
        Ok(trip)
    }

    /// Replaces the editable fields of a trip.
    ///
    /// Returns `Ok(None)` if the trip does not exist, is deleted, or belongs
    /// to someone else.
    ///
    /// # Errors
    ///
    /// Returns the first violated trip rule, `LockedPeriod` if either the
    /// stored or the new year is locked, or a database error.
    pub async fn update_trip(
        &self,
        trip_id: TripId,
        user_id: UserId,
        fields: TripFields,
    ) -> Result<Option<Trip>, RepositoryError> {
        let txn = begin_serializable(&self.db).await?;

        let Some(mut trip) = find_owned_trip(&txn, trip_id, user_id).await? else {
            return Ok(None);
        };
        let old_date = trip.date;

        let vehicle = load_owned_vehicle(&txn, trip.vehicle_id, user_id).await?;
        let existing = load_vehicle_trips(&txn, trip.vehicle_id).await?;
        let index = TripLedgerService::index_trips(&existing);

        TripLedgerService::update_trip(&mut trip, &vehicle, fields, &index)?;
        let years = TripLedgerService::affected_years(old_date, trip.date);
        ensure_years_unlocked(&txn, user_id, &years).await?;

        trips::ActiveModel::from(&trip).update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %user_id, trip_id = %trip.id, "Trip updated");
        self.audit(&trip, "update").await;
        Ok(Some(trip))
    }

    /// Soft-deletes a trip, freeing its odometer interval.
    ///
    /// Returns whether an active trip existed.
    ///
    /// # Errors
    ///
    /// Returns `LockedPeriod` if the trip's year is locked, or a database
    /// error.
    pub async fn delete_trip(&self, trip_id: TripId, user_id: UserId) -> Result<bool, RepositoryError> {
        let txn = begin_serializable(&self.db).await?;

        let Some(mut trip) = find_owned_trip(&txn, trip_id, user_id).await? else {
            return Ok(false);
        };
        ensure_years_unlocked(&txn, user_id, &[trip.year()]).await?;

        if !TripLedgerService::delete_trip(&mut trip) {
            return Ok(false);
        }
        trips::ActiveModel::from(&trip).update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %user_id, trip_id = %trip.id, "Trip deleted");
        self.audit(&trip, "delete").await;
        Ok(true)
    }

    /// Finds one active trip of the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_trip(&self, trip_id: TripId, user_id: UserId) -> Result<Option<Trip>, RepositoryError> {
        find_owned_trip(&self.db, trip_id, user_id).await
    }

    /// All active trips of the user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_trips(&self, user_id: UserId) -> Result<Vec<Trip>, RepositoryError> {
        let mut trips: Vec<Trip> = trips::Entity::find_active()
            .filter(trips::Column::UserId.eq(user_id.into_inner()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Trip::from)
            .collect();
        TripLedgerService::sort_newest_first(&mut trips);
        Ok(trips)
    }

    /// Active trips of one of the user's vehicles, newest first.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` if the vehicle is missing or foreign, or a
    /// database error.
    pub async fn list_vehicle_trips(
        &self,
        user_id: UserId,
        vehicle_id: VehicleId,
    ) -> Result<Vec<Trip>, RepositoryError> {
        load_owned_vehicle(&self.db, vehicle_id, user_id).await?;

        let mut trips: Vec<Trip> = load_vehicle_trips(&self.db, vehicle_id)
            .await?
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect();
        TripLedgerService::sort_newest_first(&mut trips);
        Ok(trips)
    }

    async fn audit(&self, trip: &Trip, action: &'static str) {
        AuditRepository::new(self.db.clone())
            .record(AuditEntry {
                user_id: trip.user_id,
                entity_type: "trip",
                entity_id: trip.id.into_inner(),
                action,
                details: json!({
                    "vehicle_id": trip.vehicle_id,
                    "date": trip.date,
                    "start_odometer": trip.start_odometer,
                    "end_odometer": trip.end_odometer,
                    "is_business": trip.is_business,
                }),
            })
            .await;
    }
}

/// Active trips of a vehicle.
async fn load_vehicle_trips<C: ConnectionTrait>(
    conn: &C,
    vehicle_id: VehicleId,
) -> Result<Vec<Trip>, RepositoryError> {
    let trips = trips::Entity::find_active()
        .filter(trips::Column::VehicleId.eq(vehicle_id.into_inner()))
        .all(conn)
        .await?
        .into_iter()
        .map(Trip::from)
        .collect();
    Ok(trips)
}

/// An active trip owned by the user.
async fn find_owned_trip<C: ConnectionTrait>(
    conn: &C,
    trip_id: TripId,
    user_id: UserId,
) -> Result<Option<Trip>, RepositoryError> {
    let trip = trips::Entity::find_active()
        .filter(trips::Column::Id.eq(trip_id.into_inner()))
        .filter(trips::Column::UserId.eq(user_id.into_inner()))
        .one(conn)
        .await?
        .map(Trip::from);
    Ok(trip)
}
