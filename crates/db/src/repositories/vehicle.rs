//! Vehicle repository.

use chrono::Utc;
use milebook_core::ledger::{LedgerError, TripLedgerService, VehicleInfo};
use milebook_core::vehicle::{NewVehicle, VehicleService};
use milebook_shared::types::{UserId, VehicleId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::json;

use super::audit::{AuditEntry, AuditRepository};
use super::error::RepositoryError;
use crate::entities::vehicles;

/// Vehicle repository.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    db: DatabaseConnection,
}

impl VehicleRepository {
    /// Creates a new vehicle repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enrolls a vehicle for a user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` errors for a blank name or negative initial
    /// mileage, or a database error.
    pub async fn create_vehicle(
        &self,
        user_id: UserId,
        input: NewVehicle,
    ) -> Result<vehicles::Model, RepositoryError> {
        let input = VehicleService::validate_new(input)?;
        let now = Utc::now().into();

        let vehicle = vehicles::ActiveModel {
            id: Set(VehicleId::new().into_inner()),
            user_id: Set(user_id.into_inner()),
            name: Set(input.name),
            license_plate: Set(input.license_plate),
            initial_mileage: Set(input.initial_mileage),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(user_id = %user_id, vehicle_id = %vehicle.id, "Vehicle created");

        AuditRepository::new(self.db.clone())
            .record(AuditEntry {
                user_id,
                entity_type: "vehicle",
                entity_id: vehicle.id,
                action: "create",
                details: json!({
                    "name": vehicle.name,
                    "initial_mileage": vehicle.initial_mileage,
                }),
            })
            .await;

        Ok(vehicle)
    }

    /// Finds a vehicle owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` if the vehicle is missing or foreign.
    pub async fn get_vehicle(
        &self,
        vehicle_id: VehicleId,
        user_id: UserId,
    ) -> Result<vehicles::Model, RepositoryError> {
        vehicles::Entity::find_by_id(vehicle_id.into_inner())
            .filter(vehicles::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::VehicleNotFound(vehicle_id).into())
    }

    /// Lists the user's vehicles, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_vehicles(&self, user_id: UserId) -> Result<Vec<vehicles::Model>, RepositoryError> {
        let vehicles = vehicles::Entity::find()
            .filter(vehicles::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(vehicles::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(vehicles)
    }
}

/// Loads a vehicle the user may log trips and receipts for.
pub(crate) async fn load_owned_vehicle<C: ConnectionTrait>(
    conn: &C,
    vehicle_id: VehicleId,
    user_id: UserId,
) -> Result<VehicleInfo, RepositoryError> {
    let vehicle = vehicles::Entity::find_by_id(vehicle_id.into_inner())
        .one(conn)
        .await?
        .map(|v| VehicleInfo::from(&v));

    Ok(TripLedgerService::ensure_vehicle_owned(vehicle, vehicle_id, user_id)?)
}
