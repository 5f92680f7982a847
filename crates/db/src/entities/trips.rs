//! `SeaORM` Entity for trips table.

use chrono::Utc;
use milebook_core::ledger::{RecordState, Trip};
use milebook_shared::types::{TripId, UserId, VehicleId};
use sea_orm::entity::prelude::*;
use sea_orm::{Select, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub date: Date,
    pub start_odometer: i64,
    pub end_odometer: i64,
    pub purpose: Option<String>,
    pub is_business: bool,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicles::Entity",
        from = "Column::VehicleId",
        to = "super::vehicles::Column::Id"
    )]
    Vehicles,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Selects trips that have not been soft-deleted.
    pub fn find_active() -> Select<Self> {
        Self::find().filter(Column::IsDeleted.eq(false))
    }
}

impl From<Model> for Trip {
    fn from(model: Model) -> Self {
        Self {
            id: TripId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            vehicle_id: VehicleId::from_uuid(model.vehicle_id),
            date: model.date,
            start_odometer: model.start_odometer,
            end_odometer: model.end_odometer,
            purpose: model.purpose,
            is_business: model.is_business,
            state: RecordState::from_deleted_flag(model.is_deleted),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<&Trip> for ActiveModel {
    fn from(trip: &Trip) -> Self {
        Self {
            id: Set(trip.id.into_inner()),
            user_id: Set(trip.user_id.into_inner()),
            vehicle_id: Set(trip.vehicle_id.into_inner()),
            date: Set(trip.date),
            start_odometer: Set(trip.start_odometer),
            end_odometer: Set(trip.end_odometer),
            purpose: Set(trip.purpose.clone()),
            is_business: Set(trip.is_business),
            is_deleted: Set(trip.state.is_deleted()),
            created_at: Set(trip.created_at.into()),
            updated_at: Set(trip.updated_at.into()),
        }
    }
}
