//! `SeaORM` Entity for vehicles table.

use milebook_core::ledger::VehicleInfo;
use milebook_shared::types::{UserId, VehicleId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub license_plate: Option<String>,
    pub initial_mileage: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trips::Entity")]
    Trips,
    #[sea_orm(has_many = "super::receipts::Entity")]
    Receipts,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for VehicleInfo {
    fn from(model: &Model) -> Self {
        Self {
            id: VehicleId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            initial_mileage: model.initial_mileage,
        }
    }
}
