//! `SeaORM` Entity for receipts table.
//!
//! Amounts are stored in cents and fuel volumes in millilitres.

use chrono::Utc;
use milebook_core::ledger::{LedgerError, RecordState};
use milebook_core::receipt::{Receipt, ReceiptService};
use milebook_shared::types::{ReceiptId, UserId, VehicleId};
use sea_orm::entity::prelude::*;
use sea_orm::{Select, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub date: Date,
    pub amount_cents: i64,
    pub litres_ml: Option<i64>,
    pub vendor: Option<String>,
    pub note: Option<String>,
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
    /// Selects receipts that have not been soft-deleted.
    pub fn find_active() -> Select<Self> {
        Self::find().filter(Column::IsDeleted.eq(false))
    }
}

impl From<Model> for Receipt {
    fn from(model: Model) -> Self {
        Self {
            id: ReceiptId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            vehicle_id: VehicleId::from_uuid(model.vehicle_id),
            date: model.date,
            amount: ReceiptService::cents_to_amount(model.amount_cents),
            litres: model.litres_ml.map(ReceiptService::millilitres_to_litres),
            vendor: model.vendor,
            note: model.note,
            state: RecordState::from_deleted_flag(model.is_deleted),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl TryFrom<&Receipt> for ActiveModel {
    type Error = LedgerError;

    fn try_from(receipt: &Receipt) -> Result<Self, Self::Error> {
        let litres_ml = receipt
            .litres
            .map(ReceiptService::litres_to_millilitres)
            .transpose()?;

        Ok(Self {
            id: Set(receipt.id.into_inner()),
            user_id: Set(receipt.user_id.into_inner()),
            vehicle_id: Set(receipt.vehicle_id.into_inner()),
            date: Set(receipt.date),
            amount_cents: Set(ReceiptService::amount_to_cents(receipt.amount)?),
            litres_ml: Set(litres_ml),
            vendor: Set(receipt.vendor.clone()),
            note: Set(receipt.note.clone()),
            is_deleted: Set(receipt.state.is_deleted()),
            created_at: Set(receipt.created_at.into()),
            updated_at: Set(receipt.updated_at.into()),
        })
    }
}
