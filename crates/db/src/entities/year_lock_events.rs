//! `SeaORM` Entity for year_lock_events table.

use chrono::Utc;
use milebook_core::yearlock::{LockAction, YearLockEvent};
use milebook_shared::types::{UserId, YearLockEventId, YearSummaryId};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "year_lock_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub summary_id: Uuid,
    pub action: String,
    pub actor: Uuid,
    pub reason: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::year_summaries::Entity",
        from = "Column::SummaryId",
        to = "super::year_summaries::Column::Id"
    )]
    YearSummaries,
}

impl Related<super::year_summaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::YearSummaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for YearLockEvent {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let action = LockAction::parse(&model.action)
            .ok_or_else(|| DbErr::Type(format!("unknown lock action: {}", model.action)))?;
        Ok(Self {
            id: YearLockEventId::from_uuid(model.id),
            summary_id: YearSummaryId::from_uuid(model.summary_id),
            action,
            actor: UserId::from_uuid(model.actor),
            reason: model.reason,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

impl From<&YearLockEvent> for ActiveModel {
    fn from(event: &YearLockEvent) -> Self {
        Self {
            id: Set(event.id.into_inner()),
            summary_id: Set(event.summary_id.into_inner()),
            action: Set(event.action.as_str().to_string()),
            actor: Set(event.actor.into_inner()),
            reason: Set(event.reason.clone()),
            created_at: Set(event.created_at.into()),
        }
    }
}
