//! `SeaORM` Entity for year_summaries table.
//!
//! One row per user and year; `(user_id, year)` is unique.

use chrono::Utc;
use milebook_core::yearlock::YearSummary;
use milebook_shared::types::{UserId, YearSummaryId};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "year_summaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: i32,
    pub is_locked: bool,
    pub locked_at: Option<DateTimeWithTimeZone>,
    pub lock_actor: Option<Uuid>,
    pub lock_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::year_lock_events::Entity")]
    YearLockEvents,
}

impl Related<super::year_lock_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::YearLockEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for YearSummary {
    fn from(model: Model) -> Self {
        Self {
            id: YearSummaryId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            year: model.year,
            is_locked: model.is_locked,
            locked_at: model.locked_at.map(|t| t.with_timezone(&Utc)),
            lock_actor: model.lock_actor.map(UserId::from_uuid),
            lock_reason: model.lock_reason,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<&YearSummary> for ActiveModel {
    fn from(summary: &YearSummary) -> Self {
        Self {
            id: Set(summary.id.into_inner()),
            user_id: Set(summary.user_id.into_inner()),
            year: Set(summary.year),
            is_locked: Set(summary.is_locked),
            locked_at: Set(summary.locked_at.map(Into::into)),
            lock_actor: Set(summary.lock_actor.map(UserId::into_inner)),
            lock_reason: Set(summary.lock_reason.clone()),
            created_at: Set(summary.created_at.into()),
            updated_at: Set(summary.updated_at.into()),
        }
    }
}
