//! Best-effort audit log.
//!
//! Audit rows are written after the primary change has committed. A failed
//! audit write is logged and otherwise ignored.

use chrono::Utc;
use milebook_shared::types::{AuditLogId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::audit_logs;

/// One audit record.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// User on whose data the change happened.
    pub user_id: UserId,
    /// Kind of record, e.g. `trip`.
    pub entity_type: &'static str,
    /// ID of the changed record.
    pub entity_id: Uuid,
    /// What happened, e.g. `create`.
    pub action: &'static str,
    /// Snapshot of the relevant fields.
    pub details: serde_json::Value,
}

/// Audit log repository.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Writes an audit record, logging instead of failing on error.
    pub async fn record(&self, entry: AuditEntry) {
        let row = audit_logs::ActiveModel {
            id: Set(AuditLogId::new().into_inner()),
            user_id: Set(entry.user_id.into_inner()),
            entity_type: Set(entry.entity_type.to_string()),
            entity_id: Set(entry.entity_id),
            action: Set(entry.action.to_string()),
            details: Set(entry.details),
            created_at: Set(Utc::now().into()),
        };

        if let Err(err) = row.insert(&self.db).await {
            tracing::warn!(
                error = %err,
                entity_type = entry.entity_type,
                entity_id = %entry.entity_id,
                action = entry.action,
                "Failed to write audit log"
            );
        }
    }

    /// Audit records of one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<audit_logs::Model>, DbErr> {
        audit_logs::Entity::find()
            .filter(audit_logs::Column::EntityType.eq(entity_type))
            .filter(audit_logs::Column::EntityId.eq(entity_id))
            .order_by_asc(audit_logs::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
