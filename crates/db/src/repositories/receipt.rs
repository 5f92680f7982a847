//! Receipt repository.
//!
//! Same transaction shape as trips: ownership, validation and the year lock
//! are checked on the transaction that performs the write.

use milebook_core::ledger::TripLedgerService;
use milebook_core::receipt::{Receipt, ReceiptFields, ReceiptService};
use milebook_shared::types::{ReceiptId, UserId, VehicleId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde_json::json;

use super::audit::{AuditEntry, AuditRepository};
use super::begin_serializable;
use super::error::RepositoryError;
use super::vehicle::load_owned_vehicle;
use super::year_lock::ensure_years_unlocked;
use crate::entities::receipts;

/// Receipt repository.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    db: DatabaseConnection,
}

impl ReceiptRepository {
    /// Creates a new receipt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and stores a new receipt.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` for a missing or foreign vehicle, the first
    /// violated receipt rule, `LockedPeriod` if the receipt's year is locked,
    /// or a database error.
    pub async fn create_receipt(
        &self,
        user_id: UserId,
        vehicle_id: VehicleId,
        fields: ReceiptFields,
    ) -> Result<Receipt, RepositoryError> {
        let txn = begin_serializable(&self.db).await?;

        let vehicle = load_owned_vehicle(&txn, vehicle_id, user_id).await?;
        let receipt = ReceiptService::create_receipt(user_id, &vehicle, fields)?;
        ensure_years_unlocked(&txn, user_id, &[receipt.year()]).await?;

        receipts::ActiveModel::try_from(&receipt)?.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            user_id = %user_id,
            vehicle_id = %vehicle_id,
            receipt_id = %receipt.id,
            "Receipt created"
        );
        self.audit(&receipt, "create").await;
        Ok(receipt)
    }

    /// Replaces the editable fields of a receipt.
    ///
    /// Returns `Ok(None)` if the receipt does not exist, is deleted, or
    /// belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns the first violated receipt rule, `LockedPeriod` if either the
    /// stored or the new year is locked, or a database error.
    pub async fn update_receipt(
        &self,
        receipt_id: ReceiptId,
        user_id: UserId,
        fields: ReceiptFields,
    ) -> Result<Option<Receipt>, RepositoryError> {
        let txn = begin_serializable(&self.db).await?;

        let Some(mut receipt) = find_owned_receipt(&txn, receipt_id, user_id).await? else {
            return Ok(None);
        };
        let old_date = receipt.date;

        ReceiptService::update_receipt(&mut receipt, fields)?;
        let years = TripLedgerService::affected_years(old_date, receipt.date);
        ensure_years_unlocked(&txn, user_id, &years).await?;

        receipts::ActiveModel::try_from(&receipt)?.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %user_id, receipt_id = %receipt.id, "Receipt updated");
        self.audit(&receipt, "update").await;
        Ok(Some(receipt))
    }

    /// Soft-deletes a receipt. Returns whether an active receipt existed.
    ///
    /// # Errors
    ///
    /// Returns `LockedPeriod` if the receipt's year is locked, or a database
    /// error.
    pub async fn delete_receipt(
        &self,
        receipt_id: ReceiptId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let txn = begin_serializable(&self.db).await?;

        let Some(mut receipt) = find_owned_receipt(&txn, receipt_id, user_id).await? else {
            return Ok(false);
        };
        ensure_years_unlocked(&txn, user_id, &[receipt.year()]).await?;

        if !ReceiptService::delete_receipt(&mut receipt) {
            return Ok(false);
        }
        receipts::ActiveModel::try_from(&receipt)?.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %user_id, receipt_id = %receipt.id, "Receipt deleted");
        self.audit(&receipt, "delete").await;
        Ok(true)
    }

    /// Finds one active receipt of the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_receipt(
        &self,
        receipt_id: ReceiptId,
        user_id: UserId,
    ) -> Result<Option<Receipt>, RepositoryError> {
        find_owned_receipt(&self.db, receipt_id, user_id).await
    }

    /// Active receipts of the user, optionally for one vehicle, newest first.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` if a vehicle is given that is missing or
    /// foreign, or a database error.
    pub async fn list_receipts(
        &self,
        user_id: UserId,
        vehicle_id: Option<VehicleId>,
    ) -> Result<Vec<Receipt>, RepositoryError> {
        let mut query =
            receipts::Entity::find_active().filter(receipts::Column::UserId.eq(user_id.into_inner()));
        if let Some(vehicle_id) = vehicle_id {
            load_owned_vehicle(&self.db, vehicle_id, user_id).await?;
            query = query.filter(receipts::Column::VehicleId.eq(vehicle_id.into_inner()));
        }

        let mut receipts: Vec<Receipt> = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Receipt::from)
            .collect();
        ReceiptService::sort_newest_first(&mut receipts);
        Ok(receipts)
    }

    async fn audit(&self, receipt: &Receipt, action: &'static str) {
        AuditRepository::new(self.db.clone())
            .record(AuditEntry {
                user_id: receipt.user_id,
                entity_type: "receipt",
                entity_id: receipt.id.into_inner(),
                action,
                details: json!({
                    "vehicle_id": receipt.vehicle_id,
                    "date": receipt.date,
                    "amount": receipt.amount,
                    "litres": receipt.litres,
                }),
            })
            .await;
    }
}

/// An active receipt owned by the user.
async fn find_owned_receipt<C: ConnectionTrait>(
    conn: &C,
    receipt_id: ReceiptId,
    user_id: UserId,
) -> Result<Option<Receipt>, RepositoryError> {
    let receipt = receipts::Entity::find_active()
        .filter(receipts::Column::Id.eq(receipt_id.into_inner()))
        .filter(receipts::Column::UserId.eq(user_id.into_inner()))
        .one(conn)
        .await?
        .map(Receipt::from);
    Ok(receipt)
}
