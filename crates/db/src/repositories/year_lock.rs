//! Year summary and year-lock repository.
//!
//! Lock and unlock run in a serializable transaction that reads the summary,
//! applies the validated transition and appends the history event.

use chrono::NaiveDate;
use milebook_core::auth::Actor;
use milebook_core::ledger::{LedgerError, Trip};
use milebook_core::receipt::Receipt;
use milebook_core::yearlock::{YearLockEvent, YearLockService, YearSummary, YearTotals};
use milebook_shared::types::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Serialize;
use serde_json::json;

use super::audit::{AuditEntry, AuditRepository};
use super::begin_serializable;
use super::error::RepositoryError;
use crate::entities::{receipts, trips, year_lock_events, year_summaries};

/// A year summary together with the counters computed from its records.
#[derive(Debug, Clone, Serialize)]
pub struct YearOverview {
    /// The stored summary.
    #[serde(flatten)]
    pub summary: YearSummary,
    /// Counters over active trips and receipts of the year.
    pub totals: YearTotals,
}

/// Year summary and lock repository.
#[derive(Debug, Clone)]
pub struct YearLockRepository {
    db: DatabaseConnection,
}

impl YearLockRepository {
    /// Creates a new year-lock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the user's summary for `year`, creating an unlocked one on
    /// first access.
    ///
    /// # Errors
    ///
    /// Returns `YearOutOfRange` for an unsupported year, or a database error.
    pub async fn get_or_create_summary(
        &self,
        user_id: UserId,
        year: i32,
    ) -> Result<YearSummary, RepositoryError> {
        YearLockService::validate_year(year)?;
        if let Some(existing) = find_summary(&self.db, user_id, year).await? {
            return Ok(existing.into());
        }

        let summary = YearLockService::new_summary(user_id, year)?;
        match year_summaries::ActiveModel::from(&summary).insert(&self.db).await {
            Ok(_) => {
                tracing::debug!(user_id = %user_id, year, "Year summary created");
                Ok(summary)
            }
            // A concurrent request created it first; the unique index kept
            // the second insert out.
            Err(err) => match find_summary(&self.db, user_id, year).await? {
                Some(existing) => Ok(existing.into()),
                None => Err(err.into()),
            },
        }
    }

    /// Returns the summary of `year` with its computed counters.
    ///
    /// # Errors
    ///
    /// Returns `YearOutOfRange` for an unsupported year, or a database error.
    pub async fn get_year_overview(
        &self,
        user_id: UserId,
        year: i32,
    ) -> Result<YearOverview, RepositoryError> {
        let summary = self.get_or_create_summary(user_id, year).await?;
        let (first, last) = year_bounds(year)?;

        let trips: Vec<Trip> = trips::Entity::find_active()
            .filter(trips::Column::UserId.eq(user_id.into_inner()))
            .filter(trips::Column::Date.between(first, last))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Trip::from)
            .collect();

        let receipts: Vec<Receipt> = receipts::Entity::find_active()
            .filter(receipts::Column::UserId.eq(user_id.into_inner()))
            .filter(receipts::Column::Date.between(first, last))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Receipt::from)
            .collect();

        Ok(YearOverview {
            summary,
            totals: YearTotals::from_records(&trips, &receipts),
        })
    }

    /// Locks a year for filing.
    ///
    /// # Errors
    ///
    /// Returns `YearAlreadyLocked` if the year is locked, `YearOutOfRange`
    /// for an unsupported year, or a database error.
    pub async fn lock_year(
        &self,
        user_id: UserId,
        year: i32,
        reason: String,
    ) -> Result<bool, RepositoryError> {
        // Created outside the transaction so a concurrent first lock loses
        // on the lock transition rather than on the unique index.
        let created = self.get_or_create_summary(user_id, year).await?;
        let txn = begin_serializable(&self.db).await?;

        let mut summary = find_summary(&txn, user_id, year)
            .await?
            .map_or(created, YearSummary::from);

        let transition = YearLockService::lock(&summary, user_id, reason)?;
        transition.apply(&mut summary);
        let event = transition.event(summary.id);

        year_summaries::ActiveModel::from(&summary).update(&txn).await?;
        year_lock_events::ActiveModel::from(&event).insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %user_id, year, "Year locked");
        self.audit(user_id, &summary, &event).await;
        Ok(true)
    }

    /// Reopens a locked year. Only administrators may unlock.
    ///
    /// # Errors
    ///
    /// Returns `UnlockNotPermitted` for a non-admin actor, `YearNotLocked`
    /// if the year is not locked, `YearOutOfRange` for an unsupported year,
    /// or a database error.
    pub async fn unlock_year(
        &self,
        user_id: UserId,
        year: i32,
        actor: &Actor,
        reason: String,
    ) -> Result<bool, RepositoryError> {
        YearLockService::validate_year(year)?;
        let txn = begin_serializable(&self.db).await?;

        // A missing summary is unlocked, so the transition below fails
        // without anything to persist.
        let mut summary = match find_summary(&txn, user_id, year).await? {
            Some(existing) => existing.into(),
            None => YearLockService::new_summary(user_id, year)?,
        };

        let transition = YearLockService::unlock(&summary, actor, reason)?;
        transition.apply(&mut summary);
        let event = transition.event(summary.id);

        year_summaries::ActiveModel::from(&summary).update(&txn).await?;
        year_lock_events::ActiveModel::from(&event).insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %user_id, year, actor = %actor.user_id, "Year unlocked");
        self.audit(user_id, &summary, &event).await;
        Ok(true)
    }

    /// Returns whether the user's `year` is locked. Never creates a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_year_locked(&self, user_id: UserId, year: i32) -> Result<bool, RepositoryError> {
        let summary = find_summary(&self.db, user_id, year)
            .await?
            .map(YearSummary::from);
        Ok(YearLockService::is_locked(summary.as_ref()))
    }

    /// Lock and unlock history of a year, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_lock_history(
        &self,
        user_id: UserId,
        year: i32,
    ) -> Result<Vec<YearLockEvent>, RepositoryError> {
        let Some(summary) = find_summary(&self.db, user_id, year).await? else {
            return Ok(Vec::new());
        };

        let events = year_lock_events::Entity::find()
            .filter(year_lock_events::Column::SummaryId.eq(summary.id))
            .order_by_asc(year_lock_events::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(YearLockEvent::try_from)
            .collect::<Result<Vec<_>, DbErr>>()?;
        Ok(events)
    }

    async fn audit(&self, user_id: UserId, summary: &YearSummary, event: &YearLockEvent) {
        AuditRepository::new(self.db.clone())
            .record(AuditEntry {
                user_id,
                entity_type: "year_summary",
                entity_id: summary.id.into_inner(),
                action: event.action.as_str(),
                details: json!({
                    "year": summary.year,
                    "actor": event.actor,
                    "reason": event.reason,
                }),
            })
            .await;
    }
}

async fn find_summary<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    year: i32,
) -> Result<Option<year_summaries::Model>, DbErr> {
    year_summaries::Entity::find()
        .filter(year_summaries::Column::UserId.eq(user_id.into_inner()))
        .filter(year_summaries::Column::Year.eq(year))
        .one(conn)
        .await
}

/// Rejects the mutation if any of `years` is locked for the user.
///
/// Runs on the caller's transaction so the lock state cannot change between
/// the check and the write.
pub(crate) async fn ensure_years_unlocked<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    years: &[i32],
) -> Result<(), RepositoryError> {
    for &year in years {
        let summary = find_summary(conn, user_id, year)
            .await?
            .map(YearSummary::from);
        YearLockService::ensure_unlocked(year, YearLockService::is_locked(summary.as_ref()))?;
    }
    Ok(())
}

/// First and last day of a calendar year.
fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), LedgerError> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1);
    let last = NaiveDate::from_ymd_opt(year, 12, 31);
    first.zip(last).ok_or(LedgerError::YearOutOfRange(year))
}
