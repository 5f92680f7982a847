//! Year-lock service.
//!
//! Validates lock and unlock transitions. Repositories persist the returned
//! [`YearLockTransition`] together with its history event in one transaction.

use chrono::Utc;
use milebook_shared::types::{UserId, YearSummaryId};

use super::types::{YearLockTransition, YearSummary};
use crate::auth::Actor;
use crate::ledger::LedgerError;

/// Earliest supported tax year.
pub const MIN_YEAR: i32 = 1900;

/// Latest supported tax year.
pub const MAX_YEAR: i32 = 9999;

/// Stateless year-lock service.
pub struct YearLockService;

impl YearLockService {
    /// Checks that `year` is a supported tax year.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::YearOutOfRange` outside `MIN_YEAR..=MAX_YEAR`.
    pub const fn validate_year(year: i32) -> Result<i32, LedgerError> {
        if year < MIN_YEAR || year > MAX_YEAR {
            return Err(LedgerError::YearOutOfRange(year));
        }
        Ok(year)
    }

    /// Builds a fresh, unlocked summary for a user and year.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::YearOutOfRange` for an unsupported year.
    pub fn new_summary(user_id: UserId, year: i32) -> Result<YearSummary, LedgerError> {
        let year = Self::validate_year(year)?;
        let now = Utc::now();
        Ok(YearSummary {
            id: YearSummaryId::new(),
            user_id,
            year,
            is_locked: false,
            locked_at: None,
            lock_actor: None,
            lock_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Locks an unlocked year.
    ///
    /// Locking is not idempotent: a second lock is an error.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::YearAlreadyLocked` if the year is locked.
    pub fn lock(
        summary: &YearSummary,
        locked_by: UserId,
        reason: String,
    ) -> Result<YearLockTransition, LedgerError> {
        if summary.is_locked {
            return Err(LedgerError::YearAlreadyLocked(summary.year));
        }
        Ok(YearLockTransition::Lock {
            locked_by,
            locked_at: Utc::now(),
            reason,
        })
    }

    /// Unlocks a locked year on behalf of an administrator.
    ///
    /// The capability is checked before the state, so a regular user learns
    /// nothing about the lock state of the year.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnlockNotPermitted` if the actor may not unlock
    /// years and `LedgerError::YearNotLocked` if the year is not locked.
    pub fn unlock(
        summary: &YearSummary,
        actor: &Actor,
        reason: String,
    ) -> Result<YearLockTransition, LedgerError> {
        if !actor.can_unlock_years() {
            return Err(LedgerError::UnlockNotPermitted);
        }
        if !summary.is_locked {
            return Err(LedgerError::YearNotLocked(summary.year));
        }
        Ok(YearLockTransition::Unlock {
            unlocked_by: actor.user_id,
            unlocked_at: Utc::now(),
            reason,
        })
    }

    /// Lock state of a possibly missing summary. A missing summary is unlocked.
    #[must_use]
    pub fn is_locked(summary: Option<&YearSummary>) -> bool {
        summary.is_some_and(|s| s.is_locked)
    }

    /// Rejects mutations of records dated in a locked year.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LockedPeriod` if `is_locked` is set.
    pub const fn ensure_unlocked(year: i32, is_locked: bool) -> Result<(), LedgerError> {
        if is_locked {
            return Err(LedgerError::LockedPeriod(year));
        }
        Ok(())
    }
}
