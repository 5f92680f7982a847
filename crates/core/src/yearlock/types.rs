//! Year-lock domain types.

use chrono::{DateTime, Utc};
use milebook_shared::types::{UserId, YearLockEventId, YearSummaryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::Trip;
use crate::receipt::Receipt;

/// Lock state of a tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    /// Trips and receipts may change.
    Unlocked,
    /// Year is filed; its trips and receipts are frozen.
    Locked,
}

impl LockState {
    /// Maps the stored lock flag to a state.
    #[must_use]
    pub const fn from_flag(is_locked: bool) -> Self {
        if is_locked { Self::Locked } else { Self::Unlocked }
    }

    /// Returns true for the locked state.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

/// Per-user, per-year summary carrying the lock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    /// Unique identifier.
    pub id: YearSummaryId,
    /// Owning user.
    pub user_id: UserId,
    /// Calendar year.
    pub year: i32,
    /// Whether the year is locked.
    pub is_locked: bool,
    /// When the year was locked. Cleared on unlock.
    pub locked_at: Option<DateTime<Utc>>,
    /// Who performed the last lock or unlock.
    pub lock_actor: Option<UserId>,
    /// Reason given for the last lock, or `"Unlocked: {reason}"` after an unlock.
    pub lock_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl YearSummary {
    /// Current lock state.
    #[must_use]
    pub const fn state(&self) -> LockState {
        LockState::from_flag(self.is_locked)
    }
}

/// Lock or unlock, as recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockAction {
    /// Year was locked.
    Lock,
    /// Year was unlocked.
    Unlock,
}

impl LockAction {
    /// Returns the stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Unlock => "unlock",
        }
    }

    /// Parses a stored action.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lock" => Some(Self::Lock),
            "unlock" => Some(Self::Unlock),
            _ => None,
        }
    }
}

impl fmt::Display for LockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a year's lock history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearLockEvent {
    /// Unique identifier.
    pub id: YearLockEventId,
    /// Summary the event belongs to.
    pub summary_id: YearSummaryId,
    /// Lock or unlock.
    pub action: LockAction,
    /// Who performed the transition.
    pub actor: UserId,
    /// Reason exactly as given.
    pub reason: String,
    /// When the transition happened.
    pub created_at: DateTime<Utc>,
}

/// A validated lock-state transition, ready to be applied and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearLockTransition {
    /// Unlocked → Locked.
    Lock {
        /// User who locked the year.
        locked_by: UserId,
        /// When the year was locked.
        locked_at: DateTime<Utc>,
        /// Reason as given.
        reason: String,
    },
    /// Locked → Unlocked.
    Unlock {
        /// Administrator who unlocked the year.
        unlocked_by: UserId,
        /// When the year was unlocked.
        unlocked_at: DateTime<Utc>,
        /// Reason as given.
        reason: String,
    },
}

impl YearLockTransition {
    /// The history action of this transition.
    #[must_use]
    pub const fn action(&self) -> LockAction {
        match self {
            Self::Lock { .. } => LockAction::Lock,
            Self::Unlock { .. } => LockAction::Unlock,
        }
    }

    /// Applies the transition to a summary.
    pub fn apply(&self, summary: &mut YearSummary) {
        match self {
            Self::Lock {
                locked_by,
                locked_at,
                reason,
            } => {
                summary.is_locked = true;
                summary.locked_at = Some(*locked_at);
                summary.lock_actor = Some(*locked_by);
                summary.lock_reason = Some(reason.clone());
                summary.updated_at = *locked_at;
            }
            Self::Unlock {
                unlocked_by,
                unlocked_at,
                reason,
            } => {
                summary.is_locked = false;
                summary.locked_at = None;
                summary.lock_actor = Some(*unlocked_by);
                summary.lock_reason = Some(format!("Unlocked: {reason}"));
                summary.updated_at = *unlocked_at;
            }
        }
    }

    /// Builds the history entry for this transition.
    #[must_use]
    pub fn event(&self, summary_id: YearSummaryId) -> YearLockEvent {
        let (actor, at, reason) = match self {
            Self::Lock {
                locked_by,
                locked_at,
                reason,
            } => (*locked_by, *locked_at, reason),
            Self::Unlock {
                unlocked_by,
                unlocked_at,
                reason,
            } => (*unlocked_by, *unlocked_at, reason),
        };
        YearLockEvent {
            id: YearLockEventId::new(),
            summary_id,
            action: self.action(),
            actor,
            reason: reason.clone(),
            created_at: at,
        }
    }
}

/// Counters for one user and year, computed from active records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotals {
    /// Number of active trips.
    pub trip_count: u64,
    /// Kilometres driven on business trips.
    pub business_km: i64,
    /// Kilometres driven on private trips.
    pub private_km: i64,
    /// Number of active receipts.
    pub receipt_count: u64,
    /// Sum of receipt amounts.
    pub total_expense: Decimal,
    /// Sum of fuel volumes in litres.
    pub fuel_litres: Decimal,
}

impl YearTotals {
    /// Aggregates trips and receipts. Deleted records are skipped; callers
    /// pass the records of a single year.
    #[must_use]
    pub fn from_records<'a, T, R>(trips: T, receipts: R) -> Self
    where
        T: IntoIterator<Item = &'a Trip>,
        R: IntoIterator<Item = &'a Receipt>,
    {
        let mut totals = Self::default();
        for trip in trips.into_iter().filter(|t| t.is_active()) {
            totals.trip_count += 1;
            if trip.is_business {
                totals.business_km = totals.business_km.saturating_add(trip.distance());
            } else {
                totals.private_km = totals.private_km.saturating_add(trip.distance());
            }
        }
        for receipt in receipts.into_iter().filter(|r| r.is_active()) {
            totals.receipt_count += 1;
            totals.total_expense += receipt.amount;
            if let Some(litres) = receipt.litres {
                totals.fuel_litres += litres;
            }
        }
        totals
    }

    /// Total kilometres driven.
    #[must_use]
    pub const fn total_km(&self) -> i64 {
        self.business_km.saturating_add(self.private_km)
    }
}
