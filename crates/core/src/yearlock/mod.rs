//! Tax-year lock state machine.
//!
//! A year summary starts unlocked, is locked when the user files the year,
//! and can only be reopened by an administrator:
//! - Unlocked → Locked (lock)
//! - Locked → Unlocked (unlock, admin only)
//!
//! While a year is locked no trip or receipt dated in it may change.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{MAX_YEAR, MIN_YEAR, YearLockService};
pub use types::{LockAction, LockState, YearLockEvent, YearLockTransition, YearSummary, YearTotals};
