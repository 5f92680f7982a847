//! `SeaORM` entity definitions.
//!
//! Soft-deletable entities expose `Entity::find_active()`, the only query
//! entry point repositories use for reads.

pub mod prelude;

pub mod audit_logs;
pub mod receipts;
pub mod trips;
pub mod vehicles;
pub mod year_lock_events;
pub mod year_summaries;
