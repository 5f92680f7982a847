//! Re-exports of every entity under its table name.

pub use super::audit_logs::Entity as AuditLogs;
pub use super::receipts::Entity as Receipts;
pub use super::trips::Entity as Trips;
pub use super::vehicles::Entity as Vehicles;
pub use super::year_lock_events::Entity as YearLockEvents;
pub use super::year_summaries::Entity as YearSummaries;
