//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Business rules come from `milebook-core`; repositories only load the
//! state those rules need and persist the result.

pub mod audit;
pub mod error;
pub mod receipt;
pub mod trip;
pub mod vehicle;
pub mod year_lock;

pub use audit::{AuditEntry, AuditRepository};
pub use error::RepositoryError;
pub use receipt::ReceiptRepository;
pub use trip::TripRepository;
pub use vehicle::VehicleRepository;
pub use year_lock::{YearLockRepository, YearOverview};

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel, TransactionTrait};

/// Begins a serializable transaction.
///
/// Engines without isolation levels (SQLite) ignore the setting; they
/// serialize writers anyway.
pub(crate) async fn begin_serializable(
    db: &DatabaseConnection,
) -> Result<DatabaseTransaction, DbErr> {
    db.begin_with_config(Some(IsolationLevel::Serializable), None)
        .await
}
