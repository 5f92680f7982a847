//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories that run the ledger rules inside database transactions
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use migration::Migrator;
pub use repositories::{
    AuditRepository, ReceiptRepository, RepositoryError, TripRepository, VehicleRepository,
    YearLockRepository, YearOverview,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection with explicit pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
