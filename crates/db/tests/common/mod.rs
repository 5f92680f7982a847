//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the real
//! `Migrator`.

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::lorem::en::Word;
use milebook_core::ledger::TripFields;
use milebook_core::vehicle::NewVehicle;
use milebook_db::{Migrator, VehicleRepository};
use milebook_shared::types::{UserId, VehicleId};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Opens a fresh, migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open SQLite database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// A migrated SQLite database file shared by a pool of several connections.
///
/// Removes the file (and its WAL side files) on drop.
pub struct FileDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl FileDb {
    pub async fn open(max_connections: u32) -> Self {
        let path = std::env::temp_dir().join(format!("milebook-test-{}.db", uuid::Uuid::new_v4()));
        let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
        options
            .max_connections(max_connections)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("Failed to open SQLite database file");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        Self { db, path }
    }
}

impl Drop for FileDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// Enrolls a vehicle with the given initial mileage.
pub async fn create_vehicle(db: &DatabaseConnection, user_id: UserId, initial_mileage: i64) -> VehicleId {
    let name: String = Word().fake();
    let vehicle = VehicleRepository::new(db.clone())
        .create_vehicle(
            user_id,
            NewVehicle {
                name: format!("Test {name}"),
                license_plate: None,
                initial_mileage,
            },
        )
        .await
        .expect("Failed to create vehicle");
    VehicleId::from_uuid(vehicle.id)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn trip_fields(date: NaiveDate, start: i64, end: i64) -> TripFields {
    TripFields {
        date,
        start_odometer: start,
        end_odometer: end,
        purpose: Some("Client visit".to_string()),
        is_business: true,
    }
}
