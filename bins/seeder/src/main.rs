//! Demo data seeder for Milebook development.
//!
//! Enrolls a vehicle for a fixed demo user, logs a few trips and receipts,
//! locks the previous year and prints a token for calling the API.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use milebook_core::ledger::TripFields;
use milebook_core::receipt::ReceiptFields;
use milebook_core::vehicle::NewVehicle;
use milebook_db::{ReceiptRepository, TripRepository, VehicleRepository, YearLockRepository};
use milebook_shared::auth::ROLE_USER;
use milebook_shared::types::{UserId, VehicleId};
use milebook_shared::{AppConfig, JwtConfig, JwtService};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Demo user ID (consistent across runs).
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = milebook_db::connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    let user_id = UserId::from_uuid(DEMO_USER_ID);
    let this_year = Utc::now().year();
    let last_year = this_year - 1;

    println!("Seeding demo vehicle...");
    let vehicles = VehicleRepository::new(db.clone());
    let vehicle = match vehicles.list_vehicles(user_id).await?.into_iter().next() {
        Some(existing) => {
            println!("  Demo vehicle {} already exists, skipping...", existing.id);
            return print_token(&config, user_id);
        }
        None => {
            vehicles
                .create_vehicle(
                    user_id,
                    NewVehicle {
                        name: "Company car".to_string(),
                        license_plate: Some("MB-1234".to_string()),
                        initial_mileage: 12_000,
                    },
                )
                .await?
        }
    };
    let vehicle_id = VehicleId::from_uuid(vehicle.id);
    println!("  Created vehicle: {vehicle_id}");

    println!("Seeding trips...");
    let trips = TripRepository::new(db.clone());
    let plan = [
        (last_year, 11, 4, 12_000, 12_180, true, "Customer workshop"),
        (last_year, 12, 15, 12_180, 12_240, false, "Holiday shopping"),
        (this_year, 1, 9, 12_240, 12_515, true, "Site inspection"),
        (this_year, 1, 23, 12_515, 12_560, true, "Supplier meeting"),
    ];
    for (year, month, day, start, end, is_business, purpose) in plan {
        trips
            .create_trip(
                user_id,
                vehicle_id,
                TripFields {
                    date: date(year, month, day)?,
                    start_odometer: start,
                    end_odometer: end,
                    purpose: Some(purpose.to_string()),
                    is_business,
                },
            )
            .await?;
    }
    println!("  Inserted {} trips", plan.len());

    println!("Seeding receipts...");
    let receipts = ReceiptRepository::new(db.clone());
    let fuel = [
        (last_year, 11, 5, dec!(72.40), dec!(41.2)),
        (this_year, 1, 10, dec!(68.95), dec!(38.75)),
    ];
    for (year, month, day, amount, litres) in fuel {
        receipts
            .create_receipt(
                user_id,
                vehicle_id,
                ReceiptFields {
                    date: date(year, month, day)?,
                    amount,
                    litres: Some(litres),
                    vendor: Some("Fuel Stop".to_string()),
                    note: None,
                },
            )
            .await?;
    }
    println!("  Inserted {} receipts", fuel.len());

    println!("Locking {last_year}...");
    YearLockRepository::new(db)
        .lock_year(user_id, last_year, "Filed with tax return".to_string())
        .await?;

    print_token(&config, user_id)?;
    println!("Seeding complete!");
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid seed date")
}

fn print_token(config: &AppConfig, user_id: UserId) -> anyhow::Result<()> {
    let token = JwtService::new(JwtConfig::from(&config.auth))
        .issue_token(user_id.into_inner(), ROLE_USER)?;
    println!("  Demo user: {user_id}");
    println!("  Bearer token: {token}");
    Ok(())
}
