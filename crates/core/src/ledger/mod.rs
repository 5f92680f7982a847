//! Trip ledger logic.
//!
//! This module implements the odometer trip rules:
//! - Odometer intervals and the per-vehicle interval index
//! - Trip, vehicle and soft-delete domain types
//! - Ordering, mileage-floor and overlap validation
//! - The trip ledger service used by repositories
//! - The error taxonomy shared by trips, receipts and year locks

pub mod error;
pub mod interval;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use error::{ErrorKind, LedgerError};
pub use interval::{MAX_ODOMETER, OdometerIndex, OdometerInterval};
pub use service::TripLedgerService;
pub use types::{RecordState, Trip, TripFields, VehicleInfo};
pub use validation::{validate_mileage_floor, validate_no_overlap, validate_odometer_order, validate_trip};
