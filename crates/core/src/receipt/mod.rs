//! Fuel and expense receipts.
//!
//! Receipts follow the trip lifecycle without odometer rules: they belong to
//! a vehicle, are filed under the year of their date, and are soft-deleted.

pub mod service;
pub mod types;

pub use service::ReceiptService;
pub use types::{Receipt, ReceiptFields};
