//! Core business logic for Milebook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state transitions live here.
//!
//! # Modules
//!
//! - `ledger` - Odometer trip validation, interval index, and the error taxonomy
//! - `receipt` - Fuel and expense receipt validation
//! - `yearlock` - Tax-year lock state machine and yearly totals
//! - `vehicle` - Vehicle enrollment rules
//! - `auth` - Actors and their capabilities

pub mod auth;
pub mod ledger;
pub mod receipt;
pub mod vehicle;
pub mod yearlock;
