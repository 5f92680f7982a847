//! Shared types, errors, and configuration for Milebook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error categories
//! - Identity token claims and validation
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod jwt_tests;

pub use auth::Claims;
pub use config::{AppConfig, AuthConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
