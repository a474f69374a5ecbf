//! Persistence layer for the dispenser fleet backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The Postgres-backed [`domain::services::TelemetryStore`]

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use store::PgTelemetryStore;
