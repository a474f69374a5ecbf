//! Dispenser fleet engine: ingestion, alert fan-out, and fleet status.

pub mod app;
pub mod config;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod services;

pub use app::{create_engine, Engine};
pub use config::Config;
pub use error::IngestError;
