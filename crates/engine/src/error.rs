//! Engine error types.

use domain::services::StoreError;

/// Errors surfaced by the ingestion pipeline. Delivery failures are not
/// represented here; fan-out isolates them per target.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Unknown device: {0}")]
    DeviceNotFound(i64),

    #[error("Invalid sample: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
