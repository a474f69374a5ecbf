//! Background job scheduler and job implementations.

mod fleet_status;
mod pool_metrics;
mod scheduler;

pub use fleet_status::FleetStatusJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobScheduler};
