//! Engine services: delivery channels and the pipelines that drive them.

pub mod aggregator;
pub mod dispatcher;
pub mod expo_push;
pub mod ingestion;
pub mod live;

pub use aggregator::FleetStatusAggregator;
pub use dispatcher::{DispatchOutcome, FanoutDispatcher};
pub use expo_push::{ExpoPushError, ExpoPushService};
pub use ingestion::{IngestSummary, IngestionService};
pub use live::BroadcastLiveChannel;
