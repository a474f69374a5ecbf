//! Service assembly.

use std::sync::Arc;

use domain::alerting::Classifier;
use domain::services::{LiveChannel, MockPushService, PushService, TelemetryStore};
use persistence::PgTelemetryStore;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::services::{
    BroadcastLiveChannel, ExpoPushService, FanoutDispatcher, FleetStatusAggregator,
    IngestionService,
};

/// The wired-up engine. An embedding layer (HTTP, MQTT, replay tooling)
/// feeds samples to `ingestion` and subscribes sessions through `live`.
pub struct Engine {
    pub store: Arc<PgTelemetryStore>,
    pub live: Arc<BroadcastLiveChannel>,
    pub ingestion: Arc<IngestionService>,
    pub aggregator: Arc<FleetStatusAggregator<PgTelemetryStore>>,
}

pub fn create_engine(config: &Config, pool: PgPool) -> anyhow::Result<Engine> {
    let store = Arc::new(PgTelemetryStore::new(pool));
    let live = Arc::new(BroadcastLiveChannel::new(config.fanout.broadcast_capacity));

    // Seam-typed handles; the concrete Arcs stay on the Engine struct.
    let store_seam: Arc<dyn TelemetryStore> = store.clone();
    let live_seam: Arc<dyn LiveChannel> = live.clone();

    let push: Arc<dyn PushService> = if config.push.enabled {
        Arc::new(ExpoPushService::new(config.push.clone())?)
    } else {
        info!("Push delivery disabled, dropping pushes on the floor");
        Arc::new(MockPushService::new())
    };

    let dispatcher = Arc::new(FanoutDispatcher::new(
        store_seam.clone(),
        live_seam,
        push,
        config.fanout.clone(),
    ));

    let ingestion = Arc::new(IngestionService::new(
        store_seam,
        Classifier::default(),
        dispatcher,
    ));

    let aggregator = Arc::new(FleetStatusAggregator::new(
        Arc::clone(&store),
        Classifier::default(),
        &config.fleet,
    ));

    Ok(Engine {
        store,
        live,
        ingestion,
        aggregator,
    })
}
