//! Background job that records fleet health.

use std::sync::Arc;
use std::time::Duration;

use metrics::gauge;
use persistence::PgTelemetryStore;
use tracing::info;

use super::scheduler::Job;
use crate::services::FleetStatusAggregator;

/// Periodically aggregates fleet status and publishes the roll-up as
/// gauges and a structured log line.
pub struct FleetStatusJob {
    aggregator: Arc<FleetStatusAggregator<PgTelemetryStore>>,
}

impl FleetStatusJob {
    pub fn new(aggregator: Arc<FleetStatusAggregator<PgTelemetryStore>>) -> Self {
        Self { aggregator }
    }
}

#[async_trait::async_trait]
impl Job for FleetStatusJob {
    fn name(&self) -> &'static str {
        "fleet_status"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(60)
    }

    async fn run(&self) -> anyhow::Result<()> {
        let summary = self.aggregator.summary().await?;

        gauge!("fleet_devices_total").set(summary.total_devices as f64);
        gauge!("fleet_devices_active").set(summary.active as f64);
        gauge!("fleet_devices_offline").set(summary.offline as f64);
        gauge!("fleet_alerts_tamper").set(summary.tamper as f64);
        gauge!("fleet_alerts_empty").set(summary.empty as f64);
        gauge!("fleet_alerts_low").set(summary.low as f64);
        gauge!("fleet_alerts_battery").set(summary.battery_alerts as f64);
        gauge!("fleet_alerts_power").set(summary.power_alerts as f64);

        info!(
            total = summary.total_devices,
            active = summary.active,
            offline = summary.offline,
            tamper = summary.tamper,
            empty = summary.empty,
            low = summary.low,
            battery_alerts = summary.battery_alerts,
            power_alerts = summary.power_alerts,
            "Fleet status"
        );

        Ok(())
    }
}
