use std::time::Duration;

use anyhow::Result;
use tracing::info;

use engine::jobs::{FleetStatusJob, JobScheduler, PoolMetricsJob};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = engine::Config::load()?;

    engine::logging::init_logging(&config.logging);

    info!("Starting dispenser fleet engine v{}", env!("CARGO_PKG_VERSION"));

    let db: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = db.connect().await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let app = engine::create_engine(&config, pool.clone())?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(FleetStatusJob::new(app.aggregator.clone()));
    scheduler.register(PoolMetricsJob::new(pool));
    scheduler.start();

    info!("Engine ready");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}
