//! Store instrumentation.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Snapshot the connection pool gauges. Meant to be called from a
/// periodic job rather than the query path.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("store_pool_connections_total").set(size as f64);
    gauge!("store_pool_connections_idle").set(idle as f64);
    gauge!("store_pool_connections_active").set(size.saturating_sub(idle) as f64);
}

/// Times one store query. Query names are static so the label set
/// stays bounded.
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn start(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    pub fn finish(self) {
        histogram!("store_query_duration_seconds", "query" => self.query)
            .record(self.started.elapsed().as_secs_f64());
    }
}
