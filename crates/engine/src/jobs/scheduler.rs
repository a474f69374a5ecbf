//! Periodic background jobs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A recurring task. A failing run is logged and the schedule keeps
/// ticking.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    /// Delay between runs. The first run happens one interval after
    /// startup, never during it.
    fn interval(&self) -> Duration;

    async fn run(&self) -> anyhow::Result<()>;
}

pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    stop: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            stop: watch::channel(false).0,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let handle = tokio::spawn(run_job(Arc::clone(job), self.stop.subscribe()));
            self.handles.push(handle);
        }
    }

    pub fn shutdown(&self) {
        let _ = self.stop.send(true);
    }

    /// Drain every job loop, giving up after the timeout.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let drain = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!("Job shutdown timed out after {:?}", timeout);
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_job(job: Arc<dyn Job>, mut stop: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(job.interval());
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let started = std::time::Instant::now();
                if let Err(e) = job.run().await {
                    error!(
                        job = job.name(),
                        elapsed_ms = started.elapsed().as_millis(),
                        error = %e,
                        "Job failed"
                    );
                }
            }
            _ = stop.changed() => {
                if *stop.borrow() {
                    info!(job = job.name(), "Job stopping");
                    return;
                }
            }
        }
    }
}
