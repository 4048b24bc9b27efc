//! Fixed-concurrency worker pool.
//!
//! Spawns exactly `vus` tasks which loop the health-check transaction until
//! the deadline, then aborts them and folds the shared counters into
//! [`RunStatistics`].
use crate::config::ScenarioConfig;
use crate::stats::{LatencyDigest, RunStatistics};
use crate::transaction::send_health_check;
use metrics_util::AtomicBucket;
use reqwest::{Client, Url};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, trace, warn};

pub(crate) async fn run(client: Client, url: Url, config: &ScenarioConfig) -> RunStatistics {
    let atomics = TaskAtomics::new(&config.name);
    let vus = config.vus.get();

    let start = Instant::now();
    let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(vus as usize);
    for vu in 0..vus {
        let client = client.clone();
        let url = url.clone();
        let atomics = atomics.clone();
        tasks.push(tokio::spawn(async move {
            trace!(vu, "virtual user started");
            loop {
                atomics.measure(send_health_check(&client, &url)).await;
            }
        }));
    }

    tokio::time::sleep(config.duration).await;
    let elapsed = start.elapsed();

    for task in &tasks {
        task.abort();
    }
    for task in tasks {
        // Cancellation is the expected outcome here.
        let _ = task.await;
    }

    atomics.collect(vus, elapsed)
}

/// Counters shared between the workers and the collector.
#[derive(Clone)]
struct TaskAtomics {
    success: Arc<AtomicU64>,
    error: Arc<AtomicU64>,
    latency: Arc<AtomicBucket<Duration>>,
    labels: MetricLabels,
}

impl TaskAtomics {
    fn new(scenario_name: &str) -> Self {
        Self {
            success: Arc::new(AtomicU64::new(0)),
            error: Arc::new(AtomicU64::new(0)),
            latency: Arc::new(AtomicBucket::new()),
            labels: MetricLabels::new(scenario_name),
        }
    }

    async fn measure<F, R, E>(&self, transaction: F)
    where
        F: std::future::Future<Output = Result<R, E>>,
        E: std::fmt::Display,
    {
        let start = Instant::now();
        let res = transaction.await;
        let elapsed = start.elapsed();

        self.latency.push(elapsed);
        #[cfg(feature = "metrics")]
        metrics::histogram!(self.labels.latency.clone()).record(elapsed.as_nanos() as f64);

        match res {
            Ok(_) => {
                self.success.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "metrics")]
                metrics::counter!(self.labels.success.clone()).increment(1);
            }
            Err(err) => {
                self.error.fetch_add(1, Ordering::Relaxed);
                debug!("health check failed: {err}");
                #[cfg(feature = "metrics")]
                metrics::counter!(self.labels.error.clone()).increment(1);
            }
        }
    }

    /// Only call once all workers have stopped, otherwise counts may be lost.
    fn collect(&self, vus: u32, elapsed: Duration) -> RunStatistics {
        let success = self.success.swap(0, Ordering::Relaxed);
        let error = self.error.swap(0, Ordering::Relaxed);

        let mut digest = LatencyDigest::new();
        self.latency.clear_with(|latencies| {
            for latency in latencies {
                digest.insert(*latency);
            }
        });

        RunStatistics {
            vus,
            success,
            error,
            elapsed,
            latency_p50: digest.quantile(0.5),
            latency_p90: digest.quantile(0.9),
            latency_p99: digest.quantile(0.99),
        }
    }
}

#[derive(Clone)]
struct MetricLabels {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    success: String,
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    error: String,
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    latency: String,
}

impl MetricLabels {
    fn new(scenario_name: &str) -> Self {
        Self {
            success: format!("{scenario_name}.success"),
            error: format!("{scenario_name}.error"),
            latency: format!("{scenario_name}.latency"),
        }
    }
}
