//! Run statistics and the latency sketch backing them.
use pdatastructs::tdigest::{TDigest, K1};
use std::fmt;
use std::time::Duration;

const TDIGEST_BACKLOG_SIZE: usize = 100;

/// Results of a completed scenario run.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// Number of virtual users held for the whole run.
    pub vus: u32,
    pub success: u64,
    pub error: u64,
    /// Wall-clock time the workers were running.
    pub elapsed: Duration,
    pub latency_p50: Duration,
    pub latency_p90: Duration,
    pub latency_p99: Duration,
}

impl RunStatistics {
    pub fn total(&self) -> u64 {
        self.success + self.error
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.
        } else {
            self.error as f64 / self.total() as f64
        }
    }

    /// Measured transactions per second over the full window.
    pub fn tps(&self) -> f64 {
        if self.elapsed.is_zero() {
            0.
        } else {
            self.total() as f64 / self.elapsed.as_secs_f64()
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vus | {} requests ({:.1}% errors) in {:.1}s | {:.1} tps | latency p50 {:.1}ms p90 {:.1}ms p99 {:.1}ms",
            self.vus,
            self.total(),
            self.error_rate() * 100.,
            self.elapsed.as_secs_f64(),
            self.tps(),
            as_millis(self.latency_p50),
            as_millis(self.latency_p90),
            as_millis(self.latency_p99),
        )
    }
}

fn as_millis(dur: Duration) -> f64 {
    dur.as_secs_f64() * 1_000.
}

/// T-digest over observed request latencies.
#[derive(Debug)]
pub(crate) struct LatencyDigest {
    digest: TDigest<K1>,
    count: u64,
}

impl LatencyDigest {
    pub fn new() -> Self {
        Self {
            digest: TDigest::new(K1::new(10.), TDIGEST_BACKLOG_SIZE),
            count: 0,
        }
    }

    pub fn insert(&mut self, latency: Duration) {
        self.digest.insert(latency.as_secs_f64());
        self.count += 1;
    }

    pub fn quantile(&self, quantile: f64) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }

        // The t-digest occasionally returns NaN; filter rather than panic in
        // Duration::from_secs_f64.
        let secs = self.digest.quantile(quantile);
        if secs.is_finite() {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }
}
