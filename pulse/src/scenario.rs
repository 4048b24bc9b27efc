//! Scenario construction and the run loop driving it.
use crate::client;
use crate::config::{ScenarioConfig, HEALTH_PATH};
use crate::error::Error;
use crate::runner;
use crate::stats::RunStatistics;
use reqwest::Url;
use std::{
    future::Future,
    num::NonZeroU32,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
#[allow(unused_imports)]
use tracing::{debug, info, instrument, warn};

/// Creates the health-check scenario against the given base URL.
///
/// The returned [`Scenario`] is configured with the fluent methods and run by
/// awaiting it:
///
/// ```no_run
/// use pulse::prelude::*;
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), pulse::Error> {
///     let stats = health_check("http://localhost:8080")
///         .vus(NonZeroU32::new(10).unwrap())
///         .duration(Duration::from_secs(10))
///         .await?;
///     println!("{stats}");
///     Ok(())
/// }
/// ```
pub fn health_check(target: impl Into<String>) -> Scenario {
    Scenario::new(ScenarioConfig::new("health_check", target))
}

/// A configured load scenario; awaiting it performs the run.
#[pin_project::pin_project]
pub struct Scenario {
    config: ScenarioConfig,
    runner_fut: Option<Pin<Box<dyn Future<Output = Result<RunStatistics, Error>> + Send>>>,
}

impl Scenario {
    fn new(config: ScenarioConfig) -> Self {
        Self {
            config,
            runner_fut: None,
        }
    }

    /// Builds a scenario from an already-populated config (used by the CLI).
    pub fn from_config(config: ScenarioConfig) -> Self {
        Self::new(config)
    }

    /// Number of virtual users to hold for the whole run.
    pub fn vus(mut self, vus: NonZeroU32) -> Self {
        self.config.vus = vus;
        self
    }

    /// How long to run the scenario.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Accept invalid TLS certificates on the target.
    pub fn insecure_skip_tls_verify(mut self, skip: bool) -> Self {
        self.config.insecure_skip_tls_verify = skip;
        self
    }

    /// When disabled, every request opens a fresh connection.
    pub fn reuse_connections(mut self, reuse: bool) -> Self {
        self.config.reuse_connections = reuse;
        self
    }

    /// Overrides the compile-time default user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Overrides the compile-time default referer.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.config.referer = referer.into();
        self
    }

    /// Name used in logs and metric labels.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }
}

impl Future for Scenario {
    type Output = Result<RunStatistics, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.runner_fut.is_none() {
            let config = self.config.clone();
            self.runner_fut = Some(Box::pin(run_scenario(config)));
        }

        if let Some(runner) = &mut self.runner_fut {
            runner.as_mut().poll(cx)
        } else {
            unreachable!()
        }
    }
}

#[instrument(name = "scenario", skip_all, fields(name = config.name))]
async fn run_scenario(config: ScenarioConfig) -> Result<RunStatistics, Error> {
    let url = endpoint(&config.target)?;
    let client = client::build(&config)?;

    info!(
        "running {} against {url} with {} vus for {}",
        config.name,
        config.vus,
        humantime::format_duration(config.duration),
    );

    let stats = runner::run(client, url, &config).await;

    info!("scenario complete: {stats}");

    Ok(stats)
}

fn endpoint(target: &str) -> Result<Url, Error> {
    let raw = format!("{}{}", target.trim_end_matches('/'), HEALTH_PATH);
    Url::parse(&raw).map_err(|err| Error::InvalidTarget {
        url: raw,
        reason: err.to_string(),
    })
}
