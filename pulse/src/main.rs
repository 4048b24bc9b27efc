use anyhow::Result;
use clap::Parser;
use pulse::config::{DEFAULT_TARGET, DEFAULT_VUS, USER_AGENT};
use pulse::prelude::*;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Run a fixed number of virtual users against a `/health` endpoint.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about)]
struct Cli {
    /// Base URL of the service under test.
    #[arg(long, env = "PULSE_TARGET", default_value = DEFAULT_TARGET)]
    target: String,

    /// Number of concurrent virtual users.
    #[arg(long, env = "PULSE_VUS", default_value_t = DEFAULT_VUS)]
    vus: NonZeroU32,

    /// How long to run, e.g. `10s` or `2m`.
    #[arg(long, env = "PULSE_DURATION", default_value = "10s", value_parser = humantime::parse_duration)]
    duration: Duration,

    /// Accept invalid TLS certificates on the target.
    #[arg(long, env = "PULSE_INSECURE_SKIP_TLS_VERIFY")]
    insecure_skip_tls_verify: bool,

    /// Open a fresh connection for every request.
    #[arg(long, env = "PULSE_NO_CONNECTION_REUSE")]
    no_connection_reuse: bool,

    /// Override the default user agent.
    #[arg(long, env = "PULSE_USER_AGENT", default_value = USER_AGENT)]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pulse=info")),
        )
        .init();

    let cli = Cli::parse();

    let stats = health_check(&cli.target)
        .vus(cli.vus)
        .duration(cli.duration)
        .insecure_skip_tls_verify(cli.insecure_skip_tls_verify)
        .reuse_connections(!cli.no_connection_reuse)
        .user_agent(cli.user_agent)
        .await?;

    println!("{stats}");

    if stats.total() > 0 && stats.success == 0 {
        anyhow::bail!("all {} health checks against {} failed", stats.total(), cli.target);
    }

    Ok(())
}
