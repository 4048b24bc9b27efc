use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Same default address as the service this stands in for.
const ADDR: &str = "0.0.0.0:8080";
const SERVICE_NAME: &str = "mock-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_service=debug")),
        )
        .init();

    let addr: SocketAddr = ADDR.parse()?;
    mock_service::run(addr, SERVICE_NAME).await
}
