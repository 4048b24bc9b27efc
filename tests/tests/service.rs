mod utils;
#[allow(unused)]
use utils::*;

use anyhow::Result;
use mock_service::MockService;
use std::time::{Duration, Instant};

#[tokio::test]
async fn health_returns_the_documented_body() -> Result<()> {
    init();
    let server = MockService::start("test-service").await?;

    let body: serde_json::Value = reqwest::get(format!("{}/health", server.base_url()))
        .await?
        .error_for_status()?
        .json()
        .await?;

    assert_eq!(body["service"], "test-service");
    assert!(body["id"].is_string(), "expected a uuid, got {body}");
    assert_eq!(server.stats().requests_total(), 1);
    Ok(())
}

#[tokio::test]
async fn delayed_health_adds_latency() -> Result<()> {
    init();
    let server = MockService::start("test-service").await?;

    let start = Instant::now();
    let response = reqwest::get(format!("{}/health/delay/ms/50", server.base_url())).await?;

    assert!(response.status().is_success());
    assert!(start.elapsed() >= Duration::from_millis(50));
    Ok(())
}

#[tokio::test]
async fn every_instance_tracks_its_own_stats() -> Result<()> {
    init();
    let a = MockService::start("a").await?;
    let b = MockService::start("b").await?;

    reqwest::get(format!("{}/health", a.base_url())).await?;

    assert_eq!(a.stats().requests_total(), 1);
    assert_eq!(b.stats().requests_total(), 0);
    Ok(())
}
