mod utils;
#[allow(unused)]
use utils::*;

use mock_service::MockService;
use pulse::prelude::*;
use std::num::NonZeroU32;
use std::time::Duration;

fn vus(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

#[tokio::test]
async fn steady_vus_produce_traffic_and_no_errors() {
    init();
    let server = MockService::start("pulse-e2e").await.unwrap();

    let stats = health_check(server.base_url())
        .vus(vus(4))
        .duration(Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(stats.vus, 4);
    assert!(stats.total() > 0, "expected at least one request");
    assert_eq!(stats.error, 0);
    assert_eq!(stats.error_rate(), 0.);
    assert!(stats.elapsed >= Duration::from_secs(1));
    assert!(stats.latency_p50 <= stats.latency_p99);

    // The server may additionally have seen requests that were still in
    // flight at the deadline.
    assert!(server.stats().requests_total() >= stats.total());
}

#[tokio::test]
async fn templated_headers_reach_the_service() {
    init();
    let server = MockService::start("pulse-e2e").await.unwrap();

    let stats = health_check(server.base_url())
        .vus(vus(1))
        .duration(Duration::from_millis(300))
        .await
        .unwrap();

    assert!(stats.success > 0);
    assert_eq!(
        server.stats().last_user_agent().as_deref(),
        Some(pulse::USER_AGENT)
    );
    assert_eq!(
        server.stats().last_referer().as_deref(),
        Some(pulse::REFERER)
    );
}

#[tokio::test]
async fn user_agent_override_is_forwarded() {
    init();
    let server = MockService::start("pulse-e2e").await.unwrap();

    health_check(server.base_url())
        .vus(vus(1))
        .duration(Duration::from_millis(300))
        .user_agent("custom-agent/9.9")
        .await
        .unwrap();

    assert_eq!(
        server.stats().last_user_agent().as_deref(),
        Some("custom-agent/9.9")
    );
}

#[tokio::test]
async fn fresh_connections_per_request_still_succeed() {
    init();
    let server = MockService::start("pulse-e2e").await.unwrap();

    let stats = health_check(server.base_url())
        .vus(vus(2))
        .duration(Duration::from_millis(500))
        .reuse_connections(false)
        .await
        .unwrap();

    assert!(stats.success > 0);
    assert_eq!(stats.error, 0);
}

#[tokio::test]
async fn unreachable_target_counts_every_request_as_an_error() {
    init();

    // Bind and immediately drop a listener so the port is (briefly) known to
    // refuse connections.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let stats = health_check(format!("http://{addr}"))
        .vus(vus(2))
        .duration(Duration::from_millis(300))
        .await
        .unwrap();

    assert_eq!(stats.success, 0);
    assert!(stats.error > 0);
    assert_eq!(stats.error_rate(), 1.);
}

#[tokio::test]
async fn zero_duration_run_shuts_down_cleanly() {
    init();
    let server = MockService::start("pulse-e2e").await.unwrap();

    let stats = health_check(server.base_url())
        .vus(vus(2))
        .duration(Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(stats.vus, 2);
    assert!(stats.elapsed < Duration::from_secs(1));
}
