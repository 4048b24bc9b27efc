//! A stand-in for the service under test.
//!
//! Serves the `/health` endpoint the load scenario targets and records enough
//! about incoming requests (count, last seen `User-Agent` and `Referer`) for
//! tests to assert on what a client actually sent.
use axum::{
    debug_handler,
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Body served on `/health`.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub id: Uuid,
    pub service: String,
}

/// What the service has observed so far.
#[derive(Debug, Default)]
pub struct ServiceStats {
    requests: AtomicU64,
    last_user_agent: RwLock<Option<String>>,
    last_referer: RwLock<Option<String>>,
}

impl ServiceStats {
    pub fn requests_total(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn last_user_agent(&self) -> Option<String> {
        self.last_user_agent.read().unwrap().clone()
    }

    pub fn last_referer(&self) -> Option<String> {
        self.last_referer.read().unwrap().clone()
    }

    fn observe(&self, headers: &HeaderMap) {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let header_string = |name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        *self.last_user_agent.write().unwrap() = header_string(axum::http::header::USER_AGENT);
        *self.last_referer.write().unwrap() = header_string(axum::http::header::REFERER);
    }
}

struct AppState {
    service: String,
    stats: Arc<ServiceStats>,
}

pub fn router(service: &str, stats: Arc<ServiceStats>) -> Router {
    let state = Arc::new(AppState {
        service: service.to_string(),
        stats,
    });

    Router::new()
        .route("/health", get(health))
        .route("/health/delay/ms/:delay_ms", get(health_delayed))
        .with_state(state)
}

#[debug_handler]
async fn health(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<HealthCheckResponse> {
    state.stats.observe(&headers);
    debug!("health check");
    Json(HealthCheckResponse {
        id: Uuid::new_v4(),
        service: state.service.clone(),
    })
}

#[debug_handler]
async fn health_delayed(
    State(state): State<Arc<AppState>>,
    Path(delay_ms): Path<u64>,
    headers: HeaderMap,
) -> Json<HealthCheckResponse> {
    state.stats.observe(&headers);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Json(HealthCheckResponse {
        id: Uuid::new_v4(),
        service: state.service.clone(),
    })
}

/// Serve forever on a fixed address. Used by the standalone binary.
pub async fn run(addr: SocketAddr, service: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("serving {service} on {addr}");
    axum::serve(listener, router(service, Arc::default())).await?;
    Ok(())
}

/// A service instance on an ephemeral port, for tests.
pub struct MockService {
    addr: SocketAddr,
    stats: Arc<ServiceStats>,
    handle: JoinHandle<()>,
}

impl MockService {
    pub async fn start(service: &str) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let stats = Arc::new(ServiceStats::default());
        let app = router(service, stats.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            addr,
            stats,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
