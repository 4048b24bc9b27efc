//! Scenario configuration and defaults.
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

/// User agent sent with every request.
///
/// Substituted at compile time from the package metadata, so a rebuild under a
/// different name or version updates the header with no runtime templating.
pub const USER_AGENT: &str = concat!(
    "rust-",
    env!("CARGO_PKG_NAME"),
    "-loadtest/",
    env!("CARGO_PKG_VERSION")
);

/// Referer sent with every request, also baked in at compile time.
pub const REFERER: &str = concat!(env!("CARGO_PKG_NAME"), "-loadtest/test");

pub const DEFAULT_VUS: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(10) };
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);
pub const DEFAULT_TARGET: &str = "http://localhost:8080";

/// Path requested on the target, once per VU iteration.
pub const HEALTH_PATH: &str = "/health";

/// Settings for a single health-check load scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    /// Base URL of the service under test. [`HEALTH_PATH`] is appended.
    pub target: String,
    /// Number of concurrent virtual users held for the whole run.
    pub vus: NonZeroU32,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    /// Accept invalid TLS certificates on the target.
    pub insecure_skip_tls_verify: bool,
    /// When false, every request opens a fresh connection.
    pub reuse_connections: bool,
    pub user_agent: String,
    pub referer: String,
}

impl ScenarioConfig {
    pub fn new(name: &str, target: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            target: target.into(),
            vus: DEFAULT_VUS,
            duration: DEFAULT_DURATION,
            insecure_skip_tls_verify: false,
            reuse_connections: true,
            user_agent: USER_AGENT.to_string(),
            referer: REFERER.to_string(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::new("health_check", DEFAULT_TARGET)
    }
}
