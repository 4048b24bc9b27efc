#![doc = include_str!("../README.md")]

pub mod config;
pub mod scenario;
pub mod stats;
pub mod transaction;

pub(crate) mod client;
pub(crate) mod runner;

mod error;

pub use config::{ScenarioConfig, REFERER, USER_AGENT};
pub use error::Error;
pub use scenario::{health_check, Scenario};
pub use stats::RunStatistics;
pub use transaction::{HealthCheckResponse, TransactionError};

pub mod prelude {
    pub use crate::config::ScenarioConfig;
    pub use crate::scenario::{health_check, Scenario};
    pub use crate::stats::RunStatistics;
}
