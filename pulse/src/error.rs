use thiserror::Error;

/// Errors which prevent a scenario from running at all.
///
/// Failures of individual requests are not errors at this level; they are
/// counted in [`RunStatistics`](crate::RunStatistics).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid target url `{url}`: {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("invalid header value for `{header}`")]
    InvalidHeader {
        header: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
}
