use crate::config::ScenarioConfig;
use crate::error::Error;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;

/// Maps the scenario options onto a `reqwest::Client`.
///
/// Connection reuse is controlled through the idle pool: with a pool size of
/// zero every connection is dropped after its request, so each iteration
/// performs a fresh handshake.
pub(crate) fn build(config: &ScenarioConfig) -> Result<Client, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.referer).map_err(|source| Error::InvalidHeader {
            header: "Referer",
            source,
        })?,
    );

    let mut builder = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .danger_accept_invalid_certs(config.insecure_skip_tls_verify);

    if !config.reuse_connections {
        builder = builder.pool_max_idle_per_host(0);
    }

    builder.build().map_err(Error::Client)
}
