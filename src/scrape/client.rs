//! Shared HTTP client factory.
//!
//! One configured client is built at registry construction and shared
//! read-only by every dispatched scrape. Connection pooling is internal to
//! the client and thread-safe.

use std::time::Duration;

use reqwest::redirect;

use super::error::ScrapeError;
use crate::config::ScraperConfig;

/// Timeout for scraper HTTP requests. Includes transfer time.
const SCRAPE_GET_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum number of idle connections the client keeps per host.
const MAX_IDLE_CONNS_PER_HOST: usize = 8;

/// Maximum number of redirects the client will follow.
pub const MAX_REDIRECTS: usize = 20;

/// Build the scraper-local HTTP client used throughout the scraper subsystem.
///
/// TLS certificate verification follows the cert-check toggle; the proxy is
/// taken from the configuration when set, from the environment otherwise.
/// Exceeding [`MAX_REDIRECTS`] fails the request with a redirect error
/// ([`reqwest::Error::is_redirect`]), distinct from transport failures.
pub fn build_client(config: &ScraperConfig) -> Result<reqwest::Client, ScrapeError> {
    let redirect_policy = redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error(format!("gave up after {} redirects", MAX_REDIRECTS))
        } else {
            attempt.follow()
        }
    });

    let mut builder = reqwest::Client::builder()
        .timeout(SCRAPE_GET_TIMEOUT)
        .pool_max_idle_per_host(MAX_IDLE_CONNS_PER_HOST)
        .redirect(redirect_policy)
        .danger_accept_invalid_certs(!config.cert_check);

    if !config.user_agent.is_empty() {
        builder = builder.user_agent(config.user_agent.clone());
    }

    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy).map_err(ScrapeError::Client)?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(ScrapeError::Client)
}

/// Whether `err` was raised by the client's redirect policy.
pub fn is_redirect_cap(err: &reqwest::Error) -> bool {
    err.is_redirect()
}
