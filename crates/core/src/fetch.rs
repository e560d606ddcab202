//! Page fetching.
//!
//! One [`Fetcher`] is created per crawl run and owns a single HTTP client
//! reused across every request. Pacing is a rate-limit floor — a minimum
//! delay between consecutive requests, not a token bucket — and failures
//! are retried a fixed number of times with linearly growing backoff.

use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::config::{ErrorHandling, SiteSection};
use crate::{CorkscrewError, Result};

/// HTTP client configuration for a crawl run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Minimum seconds between consecutive requests.
    pub rate_limit: f64,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Base backoff in seconds; attempt `n` waits `retry_delay * n`.
    pub retry_delay: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; Corkscrew/1.0; +https://github.com/stormlightlabs/corkscrew)"
                .to_string(),
            rate_limit: 1.0,
            max_retries: 3,
            retry_delay: 2,
        }
    }
}

impl FetchConfig {
    /// Builds a fetch configuration from the site config sections.
    pub fn from_site(site: &SiteSection, errors: &ErrorHandling) -> Self {
        let defaults = Self::default();
        Self {
            timeout: site.timeout,
            user_agent: if site.user_agent.is_empty() { defaults.user_agent } else { site.user_agent.clone() },
            rate_limit: site.rate_limit,
            max_retries: errors.max_retries,
            retry_delay: errors.retry_delay,
        }
    }
}

/// Seconds to wait before the next request given the time since the last
/// one: `max(0, rate_limit - elapsed)`.
fn rate_limit_wait(rate_limit: f64, elapsed: f64) -> f64 {
    (rate_limit - elapsed).max(0.0)
}

/// Fetches pages over one shared HTTP session with pacing and retries.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    last_request: Option<Instant>,
}

impl Fetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`CorkscrewError::HttpError`] if the client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(CorkscrewError::HttpError)?;

        Ok(Self { client, config, last_request: None })
    }

    /// Sleeps out the remainder of the rate-limit window, then stamps the
    /// request time.
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let wait = rate_limit_wait(self.config.rate_limit, last.elapsed().as_secs_f64());
            if wait > 0.0 {
                sleep(Duration::from_secs_f64(wait)).await;
            }
        }

        self.last_request = Some(Instant::now());
    }

    /// Fetches a page body, retrying with linear backoff.
    ///
    /// A non-200 status counts as a failed attempt. After the final
    /// attempt the last failure is returned.
    ///
    /// # Errors
    ///
    /// [`CorkscrewError::InvalidUrl`], [`CorkscrewError::Timeout`],
    /// [`CorkscrewError::HttpStatus`], or [`CorkscrewError::HttpError`].
    pub async fn fetch(&mut self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| CorkscrewError::InvalidUrl(format!("{}: {}", url, e)))?;

        self.pace().await;

        let mut last_error = None;

        for attempt in 1..=self.config.max_retries + 1 {
            info!(url, attempt, "fetching");

            let response = self
                .client
                .get(parsed.clone())
                .header("User-Agent", &self.config.user_agent)
                .header(
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .header("Accept-Language", "en-US,en;q=0.9")
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    return response.text().await.map_err(CorkscrewError::HttpError);
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    warn!(url, status, attempt, "non-success status");
                    last_error = Some(CorkscrewError::HttpStatus { status, url: url.to_string() });
                }
                Err(e) => {
                    warn!(url, attempt, error = %e, "request failed");
                    last_error = Some(if e.is_timeout() {
                        CorkscrewError::Timeout { timeout: self.config.timeout }
                    } else {
                        CorkscrewError::HttpError(e)
                    });
                }
            }

            if attempt <= self.config.max_retries {
                sleep(Duration::from_secs(self.config.retry_delay * u64::from(attempt))).await;
            }
        }

        Err(last_error.unwrap_or_else(|| CorkscrewError::HttpStatus { status: 0, url: url.to_string() }))
    }
}
