use crate::config::{CrawlConfig, RetryPolicy};
use crate::error::{Result, ScanError};
use reqwest::{Client, StatusCode};
use tracing::{debug, error, warn};
use url::Url;

/// Single-page HTTP GET with a timeout envelope and bounded retries
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(50)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    /// Fetch `url`, returning the body on HTTP 200.
    ///
    /// Every failure is soft and comes back as `None`: a non-200 status, a
    /// malformed URL (never retried), or timeouts and transport errors that
    /// outlast the retry policy.
    pub async fn fetch_page(&self, url: &str) -> Option<Vec<u8>> {
        let target = match validate_url(url) {
            Ok(target) => target,
            Err(e) => {
                error!("Invalid URL for crawling: {}", e);
                return None;
            }
        };

        for attempt in 1..=self.retry.attempts {
            match self.attempt(&target).await {
                Ok(body) => return body,
                Err(ScanError::HttpError(e)) if e.is_builder() => {
                    error!("Invalid URL for crawling: {}: {}", url, e);
                    return None;
                }
                Err(ScanError::HttpError(e)) if e.is_timeout() => {
                    warn!(
                        "Request timed out for url {} (attempt {}/{})",
                        url, attempt, self.retry.attempts
                    );
                }
                Err(e) => {
                    warn!(
                        "HTTP client error for {} (attempt {}/{}): {}",
                        url, attempt, self.retry.attempts, e
                    );
                }
            }

            if attempt < self.retry.attempts {
                let delay = self.retry.backoff_for(attempt) + self.retry.jitter();
                debug!("Retrying {} in {:?}", url, delay);
                tokio::time::sleep(delay).await;
            }
        }

        error!("Failed to fetch {} after {} attempts", url, self.retry.attempts);
        None
    }

    async fn attempt(&self, url: &Url) -> Result<Option<Vec<u8>>> {
        debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("Got status {} for {}, skipping", status, url);
            return Ok(None);
        }

        let body = response.bytes().await?;
        Ok(Some(body.to_vec()))
    }
}

/// Only absolute http(s) URLs with a host can be fetched
fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScanError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            url,
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ScanError::InvalidUrl(format!("{}: missing host", url)));
    }

    Ok(parsed)
}
