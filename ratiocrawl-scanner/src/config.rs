use std::time::Duration;

/// Scheme prepended to schemeless start URLs
pub const DEFAULT_URL_PROTOCOL: &str = "https";
pub const OUTPUT_FILE: &str = "output.tsv";
pub const LOG_FILE: &str = "app.log";
/// Total attempts per fetch, the first one included
pub const DEFAULT_RETRY_COUNT: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_secs(1);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

const USER_AGENT: &str = concat!("ratiocrawl/", env!("CARGO_PKG_VERSION"));

/// How a single fetch is retried after a timeout or transport error.
///
/// The delay before attempt `n + 1` is `base_backoff * 2^(n - 1)` plus a
/// uniform jitter drawn from `[0, max_jitter)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_backoff: Duration,
    pub max_jitter: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_backoff: Duration, max_jitter: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_backoff,
            max_jitter,
        }
    }

    /// Delay to sleep after the given failed attempt (1-based), jitter excluded
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_backoff.saturating_mul(1u32 << exponent)
    }

    pub fn jitter(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        self.max_jitter.mul_f64(fastrand::f64())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_COUNT, DEFAULT_BACKOFF, DEFAULT_MAX_JITTER)
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub max_in_flight: usize,
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}
