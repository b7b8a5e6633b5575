//! Retry and backoff for page fetches.
//!
//! Errors are classified (timeouts, throttling, connection failures, 5xx)
//! and retried with capped exponential backoff. Anything else, including a
//! 404, fails on the first attempt.

use crate::error::FetchError;
use crate::fetch::PageSource;
use lyrics_model::RetryConfig;
use std::time::Duration;

/// High-level classification of a fetch error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request timed out.
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, truncated body).
    Connection,
    /// Retryable server error that isn't throttling.
    Http5xx(u16),
    /// Anything else (not retried).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff with an attempt limit and a delay cap.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
            max_delay: config.max_delay(),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Throttled
            | ErrorKind::Http5xx(_) => {
                // base * 2^(attempt-1), capped
                let exp = 1u32 << attempt.saturating_sub(1).min(16);
                let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}

pub fn classify_http_status(status: u16) -> ErrorKind {
    match status {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(status),
        _ => ErrorKind::Other,
    }
}

pub fn classify(err: &FetchError) -> ErrorKind {
    match err {
        FetchError::Status { status, .. } => classify_http_status(*status),
        FetchError::Body { source, .. } => {
            if source.is_timeout() {
                ErrorKind::Timeout
            } else {
                ErrorKind::Connection
            }
        }
        FetchError::Transport { source, .. } => {
            if source.is_timeout() {
                ErrorKind::Timeout
            } else if source.is_connect() || source.is_request() {
                ErrorKind::Connection
            } else {
                ErrorKind::Other
            }
        }
    }
}

/// Fetch `url`, sleeping and retrying while the policy allows it.
pub async fn fetch_with_retry<S: PageSource>(
    source: &S,
    policy: &RetryPolicy,
    url: &str,
) -> Result<String, FetchError> {
    let mut attempt = 1u32;
    loop {
        match source.fetch(url).await {
            Ok(body) => return Ok(body),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            },
        }
    }
}
