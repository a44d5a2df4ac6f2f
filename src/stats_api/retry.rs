use reqwest::header::HeaderMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Remaining quota below which every response logs a warning
const LOW_QUOTA_THRESHOLD: u64 = 3;
/// Slack added on top of the server-reported reset time
const RESET_SLACK_SECS: i64 = 2;

/// Counts every outgoing request; reset by the tracker at the start of a cycle
#[derive(Debug, Clone, Default)]
pub struct RequestCounter(Arc<AtomicU64>);

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Waits applied by the client between attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts for transient failures (429 responses are not counted)
    pub max_attempts: u32,
    /// Linear backoff unit: attempt `i` (0-based) waits `(i + 1) * backoff_step`
    pub backoff_step: Duration,
    /// Minimum wait after a 429, even when the reset hint is sooner
    pub rate_limit_floor: Duration,
    /// Wait after a 429 that carries no reset hint
    pub rate_limit_fallback: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(5),
            rate_limit_floor: Duration::from_secs(60),
            rate_limit_fallback: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn backoff(&self, attempt_index: u32) -> Duration {
        self.backoff_step * (attempt_index + 1)
    }

    /// Wait after a 429: until the reset time plus slack, never below the floor
    pub fn rate_limit_wait(&self, reset_at: Option<i64>, now: i64) -> Duration {
        match reset_at {
            Some(reset_at) => {
                let until_reset = (reset_at - now + RESET_SLACK_SECS).max(0) as u64;
                Duration::from_secs(until_reset).max(self.rate_limit_floor)
            }
            None => self.rate_limit_fallback,
        }
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Reset time (unix seconds) advertised by a rate-limited response
pub fn reset_hint(headers: &HeaderMap) -> Option<i64> {
    header_number(headers, RATE_LIMIT_RESET_HEADER)
}

/// Logs the quota headers; warns when the remaining quota is nearly spent
pub fn inspect_rate_limit(headers: &HeaderMap) -> Option<u64> {
    let remaining: u64 = header_number(headers, RATE_LIMIT_REMAINING_HEADER)?;
    let limit: Option<u64> = header_number(headers, RATE_LIMIT_LIMIT_HEADER);

    debug!(remaining, limit = ?limit, "Rate limit status");
    if remaining < LOW_QUOTA_THRESHOLD {
        warn!(remaining, limit = ?limit, "Stats API quota nearly exhausted");
    }

    Some(remaining)
}
