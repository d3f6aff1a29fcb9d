use crate::domain::UserId;
use dashmap::DashMap;
use recipe_errors::AppError;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub per_minute: u32,
    pub per_hour: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            per_minute: 30,
            per_hour: 300,
        }
    }
}

#[derive(Clone)]
struct RequestRecord {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl Default for RequestRecord {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// Fixed-window limiter on write requests, one record per user.
#[derive(Clone)]
pub struct RateLimiter {
    limits: RateLimits,
    requests: Arc<DashMap<UserId, RequestRecord>>,
    last_cleanup: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn check_rate_limit(&self, user_id: &UserId) -> Result<(), RateLimitError> {
        self.maybe_cleanup();

        let now = Instant::now();
        let mut record = self.requests.entry(user_id.clone()).or_default();

        if now.duration_since(record.minute_start) > MINUTE {
            record.minute_count = 0;
            record.minute_start = now;
        }

        if now.duration_since(record.hour_start) > HOUR {
            record.hour_count = 0;
            record.hour_start = now;
        }

        if record.minute_count >= self.limits.per_minute {
            let wait = MINUTE.saturating_sub(now.duration_since(record.minute_start));
            tracing::warn!("Rate limit hit by {} (per minute)", user_id);
            return Err(RateLimitError::TooManyRequestsPerMinute(wait.as_secs()));
        }

        if record.hour_count >= self.limits.per_hour {
            let wait = HOUR.saturating_sub(now.duration_since(record.hour_start));
            tracing::warn!("Rate limit hit by {} (per hour)", user_id);
            return Err(RateLimitError::TooManyRequestsPerHour(wait.as_secs()));
        }

        record.minute_count += 1;
        record.hour_count += 1;

        Ok(())
    }

    fn maybe_cleanup(&self) {
        let mut last_cleanup = self.last_cleanup.lock().unwrap_or_else(PoisonError::into_inner);
        if last_cleanup.elapsed() > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            if let Some(cutoff) = Instant::now().checked_sub(HOUR) {
                self.requests.retain(|_, v| v.hour_start > cutoff);
            }
            *last_cleanup = Instant::now();
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimits::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("too many requests this minute, retry in {0}s")]
    TooManyRequestsPerMinute(u64),
    #[error("too many requests this hour, retry in {0}s")]
    TooManyRequestsPerHour(u64),
}

impl RateLimitError {
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::TooManyRequestsPerMinute(secs) | Self::TooManyRequestsPerHour(secs) => *secs,
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::RateLimited(err.retry_after_secs())
    }
}
