//! Rate limit tracking
//!
//! Caches the `X-RateLimit-Remaining` / `X-RateLimit-Reset` values of the
//! last successful response and predicts whether the next request would be
//! rejected. The prediction is only a pre-flight guess; the server stays the
//! source of truth.

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::HeaderMap;

/// Header carrying the number of requests left in the current window
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Header carrying the window reset time in Unix seconds
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate limit values taken from one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Requests left in the current window
    pub remaining: u32,
    /// When the window resets
    pub reset_at: DateTime<Utc>,
}

impl RateLimitSnapshot {
    /// Create a snapshot
    pub fn new(remaining: u32, reset_at: DateTime<Utc>) -> Self {
        Self {
            remaining,
            reset_at,
        }
    }

    /// Create a snapshot from a Unix-seconds reset value
    pub fn from_unix(remaining: u32, reset_unix_secs: i64) -> Option<Self> {
        DateTime::from_timestamp(reset_unix_secs, 0).map(|reset_at| Self::new(remaining, reset_at))
    }
}

/// Outcome of a pre-flight rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitStatus {
    /// The next request is certain to be rejected
    pub is_limit_reached: bool,
    /// Whole seconds until the window resets, never negative
    pub seconds_remaining_to_reset: u64,
}

/// Header-driven rate limit tracker
#[derive(Debug, Clone, Default)]
pub struct RateLimitTracker {
    snapshot: Option<RateLimitSnapshot>,
}

impl RateLimitTracker {
    /// Create a tracker with nothing recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached values
    pub fn record(&mut self, snapshot: RateLimitSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Overwrite the cached values from raw header numbers
    pub fn record_response_headers(&mut self, remaining: u32, reset_at: DateTime<Utc>) {
        self.record(RateLimitSnapshot::new(remaining, reset_at));
    }

    /// Last recorded values
    pub fn snapshot(&self) -> Option<RateLimitSnapshot> {
        self.snapshot
    }

    /// Check against the current wall clock
    pub fn evaluate(&self) -> RateLimitStatus {
        self.evaluate_at(Utc::now())
    }

    /// Check against a given instant
    pub fn evaluate_at(&self, now: DateTime<Utc>) -> RateLimitStatus {
        let Some(snapshot) = self.snapshot else {
            return RateLimitStatus::default();
        };

        let until_reset = (snapshot.reset_at - now).max(TimeDelta::zero());
        RateLimitStatus {
            is_limit_reached: snapshot.remaining == 0 && until_reset > TimeDelta::zero(),
            seconds_remaining_to_reset: until_reset.num_seconds() as u64,
        }
    }
}

/// Read the rate limit headers of a response.
///
/// Returns `None` unless both headers are present and numeric.
pub fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimitSnapshot> {
    let remaining = header_number::<u32>(headers, REMAINING_HEADER)?;
    let reset = header_number::<i64>(headers, RESET_HEADER)?;
    RateLimitSnapshot::from_unix(remaining, reset)
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}
