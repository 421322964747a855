//! Transport seams
//!
//! The fetch controller only talks to these traits, so tests can script
//! responses and a different backend can be swapped in.

use super::rate_limit::RateLimitSnapshot;
use crate::error::Result;
use crate::types::{SearchPage, User};
use async_trait::async_trait;

/// A decoded search page plus the rate limit headers it came with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    /// Decoded payload
    pub page: SearchPage,
    /// Present only when both rate limit headers were sent
    pub rate_limit: Option<RateLimitSnapshot>,
}

impl SearchResponse {
    /// Wrap a page without rate limit information
    pub fn new(page: SearchPage) -> Self {
        Self {
            page,
            rate_limit: None,
        }
    }

    /// Attach rate limit information
    #[must_use]
    pub fn with_rate_limit(mut self, snapshot: RateLimitSnapshot) -> Self {
        self.rate_limit = Some(snapshot);
        self
    }
}

/// Fetches one page of search results
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Request page `page` (1-based) with `per_page` items
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<SearchResponse>;
}

/// Resolves account details for an owner login
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Fetch the account behind `login`
    async fn fetch_user(&self, login: &str) -> Result<User>;
}
