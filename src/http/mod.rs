//! HTTP transport module
//!
//! Provides the transport seam used by the fetch controller and its GitHub
//! implementation.
//!
//! # Features
//!
//! - **Search Transport**: `SearchTransport` trait, one call per page
//! - **User Lookup**: `UserLookup` trait for owner display names
//! - **GitHub Client**: reqwest-backed implementation of both
//! - **Rate Limit Tracking**: header-driven pre-flight checks

mod client;
mod rate_limit;
mod transport;

pub use client::GitHubClient;
pub use rate_limit::{
    parse_rate_limit, RateLimitSnapshot, RateLimitStatus, RateLimitTracker, REMAINING_HEADER,
    RESET_HEADER,
};
pub use transport::{SearchResponse, SearchTransport, UserLookup};

#[cfg(test)]
mod tests;
