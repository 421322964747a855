//! # superstars
//!
//! A paginated, rate-limit-aware feed of the most starred GitHub
//! repositories for a language.
//!
//! ## Features
//!
//! - **Incremental Loading**: pages are appended to an in-memory list
//! - **Single Flight**: at most one request in flight per controller
//! - **Rate Limit Pre-emption**: requests that would certainly be rejected
//!   are never sent
//! - **Observable State**: every lifecycle transition is delivered to every
//!   subscriber, in order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use superstars::{GitHubClient, PaginatedFetchController, SearchConfig, FetchState};
//!
//! #[tokio::main]
//! async fn main() -> superstars::Result<()> {
//!     let config = SearchConfig::builder().language("rust").build();
//!     let client = Arc::new(GitHubClient::new(&config)?);
//!     let controller = PaginatedFetchController::new(client, &config)?;
//!
//!     let mut states = controller.subscribe();
//!     controller.fetch_first();
//!     while let Some(state) = states.recv().await {
//!         if state == FetchState::Success {
//!             println!("{} of {}", controller.current_count(), controller.total_count());
//!             if !controller.fetch_next() {
//!                 break;
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                PaginatedFetchController                  │
//! │  fetch_first() / fetch_next() → bool    subscribe()      │
//! │  current_count  total_count  item(i)    FetchState       │
//! └───────────────┬─────────────────────────────┬────────────┘
//!                 │                             │
//!        ┌────────┴─────────┐        ┌──────────┴──────────┐
//!        │ RateLimitTracker │        │   SearchTransport   │
//!        │ (header cache)   │        │   GitHubClient      │
//!        └──────────────────┘        └─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Wire and domain types
pub mod types;

/// Search configuration
pub mod config;

/// HTTP transport and rate limit tracking
pub mod http;

/// Paginated fetch controller
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::SearchConfig;
pub use error::{Error, ErrorKind, Result};
pub use http::{GitHubClient, RateLimitTracker, SearchTransport, UserLookup};
pub use pagination::{FetchState, PaginatedFetchController, StateSubscription};
pub use types::{Owner, RepositoryItem, SearchPage, User};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
