//! Pagination module
//!
//! Drives a page-numbered search endpoint one page at a time and exposes the
//! result as an incrementally growing list.
//!
//! # Overview
//!
//! - `PaginatedFetchController` - cursor, accumulated items, fetch lifecycle
//! - `PageCursor` - page/total bookkeeping
//! - `FetchState` / `StateSubscription` - the observable lifecycle
//!
//! ```text
//! idle ──fetch──▶ fetching ──ok──▶ success
//!                    │    ◀──fetch──┘
//!                    └──fail──▶ error ──fetch──▶ fetching
//! ```

mod controller;
mod stream;
mod types;

pub use controller::PaginatedFetchController;
pub use stream::StateSubscription;
pub use types::{FetchState, PageCursor};
