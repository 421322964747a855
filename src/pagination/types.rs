//! Pagination types
//!
//! The fetch lifecycle states and the page cursor bookkeeping used by the
//! controller.

use std::fmt;

/// Lifecycle of the paginated fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Nothing requested yet. Never re-entered.
    #[default]
    Idle,
    /// A request is outstanding
    Fetching,
    /// The last request delivered a page
    Success,
    /// The last request failed with this message
    Error(String),
}

impl FetchState {
    /// Check if a request is outstanding
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }

    /// Check if this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Error message, if this is an error
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Fetching => write!(f, "fetching"),
            Self::Success => write!(f, "success"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Page cursor and total-count bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// 1-based page the next request asks for
    next_page: u32,
    /// Last reported total, capped at `max_search_limit`; 0 means unknown
    total_count: u64,
    /// `ceil(total_count / items_per_page)`
    max_pages: u64,
    items_per_page: u32,
    max_search_limit: u64,
}

impl PageCursor {
    /// Create a cursor positioned on the first page
    pub fn new(items_per_page: u32, max_search_limit: u64) -> Self {
        Self {
            next_page: 1,
            total_count: 0,
            max_pages: 0,
            items_per_page: items_per_page.max(1),
            max_search_limit,
        }
    }

    /// Page the next request asks for
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Capped total, 0 while unknown
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages the capped total spans
    pub fn max_pages(&self) -> u64 {
        self.max_pages
    }

    /// Page size
    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Whether the next response starts a new list
    pub fn is_first_page(&self) -> bool {
        self.next_page == 1
    }

    /// Rewind to page 1 and forget the total.
    ///
    /// `max_pages` is left alone; with an unknown total it is not consulted.
    pub fn reset(&mut self) {
        self.next_page = 1;
        self.total_count = 0;
    }

    /// Permissive while the total is unknown
    pub fn has_next_page(&self) -> bool {
        if self.total_count == 0 {
            return true;
        }
        u64::from(self.next_page) <= self.max_pages
    }

    /// Advance past a successfully received page
    pub fn record_page(&mut self, reported_total: u64) {
        self.next_page = self.next_page.saturating_add(1);
        self.total_count = reported_total.min(self.max_search_limit);
        self.max_pages = self.total_count.div_ceil(u64::from(self.items_per_page));
    }
}
