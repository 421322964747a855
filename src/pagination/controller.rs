//! Paginated fetch controller
//!
//! Single source of truth for the page cursor, the accumulated items and
//! the fetch lifecycle. At most one request is in flight at a time; the
//! in-progress check and the switch to [`FetchState::Fetching`] happen under
//! the same lock.

use super::stream::{StateBroadcaster, StateSubscription};
use super::types::{FetchState, PageCursor};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::http::{
    RateLimitSnapshot, RateLimitStatus, RateLimitTracker, SearchResponse, SearchTransport,
};
use crate::types::RepositoryItem;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Incrementally growing, rate-limit-aware search result list
pub struct PaginatedFetchController {
    shared: Arc<Shared>,
    runtime: Handle,
}

struct Shared {
    transport: Arc<dyn SearchTransport>,
    core: Mutex<Core>,
}

struct Core {
    state: FetchState,
    cursor: PageCursor,
    items: Vec<RepositoryItem>,
    rate_limit: RateLimitTracker,
    broadcaster: StateBroadcaster,
}

impl Core {
    /// Change state and notify subscribers while the lock is held, so a
    /// subscriber that sees the new state also sees the data behind it.
    fn transition(&mut self, state: FetchState) {
        self.state = state;
        self.broadcaster.emit(&self.state);
    }
}

impl PaginatedFetchController {
    /// Create a controller on the current Tokio runtime
    pub fn new(transport: Arc<dyn SearchTransport>, config: &SearchConfig) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|_| Error::config("fetch controller must be created inside a Tokio runtime"))?;
        Ok(Self::with_runtime(transport, config, runtime))
    }

    /// Create a controller that spawns its requests on `runtime`
    pub fn with_runtime(
        transport: Arc<dyn SearchTransport>,
        config: &SearchConfig,
        runtime: Handle,
    ) -> Self {
        let core = Core {
            state: FetchState::Idle,
            cursor: PageCursor::new(config.effective_items_per_page(), config.max_search_limit),
            items: Vec::new(),
            rate_limit: RateLimitTracker::new(),
            broadcaster: StateBroadcaster::default(),
        };

        Self {
            shared: Arc::new(Shared {
                transport,
                core: Mutex::new(core),
            }),
            runtime,
        }
    }

    // ------------------------------------------------------------------------
    // Observable state
    // ------------------------------------------------------------------------

    /// Current lifecycle state
    pub fn state(&self) -> FetchState {
        self.shared.lock().state.clone()
    }

    /// Subscribe to every future state transition
    pub fn subscribe(&self) -> StateSubscription {
        self.shared.lock().broadcaster.subscribe()
    }

    /// Number of subscriptions still being listened to
    pub fn subscriber_count(&self) -> usize {
        self.shared.lock().broadcaster.len()
    }

    /// Whether a request is outstanding
    pub fn is_fetch_in_progress(&self) -> bool {
        self.shared.lock().state.is_fetching()
    }

    /// Number of accumulated items
    pub fn current_count(&self) -> usize {
        self.shared.lock().items.len()
    }

    /// Last reported total, capped at the search limit; 0 while unknown
    pub fn total_count(&self) -> u64 {
        self.shared.lock().cursor.total_count()
    }

    /// 1-based page the next request will ask for
    pub fn next_page_to_load(&self) -> u32 {
        self.shared.lock().cursor.next_page()
    }

    /// Number of pages the known total spans
    pub fn max_pages(&self) -> u64 {
        self.shared.lock().cursor.max_pages()
    }

    /// Page size used for every request
    pub fn items_per_page(&self) -> u32 {
        self.shared.lock().cursor.items_per_page()
    }

    /// Whether `fetch_next` would be allowed to request another page
    pub fn has_next_page(&self) -> bool {
        self.shared.lock().cursor.has_next_page()
    }

    /// Item at `index`, or `None` past the end
    pub fn item(&self, index: usize) -> Option<RepositoryItem> {
        self.shared.lock().items.get(index).cloned()
    }

    /// Copy of the accumulated items
    pub fn items(&self) -> Vec<RepositoryItem> {
        self.shared.lock().items.clone()
    }

    /// Store a display name looked up for the owner of the item at `index`
    pub fn set_owner_name(&self, index: usize, name: impl Into<String>) -> bool {
        let mut core = self.shared.lock();
        match core.items.get_mut(index) {
            Some(item) => {
                item.owner.name = Some(name.into());
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Rate limiting
    // ------------------------------------------------------------------------

    /// Pre-flight rate limit check against the last recorded headers
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.shared.lock().rate_limit.evaluate()
    }

    /// Last recorded rate limit headers
    pub fn rate_limit_snapshot(&self) -> Option<RateLimitSnapshot> {
        self.shared.lock().rate_limit.snapshot()
    }

    /// Seed the tracker, e.g. with headers seen by another client
    pub fn record_rate_limit(&self, snapshot: RateLimitSnapshot) {
        self.shared.lock().rate_limit.record(snapshot);
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Start a new session from page 1.
    ///
    /// Returns `false` without doing anything if a request is in flight.
    /// The accumulated list is kept until the first page arrives.
    pub fn fetch_first(&self) -> bool {
        let mut core = self.shared.lock();
        if core.state.is_fetching() {
            debug!("fetch_first ignored, a request is in flight");
            return false;
        }

        info!("Starting a new fetch session");
        core.cursor.reset();
        self.start_request(core);
        true
    }

    /// Request the next page of the current session.
    ///
    /// Returns `false` if a request is in flight or the known total has
    /// been exhausted.
    pub fn fetch_next(&self) -> bool {
        let core = self.shared.lock();
        if core.state.is_fetching() {
            debug!("fetch_next ignored, a request is in flight");
            return false;
        }
        if !core.cursor.has_next_page() {
            debug!(
                "fetch_next ignored, page {} is past the last page {}",
                core.cursor.next_page(),
                core.cursor.max_pages()
            );
            return false;
        }

        self.start_request(core);
        true
    }

    fn start_request(&self, mut core: MutexGuard<'_, Core>) {
        core.transition(FetchState::Fetching);

        let status = core.rate_limit.evaluate();
        if status.is_limit_reached {
            let error = Error::rate_limited(status.seconds_remaining_to_reset);
            warn!("Request pre-empted: {}", error);
            core.transition(FetchState::Error(error.to_string()));
            return;
        }

        let page = core.cursor.next_page();
        let per_page = core.cursor.items_per_page();
        debug!(
            "Loading page {}/{} ({} per page), {} items of {}",
            page,
            core.cursor.max_pages(),
            per_page,
            core.items.len(),
            core.cursor.total_count()
        );
        drop(core);

        let transport = Arc::clone(&self.shared.transport);
        let controller: Weak<Shared> = Arc::downgrade(&self.shared);
        self.runtime.spawn(async move {
            let result = AssertUnwindSafe(transport.fetch_page(page, per_page))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(Error::Other(panic_message(panic.as_ref()))));
            match controller.upgrade() {
                Some(shared) => shared.complete(page, result),
                None => debug!("Controller dropped, discarding response for page {}", page),
            }
        });
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, page: u32, result: Result<SearchResponse>) {
        let mut core = self.lock();

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                warn!("Failed to load page {}: {}", page, error);
                core.transition(FetchState::Error(error.to_string()));
                return;
            }
        };

        if core.cursor.is_first_page() {
            core.items.clear();
        }
        core.cursor.record_page(response.page.total_count);
        core.items.extend(response.page.items);
        if let Some(snapshot) = response.rate_limit {
            core.rate_limit.record(snapshot);
        }

        debug!(
            "Loaded page {}, {} items of {}",
            page,
            core.items.len(),
            core.cursor.total_count()
        );
        core.transition(FetchState::Success);
    }
}

/// Error text for a request whose transport panicked
fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("Request failed unexpectedly: {detail}")
}

impl std::fmt::Debug for PaginatedFetchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.shared.lock();
        f.debug_struct("PaginatedFetchController")
            .field("state", &core.state)
            .field("cursor", &core.cursor)
            .field("current_count", &core.items.len())
            .finish_non_exhaustive()
    }
}
