//! Debounced catalog search.
//!
//! [`SearchController`] owns the search text and filter selection. Every
//! edit is captured immediately, but the catalog fetch only starts once the
//! edits have been quiet for the debounce delay. A newer edit cancels and
//! restarts the pending timer.
//!
//! # Fetch ordering
//!
//! Each fetch gets a generation number. Fetches already in flight are never
//! cancelled, but when one completes after a newer fetch has started, its
//! result is discarded. The displayed catalog therefore always belongs to
//! the most recently issued fetch.
//!
//! Results are published on a `tokio::sync::watch` channel; see
//! [`SearchController::subscribe`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use candy_market_core::{CatalogQuery, FilterSelection};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::Gateway;
use crate::catalog::{CatalogState, fetch_catalog};

struct Shared {
    state: watch::Sender<CatalogState>,
    generation: AtomicU64,
    issued: AtomicU64,
}

/// Search text and filters bound to a debounced catalog fetch.
///
/// Must be used from within a Tokio runtime.
pub struct SearchController<G: Gateway + 'static> {
    gateway: Arc<G>,
    query: CatalogQuery,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl<G: Gateway + 'static> SearchController<G> {
    /// Create a controller with the default query. Nothing is fetched until
    /// [`mount`](Self::mount).
    pub fn new(gateway: Arc<G>, delay: Duration) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            gateway,
            query: CatalogQuery::default(),
            delay,
            pending: None,
            shared: Arc::new(Shared {
                state,
                generation: AtomicU64::new(0),
                issued: AtomicU64::new(0),
            }),
        }
    }

    /// Fetch immediately with the current query.
    pub fn mount(&mut self) {
        self.search_now();
    }

    /// Replace the search text; the fetch is debounced.
    pub fn set_text(&mut self, text: &str) {
        self.query.set_text(text);
        self.schedule();
    }

    /// Replace the filter selection; the fetch is debounced.
    pub fn set_filters(&mut self, filters: FilterSelection) {
        self.query.filters = filters;
        self.schedule();
    }

    /// Edit the filter selection in place; the fetch is debounced.
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterSelection)) {
        edit(&mut self.query.filters);
        self.schedule();
    }

    /// Cancel any pending timer and fetch right away.
    pub fn search_now(&mut self) {
        self.cancel_pending();
        start_fetch(&self.gateway, &self.shared, self.query.clone());
    }

    /// Cancel the pending timer. In-flight fetches run to completion.
    pub fn teardown(&mut self) {
        self.cancel_pending();
    }

    /// Receive every catalog state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.shared.state.subscribe()
    }

    /// A snapshot of the catalog state.
    #[must_use]
    pub fn state(&self) -> CatalogState {
        self.shared.state.borrow().clone()
    }

    /// The current query, including edits not yet fetched.
    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Number of fetches started so far.
    #[must_use]
    pub fn fetches_issued(&self) -> u64 {
        self.shared.issued.load(Ordering::SeqCst)
    }

    /// Whether a debounce timer is waiting to fire.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn schedule(&mut self) {
        self.cancel_pending();

        let gateway = Arc::clone(&self.gateway);
        let shared = Arc::clone(&self.shared);
        let query = self.query.clone();
        let delay = self.delay;

        debug!(?delay, "Catalog fetch scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            start_fetch(&gateway, &shared, query);
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<G: Gateway + 'static> Drop for SearchController<G> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Start a fetch on its own task so cancelling a timer never cancels it.
fn start_fetch<G: Gateway + 'static>(gateway: &Arc<G>, shared: &Arc<Shared>, query: CatalogQuery) {
    let mut generation = 0;
    shared.state.send_modify(|state| {
        generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.begin_fetch();
    });
    shared.issued.fetch_add(1, Ordering::SeqCst);

    let gateway = Arc::clone(gateway);
    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        let result = fetch_catalog(gateway.as_ref(), &query).await;

        // Checked under the channel lock: a newer fetch bumps the generation
        // inside `send_modify`, so it cannot slip in between check and write
        shared.state.send_if_modified(|state| {
            let latest = shared.generation.load(Ordering::SeqCst);
            if latest != generation {
                debug!(generation, latest, "Discarding superseded catalog response");
                return false;
            }
            match result {
                Ok(products) => {
                    debug!(generation, count = products.len(), "Catalog updated");
                    state.finish_ok(products);
                }
                Err(e) => {
                    warn!(error = %e, "Catalog fetch failed");
                    state.finish_err(&e);
                }
            }
            true
        });
    });
}
