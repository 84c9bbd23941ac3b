use std::sync::Arc;

use super::cache::{Listing, ResultCache};
use super::fetcher::{FetchError, ListingClient};
use super::filter::filter_opportunities;
use super::paginator::Paginator;
use super::types::{CacheKey, Category, Opportunity};

/// Lifecycle of the current category/query selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing selected yet
    Idle,
    /// A fetch for the current selection is outstanding
    Loading,
    /// Data for the current selection is displayed (possibly empty)
    Ready,
    /// The last fetch for the current selection failed
    Error,
}

/// A fetch the session wants performed.
///
/// Hand it to [`ListingSession::complete`] together with the fetch result.
/// The generation lets the session discard responses that arrive after the
/// user has already moved on to another selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub key: CacheKey,
    pub category: Category,
    pub query: String,
}

impl LoadTicket {
    /// Perform the fetch this ticket describes.
    pub async fn fetch(&self, client: &ListingClient) -> Result<Vec<Opportunity>, FetchError> {
        client.fetch(self.category, &self.query).await
    }
}

/// State for one dashboard session: cache, current selection, filtered view
/// and pagination.
///
/// All mutation goes through `&mut self`, so the owner (the app) serializes
/// access and no locking is needed. Network I/O happens outside: `select` and
/// `refresh` return a [`LoadTicket`] when a fetch is required, and the result
/// is fed back through `complete`.
#[derive(Debug)]
pub struct ListingSession {
    cache: ResultCache,
    category: Category,
    query: String,
    /// Full listing for the current key, as fetched
    full: Listing,
    /// `full` after the client-side filter
    view: Listing,
    pager: Paginator,
    state: LoadState,
    error: Option<String>,
    generation: u64,
}

impl Default for ListingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingSession {
    pub fn new() -> Self {
        Self {
            cache: ResultCache::new(),
            category: Category::default(),
            query: String::new(),
            full: Arc::from(Vec::new()),
            view: Arc::from(Vec::new()),
            pager: Paginator::default(),
            state: LoadState::Idle,
            error: None,
            generation: 0,
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Switch to `(category, query)`.
    ///
    /// On a cache hit the data is shown immediately and `None` is returned
    /// (no loading state). On a miss the session enters `Loading` and returns
    /// the ticket to fetch.
    pub fn select(&mut self, category: Category, query: &str) -> Option<LoadTicket> {
        self.category = category;
        self.query = query.trim().to_string();
        self.generation = self.generation.wrapping_add(1);
        self.pager.reset();

        let key = self.current_key();
        if let Some(listing) = self.cache.lookup(&key) {
            tracing::debug!(key = %key, count = listing.len(), "Using cached listing");
            self.show(listing);
            return None;
        }

        Some(self.begin_load(key))
    }

    /// Drop cached listings for the current category and fetch again.
    ///
    /// Also the retry path out of `Error`.
    pub fn refresh(&mut self) -> LoadTicket {
        self.cache.invalidate_prefix(self.category);
        self.generation = self.generation.wrapping_add(1);
        self.pager.reset();
        let key = self.current_key();
        self.begin_load(key)
    }

    /// Apply the result of the fetch described by `ticket`.
    ///
    /// Successful results are cached under the ticket's key even when stale.
    /// Only the result for the current generation updates what is displayed.
    /// Returns whether the displayed state changed.
    pub fn complete(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<Opportunity>, FetchError>,
    ) -> bool {
        let is_current = ticket.generation == self.generation;

        match result {
            Ok(items) => {
                let listing: Listing = Arc::from(items);
                self.cache.store(ticket.key.clone(), listing.clone());
                if !is_current {
                    tracing::debug!(
                        expected = self.generation,
                        got = ticket.generation,
                        key = %ticket.key,
                        "Ignoring stale listing (generation mismatch)"
                    );
                    return false;
                }
                tracing::debug!(key = %ticket.key, count = listing.len(), "Listing loaded");
                self.show(listing);
                true
            }
            Err(e) => {
                if !is_current {
                    tracing::debug!(key = %ticket.key, error = %e, "Ignoring stale fetch error");
                    return false;
                }
                tracing::warn!(key = %ticket.key, error = %e, "Failed to load listing");
                self.full = Arc::from(Vec::new());
                self.view = Arc::from(Vec::new());
                self.state = LoadState::Error;
                self.error = Some(format!(
                    "Failed to fetch {} opportunities: {}",
                    ticket.category, e
                ));
                true
            }
        }
    }

    /// Reveal the next page of the current view. No-op when nothing is left.
    pub fn load_more(&mut self) -> bool {
        self.pager.load_more(self.view.len())
    }

    /// Select and, on a miss, fetch to completion.
    pub async fn load(&mut self, client: &ListingClient, category: Category, query: &str) {
        if let Some(ticket) = self.select(category, query) {
            let result = ticket.fetch(client).await;
            self.complete(&ticket, result);
        }
    }

    /// Refresh the current selection and fetch to completion.
    pub async fn reload(&mut self, client: &ListingClient) {
        let ticket = self.refresh();
        let result = ticket.fetch(client).await;
        self.complete(&ticket, result);
    }

    /// Seed the cache, e.g. from a persisted snapshot. Does not change the view.
    pub fn prime(&mut self, key: CacheKey, listing: Listing) {
        self.cache.store(key, listing);
    }

    fn begin_load(&mut self, key: CacheKey) -> LoadTicket {
        self.full = Arc::from(Vec::new());
        self.view = Arc::from(Vec::new());
        self.state = LoadState::Loading;
        self.error = None;
        LoadTicket {
            generation: self.generation,
            key,
            category: self.category,
            query: self.query.clone(),
        }
    }

    fn show(&mut self, listing: Listing) {
        self.view = if self.query.is_empty() {
            listing.clone()
        } else {
            Arc::from(filter_opportunities(&listing, &self.query))
        };
        self.full = listing;
        self.pager.reset();
        self.state = LoadState::Ready;
        self.error = None;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn category(&self) -> Category {
        self.category
    }

    /// Committed (debounced) query.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_key(&self) -> CacheKey {
        CacheKey::new(self.category, &self.query)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Currently visible prefix of the filtered listing.
    pub fn displayed(&self) -> &[Opportunity] {
        self.pager.visible(&self.view)
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed().len()
    }

    /// Items matching the committed query, visible or not.
    pub fn matched_count(&self) -> usize {
        self.view.len()
    }

    /// Size of the unfiltered listing for the current key.
    pub fn total_count(&self) -> usize {
        self.full.len()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.view.len())
    }

    pub fn has_data(&self) -> bool {
        !self.displayed().is_empty()
    }

    /// Full unfiltered listing for the current key.
    pub fn full_listing(&self) -> &Listing {
        &self.full
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}
