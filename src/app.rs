//! Dashboard application state.
//!
//! `App` owns the listing session, the search debouncer and both persisted
//! stores. It never awaits network I/O itself: fetches are spawned as tasks
//! that report back through an [`AppEvent`] channel, and the UI loop feeds
//! those events into [`App::handle_event`].

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::listing::{
    CacheKey, Category, Debouncer, FetchError, ListingClient, ListingSession, LoadState,
    LoadTicket, Opportunity,
};
use crate::storage::{PendingWrite, SavedStore, SnapshotStore};
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};

/// How long transient status messages stay visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Events delivered from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A listing fetch finished (successfully or not).
    ListingLoaded {
        ticket: LoadTicket,
        result: Result<Vec<Opportunity>, FetchError>,
    },
}

/// Which list the main panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Listing for the active category tab
    Browse,
    /// Bookmarked opportunities across all categories
    Saved,
}

pub struct App {
    pub client: ListingClient,
    pub session: ListingSession,
    pub search: Debouncer<String>,
    pub search_mode: bool,
    /// Raw search text as typed (the session holds the committed query)
    pub search_input: String,
    pub view: View,
    pub selected: usize,
    pub saved: SavedStore,
    pub snapshots: SnapshotStore,
    pub status_message: Option<(String, Instant)>,
    pub show_help: bool,
    /// Loading spinner animation frame
    pub spinner_frame: usize,
    pub needs_redraw: bool,
    /// Last queued store write; each write waits for the one before it
    write_tail: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(
        client: ListingClient,
        debounce: Duration,
        saved: SavedStore,
        snapshots: SnapshotStore,
    ) -> Self {
        Self {
            client,
            session: ListingSession::new(),
            search: Debouncer::new(debounce),
            search_mode: false,
            search_input: String::new(),
            view: View::Browse,
            selected: 0,
            saved,
            snapshots,
            status_message: None,
            show_help: false,
            spinner_frame: 0,
            needs_redraw: true,
            write_tail: None,
        }
    }

    /// Seed the listing cache with unfiltered snapshots that are still fresh.
    ///
    /// Returns how many categories were primed.
    pub fn prime_from_snapshots(&mut self) -> usize {
        let now = Utc::now();
        let mut primed = 0;
        for category in Category::ALL {
            if let Some(items) = self
                .snapshots
                .get_fresh_as::<Vec<Opportunity>>(category.as_str(), now)
            {
                tracing::debug!(category = %category, count = items.len(), "Priming cache from snapshot");
                self.session
                    .prime(CacheKey::new(category, ""), Arc::from(items));
                primed += 1;
            }
        }
        primed
    }

    // ========================================================================
    // Listing control
    // ========================================================================

    /// Switch tabs. Clears the search like the web dashboard does.
    pub fn select_category(&mut self, category: Category, event_tx: &mpsc::Sender<AppEvent>) {
        self.search.cancel();
        self.search_input.clear();
        self.search_mode = false;
        self.view = View::Browse;
        self.selected = 0;
        let ticket = self.session.select(category, "");
        self.dispatch(ticket, event_tx);
    }

    /// Record a keystroke's worth of search text; commits after the debounce.
    pub fn update_search(&mut self, input: String) {
        if input.len() > MAX_SEARCH_QUERY_LENGTH {
            self.set_status(format!(
                "Search query at max length ({} chars)",
                MAX_SEARCH_QUERY_LENGTH
            ));
            return;
        }
        self.search_input = input;
        self.search.push(self.search_input.clone());
    }

    /// Commit the debounced query if its window has elapsed.
    pub fn poll_search(&mut self, event_tx: &mpsc::Sender<AppEvent>) -> bool {
        match self.search.poll_ready() {
            Some(query) => {
                self.commit_query(&query, event_tx);
                true
            }
            None => false,
        }
    }

    /// Commit a search query immediately, bypassing the debounce window.
    pub fn commit_query(&mut self, query: &str, event_tx: &mpsc::Sender<AppEvent>) {
        self.search.cancel();
        if query.trim() == self.session.query() && self.session.state() != LoadState::Idle {
            return;
        }
        tracing::debug!(query = %query, "Committing search query");
        self.selected = 0;
        let ticket = self.session.select(self.session.category(), query);
        self.dispatch(ticket, event_tx);
    }

    /// Invalidate the current category and fetch again (also the retry action).
    pub fn refresh(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        self.selected = 0;
        let ticket = self.session.refresh();
        self.set_status(format!("Refreshing {}...", ticket.category));
        self.dispatch(Some(ticket), event_tx);
    }

    pub fn load_more(&mut self) {
        if !self.session.load_more() {
            self.set_status("No more opportunities");
        }
    }

    /// Spawn the fetch for `ticket`, if any.
    fn dispatch(&mut self, ticket: Option<LoadTicket>, event_tx: &mpsc::Sender<AppEvent>) {
        let Some(ticket) = ticket else {
            self.clamp_selection();
            return;
        };

        let client = self.client.clone();
        let tx = event_tx.clone();
        tracing::debug!(key = %ticket.key, generation = ticket.generation, "Spawning listing fetch");

        tokio::spawn(async move {
            let result = ticket.fetch(&client).await;
            if let Err(e) = tx.send(AppEvent::ListingLoaded { ticket, result }).await {
                tracing::warn!(error = %e, "Failed to deliver listing (receiver dropped)");
            }
        });
    }

    // ========================================================================
    // Background events
    // ========================================================================

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ListingLoaded { ticket, result } => self.handle_listing_loaded(ticket, result),
        }
    }

    fn handle_listing_loaded(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Opportunity>, FetchError>,
    ) {
        // Only unfiltered listings are worth reusing at startup
        if let Ok(items) = &result {
            if ticket.query.is_empty() {
                match self
                    .snapshots
                    .put_deferred(ticket.category.as_str(), items, Utc::now())
                {
                    Ok(write) => self.persist(write),
                    Err(e) => {
                        tracing::warn!(category = %ticket.category, error = %e, "Failed to encode snapshot")
                    }
                }
            }
        }

        if self.session.complete(&ticket, result) {
            self.clamp_selection();
            self.needs_redraw = true;
        }
    }

    // ========================================================================
    // Selection and actions
    // ========================================================================

    /// Number of rows in the active list.
    pub fn list_len(&self) -> usize {
        match self.view {
            View::Browse => self.session.displayed_count(),
            View::Saved => self.saved.len(),
        }
    }

    pub fn selected_opportunity(&self) -> Option<&Opportunity> {
        match self.view {
            View::Browse => self.session.displayed().get(self.selected),
            View::Saved => self.saved.items().get(self.selected).map(|s| &s.opportunity),
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.list_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    pub fn clamp_selection(&mut self) {
        let len = self.list_len();
        self.selected = if len == 0 { 0 } else { self.selected.min(len - 1) };
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Browse => View::Saved,
            View::Saved => View::Browse,
        };
        self.selected = 0;
    }

    pub fn toggle_saved(&mut self) {
        let Some(opportunity) = self.selected_opportunity().cloned() else {
            return;
        };
        match self.saved.toggle_deferred(&opportunity, Utc::now()) {
            Ok((true, write)) => {
                self.persist(write);
                self.set_status(format!("Saved: {}", opportunity.title));
            }
            Ok((false, write)) => {
                self.persist(write);
                self.set_status(format!("Removed: {}", opportunity.title));
                self.clamp_selection();
            }
            Err(e) => self.set_status(format!("Could not update saved list: {}", e)),
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Queue a store write on the blocking pool.
    ///
    /// Writes run one at a time in submission order, so a later snapshot of
    /// a store can never be overwritten by an earlier one.
    fn persist(&mut self, write: PendingWrite) {
        let previous = self.write_tail.take();
        self.write_tail = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            let path = write.path().display().to_string();
            match tokio::task::spawn_blocking(move || write.commit()).await {
                Ok(Ok(())) => tracing::trace!(path = %path, "Store written"),
                Ok(Err(e)) => tracing::warn!(path = %path, error = %e, "Failed to write store"),
                Err(e) => tracing::error!(path = %path, error = %e, "Store write task failed"),
            }
        }));
    }

    /// Wait for every queued store write to finish.
    pub async fn flush_writes(&mut self) {
        if let Some(tail) = self.write_tail.take() {
            if let Err(e) = tail.await {
                tracing::error!(error = %e, "Store write task failed");
            }
        }
    }

    /// Open the selected opportunity's link in the system browser.
    pub fn open_selected(&mut self) {
        let Some(link) = self.selected_opportunity().map(|o| o.link.clone()) else {
            return;
        };
        match validate_url_for_open(&link) {
            Ok(url) => match open::that(url.as_str()) {
                Ok(()) => self.set_status("Opened in browser"),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to open browser");
                    self.set_status(format!("Failed to open browser: {}", e));
                }
            },
            Err(e) => self.set_status(format!("Cannot open link: {}", e)),
        }
    }

    // ========================================================================
    // Status bar
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop the status message once it has expired. Returns whether it did.
    pub fn clear_expired_status(&mut self) -> bool {
        match &self.status_message {
            Some((_, at)) if at.elapsed() >= STATUS_TTL => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }
}
