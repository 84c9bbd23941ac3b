//! Opportunity listing core.
//!
//! Everything between the raw UI inputs (category tab, search text) and the
//! slice of opportunities on screen:
//!
//! - [`fetcher`] - HTTP client for `/api/opportunities/{category}`
//! - [`cache`] - per-session result cache keyed by `(category, query)`
//! - [`debounce`] - coalesces rapid search keystrokes
//! - [`filter`] - authoritative client-side substring filter
//! - [`paginator`] - prefix-growing "load more" pagination
//! - [`session`] - the `Idle → Loading → Ready | Error` state machine tying
//!   the above together
//!
//! # Example
//!
//! ```ignore
//! use wealthsage::listing::{Category, ListingClient, ListingSession};
//!
//! let client = ListingClient::new(reqwest::Client::new(), "http://localhost:8000")?;
//! let mut session = ListingSession::new();
//! session.load(&client, Category::Scholarships, "").await;
//! for opportunity in session.displayed() {
//!     println!("{}", opportunity.title);
//! }
//! ```

pub mod cache;
pub mod debounce;
pub mod fetcher;
pub mod filter;
pub mod paginator;
pub mod session;
mod types;

pub use cache::{Listing, ResultCache};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use fetcher::{FetchError, ListingClient};
pub use filter::filter_opportunities;
pub use paginator::{Paginator, PAGE_SIZE};
pub use session::{ListingSession, LoadState, LoadTicket};
pub use types::{CacheKey, Category, Opportunity, OpportunityType, UnknownCategory};
