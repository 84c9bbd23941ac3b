//! WealthSage opportunities browser.
//!
//! The library half of the crate holds everything that does not touch the
//! terminal: the listing core (fetch, cache, debounce, filter, paginate),
//! persisted stores, configuration, and small text/URL helpers. The binary
//! in `main.rs` wires these into the terminal dashboard.

pub mod app;
pub mod config;
pub mod listing;
pub mod print;
pub mod storage;
pub mod ui;
pub mod util;
