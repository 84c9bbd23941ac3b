//! Utility functions for common operations.
//!
//! - **Text**: terminal-width truncation, previews, deadline formatting,
//!   control-character stripping for scraped text
//! - **URL validation**: checks before opening opportunity links
//! - **Files**: atomic replace for the JSON stores

mod fs;
mod text;
mod url_validator;

pub use fs::atomic_write;
pub use text::{
    display_width, format_deadline, strip_control_chars, truncate_text, truncate_to_width,
    DESCRIPTION_PREVIEW_CHARS,
};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum allowed search query length
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
