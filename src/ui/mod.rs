//! Terminal dashboard.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard handling for browse, search and help modes
//! - `render` - layout and view dispatch
//! - `tabs` - category tabs and search bar
//! - `opportunities` - opportunity list and detail pane
//! - `status` - status bar
//! - `help` - keybinding overlay

mod help;
mod input;
mod loop_runner;
mod opportunities;
mod render;
mod status;
mod tabs;

pub use loop_runner::{run, Action};
