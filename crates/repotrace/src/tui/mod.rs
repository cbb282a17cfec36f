//! Terminal User Interface for RepoTrace.
//!
//! Provides a single-screen TUI with:
//! - Header showing the app name and display mode
//! - Input line for the repository reference
//! - Error banner when the last analysis failed
//! - Report view when the last analysis succeeded
//! - Status bar with a working indicator
//! - Footer with keybindings

mod app;
mod events;
mod input;
mod theme;
mod ui;

pub use app::{App, Notice};
pub use events::run;
pub use theme::{Palette, ThemeRoot};
