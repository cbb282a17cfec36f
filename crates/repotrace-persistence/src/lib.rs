//! Persistence layer for RepoTrace.
//!
//! This crate owns the only piece of global mutable state in RepoTrace: the
//! display-mode preference. Values are written with atomic file operations
//! (write to temp file, then rename) so a crash never leaves a torn file.
//!
//! # Example
//!
//! ```no_run
//! use repotrace_persistence::{FilePreferences, NoopRoot, PreferenceStore};
//! use repotrace_models::DisplayMode;
//!
//! let storage = FilePreferences::new("/home/user/.repotrace/state");
//! let mut store = PreferenceStore::load(Box::new(storage), Box::new(NoopRoot));
//!
//! store.set(DisplayMode::Light);
//! assert_eq!(store.mode(), DisplayMode::Light);
//! ```

pub mod atomic;
pub mod error;
pub mod preference;

pub use error::{PersistenceError, Result};
pub use preference::{
    FilePreferences, MemoryPreferences, NoopRoot, PreferenceStorage, PreferenceStore,
    PresentationRoot, PREFERENCES_FILE, THEME_KEY,
};
