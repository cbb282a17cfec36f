//! RepoTrace CLI library.
//!
//! This crate provides the command-line interface and the interactive TUI
//! for RepoTrace.

pub mod cli;
pub mod commands;
pub mod tui;

use std::path::{Path, PathBuf};

use repotrace_core::config;
use repotrace_core::ReportExport;
use repotrace_persistence::atomic::atomic_write;
use repotrace_persistence::{FilePreferences, PreferenceStore, PresentationRoot};

/// Writes an exported report into `dir` and returns the file path.
pub fn save_export(dir: &Path, export: &ReportExport) -> repotrace_persistence::Result<PathBuf> {
    let path = dir.join(&export.filename);
    atomic_write(&path, export.contents.as_bytes())?;
    Ok(path)
}

/// Loads the preference store backed by the state directory.
pub fn open_preferences(state_dir: &Path, root: Box<dyn PresentationRoot>) -> PreferenceStore {
    let storage = FilePreferences::new(config::runtime_state_dir(state_dir));
    PreferenceStore::load(Box::new(storage), root)
}
