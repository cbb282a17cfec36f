//! Core data models for RepoTrace.
//!
//! This crate provides the types shared by every RepoTrace crate: the
//! analysis report returned by the remote service and the persisted
//! display-mode preference.

pub mod display;
pub mod report;

// Re-export main types
pub use display::DisplayMode;
pub use report::{AnalysisReport, RepoDetails, ReportError};
