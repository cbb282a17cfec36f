//! RepoTrace Core - analysis session and report formatting.
//!
//! This crate provides the logic shared by the TUI and the one-shot CLI:
//!
//! - **client**: HTTP client abstraction and the analysis endpoint
//! - **config**: State directory paths and service settings
//! - **formatter**: Pure derivations over a report (grade, bands, export)
//! - **session**: The request lifecycle state machine

pub mod client;
pub mod config;
pub mod error;
pub mod formatter;
pub mod session;

// Re-export commonly used items for convenience
pub use client::{analyze_url, AnalysisService, HttpClient, HttpResponse, ReqwestHttpClient};
pub use config::ClientConfig;
pub use error::{AnalysisError, Result};
pub use formatter::{
    category_band_of, color_band_of, empty_roadmap_message, export_blob, export_blob_now,
    grade_of, progress_ratio, render_text, roadmap_view, CategoryBand, Grade, ReportExport,
    RoadmapView, ScoreBand,
};
pub use session::{
    AnalysisRequest, AnalysisSession, Phase, RequestId, SessionState, FAILURE_MESSAGE,
};
