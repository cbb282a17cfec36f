//! Error types for the core crate.

use repotrace_models::ReportError;
use thiserror::Error;

/// Errors that can occur while requesting an analysis.
///
/// None of these are shown to the user verbatim; the session controller
/// logs them and stores a fixed message instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("analysis service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not a valid analysis report.
    #[error("malformed analysis payload: {0}")]
    MalformedPayload(String),

    /// The service URL could not be built.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
}

impl From<ReportError> for AnalysisError {
    fn from(err: ReportError) -> Self {
        AnalysisError::MalformedPayload(err.to_string())
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
