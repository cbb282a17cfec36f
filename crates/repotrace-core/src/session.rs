//! Analysis session controller.
//!
//! Owns the request lifecycle `Idle -> Pending -> Success | Failure`.
//!
//! Each submission is tagged with a [`RequestId`]. Only the most recently
//! issued request may resolve the session; earlier requests that finish
//! late are dropped on arrival. In-flight requests are never aborted.

use std::fmt;

use repotrace_models::AnalysisReport;
use tracing::{debug, info, warn};

use crate::client::AnalysisService;
use crate::error::AnalysisError;

/// Message stored in [`SessionState::Failure`] for every failed request.
pub const FAILURE_MESSAGE: &str =
    "Failed to fetch analysis. Make sure the backend is running and the URL is valid.";

/// Sequence number of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Returns the raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Pending,
    Success,
    Failure,
}

/// Session state. The report and the error message live in different
/// variants, so they can never be present together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Pending,
    /// The latest request returned a report.
    Success(AnalysisReport),
    /// The latest request failed.
    Failure(String),
}

impl SessionState {
    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Pending => Phase::Pending,
            SessionState::Success(_) => Phase::Success,
            SessionState::Failure(_) => Phase::Failure,
        }
    }

    /// Returns the report, present only in `Success`.
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            SessionState::Success(report) => Some(report),
            _ => None,
        }
    }

    /// Returns the error message, present only in `Failure`.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Returns true while a request is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }
}

/// Ticket for one outbound request, returned by [`AnalysisSession::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Sequence number to pass back to [`AnalysisSession::complete`].
    pub id: RequestId,
    /// Trimmed repository reference to send.
    pub reference: String,
}

/// The analysis session state machine. One per UI session.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    state: SessionState,
    last_issued: u64,
    in_flight: Option<RequestId>,
}

impl AnalysisSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the request whose resolution is currently awaited.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// Starts a new request for `reference`.
    ///
    /// The reference is trimmed before use, so surrounding whitespace is never
    /// sent and whitespace-only input counts as empty. This is stricter than
    /// the web form, which submits any non-empty field unchanged.
    ///
    /// Empty input is ignored: no transition and `None`. Otherwise the
    /// session enters `Pending` with any previous report or error cleared,
    /// and the caller must issue exactly one request for the returned ticket.
    /// Calling this while already pending supersedes the outstanding request.
    pub fn begin(&mut self, reference: &str) -> Option<AnalysisRequest> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        if let Some(previous) = self.in_flight {
            debug!("Request {} superseded", previous);
        }

        self.last_issued += 1;
        let id = RequestId(self.last_issued);
        self.state = SessionState::Pending;
        self.in_flight = Some(id);
        info!("Analysis request {} started for {}", id, reference);

        Some(AnalysisRequest {
            id,
            reference: reference.to_string(),
        })
    }

    /// Applies the outcome of request `id`.
    ///
    /// Returns false, leaving the state untouched, if `id` is not the
    /// request currently awaited. Errors are logged and replaced by
    /// [`FAILURE_MESSAGE`].
    pub fn complete(
        &mut self,
        id: RequestId,
        outcome: Result<AnalysisReport, AnalysisError>,
    ) -> bool {
        if self.in_flight != Some(id) {
            debug!("Discarding stale result for request {}", id);
            return false;
        }
        self.in_flight = None;

        self.state = match outcome {
            Ok(report) => {
                info!(
                    "Analysis request {} succeeded: {} scored {}",
                    id, report.repo_name, report.score
                );
                SessionState::Success(report)
            }
            Err(e) => {
                warn!("Analysis request {} failed: {}", id, e);
                SessionState::Failure(FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    /// Runs a full request cycle against `service` and waits for it.
    ///
    /// Returns the request id, or `None` if the input was empty.
    pub async fn submit(
        &mut self,
        service: &AnalysisService,
        reference: &str,
    ) -> Option<RequestId> {
        let request = self.begin(reference)?;
        let outcome = service.analyze(&request.reference).await;
        self.complete(request.id, outcome);
        Some(request.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repotrace_models::RepoDetails;

    fn sample_report(name: &str) -> AnalysisReport {
        AnalysisReport {
            repo_name: name.into(),
            description: None,
            score: 85,
            summary: "Solid project".into(),
            category_scores: Default::default(),
            tech_stack: Vec::new(),
            details: RepoDetails::default(),
            roadmap: vec!["Add CI".into()],
            extra: Default::default(),
        }
    }

    fn assert_exclusive(state: &SessionState) {
        assert!(!(state.report().is_some() && state.error_message().is_some()));
        if state.is_pending() {
            assert!(state.report().is_none());
            assert!(state.error_message().is_none());
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = AnalysisSession::new();
        assert_eq!(session.state().phase(), Phase::Idle);
        assert!(session.in_flight().is_none());
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let mut session = AnalysisSession::new();
        assert!(session.begin("").is_none());
        assert!(session.begin("   ").is_none());
        assert_eq!(session.state().phase(), Phase::Idle);
    }

    #[test]
    fn test_begin_trims_reference() {
        let mut session = AnalysisSession::new();
        let request = session.begin("  octocat/Hello-World \n").unwrap();
        assert_eq!(request.reference, "octocat/Hello-World");
    }

    #[test]
    fn test_success_cycle() {
        let mut session = AnalysisSession::new();
        let request = session.begin("octocat/Hello-World").unwrap();
        assert_eq!(session.state().phase(), Phase::Pending);

        assert!(session.complete(request.id, Ok(sample_report("octocat/Hello-World"))));
        assert_eq!(session.state().phase(), Phase::Success);
        assert_eq!(
            session.state().report().unwrap().repo_name,
            "octocat/Hello-World"
        );
        assert_exclusive(session.state());
    }

    #[test]
    fn test_failure_uses_fixed_message() {
        let mut session = AnalysisSession::new();
        let request = session.begin("nope").unwrap();

        session.complete(request.id, Err(AnalysisError::Status { status: 404 }));

        assert_eq!(session.state().error_message(), Some(FAILURE_MESSAGE));
        assert!(session.state().report().is_none());
    }

    #[test]
    fn test_begin_clears_previous_result() {
        let mut session = AnalysisSession::new();
        let first = session.begin("a/b").unwrap();
        session.complete(first.id, Ok(sample_report("a/b")));

        session.begin("c/d").unwrap();
        assert_eq!(*session.state(), SessionState::Pending);

        let mut session = AnalysisSession::new();
        let first = session.begin("a/b").unwrap();
        session.complete(first.id, Err(AnalysisError::Transport("down".into())));

        session.begin("c/d").unwrap();
        assert_eq!(*session.state(), SessionState::Pending);
    }

    #[test]
    fn test_last_submit_wins() {
        let mut session = AnalysisSession::new();
        let a = session.begin("a/a").unwrap();
        let b = session.begin("b/b").unwrap();
        assert!(b.id > a.id);

        assert!(!session.complete(a.id, Ok(sample_report("a/a"))));
        assert_eq!(session.state().phase(), Phase::Pending);

        assert!(session.complete(b.id, Err(AnalysisError::Status { status: 500 })));
        assert_eq!(session.state().phase(), Phase::Failure);
    }

    #[test]
    fn test_late_result_after_settle_is_ignored() {
        let mut session = AnalysisSession::new();
        let a = session.begin("a/a").unwrap();
        let b = session.begin("b/b").unwrap();

        session.complete(b.id, Ok(sample_report("b/b")));
        assert!(!session.complete(a.id, Err(AnalysisError::Status { status: 500 })));

        assert_eq!(session.state().report().unwrap().repo_name, "b/b");
    }

    #[test]
    fn test_duplicate_resolution_is_ignored() {
        let mut session = AnalysisSession::new();
        let a = session.begin("a/a").unwrap();

        assert!(session.complete(a.id, Ok(sample_report("a/a"))));
        assert!(!session.complete(a.id, Err(AnalysisError::Transport("late".into()))));
        assert_eq!(session.state().phase(), Phase::Success);
    }

    #[test]
    fn test_exclusion_holds_through_transitions() {
        let mut session = AnalysisSession::new();
        assert_exclusive(session.state());

        for i in 0..6 {
            let request = session.begin(&format!("repo/{}", i)).unwrap();
            assert_exclusive(session.state());
            let outcome = if i % 2 == 0 {
                Ok(sample_report("repo/x"))
            } else {
                Err(AnalysisError::MalformedPayload("bad".into()))
            };
            session.complete(request.id, outcome);
            assert_exclusive(session.state());
        }
    }
}
