//! TUI application state and logic.

use std::path::PathBuf;
use std::sync::mpsc;

use repotrace_core::{
    export_blob_now, AnalysisError, AnalysisRequest, AnalysisService, AnalysisSession, RequestId,
    SessionState,
};
use repotrace_models::{AnalysisReport, DisplayMode};
use repotrace_persistence::PreferenceStore;
use tokio::runtime::Handle as TokioHandle;
use tracing::{info, warn};

use super::theme::{Palette, ThemeRoot};

/// Outcome of one request, sent back from the async runtime.
type Resolution = (RequestId, Result<AnalysisReport, AnalysisError>);

/// Transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something worked.
    Info(String),
    /// Something did not work, but the session is unaffected.
    Warning(String),
}

/// TUI application state.
pub struct App {
    // Analysis
    /// Request lifecycle state machine
    pub(super) session: AnalysisSession,
    /// Client for the analysis endpoint
    service: AnalysisService,
    /// Reference of the request currently awaited
    pub(super) pending_reference: Option<String>,
    /// Sender cloned into every spawned request
    results_tx: mpsc::Sender<Resolution>,
    /// Receiver drained on every tick
    results_rx: mpsc::Receiver<Resolution>,
    /// Runtime that executes requests
    runtime_handle: Option<TokioHandle>,

    // Preferences
    /// Owner of the display mode
    prefs: PreferenceStore,
    /// Presentation root read by the renderer
    theme: ThemeRoot,
    /// Directory exported reports are written to
    export_dir: PathBuf,

    // UI State
    /// Current input text
    pub input: String,
    /// Cursor position in input, in chars
    pub cursor_pos: usize,
    /// Status bar message
    pub notice: Option<Notice>,
    /// Scroll offset of the report view (lines from top)
    pub report_scroll: u16,
    /// Largest useful scroll offset, updated on every draw
    pub(super) report_max_scroll: u16,
    /// Animation counter, advanced every tick
    pub(super) tick: usize,

    // Runtime
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new App instance.
    ///
    /// `theme` must be the root `prefs` applies to.
    pub fn new(
        service: AnalysisService,
        prefs: PreferenceStore,
        theme: ThemeRoot,
        export_dir: PathBuf,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            session: AnalysisSession::new(),
            service,
            pending_reference: None,
            results_tx,
            results_rx,
            runtime_handle: None,

            prefs,
            theme,
            export_dir,

            input: String::new(),
            cursor_pos: 0,
            notice: None,
            report_scroll: 0,
            report_max_scroll: 0,
            tick: 0,

            should_quit: false,
        }
    }

    /// Set the runtime used to execute requests.
    pub fn set_runtime_handle(&mut self, handle: TokioHandle) {
        self.runtime_handle = Some(handle);
    }

    /// Returns the session state.
    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    /// Returns true while an analysis is outstanding.
    pub fn is_pending(&self) -> bool {
        self.session.state().is_pending()
    }

    /// Returns the current display mode.
    pub fn display_mode(&self) -> DisplayMode {
        self.prefs.mode()
    }

    /// Returns the palette of the presentation root.
    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    /// Submit the current input for analysis.
    ///
    /// Ignored while a request is pending or when the input is empty.
    pub fn submit(&mut self) {
        if self.is_pending() {
            return;
        }
        let Some(request) = self.session.begin(&self.input) else {
            return;
        };
        self.notice = None;
        self.report_scroll = 0;
        self.pending_reference = Some(request.reference.clone());
        self.spawn_request(request);
    }

    /// Run `request` on the async runtime; the result arrives via the channel.
    fn spawn_request(&mut self, request: AnalysisRequest) {
        let Some(handle) = &self.runtime_handle else {
            self.resolve(
                request.id,
                Err(AnalysisError::Transport("no async runtime available".into())),
            );
            return;
        };

        let service = self.service.clone();
        let tx = self.results_tx.clone();
        handle.spawn(async move {
            let outcome = service.analyze(&request.reference).await;
            // Receiver is gone only if the app has quit
            let _ = tx.send((request.id, outcome));
        });
    }

    /// Apply every result that has arrived since the last call.
    pub fn poll_results(&mut self) {
        while let Ok((id, outcome)) = self.results_rx.try_recv() {
            self.resolve(id, outcome);
        }
    }

    fn resolve(&mut self, id: RequestId, outcome: Result<AnalysisReport, AnalysisError>) {
        if self.session.complete(id, outcome) {
            self.pending_reference = None;
        }
    }

    /// Advance animations.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Save the current report as JSON in the export directory.
    pub fn export_report(&mut self) {
        let Some(report) = self.session.state().report() else {
            self.notice = Some(Notice::Warning("No report to download yet".into()));
            return;
        };

        let saved = export_blob_now(report)
            .map_err(|e| e.to_string())
            .and_then(|blob| {
                crate::save_export(&self.export_dir, &blob).map_err(|e| e.to_string())
            });

        self.notice = Some(match saved {
            Ok(path) => {
                info!("Report exported to {}", path.display());
                Notice::Info(format!("Saved {}", path.display()))
            }
            Err(e) => {
                warn!("Report export failed: {}", e);
                Notice::Warning("Could not save the report".into())
            }
        });
    }

    /// Switch between dark and light mode.
    pub fn toggle_theme(&mut self) {
        let mode = self.prefs.toggle();
        self.notice = Some(Notice::Info(match mode {
            DisplayMode::Dark => "Dark mode".to_string(),
            DisplayMode::Light => "Light mode".to_string(),
        }));
    }

    /// Scroll the report view up.
    pub fn scroll_up(&mut self, lines: u16) {
        self.report_scroll = self.report_scroll.saturating_sub(lines);
    }

    /// Scroll the report view down, stopping at the last page.
    pub fn scroll_down(&mut self, lines: u16) {
        self.report_scroll = self
            .report_scroll
            .saturating_add(lines)
            .min(self.report_max_scroll);
    }

    /// Record how far the rendered report can scroll.
    pub(super) fn set_report_max_scroll(&mut self, max: u16) {
        self.report_max_scroll = max;
        self.report_scroll = self.report_scroll.min(max);
    }
}
