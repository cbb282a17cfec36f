//! Non-interactive command implementations.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use repotrace_core::{
    config, export_blob_now, render_text, AnalysisError, AnalysisService, AnalysisSession,
    SessionState,
};
use repotrace_persistence::{NoopRoot, PersistenceError};

use crate::cli::{Cli, Commands, OutputFormat, ThemeArg};

/// Errors surfaced by CLI commands.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Service configuration or client setup failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The analysis request failed; carries the user-facing message.
    #[error("{0}")]
    Failed(String),

    /// Writing the export failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Serializing the report failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure, such as starting the async runtime.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The interactive UI failed.
    #[error("tui error: {0}")]
    Tui(String),
}

/// Result type for CLI commands.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Execute a non-TUI command.
pub fn execute(cli: &Cli, state_dir: &Path) -> Result<()> {
    match &cli.command {
        Some(Commands::Analyze {
            reference,
            format,
            export,
        }) => analyze(cli, state_dir, reference, *format, *export),
        Some(Commands::Theme { mode }) => theme(state_dir, *mode),
        None | Some(Commands::Tui { .. }) => Ok(()),
    }
}

/// Analyze one repository and print the report.
fn analyze(
    cli: &Cli,
    state_dir: &Path,
    reference: &str,
    format: OutputFormat,
    export: bool,
) -> Result<()> {
    let service = AnalysisService::from_config(&cli.client_config()?)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut session = AnalysisSession::new();
    runtime.block_on(session.submit(&service, reference));

    let report = match session.state() {
        SessionState::Success(report) => report,
        SessionState::Failure(message) => return Err(CommandError::Failed(message.clone())),
        SessionState::Idle | SessionState::Pending => {
            return Err(CommandError::Failed("Nothing to analyze.".to_string()))
        }
    };

    match format {
        OutputFormat::Text => print!("{}", render_text(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }

    if export {
        let blob = export_blob_now(report)?;
        let path = crate::save_export(&config::export_dir(state_dir), &blob)?;
        info!("Report exported to {}", path.display());
        eprintln!("Saved report to {}", path.display());
    }

    Ok(())
}

/// Show or change the display mode.
fn theme(state_dir: &Path, mode: Option<ThemeArg>) -> Result<()> {
    let mut prefs = crate::open_preferences(state_dir, Box::new(NoopRoot));
    if let Some(arg) = mode {
        prefs.set(arg.resolve(prefs.mode()));
    }
    println!("{}", prefs.mode());
    Ok(())
}
