//! RepoTrace CLI entry point.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use repotrace::cli::{Cli, Commands};
use repotrace::commands;
use repotrace::tui;
use repotrace_core::config;

fn main() {
    let cli = Cli::parse();
    let state_dir = cli.state_dir();

    // Load .env.local files; explicit environment wins
    config::load_env(&state_dir);

    init_tracing(&cli, &state_dir);

    let result = match &cli.command {
        None => run_tui(&cli, &state_dir, None),
        Some(Commands::Tui { reference }) => run_tui(&cli, &state_dir, reference.clone()),
        Some(_) => commands::execute(&cli, &state_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing.
///
/// The TUI owns the terminal, so in TUI mode logs go to
/// `<state>/logs/repotrace.log` instead of stderr.
fn init_tracing(cli: &Cli, state_dir: &Path) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    if cli.is_tui() {
        let logs_dir = config::logs_dir(state_dir);
        let log_file = std::fs::create_dir_all(&logs_dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(logs_dir.join("repotrace.log"))
        });
        match log_file {
            Ok(file) => {
                fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
            // No log file, no logs: stderr would draw over the TUI
            Err(_) => {
                fmt().with_env_filter(EnvFilter::new("off")).init();
            }
        }
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_tui(cli: &Cli, state_dir: &Path, reference: Option<String>) -> commands::Result<()> {
    let client_config = cli.client_config()?;
    tui::run(state_dir, &client_config, reference)
        .map_err(|e| commands::CommandError::Tui(e.to_string()))
}
