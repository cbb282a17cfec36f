//! Command-line interface definition using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use repotrace_core::config::{self, ClientConfig};
use repotrace_models::DisplayMode;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.0 (abc1234, 2026-01-29)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// RepoTrace - repository health reports from the analysis service
#[derive(Parser, Debug)]
#[command(name = "repotrace")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "REPOTRACE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Base URL of the analysis service
    #[arg(long, env = "REPOTRACE_API_URL", default_value = config::DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds (0 waits indefinitely)
    #[arg(long, env = "REPOTRACE_TIMEOUT_SECS", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive TUI (default)
    Tui {
        /// Repository to analyze on start
        reference: Option<String>,
    },

    /// Analyze a repository and print the report
    Analyze {
        /// Repository reference (owner/name or full URL)
        #[arg(required = true)]
        reference: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Also save the report JSON to the export directory
        #[arg(short, long)]
        export: bool,
    },

    /// Show or change the display mode
    Theme {
        /// Mode to switch to (shows the current mode if omitted)
        mode: Option<ThemeArg>,
    },
}

/// Output format for the analyze command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Display mode CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
    /// Switch to the other mode
    Toggle,
}

impl ThemeArg {
    /// Resolves the argument against the current mode.
    pub fn resolve(self, current: DisplayMode) -> DisplayMode {
        match self {
            ThemeArg::Dark => DisplayMode::Dark,
            ThemeArg::Light => DisplayMode::Light,
            ThemeArg::Toggle => current.opposite(),
        }
    }
}

impl Cli {
    /// Returns the state directory path, using default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(config::state_dir)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Builds the service client settings.
    pub fn client_config(&self) -> repotrace_core::Result<ClientConfig> {
        Ok(ClientConfig::new(&self.api_url)?.with_timeout_secs(self.timeout))
    }

    /// Returns true if this invocation runs the TUI.
    pub fn is_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui { .. }))
    }
}
