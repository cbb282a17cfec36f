//! Shared configuration for RepoTrace.
//!
//! Provides functions to locate RepoTrace's state directory and the settings
//! used to reach the analysis service.
//!
//! # Storage Structure
//!
//! All application data is stored under `~/.repotrace/`:
//!
//! ```text
//! ~/.repotrace/
//! ├── config/       # .env.local with overrides
//! ├── exports/      # Downloaded reports (when no download dir exists)
//! ├── logs/         # TUI log file
//! └── state/        # preferences.json
//! ```
//!
//! # Environment Variables
//!
//! - `REPOTRACE_STATE_DIR`: Override the base state directory
//! - `REPOTRACE_API_URL`: Base URL of the analysis service
//! - `REPOTRACE_TIMEOUT_SECS`: Request timeout in seconds (`0` disables it)
//! - `REPOTRACE_EXPORT_DIR`: Where downloaded reports are written

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{AnalysisError, Result};

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "REPOTRACE_STATE_DIR";

/// Environment variable for the analysis service base URL.
pub const API_URL_ENV: &str = "REPOTRACE_API_URL";

/// Environment variable for the request timeout.
pub const TIMEOUT_ENV: &str = "REPOTRACE_TIMEOUT_SECS";

/// Environment variable for the export directory.
pub const EXPORT_DIR_ENV: &str = "REPOTRACE_EXPORT_DIR";

/// Default analysis service location.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".repotrace";

// Subdirectory names
const CONFIG_SUBDIR: &str = "config";
const EXPORTS_SUBDIR: &str = "exports";
const LOGS_SUBDIR: &str = "logs";
const STATE_SUBDIR: &str = "state";

/// Get the RepoTrace state directory.
///
/// The state directory is determined by:
/// 1. `REPOTRACE_STATE_DIR` environment variable if set
/// 2. `~/.repotrace` if home directory is available
/// 3. `.repotrace` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the user config directory.
pub fn config_dir(base: &Path) -> PathBuf {
    base.join(CONFIG_SUBDIR)
}

/// Get the logs directory.
pub fn logs_dir(base: &Path) -> PathBuf {
    base.join(LOGS_SUBDIR)
}

/// Get the runtime state directory, where preferences live.
pub fn runtime_state_dir(base: &Path) -> PathBuf {
    base.join(STATE_SUBDIR)
}

/// Get the .env.local file path.
pub fn env_file(base: &Path) -> PathBuf {
    config_dir(base).join(".env.local")
}

/// Get the directory downloaded reports are written to.
///
/// Uses `REPOTRACE_EXPORT_DIR`, then the platform download directory, then
/// `<base>/exports`.
pub fn export_dir(base: &Path) -> PathBuf {
    std::env::var(EXPORT_DIR_ENV)
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| base.join(EXPORTS_SUBDIR))
}

/// Load `.env.local` from the config directory and the working directory.
///
/// Values already present in the environment win. Missing files are fine.
pub fn load_env(base: &Path) {
    let env_path = env_file(base);
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local");
}

/// Settings for reaching the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL; `/api/analyze` is appended to its path.
    pub base_url: Url,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a config for `base_url` with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AnalysisError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AnalysisError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Sets the timeout in seconds; `0` disables it.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Builds a config from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let config = Self::new(&url)?;
        Ok(match std::env::var(TIMEOUT_ENV).ok().and_then(|v| v.trim().parse().ok()) {
            Some(secs) => config.with_timeout_secs(secs),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_name() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".repotrace"));
    }

    #[test]
    fn test_subdir_names() {
        let base = Path::new("/home/user/.repotrace");
        assert!(config_dir(base).ends_with("config"));
        assert!(logs_dir(base).ends_with("logs"));
        assert!(runtime_state_dir(base).ends_with("state"));
        assert!(env_file(base).ends_with("config/.env.local"));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::new(DEFAULT_API_URL).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_client_config_timeout_zero_disables() {
        let config = ClientConfig::new("http://example.com").unwrap().with_timeout_secs(0);
        assert_eq!(config.timeout, None);

        let config = config.with_timeout_secs(5);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_client_config_rejects_bad_url() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(AnalysisError::InvalidUrl(_))
        ));
        assert!(matches!(
            ClientConfig::new("mailto:someone@example.com"),
            Err(AnalysisError::InvalidUrl(_))
        ));
    }
}
