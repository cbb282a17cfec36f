//! Display-mode preference store.
//!
//! [`PreferenceStore`] is the single owner of the display mode. Storage and
//! the presentation root are injected so tests can substitute fakes. Every
//! mutation goes through [`PreferenceStore::set`], which persists first and
//! then applies the mode to the root.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use repotrace_models::DisplayMode;
use tracing::{debug, warn};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Key under which the display mode is stored.
pub const THEME_KEY: &str = "theme";

/// File name for [`FilePreferences`].
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Scalar key/value storage for preferences.
pub trait PreferenceStorage: Send {
    /// Reads the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Receives the display mode whenever it changes.
///
/// There is exactly one root per process. Implementations must be
/// idempotent: applying the same mode twice is the same as applying it once.
pub trait PresentationRoot: Send {
    /// Applies `mode` to everything that renders.
    fn apply(&self, mode: DisplayMode);
}

/// Root that ignores applied modes. Used by non-interactive commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRoot;

impl PresentationRoot for NoopRoot {
    fn apply(&self, _mode: DisplayMode) {}
}

/// Preferences stored as a JSON object in `<dir>/preferences.json`.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    /// Creates storage rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        Ok(read_json_optional(&self.path)?.unwrap_or_default())
    }
}

impl PreferenceStorage for FilePreferences {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking the write
        let mut all = self.read_all().unwrap_or_default();
        all.insert(key.to_string(), value.to_string());
        atomic_write_json(&self.path, &all)
    }
}

/// In-memory storage. Clones share the same map, which lets tests simulate
/// a reload by loading a second store from a clone.
#[derive(Debug, Clone)]
pub struct MemoryPreferences {
    values: Arc<Mutex<HashMap<String, String>>>,
    available: bool,
}

impl MemoryPreferences {
    /// Creates empty, working storage.
    pub fn new() -> Self {
        Self {
            values: Arc::default(),
            available: true,
        }
    }

    /// Creates storage that fails every read and write.
    pub fn unavailable() -> Self {
        Self {
            values: Arc::default(),
            available: false,
        }
    }

    fn check(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(PersistenceError::Unavailable("storage disabled".into()))
        }
    }
}

impl Default for MemoryPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStorage for MemoryPreferences {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        let values = self
            .values
            .lock()
            .map_err(|_| PersistenceError::Unavailable("preference lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        let mut values = self
            .values
            .lock()
            .map_err(|_| PersistenceError::Unavailable("preference lock poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owner of the persisted display mode.
pub struct PreferenceStore {
    storage: Box<dyn PreferenceStorage>,
    root: Box<dyn PresentationRoot>,
    mode: DisplayMode,
}

impl PreferenceStore {
    /// Reads the stored mode and applies it to `root`.
    ///
    /// Never fails: missing, unreadable, or unrecognized values fall back to
    /// [`DisplayMode::Dark`].
    pub fn load(storage: Box<dyn PreferenceStorage>, root: Box<dyn PresentationRoot>) -> Self {
        let mode = match storage.read(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored preference: {}", e);
                DisplayMode::default()
            }),
            Ok(None) => DisplayMode::default(),
            Err(e) => {
                warn!("Preference storage unavailable, using default: {}", e);
                DisplayMode::default()
            }
        };

        root.apply(mode);
        debug!("Display mode loaded: {}", mode);

        Self {
            storage,
            root,
            mode,
        }
    }

    /// Returns the current mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Persists `mode`, then applies it to the presentation root.
    ///
    /// A storage failure is logged and does not stop the mode from being
    /// applied.
    pub fn set(&mut self, mode: DisplayMode) {
        if let Err(e) = self.storage.write(THEME_KEY, mode.as_str()) {
            warn!("Failed to persist display mode: {}", e);
        }
        self.mode = mode;
        self.root.apply(mode);
        debug!("Display mode set to: {}", mode);
    }

    /// Switches to the other mode and returns it.
    pub fn toggle(&mut self) -> DisplayMode {
        let next = self.mode.opposite();
        self.set(next);
        next
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
