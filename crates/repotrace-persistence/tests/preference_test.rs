//! Display mode persistence across process restarts.

use std::sync::{Arc, Mutex};

use repotrace_models::DisplayMode;
use repotrace_persistence::{
    FilePreferences, PreferenceStorage, PreferenceStore, PresentationRoot, THEME_KEY,
};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedRoot(Arc<Mutex<Vec<DisplayMode>>>);

impl SharedRoot {
    fn applied(&self) -> Vec<DisplayMode> {
        self.0.lock().unwrap().clone()
    }
}

impl PresentationRoot for SharedRoot {
    fn apply(&self, mode: DisplayMode) {
        self.0.lock().unwrap().push(mode);
    }
}

fn open(dir: &TempDir, root: &SharedRoot) -> PreferenceStore {
    PreferenceStore::load(Box::new(FilePreferences::new(dir.path())), Box::new(root.clone()))
}

#[test]
fn test_first_launch_is_dark() {
    let dir = TempDir::new().unwrap();
    let root = SharedRoot::default();

    let store = open(&dir, &root);

    assert_eq!(store.mode(), DisplayMode::Dark);
    assert_eq!(root.applied(), vec![DisplayMode::Dark]);
}

#[test]
fn test_choice_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let root = SharedRoot::default();
        let mut store = open(&dir, &root);
        store.set(DisplayMode::Light);
        assert_eq!(root.applied(), vec![DisplayMode::Dark, DisplayMode::Light]);
    }

    let root = SharedRoot::default();
    let store = open(&dir, &root);
    assert_eq!(store.mode(), DisplayMode::Light);
    assert_eq!(root.applied(), vec![DisplayMode::Light]);
}

#[test]
fn test_stored_value_is_plain_string() {
    let dir = TempDir::new().unwrap();
    let root = SharedRoot::default();
    let mut store = open(&dir, &root);

    store.toggle();

    let storage = FilePreferences::new(dir.path());
    assert_eq!(storage.read(THEME_KEY).unwrap().as_deref(), Some("light"));
}

#[test]
fn test_hand_edited_value_is_honored() {
    let dir = TempDir::new().unwrap();
    FilePreferences::new(dir.path()).write(THEME_KEY, "light").unwrap();

    let root = SharedRoot::default();
    let mut store = open(&dir, &root);
    assert_eq!(store.mode(), DisplayMode::Light);

    assert_eq!(store.toggle(), DisplayMode::Dark);
    assert_eq!(root.applied(), vec![DisplayMode::Light, DisplayMode::Dark]);
}
