//! Durable user preferences
//!
//! A small key/value store of learned preferences (currently only cuisine),
//! persisted as JSON. Every update rewrites the whole file. The write is a
//! plain whole-file overwrite with no atomic rename; a crash mid-write can
//! corrupt the file, in which case the next load resets to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::PreferenceKind;

/// Learned user preferences
///
/// Wire format: `{"cuisine": string | null}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub cuisine: Option<String>,
}

/// File-backed preference store
pub struct PreferenceStore {
    path: PathBuf,
    preferences: Preferences,
}

impl PreferenceStore {
    /// Load preferences from disk
    ///
    /// A missing or corrupt file resets to the default `{cuisine: null}`
    /// and immediately re-persists it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "PreferenceStore::load: called");

        let preferences = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(preferences) => preferences,
                Err(e) => {
                    warn!(?path, error = %e, "Corrupt preferences file, resetting to defaults");
                    Preferences::default()
                }
            },
            Err(_) => {
                debug!(?path, "No preferences file, starting with defaults");
                Preferences::default()
            }
        };

        let mut store = Self { path, preferences };
        store.save()?;
        Ok(store)
    }

    /// Current preferences
    pub fn get(&self) -> &Preferences {
        &self.preferences
    }

    /// The stored cuisine preference, if any
    pub fn cuisine(&self) -> Option<&str> {
        self.preferences.cuisine.as_deref()
    }

    /// Update one preference and rewrite the whole file
    pub fn update(&mut self, kind: PreferenceKind, value: &str) -> Result<()> {
        debug!(%kind, %value, "update: called");
        match kind {
            PreferenceKind::Cuisine => {
                self.preferences.cuisine = Some(value.to_string());
            }
            PreferenceKind::None => {
                warn!(%value, "update: ignoring preference of kind none");
                return Ok(());
            }
        }
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }
        let content = serde_json::to_string(&self.preferences)?;
        fs::write(&self.path, content).context("Failed to write preferences file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_creates_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");

        let store = PreferenceStore::load(&path).unwrap();
        assert!(store.cuisine().is_none());
        // Default was immediately re-persisted
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"{"cuisine":null}"#);
    }

    #[test]
    fn test_load_corrupt_file_resets() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        fs::write(&path, "{not valid json").unwrap();

        let store = PreferenceStore::load(&path).unwrap();
        assert!(store.cuisine().is_none());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"{"cuisine":null}"#);
    }

    #[test]
    fn test_update_persists_and_survives_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");

        let mut store = PreferenceStore::load(&path).unwrap();
        store.update(PreferenceKind::Cuisine, "mexican").unwrap();
        assert_eq!(store.cuisine(), Some("mexican"));

        let reloaded = PreferenceStore::load(&path).unwrap();
        assert_eq!(reloaded.cuisine(), Some("mexican"));
    }

    #[test]
    fn test_update_none_kind_is_ignored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");

        let mut store = PreferenceStore::load(&path).unwrap();
        store.update(PreferenceKind::None, "whatever").unwrap();
        assert!(store.cuisine().is_none());
    }

    proptest! {
        #[test]
        fn last_update_wins_and_survives_reload(values in proptest::collection::vec("[a-z]{1,12}", 1..8)) {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("preferences.json");

            let mut store = PreferenceStore::load(&path).unwrap();
            for value in &values {
                store.update(PreferenceKind::Cuisine, value).unwrap();
            }

            let last = values.last().unwrap().as_str();
            prop_assert_eq!(store.cuisine(), Some(last));

            let reloaded = PreferenceStore::load(&path).unwrap();
            prop_assert_eq!(reloaded.cuisine(), Some(last));
        }
    }
}
