//! User preferences persisted between runs.

use crate::diagram::LineStyle;
use crate::theme::ThemePreference;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted user choices. Unknown or missing fields fall back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemePreference,
    pub new_interaction_style: LineStyle,
}

/// Reads and writes [`Preferences`] as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config dir>/seqdraw/preferences.json`.
    pub fn default_location() -> Result<Self, PreferencesError> {
        let base = dirs::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::new(base.join("seqdraw").join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences. Missing or unreadable files yield defaults.
    pub fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => Preferences::default(),
            Err(e) => {
                log::warn!("Ignoring preferences at {}: {}", self.path.display(), e);
                Preferences::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Preferences>, PreferencesError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(prefs)?;
        fs::write(&self.path, json)?;
        log::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}
