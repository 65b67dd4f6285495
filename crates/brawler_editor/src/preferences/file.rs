//! Preferences storage as TOML in the platform config directory

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use log::warn;
use thiserror::Error;

use super::Preferences;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("no usable config directory on this platform")]
    NoConfigDir,
    #[error("failed to write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode preferences: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl Preferences {
    /// Platform config directory for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "brawler_editor").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Full path of the preferences file
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("preferences.toml"))
    }

    /// Load preferences, falling back to defaults when the file is missing
    /// or unreadable - bad preferences must never keep the editor from
    /// starting.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!("ignoring malformed preferences at {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Write preferences, creating the config directory if needed
    pub fn save(&self) -> Result<(), PreferencesError> {
        let dir = Self::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        fs::create_dir_all(&dir)?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(dir.join("preferences.toml"), contents)?;
        Ok(())
    }
}
