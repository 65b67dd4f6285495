//! Editor preferences and persistent settings
//!
//! Manages user preferences stored in platform-specific config directories:
//! - Windows: %APPDATA%/brawler_editor/
//! - Linux: ~/.config/brawler_editor/
//! - macOS: ~/Library/Application Support/brawler_editor/

mod file;

pub use file::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum number of recent levels to track
pub const MAX_RECENT_LEVELS: usize = 10;

/// Editor preferences that persist across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Version for future migrations
    pub version: u32,

    /// Display scale a freshly opened level starts at
    pub default_scale: f64,

    /// Root of the source-data tree the template registry scans
    pub data_dir: PathBuf,

    // Recent Levels
    pub recent_levels: Vec<RecentLevel>,

    // Startup behavior
    pub auto_open_last_level: bool,
}

/// A recent level entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentLevel {
    pub path: String,
    pub name: String,
    pub last_opened: u64, // Unix timestamp
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: 1,
            default_scale: 1.0,
            data_dir: PathBuf::from("data"),
            recent_levels: Vec::new(),
            auto_open_last_level: false,
        }
    }
}

impl Preferences {
    /// Add a level to the recent levels list
    pub fn add_recent_level(&mut self, path: PathBuf, name: String) {
        use std::time::{SystemTime, UNIX_EPOCH};

        let path_str = path.to_string_lossy().to_string();

        // Remove if already exists (will re-add at front)
        self.recent_levels.retain(|l| l.path != path_str);

        self.recent_levels.insert(
            0,
            RecentLevel {
                path: path_str,
                name,
                last_opened: SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0),
            },
        );

        self.recent_levels.truncate(MAX_RECENT_LEVELS);
    }

    /// Remove a level from the recent list (e.g., if the file is gone)
    pub fn remove_recent_level(&mut self, path: &str) {
        self.recent_levels.retain(|l| l.path != path);
    }

    /// Get the most recently opened level
    pub fn last_level(&self) -> Option<&RecentLevel> {
        self.recent_levels.first()
    }

    /// Clear all recent levels
    pub fn clear_recent_levels(&mut self) {
        self.recent_levels.clear();
    }
}
