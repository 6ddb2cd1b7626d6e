//! Journal configuration
//!
//! Every field is optional in the JSON file; anything missing falls back to
//! the platform defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{JournalError, Result};
use crate::prefs::SqlitePreferences;
use crate::storage::{PhotoStorage, DEFAULT_PHOTO_QUALITY, DEFAULT_THUMBNAIL_QUALITY};
use crate::thumbnail::ThumbnailSize;

const APP_DIR: &str = "selfie-journal";
const CONFIG_FILE: &str = "config.json";
const PREFERENCES_FILE: &str = "preferences.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Durable home of the full-resolution photos
    pub documents_dir: PathBuf,
    /// Purgeable area; thumbnails go in a subdirectory of it
    pub cache_dir: PathBuf,
    /// SQLite file holding labels, display order and flags
    pub preferences_path: PathBuf,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub photo_quality: u8,
    pub thumbnail_quality: u8,
}

impl Default for JournalConfig {
    fn default() -> Self {
        let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        let documents_dir = dirs::document_dir().unwrap_or_else(home).join(APP_DIR);
        let cache_dir = dirs_next::cache_dir().unwrap_or_else(home).join(APP_DIR);
        let preferences_path = dirs::data_dir()
            .unwrap_or_else(home)
            .join(APP_DIR)
            .join(PREFERENCES_FILE);

        let thumbnail_size = ThumbnailSize::default();
        Self {
            documents_dir,
            cache_dir,
            preferences_path,
            thumbnail_width: thumbnail_size.width(),
            thumbnail_height: thumbnail_size.height(),
            photo_quality: DEFAULT_PHOTO_QUALITY,
            thumbnail_quality: DEFAULT_THUMBNAIL_QUALITY,
        }
    }
}

impl JournalConfig {
    /// Load the config from `path`, or from the default location if it exists.
    ///
    /// An explicit path must exist; a missing default file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `~/.config/selfie-journal/config.json` on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            JournalError::Config(format!("Failed to read config from {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn thumbnail_size(&self) -> Result<ThumbnailSize> {
        ThumbnailSize::new(self.thumbnail_width, self.thumbnail_height)
    }

    /// Validate the settings and create the storage directories
    pub fn storage(&self) -> Result<PhotoStorage> {
        PhotoStorage::new(&self.documents_dir, &self.cache_dir, self.thumbnail_size()?)?
            .with_qualities(self.photo_quality, self.thumbnail_quality)
    }

    pub fn open_preferences(&self) -> Result<SqlitePreferences> {
        SqlitePreferences::open(&self.preferences_path)
    }
}
