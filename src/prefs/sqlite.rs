use chrono::Utc;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::Preferences;
use crate::error::Result;

/// Preference store backed by a single SQLite table.
///
/// The database file is created under the user's data directory by default:
/// - Linux: ~/.local/share/selfie-journal/preferences.db
/// - macOS: ~/Library/Application Support/selfie-journal/preferences.db
/// - Windows: %APPDATA%\selfie-journal\preferences.db
pub struct SqlitePreferences {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqlitePreferences {
    /// Open (or create) the store at `db_path`, creating parent directories as needed
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        info!("📁 Preferences opened at: {}", db_path.display());

        let prefs = SqlitePreferences {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        prefs.init_schema()?;

        Ok(prefs)
    }

    /// A throwaway store that lives as long as the value
    pub fn open_in_memory() -> Result<Self> {
        let prefs = SqlitePreferences {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        prefs.init_schema()?;
        Ok(prefs)
    }

    /// Create the preferences table if it doesn't exist.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Number of stored keys
    pub fn key_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl Preferences for SqlitePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM preferences WHERE key = ?1", [key])?;
        Ok(())
    }
}
