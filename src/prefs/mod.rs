//! # Preference Store
//!
//! A narrow key-value interface over the app's persisted preferences. Three
//! kinds of state live here:
//!
//! - Label overrides, keyed by an item's file name
//! - The display order map, as JSON under [`crate::order::ORDER_DICT_KEY`]
//! - The reminder notification flag, under [`NOTIFICATIONS_KEY`]
//!
//! ## Implementations
//!
//! - [`SqlitePreferences`]: Production store, one SQLite table.
//! - [`MemoryPreferences`]: For testing logic without a database.
//!
//! All methods take `&self`; implementations use interior mutability since
//! there is a single caller at a time.

use crate::error::Result;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryPreferences;
pub use sqlite::SqlitePreferences;

/// Key of the reminder notification flag
pub const NOTIFICATIONS_KEY: &str = "notificationsEnabled";

pub trait Preferences {
    /// Read a value, `Ok(None)` if the key was never set or has been removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Whether reminder notifications are on (off unless explicitly enabled)
pub fn notifications_enabled<P: Preferences + ?Sized>(prefs: &P) -> Result<bool> {
    Ok(prefs.get(NOTIFICATIONS_KEY)?.as_deref() == Some("true"))
}

pub fn set_notifications_enabled<P: Preferences + ?Sized>(prefs: &P, enabled: bool) -> Result<()> {
    prefs.set(NOTIFICATIONS_KEY, if enabled { "true" } else { "false" })
}
