//! # Selfie Journal
//!
//! Storage core for a photo journal: photos are captured or imported, stored
//! as full-resolution JPEGs with cached thumbnails, labeled, reordered,
//! multi-selected for deletion or mailing, and kept in a user-defined order
//! that survives restarts.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ItemCollection (collection.rs)                             │
//! │  - Ordered list, check marks, append / move / remove        │
//! │  - Keeps the persisted DisplayOrder (order.rs) in sync      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Item (item.rs)                                             │
//! │  - One photo: paths, thumbnail, label override, delete      │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                           │
//!                  ▼                           ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │ PhotoStorage / thumbnail     │ │ Preferences (prefs/)       │
//! │ - documents + cache dirs     │ │ - get / set / remove       │
//! │ - JPEG encode, cache rule    │ │ - SQLite or in-memory      │
//! └──────────────────────────────┘ └────────────────────────────┘
//! ```
//!
//! The preference store is injected rather than global, so every layer can be
//! tested against [`prefs::MemoryPreferences`].
//!
//! ## Module Overview
//!
//! - [`collection`]: The ordered photo list
//! - [`item`]: A single photo and its label
//! - [`order`]: Persisted display order
//! - [`thumbnail`]: Thumbnail sizing, generation and caching
//! - [`storage`]: Directory layout and JPEG writing
//! - [`prefs`]: Key-value preference store
//! - [`config`]: Configuration file and defaults
//! - [`error`]: Error types

pub mod collection;
pub mod config;
pub mod error;
pub mod item;
pub mod order;
pub mod prefs;
pub mod storage;
pub mod thumbnail;

#[cfg(test)]
pub(crate) mod test_support;

pub use collection::{Attachment, ItemCollection};
pub use config::JournalConfig;
pub use error::{JournalError, Result};
pub use item::{DeleteOutcome, Item};
pub use order::DisplayOrder;
pub use prefs::{MemoryPreferences, Preferences, SqlitePreferences};
pub use storage::PhotoStorage;
pub use thumbnail::ThumbnailSize;
