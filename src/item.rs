//! A single stored photo
//!
//! An item owns a full-resolution JPEG in the documents directory and a
//! thumbnail in the cache directory, both named after the capture time.
//! Its label is a persisted override keyed by the file name, falling back to
//! a label derived from that same capture time.

use chrono::NaiveDateTime;
use image::DynamicImage;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::prefs::Preferences;
use crate::storage::{encode_jpeg, write_atomic, PhotoStorage};
use crate::thumbnail;

/// Capture time as a file name, e.g. `Fri_Jul_24_2015_13:04:05`
pub const FILE_NAME_FORMAT: &str = "%a_%b_%d_%Y_%H:%M:%S";

/// Capture time for display, e.g. `Jul 24, 2015, 1:04:05 PM`
pub const LABEL_FORMAT: &str = "%b %-d, %Y, %-I:%M:%S %p";

/// Appended to the file name to form the display order key
pub const ORDER_KEY_SUFFIX: &str = "_displayOrder_";

/// Represents a single photo in the journal
#[derive(Debug, Clone)]
pub struct Item {
    /// Base name shared by the photo and its thumbnail (no extension)
    file_name: String,
    photo_path: PathBuf,
    thumb_path: PathBuf,
    default_label: String,
    /// None if the thumbnail could not be produced
    thumbnail: Option<DynamicImage>,
    /// Multi-select state, never persisted
    is_checked: bool,
}

/// What [`Item::delete`] managed to remove
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub photo_removed: bool,
    pub thumbnail_removed: bool,
    pub label_removed: bool,
}

impl DeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.photo_removed && self.thumbnail_removed && self.label_removed
    }
}

impl Item {
    /// Store a new photo from raw image bytes and produce its thumbnail.
    ///
    /// Fails if the bytes don't decode or the photo can't be written. A
    /// thumbnail that can't be generated or cached is logged and left as
    /// `None`; the item is still returned.
    pub fn create(storage: &PhotoStorage, file_name: &str, image_bytes: &[u8]) -> Result<Self> {
        let photo = image::load_from_memory(image_bytes)?;

        let photo_path = storage.photo_path(file_name);
        let jpeg = encode_jpeg(&photo, storage.photo_quality())?;
        write_atomic(&photo_path, &jpeg)?;
        info!("📷 Saved photo: {}", photo_path.display());

        let thumb_path = storage.thumb_path(file_name);
        let thumbnail = thumbnail::load_or_generate_with(
            &thumb_path,
            storage.thumbnail_size(),
            storage.thumbnail_quality(),
            || Ok(photo),
        );

        Ok(Self::assemble(
            file_name,
            photo_path,
            thumb_path,
            keep_thumbnail(file_name, thumbnail),
        ))
    }

    /// Rebuild an item for a photo already on disk
    pub fn open(storage: &PhotoStorage, file_name: &str) -> Self {
        let photo_path = storage.photo_path(file_name);
        let thumb_path = storage.thumb_path(file_name);
        let thumbnail = thumbnail::load_or_generate(
            &photo_path,
            &thumb_path,
            storage.thumbnail_size(),
            storage.thumbnail_quality(),
        );

        Self::assemble(
            file_name,
            photo_path,
            thumb_path,
            keep_thumbnail(file_name, thumbnail),
        )
    }

    fn assemble(
        file_name: &str,
        photo_path: PathBuf,
        thumb_path: PathBuf,
        thumbnail: Option<DynamicImage>,
    ) -> Self {
        Self {
            file_name: file_name.to_string(),
            photo_path,
            thumb_path,
            default_label: default_label_for(file_name),
            thumbnail,
            is_checked: false,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn photo_path(&self) -> &Path {
        &self.photo_path
    }

    pub fn thumb_path(&self) -> &Path {
        &self.thumb_path
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Key of this item in the persisted display order
    pub fn order_key(&self) -> String {
        format!("{}{}", self.file_name, ORDER_KEY_SUFFIX)
    }

    pub fn thumbnail(&self) -> Option<&DynamicImage> {
        self.thumbnail.as_ref()
    }

    /// Retry the thumbnail if the item has none, e.g. after the cache was purged
    pub fn ensure_thumbnail(&mut self, storage: &PhotoStorage) -> Option<&DynamicImage> {
        if self.thumbnail.is_none() {
            let thumbnail = thumbnail::load_or_generate(
                &self.photo_path,
                &self.thumb_path,
                storage.thumbnail_size(),
                storage.thumbnail_quality(),
            );
            self.thumbnail = keep_thumbnail(&self.file_name, thumbnail);
        }
        self.thumbnail.as_ref()
    }

    /// Decode the full-resolution photo
    pub fn photo_image(&self) -> Result<DynamicImage> {
        Ok(image::open(&self.photo_path)?)
    }

    pub fn is_checked(&self) -> bool {
        self.is_checked
    }

    pub(crate) fn set_checked(&mut self, checked: bool) {
        self.is_checked = checked;
    }

    /// The user's label if one was set, otherwise the default
    pub fn label<P: Preferences + ?Sized>(&self, prefs: &P) -> Result<String> {
        Ok(prefs
            .get(&self.file_name)?
            .unwrap_or_else(|| self.default_label.clone()))
    }

    pub fn set_label<P: Preferences + ?Sized>(&self, prefs: &P, label: &str) -> Result<()> {
        prefs.set(&self.file_name, label)
    }

    /// Drop the user's label so the default shows again
    pub fn reset_label<P: Preferences + ?Sized>(&self, prefs: &P) -> Result<()> {
        prefs.remove(&self.file_name)
    }

    pub fn has_custom_label<P: Preferences + ?Sized>(&self, prefs: &P) -> Result<bool> {
        Ok(prefs.get(&self.file_name)?.is_some())
    }

    /// Remove the photo, the thumbnail and the label override.
    ///
    /// Each removal is attempted even if an earlier one failed. Failures are
    /// logged and reported in the outcome, never returned as errors.
    pub fn delete<P: Preferences + ?Sized>(&self, prefs: &P) -> DeleteOutcome {
        let photo_removed = remove_file_logged(&self.photo_path, "photo");
        let thumbnail_removed = remove_file_logged(&self.thumb_path, "thumbnail");

        let label_removed = match prefs.remove(&self.file_name) {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️  Error removing label for {}: {}", self.file_name, e);
                false
            }
        };

        DeleteOutcome {
            photo_removed,
            thumbnail_removed,
            label_removed,
        }
    }
}

fn keep_thumbnail(file_name: &str, thumbnail: Result<DynamicImage>) -> Option<DynamicImage> {
    match thumbnail {
        Ok(thumbnail) => Some(thumbnail),
        Err(e) => {
            warn!("⚠️  No thumbnail for {}: {}", file_name, e);
            None
        }
    }
}

/// Returns true if the file is gone afterwards
fn remove_file_logged(path: &Path, what: &str) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No {} to delete at {}", what, path.display());
            true
        }
        Err(e) => {
            warn!("⚠️  Error deleting {} {}: {}", what, path.display(), e);
            false
        }
    }
}

/// File name for a photo captured at `captured_at`
pub fn file_name_for(captured_at: NaiveDateTime) -> String {
    captured_at.format(FILE_NAME_FORMAT).to_string()
}

/// Recover the capture time from a file name, ignoring a `-N` collision suffix
pub fn parse_file_name(file_name: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(file_name, FILE_NAME_FORMAT)
        .ok()
        .or_else(|| {
            let (stem, suffix) = file_name.rsplit_once('-')?;
            suffix.parse::<u32>().ok()?;
            NaiveDateTime::parse_from_str(stem, FILE_NAME_FORMAT).ok()
        })
}

/// Display label for a file name; names that aren't timestamps are shown as-is
pub fn default_label_for(file_name: &str) -> String {
    match parse_file_name(file_name) {
        Some(captured_at) => captured_at.format(LABEL_FORMAT).to_string(),
        None => file_name.to_string(),
    }
}
