//! # Item Collection
//!
//! The ordered list of photos shown to the user, backed by the persisted
//! display order. Every mutation leaves the stored map consistent with the
//! in-memory sequence:
//!
//! - **append**: new item gets `max(position) + 1` (or 0)
//! - **remove**: the entry is dropped from the map
//! - **move**: the map is rewritten as `0..n-1` in sequence order
//!
//! ## Loading
//!
//! `load_all` enumerates the documents directory, rebuilds one [`Item`] per
//! photo and sorts by the stored map. When no map was ever stored, the
//! enumeration order (by file name) becomes the initial order and is written
//! back. Photos missing from the map sort after all mapped ones, by file name,
//! and are then given positions after the current maximum. Map entries whose
//! photo has disappeared are pruned.
//!
//! Nothing here is atomic across steps: a crash between persisting the map and
//! deleting files can leave a stale entry or an orphaned file, which the next
//! load reconciles.

use chrono::{Local, NaiveDateTime};
use image::DynamicImage;
use log::{error, info, warn};
use std::collections::HashSet;
use std::ops::Index;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{JournalError, Result};
use crate::item::{self, DeleteOutcome, Item};
use crate::order::DisplayOrder;
use crate::prefs::Preferences;
use crate::storage::{PhotoStorage, PHOTO_EXTENSION};

/// A checked photo handed to the mail collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub photo_path: PathBuf,
    pub label: String,
}

pub struct ItemCollection<P: Preferences> {
    storage: PhotoStorage,
    prefs: P,
    items: Vec<Item>,
    order: DisplayOrder,
}

impl<P: Preferences> ItemCollection<P> {
    /// Load every stored photo and sort them into display order.
    ///
    /// A failure to enumerate the documents directory aborts the load.
    /// Files that don't decode as images are skipped, and a stored order map
    /// that doesn't parse is replaced with file-name order.
    pub fn load_all(storage: PhotoStorage, prefs: P) -> Result<Self> {
        let items: Vec<Item> = scan_photo_names(storage.documents_dir())?
            .iter()
            .map(|file_name| Item::open(&storage, file_name))
            .collect();

        let stored = match DisplayOrder::load(&prefs) {
            Ok(stored) => stored,
            Err(JournalError::Serialization(e)) => {
                warn!("⚠️  Discarding unreadable display order: {}", e);
                None
            }
            Err(e) => return Err(e),
        };
        let order = match stored {
            Some(order) => order,
            None => {
                let order = DisplayOrder::from_sequence(items.iter().map(Item::order_key));
                order.save(&prefs)?;
                order
            }
        };

        let mut collection = Self {
            storage,
            prefs,
            items,
            order,
        };
        collection.sort_by_display_order()?;

        info!("🎨 Loaded {} photos", collection.items.len());
        Ok(collection)
    }

    fn sort_by_display_order(&mut self) -> Result<()> {
        let order = &self.order;
        self.items.sort_by_cached_key(|item| {
            let file_name = item.file_name().to_string();
            match order.position(&item.order_key()) {
                Some(position) => (false, position, file_name),
                None => (true, 0, file_name),
            }
        });

        let live: HashSet<String> = self.items.iter().map(Item::order_key).collect();
        let before = self.order.len();
        self.order.retain(|key| live.contains(key));
        let mut changed = self.order.len() != before;

        for item in &self.items {
            let key = item.order_key();
            if !self.order.contains(&key) {
                let position = self.order.next_position();
                self.order.insert(key, position);
                changed = true;
            }
        }

        if changed {
            self.order.save(&self.prefs)?;
        }
        Ok(())
    }

    /// Store a new photo captured now and append it. Returns its index.
    pub fn append(&mut self, image_bytes: &[u8]) -> Result<usize> {
        self.append_at(image_bytes, Local::now().naive_local())
    }

    /// Store a new photo with a caller-provided capture time and append it.
    ///
    /// Capture times that collide with an existing photo (same second) get a
    /// `-2`, `-3`, ... suffix on the file name.
    pub fn append_at(&mut self, image_bytes: &[u8], captured_at: NaiveDateTime) -> Result<usize> {
        let file_name = self.unique_file_name(&item::file_name_for(captured_at));

        let item = Item::create(&self.storage, &file_name, image_bytes).map_err(|e| {
            error!("❌ Failed to store photo {}: {}", file_name, e);
            e
        })?;

        let mut order = self.order.clone();
        order.insert(item.order_key(), order.next_position());
        if let Err(e) = order.save(&self.prefs) {
            error!("❌ Failed to record order for {}: {}", file_name, e);
            item.delete(&self.prefs);
            return Err(e);
        }

        self.order = order;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    fn unique_file_name(&self, base: &str) -> String {
        let taken = |name: &str| {
            self.items.iter().any(|item| item.file_name() == name)
                || self.storage.photo_path(name).exists()
        };

        if !taken(base) {
            return base.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Remove one photo: its order entry first, then the in-memory item,
    /// then its files and label. If the order can't be saved nothing changes;
    /// file and label failures after that are reported in the outcome.
    pub fn remove_at(&mut self, index: usize) -> Result<DeleteOutcome> {
        self.check_index(index)?;

        let mut order = self.order.clone();
        order.remove(&self.items[index].order_key());
        order.save(&self.prefs)?;
        self.order = order;

        let item = self.items.remove(index);
        let outcome = item.delete(&self.prefs);
        if !outcome.is_complete() {
            warn!("⚠️  Partially deleted {}: {:?}", item.file_name(), outcome);
        }
        Ok(outcome)
    }

    /// Remove every checked photo. Returns how many were removed.
    pub fn remove_checked(&mut self) -> Result<usize> {
        let mut removed = 0;
        // Back to front so earlier indices stay valid
        for index in (0..self.items.len()).rev() {
            if self.items[index].is_checked() {
                self.remove_at(index)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Move the photo at `from` so it ends up at `to`, then rewrite the whole
    /// order map from the new sequence.
    pub fn move_element(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;

        let item = self.items.remove(from);
        self.items.insert(to, item);

        self.order = DisplayOrder::from_sequence(self.items.iter().map(Item::order_key));
        self.order.save(&self.prefs)
    }

    /// Mark one photo. Returns the number of checked photos.
    pub fn check_item(&mut self, index: usize) -> Result<usize> {
        self.item_mut(index)?.set_checked(true);
        Ok(self.count_checked())
    }

    /// Unmark one photo. Returns the number of checked photos.
    pub fn uncheck_item(&mut self, index: usize) -> Result<usize> {
        self.item_mut(index)?.set_checked(false);
        Ok(self.count_checked())
    }

    pub fn check_all(&mut self) -> usize {
        for item in &mut self.items {
            item.set_checked(true);
        }
        self.count_checked()
    }

    /// Clear every mark; also how editing mode ends
    pub fn uncheck_all(&mut self) -> usize {
        for item in &mut self.items {
            item.set_checked(false);
        }
        self.count_checked()
    }

    pub fn count_checked(&self) -> usize {
        self.items.iter().filter(|item| item.is_checked()).count()
    }

    /// Photo paths and labels of the checked photos, in display order
    pub fn checked_attachments(&self) -> Result<Vec<Attachment>> {
        self.items
            .iter()
            .filter(|item| item.is_checked())
            .map(|item| {
                Ok(Attachment {
                    photo_path: item.photo_path().to_path_buf(),
                    label: item.label(&self.prefs)?,
                })
            })
            .collect()
    }

    pub fn label(&self, index: usize) -> Result<String> {
        self.item(index)?.label(&self.prefs)
    }

    pub fn set_label(&self, index: usize, label: &str) -> Result<()> {
        self.item(index)?.set_label(&self.prefs, label)
    }

    pub fn reset_label(&self, index: usize) -> Result<()> {
        self.item(index)?.reset_label(&self.prefs)
    }

    /// Thumbnail for a photo, regenerating it if it was missing
    pub fn ensure_thumbnail(&mut self, index: usize) -> Result<Option<&DynamicImage>> {
        self.check_index(index)?;
        let storage = &self.storage;
        Ok(self.items[index].ensure_thumbnail(storage))
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn display_order(&self) -> &DisplayOrder {
        &self.order
    }

    pub fn storage(&self) -> &PhotoStorage {
        &self.storage
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(JournalError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn item(&self, index: usize) -> Result<&Item> {
        self.check_index(index)?;
        Ok(&self.items[index])
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut Item> {
        self.check_index(index)?;
        Ok(&mut self.items[index])
    }
}

impl<P: Preferences + Send + 'static> ItemCollection<P> {
    /// Run [`ItemCollection::load_all`] on a blocking background task.
    ///
    /// The caller gets the collection only once loading has finished, so no
    /// mutation can race the load.
    pub async fn load_all_async(storage: PhotoStorage, prefs: P) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::load_all(storage, prefs)).await?
    }
}

/// Out-of-range access panics; use [`ItemCollection::get`] to check first
impl<P: Preferences> Index<usize> for ItemCollection<P> {
    type Output = Item;

    fn index(&self, index: usize) -> &Item {
        &self.items[index]
    }
}

impl<'a, P: Preferences> IntoIterator for &'a ItemCollection<P> {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// File names (without extension) of the decodable photos in `documents_dir`
fn scan_photo_names(documents_dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(documents_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        // Skips leftover temp files from interrupted writes
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(PHOTO_EXTENSION) {
            continue;
        }

        if let Err(e) = image::image_dimensions(path) {
            warn!("⚠️  Skipping undecodable photo {}: {}", path.display(), e);
            continue;
        }

        if let Some(stem) = path.file_stem() {
            names.push(stem.to_string_lossy().into_owned());
        }
    }

    Ok(names)
}
