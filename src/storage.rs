//! On-disk layout for photos and their thumbnails
//!
//! Full-resolution photos live in the durable documents directory as
//! `<file_name>.jpg`. Thumbnails share the same base name inside a fixed
//! subdirectory of the cache area, which the OS is free to purge.

use image::{codecs::jpeg::JpegEncoder, DynamicImage};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{JournalError, Result};
use crate::thumbnail::ThumbnailSize;

/// Subdirectory of the cache area holding thumbnails
pub const THUMBNAIL_SUBDIR: &str = "selfieThumb";

/// Extension used for both photos and thumbnails
pub const PHOTO_EXTENSION: &str = "jpg";

/// JPEG quality for full-resolution photos
pub const DEFAULT_PHOTO_QUALITY: u8 = 90;

/// JPEG quality for thumbnails (lower than photos)
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 75;

/// Where photos and thumbnails are written, and how they are encoded
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    documents_dir: PathBuf,
    thumbnail_dir: PathBuf,
    thumbnail_size: ThumbnailSize,
    photo_quality: u8,
    thumbnail_quality: u8,
}

impl PhotoStorage {
    /// Create the storage layout, making sure both directories exist.
    ///
    /// Failing to create either directory is fatal: nothing can be stored
    /// or enumerated without them.
    pub fn new(
        documents_dir: impl Into<PathBuf>,
        cache_dir: impl AsRef<Path>,
        thumbnail_size: ThumbnailSize,
    ) -> Result<Self> {
        let storage = Self {
            documents_dir: documents_dir.into(),
            thumbnail_dir: cache_dir.as_ref().join(THUMBNAIL_SUBDIR),
            thumbnail_size,
            photo_quality: DEFAULT_PHOTO_QUALITY,
            thumbnail_quality: DEFAULT_THUMBNAIL_QUALITY,
        };

        fs::create_dir_all(&storage.documents_dir)?;
        fs::create_dir_all(&storage.thumbnail_dir)?;

        Ok(storage)
    }

    /// Override the JPEG qualities (each must be in 1..=100)
    pub fn with_qualities(mut self, photo_quality: u8, thumbnail_quality: u8) -> Result<Self> {
        self.photo_quality = validate_quality(photo_quality)?;
        self.thumbnail_quality = validate_quality(thumbnail_quality)?;
        Ok(self)
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    pub fn thumbnail_dir(&self) -> &Path {
        &self.thumbnail_dir
    }

    pub fn thumbnail_size(&self) -> ThumbnailSize {
        self.thumbnail_size
    }

    pub fn photo_quality(&self) -> u8 {
        self.photo_quality
    }

    pub fn thumbnail_quality(&self) -> u8 {
        self.thumbnail_quality
    }

    /// Path of the full-resolution photo for a file name
    pub fn photo_path(&self, file_name: &str) -> PathBuf {
        self.documents_dir
            .join(format!("{}.{}", file_name, PHOTO_EXTENSION))
    }

    /// Path of the cached thumbnail for a file name (doesn't generate it)
    pub fn thumb_path(&self, file_name: &str) -> PathBuf {
        self.thumbnail_dir
            .join(format!("{}.{}", file_name, PHOTO_EXTENSION))
    }
}

fn validate_quality(quality: u8) -> Result<u8> {
    if (1..=100).contains(&quality) {
        Ok(quality)
    } else {
        Err(JournalError::InvalidQuality(quality))
    }
}

/// Encode an image as JPEG at the given quality.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    Ok(bytes)
}

/// Write bytes to a dot-prefixed temp file beside `path`, then rename it into place
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&tmp_path, bytes)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}
