//! Thumbnail generation and caching
//!
//! A thumbnail is generated once and reused forever: if a file already sits at
//! the thumbnail path it is decoded and returned as-is, with no staleness check
//! against the source photo.

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::error::{JournalError, Result};
use crate::storage::{encode_jpeg, write_atomic};

/// Bounding box thumbnails are scaled to fit inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    width: u32,
    height: u32,
}

impl Default for ThumbnailSize {
    /// 48x48, the size of a list row icon
    fn default() -> Self {
        Self {
            width: 48,
            height: 48,
        }
    }
}

impl ThumbnailSize {
    /// A zero dimension would make the scale factor undefined, so it is rejected here
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(JournalError::InvalidThumbnailSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scale `source_width` x `source_height` to fit this box, preserving aspect ratio.
    ///
    /// The factor is `min(width / source_width, height / source_height)`; each
    /// side of the result is at least one pixel.
    pub fn fit(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        let source_width = source_width.max(1) as f64;
        let source_height = source_height.max(1) as f64;

        let scale = (self.width as f64 / source_width).min(self.height as f64 / source_height);

        let width = (source_width * scale).round().max(1.0) as u32;
        let height = (source_height * scale).round().max(1.0) as u32;
        (width, height)
    }
}

/// Check if a thumbnail has been cached at `thumb_path`
pub fn thumbnail_exists(thumb_path: &Path) -> bool {
    thumb_path.is_file()
}

/// Load the cached thumbnail, or `Ok(None)` if nothing is cached yet
pub fn load_cached(thumb_path: &Path) -> Result<Option<DynamicImage>> {
    if !thumbnail_exists(thumb_path) {
        return Ok(None);
    }

    let thumbnail = image::open(thumb_path)?;
    debug!("Thumbnail cache hit: {}", thumb_path.display());
    Ok(Some(thumbnail))
}

/// Return the cached thumbnail for a photo, generating and caching it on a miss
pub fn load_or_generate(
    photo_path: &Path,
    thumb_path: &Path,
    size: ThumbnailSize,
    quality: u8,
) -> Result<DynamicImage> {
    load_or_generate_with(thumb_path, size, quality, || Ok(image::open(photo_path)?))
}

/// Same as [`load_or_generate`], but the source image comes from `source`.
///
/// `source` is only called on a cache miss.
pub fn load_or_generate_with<F>(
    thumb_path: &Path,
    size: ThumbnailSize,
    quality: u8,
    source: F,
) -> Result<DynamicImage>
where
    F: FnOnce() -> Result<DynamicImage>,
{
    if let Some(cached) = load_cached(thumb_path)? {
        return Ok(cached);
    }

    let source = source()?;
    generate(&source, thumb_path, size, quality)
}

/// Scale `source` to fit `size`, write it to `thumb_path` as JPEG and return it
pub fn generate(
    source: &DynamicImage,
    thumb_path: &Path,
    size: ThumbnailSize,
    quality: u8,
) -> Result<DynamicImage> {
    let (source_width, source_height) = source.dimensions();
    let (width, height) = size.fit(source_width, source_height);

    let thumbnail = source.resize_exact(width, height, FilterType::Lanczos3);

    let jpeg = encode_jpeg(&thumbnail, quality)?;
    // The cache directory may have been purged since storage was set up
    if let Some(dir) = thumb_path.parent() {
        fs::create_dir_all(dir)?;
    }
    write_atomic(thumb_path, &jpeg)?;

    info!("📸 Generated thumbnail: {}", thumb_path.display());
    Ok(thumbnail)
}
