use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tempfile::TempDir;

use crate::storage::PhotoStorage;
use crate::thumbnail::ThumbnailSize;

/// A gradient so encoded images are not trivially uniform
pub fn sample_image(width: u32, height: u32) -> DynamicImage {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 4 % 256) as u8, (y * 4 % 256) as u8, 128])
    });
    DynamicImage::ImageRgb8(image)
}

/// PNG bytes, as an import surface would hand them over
pub fn sample_image_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    sample_image(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("failed to encode sample image");
    bytes
}

pub struct TestEnv {
    // Keeps the directory alive until the test is done
    pub _temp_dir: TempDir,
    pub storage: PhotoStorage,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let storage = PhotoStorage::new(
            temp_dir.path().join("documents"),
            temp_dir.path().join("cache"),
            ThumbnailSize::default(),
        )
        .expect("failed to create storage");
        Self {
            _temp_dir: temp_dir,
            storage,
        }
    }
}
