use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to scan photo directory: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("Index {index} is out of range for a collection of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid thumbnail size {width}x{height}: both dimensions must be non-zero")]
    InvalidThumbnailSize { width: u32, height: u32 },

    #[error("Invalid JPEG quality {0}: expected 1..=100")]
    InvalidQuality(u8),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, JournalError>;
