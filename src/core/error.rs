//! Error types for the showroom core

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Load error: {0}")]
    Load(String),

    #[error("No model loaded")]
    NoModelLoaded,

    #[error("No asset loader attached to this session")]
    LoaderUnavailable,

    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    #[error("Store error: {0}")]
    Store(String),
}
