//! Error handling for Tubeload

use thiserror::Error;

/// Main error type for Tubeload
#[derive(Debug, Error)]
pub enum TubeloadError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Failed to fetch media info: {0}")]
    Fetch(String),

    #[error("{0}")]
    Validation(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
