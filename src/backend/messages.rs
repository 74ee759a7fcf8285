use crate::catalog::FormatCatalog;
use crate::downloader::DownloadRequest;

/// Commands sent from GUI to Backend
#[derive(Debug, Clone)]
pub enum BackendCommand {
    FetchInfo { url: String },
    StartDownload { request: DownloadRequest },
    Shutdown,
}

/// Events sent from Backend to GUI, delivered in emission order
#[derive(Debug, Clone)]
pub enum BackendEvent {
    // Metadata fetch
    FetchStarted,
    FetchCompleted(Result<FetchedInfo, String>),

    // Download life-cycle
    DownloadStarted,
    DownloadProgress(String),
    DownloadCompleted,
    DownloadFailed(String),

    // Precondition violations; no worker was started
    ValidationFailed(String),
    // A job is already in flight; concurrent invocations are rejected
    DownloadRejected,
}

/// Result of a successful metadata fetch
#[derive(Debug, Clone)]
pub struct FetchedInfo {
    pub title: String,
    pub catalog: FormatCatalog,
}
