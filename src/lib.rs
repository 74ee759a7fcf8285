//! Tubeload library

pub mod backend;
pub mod catalog;
pub mod downloader;
pub mod extractor;
pub mod gui;
pub mod utils;

// Re-export main types for easier use
pub use backend::{BackendActor, BackendCommand, BackendEvent, FetchedInfo};
pub use catalog::{build_catalog, ContentKind, FormatCatalog, SelectionState};
pub use downloader::{DownloadRequest, ProgressEvent, ProgressStatus};
pub use extractor::{MediaExtractor, MediaInfo, RawFormat};
pub use utils::{AppSettings, TubeloadError};
