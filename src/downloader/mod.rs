//! Download invocation and progress reporting

pub mod invoker;
pub mod progress;

// Re-export for convenience
pub use invoker::{run_download, DownloadRequest};
pub use progress::{parse_progress_line, render, ProgressEvent, ProgressStatus};
