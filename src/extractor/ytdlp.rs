//! yt-dlp wrapper for media metadata probing
//!
//! All format negotiation and downloading is delegated to yt-dlp; this
//! module only locates the binary and asks it what a URL offers.

use crate::extractor::models::MediaInfo;
use crate::utils::error::TubeloadError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// Media info provider backed by the yt-dlp binary
pub struct MediaExtractor {
    ytdlp_path: PathBuf,
}

impl MediaExtractor {
    /// Initialize the extractor and verify yt-dlp availability
    ///
    /// Search order:
    /// 1. Next to the executable (for bundled installs)
    /// 2. System PATH
    /// 3. Common installation paths (Homebrew, pip user installs, etc.)
    pub fn new() -> Result<Self> {
        let ytdlp_path = match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                path
            }
            None => {
                error!("yt-dlp not found anywhere");
                return Err(TubeloadError::YtDlpNotFound.into());
            }
        };

        Ok(Self { ytdlp_path })
    }

    /// Fetch available stream variants for a URL without downloading
    ///
    /// Uses: yt-dlp --dump-json --no-download
    pub async fn probe(&self, url: &str) -> Result<MediaInfo> {
        debug!("Probing media info for URL: {}", url);

        let output = AsyncCommand::new(&self.ytdlp_path)
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-warnings")
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp probe failed: {}", error_msg);
            return Err(TubeloadError::Fetch(error_msg.trim().to_string()).into());
        }

        // Playlists emit one JSON object per line; the first entry is enough
        // to populate the selectors.
        let json_str = String::from_utf8(output.stdout)?;
        let first_line = json_str
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| TubeloadError::Fetch("engine returned no metadata".to_string()))?;

        let info: MediaInfo = serde_json::from_str(first_line)?;
        Ok(info)
    }

    /// Path of the yt-dlp binary in use
    pub fn engine_path(&self) -> &Path {
        &self.ytdlp_path
    }
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find the yt-dlp binary, preferring a copy shipped next to the executable
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(bundled) = find_next_to_executable() {
        info!("Using bundled yt-dlp: {:?}", bundled);
        return Some(bundled);
    }

    if let Some(system) = find_in_path() {
        info!("Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("yt-dlp not found anywhere");
    None
}

/// Check for a yt-dlp binary sitting next to the current executable
fn find_next_to_executable() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;

    let candidate = exe_dir.join("yt-dlp");
    if candidate.exists() && is_executable(&candidate) {
        return Some(candidate);
    }

    None
}

/// Find yt-dlp in the system PATH
fn find_in_path() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Find yt-dlp in common installation paths
fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        // macOS Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // macOS Homebrew (Intel)
        "/usr/local/bin/yt-dlp",
        // System
        "/usr/bin/yt-dlp",
        // pip user install
        "~/.local/bin/yt-dlp",
    ];

    for path_str in common_paths {
        let expanded = if let Some(rest) = path_str.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => PathBuf::from(path_str),
            }
        } else {
            PathBuf::from(path_str)
        };

        if expanded.exists() && is_executable(&expanded) {
            return Some(expanded);
        }
    }

    None
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Ok(metadata) = std::fs::metadata(path) {
            return metadata.permissions().mode() & 0o111 != 0;
        }

        false
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}

// ============================================================
// Tests
// ============================================================
