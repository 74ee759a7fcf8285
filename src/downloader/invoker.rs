//! Download invocation
//!
//! Turns the final selection into a yt-dlp argument vector and runs the
//! subprocess, streaming parsed progress events through a channel. One job
//! at a time; the caller enforces that.

use crate::catalog::ContentKind;
use crate::downloader::progress::{parse_progress_line, ProgressEvent, PROGRESS_TEMPLATE};
use crate::utils::error::TubeloadError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Audio stream requested alongside video, independent of the chosen
/// container
const COMPANION_AUDIO_FORMAT: &str = "m4a";

/// Transcode bitrate used when the quality label carries no numeric part
/// ("best")
const FALLBACK_AUDIO_BITRATE: &str = "192";

/// Everything the engine needs for one download, derived from the selection
/// at trigger time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: ContentKind,
    pub container_format: String,
    pub quality_label: String,
    pub output_dir: PathBuf,
}

impl DownloadRequest {
    /// Preconditions checked before any background work starts
    pub fn validate(&self) -> Result<(), TubeloadError> {
        if self.url.trim().is_empty() {
            return Err(TubeloadError::Validation(
                "Please enter a video URL".to_string(),
            ));
        }
        if self.quality_label.is_empty() {
            return Err(TubeloadError::Validation(
                "Please select a quality".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(TubeloadError::Validation(
                "Please select an output folder".to_string(),
            ));
        }
        Ok(())
    }

    /// Format selector expression handed to the engine
    ///
    /// Video keeps two distinct branches: with a height-style label the
    /// video stream gets a height ceiling, without one it does not. Both
    /// request the best companion audio stream and fall back to the best
    /// combined stream in the chosen container.
    pub fn format_selector(&self) -> String {
        match self.kind {
            ContentKind::Video => {
                let container = &self.container_format;
                match height_ceiling(&self.quality_label) {
                    Some(height) => format!(
                        "bestvideo[ext={container}][height<={height}]+bestaudio[ext={COMPANION_AUDIO_FORMAT}]/best[ext={container}]"
                    ),
                    None => format!(
                        "bestvideo[ext={container}]+bestaudio[ext={COMPANION_AUDIO_FORMAT}]/best[ext={container}]"
                    ),
                }
            }
            ContentKind::Audio => "bestaudio/best".to_string(),
        }
    }

    /// Output filename template: source title plus the container extension.
    /// Audio names the target extension directly since the engine transcodes
    /// after downloading.
    pub fn output_template(&self) -> String {
        let dir = self.output_dir.display();
        match self.kind {
            ContentKind::Video => format!("{}/%(title)s.%(ext)s", dir),
            ContentKind::Audio => format!("{}/%(title)s.{}", dir, self.container_format),
        }
    }

    /// Full argument vector for the engine invocation
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-f".to_string(), self.format_selector()];

        if self.kind == ContentKind::Audio {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(self.container_format.clone());
            args.push("--audio-quality".to_string());
            args.push(self.transcode_bitrate());
        }

        args.push("-o".to_string());
        args.push(self.output_template());
        args.push("--newline".to_string());
        args.push("--no-warnings".to_string());
        args.push("--progress-template".to_string());
        args.push(PROGRESS_TEMPLATE.to_string());
        args.push(self.url.clone());
        args
    }

    fn transcode_bitrate(&self) -> String {
        self.quality_label
            .strip_suffix('k')
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_AUDIO_BITRATE.to_string())
    }
}

/// Height ceiling for a height-style label ("1080p" -> 1080)
fn height_ceiling(label: &str) -> Option<u32> {
    label.strip_suffix('p').and_then(|n| n.parse().ok())
}

/// Run one download to completion, forwarding progress events in emission
/// order. Returns once the engine exits; a non-zero status surfaces the last
/// stderr line as the failure reason.
pub async fn run_download(
    ytdlp: &Path,
    request: &DownloadRequest,
    events: mpsc::Sender<ProgressEvent>,
) -> Result<(), TubeloadError> {
    info!(
        "Starting engine for {} ({} / {} / {})",
        request.url, request.kind, request.container_format, request.quality_label
    );

    let mut child = Command::new(ytdlp)
        .args(request.to_args())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| TubeloadError::Download("engine stdout unavailable".to_string()))?;

    let mut lines = BufReader::new(stdout).lines();
    while let Some(line) = lines.next_line().await? {
        debug!("engine: {}", line);
        if let Some(event) = parse_progress_line(&line) {
            // Receiver gone means the UI went away; keep draining so the
            // engine never blocks on a full pipe.
            let _ = events.send(event).await;
        }
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("engine exited with an error")
            .to_string();
        return Err(TubeloadError::Download(reason));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_request(quality: &str) -> DownloadRequest {
        DownloadRequest {
            url: "https://example.com/watch?v=abc".to_string(),
            kind: ContentKind::Video,
            container_format: "mp4".to_string(),
            quality_label: quality.to_string(),
            output_dir: PathBuf::from("/tmp/out"),
        }
    }

    fn audio_request(quality: &str) -> DownloadRequest {
        DownloadRequest {
            kind: ContentKind::Audio,
            container_format: "mp3".to_string(),
            quality_label: quality.to_string(),
            ..video_request(quality)
        }
    }

    #[test]
    fn test_video_selector_applies_height_ceiling() {
        assert_eq!(
            video_request("720p").format_selector(),
            "bestvideo[ext=mp4][height<=720]+bestaudio[ext=m4a]/best[ext=mp4]"
        );
    }

    #[test]
    fn test_video_selector_without_height_has_no_ceiling() {
        assert_eq!(
            video_request("Premium").format_selector(),
            "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]"
        );
    }

    #[test]
    fn test_audio_requests_best_source_and_transcode() {
        let args = audio_request("192k").to_args();
        assert_eq!(args[0], "-f");
        assert_eq!(args[1], "bestaudio/best");

        let x = args.iter().position(|a| a == "-x").expect("-x flag");
        assert_eq!(args[x + 1], "--audio-format");
        assert_eq!(args[x + 2], "mp3");
        assert_eq!(args[x + 3], "--audio-quality");
        assert_eq!(args[x + 4], "192");
    }

    #[test]
    fn test_audio_best_label_falls_back_to_default_bitrate() {
        let args = audio_request("best").to_args();
        let q = args
            .iter()
            .position(|a| a == "--audio-quality")
            .expect("quality flag");
        assert_eq!(args[q + 1], "192");
    }

    #[test]
    fn test_audio_output_template_names_target_extension() {
        assert_eq!(
            audio_request("192k").output_template(),
            "/tmp/out/%(title)s.mp3"
        );
    }

    #[test]
    fn test_video_output_template_keeps_engine_extension() {
        assert_eq!(
            video_request("720p").output_template(),
            "/tmp/out/%(title)s.%(ext)s"
        );
    }

    #[test]
    fn test_args_end_with_url_and_carry_progress_template() {
        let args = video_request("720p").to_args();
        assert_eq!(args.last().unwrap(), "https://example.com/watch?v=abc");
        let t = args
            .iter()
            .position(|a| a == "--progress-template")
            .expect("template flag");
        assert_eq!(args[t + 1], PROGRESS_TEMPLATE);
        assert!(args.contains(&"--newline".to_string()));
    }

    #[test]
    fn test_validation_rejects_missing_fields() {
        let mut request = video_request("720p");
        request.url = "   ".to_string();
        assert!(matches!(
            request.validate(),
            Err(TubeloadError::Validation(_))
        ));

        let mut request = video_request("720p");
        request.quality_label = String::new();
        assert!(matches!(
            request.validate(),
            Err(TubeloadError::Validation(_))
        ));

        let mut request = video_request("720p");
        request.output_dir = PathBuf::new();
        assert!(matches!(
            request.validate(),
            Err(TubeloadError::Validation(_))
        ));

        assert!(video_request("720p").validate().is_ok());
    }
}
