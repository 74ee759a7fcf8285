//! Data structures for probed media information

use serde::{Deserialize, Serialize};

/// Metadata for one URL, trimmed to what the catalog builder consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

/// One entry of the engine's `formats` array
///
/// yt-dlp reports many more fields; everything not listed here is ignored
/// during deserialization. `vcodec` carries the sentinel `"none"` for
/// audio-only variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFormat {
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format_note: Option<String>,
}

impl RawFormat {
    /// Whether this variant carries a video stream
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref().unwrap_or("none") != "none"
    }
}
