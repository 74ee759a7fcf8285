//! Selectable-format catalog derived from probed media variants
//!
//! The catalog is the data behind the cascading dropdowns: per content kind,
//! a map from container format to a descending list of quality labels. It is
//! rebuilt from scratch on every successful probe and never mutated in
//! place.

pub mod selection;

pub use selection::SelectionState;

use crate::extractor::RawFormat;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Audio output containers offered regardless of what the source carries.
/// Any of these is reachable through on-the-fly transcoding.
pub const AUDIO_TARGET_FORMATS: [&str; 6] = ["mp3", "m4a", "wav", "flac", "aac", "opus"];

/// Quality ladder offered for every audio target. "best" carries no numeric
/// magnitude, so it sorts below the explicit bitrates.
pub const AUDIO_QUALITY_LADDER: [&str; 5] = ["best", "320k", "256k", "192k", "128k"];

/// Top-level choice deciding which catalog subtree and invocation branch
/// applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentKind {
    #[default]
    Video,
    Audio,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Video, ContentKind::Audio];
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Video => write!(f, "Video"),
            ContentKind::Audio => write!(f, "Audio"),
        }
    }
}

/// Container format -> descending quality labels, per content kind
///
/// BTreeMap keys give the ascending-lexical container ordering the selection
/// rules rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatCatalog {
    video: BTreeMap<String, Vec<String>>,
    audio: BTreeMap<String, Vec<String>>,
}

impl FormatCatalog {
    pub fn for_kind(&self, kind: ContentKind) -> &BTreeMap<String, Vec<String>> {
        match kind {
            ContentKind::Video => &self.video,
            ContentKind::Audio => &self.audio,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty()
    }
}

/// Build the catalog for one probe result
///
/// Video buckets come from the observed variants: a variant counts iff its
/// `vcodec` is present and not "none". Its label is `{height}p` when the
/// height is known, else the raw format note; a variant with neither still
/// creates its container bucket. Audio buckets are the fixed transcode
/// targets and ignore the variants entirely.
pub fn build_catalog(formats: &[RawFormat]) -> FormatCatalog {
    let mut video: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for format in formats {
        let ext = match format.ext.as_deref() {
            Some(ext) if !ext.is_empty() => ext,
            _ => continue,
        };
        if !format.has_video() {
            continue;
        }

        let bucket = video.entry(ext.to_string()).or_default();
        if let Some(height) = format.height {
            bucket.insert(format!("{}p", height));
        } else if let Some(note) = format.format_note.as_deref() {
            if !note.is_empty() {
                bucket.insert(note.to_string());
            }
        }
    }

    let mut audio: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for ext in AUDIO_TARGET_FORMATS {
        let bucket = audio.entry(ext.to_string()).or_default();
        for quality in AUDIO_QUALITY_LADDER {
            bucket.insert(quality.to_string());
        }
    }

    FormatCatalog {
        video: sort_buckets(video, 'p'),
        audio: sort_buckets(audio, 'k'),
    }
}

/// Numeric magnitude of a quality label: height for `p` labels, bitrate for
/// `k` labels, 0 for anything else
pub fn label_magnitude(label: &str, suffix: char) -> u32 {
    label
        .strip_suffix(suffix)
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn sort_buckets(
    buckets: BTreeMap<String, BTreeSet<String>>,
    suffix: char,
) -> BTreeMap<String, Vec<String>> {
    buckets
        .into_iter()
        .map(|(ext, labels)| {
            let mut labels: Vec<String> = labels.into_iter().collect();
            labels.sort_by(|a, b| {
                label_magnitude(b, suffix)
                    .cmp(&label_magnitude(a, suffix))
                    .then_with(|| a.cmp(b))
            });
            (ext, labels)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_variant(ext: &str, vcodec: &str, height: Option<u32>) -> RawFormat {
        RawFormat {
            ext: Some(ext.to_string()),
            vcodec: Some(vcodec.to_string()),
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_heights_sort_descending() {
        let formats = vec![
            video_variant("mp4", "avc1", Some(720)),
            video_variant("mp4", "avc1", Some(1080)),
        ];

        let catalog = build_catalog(&formats);
        assert_eq!(
            catalog.for_kind(ContentKind::Video)["mp4"],
            vec!["1080p", "720p"]
        );
    }

    #[test]
    fn test_duplicate_heights_collapse() {
        let formats = vec![
            video_variant("mp4", "avc1", Some(720)),
            video_variant("mp4", "avc1.64001F", Some(720)),
        ];

        let catalog = build_catalog(&formats);
        assert_eq!(catalog.for_kind(ContentKind::Video)["mp4"], vec!["720p"]);
    }

    #[test]
    fn test_audio_only_variants_are_excluded_from_video() {
        let formats = vec![
            video_variant("mp4", "avc1", Some(360)),
            RawFormat {
                ext: Some("webm".to_string()),
                vcodec: Some("none".to_string()),
                acodec: Some("opus".to_string()),
                ..Default::default()
            },
            RawFormat {
                ext: Some("m4a".to_string()),
                acodec: Some("mp4a.40.2".to_string()),
                ..Default::default()
            },
        ];

        let catalog = build_catalog(&formats);
        let video = catalog.for_kind(ContentKind::Video);
        assert!(video.contains_key("mp4"));
        assert!(!video.contains_key("webm"));
        assert!(!video.contains_key("m4a"));
    }

    #[test]
    fn test_format_note_is_label_fallback() {
        let formats = vec![RawFormat {
            ext: Some("mp4".to_string()),
            vcodec: Some("avc1".to_string()),
            format_note: Some("Premium".to_string()),
            ..Default::default()
        }];

        let catalog = build_catalog(&formats);
        assert_eq!(catalog.for_kind(ContentKind::Video)["mp4"], vec!["Premium"]);
    }

    #[test]
    fn test_unlabelable_variant_keeps_its_bucket() {
        let formats = vec![video_variant("mp4", "avc1", None)];

        let catalog = build_catalog(&formats);
        let video = catalog.for_kind(ContentKind::Video);
        assert!(video.contains_key("mp4"));
        assert!(video["mp4"].is_empty());
    }

    #[test]
    fn test_non_numeric_labels_sort_below_heights() {
        let formats = vec![
            RawFormat {
                ext: Some("mp4".to_string()),
                vcodec: Some("avc1".to_string()),
                format_note: Some("Premium".to_string()),
                ..Default::default()
            },
            video_variant("mp4", "avc1", Some(480)),
        ];

        let catalog = build_catalog(&formats);
        assert_eq!(
            catalog.for_kind(ContentKind::Video)["mp4"],
            vec!["480p", "Premium"]
        );
    }

    #[test]
    fn test_audio_grid_is_fixed_and_independent_of_variants() {
        let empty = build_catalog(&[]);
        let populated = build_catalog(&[video_variant("mp4", "avc1", Some(1080))]);

        for catalog in [&empty, &populated] {
            let audio = catalog.for_kind(ContentKind::Audio);
            assert_eq!(audio.len(), AUDIO_TARGET_FORMATS.len());
            for ext in AUDIO_TARGET_FORMATS {
                assert_eq!(audio[ext], vec!["320k", "256k", "192k", "128k", "best"]);
            }
        }
    }

    #[test]
    fn test_label_magnitude() {
        assert_eq!(label_magnitude("1080p", 'p'), 1080);
        assert_eq!(label_magnitude("320k", 'k'), 320);
        assert_eq!(label_magnitude("best", 'k'), 0);
        assert_eq!(label_magnitude("p", 'p'), 0);
    }
}
