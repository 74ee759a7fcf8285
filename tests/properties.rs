//! Property tests for catalog construction and the cascading selection
//! rules.

use proptest::prelude::*;
use tubeload::catalog::{build_catalog, label_magnitude, ContentKind, SelectionState};
use tubeload::extractor::RawFormat;

const EXT_POOL: [&str; 4] = ["mp4", "webm", "mkv", "3gp"];

fn video_variant(ext: &str, height: u32) -> RawFormat {
    RawFormat {
        ext: Some(ext.to_string()),
        vcodec: Some("avc1".to_string()),
        height: Some(height),
        ..Default::default()
    }
}

/// The invariant every transition must preserve: both dependent selections
/// name entries of the current catalog, or are empty.
fn assert_selection_consistent(state: &SelectionState) {
    match state.container_format() {
        Some(format) => {
            assert!(
                state.container_options().iter().any(|o| o == format),
                "container {:?} not offered",
                format
            );
            match state.quality_label() {
                Some(label) => assert!(
                    state.quality_options().iter().any(|o| o == label),
                    "quality {:?} not offered",
                    label
                ),
                None => assert!(state.quality_options().is_empty()),
            }
        }
        None => assert_eq!(state.quality_label(), None),
    }
}

#[derive(Debug, Clone)]
enum Transition {
    Replace(Vec<(usize, u32)>),
    Kind(bool),
    Container(String),
    Quality(String),
}

fn transition_strategy() -> impl Strategy<Value = Transition> {
    prop_oneof![
        proptest::collection::vec((0usize..EXT_POOL.len(), 1u32..4400), 0..12)
            .prop_map(Transition::Replace),
        any::<bool>().prop_map(Transition::Kind),
        prop_oneof![
            proptest::sample::select(EXT_POOL.to_vec()).prop_map(|s| s.to_string()),
            Just("flv".to_string()),
            Just("mp3".to_string()),
        ]
        .prop_map(Transition::Container),
        prop_oneof![
            (1u32..4400).prop_map(|h| format!("{}p", h)),
            Just("best".to_string()),
            Just("320k".to_string()),
        ]
        .prop_map(Transition::Quality),
    ]
}

proptest! {
    #[test]
    fn quality_lists_are_strictly_descending(
        heights in proptest::collection::vec(1u32..4400, 1..24)
    ) {
        let formats: Vec<RawFormat> = heights
            .iter()
            .map(|h| video_variant("mp4", *h))
            .collect();

        let catalog = build_catalog(&formats);
        let labels = &catalog.for_kind(ContentKind::Video)["mp4"];

        let magnitudes: Vec<u32> = labels.iter().map(|l| label_magnitude(l, 'p')).collect();
        for pair in magnitudes.windows(2) {
            prop_assert!(pair[0] > pair[1], "not strictly descending: {:?}", labels);
        }

        // Set semantics: one label per distinct height
        let mut unique = heights.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(labels.len(), unique.len());
    }

    #[test]
    fn catalog_construction_ignores_variant_order(
        mut entries in proptest::collection::vec(
            (0usize..EXT_POOL.len(), 1u32..4400),
            0..16
        )
    ) {
        let forward: Vec<RawFormat> = entries
            .iter()
            .map(|(e, h)| video_variant(EXT_POOL[*e], *h))
            .collect();
        entries.reverse();
        let backward: Vec<RawFormat> = entries
            .iter()
            .map(|(e, h)| video_variant(EXT_POOL[*e], *h))
            .collect();

        prop_assert_eq!(build_catalog(&forward), build_catalog(&backward));
    }

    #[test]
    fn selection_invariant_survives_any_transition_sequence(
        transitions in proptest::collection::vec(transition_strategy(), 0..32)
    ) {
        let mut state = SelectionState::new();
        assert_selection_consistent(&state);

        for transition in transitions {
            match transition {
                Transition::Replace(entries) => {
                    let formats: Vec<RawFormat> = entries
                        .iter()
                        .map(|(e, h)| video_variant(EXT_POOL[*e], *h))
                        .collect();
                    state.replace_catalog(build_catalog(&formats));
                }
                Transition::Kind(audio) => {
                    state.set_content_kind(if audio {
                        ContentKind::Audio
                    } else {
                        ContentKind::Video
                    });
                }
                Transition::Container(format) => state.set_container_format(format),
                Transition::Quality(label) => state.set_quality_label(label),
            }
            assert_selection_consistent(&state);
        }
    }

    #[test]
    fn replacing_the_same_catalog_twice_is_idempotent(
        entries in proptest::collection::vec((0usize..EXT_POOL.len(), 1u32..4400), 0..16)
    ) {
        let formats: Vec<RawFormat> = entries
            .iter()
            .map(|(e, h)| video_variant(EXT_POOL[*e], *h))
            .collect();
        let catalog = build_catalog(&formats);

        let mut once = SelectionState::new();
        once.replace_catalog(catalog.clone());

        let mut twice = SelectionState::new();
        twice.replace_catalog(catalog.clone());
        twice.replace_catalog(catalog);

        prop_assert_eq!(once.container_format(), twice.container_format());
        prop_assert_eq!(once.quality_label(), twice.quality_label());
    }
}
