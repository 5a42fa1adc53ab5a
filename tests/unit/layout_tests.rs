/*!
 * Tests for the formatter and pagination
 */

use screenwright::layout::{
    FADE_IN, FADE_OUT, LayoutConfig, SegmentationPolicy, ScreenplayElement, THE_END, format_screenplay, paginate,
    segment,
};
use screenwright::screenplay::Episode;

use crate::common;

fn transition(text: &str) -> ScreenplayElement {
    ScreenplayElement::Transition { text: text.to_string() }
}

fn episodes(scene_count: usize) -> Vec<Episode> {
    segment(common::same_place_scenes(scene_count), &SegmentationPolicy::default()).unwrap()
}

/// A single scene is bracketed by FADE IN / FADE OUT / THE END with no marker
#[test]
fn test_format_singleScene_shouldBracketWithoutEpisodeMarker() {
    let elements = format_screenplay(&episodes(1));

    assert_eq!(elements.first(), Some(&transition(FADE_IN)));
    assert_eq!(&elements[elements.len() - 2..], &[transition(FADE_OUT), transition(THE_END)]);
    assert!(!elements.iter().any(|e| matches!(e, ScreenplayElement::EpisodeMarker { .. })));
    assert_eq!(elements.iter().filter(|e| **e == transition(FADE_IN)).count(), 1);
    assert_eq!(
        elements[1],
        ScreenplayElement::SceneHeading {
            scene_number: 1,
            text: "1  INT. LIGHTHOUSE - NIGHT".to_string()
        }
    );
}

/// One marker per episode when there are several
#[test]
fn test_format_twoEpisodes_shouldMarkBoth() {
    let elements = format_screenplay(&episodes(8));

    let markers: Vec<usize> = elements
        .iter()
        .filter_map(|e| match e {
            ScreenplayElement::EpisodeMarker { episode_number } => Some(*episode_number),
            _ => None,
        })
        .collect();
    assert_eq!(markers, vec![1, 2]);
}

/// Cues are upper case and parentheticals wrapped once
#[test]
fn test_format_dialogue_shouldNormalizeCueAndParenthetical() {
    let mut scenes = common::same_place_scenes(1);
    scenes[0].dialogue = vec![common::line("eli", "Out.", Some("(Shrugging)"))];
    let episodes = segment(scenes, &SegmentationPolicy::default()).unwrap();

    let elements = format_screenplay(&episodes);

    let cue_at = elements
        .iter()
        .position(|e| matches!(e, ScreenplayElement::CharacterCue { .. }))
        .unwrap();
    assert_eq!(elements[cue_at], ScreenplayElement::CharacterCue { name: "ELI".to_string() });
    assert_eq!(
        elements[cue_at + 1],
        ScreenplayElement::Parenthetical { text: "(shrugging)".to_string() }
    );
    assert_eq!(elements[cue_at + 2], ScreenplayElement::Dialogue { text: "Out.".to_string() });
}

/// Pagination only inserts page breaks, never reorders or drops elements
#[test]
fn test_paginate_shouldPreserveElementOrder() {
    let elements = format_screenplay(&episodes(12));
    let config = LayoutConfig {
        lines_per_page: 20,
        ..LayoutConfig::default()
    };

    let pagination = paginate(&elements, &config);

    let without_breaks: Vec<_> = pagination.elements.iter().filter(|e| !e.is_page_break()).cloned().collect();
    assert_eq!(without_breaks, elements);
    let breaks = pagination.elements.iter().filter(|e| e.is_page_break()).count();
    assert_eq!(breaks + 1, pagination.pages.len());
}

/// Every episode after the first starts on a fresh page
#[test]
fn test_paginate_episodeMarkers_shouldOpenPages() {
    let elements = format_screenplay(&episodes(8));

    let pagination = paginate(&elements, &LayoutConfig::default());

    let second = ScreenplayElement::EpisodeMarker { episode_number: 2 };
    let page = pagination
        .pages
        .iter()
        .find(|p| p.elements().any(|e| *e == second))
        .unwrap();
    assert_eq!(page.blocks[0].element, second);
}

/// Dialogue wraps at the dialogue column width
#[test]
fn test_paginate_longDialogue_shouldWrapAtDialogueWidth() {
    let mut scenes = common::same_place_scenes(1);
    scenes[0].dialogue = vec![common::line(
        "MARA",
        "Thirty years I have kept this lamp burning and not once has it gone dark on my watch.",
        None,
    )];
    let episodes = segment(scenes, &SegmentationPolicy::default()).unwrap();

    let pagination = paginate(&format_screenplay(&episodes), &LayoutConfig::default());

    let dialogue = pagination.pages[0]
        .blocks
        .iter()
        .find(|b| matches!(b.element, ScreenplayElement::Dialogue { .. }))
        .unwrap();
    assert!(dialogue.lines.len() > 1);
    assert!(dialogue.lines.iter().all(|l| l.chars().count() <= 35));
}
