/*!
 * Layout properties over a generated screenplay
 */

use std::sync::Arc;

use screenwright::layout::{LayoutConfig, ScreenplayElement, SegmentationPolicy, format_screenplay, paginate, segment};
use screenwright::pipeline::StagePipeline;
use screenwright::providers::mock::{MockCreativeProvider, sample_stage_responses};
use screenwright::screenplay::{Episode, Screenplay};

use crate::common;

async fn sample_screenplay() -> Screenplay {
    let pipeline = StagePipeline::new(Arc::new(MockCreativeProvider::scripted(sample_stage_responses())));
    pipeline.run("premise").await.unwrap().into_screenplay().unwrap()
}

fn dialogue_heavy_episodes() -> Vec<Episode> {
    let mut scenes = common::same_place_scenes(9);
    for scene in &mut scenes {
        scene.dialogue = (0..6)
            .map(|i| {
                common::line(
                    if i % 2 == 0 { "MARA" } else { "ELI" },
                    "You keep saying the light is automated, but automation does not climb stairs in a gale.",
                    (i % 3 == 0).then_some("beat"),
                )
            })
            .collect();
    }
    segment(scenes, &SegmentationPolicy::default()).unwrap()
}

/// The generated screenplay splits along its episode hints
#[tokio::test]
async fn test_sampleScreenplay_shouldFollowHints() {
    let screenplay = sample_screenplay().await;

    let episodes = segment(screenplay.scenes, &SegmentationPolicy::default()).unwrap();

    let numbers: Vec<Vec<usize>> = episodes.iter().map(Episode::scene_numbers).collect();
    assert_eq!(numbers, vec![vec![1, 2, 3], vec![1, 2]]);
}

/// No page ends on a cue or starts mid dialogue block, whatever the capacity
#[test]
fn test_paginate_anyCapacity_shouldKeepCueWithDialogue() {
    let elements = format_screenplay(&dialogue_heavy_episodes());

    for lines_per_page in 4..=60 {
        let config = LayoutConfig {
            lines_per_page,
            ..LayoutConfig::default()
        };
        let pagination = paginate(&elements, &config);

        for page in &pagination.pages {
            let first = &page.blocks[0].element;
            let last = &page.blocks[page.blocks.len() - 1].element;
            assert!(
                !first.continues_dialogue(),
                "page {} starts with {:?} at capacity {}",
                page.number,
                first,
                lines_per_page
            );
            assert!(
                !matches!(last, ScreenplayElement::CharacterCue { .. }),
                "page {} ends with a cue at capacity {}",
                page.number,
                lines_per_page
            );
        }
    }
}

/// Pages only overflow when a single unit is taller than the page
#[test]
fn test_paginate_multiBlockPages_shouldRespectCapacity() {
    let elements = format_screenplay(&dialogue_heavy_episodes());
    let config = LayoutConfig {
        lines_per_page: 30,
        ..LayoutConfig::default()
    };

    let pagination = paginate(&elements, &config);

    assert!(pagination.pages.len() > 1);
    for page in &pagination.pages {
        assert!(page.line_count() <= 30, "page {} has {} lines", page.number, page.line_count());
    }
}

/// Formatting and pagination are pure functions of their input
#[tokio::test]
async fn test_layout_sameInput_shouldGiveSameOutput() {
    let screenplay = sample_screenplay().await;
    let episodes = segment(screenplay.scenes.clone(), &SegmentationPolicy::default()).unwrap();

    let first = paginate(&format_screenplay(&episodes), &LayoutConfig::default());
    let second = paginate(&format_screenplay(&episodes), &LayoutConfig::default());

    assert_eq!(first, second);
}

/// Pagination only adds page breaks, whatever the capacity
#[tokio::test]
async fn test_paginate_anyCapacity_shouldKeepEveryElement() {
    let screenplay = sample_screenplay().await;
    let episodes = segment(screenplay.scenes, &SegmentationPolicy::default()).unwrap();
    let elements = format_screenplay(&episodes);

    for lines_per_page in [5, 12, 30, 55] {
        let config = LayoutConfig {
            lines_per_page,
            ..LayoutConfig::default()
        };
        let pagination = paginate(&elements, &config);

        let kept: Vec<&ScreenplayElement> = pagination.elements.iter().filter(|e| !e.is_page_break()).collect();
        let placed: Vec<&ScreenplayElement> = pagination.pages.iter().flat_map(|p| p.elements()).collect();
        let original: Vec<&ScreenplayElement> = elements.iter().filter(|e| !e.is_page_break()).collect();
        assert_eq!(kept, original);
        assert_eq!(placed, original);
        assert_eq!(
            pagination.elements.iter().filter(|e| e.is_page_break()).count(),
            pagination.pages.len() - 1
        );
    }
}

/// Every episode after the first opens its page, whatever the capacity
#[test]
fn test_paginate_anyCapacity_shouldOpenEachEpisodeOnNewPage() {
    let mut scenes = common::same_place_scenes(6);
    for scene in &mut scenes {
        scene.transition = Some("CUT TO:".to_string());
        scene.episode_hint = Some(if scene.index <= 3 { "1" } else { "2" }.to_string());
    }
    scenes[2].dialogue[1].transition = Some("SMASH CUT TO:".to_string());
    let episodes = segment(scenes, &SegmentationPolicy::default()).unwrap();
    let elements = format_screenplay(&episodes);

    for lines_per_page in 3..=60 {
        let config = LayoutConfig {
            lines_per_page,
            ..LayoutConfig::default()
        };
        let pagination = paginate(&elements, &config);

        for page in &pagination.pages {
            for (position, block) in page.blocks.iter().enumerate() {
                if let ScreenplayElement::EpisodeMarker { episode_number } = block.element {
                    if episode_number > 1 {
                        assert_eq!(
                            position, 0,
                            "episode {} is not first on page {} at capacity {}",
                            episode_number, page.number, lines_per_page
                        );
                    }
                }
            }
        }
    }
}
