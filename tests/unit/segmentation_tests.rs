/*!
 * Tests for episode segmentation
 */

use screenwright::errors::SegmentationError;
use screenwright::layout::{SegmentationPolicy, segment};
use screenwright::screenplay::Episode;

use crate::common;

fn sizes(episodes: &[Episode]) -> Vec<usize> {
    episodes.iter().map(Episode::len).collect()
}

/// Five hinted scenes split into the two hinted episodes
#[test]
fn test_segment_withHints12_shouldNumberScenesLocally() {
    let scenes = ["1", "1", "1", "2", "2"]
        .iter()
        .enumerate()
        .map(|(i, hint)| common::hinted_scene(i + 1, hint))
        .collect();

    let episodes = segment(scenes, &SegmentationPolicy::default()).unwrap();

    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].number, 1);
    assert_eq!(episodes[1].number, 2);
    assert_eq!(episodes[0].scene_numbers(), vec![1, 2, 3]);
    assert_eq!(episodes[1].scene_numbers(), vec![1, 2]);
    assert_eq!(episodes[1].global_indices(), vec![4, 5]);
}

/// Skipped hint values still produce consecutive episode numbers
#[test]
fn test_segment_withSkippedHint_shouldNumberEpisodesSequentially() {
    let scenes = vec![
        common::hinted_scene(1, "Episode 1"),
        common::hinted_scene(2, "Episode 1"),
        common::hinted_scene(3, "Episode 3"),
    ];

    let episodes = segment(scenes, &SegmentationPolicy::default()).unwrap();

    assert_eq!(sizes(&episodes), vec![2, 1]);
    assert_eq!(episodes.iter().map(|e| e.number).collect::<Vec<_>>(), vec![1, 2]);
}

/// A hint returning to a closed episode is rejected
#[test]
fn test_segment_withReopenedEpisode_shouldFail() {
    let scenes = vec![
        common::hinted_scene(1, "1"),
        common::hinted_scene(2, "2"),
        common::hinted_scene(3, "1"),
    ];

    let err = segment(scenes, &SegmentationPolicy::default()).unwrap_err();

    assert_eq!(
        err,
        SegmentationError::NonMonotonic {
            scene: 3,
            hint: 1,
            previous: 2
        }
    );
}

/// A location change inside the allowed range wins the break
#[test]
fn test_segment_withoutHints_shouldBreakAtLocationChange() {
    let mut scenes: Vec<_> = (1..=4).map(|i| common::scene(i, "Lighthouse", "Night")).collect();
    scenes.extend((5..=10).map(|i| common::scene(i, "Harbour", "Night")));

    let episodes = segment(scenes, &SegmentationPolicy::default()).unwrap();

    assert_eq!(sizes(&episodes), vec![4, 3, 3]);
}

/// The episode cap wins over the scene-count bounds
#[test]
fn test_segment_withMaxEpisodesOne_shouldKeepEverythingTogether() {
    let policy = SegmentationPolicy {
        max_episodes: Some(1),
        ..SegmentationPolicy::default()
    };

    let episodes = segment(common::same_place_scenes(12), &policy).unwrap();

    assert_eq!(sizes(&episodes), vec![12]);
}

/// Every scene count yields a strict, ordered partition
#[test]
fn test_segment_anySceneCount_shouldPartitionInOrder() {
    for n in 1..=25 {
        let scenes: Vec<_> = (1..=n)
            .map(|i| common::scene(i, if i % 4 == 0 { "Harbour" } else { "Lighthouse" }, "Night"))
            .collect();

        let episodes = segment(scenes, &SegmentationPolicy::default()).unwrap();

        let indices: Vec<usize> = episodes.iter().flat_map(|e| e.global_indices()).collect();
        assert_eq!(indices, (1..=n).collect::<Vec<_>>(), "partition for {} scenes", n);
        for episode in &episodes {
            assert!(!episode.is_empty());
            assert_eq!(episode.scene_numbers(), (1..=episode.len()).collect::<Vec<_>>());
        }
    }
}

/// An inverted policy is rejected before any scene is looked at
#[test]
fn test_segment_withInvertedPolicy_shouldFail() {
    let policy = SegmentationPolicy {
        min_scenes_per_episode: 6,
        max_scenes_per_episode: 4,
        ..SegmentationPolicy::default()
    };

    let result = segment(common::same_place_scenes(3), &policy);

    assert!(matches!(result, Err(SegmentationError::InvalidPolicy(_))));
}
