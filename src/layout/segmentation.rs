/*!
 * Scene to episode segmentation.
 *
 * Scenes are grouped into consecutive episodes, either from the episode hints
 * the Scene stage attached to every scene, or, when there are none, from a
 * structural heuristic over scene headings:
 *
 * - adjacent scenes score +2 for a location change, +1 for an INT/EXT change
 *   and +1 for a time-of-day change;
 * - every episode holds at least `min_scenes_per_episode` scenes and is
 *   closed once it reaches `max_scenes_per_episode`, unless the episode
 *   ceiling forces the last one to run longer;
 * - within the allowed window the highest score wins, ties going to the later
 *   boundary; when the rest fits in one episode, a break needs at least
 *   `break_threshold`.
 */

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SegmentationError;
use crate::screenplay::{Episode, Scene, SceneHeading};

static HINT_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("valid hint number regex"));

const CARDINALS: [&str; 12] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven", "twelve",
];

const ORDINALS: [&str; 12] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
    "eleventh", "twelfth",
];

/// Episode-count policy for the structural heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationPolicy {
    /// Floor on scenes per episode
    #[serde(default = "default_min_scenes")]
    pub min_scenes_per_episode: usize,

    /// An episode is closed once it reaches this many scenes
    #[serde(default = "default_max_scenes")]
    pub max_scenes_per_episode: usize,

    /// Minimum discontinuity score for an optional break
    #[serde(default = "default_break_threshold")]
    pub break_threshold: u32,

    /// Hard cap on the number of episodes
    #[serde(default)]
    pub max_episodes: Option<usize>,
}

fn default_min_scenes() -> usize {
    3
}

fn default_max_scenes() -> usize {
    5
}

fn default_break_threshold() -> u32 {
    2
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        Self {
            min_scenes_per_episode: default_min_scenes(),
            max_scenes_per_episode: default_max_scenes(),
            break_threshold: default_break_threshold(),
            max_episodes: None,
        }
    }
}

impl SegmentationPolicy {
    /// Check the policy is usable
    pub fn validate(&self) -> Result<(), SegmentationError> {
        if self.min_scenes_per_episode == 0 {
            return Err(SegmentationError::InvalidPolicy(
                "min_scenes_per_episode must be at least 1".to_string(),
            ));
        }
        if self.max_scenes_per_episode < self.min_scenes_per_episode {
            return Err(SegmentationError::InvalidPolicy(format!(
                "max_scenes_per_episode ({}) is below min_scenes_per_episode ({})",
                self.max_scenes_per_episode, self.min_scenes_per_episode
            )));
        }
        if self.max_episodes == Some(0) {
            return Err(SegmentationError::InvalidPolicy(
                "max_episodes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Most episodes a screenplay of `scene_count` scenes may be split into
    pub fn episode_ceiling(&self, scene_count: usize) -> usize {
        let by_floor = (scene_count / self.min_scenes_per_episode.max(1)).max(1);
        self.max_episodes.map_or(by_floor, |cap| cap.min(by_floor))
    }
}

/// Read an episode number from a raw hint such as `"2"`, `"Episode 2"` or `"second"`.
pub fn parse_episode_hint(raw: &str) -> Option<u32> {
    if let Some(m) = HINT_NUMBER_REGEX.find(raw) {
        return m.as_str().parse().ok().filter(|n| *n > 0);
    }

    raw.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .find_map(|word| {
            CARDINALS
                .iter()
                .position(|w| *w == word)
                .or_else(|| ORDINALS.iter().position(|w| *w == word))
        })
        .map(|i| i as u32 + 1)
}

/// Discontinuity between two consecutive scene headings
pub fn discontinuity(previous: &SceneHeading, next: &SceneHeading) -> u32 {
    let mut score = 0;
    if previous.normalized_location() != next.normalized_location() {
        score += 2;
    }
    if previous.setting != next.setting {
        score += 1;
    }
    if previous.normalized_time() != next.normalized_time() {
        score += 1;
    }
    score
}

/// Group scenes into episodes and number them locally from 1.
pub fn segment(scenes: Vec<Scene>, policy: &SegmentationPolicy) -> Result<Vec<Episode>, SegmentationError> {
    policy.validate()?;

    if scenes.is_empty() {
        return Ok(Vec::new());
    }

    let hinted = scenes.iter().filter(|s| s.episode_hint.is_some()).count();
    let sizes = if hinted == scenes.len() {
        let sizes = sizes_from_hints(&scenes)?;
        info!("Segmented {} scenes into {} episodes from hints", scenes.len(), sizes.len());
        sizes
    } else {
        if hinted > 0 {
            warn!(
                "Only {} of {} scenes carry episode hints; ignoring hints",
                hinted,
                scenes.len()
            );
        }
        let sizes = sizes_from_headings(&scenes, policy);
        info!("Segmented {} scenes into {} episodes by heading breaks", scenes.len(), sizes.len());
        sizes
    };

    let mut remaining = scenes.into_iter();
    Ok(sizes
        .into_iter()
        .enumerate()
        .map(|(i, size)| Episode::new(i + 1, remaining.by_ref().take(size).collect()))
        .collect())
}

/// Episode sizes from per-scene hints; hints must never go back.
fn sizes_from_hints(scenes: &[Scene]) -> Result<Vec<usize>, SegmentationError> {
    let mut sizes: Vec<usize> = Vec::new();
    let mut current: Option<u32> = None;

    for scene in scenes {
        let raw = scene.episode_hint.as_deref().unwrap_or_default();
        let hint = parse_episode_hint(raw).ok_or_else(|| SegmentationError::UnparseableHint {
            scene: scene.index,
            hint: raw.to_string(),
        })?;

        match current {
            Some(previous) if hint == previous => {
                if let Some(last) = sizes.last_mut() {
                    *last += 1;
                }
            }
            Some(previous) if hint < previous => {
                return Err(SegmentationError::NonMonotonic {
                    scene: scene.index,
                    hint,
                    previous,
                });
            }
            _ => {
                sizes.push(1);
                current = Some(hint);
            }
        }
    }

    Ok(sizes)
}

/// Episode sizes from the heading heuristic.
fn sizes_from_headings(scenes: &[Scene], policy: &SegmentationPolicy) -> Vec<usize> {
    let n = scenes.len();
    let min = policy.min_scenes_per_episode;
    let max = policy.max_scenes_per_episode;
    let ceiling = policy.episode_ceiling(n);

    let mut sizes = Vec::new();
    let mut start = 0;

    loop {
        let remaining = n - start;
        let episodes_left = ceiling - sizes.len();
        if remaining < 2 * min || episodes_left <= 1 {
            sizes.push(remaining);
            break;
        }

        // Boundary b starts the next episode at scene b (0-based)
        let lo = start + min;
        let hi = (start + max).min(n - min);
        let (boundary, score) = (lo..=hi)
            .map(|b| (b, discontinuity(&scenes[b - 1].heading, &scenes[b].heading)))
            .fold((lo, 0), |best, candidate| if candidate.1 >= best.1 { candidate } else { best });

        if remaining <= max && score < policy.break_threshold {
            debug!("No break after scene {}: best score {} below threshold", start + 1, score);
            sizes.push(remaining);
            break;
        }

        debug!("Episode break before scene {} (score {})", boundary + 1, score);
        sizes.push(boundary - start);
        start = boundary;
    }

    sizes
}
