/*!
 * Screenplay formatter.
 *
 * Turns episodes into the flat element sequence consumed by pagination.
 * Output order:
 *
 * ```text
 * FADE IN:
 * [EPISODE k]            only when there is more than one episode
 *   {n}  INT. LOCATION - TIME
 *   action
 *   CUE / (parenthetical) / dialogue / [line transition]   per line
 *   [scene transition]
 * FADE OUT.
 * THE END
 * ```
 */

use crate::screenplay::{DialogueLine, Episode, NumberedScene, SceneHeading};

use super::element::ScreenplayElement;

/// Opening transition of every screenplay
pub const FADE_IN: &str = "FADE IN:";
/// Closing transition of every screenplay
pub const FADE_OUT: &str = "FADE OUT.";
/// Final line of every screenplay
pub const THE_END: &str = "THE END";

/// Heading text: `{number}  INT. LOCATION - TIME`, upper case
pub fn heading_text(scene_number: usize, heading: &SceneHeading) -> String {
    format!("{}  {}", scene_number, heading).to_uppercase()
}

/// Parenthetical text: lower case, wrapped in exactly one pair of parentheses
pub fn parenthetical_text(raw: &str) -> String {
    let inner = raw.trim().trim_start_matches('(').trim_end_matches(')').trim();
    format!("({})", inner.to_lowercase())
}

/// Format episodes into screenplay elements.
pub fn format_screenplay(episodes: &[Episode]) -> Vec<ScreenplayElement> {
    let mut elements = vec![ScreenplayElement::Transition {
        text: FADE_IN.to_string(),
    }];
    let mark_episodes = episodes.len() > 1;

    for episode in episodes {
        if mark_episodes {
            elements.push(ScreenplayElement::EpisodeMarker {
                episode_number: episode.number,
            });
        }
        for scene in &episode.scenes {
            format_scene(scene, &mut elements);
        }
    }

    elements.push(ScreenplayElement::Transition {
        text: FADE_OUT.to_string(),
    });
    elements.push(ScreenplayElement::Transition {
        text: THE_END.to_string(),
    });
    elements
}

fn format_scene(numbered: &NumberedScene, elements: &mut Vec<ScreenplayElement>) {
    let scene = &numbered.scene;
    elements.push(ScreenplayElement::SceneHeading {
        scene_number: numbered.number,
        text: heading_text(numbered.number, &scene.heading),
    });

    let action = scene.action.trim();
    if !action.is_empty() {
        elements.push(ScreenplayElement::Action {
            text: action.to_string(),
        });
    }

    for line in &scene.dialogue {
        format_line(line, elements);
    }

    if let Some(transition) = transition_text(scene.transition.as_deref()) {
        elements.push(transition);
    }
}

fn format_line(line: &DialogueLine, elements: &mut Vec<ScreenplayElement>) {
    elements.push(ScreenplayElement::CharacterCue {
        name: line.character.trim().to_uppercase(),
    });
    if let Some(parenthetical) = line.parenthetical.as_deref().filter(|p| !p.trim().is_empty()) {
        elements.push(ScreenplayElement::Parenthetical {
            text: parenthetical_text(parenthetical),
        });
    }
    elements.push(ScreenplayElement::Dialogue {
        text: line.text.trim().to_string(),
    });
    if let Some(transition) = transition_text(line.transition.as_deref()) {
        elements.push(transition);
    }
}

fn transition_text(raw: Option<&str>) -> Option<ScreenplayElement> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| ScreenplayElement::Transition {
            text: t.to_uppercase(),
        })
}
