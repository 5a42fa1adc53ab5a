/*!
 * Screenplay elements: the normalized form between formatting and pagination.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::formatter::FADE_IN;

/// Horizontal placement of an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Action and scene headings
    Left,
    /// Dialogue, indented relative to action
    Indented,
    /// Parentheticals, indented further than dialogue
    FurtherIndented,
    /// Character cues
    Centered,
    /// Transitions
    Right,
}

/// One typed element of a formatted screenplay
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenplayElement {
    /// `{number}  INT. LOCATION - TIME`, upper case
    SceneHeading { scene_number: usize, text: String },
    Action { text: String },
    /// Upper-cased character name
    CharacterCue { name: String },
    /// Lower-case acting note, wrapped in parentheses
    Parenthetical { text: String },
    Dialogue { text: String },
    Transition { text: String },
    EpisodeMarker { episode_number: usize },
    PageBreak,
}

impl ScreenplayElement {
    /// Placement on the page
    pub fn alignment(&self) -> Alignment {
        match self {
            Self::SceneHeading { .. } | Self::Action { .. } | Self::PageBreak => Alignment::Left,
            Self::CharacterCue { .. } | Self::EpisodeMarker { .. } => Alignment::Centered,
            Self::Parenthetical { .. } => Alignment::FurtherIndented,
            Self::Dialogue { .. } => Alignment::Indented,
            Self::Transition { .. } => Alignment::Right,
        }
    }

    /// Text as printed, before wrapping
    pub fn text(&self) -> String {
        match self {
            Self::SceneHeading { text, .. }
            | Self::Action { text }
            | Self::Parenthetical { text }
            | Self::Dialogue { text }
            | Self::Transition { text } => text.clone(),
            Self::CharacterCue { name } => name.clone(),
            Self::EpisodeMarker { episode_number } => format!("EPISODE {}", episode_number),
            Self::PageBreak => String::new(),
        }
    }

    /// Whether a blank line separates this element from the one before it
    pub fn spaced_before(&self) -> bool {
        matches!(
            self,
            Self::SceneHeading { .. }
                | Self::Action { .. }
                | Self::CharacterCue { .. }
                | Self::Transition { .. }
                | Self::EpisodeMarker { .. }
        )
    }

    /// Whether this element continues a dialogue block
    pub fn continues_dialogue(&self) -> bool {
        matches!(self, Self::Parenthetical { .. } | Self::Dialogue { .. })
    }

    /// Whether this is the opening `FADE IN:`
    pub fn is_fade_in(&self) -> bool {
        matches!(self, Self::Transition { text } if text == FADE_IN)
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, Self::PageBreak)
    }
}

impl fmt::Display for ScreenplayElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageBreak => f.write_str("<page break>"),
            other => f.write_str(&other.text()),
        }
    }
}
