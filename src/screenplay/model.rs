/*!
 * Core screenplay data model.
 *
 * Each record is produced by exactly one pipeline stage and is read-only
 * afterwards. Episodes are the only records created after generation: the
 * segmentation engine groups finished scenes and assigns local numbers.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::ReferentialError;

use super::heading::SceneHeading;

/// Genre tag of a screenplay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Drama,
    Thriller,
    Comedy,
    Horror,
    SciFi,
    Fantasy,
    Romance,
    Action,
    Mystery,
    /// Anything the generator came up with that is not a known tag
    Other(String),
}

impl Genre {
    /// Parse a genre leniently; unknown values are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "drama" => Self::Drama,
            "thriller" | "suspense" => Self::Thriller,
            "comedy" => Self::Comedy,
            "horror" => Self::Horror,
            "scifi" | "sciencefiction" => Self::SciFi,
            "fantasy" => Self::Fantasy,
            "romance" => Self::Romance,
            "action" => Self::Action,
            "mystery" => Self::Mystery,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Human readable genre name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Drama => "Drama",
            Self::Thriller => "Thriller",
            Self::Comedy => "Comedy",
            Self::Horror => "Horror",
            Self::SciFi => "Sci-Fi",
            Self::Fantasy => "Fantasy",
            Self::Romance => "Romance",
            Self::Action => "Action",
            Self::Mystery => "Mystery",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Title, one-sentence pitch, genre and tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logline {
    pub title: String,
    pub logline: String,
    pub genre: Genre,
    pub tone: String,
}

/// A single key story event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    /// Short description of the event
    pub description: String,
    /// Act the beat belongs to (1-3)
    pub act: u8,
}

/// Three-act outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Free-text three-act summary
    #[serde(default)]
    pub summary: String,
    /// Ordered beats (3-5)
    pub beats: Vec<Beat>,
}

impl Outline {
    /// Beats belonging to one act
    pub fn beats_in_act(&self, act: u8) -> impl Iterator<Item = &Beat> {
        self.beats.iter().filter(move |b| b.act == act)
    }
}

/// Dramatic function of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Protagonist,
    Antagonist,
    Supporting,
}

impl Role {
    /// Capitalized role name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Protagonist => "Protagonist",
            Self::Antagonist => "Antagonist",
            Self::Supporting => "Supporting",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "protagonist" | "lead" | "hero" => Ok(Self::Protagonist),
            "antagonist" | "villain" => Ok(Self::Antagonist),
            "supporting" | "support" => Ok(Self::Supporting),
            other => Err(format!("unknown character role: {:?}", other)),
        }
    }
}

/// Character age, either a number of years or a description ("late 40s").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Age {
    Years(u32),
    Descriptive(String),
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(years) => write!(f, "{}", years),
            Self::Descriptive(text) => f.write_str(text),
        }
    }
}

/// A member of the cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Name, unique within the screenplay
    pub name: String,
    #[serde(default)]
    pub age: Option<Age>,
    pub role: Role,
    /// Personality and background
    pub description: String,
    /// Physical appearance, consumed by portrait generation
    pub visual_description: String,
    /// How the character changes over the story
    #[serde(default)]
    pub arc: String,
}

impl Character {
    /// Whether a dialogue reference points at this character
    pub fn answers_to(&self, reference: &str) -> bool {
        name_key(&self.name) == name_key(reference)
    }
}

/// Key used to compare character names (case and spacing insensitive)
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// One spoken line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Name of the speaking character
    pub character: String,
    /// What is said
    pub text: String,
    /// Acting direction, e.g. "whispers"
    #[serde(default)]
    pub parenthetical: Option<String>,
    /// Transition emitted right after this line, e.g. "SMASH CUT TO:"
    #[serde(default)]
    pub transition: Option<String>,
}

/// Scene as produced by the Scene stage, before dialogue is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDraft {
    /// Global 1-based sequence index
    pub index: usize,
    pub heading: SceneHeading,
    /// Present-tense action text
    pub action: String,
    /// Raw episode marker from generation, if any
    #[serde(default)]
    pub episode_hint: Option<String>,
    /// Transition closing the scene, e.g. "CUT TO:"
    #[serde(default)]
    pub transition: Option<String>,
}

/// Dialogue written for one scene by the Dialogue stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDialogue {
    /// Global index of the scene
    pub scene: usize,
    pub lines: Vec<DialogueLine>,
}

/// A complete scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Global 1-based sequence index
    pub index: usize,
    pub heading: SceneHeading,
    pub action: String,
    pub dialogue: Vec<DialogueLine>,
    #[serde(default)]
    pub episode_hint: Option<String>,
    #[serde(default)]
    pub transition: Option<String>,
}

impl Scene {
    /// Join a draft with its dialogue
    pub fn from_draft(draft: SceneDraft, dialogue: Vec<DialogueLine>) -> Self {
        Self {
            index: draft.index,
            heading: draft.heading,
            action: draft.action,
            dialogue,
            episode_hint: draft.episode_hint,
            transition: draft.transition,
        }
    }
}

/// A scene with its episode-local number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedScene {
    /// 1-based number within the episode
    pub number: usize,
    pub scene: Scene,
}

/// Consecutive scenes grouped into one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// 1-based episode number
    pub number: usize,
    pub scenes: Vec<NumberedScene>,
}

impl Episode {
    /// Group scenes into an episode, numbering them from 1
    pub fn new(number: usize, scenes: Vec<Scene>) -> Self {
        let scenes = scenes
            .into_iter()
            .enumerate()
            .map(|(i, scene)| NumberedScene { number: i + 1, scene })
            .collect();
        Self { number, scenes }
    }

    /// Number of scenes in the episode
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the episode has no scenes
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Local scene numbers in order
    pub fn scene_numbers(&self) -> Vec<usize> {
        self.scenes.iter().map(|s| s.number).collect()
    }

    /// Global indices of the scenes in order
    pub fn global_indices(&self) -> Vec<usize> {
        self.scenes.iter().map(|s| s.scene.index).collect()
    }
}

/// Every creative record of one screenplay, checked for referential integrity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenplay {
    pub logline: Logline,
    pub outline: Outline,
    /// Cast in creation order
    pub characters: Vec<Character>,
    /// Scenes in global order
    pub scenes: Vec<Scene>,
}

impl Screenplay {
    /// Build a screenplay, rejecting dialogue for characters outside the cast.
    pub fn new(
        logline: Logline,
        outline: Outline,
        characters: Vec<Character>,
        scenes: Vec<Scene>,
    ) -> Result<Self, ReferentialError> {
        let cast: HashSet<String> = characters.iter().map(|c| name_key(&c.name)).collect();

        for scene in &scenes {
            if let Some(line) = scene
                .dialogue
                .iter()
                .find(|line| !cast.contains(&name_key(&line.character)))
            {
                return Err(ReferentialError {
                    scene: scene.index,
                    character: line.character.clone(),
                });
            }
        }

        Ok(Self {
            logline,
            outline,
            characters,
            scenes,
        })
    }

    /// Title of the screenplay
    pub fn title(&self) -> &str {
        &self.logline.title
    }

    /// Look up a character by a dialogue reference
    pub fn character(&self, reference: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.answers_to(reference))
    }

    /// Total number of dialogue lines
    pub fn dialogue_count(&self) -> usize {
        self.scenes.iter().map(|s| s.dialogue.len()).sum()
    }
}
