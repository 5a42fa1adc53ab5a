/*!
 * Schema validation for collaborator responses.
 *
 * Generation services return loosely structured JSON. Every response passes
 * through here before it may touch the screenplay state: it is deserialized
 * into permissive raw structs, then checked field by field. Any problem is
 * reported as a human-readable detail string that becomes a `StageFailure`.
 */

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::screenplay::{
    Age, Beat, Character, DialogueLine, Genre, Logline, Outline, Role, SceneDialogue, SceneDraft,
    SceneHeading, name_key,
};

use super::stages::{ScreenplayState, Stage, StageOutput};

/// Minimum number of outline beats
pub const MIN_BEATS: usize = 3;
/// Maximum number of outline beats
pub const MAX_BEATS: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLogline {
    title: Option<String>,
    logline: Option<String>,
    genre: Option<String>,
    tone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOutline {
    #[serde(alias = "outline")]
    summary: Option<String>,
    beats: Option<Vec<RawBeat>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBeat {
    description: Option<String>,
    act: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCharacterList {
    characters: Option<Vec<RawCharacter>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCharacter {
    name: Option<String>,
    age: Option<Age>,
    role: Option<String>,
    description: Option<String>,
    #[serde(alias = "image_prompt")]
    visual_description: Option<String>,
    arc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSceneList {
    scenes: Option<Vec<RawScene>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScene {
    #[serde(alias = "index")]
    scene_number: Option<usize>,
    heading: Option<String>,
    action: Option<String>,
    #[serde(alias = "episode_number", alias = "episode_hint")]
    episode: Option<Value>,
    transition: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDialogueList {
    scenes: Option<Vec<RawSceneDialogue>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSceneDialogue {
    #[serde(alias = "scene")]
    scene_number: Option<usize>,
    dialogue: Option<Vec<RawLine>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLine {
    character: Option<String>,
    #[serde(alias = "text")]
    line: Option<String>,
    parenthetical: Option<String>,
    transition: Option<String>,
}

/// Validate a collaborator response for `stage` against the current state.
pub fn validate(stage: Stage, value: Value, state: &ScreenplayState) -> Result<StageOutput, String> {
    match stage {
        Stage::Logline => validate_logline(value).map(StageOutput::Logline),
        Stage::Outline => validate_outline(value).map(StageOutput::Outline),
        Stage::Characters => validate_characters(value).map(StageOutput::Characters),
        Stage::Scenes => validate_scenes(value).map(StageOutput::Scenes),
        Stage::Dialogue => {
            let scenes = state
                .scenes()
                .ok_or_else(|| "dialogue requested before scenes exist".to_string())?;
            validate_dialogue(value, scenes).map(StageOutput::Dialogue)
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(value: Value, what: &str) -> Result<T, String> {
    if !value.is_object() {
        return Err(format!("{} response must be a JSON object", what));
    }
    serde_json::from_value(value).map_err(|e| format!("malformed {} response: {}", what, e))
}

fn required(field: Option<String>, name: &str) -> Result<String, String> {
    match field.map(|f| f.trim().to_string()) {
        Some(f) if !f.is_empty() => Ok(f),
        _ => Err(format!("missing required field `{}`", name)),
    }
}

fn optional(field: Option<String>) -> Option<String> {
    field
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
}

/// Derive a title from the first words of a logline.
pub fn derive_title(logline: &str) -> String {
    logline
        .split_whitespace()
        .take(4)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn validate_logline(value: Value) -> Result<Logline, String> {
    let raw: RawLogline = parse(value, "logline")?;
    let logline = required(raw.logline, "logline")?;
    let title = optional(raw.title).unwrap_or_else(|| derive_title(&logline));
    if title.is_empty() {
        return Err("logline yields an empty title".to_string());
    }

    Ok(Logline {
        title,
        genre: Genre::parse(&required(raw.genre, "genre")?),
        tone: required(raw.tone, "tone")?,
        logline,
    })
}

fn validate_outline(value: Value) -> Result<Outline, String> {
    let raw: RawOutline = parse(value, "outline")?;
    let raw_beats = raw.beats.ok_or_else(|| "missing required field `beats`".to_string())?;

    if !(MIN_BEATS..=MAX_BEATS).contains(&raw_beats.len()) {
        return Err(format!(
            "outline must have {}-{} beats, got {}",
            MIN_BEATS,
            MAX_BEATS,
            raw_beats.len()
        ));
    }

    let mut beats = Vec::with_capacity(raw_beats.len());
    let mut previous_act = 1;
    for (i, raw_beat) in raw_beats.into_iter().enumerate() {
        let description = required(raw_beat.description, &format!("beats[{}].description", i))?;
        let act = raw_beat
            .act
            .ok_or_else(|| format!("missing required field `beats[{}].act`", i))?;
        if !(1..=3).contains(&act) {
            return Err(format!("beat {} has act {}, expected 1-3", i + 1, act));
        }
        if act < previous_act {
            return Err(format!("beat {} goes back from act {} to act {}", i + 1, previous_act, act));
        }
        previous_act = act;
        beats.push(Beat { description, act });
    }

    Ok(Outline {
        summary: optional(raw.summary).unwrap_or_default(),
        beats,
    })
}

fn validate_characters(value: Value) -> Result<Vec<Character>, String> {
    let raw: RawCharacterList = parse(value, "character")?;
    let raw_characters = raw
        .characters
        .ok_or_else(|| "missing required field `characters`".to_string())?;
    if raw_characters.is_empty() {
        return Err("character list is empty".to_string());
    }

    let mut seen = HashSet::new();
    let mut characters = Vec::with_capacity(raw_characters.len());
    for (i, raw_character) in raw_characters.into_iter().enumerate() {
        let name = required(raw_character.name, &format!("characters[{}].name", i))?;
        if !seen.insert(name_key(&name)) {
            return Err(format!("character name {:?} is not unique", name));
        }

        let role: Role = required(raw_character.role, &format!("characters[{}].role", i))?
            .parse()
            .map_err(|e| format!("character {:?}: {}", name, e))?;

        characters.push(Character {
            description: required(
                raw_character.description,
                &format!("characters[{}].description", i),
            )?,
            visual_description: required(
                raw_character.visual_description,
                &format!("characters[{}].visual_description", i),
            )?,
            arc: optional(raw_character.arc).unwrap_or_default(),
            age: raw_character.age,
            role,
            name,
        });
    }

    Ok(characters)
}

fn episode_hint(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => optional(Some(s)),
        other => Some(other.to_string()),
    }
}

fn validate_scenes(value: Value) -> Result<Vec<SceneDraft>, String> {
    let raw: RawSceneList = parse(value, "scene")?;
    let raw_scenes = raw.scenes.ok_or_else(|| "missing required field `scenes`".to_string())?;
    if raw_scenes.is_empty() {
        return Err("scene list is empty".to_string());
    }

    let mut scenes = Vec::with_capacity(raw_scenes.len());
    for (i, raw_scene) in raw_scenes.into_iter().enumerate() {
        let expected = i + 1;
        let index = raw_scene
            .scene_number
            .ok_or_else(|| format!("missing required field `scenes[{}].scene_number`", i))?;
        if index != expected {
            return Err(format!(
                "scene numbers must be contiguous from 1, found {} at position {}",
                index, expected
            ));
        }

        let heading: SceneHeading = required(raw_scene.heading, &format!("scenes[{}].heading", i))?
            .parse()
            .map_err(|e| format!("scene {}: {}", index, e))?;

        scenes.push(SceneDraft {
            index,
            heading,
            action: required(raw_scene.action, &format!("scenes[{}].action", i))?,
            episode_hint: episode_hint(raw_scene.episode),
            transition: optional(raw_scene.transition),
        });
    }

    Ok(scenes)
}

fn validate_dialogue(value: Value, scenes: &[SceneDraft]) -> Result<Vec<SceneDialogue>, String> {
    let raw: RawDialogueList = parse(value, "dialogue")?;
    let raw_scenes = raw.scenes.ok_or_else(|| "missing required field `scenes`".to_string())?;

    let known: HashSet<usize> = scenes.iter().map(|s| s.index).collect();
    let mut seen = HashSet::new();
    let mut dialogue = Vec::with_capacity(raw_scenes.len());

    for (i, raw_scene) in raw_scenes.into_iter().enumerate() {
        let scene = raw_scene
            .scene_number
            .ok_or_else(|| format!("missing required field `scenes[{}].scene_number`", i))?;
        if !known.contains(&scene) {
            return Err(format!("dialogue written for scene {} which does not exist", scene));
        }
        if !seen.insert(scene) {
            return Err(format!("dialogue for scene {} appears twice", scene));
        }

        let raw_lines = raw_scene.dialogue.unwrap_or_default();
        let mut lines = Vec::with_capacity(raw_lines.len());
        for (j, raw_line) in raw_lines.into_iter().enumerate() {
            lines.push(DialogueLine {
                character: required(
                    raw_line.character,
                    &format!("scene {} dialogue[{}].character", scene, j),
                )?,
                text: required(raw_line.line, &format!("scene {} dialogue[{}].line", scene, j))?,
                parenthetical: optional(raw_line.parenthetical),
                transition: optional(raw_line.transition),
            });
        }

        dialogue.push(SceneDialogue { scene, lines });
    }

    dialogue.sort_by_key(|d| d.scene);
    Ok(dialogue)
}
