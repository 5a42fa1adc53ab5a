/*!
 * Pipeline stages and the accumulated screenplay state.
 *
 * `ScreenplayState` is an append-only record: every stage consumes the state
 * and returns it with exactly one more field populated. Fields are private,
 * so an earlier stage's output can never be replaced once set.
 */

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::errors::{AppError, PipelineError};
use crate::screenplay::{
    Character, Logline, Outline, Scene, SceneDialogue, SceneDraft, Screenplay,
};

/// The five creative-generation stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Logline,
    Outline,
    Characters,
    Scenes,
    Dialogue,
}

impl Stage {
    /// All stages in the only order they may run
    pub const ALL: [Stage; 5] = [
        Stage::Logline,
        Stage::Outline,
        Stage::Characters,
        Stage::Scenes,
        Stage::Dialogue,
    ];

    /// Stage name as used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::Logline => "logline",
            Self::Outline => "outline",
            Self::Characters => "character",
            Self::Scenes => "scene",
            Self::Dialogue => "dialogue",
        }
    }

    /// Zero-based position in the pipeline
    pub fn position(&self) -> usize {
        match self {
            Self::Logline => 0,
            Self::Outline => 1,
            Self::Characters => 2,
            Self::Scenes => 3,
            Self::Dialogue => 4,
        }
    }

    /// Stage that runs after this one
    pub fn next(&self) -> Option<Stage> {
        Self::ALL.get(self.position() + 1).copied()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated output of one stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    Logline(Logline),
    Outline(Outline),
    Characters(Vec<Character>),
    Scenes(Vec<SceneDraft>),
    Dialogue(Vec<SceneDialogue>),
}

impl StageOutput {
    /// Stage that produces this output
    pub fn stage(&self) -> Stage {
        match self {
            Self::Logline(_) => Stage::Logline,
            Self::Outline(_) => Stage::Outline,
            Self::Characters(_) => Stage::Characters,
            Self::Scenes(_) => Stage::Scenes,
            Self::Dialogue(_) => Stage::Dialogue,
        }
    }

    /// Short description for logs
    pub fn summary(&self) -> String {
        match self {
            Self::Logline(logline) => format!("\"{}\" ({})", logline.title, logline.genre),
            Self::Outline(outline) => format!("{} beats", outline.beats.len()),
            Self::Characters(characters) => format!("{} characters", characters.len()),
            Self::Scenes(scenes) => format!("{} scenes", scenes.len()),
            Self::Dialogue(dialogue) => format!(
                "{} dialogue lines",
                dialogue.iter().map(|d| d.lines.len()).sum::<usize>()
            ),
        }
    }
}

/// Accumulated state threaded through the stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenplayState {
    premise: String,
    logline: Option<Logline>,
    outline: Option<Outline>,
    characters: Option<Vec<Character>>,
    scenes: Option<Vec<SceneDraft>>,
    dialogue: Option<Vec<SceneDialogue>>,
}

impl ScreenplayState {
    /// Start a new run from a story premise
    pub fn new(premise: impl Into<String>) -> Self {
        Self {
            premise: premise.into(),
            logline: None,
            outline: None,
            characters: None,
            scenes: None,
            dialogue: None,
        }
    }

    pub fn premise(&self) -> &str {
        &self.premise
    }

    pub fn logline(&self) -> Option<&Logline> {
        self.logline.as_ref()
    }

    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    pub fn characters(&self) -> Option<&[Character]> {
        self.characters.as_deref()
    }

    pub fn scenes(&self) -> Option<&[SceneDraft]> {
        self.scenes.as_deref()
    }

    pub fn dialogue(&self) -> Option<&[SceneDialogue]> {
        self.dialogue.as_deref()
    }

    fn is_stage_done(&self, stage: Stage) -> bool {
        match stage {
            Stage::Logline => self.logline.is_some(),
            Stage::Outline => self.outline.is_some(),
            Stage::Characters => self.characters.is_some(),
            Stage::Scenes => self.scenes.is_some(),
            Stage::Dialogue => self.dialogue.is_some(),
        }
    }

    /// First stage that has not run yet
    pub fn next_stage(&self) -> Option<Stage> {
        Stage::ALL.into_iter().find(|stage| !self.is_stage_done(*stage))
    }

    /// Stages whose output is already in the state
    pub fn completed_stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|stage| self.is_stage_done(*stage))
            .collect()
    }

    /// Whether every stage has run
    pub fn is_complete(&self) -> bool {
        self.next_stage().is_none()
    }

    /// Add one stage's output. The output must belong to the next stage.
    pub fn apply(mut self, output: StageOutput) -> Result<Self, PipelineError> {
        let attempted = output.stage();
        let expected = self.next_stage();
        if expected != Some(attempted) {
            return Err(PipelineError::OutOfOrder {
                attempted,
                expected: expected.map_or_else(|| "none".to_string(), |s| s.to_string()),
            });
        }

        match output {
            StageOutput::Logline(logline) => self.logline = Some(logline),
            StageOutput::Outline(outline) => self.outline = Some(outline),
            StageOutput::Characters(characters) => self.characters = Some(characters),
            StageOutput::Scenes(scenes) => self.scenes = Some(scenes),
            StageOutput::Dialogue(dialogue) => self.dialogue = Some(dialogue),
        }
        Ok(self)
    }

    /// Logline stage: `State -> State`
    pub fn with_logline(self, logline: Logline) -> Result<Self, PipelineError> {
        self.apply(StageOutput::Logline(logline))
    }

    /// Outline stage: `State -> State`
    pub fn with_outline(self, outline: Outline) -> Result<Self, PipelineError> {
        self.apply(StageOutput::Outline(outline))
    }

    /// Character stage: `State -> State`
    pub fn with_characters(self, characters: Vec<Character>) -> Result<Self, PipelineError> {
        self.apply(StageOutput::Characters(characters))
    }

    /// Scene stage: `State -> State`
    pub fn with_scenes(self, scenes: Vec<SceneDraft>) -> Result<Self, PipelineError> {
        self.apply(StageOutput::Scenes(scenes))
    }

    /// Dialogue stage: `State -> State`
    pub fn with_dialogue(self, dialogue: Vec<SceneDialogue>) -> Result<Self, PipelineError> {
        self.apply(StageOutput::Dialogue(dialogue))
    }

    /// Turn a complete state into a screenplay.
    ///
    /// Scene drafts are joined with their dialogue; scenes the Dialogue stage
    /// left out get no dialogue. Fails with a `ReferentialError` when a line is
    /// spoken by someone outside the cast.
    pub fn into_screenplay(self) -> Result<Screenplay, AppError> {
        if let Some(missing) = self.next_stage() {
            return Err(PipelineError::Incomplete { missing }.into());
        }

        let (Some(logline), Some(outline), Some(characters), Some(drafts), Some(dialogue)) = (
            self.logline,
            self.outline,
            self.characters,
            self.scenes,
            self.dialogue,
        ) else {
            return Err(PipelineError::Incomplete { missing: Stage::Logline }.into());
        };

        let mut lines_by_scene: HashMap<usize, _> = dialogue
            .into_iter()
            .map(|d| (d.scene, d.lines))
            .collect();

        let scenes: Vec<Scene> = drafts
            .into_iter()
            .map(|draft| {
                let lines = lines_by_scene.remove(&draft.index).unwrap_or_default();
                Scene::from_draft(draft, lines)
            })
            .collect();

        Ok(Screenplay::new(logline, outline, characters, scenes)?)
    }
}
