/*!
 * Prompt templates for the creative stages.
 *
 * Each stage gets a fixed system prompt describing the role and the JSON
 * shape to return, and a user prompt rendered from the state so far.
 */

use std::fmt::Write;

use crate::pipeline::{ScreenplayState, Stage};

/// JSON-only output rule appended to every system prompt
const JSON_RULES: &str = r#"

## Output Requirements
- Return ONLY valid JSON matching the schema below
- Do not include any text outside the JSON structure"#;

const LOGLINE_SYSTEM: &str = r#"You are an expert screenplay consultant specializing in loglines.

Your task is to create a compelling, professional logline from a story idea.

A great logline should:
- Be ONE sentence (max 40 words)
- Include the protagonist
- State the inciting incident
- Reveal the goal or stakes
- Hint at the genre/tone"#;

const LOGLINE_SCHEMA: &str = r#"
{"title": "SHORT TITLE", "logline": "...", "genre": "Drama|Thriller|Comedy|Horror|Sci-Fi|...", "tone": "..."}"#;

const OUTLINE_SYSTEM: &str = r#"You are an expert screenplay story structure consultant.

Your task is to create a 3-act structure with a beat sheet.

ACT 1 (Setup - 25%): opening image, status quo, inciting incident, break into act 2
ACT 2 (Confrontation - 50%): rising action, midpoint, all is lost, break into act 3
ACT 3 (Resolution - 25%): finale, resolution, closing image

Then condense it into 3-5 key beats, each tagged with its act (1, 2 or 3), in story order."#;

const OUTLINE_SCHEMA: &str = r#"
{"summary": "3-act outline", "beats": [{"description": "...", "act": 1}]}"#;

const CHARACTER_SYSTEM: &str = r#"You are an expert character development consultant for screenplays.

For each main character, provide:
1. Name (in CAPS for screenplay format)
2. Age
3. Role (protagonist, antagonist, supporting)
4. Description: personality and background
5. Arc: how they change throughout the story
6. Visual description: DETAILED physical appearance for image generation
   (age, build, face, hair, clothing, distinguishing features, posture)

Focus on 1-3 main characters plus up to 3 supporting ones. Names must be unique."#;

const CHARACTER_SCHEMA: &str = r#"
{"characters": [{"name": "NAME", "age": 40, "role": "protagonist", "description": "...", "arc": "...", "visual_description": "..."}]}"#;

const SCENE_SYSTEM: &str = r#"You are an expert screenplay writer specializing in scene construction.

Break the outline into individual scenes.

SCENE AND EPISODE NUMBERING:
- Assign sequential scene_number starting from 1 (continues across all episodes)
- Divide scenes into episodes at natural story breaks (act breaks, turning points, cliffhangers)
- Every scene carries the episode number it belongs to; episode numbers never go back

SCENE HEADING FORMAT: "INT. LOCATION - TIME" or "EXT. LOCATION - TIME"
ACTION: present tense, visual, 3-5 sentences
TRANSITION: optional, e.g. "CUT TO:""#;

const SCENE_SCHEMA: &str = r#"
{"scenes": [{"scene_number": 1, "episode": 1, "heading": "INT. OFFICE - NIGHT", "action": "...", "transition": null}]}"#;

const DIALOGUE_SYSTEM: &str = r#"You are an award-winning screenplay dialogue writer.

Write natural, compelling dialogue for every scene that:
- Reveals character personality
- Advances the plot
- Includes subtext and conflict
- Uses parentheticals sparingly (only for important acting notes)

Only the listed characters may speak; use their names exactly as given.
Keep dialogue concise - film is a visual medium."#;

const DIALOGUE_SCHEMA: &str = r#"
{"scenes": [{"scene_number": 1, "dialogue": [{"character": "NAME", "parenthetical": null, "line": "...", "transition": null}]}]}"#;

/// Rendered prompt pair for one stage
#[derive(Debug, Clone, PartialEq)]
pub struct StagePrompt {
    pub system: String,
    pub user: String,
}

impl StagePrompt {
    /// Build the prompt for `stage` from the state accumulated so far
    pub fn for_stage(stage: Stage, state: &ScreenplayState) -> Self {
        let (system, schema) = match stage {
            Stage::Logline => (LOGLINE_SYSTEM, LOGLINE_SCHEMA),
            Stage::Outline => (OUTLINE_SYSTEM, OUTLINE_SCHEMA),
            Stage::Characters => (CHARACTER_SYSTEM, CHARACTER_SCHEMA),
            Stage::Scenes => (SCENE_SYSTEM, SCENE_SCHEMA),
            Stage::Dialogue => (DIALOGUE_SYSTEM, DIALOGUE_SCHEMA),
        };

        Self {
            system: format!("{}{}{}", system, JSON_RULES, schema),
            user: render_user_prompt(stage, state),
        }
    }
}

fn render_user_prompt(stage: Stage, state: &ScreenplayState) -> String {
    let mut prompt = String::new();

    if stage == Stage::Logline {
        let _ = write!(
            prompt,
            "Story Idea:\n{}\n\nCreate a professional logline with title, genre and tone.",
            state.premise()
        );
        return prompt;
    }

    if let Some(logline) = state.logline() {
        let _ = writeln!(prompt, "Title: {}", logline.title);
        let _ = writeln!(prompt, "Logline: {}", logline.logline);
        let _ = writeln!(prompt, "Genre: {}", logline.genre);
        let _ = writeln!(prompt, "Tone: {}", logline.tone);
    }

    if let Some(outline) = state.outline() {
        prompt.push_str("\nOutline:\n");
        if !outline.summary.is_empty() {
            let _ = writeln!(prompt, "{}", outline.summary);
        }
        for (i, beat) in outline.beats.iter().enumerate() {
            let _ = writeln!(prompt, "{}. (Act {}) {}", i + 1, beat.act, beat.description);
        }
    }

    if let Some(characters) = state.characters() {
        prompt.push_str("\nCharacters:\n");
        for character in characters {
            let _ = writeln!(
                prompt,
                "- {} ({}): {}",
                character.name, character.role, character.description
            );
        }
    }

    if stage == Stage::Dialogue {
        if let Some(scenes) = state.scenes() {
            prompt.push_str("\nScenes:\n");
            for scene in scenes {
                let _ = writeln!(prompt, "Scene #{}\nHeading: {}\nAction: {}\n", scene.index, scene.heading, scene.action);
            }
        }
    }

    let task = match stage {
        Stage::Logline => "",
        Stage::Outline => "Create a 3-act outline and beat sheet for this screenplay.",
        Stage::Characters => "Create detailed character profiles with visual descriptions.",
        Stage::Scenes => "Break this outline into screenplay scenes grouped into episodes.",
        Stage::Dialogue => "Write dialogue for every scene.",
    };
    let _ = write!(prompt, "\n{}", task);
    prompt
}

/// Prompt used to generate a character portrait
pub fn portrait_prompt(style: &str, visual_description: &str) -> String {
    format!(
        "{} portrait of {}. Professional headshot style, neutral background, high detail, 4K quality, photorealistic.",
        style,
        visual_description.trim().trim_end_matches('.')
    )
}
