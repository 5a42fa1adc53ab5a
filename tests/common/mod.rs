/*!
 * Common test utilities for the screenwright test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;

use screenwright::app_config::{Config, GenerationProvider, ImageProvider};
use screenwright::app_controller::Controller;
use screenwright::document::TextRenderer;
use screenwright::generation::{CreativeGenerator, PortraitGenerator};
use screenwright::screenplay::{Character, DialogueLine, Role, Scene, SceneHeading, Setting};

/// Route library logs to the test output, once per process
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Config that only uses the built-in mocks
pub fn mock_config() -> Config {
    let mut config = Config::default();
    config.generation.provider = GenerationProvider::Mock;
    config.images.provider = ImageProvider::Mock;
    config
}

/// Controller around explicit collaborators with the text renderer
pub fn controller_with(
    creative: Arc<dyn CreativeGenerator>,
    portraits: Option<Arc<dyn PortraitGenerator>>,
) -> Controller {
    init_logging();
    Controller::with_collaborators(mock_config(), creative, portraits, Box::new(TextRenderer::default()))
}

/// Scene at `location` with one exchange of dialogue
pub fn scene(index: usize, location: &str, time: &str) -> Scene {
    Scene {
        index,
        heading: SceneHeading::new(Setting::Interior, location, time),
        action: format!("Scene {} happens at the {}.", index, location.to_lowercase()),
        dialogue: vec![
            line("MARA", "Where were you?", None),
            line("ELI", "Out.", Some("shrugging")),
        ],
        episode_hint: None,
        transition: None,
    }
}

/// Scene carrying an episode hint
pub fn hinted_scene(index: usize, hint: &str) -> Scene {
    Scene {
        episode_hint: Some(hint.to_string()),
        ..scene(index, "Lighthouse", "Night")
    }
}

/// `count` scenes in the same place at the same time
pub fn same_place_scenes(count: usize) -> Vec<Scene> {
    (1..=count).map(|i| scene(i, "Lighthouse", "Night")).collect()
}

pub fn line(character: &str, text: &str, parenthetical: Option<&str>) -> DialogueLine {
    DialogueLine {
        character: character.to_string(),
        text: text.to_string(),
        parenthetical: parenthetical.map(str::to_string),
        transition: None,
    }
}

pub fn character(name: &str, role: Role) -> Character {
    Character {
        name: name.to_string(),
        age: None,
        role,
        description: format!("{} has lived here all their life.", name),
        visual_description: format!("{} in a grey wool coat.", name),
        arc: String::new(),
    }
}

/// Every file directly inside `dir`, sorted
pub fn files_in(dir: &TempDir) -> Result<Vec<String>> {
    let mut names = std::fs::read_dir(dir.path())?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    names.sort();
    Ok(names)
}
