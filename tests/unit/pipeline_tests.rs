/*!
 * Tests for the stage pipeline
 */

use serde_json::json;
use std::sync::Arc;

use screenwright::errors::{AppError, PipelineError};
use screenwright::pipeline::{ScreenplayState, Stage, StagePipeline, StageTimings};
use screenwright::providers::mock::{MockCreativeProvider, sample_stage_responses};
use screenwright::screenplay::{Logline, Genre, Role};

/// The sample screenplay passes every stage and joins into a screenplay
#[tokio::test]
async fn test_run_withSampleResponses_shouldBuildScreenplay() {
    let pipeline = StagePipeline::new(Arc::new(MockCreativeProvider::scripted(sample_stage_responses())));

    let state = pipeline.run("A lighthouse keeper").await.unwrap();
    let screenplay = state.into_screenplay().unwrap();

    assert_eq!(screenplay.title(), "Last Light");
    assert_eq!(screenplay.logline.genre, Genre::Drama);
    assert_eq!(screenplay.characters.len(), 3);
    assert_eq!(screenplay.characters[0].role, Role::Protagonist);
    assert_eq!(screenplay.scenes.len(), 5);
    assert_eq!(screenplay.scenes[2].transition.as_deref(), Some("CUT TO:"));
    assert_eq!(screenplay.dialogue_count(), 6);
}

/// Stages before the failing one ran, stages after it did not
#[tokio::test]
async fn test_run_failingAtScenes_shouldNotRequestDialogue() {
    let generator = Arc::new(MockCreativeProvider::failing_at(Stage::Scenes));
    let pipeline = StagePipeline::new(generator.clone());

    let err = pipeline.run("premise").await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Scenes));
    assert_eq!(
        generator.requested_stages(),
        vec![Stage::Logline, Stage::Outline, Stage::Characters, Stage::Scenes]
    );
}

/// Malformed JSON becomes a StageFailure naming the stage
#[tokio::test]
async fn test_run_withMissingCharacterFields_shouldFailValidation() {
    let mut responses = sample_stage_responses();
    responses.insert(Stage::Characters, json!({ "characters": [{ "name": "MARA" }] }));
    let pipeline = StagePipeline::new(Arc::new(MockCreativeProvider::scripted(responses)));

    let err = pipeline.run("premise").await.unwrap_err();

    match err {
        PipelineError::StageFailure { stage, detail } => {
            assert_eq!(stage, Stage::Characters);
            assert!(detail.contains("role"), "unexpected detail: {}", detail);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Dialogue for an unknown speaker is caught when the screenplay is built
#[tokio::test]
async fn test_intoScreenplay_withUnknownSpeaker_shouldRaiseReferentialError() {
    let mut responses = sample_stage_responses();
    responses.insert(
        Stage::Dialogue,
        json!({ "scenes": [
            { "scene_number": 1, "dialogue": [{ "character": "MARA", "line": "Hello." }] },
            { "scene_number": 4, "dialogue": [{ "character": "CAPTAIN", "line": "Mayday!" }] }
        ]}),
    );
    let pipeline = StagePipeline::new(Arc::new(MockCreativeProvider::scripted(responses)));

    let state = pipeline.run("premise").await.unwrap();
    let err = state.into_screenplay().unwrap_err();

    match err {
        AppError::Referential(e) => {
            assert_eq!(e.scene, 4);
            assert_eq!(e.character, "CAPTAIN");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Running through a stage stops there and records its timing
#[tokio::test]
async fn test_runThrough_characters_shouldLeaveScenesPending() {
    let pipeline = StagePipeline::new(Arc::new(MockCreativeProvider::scripted(sample_stage_responses())));
    let mut timings = StageTimings::default();

    let state = pipeline
        .run_through(ScreenplayState::new("premise"), Stage::Characters, &mut timings)
        .await
        .unwrap();

    assert_eq!(state.next_stage(), Some(Stage::Scenes));
    assert_eq!(state.characters().map(<[_]>::len), Some(3));
    let stages: Vec<Stage> = timings.stages.iter().map(|(s, _)| *s).collect();
    assert_eq!(stages, vec![Stage::Logline, Stage::Outline, Stage::Characters]);
}

/// Stage functions refuse to run out of order
#[test]
fn test_withOutline_beforeLogline_shouldFail() {
    let state = ScreenplayState::new("premise");
    let outline = screenwright::screenplay::Outline {
        summary: String::new(),
        beats: Vec::new(),
    };

    let err = state.with_outline(outline).unwrap_err();

    assert!(matches!(err, PipelineError::OutOfOrder { attempted: Stage::Outline, .. }));
}

/// Earlier stage output is kept unchanged by later stages
#[test]
fn test_withLogline_shouldOnlyFillLogline() {
    let logline = Logline {
        title: "Last Light".to_string(),
        logline: "A keeper keeps the light.".to_string(),
        genre: Genre::Drama,
        tone: "Quiet".to_string(),
    };

    let state = ScreenplayState::new("premise").with_logline(logline.clone()).unwrap();

    assert_eq!(state.logline(), Some(&logline));
    assert_eq!(state.premise(), "premise");
    assert_eq!(state.completed_stages(), vec![Stage::Logline]);
}
