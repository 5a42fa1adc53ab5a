/*!
 * Tests for provider clients, prompts and mocks
 */

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use screenwright::generation::extract_json;
use screenwright::generation::prompts::{StagePrompt, portrait_prompt};
use screenwright::generation::PortraitGenerator;
use screenwright::pipeline::{ScreenplayState, Stage};
use screenwright::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use screenwright::providers::gemini::{Gemini, GeminiRequest, GeminiResponse};
use screenwright::providers::mock::{MockPortraitProvider, PLACEHOLDER_PNG_HEADER};
use screenwright::screenplay::Role;

use crate::common;

/// The Messages API body carries model, system prompt and messages
#[test]
fn test_anthropicRequest_serialized_shouldMatchMessagesApi() {
    let request = AnthropicRequest::new("claude-3-5-sonnet-20241022", 4096)
        .system("You are a screenwriter.")
        .add_message("user", "Write a logline.")
        .temperature(0.7);

    let body = serde_json::to_value(&request).unwrap();

    assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
    assert_eq!(body["max_tokens"], 4096);
    assert_eq!(body["system"], "You are a screenwriter.");
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "Write a logline.");
}

/// Text blocks of a completion are joined
#[test]
fn test_anthropic_extractText_shouldReadTextBlocks() {
    let response: AnthropicResponse = serde_json::from_value(json!({
        "content": [{ "type": "text", "text": "{\"title\": \"Last Light\"}" }],
        "usage": { "input_tokens": 10, "output_tokens": 5 }
    }))
    .unwrap();

    let text = Anthropic::extract_text(&response);

    assert_eq!(extract_json(&text).unwrap(), "{\"title\": \"Last Light\"}");
}

/// Image requests use camelCase generation settings
#[test]
fn test_geminiRequest_serialized_shouldUseCamelCase() {
    let body = serde_json::to_value(GeminiRequest::image("a keeper")).unwrap();

    assert_eq!(body["contents"][0]["parts"][0]["text"], "Generate an image: a keeper");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
}

/// The first inline image part is decoded
#[test]
fn test_gemini_extractImage_shouldDecodeInlineData() {
    let response: GeminiResponse = serde_json::from_value(json!({
        "candidates": [{ "content": { "parts": [
            { "text": "Here is your portrait." },
            { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(b"\x89PNGdata") } }
        ]}}]
    }))
    .unwrap();

    let image = Gemini::extract_image(&response).unwrap();

    assert_eq!(image.as_ref(), b"\x89PNGdata");
}

/// A text-only answer is a parse error
#[test]
fn test_gemini_extractImage_withoutImage_shouldFail() {
    let response: GeminiResponse = serde_json::from_value(json!({
        "candidates": [{ "content": { "parts": [{ "text": "I cannot draw that." }] } }]
    }))
    .unwrap();

    assert!(Gemini::extract_image(&response).is_err());
}

/// Portrait prompts put the style in front of the visual description
#[test]
fn test_portraitPrompt_shouldDescribeHeadshot() {
    let prompt = portrait_prompt("cinematic photorealistic", "Weathered woman, grey braid.");

    assert!(prompt.starts_with("cinematic photorealistic portrait of Weathered woman, grey braid."));
    assert!(prompt.contains("neutral background"));
}

/// Later stage prompts carry what earlier stages produced
#[test]
fn test_stagePrompt_scenes_shouldIncludeCharacters() {
    let state = ScreenplayState::new("premise")
        .with_logline(screenwright::screenplay::Logline {
            title: "Last Light".to_string(),
            logline: "A keeper keeps the light.".to_string(),
            genre: screenwright::screenplay::Genre::Drama,
            tone: "Quiet".to_string(),
        })
        .unwrap()
        .with_outline(screenwright::screenplay::Outline {
            summary: "Storm.".to_string(),
            beats: Vec::new(),
        })
        .unwrap()
        .with_characters(vec![common::character("MARA", Role::Protagonist)])
        .unwrap();

    let prompt = StagePrompt::for_stage(Stage::Scenes, &state);

    assert!(prompt.user.contains("Title: Last Light"));
    assert!(prompt.user.contains("- MARA (Protagonist)"));
}

/// The portrait mock fails only for the named characters
#[tokio::test]
async fn test_mockPortraitProvider_failingFor_shouldOnlyFailNamed() {
    let provider = MockPortraitProvider::failing_for(&["Eli"]);

    let mara = provider
        .generate_portrait(&common::character("MARA", Role::Protagonist))
        .await
        .unwrap();
    let eli = provider
        .generate_portrait(&common::character("ELI", Role::Antagonist))
        .await;

    assert!(mara.starts_with(PLACEHOLDER_PNG_HEADER));
    assert!(eli.is_err());
    assert_eq!(provider.request_count(), 2);
}
