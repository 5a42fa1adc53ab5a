/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use std::fs;

use screenwright::app_config::{Config, GenerationProvider, LogLevel};

use crate::common;

/// A saved config reads back unchanged
#[test]
fn test_config_savedToFile_shouldLoadBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    let mut config = common::mock_config();
    config.output.author = "Jo Writer".to_string();
    config.segmentation.max_episodes = Some(4);
    config.log_level = LogLevel::Debug;

    fs::write(&path, serde_json::to_string_pretty(&config)?)?;
    let loaded: Config = serde_json::from_str(&fs::read_to_string(&path)?)?;

    assert_eq!(loaded.generation.provider, GenerationProvider::Mock);
    assert_eq!(loaded.output.author, "Jo Writer");
    assert_eq!(loaded.segmentation, config.segmentation);
    assert_eq!(loaded.layout, config.layout);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Provider names are written in lower case
#[test]
fn test_config_serialized_shouldUseLowercaseProviders() -> Result<()> {
    let json = serde_json::to_value(common::mock_config())?;
    assert_eq!(json["generation"]["provider"], "mock");
    assert_eq!(json["images"]["provider"], "mock");
    assert_eq!(json["log_level"], "info");
    Ok(())
}

/// An unusable segmentation policy fails validation
#[test]
fn test_validate_withInvertedSegmentation_shouldFail() {
    let mut config = common::mock_config();
    config.segmentation.min_scenes_per_episode = 5;
    config.segmentation.max_scenes_per_episode = 2;

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("max_scenes_per_episode"));
}

/// Dialogue wider than the page fails validation
#[test]
fn test_validate_withDialogueWiderThanAction_shouldFail() {
    let mut config = common::mock_config();
    config.layout.dialogue_width = config.layout.action_width + 1;

    assert!(config.validate().is_err());
}

/// No portrait concurrency at all is rejected
#[test]
fn test_validate_withZeroConcurrentRequests_shouldFail() {
    let mut config = common::mock_config();
    config.images.concurrent_requests = 0;

    assert!(config.validate().is_err());
}

/// Runaway retry counts are rejected
#[test]
fn test_validate_withExcessiveRetryCount_shouldFail() {
    let mut config = common::mock_config();
    config.generation.retry_count = 64;

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("retry_count"));
}
