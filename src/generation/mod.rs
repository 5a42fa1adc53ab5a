/*!
 * Collaborator interfaces for creative and portrait generation.
 *
 * The pipeline only sees these traits. Responses from `CreativeGenerator`
 * are untrusted JSON and go through schema validation before use.
 */

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::pipeline::{ScreenplayState, Stage};
use crate::screenplay::Character;

pub mod llm;
pub mod portrait;
pub mod prompts;

pub use llm::{LlmGenerator, extract_json};
pub use portrait::ImageGenerator;

/// Produces the structured fields of one stage from the state so far.
#[async_trait]
pub trait CreativeGenerator: Send + Sync {
    /// Generate raw JSON for `stage`
    async fn generate(&self, stage: Stage, state: &ScreenplayState) -> Result<Value, ProviderError>;
}

/// Produces a portrait image for a character.
#[async_trait]
pub trait PortraitGenerator: Send + Sync {
    /// Generate encoded image bytes
    async fn generate_portrait(&self, character: &Character) -> Result<Bytes, ProviderError>;
}
