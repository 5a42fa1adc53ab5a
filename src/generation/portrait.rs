/*!
 * Portrait generation backed by an image model.
 */

use async_trait::async_trait;
use bytes::Bytes;
use log::info;
use std::time::Duration;

use crate::app_config::ImageConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::screenplay::Character;

use super::PortraitGenerator;
use super::prompts::portrait_prompt;

/// Portrait generator that asks Gemini for one image per character.
#[derive(Debug)]
pub struct ImageGenerator {
    client: Gemini,
    style: String,
}

impl ImageGenerator {
    /// Build a generator from configuration
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            client: Gemini::new(
                config.api_key.clone(),
                config.endpoint.clone(),
                config.model.clone(),
                Duration::from_secs(config.timeout_secs),
            ),
            style: config.style.clone(),
        }
    }
}

#[async_trait]
impl PortraitGenerator for ImageGenerator {
    async fn generate_portrait(&self, character: &Character) -> Result<Bytes, ProviderError> {
        info!("Generating portrait for {}", character.name);
        let prompt = portrait_prompt(&self.style, &character.visual_description);
        let response = self.client.complete(GeminiRequest::image(prompt)).await?;
        Gemini::extract_image(&response)
    }
}
