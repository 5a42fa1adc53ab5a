use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::layout::{LayoutConfig, SegmentationPolicy};

/// Settings for one screenplay run, read from `conf.json`.
/// Every section falls back to its defaults when missing.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Creative generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Portrait generation settings
    #[serde(default)]
    pub images: ImageConfig,

    /// Episode segmentation policy
    #[serde(default)]
    pub segmentation: SegmentationPolicy,

    /// Body page layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Where and how artifacts are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Creative generation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    // @provider: Anthropic Messages API
    #[default]
    Anthropic,
    // @provider: Built-in scripted screenplay, no network
    Mock,
}

impl GenerationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::Mock => "Mock",
        }
    }
}

impl std::fmt::Display for GenerationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name().to_lowercase())
    }
}

impl std::str::FromStr for GenerationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid generation provider: {}", s)),
        }
    }
}

/// Portrait provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageProvider {
    // @provider: Gemini image generation
    #[default]
    Gemini,
    // @provider: Placeholder images, no network
    Mock,
}

impl std::str::FromStr for ImageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid image provider: {}", s)),
        }
    }
}

/// Creative generation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: GenerationProvider,

    /// Model name
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_anthropic_endpoint")]
    pub endpoint: String,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::default(),
            model: default_generation_model(),
            api_key: String::new(),
            endpoint: default_anthropic_endpoint(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_generation_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Portrait generation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageConfig {
    /// Whether portraits are generated at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Provider to use
    #[serde(default)]
    pub provider: ImageProvider,

    /// Model name
    #[serde(default = "default_image_model")]
    pub model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    /// Style prefix for every portrait prompt
    #[serde(default = "default_image_style")]
    pub style: String,

    /// Maximum number of concurrent portrait requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Request timeout in seconds
    #[serde(default = "default_image_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ImageProvider::default(),
            model: default_image_model(),
            api_key: String::new(),
            endpoint: default_gemini_endpoint(),
            style: default_image_style(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_image_timeout_secs(),
        }
    }
}

/// Artifact output configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory receiving the document and portraits
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Author shown on the title page
    #[serde(default = "default_author")]
    pub author: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            author: default_author(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_concurrent_requests() -> usize {
    2
}

fn default_generation_timeout_secs() -> u64 {
    120
}

fn default_image_timeout_secs() -> u64 {
    90
}

fn default_max_tokens() -> u32 {
    8192
}

/// Upper bound for `GenerationConfig::retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.7
}

fn default_true() -> bool {
    true
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_generation_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_image_style() -> String {
    "cinematic photorealistic".to_string()
}

fn default_output_directory() -> String {
    "generated_screenplays".to_string()
}

fn default_author() -> String {
    "AI Generated".to_string()
}

fn check_endpoint(name: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| anyhow!("Invalid {} endpoint {:?}: {}", name, endpoint, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("Unsupported {} endpoint scheme: {}", name, other)),
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.generation.provider == GenerationProvider::Anthropic {
            if self.generation.api_key.is_empty() {
                return Err(anyhow!("Generation API key is required for Anthropic provider"));
            }
            check_endpoint("generation", &self.generation.endpoint)?;
        }
        if !(0.0..=1.0).contains(&self.generation.temperature) {
            return Err(anyhow!(
                "Generation temperature must be between 0.0 and 1.0, got {}",
                self.generation.temperature
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(anyhow!("Generation max_tokens must be positive"));
        }
        if self.generation.retry_count > MAX_RETRY_COUNT {
            return Err(anyhow!(
                "Generation retry_count must be at most {}, got {}",
                MAX_RETRY_COUNT,
                self.generation.retry_count
            ));
        }

        if self.images.enabled {
            if self.images.provider == ImageProvider::Gemini {
                if self.images.api_key.is_empty() {
                    return Err(anyhow!("Image API key is required for Gemini provider"));
                }
                check_endpoint("image", &self.images.endpoint)?;
            }
            if self.images.concurrent_requests == 0 {
                return Err(anyhow!("Image concurrent_requests must be at least 1"));
            }
        }

        self.segmentation.validate().map_err(|e| anyhow!("{}", e))?;
        self.layout.validate().map_err(|e| anyhow!("{}", e))?;

        if self.output.directory.trim().is_empty() {
            return Err(anyhow!("Output directory must not be empty"));
        }

        Ok(())
    }
}
