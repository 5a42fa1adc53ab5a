/*!
 * # Screenwright
 *
 * A Rust library for staged screenplay generation with AI.
 *
 * ## Features
 *
 * - Five creative stages run strictly in order: logline, outline,
 *   characters, scenes and dialogue
 * - Schema validation of every collaborator answer
 * - Character portraits generated concurrently with the later stages
 * - Deterministic episode segmentation, formatting and pagination
 * - Title page, character reference pages and body pages rendered to one document
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `screenplay`: Data model (logline, outline, characters, scenes, episodes)
 * - `pipeline`: Stage state, validation and the stage controller
 * - `generation`: Collaborator traits and their LLM/image implementations
 * - `layout`: Segmentation, formatter and pagination
 * - `document`: Page model, assembler and renderer
 * - `providers`: API clients for Anthropic and Gemini, plus mocks
 * - `file_utils`: File naming and artifact staging
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod generation;
pub mod layout;
pub mod pipeline;
pub mod providers;
pub mod screenplay;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunReport};
pub use errors::{AppError, PipelineError, PortraitError, ProviderError, ReferentialError, RenderError, SegmentationError};
pub use pipeline::{ScreenplayState, Stage, StagePipeline};
pub use screenplay::{Character, Episode, Scene, Screenplay};
