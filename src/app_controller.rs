use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::app_config::{Config, GenerationProvider, ImageProvider};
use crate::document::{DocumentRenderer, Portrait, PortraitSet, TextRenderer, assemble, render_pages};
use crate::errors::{AppError, PortraitError, ProviderError};
use crate::file_utils::{ArtifactStage, FileManager};
use crate::generation::{CreativeGenerator, ImageGenerator, LlmGenerator, PortraitGenerator};
use crate::layout::{format_screenplay, paginate, segment};
use crate::pipeline::{ProgressCallback, ScreenplayState, Stage, StagePipeline, StageTimings};
use crate::providers::mock::{MockCreativeProvider, MockPortraitProvider, sample_stage_responses};
use crate::screenplay::Character;

// @module: Application controller for screenplay generation

/// Outcome of one portrait request
type PortraitOutcome = (Character, Result<Bytes, ProviderError>);

/// Summary of a finished run
#[derive(Debug)]
pub struct RunReport {
    /// Screenplay title
    pub title: String,
    /// Deterministic run identifier used in file names
    pub run_id: String,
    /// Rendered document
    pub document_path: PathBuf,
    /// Portrait images, in character order
    pub portrait_paths: Vec<PathBuf>,
    /// Portraits that could not be generated
    pub portrait_failures: Vec<PortraitError>,
    /// Number of scenes in each episode
    pub episode_sizes: Vec<usize>,
    /// Number of body pages
    pub body_pages: usize,
    /// Time spent in each creative stage
    pub timings: StageTimings,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl RunReport {
    /// Number of episodes
    pub fn episodes(&self) -> usize {
        self.episode_sizes.len()
    }
}

/// Portrait generation running next to the Scene and Dialogue stages.
///
/// Aborted when dropped, so a failing run never leaves it behind.
struct PortraitBranch {
    handle: JoinHandle<Vec<PortraitOutcome>>,
}

impl PortraitBranch {
    fn spawn(generator: Arc<dyn PortraitGenerator>, characters: Vec<Character>, concurrency: usize) -> Self {
        info!("Generating {} portraits ({} at a time)", characters.len(), concurrency);
        let handle = tokio::spawn(async move {
            stream::iter(characters.into_iter().map(|character| {
                let generator = generator.clone();
                async move {
                    let result = generator.generate_portrait(&character).await;
                    (character, result)
                }
            }))
            .buffered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await
        });
        Self { handle }
    }

    async fn join(mut self) -> Result<Vec<PortraitOutcome>> {
        (&mut self.handle)
            .await
            .context("Portrait generation task failed")
    }
}

impl Drop for PortraitBranch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Main application controller for screenplay generation
pub struct Controller {
    // @field: App configuration
    config: Config,
    pipeline: StagePipeline,
    portraits: Option<Arc<dyn PortraitGenerator>>,
    renderer: Box<dyn DocumentRenderer>,
}

impl Controller {
    /// Create a controller that only uses the built-in mock collaborators
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.generation.provider = GenerationProvider::Mock;
        config.images.provider = ImageProvider::Mock;
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let creative: Arc<dyn CreativeGenerator> = match config.generation.provider {
            GenerationProvider::Anthropic => Arc::new(LlmGenerator::from_config(&config.generation)),
            GenerationProvider::Mock => Arc::new(MockCreativeProvider::scripted(sample_stage_responses())),
        };

        let portraits: Option<Arc<dyn PortraitGenerator>> = if config.images.enabled {
            Some(match config.images.provider {
                ImageProvider::Gemini => Arc::new(ImageGenerator::from_config(&config.images)),
                ImageProvider::Mock => Arc::new(MockPortraitProvider::working()),
            })
        } else {
            None
        };

        Ok(Self::with_collaborators(
            config,
            creative,
            portraits,
            Box::new(TextRenderer::default()),
        ))
    }

    // @method: Create a controller around explicit collaborators
    pub fn with_collaborators(
        config: Config,
        creative: Arc<dyn CreativeGenerator>,
        portraits: Option<Arc<dyn PortraitGenerator>>,
        renderer: Box<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            config,
            pipeline: StagePipeline::new(creative),
            portraits,
            renderer,
        }
    }

    /// Report stage progress to a callback
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.pipeline = self.pipeline.with_progress_callback(callback);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate a screenplay from a premise and write it to `output_dir`.
    ///
    /// Nothing is written unless every step succeeds. Portrait failures are
    /// not terminal: they are listed in the report and the character page
    /// shows why the image is missing.
    pub async fn run(&self, premise: &str, output_dir: &Path, force_overwrite: bool) -> Result<RunReport> {
        let start_time = Instant::now();
        let mut timings = StageTimings::default();

        if premise.trim().is_empty() {
            return Err(anyhow!("Premise must not be empty"));
        }

        let state = self
            .pipeline
            .run_through(ScreenplayState::new(premise), Stage::Logline, &mut timings)
            .await
            .map_err(AppError::from)?;

        let title = state
            .logline()
            .map(|logline| logline.title.clone())
            .ok_or_else(|| anyhow!("Logline stage finished without a title"))?;
        let run_id = FileManager::run_id(premise, &title);
        let document_name = FileManager::document_file_name(&title, &run_id, self.renderer.extension());
        let document_path = output_dir.join(&document_name);

        if document_path.exists() && !force_overwrite {
            warn!("Skipping run, {:?} already exists (use -f to force overwrite)", document_path);
            return Err(anyhow!("Output file already exists: {:?}", document_path));
        }

        let state = self
            .pipeline
            .run_through(state, Stage::Characters, &mut timings)
            .await
            .map_err(AppError::from)?;

        let branch = match (&self.portraits, state.characters()) {
            (Some(generator), Some(characters)) if !characters.is_empty() => Some(PortraitBranch::spawn(
                generator.clone(),
                characters.to_vec(),
                self.config.images.concurrent_requests,
            )),
            _ => None,
        };

        let state = self
            .pipeline
            .run_through(state, Stage::Dialogue, &mut timings)
            .await
            .map_err(AppError::from)?;
        info!("All stages complete ({})", timings.summary());

        let screenplay = state.into_screenplay()?;
        let episodes = segment(screenplay.scenes.clone(), &self.config.segmentation).map_err(AppError::from)?;
        let episode_sizes: Vec<usize> = episodes.iter().map(|e| e.len()).collect();

        let elements = format_screenplay(&episodes);
        let pagination = paginate(&elements, &self.config.layout);
        let body_pages = pagination.pages.len();
        debug!("Laid out {} elements on {} body pages", elements.len(), body_pages);

        let (portrait_set, portrait_failures) = match branch {
            Some(branch) => Self::collect_portraits(branch.join().await?, &title, &run_id),
            None => (PortraitSet::new(), Vec::new()),
        };

        let pages = assemble(&screenplay, &self.config.output.author, &portrait_set, pagination.pages);
        let (pages, document) = match render_pages(self.renderer.as_ref(), pages) {
            Ok(rendered) => rendered,
            Err(failure) => {
                error!("Rendering failed: {}", failure.summary());
                debug!("Pages that failed to render: {:#?}", failure.pages);
                return Err(AppError::Render(failure.error).into());
            }
        };
        debug!("Rendered {} pages", pages.len());

        let mut artifacts = ArtifactStage::new(output_dir)?;
        artifacts.add(&document_name, &document)?;
        for character in &screenplay.characters {
            if let Some(Portrait::Image { file_name, data }) = portrait_set.get(&character.name) {
                artifacts.add(file_name, data)?;
            }
        }
        let mut written = artifacts.commit(force_overwrite)?;
        let portrait_paths = written.split_off(1);

        let elapsed = start_time.elapsed();
        info!(
            "Screenplay complete: {} episodes, {} body pages, {} portraits in {}",
            episode_sizes.len(),
            body_pages,
            portrait_paths.len(),
            Self::format_duration(elapsed)
        );

        Ok(RunReport {
            title,
            run_id,
            document_path,
            portrait_paths,
            portrait_failures,
            episode_sizes,
            body_pages,
            timings,
            elapsed,
        })
    }

    /// Turn portrait outcomes into page portraits and recorded failures
    fn collect_portraits(outcomes: Vec<PortraitOutcome>, title: &str, run_id: &str) -> (PortraitSet, Vec<PortraitError>) {
        let mut set = PortraitSet::new();
        let mut failures = Vec::new();
        let mut used_names = HashSet::new();

        for (index, (character, result)) in outcomes.into_iter().enumerate() {
            match result {
                Ok(data) => {
                    let mut file_name = FileManager::portrait_file_name(title, run_id, &character.name);
                    // Distinct characters can share a slug
                    if !used_names.insert(file_name.clone()) {
                        file_name = format!("{}_{}.png", file_name.trim_end_matches(".png"), index + 1);
                        used_names.insert(file_name.clone());
                    }
                    set.insert(&character.name, Portrait::Image { file_name, data });
                }
                Err(source) => {
                    let failure = PortraitError {
                        character: character.name.clone(),
                        source,
                    };
                    warn!("{}", failure);
                    set.insert(
                        &character.name,
                        Portrait::Unavailable {
                            reason: failure.source.to_string(),
                        },
                    );
                    failures.push(failure);
                }
            }
        }

        (set, failures)
    }

    /// Format a duration as "1h 2m 3s", "2m 3s" or "3.4s"
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
