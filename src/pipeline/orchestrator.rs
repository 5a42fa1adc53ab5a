/*!
 * Stage pipeline controller.
 *
 * Runs the five creative stages strictly in order:
 * 1. Logline
 * 2. Outline
 * 3. Characters
 * 4. Scenes
 * 5. Dialogue
 *
 * Each step calls the creative collaborator, validates its answer and adds
 * the result to the state. The first failure ends the run; there is no retry
 * here, that belongs to the collaborator.
 */

use log::{debug, error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::PipelineError;
use crate::generation::CreativeGenerator;

use super::stages::{ScreenplayState, Stage};
use super::validation;

/// Progress information during pipeline execution.
#[derive(Debug, Clone)]
pub struct PipelineProgress {
    /// Stage currently running or just finished
    pub stage: Stage,

    /// Number of stages finished so far
    pub completed_stages: usize,

    /// Overall progress (0.0 - 1.0)
    pub overall_progress: f32,

    /// Current status message
    pub status: String,
}

impl PipelineProgress {
    /// Progress at the start of `stage`
    pub fn started(stage: Stage) -> Self {
        Self::new(stage, stage.position(), format!("Generating {}...", stage))
    }

    /// Progress once `stage` is done
    pub fn finished(stage: Stage, summary: &str) -> Self {
        Self::new(stage, stage.position() + 1, format!("{} ready: {}", stage, summary))
    }

    fn new(stage: Stage, completed_stages: usize, status: String) -> Self {
        Self {
            stage,
            completed_stages,
            overall_progress: completed_stages as f32 / Stage::ALL.len() as f32,
            status,
        }
    }
}

/// Callback receiving progress updates
pub type ProgressCallback = Box<dyn Fn(PipelineProgress) + Send + Sync>;

/// Timing of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    /// Duration of every stage that ran, in order
    pub stages: Vec<(Stage, Duration)>,
}

impl StageTimings {
    /// Total time spent in stages
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|(_, d)| *d).sum()
    }

    /// One-line summary of the timings
    pub fn summary(&self) -> String {
        self.stages
            .iter()
            .map(|(stage, d)| format!("{}: {:.1}s", stage, d.as_secs_f32()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Linear controller for the creative stages.
pub struct StagePipeline {
    generator: Arc<dyn CreativeGenerator>,
    progress_callback: Option<ProgressCallback>,
}

impl StagePipeline {
    /// Create a pipeline backed by a creative generation service
    pub fn new(generator: Arc<dyn CreativeGenerator>) -> Self {
        Self {
            generator,
            progress_callback: None,
        }
    }

    /// Report progress to a callback
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report(&self, progress: PipelineProgress) {
        if let Some(ref callback) = self.progress_callback {
            callback(progress);
        }
    }

    /// Run the next stage the state is waiting for.
    pub async fn advance(&self, state: ScreenplayState) -> Result<ScreenplayState, PipelineError> {
        let stage = state.next_stage().ok_or(PipelineError::Complete)?;

        info!("Running {} stage", stage);
        self.report(PipelineProgress::started(stage));

        let value = self
            .generator
            .generate(stage, &state)
            .await
            .map_err(|source| {
                error!("{} stage generation failed: {}", stage, source);
                PipelineError::Generation { stage, source }
            })?;

        let output = validation::validate(stage, value, &state).map_err(|detail| {
            error!("{} stage returned invalid data: {}", stage, detail);
            PipelineError::StageFailure { stage, detail }
        })?;

        let summary = output.summary();
        debug!("{} stage produced {}", stage, summary);

        let state = state.apply(output)?;
        self.report(PipelineProgress::finished(stage, &summary));
        Ok(state)
    }

    /// Run stages until `last` has completed.
    pub async fn run_through(
        &self,
        mut state: ScreenplayState,
        last: Stage,
        timings: &mut StageTimings,
    ) -> Result<ScreenplayState, PipelineError> {
        while let Some(stage) = state.next_stage() {
            if stage > last {
                break;
            }
            let started = Instant::now();
            state = self.advance(state).await?;
            timings.stages.push((stage, started.elapsed()));
        }
        Ok(state)
    }

    /// Run every stage for a premise.
    pub async fn run(&self, premise: &str) -> Result<ScreenplayState, PipelineError> {
        let mut timings = StageTimings::default();
        let state = self
            .run_through(ScreenplayState::new(premise), Stage::Dialogue, &mut timings)
            .await?;
        info!("All stages complete ({})", timings.summary());
        Ok(state)
    }
}
