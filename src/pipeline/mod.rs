/*!
 * Staged generation pipeline.
 *
 * - `stages`: stage enum and the append-only screenplay state
 * - `validation`: schema checks applied to every collaborator response
 * - `orchestrator`: the linear controller that runs the stages in order
 */

pub mod orchestrator;
pub mod stages;
pub mod validation;

pub use orchestrator::{PipelineProgress, ProgressCallback, StagePipeline, StageTimings};
pub use stages::{ScreenplayState, Stage, StageOutput};
