/*!
 * Error types for the screenwright application.
 *
 * Terminal errors (`PipelineError`, `SegmentationError`, `ReferentialError`,
 * `RenderError`) abort a run before any artifact is written. `PortraitError`
 * is the only non-terminal kind: it is recorded and the character page is
 * rendered without an image.
 */

use thiserror::Error;

use crate::pipeline::Stage;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code == 429 || *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors raised by the stage pipeline controller
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The collaborator answered, but the answer failed schema validation
    #[error("{stage} stage failed validation: {detail}")]
    StageFailure {
        /// Stage whose output was rejected
        stage: Stage,
        /// What was missing or malformed
        detail: String,
    },

    /// The collaborator itself failed; the source is surfaced verbatim
    #[error("{stage} stage generation failed: {source}")]
    Generation {
        /// Stage that was running
        stage: Stage,
        /// Collaborator error
        #[source]
        source: ProviderError,
    },

    /// A stage was applied before its predecessor or applied twice
    #[error("{attempted} stage cannot run now, expected {expected}")]
    OutOfOrder {
        /// Stage that was attempted
        attempted: Stage,
        /// Stage the state is ready for, if any
        expected: String,
    },

    /// Every stage has already run
    #[error("pipeline already complete")]
    Complete,

    /// A screenplay was requested before every stage ran
    #[error("pipeline incomplete, {missing} stage has not run")]
    Incomplete {
        /// First stage that has not run
        missing: Stage,
    },
}

impl PipelineError {
    /// Name of the stage this error belongs to, when there is one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::StageFailure { stage, .. } | Self::Generation { stage, .. } => Some(*stage),
            Self::OutOfOrder { attempted, .. } => Some(*attempted),
            Self::Incomplete { missing } => Some(*missing),
            Self::Complete => None,
        }
    }
}

/// Errors raised while grouping scenes into episodes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    /// A scene's episode hint went backwards or re-opened a closed episode
    #[error("scene {scene} has episode hint {hint} after episode {previous} was already closed")]
    NonMonotonic {
        /// Global scene index
        scene: usize,
        /// Parsed hint of the offending scene
        hint: u32,
        /// Hint of the episode that was open before it
        previous: u32,
    },

    /// A scene's episode hint could not be read as an episode number
    #[error("scene {scene} has an unreadable episode hint: {hint:?}")]
    UnparseableHint {
        /// Global scene index
        scene: usize,
        /// Raw hint text
        hint: String,
    },

    /// The segmentation policy is unusable
    #[error("invalid segmentation policy: {0}")]
    InvalidPolicy(String),
}

/// A dialogue line names a character that is not in the cast
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("scene {scene} has dialogue for unknown character {character:?}")]
pub struct ReferentialError {
    /// Global scene index
    pub scene: usize,
    /// Character name as written in the dialogue line
    pub character: String,
}

/// Portrait generation failed for one character (non-terminal)
#[derive(Error, Debug)]
#[error("portrait for {character} could not be generated: {source}")]
pub struct PortraitError {
    /// Character name
    pub character: String,
    /// Collaborator error
    #[source]
    pub source: ProviderError,
}

/// Errors from the document renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// The page sequence cannot be rendered
    #[error("cannot render page {page}: {reason}")]
    InvalidPage {
        /// Zero-based position in the page sequence
        page: usize,
        /// Why the page was rejected
        reason: String,
    },

    /// Writing the rendered output failed
    #[error("render output failed: {0}")]
    Output(#[from] std::fmt::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the stage pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error from episode segmentation
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    /// Dialogue references an unknown character
    #[error("Referential error: {0}")]
    Referential(#[from] ReferentialError),

    /// Error from the document renderer
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
