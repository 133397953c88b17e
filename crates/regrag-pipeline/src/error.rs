use regrag_core::error::ModelError;
use thiserror::Error;

/// The only failures a caller of [`crate::Pipeline::answer`] can see.
/// Everything else (degraded expansion, empty per-variant retrieval,
/// overstrict grading, grounding-check failure, missing parents) is
/// absorbed at the owning component and surfaced as logs or reduced
/// confidence.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("no candidates could be retrieved for this question")]
    NoCandidates,

    #[error("answer generation failed")]
    GenerationFailed(#[source] ModelError),
}
