//! Error types for sitegen-pipeline.

use thiserror::Error;

use sitegen_core::{Domain, GenerationStatus, OwnerId, RecordId, StoreError, TransitionError};
use sitegen_deploy::DeployError;
use sitegen_renderer::RenderError;

/// Errors returned to callers of the orchestrator.
///
/// Stage failures during a run are not errors here: they end the run in
/// `ERROR` and are recorded on the record. These variants cover requests
/// that cannot start, and infrastructure failures that prevent recording an
/// outcome at all.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("domain {domain} already has generation record {existing}")]
    DuplicateDomain { domain: Domain, existing: RecordId },

    #[error("generation record {id} not found")]
    NotFound { id: RecordId },

    /// Regeneration or deletion requested while a run is active.
    #[error("generation record {id} is {status}; wait for it to finish")]
    GenerationInProgress { id: RecordId, status: GenerationStatus },

    /// Undeploy requested for a record that is not being served.
    #[error("generation record {id} is {status}, not LIVE")]
    NotLive { id: RecordId, status: GenerationStatus },

    #[error("no profile stored for owner {owner}")]
    ProfileNotFound { owner: OwnerId },

    #[error("record store error: {0}")]
    Store(StoreError),

    #[error("invalid status change: {0}")]
    Transition(#[from] TransitionError),

    #[error("template error: {0}")]
    Template(#[from] RenderError),

    #[error("deploy error: {0}")]
    Deploy(#[from] DeployError),

    /// A background run panicked or was cancelled.
    #[error("pipeline task failed: {0}")]
    Join(String),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateDomain { domain, existing } => {
                PipelineError::DuplicateDomain { domain, existing }
            }
            StoreError::RecordNotFound { id } => PipelineError::NotFound { id },
            StoreError::ProfileNotFound { owner } => PipelineError::ProfileNotFound { owner },
            other => PipelineError::Store(other),
        }
    }
}
