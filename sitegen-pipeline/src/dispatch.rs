//! Async front end: acknowledge at once, run the stages on the blocking pool.
//!
//! Every method must be called from inside a Tokio runtime.

use std::sync::Arc;

use tokio::task::JoinHandle;

use sitegen_core::{GenerationRecord, GenerationRequest, RecordId};

use crate::error::PipelineError;
use crate::orchestrator::Orchestrator;

/// A run executing in the background.
pub struct PendingRun {
    pub id: RecordId,
    handle: JoinHandle<Result<GenerationRecord, PipelineError>>,
}

impl PendingRun {
    /// Wait for the terminal record.
    pub async fn wait(self) -> Result<GenerationRecord, PipelineError> {
        self.handle
            .await
            .map_err(|e| PipelineError::Join(e.to_string()))?
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    orchestrator: Arc<Orchestrator>,
}

impl Dispatcher {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Create the record now (so `DuplicateDomain` reaches the caller
    /// directly) and run the rest in the background.
    pub fn start_generation(
        &self,
        request: GenerationRequest,
        preferred_provider: Option<String>,
    ) -> Result<PendingRun, PipelineError> {
        let record = self.orchestrator.start(&request)?;
        let id = record.id;
        let orchestrator = Arc::clone(&self.orchestrator);
        let handle = tokio::task::spawn_blocking(move || {
            orchestrator.drive(record, &request.profile, preferred_provider.as_deref())
        });
        tracing::debug!(record_id = %id, "generation dispatched");
        Ok(PendingRun { id, handle })
    }

    /// Validate and reset now, regenerate in the background.
    pub fn regenerate(
        &self,
        id: &RecordId,
        color_scheme_id: Option<&str>,
    ) -> Result<PendingRun, PipelineError> {
        let (record, profile) = self
            .orchestrator
            .prepare_regeneration(id, color_scheme_id)?;
        let orchestrator = Arc::clone(&self.orchestrator);
        let handle =
            tokio::task::spawn_blocking(move || orchestrator.drive(record, &profile, None));
        tracing::debug!(record_id = %id, "regeneration dispatched");
        Ok(PendingRun { id: *id, handle })
    }

    pub fn get_record(&self, id: &RecordId) -> Result<GenerationRecord, PipelineError> {
        self.orchestrator.get_record(id)
    }
}
