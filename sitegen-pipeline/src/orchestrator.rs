//! The generation state machine.
//!
//! ## Run protocol
//!
//! 1. Create the record (`PENDING`) and store the owner's profile.
//! 2. Load the template. Unknown or broken templates end the run in `ERROR`
//!    before any other stage starts.
//! 3. `GENERATING_CONTENT`: ask the content generator. Provider failures are
//!    absorbed there; only an invalid profile ends the run here.
//! 4. `RENDERING`: render, then write `builds/<id>/`.
//! 5. `DEPLOYING`: publish the build to `sites/<domain>/`.
//! 6. `LIVE` with URL and publish time, then notify.
//!
//! Every transition is persisted before the next stage starts. A stage
//! failure persists `ERROR` with the failure's message and is reported
//! through the notifiers, not as an `Err`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sitegen_content::ContentGenerator;
use sitegen_core::{
    paths, FileStore, GenerationRecord, GenerationRequest, GenerationStatus, ProfileInput,
    ProfileStore, RecordId, RecordStore,
};
use sitegen_deploy::{remove_build, write_build, DeployConfig, Deployer};
use sitegen_renderer::{render, DirTemplateStore, TemplateStore, TemplateSummary};

use crate::error::PipelineError;
use crate::notify::{ErrorEvent, LiveEvent, Notifier, TracingNotifier, WebhookNotifier};
use crate::settings::PipelineSettings;

/// Drives records through the pipeline. Shareable across threads.
pub struct Orchestrator {
    records: Arc<dyn RecordStore>,
    profiles: Arc<dyn ProfileStore>,
    templates: Arc<dyn TemplateStore>,
    generator: Arc<ContentGenerator>,
    deployer: Deployer,
    builds_root: PathBuf,
    notifiers: Vec<Arc<dyn Notifier>>,
    rng: Mutex<StdRng>,
    /// Records with a run executing in this process.
    active: Mutex<HashSet<RecordId>>,
}

impl Orchestrator {
    pub fn new(
        records: Arc<dyn RecordStore>,
        profiles: Arc<dyn ProfileStore>,
        templates: Arc<dyn TemplateStore>,
        generator: Arc<ContentGenerator>,
        deployer: Deployer,
        builds_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            records,
            profiles,
            templates,
            generator,
            deployer,
            builds_root: builds_root.into(),
            notifiers: vec![Arc::new(TracingNotifier)],
            rng: Mutex::new(StdRng::from_entropy()),
            active: Mutex::new(HashSet::new()),
        }
    }

    /// File-backed orchestrator using the standard layout under `root`.
    pub fn open_at(root: &Path, settings: &PipelineSettings) -> Result<Self, PipelineError> {
        let store = Arc::new(FileStore::open_at(root)?);
        let templates = Arc::new(DirTemplateStore::new(Some(&paths::templates_dir(root))));
        let generator = Arc::new(ContentGenerator::from_config(&settings.content));

        let mut deploy = DeployConfig::new(paths::sites_dir(root));
        deploy.public_base_url = settings.deploy.public_base_url.clone();

        let orchestrator = Self::new(
            store.clone(),
            store,
            templates,
            generator,
            Deployer::new(deploy),
            paths::builds_dir(root),
        );

        let webhook = settings
            .notify
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        Ok(match webhook {
            Some(url) => orchestrator.with_notifier(Arc::new(WebhookNotifier::new(
                url,
                Duration::from_secs(settings.notify.timeout_secs),
            ))),
            None => orchestrator,
        })
    }

    /// Add a notifier after the default tracing one.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Make presentation scheme selection reproducible.
    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn deployer(&self) -> &Deployer {
        &self.deployer
    }

    /// Durable render output for `id`.
    pub fn build_dir(&self, id: &RecordId) -> PathBuf {
        self.builds_root.join(id.to_string())
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Create and fully run a new generation. Returns the record in its
    /// terminal state.
    pub fn run_generation(
        &self,
        request: &GenerationRequest,
        preferred_provider: Option<&str>,
    ) -> Result<GenerationRecord, PipelineError> {
        let record = self.start(request)?;
        self.drive(record, &request.profile, preferred_provider)
    }

    /// Step 1 only: persist a `PENDING` record and the owner's profile.
    ///
    /// Fails with [`PipelineError::DuplicateDomain`] without touching the
    /// existing record.
    pub fn start(&self, request: &GenerationRequest) -> Result<GenerationRecord, PipelineError> {
        let record = GenerationRecord::new(request, Utc::now());
        self.records.create(&record)?;
        tracing::info!(
            record_id = %record.id,
            domain = %record.domain,
            template = %record.template_id,
            "generation record created"
        );

        if let Err(e) = self.profiles.save_profile(&record.owner_id, &request.profile) {
            let message = format!("could not store profile: {e}");
            self.fail(record, &message, &request.profile)?;
            return Err(e.into());
        }
        Ok(record)
    }

    /// Run every remaining stage for `record`.
    ///
    /// Stage failures come back as `Ok` with status `ERROR`. `Err` means the
    /// outcome could not be recorded; the record is then moved to `ERROR`
    /// on a best-effort basis.
    pub fn drive(
        &self,
        record: GenerationRecord,
        profile: &ProfileInput,
        preferred_provider: Option<&str>,
    ) -> Result<GenerationRecord, PipelineError> {
        let id = record.id;
        let _run = self.claim(id, record.status)?;
        match self.execute(record, profile, preferred_provider) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::error!(record_id = %id, error = %e, "pipeline aborted");
                self.abandon(&id, &e);
                Err(e)
            }
        }
    }

    /// Reset a finished record and run it again with the owner's stored
    /// profile, optionally switching palette.
    pub fn regenerate(
        &self,
        id: &RecordId,
        color_scheme_id: Option<&str>,
    ) -> Result<GenerationRecord, PipelineError> {
        let (record, profile) = self.prepare_regeneration(id, color_scheme_id)?;
        self.drive(record, &profile, None)
    }

    /// The synchronous half of [`Self::regenerate`]: validation and reset to
    /// `GENERATING_CONTENT`.
    pub fn prepare_regeneration(
        &self,
        id: &RecordId,
        color_scheme_id: Option<&str>,
    ) -> Result<(GenerationRecord, ProfileInput), PipelineError> {
        let mut record = self.records.get(id)?;
        if !record.status.is_terminal() || self.is_active(id) {
            return Err(PipelineError::GenerationInProgress {
                id: *id,
                status: record.status,
            });
        }
        let profile = self.profiles.profile_for(&record.owner_id)?;

        record.restart(Utc::now())?;
        if let Some(scheme) = color_scheme_id.map(str::trim).filter(|s| !s.is_empty()) {
            record.color_scheme_id = scheme.to_string();
        }
        self.records.update(&record)?;
        tracing::info!(
            record_id = %record.id,
            generation = record.generation_count,
            color_scheme = %record.color_scheme_id,
            "regeneration started"
        );
        Ok((record, profile))
    }

    /// Take a `LIVE` site offline. The record returns to `RENDERING`; its
    /// build output is kept.
    pub fn undeploy(&self, id: &RecordId) -> Result<GenerationRecord, PipelineError> {
        let mut record = self.records.get(id)?;
        if record.status != GenerationStatus::Live {
            return Err(PipelineError::NotLive {
                id: *id,
                status: record.status,
            });
        }
        self.deployer.undeploy(&record.domain)?;
        record.revert_to_rendered(Utc::now())?;
        self.records.update(&record)?;
        tracing::info!(record_id = %id, domain = %record.domain, "site taken offline");
        Ok(record)
    }

    /// Remove the serving location, the build output and the record.
    /// Returns the record as it was before deletion.
    pub fn delete(&self, id: &RecordId) -> Result<GenerationRecord, PipelineError> {
        let record = self.records.get(id)?;
        if self.is_active(id) {
            return Err(PipelineError::GenerationInProgress {
                id: *id,
                status: record.status,
            });
        }
        self.deployer.undeploy(&record.domain)?;
        remove_build(&self.build_dir(id))?;
        self.records.delete(id)?;
        tracing::info!(record_id = %id, domain = %record.domain, "generation record deleted");
        Ok(record)
    }

    pub fn get_record(&self, id: &RecordId) -> Result<GenerationRecord, PipelineError> {
        Ok(self.records.get(id)?)
    }

    /// Every record, oldest first.
    pub fn list(&self) -> Result<Vec<GenerationRecord>, PipelineError> {
        Ok(self.records.list()?)
    }

    pub fn templates(&self) -> Result<Vec<TemplateSummary>, PipelineError> {
        Ok(self.templates.list()?)
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    fn execute(
        &self,
        mut record: GenerationRecord,
        profile: &ProfileInput,
        preferred_provider: Option<&str>,
    ) -> Result<GenerationRecord, PipelineError> {
        let template = match self.templates.load(&record.template_id) {
            Ok(template) => template,
            Err(e) => return self.fail(record, &e.to_string(), profile),
        };

        if record.status == GenerationStatus::Pending {
            self.transition(&mut record, GenerationStatus::GeneratingContent)?;
        }
        let outcome = match self.generator.generate(profile, preferred_provider) {
            Ok(outcome) => outcome,
            Err(e) => return self.fail(record, &e.to_string(), profile),
        };
        tracing::info!(
            record_id = %record.id,
            source = %outcome.source,
            failed_providers = outcome.failures.len(),
            "content ready"
        );
        let content = outcome.content;
        record.content = Some(content.clone());
        record.content_source = Some(outcome.source);
        self.transition(&mut record, GenerationStatus::Rendering)?;

        let rendered = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            render(&template, &record.color_scheme_id, &content, profile, &mut *rng)
        };
        let rendered = match rendered {
            Ok(rendered) => rendered,
            Err(e) => return self.fail(record, &e.to_string(), profile),
        };
        record.presentation_scheme = Some(rendered.scheme.to_string());

        let build_dir = self.build_dir(&record.id);
        if let Err(e) = write_build(&build_dir, &rendered.html, &rendered.css) {
            return self.fail(record, &e.to_string(), profile);
        }
        tracing::debug!(
            record_id = %record.id,
            palette = %rendered.palette,
            scheme = rendered.scheme,
            build = %build_dir.display(),
            "build written"
        );

        self.transition(&mut record, GenerationStatus::Deploying)?;
        let deployment = match self.deployer.deploy(&record.id, &record.domain, &build_dir) {
            Ok(deployment) => deployment,
            Err(e) => return self.fail(record, &e.to_string(), profile),
        };

        record.mark_live(deployment.url, Utc::now())?;
        self.records.update(&record)?;
        tracing::info!(record_id = %record.id, status = %record.status, "stage complete");

        let event = LiveEvent {
            record_id: record.id,
            domain: record.domain.clone(),
            deployment_url: record.deployment_url.clone().unwrap_or_default(),
            owner_contact: profile.contact().map(str::to_string),
        };
        for notifier in &self.notifiers {
            notifier.on_live(&event);
        }
        Ok(record)
    }

    fn transition(
        &self,
        record: &mut GenerationRecord,
        next: GenerationStatus,
    ) -> Result<(), PipelineError> {
        record.advance(next, Utc::now())?;
        self.records.update(record)?;
        tracing::info!(record_id = %record.id, status = %next, "stage started");
        Ok(())
    }

    /// Persist `ERROR` with `message` and notify.
    fn fail(
        &self,
        mut record: GenerationRecord,
        message: &str,
        profile: &ProfileInput,
    ) -> Result<GenerationRecord, PipelineError> {
        let from = record.status;
        record.fail(message, Utc::now())?;
        self.records.update(&record)?;
        tracing::error!(
            record_id = %record.id,
            domain = %record.domain,
            from = %from,
            error = %message,
            "generation failed"
        );

        let event = ErrorEvent {
            record_id: record.id,
            domain: record.domain.clone(),
            error_message: record.error_message.clone().unwrap_or_default(),
            owner_contact: profile.contact().map(str::to_string),
        };
        for notifier in &self.notifiers {
            notifier.on_error(&event);
        }
        Ok(record)
    }

    /// Best-effort `ERROR` after an infrastructure failure mid-run.
    fn abandon(&self, id: &RecordId, cause: &PipelineError) {
        let mut record = match self.records.get(id) {
            Ok(record) if !record.status.is_terminal() => record,
            Ok(_) => return,
            Err(e) => {
                tracing::warn!(record_id = %id, error = %e, "could not reload record");
                return;
            }
        };
        let stored = record
            .fail(&cause.to_string(), Utc::now())
            .map_err(PipelineError::from)
            .and_then(|()| self.records.update(&record).map_err(PipelineError::from));
        if let Err(e) = stored {
            tracing::warn!(record_id = %id, error = %e, "could not record failure");
        }
    }

    // -----------------------------------------------------------------------
    // Active runs
    // -----------------------------------------------------------------------

    fn is_active(&self, id: &RecordId) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    fn claim(&self, id: RecordId, status: GenerationStatus) -> Result<ActiveRun<'_>, PipelineError> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(id) {
            return Err(PipelineError::GenerationInProgress { id, status });
        }
        Ok(ActiveRun {
            active: &self.active,
            id,
        })
    }
}

/// Releases a record's claim when its run ends, including by panic.
struct ActiveRun<'a> {
    active: &'a Mutex<HashSet<RecordId>>,
    id: RecordId,
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
