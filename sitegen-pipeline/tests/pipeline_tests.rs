use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rstest::rstest;
use sitegen_content::{ContentGenerator, ContentProvider, Prompt, ProviderError};
use sitegen_core::{
    ContentSource, Domain, FileStore, GenerationRecord, GenerationRequest, GenerationStatus,
    MemoryStore, ProfileInput, RecordStore,
};
use sitegen_deploy::{DeployConfig, Deployer};
use sitegen_pipeline::{
    Dispatcher, ErrorEvent, LiveEvent, Notifier, Orchestrator, PipelineError, PipelineSettings,
};
use sitegen_renderer::{
    DirTemplateStore, RenderError, Template, TemplateMeta, TemplateStore, TemplateSummary,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Recorder {
    live: Mutex<Vec<LiveEvent>>,
    errors: Mutex<Vec<ErrorEvent>>,
}

impl Notifier for Recorder {
    fn on_live(&self, event: &LiveEvent) {
        self.live.lock().unwrap().push(event.clone());
    }

    fn on_error(&self, event: &ErrorEvent) {
        self.errors.lock().unwrap().push(event.clone());
    }
}

struct Unreachable;

impl ContentProvider for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn complete(&self, _prompt: &Prompt) -> Result<String, ProviderError> {
        Err(ProviderError::Transport("connection refused".into()))
    }
}

/// Answers every prompt with the same reply.
struct Scripted(&'static str);

impl ContentProvider for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(&self, _prompt: &Prompt) -> Result<String, ProviderError> {
        Ok(self.0.to_string())
    }
}

const TOKEN_IN_HEADLINE: &str = r#"{
    "homepage": {"headline": "Hi {{name}}", "subheadline": "Portraits {{#if x}}",
                 "heroText": "Ada photographs weddings.", "ctaText": "Book now"},
    "about": {"title": "About Ada", "content": "Ten }} years.", "highlights": ["{{phone}}"]},
    "services": {"title": "Services", "intro": "What Ada does.",
                 "services": [{"name": "{{email}}", "description": "Full day.", "benefits": ["Relaxed"]}]},
    "contact": {"title": "Contact", "content": "Say hello.", "ctaText": "Email Ada"},
    "seo": {"title": "Ada {{name}}", "description": "Wedding photographer.",
            "keywords": ["wedding photographer"]}
}"#;

/// A single template whose skeleton asks for a value nothing binds.
struct UnboundToken;

impl TemplateStore for UnboundToken {
    fn load(&self, id: &str) -> Result<Template, RenderError> {
        let meta = TemplateMeta {
            name: "Broken".into(),
            description: String::new(),
            color_schemes: Default::default(),
        };
        Template::from_parts(
            id,
            "<html><head><title>x</title></head><body><h1>{{name}}</h1>{{missing}}</body></html>",
            "body { margin: 0; }",
            meta,
        )
    }

    fn list(&self) -> Result<Vec<TemplateSummary>, RenderError> {
        Ok(Vec::new())
    }
}

struct Harness {
    _tmp: TempDir,
    root: std::path::PathBuf,
    store: Arc<MemoryStore>,
    recorder: Arc<Recorder>,
    orchestrator: Orchestrator,
}

fn harness() -> Harness {
    harness_with_sites(None)
}

fn harness_with_sites(sites: Option<&str>) -> Harness {
    build_harness(
        sites,
        ContentGenerator::new(vec![Box::new(Unreachable)]),
        Arc::new(DirTemplateStore::builtin_only()),
    )
}

fn build_harness(
    sites: Option<&str>,
    generator: ContentGenerator,
    templates: Arc<dyn TemplateStore>,
) -> Harness {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    let store = Arc::new(MemoryStore::new());
    let recorder = Arc::new(Recorder::default());
    let sites_root = root.join(sites.unwrap_or("sites"));
    let orchestrator = Orchestrator::new(
        store.clone(),
        store.clone(),
        templates,
        Arc::new(generator),
        Deployer::new(DeployConfig::new(sites_root)),
        root.join("builds"),
    )
    .with_rng_seed(7)
    .with_notifier(recorder.clone());
    Harness {
        _tmp: tmp,
        root,
        store,
        recorder,
        orchestrator,
    }
}

fn ada_profile() -> ProfileInput {
    ProfileInput {
        name: "Ada Lane".into(),
        profession: "Photographer".into(),
        bio: Some("Weddings and portraits.".into()),
        email: Some("ada@example.com".into()),
        ..ProfileInput::default()
    }
}

fn request(domain: &str, template: &str) -> GenerationRequest {
    GenerationRequest {
        owner_id: "owner-ada".into(),
        domain: Domain::parse(domain).unwrap(),
        profile: ada_profile(),
        template_id: template.into(),
        color_scheme_id: "default".into(),
    }
}

fn override_block(css: &str) -> &str {
    css.split("}\n").next().unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ---------------------------------------------------------------------------
// Full runs
// ---------------------------------------------------------------------------

#[test]
fn photographer_goes_live_with_fallback_content() {
    let h = harness();
    let record = h
        .orchestrator
        .run_generation(&request("ada.example", "professional"), None)
        .unwrap();

    assert_eq!(record.status, GenerationStatus::Live);
    assert_eq!(record.deployment_url.as_deref(), Some("https://ada.example"));
    assert!(record.published_at.unwrap() >= record.created_at);
    assert!(record.error_message.is_none());
    assert_eq!(record.content_source, Some(ContentSource::Fallback));
    assert!(record.presentation_scheme.is_some());

    let content = record.content.as_ref().unwrap();
    assert!(content.seo.keywords.iter().any(|k| k == "Photographer"));

    let html = read(&h.root.join("sites").join("ada.example").join("index.html"));
    assert!(html.contains("Ada Lane"));
    assert!(!html.contains("{{"));
    assert!(h.root.join("sites").join("ada.example").join("manifest.json").is_file());
    assert!(h.orchestrator.build_dir(&record.id).join("styles.css").is_file());

    assert_eq!(h.store.get(&record.id).unwrap(), record);
}

#[rstest]
#[case("professional", "slate")]
#[case("creative", "sunset")]
#[case("creative", "no-such-scheme")]
fn builtin_templates_go_live(#[case] template: &str, #[case] scheme: &str) {
    let h = harness();
    let mut req = request("ada.example", template);
    req.color_scheme_id = scheme.into();

    let record = h.orchestrator.run_generation(&req, None).unwrap();
    assert_eq!(record.status, GenerationStatus::Live, "{:?}", record.error_message);
    assert_eq!(record.color_scheme_id, scheme);
}

#[test]
fn live_notification_carries_url_and_contact() {
    let h = harness();
    let record = h
        .orchestrator
        .run_generation(&request("ada.example", "creative"), None)
        .unwrap();

    let live = h.recorder.live.lock().unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].record_id, record.id);
    assert_eq!(live[0].deployment_url, "https://ada.example");
    assert_eq!(live[0].owner_contact.as_deref(), Some("ada@example.com"));
    assert!(h.recorder.errors.lock().unwrap().is_empty());
}

#[test]
fn duplicate_domain_is_rejected_and_existing_record_untouched() {
    let h = harness();
    let first = h
        .orchestrator
        .run_generation(&request("ada.example", "professional"), None)
        .unwrap();

    let err = h
        .orchestrator
        .run_generation(&request("Ada.Example", "creative"), None)
        .unwrap_err();
    match err {
        PipelineError::DuplicateDomain { existing, .. } => assert_eq!(existing, first.id),
        other => panic!("expected DuplicateDomain, got {other:?}"),
    }
    assert_eq!(h.orchestrator.get_record(&first.id).unwrap(), first);
    assert_eq!(h.orchestrator.list().unwrap().len(), 1);
}

#[test]
fn unknown_template_fails_before_leaving_pending() {
    let h = harness();
    let record = h
        .orchestrator
        .run_generation(&request("ada.example", "brutalist"), None)
        .unwrap();

    assert_eq!(record.status, GenerationStatus::Error);
    let message = record.error_message.as_deref().unwrap();
    assert!(message.contains("template not found"), "{message}");
    assert!(record.content.is_none());
    assert!(record.deployment_url.is_none());
    assert!(!h.orchestrator.build_dir(&record.id).exists());

    let errors = h.recorder.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_message, message);
}

#[test]
fn deploy_failure_records_error_without_url() {
    let h = harness_with_sites(Some("sites-file"));
    fs::write(h.root.join("sites-file"), "not a directory").unwrap();

    let record = h
        .orchestrator
        .run_generation(&request("ada.example", "professional"), None)
        .unwrap();

    assert_eq!(record.status, GenerationStatus::Error);
    assert!(record.deployment_url.is_none());
    assert!(record.published_at.is_none());
    assert!(record.content.is_some(), "content survives a deploy failure");
    assert!(record
        .error_message
        .as_deref()
        .unwrap()
        .contains("sites-file"));
    assert_eq!(h.recorder.errors.lock().unwrap().len(), 1);
}

#[test]
fn unbound_placeholder_fails_render_with_token_named() {
    let h = build_harness(
        None,
        ContentGenerator::new(vec![Box::new(Unreachable)]),
        Arc::new(UnboundToken),
    );
    let record = h
        .orchestrator
        .run_generation(&request("ada.example", "broken"), None)
        .unwrap();

    assert_eq!(record.status, GenerationStatus::Error);
    let message = record.error_message.as_deref().unwrap();
    assert!(message.contains("missing"), "{message}");
    assert!(record.deployment_url.is_none());
    assert!(record.published_at.is_none());
    assert!(!h.root.join("sites").join("ada.example").exists());

    let stored = h.store.get(&record.id).unwrap();
    assert_eq!(stored.status, GenerationStatus::Error);
    assert_eq!(stored.error_message.as_deref(), Some(message));

    let errors = h.recorder.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_message, message);
    assert!(h.recorder.live.lock().unwrap().is_empty());
}

#[test]
fn placeholder_syntax_in_provider_copy_never_reaches_the_site() {
    let h = build_harness(
        None,
        ContentGenerator::new(vec![Box::new(Scripted(TOKEN_IN_HEADLINE))]),
        Arc::new(DirTemplateStore::builtin_only()),
    );
    let record = h
        .orchestrator
        .run_generation(&request("ada.example", "professional"), None)
        .unwrap();

    assert_eq!(record.status, GenerationStatus::Live);
    assert_eq!(record.content_source, Some(ContentSource::Provider("scripted".into())));
    let html = read(&h.root.join("sites").join("ada.example").join("index.html"));
    assert!(!html.contains("{{"), "{html}");
    assert!(html.contains("Hi &#123;&#123;name&#125;&#125;"));
    assert!(html.contains("Ten &#125;&#125; years."));
}

#[test]
fn owner_id_with_any_characters_is_stored_and_regenerates() {
    let tmp = TempDir::new().unwrap();
    let orchestrator = Orchestrator::open_at(tmp.path(), &PipelineSettings::default()).unwrap();
    let mut req = request("ada.example", "professional");
    req.owner_id = "ada@example.com".into();

    let record = orchestrator.run_generation(&req, None).unwrap();
    assert_eq!(record.status, GenerationStatus::Live);
    assert!(tmp
        .path()
        .join("profiles")
        .join("ada_40example_2ecom.yaml")
        .is_file());

    let again = orchestrator.regenerate(&record.id, Some("forest")).unwrap();
    assert_eq!(again.status, GenerationStatus::Live);
    assert_eq!(again.generation_count, 2);
    assert_eq!(again.owner_id, req.owner_id);
}

// ---------------------------------------------------------------------------
// Regeneration
// ---------------------------------------------------------------------------

#[test]
fn regenerate_uses_owners_latest_profile() {
    let h = harness();
    let first = h
        .orchestrator
        .run_generation(&request("ada.example", "professional"), None)
        .unwrap();

    let mut second = request("studio.example", "professional");
    second.profile.name = "Lane Studio".into();
    h.orchestrator.run_generation(&second, None).unwrap();

    let again = h.orchestrator.regenerate(&first.id, None).unwrap();
    assert_eq!(again.status, GenerationStatus::Live);
    assert!(again
        .content
        .as_ref()
        .unwrap()
        .homepage
        .headline
        .contains("Lane Studio"));
}

#[test]
fn regenerate_with_new_palette_replaces_override_block() {
    let h = harness();
    let first = h
        .orchestrator
        .run_generation(&request("ada.example", "professional"), None)
        .unwrap();
    let css_path = h.orchestrator.build_dir(&first.id).join("styles.css");
    assert!(override_block(&read(&css_path)).contains("#1f3a5f"));

    let second = h.orchestrator.regenerate(&first.id, Some("forest")).unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.status, GenerationStatus::Live);
    assert_eq!(second.color_scheme_id, "forest");
    assert_eq!(second.generation_count, 2);
    assert!(second.deployment_url.is_some());

    let block = read(&css_path);
    let block = override_block(&block);
    assert!(block.contains("#2d4a3e"));
    assert!(!block.contains("#1f3a5f"));
    assert!(read(&h.root.join("sites").join("ada.example").join("styles.css")).contains("#2d4a3e"));
}

#[test]
fn regenerate_after_error_reruns_pipeline() {
    let h = harness();
    let failed = h
        .orchestrator
        .run_generation(&request("ada.example", "brutalist"), None)
        .unwrap();
    assert_eq!(failed.status, GenerationStatus::Error);

    let mut record = h.store.get(&failed.id).unwrap();
    record.template_id = "creative".into();
    h.store.update(&record).unwrap();

    let rerun = h.orchestrator.regenerate(&failed.id, None).unwrap();
    assert_eq!(rerun.status, GenerationStatus::Live);
    assert!(rerun.error_message.is_none());
}

#[test]
fn regenerate_mid_pipeline_is_rejected() {
    let h = harness();
    let pending = h
        .orchestrator
        .start(&request("ada.example", "professional"))
        .unwrap();

    let err = h.orchestrator.regenerate(&pending.id, None).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::GenerationInProgress {
            status: GenerationStatus::Pending,
            ..
        }
    ));
    assert_eq!(h.orchestrator.get_record(&pending.id).unwrap(), pending);
}

#[test]
fn regenerate_unknown_record_is_not_found() {
    let h = harness();
    let id = sitegen_core::RecordId::new();
    assert!(matches!(
        h.orchestrator.regenerate(&id, None),
        Err(PipelineError::NotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// Undeploy and delete
// ---------------------------------------------------------------------------

fn live_record(h: &Harness) -> GenerationRecord {
    h.orchestrator
        .run_generation(&request("ada.example", "professional"), None)
        .unwrap()
}

#[test]
fn undeploy_reverts_to_rendering_and_keeps_build() {
    let h = harness();
    let record = live_record(&h);

    let offline = h.orchestrator.undeploy(&record.id).unwrap();
    assert_eq!(offline.status, GenerationStatus::Rendering);
    assert!(offline.deployment_url.is_none());
    assert!(offline.published_at.is_none());
    assert!(!h.root.join("sites").join("ada.example").exists());
    assert!(h.orchestrator.build_dir(&record.id).join("index.html").is_file());

    assert!(matches!(
        h.orchestrator.undeploy(&record.id),
        Err(PipelineError::NotLive {
            status: GenerationStatus::Rendering,
            ..
        })
    ));
}

#[test]
fn delete_removes_site_build_and_record() {
    let h = harness();
    let record = live_record(&h);
    let build = h.orchestrator.build_dir(&record.id);

    let removed = h.orchestrator.delete(&record.id).unwrap();
    assert_eq!(removed.id, record.id);
    assert!(!h.root.join("sites").join("ada.example").exists());
    assert!(!build.exists());
    assert!(matches!(
        h.orchestrator.get_record(&record.id),
        Err(PipelineError::NotFound { .. })
    ));

    // The domain is free again.
    let again = live_record(&h);
    assert_eq!(again.status, GenerationStatus::Live);
}

#[test]
fn templates_lists_builtins() {
    let h = harness();
    let ids: Vec<_> = h
        .orchestrator
        .templates()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["creative", "professional"]);
}

// ---------------------------------------------------------------------------
// File-backed and async
// ---------------------------------------------------------------------------

#[test]
fn open_at_persists_records_across_instances() {
    let tmp = TempDir::new().unwrap();
    let settings = PipelineSettings::default();
    let id = {
        let orchestrator = Orchestrator::open_at(tmp.path(), &settings).unwrap();
        orchestrator
            .run_generation(&request("ada.example", "professional"), None)
            .unwrap()
            .id
    };

    let reopened = FileStore::open_at(tmp.path()).unwrap();
    let record = reopened.get(&id).unwrap();
    assert_eq!(record.status, GenerationStatus::Live);
    assert!(tmp.path().join("sites").join("ada.example").join("index.html").is_file());
    assert!(tmp.path().join("builds").join(id.to_string()).is_dir());
}

#[tokio::test]
async fn dispatcher_acknowledges_then_completes() {
    let h = harness();
    let dispatcher = Dispatcher::new(Arc::new(h.orchestrator));

    let run = dispatcher
        .start_generation(request("ada.example", "professional"), None)
        .unwrap();
    let id = run.id;

    let duplicate = dispatcher.start_generation(request("ada.example", "creative"), None);
    assert!(matches!(duplicate, Err(PipelineError::DuplicateDomain { .. })));

    let record = run.wait().await.unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.status, GenerationStatus::Live);
    assert_eq!(dispatcher.get_record(&id).unwrap().status, GenerationStatus::Live);

    let again = dispatcher.regenerate(&id, Some("slate")).unwrap();
    let record = again.wait().await.unwrap();
    assert_eq!(record.color_scheme_id, "slate");
    assert_eq!(record.generation_count, 2);
}
