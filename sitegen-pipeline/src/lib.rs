//! sitegen pipeline: the generation state machine tying content, rendering
//! and deployment together.
//!
//! - [`orchestrator`]: [`Orchestrator`], synchronous runs, regeneration,
//!   undeploy and deletion
//! - [`dispatch`]: [`Dispatcher`], the Tokio front end that acknowledges a
//!   request before the stages run
//! - [`notify`]: [`Notifier`] hooks fired on `LIVE` / `ERROR`
//! - [`settings`]: [`PipelineSettings`]
//!
//! ```no_run
//! use std::path::Path;
//! use sitegen_core::{Domain, GenerationRequest, ProfileInput};
//! use sitegen_pipeline::{Orchestrator, PipelineSettings};
//!
//! let orchestrator = Orchestrator::open_at(Path::new("/srv/sitegen"), &PipelineSettings::default())?;
//! let record = orchestrator.run_generation(
//!     &GenerationRequest {
//!         owner_id: "owner-1".into(),
//!         domain: Domain::parse("ada.example")?,
//!         profile: ProfileInput {
//!             name: "Ada Lane".into(),
//!             profession: "Photographer".into(),
//!             ..ProfileInput::default()
//!         },
//!         template_id: "professional".into(),
//!         color_scheme_id: "default".into(),
//!     },
//!     None,
//! )?;
//! println!("{} {:?}", record.status, record.deployment_url);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dispatch;
pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod settings;

pub use dispatch::{Dispatcher, PendingRun};
pub use error::PipelineError;
pub use notify::{ErrorEvent, LiveEvent, Notifier, TracingNotifier, WebhookNotifier};
pub use orchestrator::Orchestrator;
pub use settings::{DeploySettings, NotifySettings, PipelineSettings};
