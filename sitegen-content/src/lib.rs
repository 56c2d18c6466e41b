//! # sitegen-content
//!
//! Turns a [`sitegen_core::ProfileInput`] into [`sitegen_core::GeneratedContent`]
//! by asking language-model providers in priority order, parsing and
//! validating their JSON replies, and synthesizing copy locally when every
//! provider fails.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitegen_content::{ContentConfig, ContentGenerator};
//! use sitegen_core::ProfileInput;
//!
//! fn copy_for(profile: &ProfileInput) {
//!     let generator = ContentGenerator::from_config(&ContentConfig::default());
//!     if let Ok(outcome) = generator.generate(profile, None) {
//!         println!("{} via {}", outcome.content.homepage.headline, outcome.source);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod parse;
pub mod prompt;
pub mod providers;

pub use config::{ContentConfig, ProviderConfig, ProviderKind};
pub use error::{ContentError, ParseError, ProviderError};
pub use generator::{ContentGenerator, GenerationOutcome, ProviderFailure};
pub use prompt::{build_prompt, Prompt};
pub use providers::ContentProvider;
