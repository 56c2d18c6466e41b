//! # sitegen-renderer
//!
//! Renders [`sitegen_core::GeneratedContent`] into a self-contained HTML page
//! using site templates: a placeholder skeleton, a base stylesheet and named
//! color palettes. Each render also draws one of four presentation schemes
//! that decide how the page moves.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitegen_core::{GeneratedContent, ProfileInput};
//! use sitegen_renderer::{render, DirTemplateStore, TemplateStore};
//!
//! fn page(content: &GeneratedContent, profile: &ProfileInput) {
//!     let store = DirTemplateStore::builtin_only();
//!     if let Ok(template) = store.load("professional") {
//!         let mut rng = rand::thread_rng();
//!         if let Ok(site) = render(&template, "default", content, profile, &mut rng) {
//!             println!("{} bytes, motion {}", site.html.len(), site.scheme);
//!         }
//!     }
//! }
//! ```

pub mod compiled;
pub mod engine;
pub mod error;
pub mod palette;
pub mod scheme;
pub mod seo;
pub mod template;

pub use compiled::{escape_text, CompiledTemplate, Value, Values, ALLOWED_EMPTY};
pub use engine::{render, render_with_scheme, RenderedSite};
pub use error::RenderError;
pub use palette::{Palette, DEFAULT_SCHEME};
pub use scheme::{PresentationScheme, ANIMATION_TOKENS, SCHEMES};
pub use template::{DirTemplateStore, Template, TemplateMeta, TemplateStore, TemplateSummary};
