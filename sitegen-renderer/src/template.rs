//! Templates and the store that loads them.
//!
//! A template is three files:
//!
//! | File            | Contents                                    |
//! |-----------------|---------------------------------------------|
//! | `template.html` | HTML skeleton with `{{placeholders}}`       |
//! | `styles.css`    | base stylesheet                             |
//! | `template.yaml` | name, description, named color schemes      |
//!
//! Built-in templates are baked into the binary. A directory
//! `<templates>/<id>/` with the same three files overrides (or adds to) them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compiled::CompiledTemplate;
use crate::error::{io_err, RenderError};
use crate::palette::{Palette, DEFAULT_SCHEME};

// ---------------------------------------------------------------------------
// Embedded templates
// ---------------------------------------------------------------------------

struct Builtin {
    id: &'static str,
    html: &'static str,
    css: &'static str,
    meta: &'static str,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        id: "professional",
        html: include_str!("templates/professional/template.html"),
        css: include_str!("templates/professional/styles.css"),
        meta: include_str!("templates/professional/template.yaml"),
    },
    Builtin {
        id: "creative",
        html: include_str!("templates/creative/template.html"),
        css: include_str!("templates/creative/styles.css"),
        meta: include_str!("templates/creative/template.yaml"),
    },
];

const HTML_FILE: &str = "template.html";
const CSS_FILE: &str = "styles.css";
const META_FILE: &str = "template.yaml";

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Contents of `template.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color_schemes: BTreeMap<String, Palette>,
}

/// A loaded, compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: String,
    pub meta: TemplateMeta,
    pub html_skeleton: CompiledTemplate,
    pub css_base: String,
}

impl Template {
    /// Compile a template from its three parts.
    pub fn from_parts(
        id: &str,
        html: &str,
        css: &str,
        meta: TemplateMeta,
    ) -> Result<Self, RenderError> {
        let html_skeleton =
            CompiledTemplate::compile(html).map_err(|message| RenderError::Syntax {
                id: id.to_string(),
                message,
            })?;
        Ok(Self {
            id: id.to_string(),
            meta,
            html_skeleton,
            css_base: css.to_string(),
        })
    }

    /// Resolve a color scheme: the named one, else `default`, else the
    /// built-in neutral palette. Returns the name actually used.
    pub fn palette(&self, scheme_id: &str) -> (&str, Palette) {
        if let Some((name, palette)) = self.meta.color_schemes.get_key_value(scheme_id) {
            return (name.as_str(), palette.clone());
        }
        if let Some((name, palette)) = self.meta.color_schemes.get_key_value(DEFAULT_SCHEME) {
            tracing::debug!(template = %self.id, scheme = %scheme_id, "unknown color scheme; using default");
            return (name.as_str(), palette.clone());
        }
        tracing::debug!(template = %self.id, scheme = %scheme_id, "no default color scheme; using neutral palette");
        ("neutral", Palette::neutral())
    }

    pub fn summary(&self, builtin: bool) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            color_schemes: self.meta.color_schemes.keys().cloned().collect(),
            builtin,
        }
    }
}

/// Listing entry returned by [`TemplateStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color_schemes: Vec<String>,
    /// False when a user directory supplied this template.
    pub builtin: bool,
}

// ---------------------------------------------------------------------------
// TemplateStore
// ---------------------------------------------------------------------------

/// Source of templates. Loaded fresh on every call.
pub trait TemplateStore: Send + Sync {
    /// Load and compile template `id`. Unknown ids yield
    /// [`RenderError::TemplateNotFound`].
    fn load(&self, id: &str) -> Result<Template, RenderError>;

    /// Every available template, sorted by id.
    fn list(&self) -> Result<Vec<TemplateSummary>, RenderError>;
}

/// Built-in templates with optional user-directory overrides.
#[derive(Debug, Clone, Default)]
pub struct DirTemplateStore {
    user_dir: Option<PathBuf>,
}

impl DirTemplateStore {
    /// Built-ins plus overrides from `user_dir`, which need not exist.
    pub fn new(user_dir: Option<&Path>) -> Self {
        Self {
            user_dir: user_dir.map(Path::to_path_buf),
        }
    }

    pub fn builtin_only() -> Self {
        Self::default()
    }

    fn user_template_dir(&self, id: &str) -> Option<PathBuf> {
        if !is_valid_id(id) {
            return None;
        }
        let dir = self.user_dir.as_ref()?.join(id);
        dir.is_dir().then_some(dir)
    }

    fn load_builtin(id: &str) -> Option<Result<Template, RenderError>> {
        let builtin = BUILTINS.iter().find(|b| b.id == id)?;
        Some(
            serde_yaml::from_str::<TemplateMeta>(builtin.meta)
                .map_err(|source| RenderError::Metadata {
                    path: PathBuf::from(format!("<builtin>/{id}/{META_FILE}")),
                    source,
                })
                .and_then(|meta| Template::from_parts(id, builtin.html, builtin.css, meta)),
        )
    }

    fn user_ids(&self) -> Result<Vec<String>, RenderError> {
        let Some(dir) = self.user_dir.as_ref().filter(|d| d.exists()) else {
            return Ok(vec![]);
        };
        let mut ids = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_err(dir, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(id) = path.file_name().and_then(|n| n.to_str()) {
                if is_valid_id(id) {
                    ids.push(id.to_string());
                }
            }
        }
        Ok(ids)
    }
}

fn load_user_template(id: &str, dir: &Path) -> Result<Template, RenderError> {
    let read = |file: &'static str| -> Result<String, RenderError> {
        let path = dir.join(file);
        if !path.is_file() {
            return Err(RenderError::MissingFile {
                id: id.to_string(),
                file,
            });
        }
        std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))
    };
    let html = read(HTML_FILE)?;
    let css = read(CSS_FILE)?;
    let meta_path = dir.join(META_FILE);
    let meta: TemplateMeta = serde_yaml::from_str(&read(META_FILE)?).map_err(|source| {
        RenderError::Metadata {
            path: meta_path,
            source,
        }
    })?;
    Template::from_parts(id, &html, &css, meta)
}

impl TemplateStore for DirTemplateStore {
    fn load(&self, id: &str) -> Result<Template, RenderError> {
        if let Some(dir) = self.user_template_dir(id) {
            tracing::debug!(template = %id, dir = %dir.display(), "loading user template");
            return load_user_template(id, &dir);
        }
        Self::load_builtin(id).unwrap_or_else(|| {
            Err(RenderError::TemplateNotFound { id: id.to_string() })
        })
    }

    fn list(&self) -> Result<Vec<TemplateSummary>, RenderError> {
        let mut by_id = BTreeMap::new();
        for builtin in BUILTINS {
            let template = self.load(builtin.id)?;
            let is_builtin = self.user_template_dir(builtin.id).is_none();
            by_id.insert(builtin.id.to_string(), template.summary(is_builtin));
        }
        for id in self.user_ids()? {
            if !by_id.contains_key(&id) {
                let template = self.load(&id)?;
                by_id.insert(id, template.summary(false));
            }
        }
        Ok(by_id.into_values().collect())
    }
}

/// Template ids double as directory names.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
