//! Error types for sitegen-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or rendering a site template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No user or built-in template has this id.
    #[error("template not found: {id}")]
    TemplateNotFound { id: String },

    /// A user template directory lacks one of its required files.
    #[error("template '{id}' is missing {file}")]
    MissingFile { id: String, file: &'static str },

    /// `template.yaml` could not be parsed.
    #[error("invalid template metadata at {path}: {source}")]
    Metadata {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The HTML skeleton has malformed placeholder syntax.
    #[error("template '{id}' syntax error: {message}")]
    Syntax { id: String, message: String },

    /// Placeholders that had no value and are not allowed to be empty.
    #[error("no value for placeholder(s): {}", tokens.join(", "))]
    SubstitutionIncomplete { tokens: Vec<String> },

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
