//! Error types for sitegen-deploy.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while materializing or serving a site.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The build directory to deploy from does not exist.
    #[error("source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The build directory has no `index.html`.
    #[error("source directory {path} has no index.html")]
    MissingIndex { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reverse-proxy config rendering failed.
    #[error("proxy config template error: {0}")]
    Template(#[from] tera::Error),

    /// Manifest serialization failed.
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`DeployError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeployError {
    DeployError::Io {
        path: path.into(),
        source,
    }
}
