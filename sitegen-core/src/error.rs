//! Error types for sitegen-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Domain, GenerationStatus, OwnerId, RecordId};

/// All errors that can arise from record and profile store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load; includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A record already claims this domain.
    #[error("domain {domain} already has generation record {existing}")]
    DuplicateDomain { domain: Domain, existing: RecordId },

    #[error("generation record {id} not found")]
    RecordNotFound { id: RecordId },

    #[error("no profile stored for owner {owner}")]
    ProfileNotFound { owner: OwnerId },

    /// `dirs::home_dir()` returned `None`; `~/.sitegen/` cannot be located.
    #[error("cannot determine home directory; set $HOME or pass an explicit root")]
    HomeNotFound,

    /// An in-memory store's lock was poisoned by a panicking writer.
    #[error("record store lock poisoned")]
    Poisoned,
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}

/// A status change the lifecycle does not permit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot move generation record from {from} to {to}")]
    Invalid {
        from: GenerationStatus,
        to: GenerationStatus,
    },

    /// `LIVE` requires content and a deployment URL.
    #[error("cannot mark record live: {0}")]
    LiveInvariant(&'static str),
}

/// Rejected domain names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("domain is empty")]
    Empty,

    #[error("domain '{0}' is longer than 253 characters")]
    TooLong(String),

    #[error("domain '{domain}' has an invalid label '{label}'")]
    InvalidLabel { domain: String, label: String },
}

/// Rejected profile input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("profile field '{0}' must not be blank")]
    BlankField(&'static str),
}

/// A content payload missing one or more required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generated content is incomplete; missing: {}", missing.join(", "))]
pub struct IncompleteContent {
    pub missing: Vec<String>,
}
