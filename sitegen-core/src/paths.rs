//! On-disk layout.
//!
//! ```text
//! <root>/
//!   config.yaml
//!   records/<record_id>.yaml    (mode 0600)
//!   domains/<domain>            (claim marker holding the record id)
//!   profiles/<owner_key>.yaml
//!   builds/<record_id>/         (durable render output)
//!   sites/<domain>/             (serving locations)
//!   templates/<template_id>/    (user templates)
//! ```
//!
//! Every helper takes the root explicitly; only [`default_root`] consults the
//! environment.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::types::{Domain, RecordId};

pub const CONFIG_FILE: &str = "config.yaml";

/// `~/.sitegen`
pub fn default_root() -> Result<PathBuf, StoreError> {
    dirs::home_dir()
        .map(|home| home.join(".sitegen"))
        .ok_or(StoreError::HomeNotFound)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn records_dir(root: &Path) -> PathBuf {
    root.join("records")
}

pub fn record_path(root: &Path, id: &RecordId) -> PathBuf {
    records_dir(root).join(format!("{id}.yaml"))
}

pub fn domains_dir(root: &Path) -> PathBuf {
    root.join("domains")
}

pub fn domain_claim_path(root: &Path, domain: &Domain) -> PathBuf {
    domains_dir(root).join(domain.as_str())
}

pub fn profiles_dir(root: &Path) -> PathBuf {
    root.join("profiles")
}

pub fn builds_dir(root: &Path) -> PathBuf {
    root.join("builds")
}

pub fn build_dir(root: &Path, id: &RecordId) -> PathBuf {
    builds_dir(root).join(id.to_string())
}

pub fn sites_dir(root: &Path) -> PathBuf {
    root.join("sites")
}

pub fn templates_dir(root: &Path) -> PathBuf {
    root.join("templates")
}
