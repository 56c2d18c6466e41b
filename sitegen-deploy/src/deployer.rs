//! Materializing a build directory as a served site.
//!
//! ## `deploy` protocol
//!
//! 1. Validate the source directory (exists, contains `index.html`).
//! 2. Copy it to `<sites>/.<domain>.staging`.
//! 3. Write `nginx.conf` and `manifest.json` into staging.
//! 4. Move the current `<sites>/<domain>` aside to `<sites>/.<domain>.previous`.
//! 5. Rename staging to `<sites>/<domain>`; on failure restore the previous copy.
//! 6. Remove the previous copy.
//!
//! Any failure leaves `<sites>/<domain>` absent or exactly as it was.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use sitegen_core::{Domain, RecordId};

use crate::error::{io_err, DeployError};
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::nginx::{render_config, NGINX_FILE};
use crate::writer::{atomic_write, INDEX_FILE};

/// Where sites are served from and how their URLs look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Parent of every serving location (`<root>/sites`).
    pub sites_root: PathBuf,
    /// When set, URLs are `<public_base_url>/<domain>` instead of
    /// `https://<domain>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
}

impl DeployConfig {
    pub fn new(sites_root: impl Into<PathBuf>) -> Self {
        Self {
            sites_root: sites_root.into(),
            public_base_url: None,
        }
    }
}

/// Result of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub url: String,
    pub site_dir: PathBuf,
    pub manifest: Manifest,
}

/// Copies build output into serving locations.
#[derive(Debug, Clone)]
pub struct Deployer {
    config: DeployConfig,
}

impl Deployer {
    pub fn new(config: DeployConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Serving location for `domain`.
    pub fn site_dir(&self, domain: &Domain) -> PathBuf {
        self.config.sites_root.join(domain.as_str())
    }

    /// Public URL for `domain`.
    pub fn url_for(&self, domain: &Domain) -> String {
        match self
            .config
            .public_base_url
            .as_deref()
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
        {
            Some(base) => format!("{base}/{domain}"),
            None => format!("https://{domain}"),
        }
    }

    /// Publish `source_dir` as the site for `domain`.
    pub fn deploy(
        &self,
        record_id: &RecordId,
        domain: &Domain,
        source_dir: &Path,
    ) -> Result<Deployment, DeployError> {
        if !source_dir.is_dir() {
            return Err(DeployError::SourceNotFound {
                path: source_dir.to_path_buf(),
            });
        }
        if !source_dir.join(INDEX_FILE).is_file() {
            return Err(DeployError::MissingIndex {
                path: source_dir.to_path_buf(),
            });
        }

        let sites_root = &self.config.sites_root;
        std::fs::create_dir_all(sites_root).map_err(|e| io_err(sites_root, e))?;

        let target = self.site_dir(domain);
        let staging = sites_root.join(format!(".{domain}.staging"));
        let previous = sites_root.join(format!(".{domain}.previous"));

        remove_if_exists(&staging)?;
        let manifest = match self.stage(record_id, domain, source_dir, &staging, &target) {
            Ok(manifest) => manifest,
            Err(e) => {
                discard(&staging);
                return Err(e);
            }
        };

        swap_into_place(&staging, &target, &previous)?;

        let url = self.url_for(domain);
        tracing::info!(
            domain = %domain,
            record_id = %record_id,
            files = manifest.files.len(),
            url = %url,
            "site deployed"
        );
        Ok(Deployment {
            url,
            site_dir: target,
            manifest,
        })
    }

    fn stage(
        &self,
        record_id: &RecordId,
        domain: &Domain,
        source_dir: &Path,
        staging: &Path,
        target: &Path,
    ) -> Result<Manifest, DeployError> {
        copy_dir(source_dir, staging)?;
        let conf = render_config(domain, record_id, target)?;
        atomic_write(&staging.join(NGINX_FILE), conf.as_bytes())?;
        let manifest = Manifest::scan(staging, domain, record_id, Utc::now())?;
        atomic_write(&staging.join(MANIFEST_FILE), manifest.to_json()?.as_bytes())?;
        Ok(manifest)
    }

    /// Remove the serving location for `domain`. Returns whether anything
    /// was removed.
    pub fn undeploy(&self, domain: &Domain) -> Result<bool, DeployError> {
        let target = self.site_dir(domain);
        let removed = remove_if_exists(&target)?;
        if removed {
            tracing::info!(domain = %domain, "site removed");
        } else {
            tracing::debug!(domain = %domain, "nothing to undeploy");
        }
        Ok(removed)
    }

    /// Manifest of what is currently served for `domain`.
    pub fn current_manifest(&self, domain: &Domain) -> Result<Option<Manifest>, DeployError> {
        Manifest::load(&self.site_dir(domain))
    }
}

// ---------------------------------------------------------------------------
// Filesystem helpers
// ---------------------------------------------------------------------------

fn copy_dir(from: &Path, to: &Path) -> Result<(), DeployError> {
    std::fs::create_dir_all(to).map_err(|e| io_err(to, e))?;
    let entries = std::fs::read_dir(from).map_err(|e| io_err(from, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(from, e))?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_err(&src, e))?;
        if file_type.is_dir() {
            copy_dir(&src, &dst)?;
        } else {
            std::fs::copy(&src, &dst).map_err(|e| io_err(&src, e))?;
            tracing::debug!(file = %dst.display(), "staged");
        }
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<bool, DeployError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Best-effort cleanup on an error path.
fn discard(path: &Path) {
    if let Err(e) = remove_if_exists(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove staging directory");
    }
}

fn swap_into_place(staging: &Path, target: &Path, previous: &Path) -> Result<(), DeployError> {
    let had_previous = target.exists();
    if had_previous {
        if let Err(e) = remove_if_exists(previous) {
            discard(staging);
            return Err(e);
        }
        if let Err(e) = std::fs::rename(target, previous) {
            discard(staging);
            return Err(io_err(target, e));
        }
    }

    if let Err(e) = std::fs::rename(staging, target) {
        if had_previous {
            if let Err(restore) = std::fs::rename(previous, target) {
                tracing::error!(
                    target = %target.display(),
                    error = %restore,
                    "could not restore previous site"
                );
            }
        }
        discard(staging);
        return Err(io_err(target, e));
    }

    if had_previous {
        discard(previous);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
