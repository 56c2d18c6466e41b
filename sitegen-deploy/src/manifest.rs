//! `manifest.json`: what is being served, with per-file SHA-256 digests.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use sitegen_core::{Domain, RecordId};

use crate::error::{io_err, DeployError};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub domain: Domain,
    pub record_id: RecordId,
    pub deployed_at: DateTime<Utc>,
    pub files: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Relative to the site root, `/`-separated.
    pub path: String,
    pub size: u64,
    pub sha256: String,
}

impl Manifest {
    /// Describe every file under `dir` except the manifest itself, sorted by
    /// path.
    pub fn scan(
        dir: &Path,
        domain: &Domain,
        record_id: &RecordId,
        deployed_at: DateTime<Utc>,
    ) -> Result<Self, DeployError> {
        let mut files = Vec::new();
        collect(dir, dir, &mut files)?;
        files.retain(|f: &ManifestEntry| f.path != MANIFEST_FILE);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self {
            domain: domain.clone(),
            record_id: *record_id,
            deployed_at,
            files,
        })
    }

    /// Read `manifest.json` from a serving location, if present.
    pub fn load(dir: &Path) -> Result<Option<Self>, DeployError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    pub fn to_json(&self) -> Result<String, DeployError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<ManifestEntry>) -> Result<(), DeployError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect(root, &path, out)?;
        } else if meta.is_file() {
            let rel = path.strip_prefix(root).unwrap_or(path.as_path());
            out.push(ManifestEntry {
                path: rel.to_string_lossy().replace('\\', "/"),
                size: meta.len(),
                sha256: file_digest(&path)?,
            });
        }
    }
    Ok(())
}

/// SHA-256 hex digest of a file's contents.
pub fn file_digest(path: &Path) -> Result<String, DeployError> {
    let mut file = std::fs::File::open(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| io_err(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}
