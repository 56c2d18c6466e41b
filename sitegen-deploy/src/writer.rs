//! Atomic file writes and the durable build location.
//!
//! Every file is written to `<path>.sitegen.tmp` and renamed into place, so
//! a reader never observes a half-written page.

use std::path::{Path, PathBuf};

use crate::error::{io_err, DeployError};

pub const INDEX_FILE: &str = "index.html";
pub const STYLES_FILE: &str = "styles.css";

/// Write `content` to `path` via a sibling temp file and rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), DeployError> {
    let tmp = PathBuf::from(format!("{}.sitegen.tmp", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> Result<(), DeployError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Write a rendered page into `build_dir` (`index.html` + `styles.css`).
///
/// Returns the written paths. Line endings are normalised to LF.
pub fn write_build(build_dir: &Path, html: &str, css: &str) -> Result<Vec<PathBuf>, DeployError> {
    std::fs::create_dir_all(build_dir).map_err(|e| io_err(build_dir, e))?;
    let mut written = Vec::with_capacity(2);
    for (name, content) in [(INDEX_FILE, html), (STYLES_FILE, css)] {
        let path = build_dir.join(name);
        atomic_write(&path, content.replace("\r\n", "\n").as_bytes())?;
        tracing::debug!(path = %path.display(), "build file written");
        written.push(path);
    }
    Ok(written)
}

/// Remove a build directory. A missing directory is not an error.
pub fn remove_build(build_dir: &Path) -> Result<bool, DeployError> {
    match std::fs::remove_dir_all(build_dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(build_dir, e)),
    }
}
