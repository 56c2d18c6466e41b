//! File-backed record and profile store.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   records/<record_id>.yaml   (mode 0600)
//!   domains/<domain>           (claim marker, content = record id)
//!   profiles/<owner_key>.yaml  (mode 0600)
//! ```
//!
//! `<owner_key>` is the owner id with ASCII letters, digits and `-` kept and
//! every other byte written as `_` plus two hex digits (`ada@x.io` becomes
//! `ada_40x_2eio`). The empty id maps to `_`. Any owner id is accepted and no
//! two ids share a file.
//!
//! Domain uniqueness rests on `create_new` of the claim marker, so two
//! processes racing for the same domain cannot both win. Record writes go
//! through a `.yaml.tmp` sibling and `rename`, so a crash mid-write leaves the
//! previous version intact.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{io_err, StoreError};
use crate::paths;
use crate::store::{ProfileStore, RecordStore};
use crate::types::{Domain, GenerationRecord, OwnerId, ProfileInput, RecordId};

/// YAML-per-record store rooted at an explicit directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and lazily create) a store under `root`.
    pub fn open_at(root: &Path) -> Result<Self, StoreError> {
        for dir in [
            paths::records_dir(root),
            paths::domains_dir(root),
            paths::profiles_dir(root),
        ] {
            ensure_dir(&dir)?;
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Open the store under `~/.sitegen`.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open_at(&paths::default_root()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn profile_path(&self, owner: &OwnerId) -> PathBuf {
        paths::profiles_dir(&self.root).join(format!("{}.yaml", owner_key(owner)))
    }

    fn read_claim(&self, domain: &Domain) -> Result<Option<RecordId>, StoreError> {
        let path = paths::domain_claim_path(&self.root, domain);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.trim().parse().ok()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(path, err)),
        }
    }
}

impl RecordStore for FileStore {
    fn create(&self, record: &GenerationRecord) -> Result<(), StoreError> {
        let claim = paths::domain_claim_path(&self.root, &record.domain);
        match OpenOptions::new().write(true).create_new(true).open(&claim) {
            Ok(mut file) => {
                file.write_all(record.id.to_string().as_bytes())
                    .map_err(|e| io_err(&claim, e))?;
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                let existing = self.read_claim(&record.domain)?.unwrap_or_default();
                return Err(StoreError::DuplicateDomain {
                    domain: record.domain.clone(),
                    existing,
                });
            }
            Err(err) => return Err(io_err(claim, err)),
        }

        let path = paths::record_path(&self.root, &record.id);
        if let Err(err) = write_yaml_atomic(&path, record) {
            // Release the claim so the domain is not stranded.
            let _ = fs::remove_file(&claim);
            return Err(err);
        }
        tracing::debug!(record_id = %record.id, domain = %record.domain, "record created");
        Ok(())
    }

    fn get(&self, id: &RecordId) -> Result<GenerationRecord, StoreError> {
        let path = paths::record_path(&self.root, id);
        if !path.exists() {
            return Err(StoreError::RecordNotFound { id: *id });
        }
        read_yaml(&path)
    }

    fn find_by_domain(&self, domain: &Domain) -> Result<Option<GenerationRecord>, StoreError> {
        match self.read_claim(domain)? {
            Some(id) => match self.get(&id) {
                Ok(record) => Ok(Some(record)),
                Err(StoreError::RecordNotFound { .. }) => Ok(None),
                Err(err) => Err(err),
            },
            None => Ok(None),
        }
    }

    fn update(&self, record: &GenerationRecord) -> Result<(), StoreError> {
        let path = paths::record_path(&self.root, &record.id);
        if !path.exists() {
            return Err(StoreError::RecordNotFound { id: record.id });
        }
        write_yaml_atomic(&path, record)
    }

    fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        let record = self.get(id)?;
        let path = paths::record_path(&self.root, id);
        fs::remove_file(&path).map_err(|e| io_err(&path, e))?;

        let claim = paths::domain_claim_path(&self.root, &record.domain);
        // Only release the claim if it still points at this record.
        if self.read_claim(&record.domain)? == Some(*id) {
            fs::remove_file(&claim).map_err(|e| io_err(&claim, e))?;
        }
        tracing::debug!(record_id = %id, domain = %record.domain, "record deleted");
        Ok(())
    }

    fn list(&self) -> Result<Vec<GenerationRecord>, StoreError> {
        let dir = paths::records_dir(&self.root);
        let entries = fs::read_dir(&dir).map_err(|e| io_err(&dir, e))?;
        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("yaml") {
                continue;
            }
            records.push(read_yaml::<GenerationRecord>(&path)?);
        }
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }
}

impl ProfileStore for FileStore {
    fn save_profile(&self, owner: &OwnerId, profile: &ProfileInput) -> Result<(), StoreError> {
        let path = self.profile_path(owner);
        write_yaml_atomic(&path, profile)
    }

    fn profile_for(&self, owner: &OwnerId) -> Result<ProfileInput, StoreError> {
        let path = self.profile_path(owner);
        if !path.exists() {
            return Err(StoreError::ProfileNotFound {
                owner: owner.clone(),
            });
        }
        read_yaml(&path)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// File-name-safe, reversible form of an owner id.
fn owner_key(owner: &OwnerId) -> String {
    let raw = owner.0.as_bytes();
    if raw.is_empty() {
        return "_".to_string();
    }
    let mut key = String::with_capacity(raw.len());
    for &byte in raw {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            key.push(char::from(byte));
        } else {
            key.push('_');
            key.push_str(&hex::encode([byte]));
        }
    }
    key
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// serialize → `<name>.tmp` sibling → `chmod 0600` → `rename`.
fn write_yaml_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let yaml = serde_yaml::to_string(value)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(path, err));
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        set_dir_permissions(dir)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700)).map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationRequest, GenerationStatus};
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(domain: &str) -> GenerationRecord {
        let request = GenerationRequest {
            owner_id: OwnerId::from("owner"),
            domain: Domain::parse(domain).unwrap(),
            profile: ProfileInput::default(),
            template_id: "professional".into(),
            color_scheme_id: "default".into(),
        };
        GenerationRecord::new(&request, Utc::now())
    }

    #[test]
    fn create_writes_record_and_claim() {
        let root = TempDir::new().expect("tempdir");
        let store = FileStore::open_at(root.path()).unwrap();
        let r = record("ada-lane.com");
        store.create(&r).unwrap();

        assert!(paths::record_path(root.path(), &r.id).exists());
        let claim = fs::read_to_string(paths::domain_claim_path(root.path(), &r.domain)).unwrap();
        assert_eq!(claim, r.id.to_string());
        assert_eq!(store.get(&r.id).unwrap(), r);
    }

    #[test]
    fn update_cleans_up_tmp() {
        let root = TempDir::new().expect("tempdir");
        let store = FileStore::open_at(root.path()).unwrap();
        let mut r = record("ada-lane.com");
        store.create(&r).unwrap();
        r.status = GenerationStatus::GeneratingContent;
        store.update(&r).unwrap();

        let path = paths::record_path(root.path(), &r.id);
        let tmp = path.with_file_name(format!("{}.yaml.tmp", r.id));
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
        assert_eq!(store.get(&r.id).unwrap().status, GenerationStatus::GeneratingContent);
    }

    #[test]
    #[cfg(unix)]
    fn record_files_are_private() {
        use std::os::unix::fs::PermissionsExt;
        let root = TempDir::new().expect("tempdir");
        let store = FileStore::open_at(root.path()).unwrap();
        let r = record("ada-lane.com");
        store.create(&r).unwrap();
        let mode = fs::metadata(paths::record_path(root.path(), &r.id))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn list_is_sorted_by_creation() {
        let root = TempDir::new().expect("tempdir");
        let store = FileStore::open_at(root.path()).unwrap();
        let a = record("a.com");
        let mut b = record("b.com");
        b.created_at = a.created_at + chrono::Duration::seconds(5);
        store.create(&b).unwrap();
        store.create(&a).unwrap();
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[rstest::rstest]
    #[case("owner-ada", "owner-ada")]
    #[case("ada@example.com", "ada_40example_2ecom")]
    #[case("../escape", "_2e_2e_2fescape")]
    #[case("a_b", "a_5fb")]
    #[case("", "_")]
    fn owner_key_is_file_safe(#[case] owner: &str, #[case] expected: &str) {
        assert_eq!(owner_key(&OwnerId::from(owner)), expected);
    }

    #[test]
    fn any_owner_id_round_trips_its_profile() {
        let root = TempDir::new().expect("tempdir");
        let store = FileStore::open_at(root.path()).unwrap();
        let profile = ProfileInput {
            name: "Ada Lane".into(),
            ..ProfileInput::default()
        };
        for owner in ["ada@example.com", "../escape", "a_b", "a_5fb"] {
            store.save_profile(&OwnerId::from(owner), &profile).unwrap();
        }
        assert_eq!(
            store.profile_for(&OwnerId::from("ada@example.com")).unwrap(),
            profile
        );
        assert!(paths::profiles_dir(root.path())
            .join("_2e_2e_2fescape.yaml")
            .is_file());
        assert!(!root.path().join("escape.yaml").exists());
        // "a_b" and "a_5fb" must not share a file.
        let files = fs::read_dir(paths::profiles_dir(root.path())).unwrap().count();
        assert_eq!(files, 4);
    }
}
