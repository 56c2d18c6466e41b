//! Record and profile store interfaces, plus an in-memory implementation.
//!
//! Every mutating call is one atomic update keyed by record id; callers never
//! hold a lock across pipeline stages.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::types::{Domain, GenerationRecord, OwnerId, ProfileInput, RecordId};

/// Persistence for [`GenerationRecord`]s.
pub trait RecordStore: Send + Sync {
    /// Insert a new record. Fails with [`StoreError::DuplicateDomain`] when
    /// the domain is already claimed; the existing record is left untouched.
    fn create(&self, record: &GenerationRecord) -> Result<(), StoreError>;

    fn get(&self, id: &RecordId) -> Result<GenerationRecord, StoreError>;

    fn find_by_domain(&self, domain: &Domain) -> Result<Option<GenerationRecord>, StoreError>;

    /// Replace an existing record.
    fn update(&self, record: &GenerationRecord) -> Result<(), StoreError>;

    /// Remove a record and release its domain.
    fn delete(&self, id: &RecordId) -> Result<(), StoreError>;

    /// All records, oldest first.
    fn list(&self) -> Result<Vec<GenerationRecord>, StoreError>;
}

/// Source of client profiles, consulted on regeneration.
pub trait ProfileStore: Send + Sync {
    fn save_profile(&self, owner: &OwnerId, profile: &ProfileInput) -> Result<(), StoreError>;

    fn profile_for(&self, owner: &OwnerId) -> Result<ProfileInput, StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    records: HashMap<RecordId, GenerationRecord>,
    domains: HashMap<Domain, RecordId>,
    profiles: HashMap<OwnerId, ProfileInput>,
}

/// Process-local store. Each call is a single critical section.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut MemoryState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut guard)
    }
}

impl RecordStore for MemoryStore {
    fn create(&self, record: &GenerationRecord) -> Result<(), StoreError> {
        self.with_state(|state| {
            if let Some(existing) = state.domains.get(&record.domain) {
                return Err(StoreError::DuplicateDomain {
                    domain: record.domain.clone(),
                    existing: *existing,
                });
            }
            state.domains.insert(record.domain.clone(), record.id);
            state.records.insert(record.id, record.clone());
            Ok(())
        })
    }

    fn get(&self, id: &RecordId) -> Result<GenerationRecord, StoreError> {
        self.with_state(|state| {
            state
                .records
                .get(id)
                .cloned()
                .ok_or(StoreError::RecordNotFound { id: *id })
        })
    }

    fn find_by_domain(&self, domain: &Domain) -> Result<Option<GenerationRecord>, StoreError> {
        self.with_state(|state| {
            Ok(state
                .domains
                .get(domain)
                .and_then(|id| state.records.get(id))
                .cloned())
        })
    }

    fn update(&self, record: &GenerationRecord) -> Result<(), StoreError> {
        self.with_state(|state| match state.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(StoreError::RecordNotFound { id: record.id }),
        })
    }

    fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        self.with_state(|state| {
            let record = state
                .records
                .remove(id)
                .ok_or(StoreError::RecordNotFound { id: *id })?;
            state.domains.remove(&record.domain);
            Ok(())
        })
    }

    fn list(&self) -> Result<Vec<GenerationRecord>, StoreError> {
        self.with_state(|state| {
            let mut records: Vec<_> = state.records.values().cloned().collect();
            records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(records)
        })
    }
}

impl ProfileStore for MemoryStore {
    fn save_profile(&self, owner: &OwnerId, profile: &ProfileInput) -> Result<(), StoreError> {
        self.with_state(|state| {
            state.profiles.insert(owner.clone(), profile.clone());
            Ok(())
        })
    }

    fn profile_for(&self, owner: &OwnerId) -> Result<ProfileInput, StoreError> {
        self.with_state(|state| {
            state
                .profiles
                .get(owner)
                .cloned()
                .ok_or_else(|| StoreError::ProfileNotFound {
                    owner: owner.clone(),
                })
        })
    }
}
