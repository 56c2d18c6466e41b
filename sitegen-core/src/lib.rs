//! sitegen core library: domain types, lifecycle state machine, record
//! stores, errors.
//!
//! - [`types`]: records, profiles, generated content, status machine
//! - [`profession`]: profession keyword matching (tone, stock imagery)
//! - [`store`]: [`RecordStore`] / [`ProfileStore`] traits and [`MemoryStore`]
//! - [`file_store`]: YAML-per-record [`FileStore`]
//! - [`paths`]: on-disk layout
//! - [`error`]: [`StoreError`] and friends

pub mod error;
pub mod file_store;
pub mod paths;
pub mod profession;
pub mod store;
pub mod types;

pub use error::{DomainError, IncompleteContent, ProfileError, StoreError, TransitionError};
pub use file_store::FileStore;
pub use profession::ProfessionCategory;
pub use store::{MemoryStore, ProfileStore, RecordStore};
pub use types::{
    AboutSection, ContactSection, ContentSource, Domain, GeneratedContent, GenerationRecord,
    GenerationRequest, GenerationStatus, HomepageSection, OwnerId, ProfileInput, RecordId,
    SeoSection, ServiceItem, ServicesSection,
};
