//! Pluggable persistence for worthlog entries.
//!
//! Every backend implements the same four-operation [`Storage`] contract;
//! which one the app talks to is a configuration decision, and the
//! [`FallbackStore`] chain lets an unreachable primary fall through to a
//! local secondary.

mod error;
mod fallback;
mod local;
mod memory;
mod rest;

use api_types::CollectionKind;
use api_types::entry::{Entry, EntryPatch, NewEntry};
use async_trait::async_trait;
use uuid::Uuid;

pub use error::StorageError;
pub use fallback::FallbackStore;
pub use local::JsonStore;
pub use memory::MemoryStore;
pub use rest::RestStore;

pub type Result<T> = std::result::Result<T, StorageError>;

/// The storage contract consumed by the UI.
///
/// Backends own the entries; callers only ever hold disposable copies for
/// rendering, and re-list after any mutation rather than patching local
/// caches.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn add_entry(&self, kind: CollectionKind, data: NewEntry) -> Result<Entry>;

    async fn delete_entry(&self, kind: CollectionKind, id: Uuid) -> Result<()>;

    async fn list_entries(&self, kind: CollectionKind) -> Result<Vec<Entry>>;

    async fn update_entry(&self, kind: CollectionKind, id: Uuid, patch: EntryPatch)
    -> Result<Entry>;
}

/// Builds an [`Entry`] from a creation request. Shared by the local and
/// in-memory backends; the REST backend receives the entry from the server.
pub(crate) fn materialize(data: NewEntry) -> Entry {
    Entry {
        id: Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        description: data.description,
        worth_it: data.worth_it,
        cost_minor: data.cost_minor,
    }
}
