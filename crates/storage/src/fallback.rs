use api_types::CollectionKind;
use api_types::entry::{Entry, EntryPatch, NewEntry};
use async_trait::async_trait;
use uuid::Uuid;

use crate::{Result, Storage, StorageError};

/// Ordered chain of backends tried in sequence.
///
/// Only unavailable-class failures fall through to the next backend; a
/// `NotFound` or `Validation` answer from a reachable backend is the
/// authoritative answer and propagates immediately. The last backend's
/// error propagates whatever its class.
pub struct FallbackStore {
    backends: Vec<Box<dyn Storage>>,
}

impl FallbackStore {
    pub fn new(backends: Vec<Box<dyn Storage>>) -> Self {
        Self { backends }
    }

    fn is_last(&self, index: usize) -> bool {
        index + 1 == self.backends.len()
    }
}

#[async_trait]
impl Storage for FallbackStore {
    async fn add_entry(&self, kind: CollectionKind, data: NewEntry) -> Result<Entry> {
        let mut last_err = no_backends();
        for (index, backend) in self.backends.iter().enumerate() {
            match backend.add_entry(kind, data.clone()).await {
                Ok(entry) => return Ok(entry),
                Err(err) if err.is_unavailable() && !self.is_last(index) => {
                    tracing::warn!(%err, backend = index, "add_entry failed, falling back");
                    last_err = err;
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }

    async fn delete_entry(&self, kind: CollectionKind, id: Uuid) -> Result<()> {
        let mut last_err = no_backends();
        for (index, backend) in self.backends.iter().enumerate() {
            match backend.delete_entry(kind, id).await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_unavailable() && !self.is_last(index) => {
                    tracing::warn!(%err, backend = index, "delete_entry failed, falling back");
                    last_err = err;
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }

    async fn list_entries(&self, kind: CollectionKind) -> Result<Vec<Entry>> {
        let mut last_err = no_backends();
        for (index, backend) in self.backends.iter().enumerate() {
            match backend.list_entries(kind).await {
                Ok(entries) => return Ok(entries),
                Err(err) if err.is_unavailable() && !self.is_last(index) => {
                    tracing::warn!(%err, backend = index, "list_entries failed, falling back");
                    last_err = err;
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }

    async fn update_entry(
        &self,
        kind: CollectionKind,
        id: Uuid,
        patch: EntryPatch,
    ) -> Result<Entry> {
        let mut last_err = no_backends();
        for (index, backend) in self.backends.iter().enumerate() {
            match backend.update_entry(kind, id, patch).await {
                Ok(entry) => return Ok(entry),
                Err(err) if err.is_unavailable() && !self.is_last(index) => {
                    tracing::warn!(%err, backend = index, "update_entry failed, falling back");
                    last_err = err;
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }
}

fn no_backends() -> StorageError {
    StorageError::Backend("no storage backends configured".to_string())
}
