//! Executes the consequences of a confirmed delete gesture.
//!
//! The row leaves the screen first (the app animates it out over
//! [`EXIT_ANIM`]), then the dispatcher deletes the record and reloads the
//! collection from authoritative storage. The reload happens whether or
//! not the delete succeeded, so a failed delete brings the row back
//! instead of leaving the view out of sync with the backend.

use std::sync::Arc;
use std::time::Duration;

use api_types::CollectionKind;
use api_types::entry::Entry;
use storage::{Storage, StorageError};
use uuid::Uuid;

/// How long a confirmed row slides out before the delete is issued.
pub const EXIT_ANIM: Duration = Duration::from_millis(250);

/// Result of a delete-and-reload cycle.
#[derive(Debug)]
pub struct DeleteReport {
    /// Error from the delete itself, if any.
    pub delete_error: Option<StorageError>,
    /// Fresh authoritative listing, or the error that prevented it.
    pub reload: Result<Vec<Entry>, StorageError>,
}

pub struct Dispatcher {
    store: Arc<dyn Storage>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    pub async fn delete_and_reload(&self, kind: CollectionKind, id: Uuid) -> DeleteReport {
        let delete_error = match self.store.delete_entry(kind, id).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(kind = kind.as_str(), %id, %err, "delete failed");
                Some(err)
            }
        };
        let reload = self.store.list_entries(kind).await;
        if let Err(err) = &reload {
            tracing::warn!(kind = kind.as_str(), %err, "reload after delete failed");
        }
        DeleteReport {
            delete_error,
            reload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::entry::{EntryPatch, NewEntry};
    use async_trait::async_trait;
    use storage::MemoryStore;

    fn new_entry(description: &str) -> NewEntry {
        NewEntry {
            description: description.to_string(),
            worth_it: true,
            cost_minor: Some(999),
        }
    }

    #[tokio::test]
    async fn delete_removes_entry_and_reload_reflects_it() {
        let store = Arc::new(MemoryStore::new());
        let added = store
            .add_entry(CollectionKind::Finance, new_entry("impulse buy"))
            .await
            .unwrap();

        let dispatcher = Dispatcher::new(store);
        let report = dispatcher
            .delete_and_reload(CollectionKind::Finance, added.id)
            .await;

        assert!(report.delete_error.is_none());
        assert!(report.reload.unwrap().is_empty());
    }

    /// Store whose deletes always fail but whose listings work, to model a
    /// backend that rejects the request.
    struct RejectingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl Storage for RejectingStore {
        async fn add_entry(
            &self,
            kind: CollectionKind,
            data: NewEntry,
        ) -> Result<Entry, StorageError> {
            self.inner.add_entry(kind, data).await
        }

        async fn delete_entry(&self, _: CollectionKind, _: Uuid) -> Result<(), StorageError> {
            Err(StorageError::Backend("delete rejected".to_string()))
        }

        async fn list_entries(&self, kind: CollectionKind) -> Result<Vec<Entry>, StorageError> {
            self.inner.list_entries(kind).await
        }

        async fn update_entry(
            &self,
            kind: CollectionKind,
            id: Uuid,
            patch: EntryPatch,
        ) -> Result<Entry, StorageError> {
            self.inner.update_entry(kind, id, patch).await
        }
    }

    #[tokio::test]
    async fn failed_delete_still_reloads_and_entry_survives() {
        let store = Arc::new(RejectingStore {
            inner: MemoryStore::new(),
        });
        let added = store
            .add_entry(CollectionKind::Media, new_entry("long film"))
            .await
            .unwrap();

        let dispatcher = Dispatcher::new(store);
        let report = dispatcher
            .delete_and_reload(CollectionKind::Media, added.id)
            .await;

        assert!(report.delete_error.is_some());
        let entries = report.reload.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, added.id);
    }
}
