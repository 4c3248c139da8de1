use std::collections::HashMap;
use std::sync::Mutex;

use api_types::CollectionKind;
use api_types::entry::{Entry, EntryPatch, NewEntry};
use async_trait::async_trait;
use uuid::Uuid;

use crate::{Result, Storage, StorageError, materialize};

/// In-memory backend. Used as a test double and as the throwaway
/// `backend = "memory"` configuration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<CollectionKind, Vec<Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<T>(&self, f: impl FnOnce(&mut HashMap<CollectionKind, Vec<Entry>>) -> T) -> T {
        let mut guard = match self.collections.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn add_entry(&self, kind: CollectionKind, data: NewEntry) -> Result<Entry> {
        if data.description.trim().is_empty() {
            return Err(StorageError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        let entry = materialize(data);
        self.with_collections(|collections| {
            collections.entry(kind).or_default().push(entry.clone());
        });
        Ok(entry)
    }

    async fn delete_entry(&self, kind: CollectionKind, id: Uuid) -> Result<()> {
        self.with_collections(|collections| {
            let entries = collections.entry(kind).or_default();
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                Err(StorageError::NotFound)
            } else {
                Ok(())
            }
        })
    }

    async fn list_entries(&self, kind: CollectionKind) -> Result<Vec<Entry>> {
        Ok(self.with_collections(|collections| collections.entry(kind).or_default().clone()))
    }

    async fn update_entry(
        &self,
        kind: CollectionKind,
        id: Uuid,
        patch: EntryPatch,
    ) -> Result<Entry> {
        self.with_collections(|collections| {
            let entry = collections
                .entry(kind)
                .or_default()
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or(StorageError::NotFound)?;
            if let Some(worth_it) = patch.worth_it {
                entry.worth_it = worth_it;
            }
            Ok(entry.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crud_cycle() {
        let store = MemoryStore::new();
        let added = store
            .add_entry(
                CollectionKind::Finance,
                NewEntry {
                    description: "lunch".to_string(),
                    worth_it: false,
                    cost_minor: Some(1250),
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_entry(
                CollectionKind::Finance,
                added.id,
                EntryPatch {
                    worth_it: Some(true),
                },
            )
            .await
            .unwrap();
        assert!(updated.worth_it);

        store
            .delete_entry(CollectionKind::Finance, added.id)
            .await
            .unwrap();
        assert!(
            store
                .list_entries(CollectionKind::Finance)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn update_missing_entry_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_entry(CollectionKind::Media, Uuid::new_v4(), EntryPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
