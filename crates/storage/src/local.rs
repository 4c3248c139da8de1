use std::path::{Path, PathBuf};

use api_types::CollectionKind;
use api_types::entry::{Entry, EntryPatch, NewEntry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{Result, Storage, StorageError, materialize};

/// On-disk document holding both collections.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    finance: Vec<Entry>,
    #[serde(default)]
    media: Vec<Entry>,
}

impl Document {
    fn collection(&self, kind: CollectionKind) -> &Vec<Entry> {
        match kind {
            CollectionKind::Finance => &self.finance,
            CollectionKind::Media => &self.media,
        }
    }

    fn collection_mut(&mut self, kind: CollectionKind) -> &mut Vec<Entry> {
        match kind {
            CollectionKind::Finance => &mut self.finance,
            CollectionKind::Media => &mut self.media,
        }
    }
}

/// File-backed store: one pretty-printed JSON document, reloaded and
/// rewritten around every mutation. A missing file reads as empty
/// collections so first launch needs no setup step.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    // Serializes read-modify-write cycles; the file itself is not locked.
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Document::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_string_pretty(doc)?;
        tokio::fs::write(&self.path, payload).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for JsonStore {
    async fn add_entry(&self, kind: CollectionKind, data: NewEntry) -> Result<Entry> {
        if data.description.trim().is_empty() {
            return Err(StorageError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let entry = materialize(data);
        doc.collection_mut(kind).push(entry.clone());
        self.save(&doc).await?;
        tracing::debug!(kind = kind.as_str(), id = %entry.id, "entry added to json store");
        Ok(entry)
    }

    async fn delete_entry(&self, kind: CollectionKind, id: Uuid) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let entries = doc.collection_mut(kind);
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(StorageError::NotFound);
        }
        self.save(&doc).await?;
        Ok(())
    }

    async fn list_entries(&self, kind: CollectionKind) -> Result<Vec<Entry>> {
        let doc = self.load().await?;
        Ok(doc.collection(kind).clone())
    }

    async fn update_entry(
        &self,
        kind: CollectionKind,
        id: Uuid,
        patch: EntryPatch,
    ) -> Result<Entry> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let entry = doc
            .collection_mut(kind)
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(StorageError::NotFound)?;
        if let Some(worth_it) = patch.worth_it {
            entry.worth_it = worth_it;
        }
        let updated = entry.clone();
        self.save(&doc).await?;
        Ok(updated)
    }
}
