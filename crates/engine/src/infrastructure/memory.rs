//! In-memory encounter storage for development and testing.
//!
//! Behaves like a browser-local key/value store: documents are kept serialized
//! under namespaced keys, so every read hands back a fresh copy and unreadable
//! entries take the same path they would on a durable backend. Nothing survives
//! the process.

use std::collections::HashMap;

use async_trait::async_trait;
use initiative_domain::{Encounter, EncounterId};
use tokio::sync::RwLock;

use crate::infrastructure::document::{self, DEFAULT_KEY_PREFIX};
use crate::infrastructure::ports::{EncounterRepo, RepoError};

pub struct MemoryEncounterStore {
    prefix: String,
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryEncounterStore {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Store raw document text, bypassing encoding. Used to seed imports and to
    /// reproduce damaged documents.
    pub async fn insert_raw(&self, id: &EncounterId, raw: impl Into<String>) {
        let key = document::storage_key(&self.prefix, id);
        self.documents.write().await.insert(key, raw.into());
    }

    /// Raw document text currently stored for `id`.
    pub async fn raw(&self, id: &EncounterId) -> Option<String> {
        let key = document::storage_key(&self.prefix, id);
        self.documents.read().await.get(&key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for MemoryEncounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EncounterRepo for MemoryEncounterStore {
    async fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, RepoError> {
        Ok(self
            .raw(id)
            .await
            .and_then(|raw| document::decode(id, &raw)))
    }

    async fn save(&self, encounter: &Encounter) -> Result<(), RepoError> {
        let raw = document::encode(encounter)?;
        self.insert_raw(&encounter.id, raw).await;
        Ok(())
    }

    async fn delete(&self, id: &EncounterId) -> Result<(), RepoError> {
        let key = document::storage_key(&self.prefix, id);
        self.documents.write().await.remove(&key);
        Ok(())
    }
}
