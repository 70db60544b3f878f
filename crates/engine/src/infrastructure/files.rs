//! File-per-encounter storage: `<dir>/<storage key>.json`.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a crash
//! mid-write leaves the previous document intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use initiative_domain::{Encounter, EncounterId};

use crate::infrastructure::document::{self, DEFAULT_KEY_PREFIX};
use crate::infrastructure::ports::{EncounterRepo, RepoError};

pub struct FileEncounterStore {
    dir: PathBuf,
    prefix: String,
}

impl FileEncounterStore {
    /// Open (and create if missing) the storage directory.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RepoError::io("create_dir", e))?;
        Ok(Self {
            dir,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &EncounterId) -> PathBuf {
        self.dir
            .join(format!("{}.json", document::storage_key(&self.prefix, id)))
    }
}

#[async_trait]
impl EncounterRepo for FileEncounterStore {
    async fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, RepoError> {
        match tokio::fs::read_to_string(self.path_for(id)).await {
            Ok(raw) => Ok(document::decode(id, &raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Non UTF-8 content is a damaged document, not a backend fault.
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!(encounter_id = %id, error = %e, "Discarding unreadable encounter file");
                Ok(None)
            }
            Err(e) => Err(RepoError::io("get", e)),
        }
    }

    async fn save(&self, encounter: &Encounter) -> Result<(), RepoError> {
        let raw = document::encode(encounter)?;
        let path = self.path_for(&encounter.id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| RepoError::io("save", e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| RepoError::io("save", e))?;
        Ok(())
    }

    async fn delete(&self, id: &EncounterId) -> Result<(), RepoError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepoError::io("delete", e)),
        }
    }
}
