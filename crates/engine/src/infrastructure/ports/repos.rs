//! Storage port for encounter documents.

use async_trait::async_trait;
use initiative_domain::{Encounter, EncounterId};

use super::error::RepoError;

/// Key/value storage of whole encounters, one document per id.
///
/// Backends differ only in where documents live; the session engine sees this
/// trait and nothing else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EncounterRepo: Send + Sync {
    /// Load an encounter.
    ///
    /// `Ok(None)` when there is no document *or* the document cannot be decoded.
    /// `Err` only for backend faults.
    async fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, RepoError>;

    /// Upsert the whole document keyed by `encounter.id`.
    async fn save(&self, encounter: &Encounter) -> Result<(), RepoError>;

    /// Remove a document. Removing a missing one succeeds.
    async fn delete(&self, id: &EncounterId) -> Result<(), RepoError>;

    /// Persist and return the default encounter for `id`.
    async fn create(&self, id: &EncounterId) -> Result<Encounter, RepoError> {
        let encounter = Encounter::new(id.clone());
        self.save(&encounter).await?;
        Ok(encounter)
    }
}
