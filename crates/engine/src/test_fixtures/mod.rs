//! Shared test helpers.
//!
//! [`RecordingStore`] is an in-memory [`EncounterRepo`] that remembers every
//! `save` together with the (Tokio, possibly paused) instant it happened, so
//! timing and ordering can be asserted. Use the `mockall` mock instead when a
//! test only needs to script one failure.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use initiative_domain::{Encounter, EncounterId};
use tokio::time::Instant;

use crate::infrastructure::ports::{EncounterRepo, RepoError};

/// Encounter id used across fixtures.
pub const ENCOUNTER_ID: &str = "ABCDEFGHJKLM";

pub fn encounter_id() -> EncounterId {
    EncounterId::parse(ENCOUNTER_ID).expect("fixture id is valid")
}

/// Default encounter for [`ENCOUNTER_ID`].
pub fn encounter() -> Encounter {
    Encounter::new(encounter_id())
}

/// One recorded `save` call.
#[derive(Debug, Clone)]
pub struct SaveRecord {
    pub encounter: Encounter,
    pub at: Instant,
}

#[derive(Default)]
pub struct RecordingStore {
    documents: Mutex<HashMap<EncounterId, Encounter>>,
    saves: Mutex<Vec<SaveRecord>>,
    fail_saves: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds the fixture encounter; every `save` is recorded and then rejected.
    pub fn failing() -> Self {
        let mut store = Self::with(encounter());
        store.fail_saves = true;
        store
    }

    /// Seed a stored encounter without recording a save.
    pub fn with(encounter: Encounter) -> Self {
        let store = Self::new();
        store
            .documents
            .lock()
            .expect("fixture lock")
            .insert(encounter.id.clone(), encounter);
        store
    }

    pub fn saves(&self) -> Vec<SaveRecord> {
        self.saves.lock().expect("fixture lock").clone()
    }

    pub fn stored(&self, id: &EncounterId) -> Option<Encounter> {
        self.documents.lock().expect("fixture lock").get(id).cloned()
    }
}

#[async_trait]
impl EncounterRepo for RecordingStore {
    async fn get(&self, id: &EncounterId) -> Result<Option<Encounter>, RepoError> {
        Ok(self.stored(id))
    }

    async fn save(&self, encounter: &Encounter) -> Result<(), RepoError> {
        self.saves.lock().expect("fixture lock").push(SaveRecord {
            encounter: encounter.clone(),
            at: Instant::now(),
        });
        if self.fail_saves {
            return Err(RepoError::io("save", "disk full"));
        }
        self.documents
            .lock()
            .expect("fixture lock")
            .insert(encounter.id.clone(), encounter.clone());
        Ok(())
    }

    async fn delete(&self, id: &EncounterId) -> Result<(), RepoError> {
        self.documents.lock().expect("fixture lock").remove(id);
        Ok(())
    }
}
