//! Application state and composition.
//!
//! The storage backend is chosen once, here, and injected into every session.

use std::sync::Arc;

use initiative_domain::{Edit, EncounterId, GroupId, ENCOUNTER_ID_ALPHABET};

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::{EngineConfig, StorageBackend},
    files::FileEncounterStore,
    memory::MemoryEncounterStore,
    ports::{ClockPort, EncounterRepo, RandomPort, RepoError},
    sqlite::SqliteEncounterStore,
};
use crate::use_cases::{EncounterSession, SessionError, SessionOptions};

/// Main application state.
///
/// Holds the storage port, the randomness used for new ids, and the options
/// every opened session gets.
pub struct App {
    pub repo: Arc<dyn EncounterRepo>,
    pub random: Arc<dyn RandomPort>,
    pub options: SessionOptions,
}

impl App {
    /// Build the configured backend.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, RepoError> {
        let repo: Arc<dyn EncounterRepo> = match &config.storage {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory encounter storage");
                Arc::new(MemoryEncounterStore::with_prefix(config.key_prefix.clone()))
            }
            StorageBackend::Sqlite { path } => {
                tracing::info!(path = %path.display(), "Using SQLite encounter storage");
                let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
                Arc::new(
                    SqliteEncounterStore::new(&path.to_string_lossy(), clock)
                        .await?
                        .with_prefix(config.key_prefix.clone()),
                )
            }
            StorageBackend::Files { dir } => {
                tracing::info!(dir = %dir.display(), "Using file encounter storage");
                Arc::new(
                    FileEncounterStore::new(dir.clone())
                        .await?
                        .with_prefix(config.key_prefix.clone()),
                )
            }
        };

        Ok(Self::with_repo(
            repo,
            Arc::new(SystemRandom::new()),
            config.session.clone(),
        ))
    }

    pub fn with_repo(
        repo: Arc<dyn EncounterRepo>,
        random: Arc<dyn RandomPort>,
        options: SessionOptions,
    ) -> Self {
        Self {
            repo,
            random,
            options,
        }
    }

    /// Fresh 12-character encounter id.
    pub fn new_encounter_id(&self) -> EncounterId {
        EncounterId::generate(|len| {
            debug_assert_eq!(len, ENCOUNTER_ID_ALPHABET.len());
            self.random.gen_index(len)
        })
    }

    /// Edit adding a group that holds one default creature, with fresh ids.
    pub fn add_group_edit(&self) -> Edit {
        Edit::add_group(|| self.random.gen_uuid())
    }

    /// Edit adding a default creature to `group_id`, with a fresh id.
    pub fn add_creature_edit(&self, group_id: GroupId) -> Edit {
        Edit::add_creature(group_id, || self.random.gen_uuid())
    }

    /// Open (or provision) an encounter for editing.
    pub async fn open_session(&self, id: &EncounterId) -> Result<EncounterSession, SessionError> {
        EncounterSession::open(self.repo.clone(), id, self.options.clone()).await
    }

    /// Open a brand new encounter under a generated id.
    pub async fn create_session(&self) -> Result<EncounterSession, SessionError> {
        let id = self.new_encounter_id();
        tracing::info!(encounter_id = %id, "Creating encounter");
        self.open_session(&id).await
    }

    pub async fn delete(&self, id: &EncounterId) -> Result<(), RepoError> {
        self.repo.delete(id).await?;
        tracing::info!(encounter_id = %id, "Encounter deleted");
        Ok(())
    }
}
