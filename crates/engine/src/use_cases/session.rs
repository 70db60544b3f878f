//! Encounter session - the single choke point for every state transition.
//!
//! One session owns the live encounter, its undo history and its debounced
//! saver. Mutations are synchronous with respect to each other; writes run in
//! the background and report failures on a channel instead of rolling back.
//!
//! | path | history | write |
//! |---|---|---|
//! | tracked `apply` / `advance_round` | checkpoint prior state | debounced |
//! | quiet `apply` | untouched | immediate, fire-and-forget |
//! | `undo` / `redo` | move between stacks | immediate, awaited |

use std::sync::Arc;
use std::time::Duration;

use initiative_domain::{DomainError, Edit, Encounter, EncounterId, RestrictedEncounter, Tracking};
use tokio::sync::mpsc;

use crate::infrastructure::ports::{EncounterRepo, RepoError};
use crate::use_cases::debounce::{DebouncedSave, DEFAULT_SAVE_DEBOUNCE};
use crate::use_cases::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::use_cases::persistence::{self, FailureReceiver, FailureSender, WriteKind};

/// Per-session tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Cap on undoable snapshots.
    pub history_limit: usize,
    /// Quiet period before a tracked mutation is written.
    pub save_debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Storage could not be read. Nothing is shown.
    #[error("Failed to load encounter: {0}")]
    Load(RepoError),
    /// An awaited write (provisioning, undo, redo, flush) failed.
    #[error("Failed to save encounter: {0}")]
    Persist(RepoError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Encounter mismatch: session holds {expected}, got {found}")]
    EncounterMismatch {
        expected: EncounterId,
        found: EncounterId,
    },
}

pub struct EncounterSession {
    repo: Arc<dyn EncounterRepo>,
    current: Encounter,
    history: History,
    saver: DebouncedSave,
    failures_tx: FailureSender,
    failures_rx: Option<FailureReceiver>,
}

impl EncounterSession {
    /// Load `id`, provisioning and saving a default encounter when nothing
    /// (or nothing readable) is stored under it. History starts empty.
    pub async fn open(
        repo: Arc<dyn EncounterRepo>,
        id: &EncounterId,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let current = match repo.get(id).await.map_err(SessionError::Load)? {
            Some(encounter) => {
                tracing::info!(encounter_id = %id, round = encounter.current_round, "Encounter loaded");
                encounter
            }
            None => {
                let encounter = repo.create(id).await.map_err(SessionError::Persist)?;
                tracing::info!(encounter_id = %id, "Encounter provisioned");
                encounter
            }
        };

        let (failures_tx, failures_rx) = mpsc::unbounded_channel();
        let saver = DebouncedSave::new(repo.clone(), options.save_debounce, failures_tx.clone());

        Ok(Self {
            repo,
            current,
            history: History::new(options.history_limit),
            saver,
            failures_tx,
            failures_rx: Some(failures_rx),
        })
    }

    pub fn encounter(&self) -> &Encounter {
        &self.current
    }

    pub fn id(&self) -> &EncounterId {
        &self.current.id
    }

    /// What players may see of the live encounter.
    pub fn restricted_view(&self) -> RestrictedEncounter {
        RestrictedEncounter::from(&self.current)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Whether a debounced write is still waiting to fire.
    pub fn has_pending_save(&self) -> bool {
        self.saver.is_pending()
    }

    /// Replace the live encounter with `next`.
    ///
    /// Tracked: the prior state becomes an undo step and `next` is saved after
    /// the debounce window. Quiet: `next` is saved immediately and history is
    /// left alone.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// A `next` for another encounter, or one that fails validation, is
    /// rejected and leaves state and history as they were.
    pub fn apply(&mut self, next: Encounter, tracking: Tracking) -> Result<(), SessionError> {
        if next.id != self.current.id {
            return Err(SessionError::EncounterMismatch {
                expected: self.current.id.clone(),
                found: next.id,
            });
        }
        next.validate()?;

        match tracking {
            Tracking::Tracked => {
                let prior = std::mem::replace(&mut self.current, next);
                self.history.record_checkpoint(prior);
                self.saver.schedule(self.current.clone());
            }
            Tracking::Quiet => {
                self.current = next;
                // The quiet snapshot already carries any pending tracked change.
                if self.saver.cancel() {
                    tracing::debug!(encounter_id = %self.current.id, "Pending save folded into quiet write");
                }
                persistence::spawn_write(
                    self.repo.clone(),
                    self.current.clone(),
                    WriteKind::Quiet,
                    self.failures_tx.clone(),
                );
            }
        }
        Ok(())
    }

    /// Apply a typed edit with its own tracking classification.
    pub fn edit(&mut self, edit: &Edit) -> Result<(), SessionError> {
        let next = edit.apply_to(&self.current)?;
        self.apply(next, edit.tracking())
    }

    /// Next round as one tracked step: counter bumped and every acted flag cleared together.
    pub fn advance_round(&mut self) -> Result<(), SessionError> {
        let next = self.current.advanced()?;
        tracing::info!(
            encounter_id = %self.current.id,
            round = next.current_round,
            "Round advanced"
        );
        self.apply(next, Tracking::Tracked)
    }

    /// Step back one tracked mutation and write the result straight away.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. A pending debounced
    /// write is dropped first so it cannot land after the undone state.
    ///
    /// # Errors
    ///
    /// `Persist` when the write fails; the live state has still moved back.
    pub async fn undo(&mut self) -> Result<bool, SessionError> {
        let Some(previous) = self.history.undo(&self.current) else {
            return Ok(false);
        };
        self.current = previous;
        self.write_now().await?;
        Ok(true)
    }

    /// Step forward one undone mutation and write the result straight away.
    ///
    /// Mirrors [`undo`](Self::undo).
    pub async fn redo(&mut self) -> Result<bool, SessionError> {
        let Some(next) = self.history.redo(&self.current) else {
            return Ok(false);
        };
        self.current = next;
        self.write_now().await?;
        Ok(true)
    }

    /// Write the live state now instead of waiting for the debounce window.
    pub async fn flush(&mut self) -> Result<(), SessionError> {
        self.write_now().await
    }

    async fn write_now(&mut self) -> Result<(), SessionError> {
        self.saver.cancel();
        self.repo
            .save(&self.current)
            .await
            .map_err(SessionError::Persist)?;
        tracing::debug!(encounter_id = %self.current.id, "Encounter written through");
        Ok(())
    }

    /// Receiving half of the background write failure channel. `None` once taken.
    pub fn take_failures(&mut self) -> Option<FailureReceiver> {
        self.failures_rx.take()
    }

    /// Tear down without flushing; a pending debounced write is discarded.
    pub fn close(mut self) {
        if self.saver.cancel() {
            tracing::info!(encounter_id = %self.current.id, "Session closed with an unsaved change");
        }
    }
}
