//! Background writes and how their failures reach the session owner.

use std::sync::Arc;

use initiative_domain::{Encounter, EncounterId};
use tokio::sync::mpsc;

use crate::infrastructure::ports::{EncounterRepo, RepoError};

/// Which path a background write came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// Fired by the debounce timer after a tracked mutation.
    Debounced,
    /// Issued immediately for a quiet mutation.
    Quiet,
}

/// A background write that did not reach storage.
///
/// The in-memory state and history are already ahead of storage when this is
/// reported; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?} save of encounter {encounter_id} failed: {error}")]
pub struct PersistFailure {
    pub encounter_id: EncounterId,
    pub kind: WriteKind,
    pub error: RepoError,
}

pub type FailureSender = mpsc::UnboundedSender<PersistFailure>;
pub type FailureReceiver = mpsc::UnboundedReceiver<PersistFailure>;

/// Save `encounter` and report a failure on `failures`.
///
/// Once started a write runs to completion; only pending timers are cancelable.
pub(crate) async fn write(
    repo: Arc<dyn EncounterRepo>,
    encounter: Encounter,
    kind: WriteKind,
    failures: FailureSender,
) {
    match repo.save(&encounter).await {
        Ok(()) => {
            tracing::debug!(encounter_id = %encounter.id, ?kind, "Encounter saved");
        }
        Err(error) => {
            tracing::warn!(encounter_id = %encounter.id, ?kind, error = %error, "Encounter save failed");
            // The receiver may be gone when the session was dropped; the log above stands.
            let _ = failures.send(PersistFailure {
                encounter_id: encounter.id,
                kind,
                error,
            });
        }
    }
}

/// Start a write without waiting for it.
pub(crate) fn spawn_write(
    repo: Arc<dyn EncounterRepo>,
    encounter: Encounter,
    kind: WriteKind,
    failures: FailureSender,
) {
    tokio::spawn(write(repo, encounter, kind, failures));
}
