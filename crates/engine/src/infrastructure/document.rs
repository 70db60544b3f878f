//! Encounter document encoding shared by every storage backend.
//!
//! Backends store opaque JSON text under a namespaced key. Reading is lenient by
//! contract: anything that does not decode to a valid encounter for the requested
//! id is logged and reported as absent, so the caller provisions a fresh one.

use initiative_domain::{Encounter, EncounterId};

use crate::infrastructure::ports::RepoError;

/// Namespace prepended to every encounter id to form its storage key.
pub const DEFAULT_KEY_PREFIX: &str = "draw-steel-encounter-";

pub fn storage_key(prefix: &str, id: &EncounterId) -> String {
    format!("{prefix}{id}")
}

pub fn encode(encounter: &Encounter) -> Result<String, RepoError> {
    serde_json::to_string(encounter).map_err(RepoError::serialization)
}

/// Decode a stored document, or `None` if it is unusable.
pub fn decode(id: &EncounterId, raw: &str) -> Option<Encounter> {
    let encounter: Encounter = match serde_json::from_str(raw) {
        Ok(encounter) => encounter,
        Err(e) => {
            tracing::warn!(encounter_id = %id, error = %e, "Discarding unreadable encounter document");
            return None;
        }
    };
    if &encounter.id != id {
        tracing::warn!(
            encounter_id = %id,
            document_id = %encounter.id,
            "Discarding encounter document stored under another id"
        );
        return None;
    }
    if let Err(e) = encounter.validate() {
        tracing::warn!(encounter_id = %id, error = %e, "Discarding invalid encounter document");
        return None;
    }
    Some(encounter)
}
