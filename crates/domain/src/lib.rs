//! Initiative domain: encounter value types and the rules that keep them consistent.
//!
//! Pure data and functions only. Storage, history and scheduling live in
//! `initiative-engine`.

pub mod edits;
pub mod entities;
pub mod error;
pub mod ids;
pub mod view;

pub use edits::{Edit, Tracking};
pub use entities::{
    Creature, CreatureStat, Encounter, Group, Hero, MinionPool, MinionThreshold,
    DEFAULT_MINION_COUNT, DEFAULT_NUMBER_OF_HEROES, DEFAULT_STAMINA_PER_MINION,
};
pub use error::DomainError;
pub use ids::{
    CreatureId, EncounterId, GroupId, HeroId, ENCOUNTER_ID_ALPHABET, ENCOUNTER_ID_LEN,
};
pub use view::{RestrictedCreature, RestrictedEncounter, RestrictedGroup};
