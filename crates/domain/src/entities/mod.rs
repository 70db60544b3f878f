//! Encounter entities: the aggregate root and the roster members it owns.

pub mod creature;
pub mod encounter;
pub mod group;
pub mod hero;

pub use creature::{
    Creature, CreatureStat, MinionPool, MinionThreshold, DEFAULT_MINION_COUNT,
    DEFAULT_STAMINA_PER_MINION,
};
pub use encounter::{Encounter, DEFAULT_NUMBER_OF_HEROES};
pub use group::Group;
pub use hero::Hero;
