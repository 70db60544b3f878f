//! Edits - every change the tracker UI can ask for, and how each one is recorded.
//!
//! The classification lives here, in one match, instead of at UI call sites:
//!
//! - [`Tracking::Quiet`]: continuous free-text input (names, notes, win/lose
//!   conditions). Saved straight away, never an undo step.
//! - [`Tracking::Tracked`]: discrete values and structural changes (stamina, stats,
//!   malice, acted flags, adding/removing roster entries, minion settings). Each one is
//!   an undo step and is saved after the debounce window.
//!
//! Stamina is tracked: a wrong damage entry is the edit a GM most wants to take back.

use uuid::Uuid;

use crate::entities::{Creature, CreatureStat, Encounter, Group, Hero};
use crate::error::DomainError;
use crate::ids::{CreatureId, GroupId, HeroId};

/// How a mutation is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tracking {
    /// Checkpointed into undo history, persisted after the debounce window.
    Tracked,
    /// Persisted immediately, history untouched.
    Quiet,
}

impl Tracking {
    #[inline]
    pub fn is_tracked(self) -> bool {
        matches!(self, Self::Tracked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    // Encounter overview
    RenameEncounter(String),
    SetSuccessCondition(String),
    SetFailureCondition(String),
    SetTotalMalice(u32),
    SetNumberOfHeroes(u32),
    SetHeroesVictories(u32),

    // Groups
    /// New group holding one default creature.
    AddGroup {
        group_id: GroupId,
        creature_id: CreatureId,
    },
    RemoveGroup(GroupId),
    SetGroupActed {
        group_id: GroupId,
        has_acted: bool,
    },
    SetGroupHidden {
        group_id: GroupId,
        hidden: bool,
    },

    // Creatures
    AddCreature {
        group_id: GroupId,
        creature_id: CreatureId,
    },
    RemoveCreature {
        group_id: GroupId,
        creature_id: CreatureId,
    },
    RenameCreature {
        group_id: GroupId,
        creature_id: CreatureId,
        name: String,
    },
    SetCreatureNotes {
        group_id: GroupId,
        creature_id: CreatureId,
        notes: String,
    },
    SetCreatureStamina {
        group_id: GroupId,
        creature_id: CreatureId,
        stamina: i32,
    },
    SetCreatureStat {
        group_id: GroupId,
        creature_id: CreatureId,
        stat: CreatureStat,
        value: i32,
    },
    SetMinion {
        group_id: GroupId,
        creature_id: CreatureId,
        is_minion: bool,
    },
    SetMinionCount {
        group_id: GroupId,
        creature_id: CreatureId,
        count: u32,
    },
    SetStaminaPerMinion {
        group_id: GroupId,
        creature_id: CreatureId,
        stamina: u32,
    },

    // Heroes
    AddHero {
        hero_id: HeroId,
        name: String,
    },
    RemoveHero(HeroId),
    RenameHero {
        hero_id: HeroId,
        name: String,
    },
    SetHeroActed {
        hero_id: HeroId,
        has_acted: bool,
    },
}

impl Edit {
    /// Add a group, drawing both new ids from `gen_uuid`.
    pub fn add_group(mut gen_uuid: impl FnMut() -> Uuid) -> Self {
        Self::AddGroup {
            group_id: GroupId::from_uuid(gen_uuid()),
            creature_id: CreatureId::from_uuid(gen_uuid()),
        }
    }

    /// Add a default creature to `group_id`, drawing its id from `gen_uuid`.
    pub fn add_creature(group_id: GroupId, mut gen_uuid: impl FnMut() -> Uuid) -> Self {
        Self::AddCreature {
            group_id,
            creature_id: CreatureId::from_uuid(gen_uuid()),
        }
    }

    pub fn tracking(&self) -> Tracking {
        match self {
            Self::RenameEncounter(_)
            | Self::SetSuccessCondition(_)
            | Self::SetFailureCondition(_)
            | Self::RenameCreature { .. }
            | Self::SetCreatureNotes { .. }
            | Self::RenameHero { .. } => Tracking::Quiet,

            Self::SetTotalMalice(_)
            | Self::SetNumberOfHeroes(_)
            | Self::SetHeroesVictories(_)
            | Self::AddGroup { .. }
            | Self::RemoveGroup(_)
            | Self::SetGroupActed { .. }
            | Self::SetGroupHidden { .. }
            | Self::AddCreature { .. }
            | Self::RemoveCreature { .. }
            | Self::SetCreatureStamina { .. }
            | Self::SetCreatureStat { .. }
            | Self::SetMinion { .. }
            | Self::SetMinionCount { .. }
            | Self::SetStaminaPerMinion { .. }
            | Self::AddHero { .. }
            | Self::RemoveHero(_)
            | Self::SetHeroActed { .. } => Tracking::Tracked,
        }
    }

    /// Produce the encounter that results from this edit. `encounter` is not touched.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` when a target group, creature or hero is missing
    /// - `DomainError::Validation` for zero minion values, minion settings on a
    ///   non-minion, or ids that would collide with existing ones
    pub fn apply_to(&self, encounter: &Encounter) -> Result<Encounter, DomainError> {
        let mut next = encounter.clone();
        match self {
            Self::RenameEncounter(name) => next.encounter_name = name.clone(),
            Self::SetSuccessCondition(text) => next.success_condition = text.clone(),
            Self::SetFailureCondition(text) => next.failure_condition = text.clone(),
            Self::SetTotalMalice(value) => next.total_malice = *value,
            Self::SetNumberOfHeroes(value) => next.number_of_heroes = *value,
            Self::SetHeroesVictories(value) => next.heroes_victories = *value,

            Self::AddGroup {
                group_id,
                creature_id,
            } => next.groups.push(Group::new(
                group_id.clone(),
                vec![Creature::new(creature_id.clone())],
            )),
            Self::RemoveGroup(group_id) => {
                let before = next.groups.len();
                next.groups.retain(|g| &g.group_id != group_id);
                if next.groups.len() == before {
                    return Err(DomainError::not_found("Group", group_id));
                }
            }
            Self::SetGroupActed {
                group_id,
                has_acted,
            } => next.group_mut(group_id)?.has_acted = *has_acted,
            Self::SetGroupHidden { group_id, hidden } => {
                next.group_mut(group_id)?.hidden = *hidden
            }

            Self::AddCreature {
                group_id,
                creature_id,
            } => next
                .group_mut(group_id)?
                .creatures
                .push(Creature::new(creature_id.clone())),
            Self::RemoveCreature {
                group_id,
                creature_id,
            } => {
                let group = next.group_mut(group_id)?;
                let before = group.creatures.len();
                group.creatures.retain(|c| &c.creature_id != creature_id);
                if group.creatures.len() == before {
                    return Err(DomainError::not_found("Creature", creature_id));
                }
            }
            Self::RenameCreature {
                group_id,
                creature_id,
                name,
            } => next.creature_mut(group_id, creature_id)?.name = name.clone(),
            Self::SetCreatureNotes {
                group_id,
                creature_id,
                notes,
            } => next.creature_mut(group_id, creature_id)?.notes = notes.clone(),
            Self::SetCreatureStamina {
                group_id,
                creature_id,
                stamina,
            } => next.creature_mut(group_id, creature_id)?.current_stamina = *stamina,
            Self::SetCreatureStat {
                group_id,
                creature_id,
                stat,
                value,
            } => next
                .creature_mut(group_id, creature_id)?
                .set_stat(*stat, *value),
            Self::SetMinion {
                group_id,
                creature_id,
                is_minion,
            } => next
                .creature_mut(group_id, creature_id)?
                .set_minion(*is_minion),
            Self::SetMinionCount {
                group_id,
                creature_id,
                count,
            } => next
                .creature_mut(group_id, creature_id)?
                .set_minion_count(*count)?,
            Self::SetStaminaPerMinion {
                group_id,
                creature_id,
                stamina,
            } => next
                .creature_mut(group_id, creature_id)?
                .set_stamina_per_minion(*stamina)?,

            Self::AddHero { hero_id, name } => {
                next.heroes.push(Hero::new(hero_id.clone(), name.clone()))
            }
            Self::RemoveHero(hero_id) => {
                let before = next.heroes.len();
                next.heroes.retain(|h| &h.id != hero_id);
                if next.heroes.len() == before {
                    return Err(DomainError::not_found("Hero", hero_id));
                }
            }
            Self::RenameHero { hero_id, name } => next.hero_mut(hero_id)?.name = name.clone(),
            Self::SetHeroActed { hero_id, has_acted } => {
                next.hero_mut(hero_id)?.has_acted_this_round = *has_acted
            }
        }
        next.validate()?;
        Ok(next)
    }
}
