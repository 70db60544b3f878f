//! Restricted view - what players see of an encounter.
//!
//! A read-time projection: malice, stamina, stats, notes and hidden groups are
//! dropped. Nothing here is stored.

use serde::Serialize;

use crate::entities::{Creature, Encounter, Group, Hero};
use crate::ids::{CreatureId, EncounterId, GroupId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedEncounter {
    pub id: EncounterId,
    pub encounter_name: String,
    pub current_round: u32,
    pub number_of_heroes: u32,
    pub heroes_victories: u32,
    pub success_condition: String,
    pub failure_condition: String,
    pub groups: Vec<RestrictedGroup>,
    pub heroes: Vec<Hero>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedGroup {
    pub group_id: GroupId,
    pub has_acted: bool,
    pub creatures: Vec<RestrictedCreature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedCreature {
    pub creature_id: CreatureId,
    pub name: String,
    pub is_minion: bool,
}

impl From<&Creature> for RestrictedCreature {
    fn from(creature: &Creature) -> Self {
        Self {
            creature_id: creature.creature_id.clone(),
            name: creature.name.clone(),
            is_minion: creature.is_minion(),
        }
    }
}

impl From<&Group> for RestrictedGroup {
    fn from(group: &Group) -> Self {
        Self {
            group_id: group.group_id.clone(),
            has_acted: group.has_acted,
            creatures: group.creatures.iter().map(RestrictedCreature::from).collect(),
        }
    }
}

impl From<&Encounter> for RestrictedEncounter {
    fn from(encounter: &Encounter) -> Self {
        Self {
            id: encounter.id.clone(),
            encounter_name: encounter.encounter_name.clone(),
            current_round: encounter.current_round,
            number_of_heroes: encounter.number_of_heroes,
            heroes_victories: encounter.heroes_victories,
            success_condition: encounter.success_condition.clone(),
            failure_condition: encounter.failure_condition.clone(),
            groups: encounter
                .groups
                .iter()
                .filter(|g| !g.hidden)
                .map(RestrictedGroup::from)
                .collect(),
            heroes: encounter.heroes.clone(),
        }
    }
}
