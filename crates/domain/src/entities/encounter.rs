//! Encounter aggregate - the root of everything the tracker persists.
//!
//! # Invariants
//!
//! - `current_round >= 1`
//! - Group, creature and hero ids are unique within the encounter
//! - `id` never changes once the encounter exists
//!
//! Encounters are plain values. Every change produces a new `Encounter`; snapshots
//! held by undo history are owned copies and cannot observe later edits.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entities::creature::Creature;
use crate::entities::group::Group;
use crate::entities::hero::Hero;
use crate::error::DomainError;
use crate::ids::{CreatureId, EncounterId, GroupId, HeroId};

/// Hero count and default roster size of a fresh encounter.
pub const DEFAULT_NUMBER_OF_HEROES: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: EncounterId,
    pub encounter_name: String,
    pub current_round: u32,
    /// GM-only resource pool.
    pub total_malice: u32,
    pub number_of_heroes: u32,
    pub heroes_victories: u32,
    #[serde(default)]
    pub success_condition: String,
    #[serde(default)]
    pub failure_condition: String,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub heroes: Vec<Hero>,
}

impl Encounter {
    /// The canonical empty encounter for `id`. Deterministic: the same id always
    /// produces the same value, default hero ids included.
    ///
    /// # Example
    ///
    /// ```
    /// use initiative_domain::{Encounter, EncounterId};
    ///
    /// let id = EncounterId::parse("ABCDEFGHJKLM").expect("valid id");
    /// let encounter = Encounter::new(id.clone());
    ///
    /// assert_eq!(encounter.current_round, 1);
    /// assert_eq!(encounter.heroes.len(), 4);
    /// assert_eq!(encounter, Encounter::new(id));
    /// ```
    pub fn new(id: EncounterId) -> Self {
        let heroes = (1..=DEFAULT_NUMBER_OF_HEROES as usize)
            .map(|n| Hero::new(HeroId::derived(&id, n), format!("Hero {n}")))
            .collect();
        Self {
            id,
            encounter_name: "New Encounter".to_string(),
            current_round: 1,
            total_malice: 0,
            number_of_heroes: DEFAULT_NUMBER_OF_HEROES,
            heroes_victories: 0,
            success_condition: String::new(),
            failure_condition: String::new(),
            groups: Vec::new(),
            heroes,
        }
    }

    /// Check the aggregate invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.current_round < 1 {
            return Err(DomainError::validation("currentRound must be at least 1"));
        }

        let mut group_ids = HashSet::new();
        let mut creature_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(&group.group_id) {
                return Err(DomainError::validation(format!(
                    "duplicate group id {}",
                    group.group_id
                )));
            }
            for creature in &group.creatures {
                if !creature_ids.insert(&creature.creature_id) {
                    return Err(DomainError::validation(format!(
                        "duplicate creature id {}",
                        creature.creature_id
                    )));
                }
            }
        }

        let mut hero_ids = HashSet::new();
        for hero in &self.heroes {
            if !hero_ids.insert(&hero.id) {
                return Err(DomainError::validation(format!(
                    "duplicate hero id {}",
                    hero.id
                )));
            }
        }
        Ok(())
    }

    /// Next round: counter +1, every group and hero ready to act again.
    ///
    /// All three changes land in the one returned value. Fails once the
    /// counter is at `u32::MAX`.
    pub fn advanced(&self) -> Result<Self, DomainError> {
        let mut next = self.clone();
        next.current_round = self
            .current_round
            .checked_add(1)
            .ok_or_else(|| DomainError::validation("currentRound cannot advance past u32::MAX"))?;
        for group in &mut next.groups {
            group.has_acted = false;
        }
        for hero in &mut next.heroes {
            hero.has_acted_this_round = false;
        }
        Ok(next)
    }

    pub fn group(&self, group_id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.group_id == group_id)
    }

    pub fn group_mut(&mut self, group_id: &GroupId) -> Result<&mut Group, DomainError> {
        self.groups
            .iter_mut()
            .find(|g| &g.group_id == group_id)
            .ok_or_else(|| DomainError::not_found("Group", group_id))
    }

    pub fn creature_mut(
        &mut self,
        group_id: &GroupId,
        creature_id: &CreatureId,
    ) -> Result<&mut Creature, DomainError> {
        self.group_mut(group_id)?
            .creature_mut(creature_id)
            .ok_or_else(|| DomainError::not_found("Creature", creature_id))
    }

    pub fn hero_mut(&mut self, hero_id: &HeroId) -> Result<&mut Hero, DomainError> {
        self.heroes
            .iter_mut()
            .find(|h| &h.id == hero_id)
            .ok_or_else(|| DomainError::not_found("Hero", hero_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encounter_id() -> EncounterId {
        EncounterId::parse("ABCDEFGHJKLM").expect("valid id")
    }

    fn group(id: &str, creature: &str) -> Group {
        Group::new(
            GroupId::new(id).expect("valid id"),
            vec![Creature::new(CreatureId::new(creature).expect("valid id"))],
        )
    }

    #[test]
    fn new_encounter_has_canonical_defaults() {
        let e = Encounter::new(encounter_id());
        assert_eq!(e.encounter_name, "New Encounter");
        assert_eq!(e.current_round, 1);
        assert_eq!(e.total_malice, 0);
        assert_eq!(e.number_of_heroes, 4);
        assert_eq!(e.heroes_victories, 0);
        assert!(e.groups.is_empty());
        let names: Vec<&str> = e.heroes.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Hero 1", "Hero 2", "Hero 3", "Hero 4"]);
        assert_eq!(e.heroes[0].id.as_str(), "ABCDEFGHJKLM-h-1");
        e.validate().expect("defaults are valid");
    }

    #[test]
    fn advanced_resets_acted_flags_with_the_round() {
        let mut e = Encounter::new(encounter_id());
        e.current_round = 3;
        e.groups = vec![group("g-1", "c-1"), group("g-2", "c-2")];
        for g in &mut e.groups {
            g.has_acted = true;
        }
        e.heroes[0].has_acted_this_round = true;

        let next = e.advanced().expect("advance");

        assert_eq!(next.current_round, 4);
        assert!(next.groups.iter().all(|g| !g.has_acted));
        assert!(next.heroes.iter().all(|h| !h.has_acted_this_round));
        // the source value is untouched
        assert_eq!(e.current_round, 3);
        assert!(e.groups.iter().all(|g| g.has_acted));
    }

    #[test]
    fn advancing_past_the_last_round_is_rejected() {
        let mut e = Encounter::new(encounter_id());
        e.current_round = u32::MAX;
        e.heroes[0].has_acted_this_round = true;

        let err = e.advanced().expect_err("round overflow");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(e.current_round, u32::MAX);
        assert!(e.heroes[0].has_acted_this_round);
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut e = Encounter::new(encounter_id());
        e.groups = vec![group("g-1", "c-1"), group("g-1", "c-2")];
        assert!(matches!(e.validate(), Err(DomainError::Validation(_))));

        e.groups = vec![group("g-1", "c-1"), group("g-2", "c-1")];
        assert!(e.validate().is_err());

        e.groups.clear();
        let dup = e.heroes[0].clone();
        e.heroes.push(dup);
        assert!(e.validate().is_err());
    }

    #[test]
    fn validate_rejects_round_zero() {
        let mut e = Encounter::new(encounter_id());
        e.current_round = 0;
        assert!(e.validate().is_err());
    }

    #[test]
    fn documents_use_camel_case_and_tolerate_missing_heroes() {
        let e = Encounter::new(encounter_id());
        let json = serde_json::to_value(&e).expect("serialize");
        assert_eq!(json["encounterName"], "New Encounter");
        assert_eq!(json["currentRound"], 1);
        assert_eq!(json["heroes"][0]["hasActedThisRound"], false);

        let legacy = r#"{"id":"ABCDEFGHJKLM","encounterName":"Bridge","currentRound":2,
            "totalMalice":3,"numberOfHeroes":5,"heroesVictories":1,
            "successCondition":"","failureCondition":"","groups":[]}"#;
        let loaded: Encounter = serde_json::from_str(legacy).expect("legacy document");
        assert!(loaded.heroes.is_empty());
        assert_eq!(loaded.total_malice, 3);
    }

    #[test]
    fn lookups_report_missing_targets() {
        let mut e = Encounter::new(encounter_id());
        let missing = GroupId::new("g-404").expect("valid id");
        assert!(matches!(
            e.group_mut(&missing),
            Err(DomainError::NotFound { entity_type: "Group", .. })
        ));
    }
}
