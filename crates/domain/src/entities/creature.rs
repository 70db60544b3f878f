//! Creature entity - one roster line inside a group.
//!
//! A creature is either a single monster or a pool of minions sharing one stamina
//! track. Minion pools carry the count and the per-minion stamina; the pool exists
//! exactly when the creature is a minion, which [`Creature::minion`] encodes
//! structurally instead of as two loosely coupled optional fields.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CreatureId;

/// Minion count assigned when a creature is switched to a minion pool.
pub const DEFAULT_MINION_COUNT: u32 = 4;

/// Stamina per minion assigned when a creature is switched to a minion pool.
pub const DEFAULT_STAMINA_PER_MINION: u32 = 5;

/// Stamina pool shared by a group of minions.
///
/// # Invariants
///
/// - `count` and `stamina_per_minion` are both positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinionPool {
    count: u32,
    stamina_per_minion: u32,
}

impl MinionPool {
    pub fn new(count: u32, stamina_per_minion: u32) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::validation("minionCount must be positive"));
        }
        if stamina_per_minion == 0 {
            return Err(DomainError::validation("staminaPerMinion must be positive"));
        }
        Ok(Self {
            count,
            stamina_per_minion,
        })
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn stamina_per_minion(&self) -> u32 {
        self.stamina_per_minion
    }

    /// Stamina values at which each minion falls: `per, 2*per, .., count*per`.
    pub fn thresholds(&self) -> impl Iterator<Item = i64> + '_ {
        (1..=i64::from(self.count)).map(move |i| i * i64::from(self.stamina_per_minion))
    }
}

impl Default for MinionPool {
    fn default() -> Self {
        Self {
            count: DEFAULT_MINION_COUNT,
            stamina_per_minion: DEFAULT_STAMINA_PER_MINION,
        }
    }
}

/// One minion threshold as the tracker displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MinionThreshold {
    pub value: i64,
    /// The pool's stamina has dropped below this value, so one minion is down.
    pub crossed: bool,
}

/// Numeric quick stats shown on every creature line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatureStat {
    Speed,
    Stability,
    FreeStrike,
    Distance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CreatureRecord", into = "CreatureRecord")]
pub struct Creature {
    pub creature_id: CreatureId,
    pub name: String,
    /// Not clamped; overkill damage drives it negative.
    pub current_stamina: i32,
    pub minion: Option<MinionPool>,
    pub speed: i32,
    pub stability: i32,
    pub free_strike: i32,
    pub distance: i32,
    pub notes: String,
}

impl Creature {
    /// A creature with the tracker's starting stat line.
    pub fn new(creature_id: CreatureId) -> Self {
        Self {
            creature_id,
            name: "New Creature".to_string(),
            current_stamina: 10,
            minion: None,
            speed: 5,
            stability: 0,
            free_strike: 2,
            distance: 5,
            notes: String::new(),
        }
    }

    #[inline]
    pub fn is_minion(&self) -> bool {
        self.minion.is_some()
    }

    /// Turn the minion pool on (with defaults) or off (dropping the pool).
    ///
    /// Re-enabling an existing pool keeps its values.
    pub fn set_minion(&mut self, is_minion: bool) {
        self.minion = match (is_minion, self.minion) {
            (true, Some(pool)) => Some(pool),
            (true, None) => Some(MinionPool::default()),
            (false, _) => None,
        };
    }

    fn pool(&self) -> Result<MinionPool, DomainError> {
        self.minion.ok_or_else(|| {
            DomainError::validation(format!("creature {} is not a minion", self.creature_id))
        })
    }

    pub fn set_minion_count(&mut self, count: u32) -> Result<(), DomainError> {
        let pool = self.pool()?;
        self.minion = Some(MinionPool::new(count, pool.stamina_per_minion())?);
        Ok(())
    }

    pub fn set_stamina_per_minion(&mut self, stamina: u32) -> Result<(), DomainError> {
        let pool = self.pool()?;
        self.minion = Some(MinionPool::new(pool.count(), stamina)?);
        Ok(())
    }

    /// Thresholds with their crossed state; empty for anything but a minion pool.
    pub fn minion_thresholds(&self) -> Vec<MinionThreshold> {
        let stamina = i64::from(self.current_stamina);
        self.minion
            .as_ref()
            .map(|pool| {
                pool.thresholds()
                    .map(|value| MinionThreshold {
                        value,
                        crossed: stamina < value,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn stat(&self, stat: CreatureStat) -> i32 {
        match stat {
            CreatureStat::Speed => self.speed,
            CreatureStat::Stability => self.stability,
            CreatureStat::FreeStrike => self.free_strike,
            CreatureStat::Distance => self.distance,
        }
    }

    pub fn set_stat(&mut self, stat: CreatureStat, value: i32) {
        let slot = match stat {
            CreatureStat::Speed => &mut self.speed,
            CreatureStat::Stability => &mut self.stability,
            CreatureStat::FreeStrike => &mut self.free_strike,
            CreatureStat::Distance => &mut self.distance,
        };
        *slot = value;
    }
}

// =============================================================================
// Document shape
// =============================================================================

/// Flat document form: `isMinion` plus the two optional pool fields.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatureRecord {
    creature_id: CreatureId,
    name: String,
    current_stamina: i32,
    #[serde(default)]
    is_minion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minion_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stamina_per_minion: Option<u32>,
    #[serde(default)]
    speed: i32,
    #[serde(default)]
    stability: i32,
    #[serde(default)]
    free_strike: i32,
    #[serde(default)]
    distance: i32,
    #[serde(default)]
    notes: String,
}

impl TryFrom<CreatureRecord> for Creature {
    type Error = DomainError;

    fn try_from(record: CreatureRecord) -> Result<Self, Self::Error> {
        // Pool fields left over on a non-minion are ignored.
        let minion = if record.is_minion {
            Some(MinionPool::new(
                pool_field(
                    &record.creature_id,
                    "minionCount",
                    record.minion_count,
                    DEFAULT_MINION_COUNT,
                ),
                pool_field(
                    &record.creature_id,
                    "staminaPerMinion",
                    record.stamina_per_minion,
                    DEFAULT_STAMINA_PER_MINION,
                ),
            )?)
        } else {
            None
        };
        Ok(Self {
            creature_id: record.creature_id,
            name: record.name,
            current_stamina: record.current_stamina,
            minion,
            speed: record.speed,
            stability: record.stability,
            free_strike: record.free_strike,
            distance: record.distance,
            notes: record.notes,
        })
    }
}

/// A missing or zero pool field takes its default. A cleared input field is
/// stored as 0, and must not make the whole encounter unreadable.
fn pool_field(
    creature_id: &CreatureId,
    field: &'static str,
    value: Option<u32>,
    default: u32,
) -> u32 {
    match value {
        Some(0) => {
            tracing::warn!(
                creature_id = %creature_id,
                field,
                default,
                "Zero minion field replaced by default"
            );
            default
        }
        Some(value) => value,
        None => default,
    }
}

impl From<Creature> for CreatureRecord {
    fn from(creature: Creature) -> Self {
        Self {
            creature_id: creature.creature_id,
            name: creature.name,
            current_stamina: creature.current_stamina,
            is_minion: creature.minion.is_some(),
            minion_count: creature.minion.map(|pool| pool.count()),
            stamina_per_minion: creature.minion.map(|pool| pool.stamina_per_minion()),
            speed: creature.speed,
            stability: creature.stability,
            free_strike: creature.free_strike,
            distance: creature.distance,
            notes: creature.notes,
        }
    }
}
