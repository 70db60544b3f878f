//! Hero entity - a player character on the turn tracker.

use serde::{Deserialize, Serialize};

use crate::ids::HeroId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    /// Reset to `false` on every round advance.
    #[serde(default)]
    pub has_acted_this_round: bool,
}

impl Hero {
    pub fn new(id: HeroId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            has_acted_this_round: false,
        }
    }
}
