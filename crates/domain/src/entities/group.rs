//! Group entity - creatures that act together on the initiative roster.

use serde::{Deserialize, Serialize};

use crate::entities::creature::Creature;
use crate::ids::{CreatureId, GroupId};

/// A roster entry of one or more creatures sharing a turn.
///
/// Whether the group's creature list is being edited is presentation state and
/// lives outside this type; documents that still carry `isEditing` load fine and
/// drop it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_id: GroupId,
    /// Reset to `false` on every round advance.
    #[serde(default)]
    pub has_acted: bool,
    #[serde(default)]
    pub creatures: Vec<Creature>,
    /// Hidden groups are left out of the restricted view.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl Group {
    pub fn new(group_id: GroupId, creatures: Vec<Creature>) -> Self {
        Self {
            group_id,
            has_acted: false,
            creatures,
            hidden: false,
        }
    }

    pub fn creature(&self, creature_id: &CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| &c.creature_id == creature_id)
    }

    pub fn creature_mut(&mut self, creature_id: &CreatureId) -> Option<&mut Creature> {
        self.creatures
            .iter_mut()
            .find(|c| &c.creature_id == creature_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_editing_flag_is_ignored_on_read() {
        let json = r#"{"groupId":"g-1","hasActed":true,"creatures":[],"isEditing":true}"#;
        let group: Group = serde_json::from_str(json).expect("valid document");
        assert!(group.has_acted);

        let written = serde_json::to_value(&group).expect("serialize");
        assert!(written.get("isEditing").is_none());
    }

    #[test]
    fn hidden_is_written_only_when_set() {
        let mut group = Group::new(GroupId::new("g-1").expect("valid id"), Vec::new());
        let written = serde_json::to_value(&group).expect("serialize");
        assert!(written.get("hidden").is_none());

        group.hidden = true;
        let written = serde_json::to_value(&group).expect("serialize");
        assert_eq!(written["hidden"], true);
    }
}
