//! Per-session UI flags for groups.
//!
//! Whether a group's editor is open is presentation state. It is keyed by
//! `GroupId`, joined with the encounter only when rendering, and never passed
//! to the session or to storage.

use std::collections::HashSet;

use initiative_domain::{Encounter, GroupId};

#[derive(Debug, Clone, Default)]
pub struct GroupUiState {
    editing: HashSet<GroupId>,
}

impl GroupUiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self, group_id: &GroupId) -> bool {
        self.editing.contains(group_id)
    }

    pub fn set_editing(&mut self, group_id: GroupId, editing: bool) {
        if editing {
            self.editing.insert(group_id);
        } else {
            self.editing.remove(&group_id);
        }
    }

    /// Flip the flag, returning the new value.
    pub fn toggle_editing(&mut self, group_id: GroupId) -> bool {
        let editing = !self.is_editing(&group_id);
        self.set_editing(group_id, editing);
        editing
    }

    /// Forget groups that no longer exist (removed, or gone after an undo).
    pub fn retain_known(&mut self, encounter: &Encounter) {
        self.editing
            .retain(|id| encounter.groups.iter().any(|g| &g.group_id == id));
    }

    pub fn editing_count(&self) -> usize {
        self.editing.len()
    }
}
