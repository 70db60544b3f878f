//! Snapshot-based undo/redo history for one encounter.
//!
//! - `past`: oldest → most recent undoable states
//! - `future`: nearest → farthest redoable states
//! - Recording a checkpoint clears `future` (new timeline branch); nothing else does
//! - `past` is capped; the oldest snapshot is evicted on overflow
//!
//! Snapshots are owned `Encounter` values, so later edits to the live state can
//! never reach back into history.

use std::collections::VecDeque;

use initiative_domain::Encounter;

/// Default cap on undoable snapshots.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Encounter>,
    future: VecDeque<Encounter>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            future: VecDeque::new(),
            limit,
        }
    }

    /// Record the state as it was *before* a tracked mutation.
    pub fn record_checkpoint(&mut self, prior: Encounter) {
        self.push_past(prior);
        self.future.clear();
        tracing::debug!(
            undo_depth = self.past.len(),
            "History checkpoint recorded"
        );
    }

    /// Step back. `current` moves to the front of `future`.
    ///
    /// Returns the state to make live, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: &Encounter) -> Option<Encounter> {
        let previous = self.past.pop_back()?;
        self.future.push_front(current.clone());
        tracing::debug!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "Undo"
        );
        Some(previous)
    }

    /// Step forward. `current` is appended to `past`.
    ///
    /// Returns the state to make live, or `None` when there is nothing to redo.
    pub fn redo(&mut self, current: &Encounter) -> Option<Encounter> {
        let next = self.future.pop_front()?;
        self.push_past(current.clone());
        tracing::debug!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "Redo"
        );
        Some(next)
    }

    fn push_past(&mut self, snapshot: Encounter) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Undoable snapshots, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &Encounter> {
        self.past.iter()
    }

    /// Redoable snapshots, nearest first.
    pub fn future(&self) -> impl Iterator<Item = &Encounter> {
        self.future.iter()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use initiative_domain::EncounterId;

    /// Encounter whose round number tags it.
    fn state(round: u32) -> Encounter {
        let mut e = Encounter::new(EncounterId::parse("ABCDEFGHJKLM").expect("valid id"));
        e.current_round = round;
        e
    }

    fn rounds<'a>(snapshots: impl Iterator<Item = &'a Encounter>) -> Vec<u32> {
        snapshots.map(|e| e.current_round).collect()
    }

    #[test]
    fn new_history_is_empty() {
        let h = History::default();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.limit(), 50);
    }

    #[test]
    fn sixty_checkpoints_keep_the_latest_fifty_in_order() {
        let mut h = History::default();
        for round in 1..=60 {
            h.record_checkpoint(state(round));
        }
        assert_eq!(h.undo_depth(), 50);
        assert_eq!(rounds(h.past()), (11..=60).collect::<Vec<_>>());
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_no_ops() {
        let mut h = History::default();
        assert_eq!(h.undo(&state(1)), None);
        assert_eq!(h.redo(&state(1)), None);
        assert_eq!(h.undo_depth(), 0);
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn undo_moves_current_to_the_front_of_future() {
        let mut h = History::default();
        h.record_checkpoint(state(1));
        h.record_checkpoint(state(2));

        assert_eq!(h.undo(&state(3)).map(|e| e.current_round), Some(2));
        assert_eq!(h.undo(&state(2)).map(|e| e.current_round), Some(1));
        assert_eq!(rounds(h.future()), vec![2, 3]);

        assert_eq!(h.redo(&state(1)).map(|e| e.current_round), Some(2));
        assert_eq!(rounds(h.past()), vec![1]);
        assert_eq!(rounds(h.future()), vec![3]);
    }

    #[test]
    fn undo_then_redo_n_times_is_an_inverse() {
        let mut h = History::default();
        let mut live = state(1);
        for round in 2..=6 {
            h.record_checkpoint(live.clone());
            live = state(round);
        }

        for _ in 0..5 {
            live = h.undo(&live).expect("undoable");
        }
        assert_eq!(live, state(1));
        assert!(!h.can_undo());

        for _ in 0..5 {
            live = h.redo(&live).expect("redoable");
        }
        assert_eq!(live, state(6));
        assert!(!h.can_redo());
        assert_eq!(h.undo_depth(), 5);
    }

    #[test]
    fn checkpoint_clears_future() {
        let mut h = History::default();
        h.record_checkpoint(state(1));
        h.undo(&state(2));
        assert!(h.can_redo());

        h.record_checkpoint(state(1));
        assert!(!h.can_redo());
    }

    #[test]
    fn checkpoint_after_undo_keeps_the_cap() {
        let mut h = History::new(2);
        h.record_checkpoint(state(1));
        h.record_checkpoint(state(2));
        let back = h.undo(&state(3)).expect("undoable");
        h.record_checkpoint(state(9));
        assert_eq!(rounds(h.past()), vec![1, 9]);
        assert_eq!(back.current_round, 2);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut h = History::new(0);
        h.record_checkpoint(state(1));
        assert!(!h.can_undo());
    }
}
