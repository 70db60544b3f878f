//! Debounced save scheduling for tracked mutations.
//!
//! At most one timer is pending. Scheduling again cancels it and starts a fresh
//! delay, so only the last snapshot requested inside the window is written.
//! When the timer fires the write is handed to its own task; canceling later
//! only ever stops a timer, never a write already in flight.
//!
//! Dropping the scheduler cancels the pending timer without flushing it.

use std::sync::Arc;
use std::time::Duration;

use initiative_domain::Encounter;
use tokio::task::JoinHandle;

use crate::infrastructure::ports::EncounterRepo;
use crate::use_cases::persistence::{self, FailureSender, WriteKind};

/// Default quiet period before a tracked mutation is written.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct DebouncedSave {
    repo: Arc<dyn EncounterRepo>,
    delay: Duration,
    failures: FailureSender,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedSave {
    pub fn new(repo: Arc<dyn EncounterRepo>, delay: Duration, failures: FailureSender) -> Self {
        Self {
            repo,
            delay,
            failures,
            pending: None,
        }
    }

    /// Replace any pending write with one of `encounter` after the full delay.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&mut self, encounter: Encounter) {
        let superseded = self.cancel();
        tracing::debug!(
            encounter_id = %encounter.id,
            delay_ms = self.delay.as_millis() as u64,
            superseded,
            "Save scheduled"
        );

        let repo = self.repo.clone();
        let failures = self.failures.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            persistence::spawn_write(repo, encounter, WriteKind::Debounced, failures);
        }));
    }

    /// Cancel the pending timer, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a timer is still waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebouncedSave {
    fn drop(&mut self) {
        if self.cancel() {
            tracing::debug!("Pending save discarded on teardown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{encounter, RecordingStore};
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    fn scheduler(store: &Arc<RecordingStore>) -> (DebouncedSave, persistence::FailureReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DebouncedSave::new(store.clone(), DEFAULT_SAVE_DEBOUNCE, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_schedules_coalesce_into_the_last_snapshot() {
        let store = Arc::new(RecordingStore::new());
        let (mut saver, _rx) = scheduler(&store);

        let mut last = encounter();
        for round in 1..=3 {
            last.current_round = round;
            saver.schedule(last.clone());
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
        let third_at = Instant::now() - Duration::from_millis(40);

        tokio::time::sleep(Duration::from_millis(600)).await;

        let saves = store.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].encounter.current_round, 3);
        let fired_after = saves[0].at - third_at;
        assert!(fired_after >= Duration::from_millis(500), "{fired_after:?}");
        assert!(fired_after < Duration::from_millis(520), "{fired_after:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_written_before_the_delay() {
        let store = Arc::new(RecordingStore::new());
        let (mut saver, _rx) = scheduler(&store);

        saver.schedule(encounter());
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(store.saves().is_empty());
        assert!(saver.is_pending());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(store.saves().len(), 1);
        assert!(!saver.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_without_flushing() {
        let store = Arc::new(RecordingStore::new());
        let (mut saver, _rx) = scheduler(&store);

        saver.schedule(encounter());
        drop(saver);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(store.saves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_reports_whether_a_timer_was_waiting() {
        let store = Arc::new(RecordingStore::new());
        let (mut saver, _rx) = scheduler(&store);
        assert!(!saver.cancel());

        saver.schedule(encounter());
        assert!(saver.cancel());
        assert!(!saver.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_writes_are_reported() {
        let store = Arc::new(RecordingStore::failing());
        let (mut saver, mut rx) = scheduler(&store);

        saver.schedule(encounter());
        tokio::time::sleep(Duration::from_millis(600)).await;

        let failure = rx.try_recv().expect("failure reported");
        assert_eq!(failure.kind, WriteKind::Debounced);
        assert_eq!(failure.encounter_id, encounter().id);
    }
}
