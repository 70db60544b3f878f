//! Use cases - how an open encounter changes and reaches storage.
//!
//! - `history` - undo/redo snapshot stacks
//! - `debounce` - single pending timer for tracked writes
//! - `persistence` - background writes and their failure channel
//! - `session` - the mutation coordinator tying the three together

pub mod debounce;
pub mod history;
pub mod persistence;
pub mod session;

// Re-export main types
pub use debounce::{DebouncedSave, DEFAULT_SAVE_DEBOUNCE};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use persistence::{FailureReceiver, PersistFailure, WriteKind};
pub use session::{EncounterSession, SessionError, SessionOptions};
