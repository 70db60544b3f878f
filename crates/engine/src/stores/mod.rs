//! In-memory state storage modules.
//!
//! Stores hold runtime state that never belongs in an encounter document:
//! - `GroupUiState` - which groups are open for editing in this session

pub mod group_ui;

pub use group_ui::GroupUiState;
