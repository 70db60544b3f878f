//! Initiative engine library.
//!
//! Keeps one open encounter in memory, records undo history for it and writes
//! it through a pluggable storage port.
//!
//! ## Structure
//!
//! - `infrastructure/` - ports, storage backends, clock/random, configuration
//! - `use_cases/` - history, debounced saving and the encounter session
//! - `stores/` - session-scoped UI state that is never persisted
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Shared fakes for unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
