//! Engine configuration from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `INITIATIVE_STORAGE` | `sqlite` (`memory`, `sqlite`, `files`) |
//! | `INITIATIVE_DB` | `encounters.db` |
//! | `INITIATIVE_DATA_DIR` | `encounters` |
//! | `INITIATIVE_KEY_PREFIX` | `draw-steel-encounter-` |
//! | `INITIATIVE_SAVE_DEBOUNCE_MS` | `500` |
//! | `INITIATIVE_HISTORY_LIMIT` | `50` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::document::DEFAULT_KEY_PREFIX;
use crate::use_cases::session::SessionOptions;

/// Where encounter documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite { path: PathBuf },
    Files { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown storage backend {0:?} (expected memory, sqlite or files)")]
    UnknownBackend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub storage: StorageBackend,
    pub key_prefix: String,
    pub session: SessionOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Sqlite {
                path: PathBuf::from("encounters.db"),
            },
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            session: SessionOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Read the process environment (after `.env`, if the caller loaded one).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage = match lookup("INITIATIVE_STORAGE")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("sqlite") => StorageBackend::Sqlite {
                path: lookup("INITIATIVE_DB")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("encounters.db")),
            },
            Some("files") => StorageBackend::Files {
                dir: lookup("INITIATIVE_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("encounters")),
            },
            Some("memory") => StorageBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let key_prefix = lookup("INITIATIVE_KEY_PREFIX").unwrap_or(defaults.key_prefix);

        let debounce_ms = parse_or(
            &lookup,
            "INITIATIVE_SAVE_DEBOUNCE_MS",
            defaults.session.save_debounce.as_millis() as u64,
        );
        let history_limit = parse_or(
            &lookup,
            "INITIATIVE_HISTORY_LIMIT",
            defaults.session.history_limit,
        );

        Ok(Self {
            storage,
            key_prefix,
            session: SessionOptions {
                history_limit,
                save_debounce: Duration::from_millis(debounce_ms),
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Ignoring unparseable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<EngineConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]).expect("defaults"), EngineConfig::default());
        let defaults = EngineConfig::default();
        assert_eq!(defaults.session.history_limit, 50);
        assert_eq!(defaults.session.save_debounce, Duration::from_millis(500));
    }

    #[test]
    fn selects_backends() {
        let memory = config(&[("INITIATIVE_STORAGE", "Memory")]).expect("memory");
        assert_eq!(memory.storage, StorageBackend::Memory);

        let files = config(&[
            ("INITIATIVE_STORAGE", "files"),
            ("INITIATIVE_DATA_DIR", "/var/lib/initiative"),
        ])
        .expect("files");
        assert_eq!(
            files.storage,
            StorageBackend::Files {
                dir: PathBuf::from("/var/lib/initiative")
            }
        );
    }

    #[test]
    fn unknown_backend_is_an_error() {
        assert_eq!(
            config(&[("INITIATIVE_STORAGE", "firebase")]),
            Err(ConfigError::UnknownBackend("firebase".into()))
        );
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let cfg = config(&[
            ("INITIATIVE_SAVE_DEBOUNCE_MS", "soon"),
            ("INITIATIVE_HISTORY_LIMIT", "20"),
        ])
        .expect("config");
        assert_eq!(cfg.session.save_debounce, Duration::from_millis(500));
        assert_eq!(cfg.session.history_limit, 20);
    }
}
