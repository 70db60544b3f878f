use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Characters encounter ids are drawn from. Excludes look-alikes (0/O, 1/I/l).
pub const ENCOUNTER_ID_ALPHABET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// Length of every encounter id.
pub const ENCOUNTER_ID_LEN: usize = 12;

/// Shareable identifier of an encounter. Also the suffix of its storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncounterId(String);

impl EncounterId {
    /// Parse an id, rejecting anything outside the fixed alphabet or of the wrong length.
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.len() != ENCOUNTER_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "encounter id must be {} characters, got {:?}",
                ENCOUNTER_ID_LEN, value
            )));
        }
        if let Some(bad) = value.bytes().find(|b| !ENCOUNTER_ID_ALPHABET.contains(b)) {
            return Err(DomainError::invalid_id(format!(
                "encounter id {:?} contains disallowed character {:?}",
                value, bad as char
            )));
        }
        Ok(Self(value))
    }

    /// Generate a fresh id.
    ///
    /// `pick` receives the alphabet length and must return an index below it. Keeping the
    /// RNG outside the domain lets callers inject a deterministic source in tests.
    pub fn generate(mut pick: impl FnMut(usize) -> usize) -> Self {
        let id = (0..ENCOUNTER_ID_LEN)
            .map(|_| {
                let index = pick(ENCOUNTER_ID_ALPHABET.len()) % ENCOUNTER_ID_ALPHABET.len();
                ENCOUNTER_ID_ALPHABET[index] as char
            })
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EncounterId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EncounterId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EncounterId> for String {
    fn from(id: EncounterId) -> String {
        id.0
    }
}

/// Roster ids are opaque strings so documents written by older clients
/// (e.g. `g-1700000000000-k2j4h5l6m`) keep loading.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id. Empty ids are rejected.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::invalid_id(concat!(
                        stringify!($name),
                        " cannot be empty"
                    )));
                }
                Ok(Self(value))
            }

            /// Build an id from a uuid, e.g. one drawn from an injected random source.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(format!("{}-{}", $prefix, uuid.simple()))
            }

            /// Deterministic id for the `ordinal`-th default member of an encounter.
            pub fn derived(parent: &EncounterId, ordinal: usize) -> Self {
                Self(format!("{}-{}-{}", parent, $prefix, ordinal))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

define_id!(GroupId, "g");
define_id!(CreatureId, "c");
define_id!(HeroId, "h");
