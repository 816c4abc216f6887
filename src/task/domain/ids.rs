//! Task identifier and its canonical textual codec.

use super::ParseTaskGuidError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the hyphenated `8-4-4-4-12` representation.
const CANONICAL_LEN: usize = 36;

/// Globally unique identifier and sole external handle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskGuid(Uuid);

impl TaskGuid {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a task identifier from its 16-byte binary encoding.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the 16-byte binary encoding used by the store.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Parses the canonical hyphenated representation.
    ///
    /// Hex digits may be upper or lower case. Simple, braced, and URN forms
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskGuidError`] when `text` is not a canonical GUID.
    pub fn parse(text: &str) -> Result<Self, ParseTaskGuidError> {
        if text.len() != CANONICAL_LEN {
            return Err(ParseTaskGuidError(text.to_owned()));
        }
        Uuid::try_parse(text)
            .map(Self)
            .map_err(|_| ParseTaskGuidError(text.to_owned()))
    }
}

impl Default for TaskGuid {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskGuid {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for TaskGuid {
    type Err = ParseTaskGuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TaskGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}
