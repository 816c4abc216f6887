//! Validated table identifier for the task store.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest identifier `PostgreSQL` keeps without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Error returned when a configured table name is not a plain identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid table name '{0}', expected [a-z_][a-z0-9_]* of at most 63 characters")]
pub struct InvalidTableName(pub String);

/// Lower-case SQL identifier naming the task table.
///
/// Table names are interpolated into SQL text, always through
/// [`TableName::quoted`], so reserved words such as `user` are usable while
/// the character set stays free of quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Creates a validated table name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTableName`] when the value is empty, too long, or
    /// contains anything other than lower-case ASCII letters, digits, and
    /// underscores, or starts with a digit.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidTableName> {
        let raw = value.into();
        let mut chars = raw.chars();
        let starts_well = chars
            .next()
            .is_some_and(|first| first.is_ascii_lowercase() || first == '_');
        let rest_valid =
            chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');

        if !starts_well || !rest_valid || raw.len() > MAX_IDENTIFIER_LEN {
            return Err(InvalidTableName(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the table name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name as a double-quoted SQL identifier.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self("tasks".to_owned())
    }
}

impl TryFrom<String> for TableName {
    type Error = InvalidTableName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
