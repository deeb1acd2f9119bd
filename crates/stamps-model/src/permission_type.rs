//! Permission-type vocabulary.
//!
//! The set of permission symbols is owned by the server, not the client:
//! known symbols parse to their variant, anything else passes through as an
//! opaque string rather than failing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A permission-type symbol (`spend`, ...).
///
/// Unknown symbols are carried verbatim in [`PermissionType::Other`]; the
/// client never rejects a vocabulary word it has not seen before.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionType {
    /// Authority to spend/consume the accessible entity.
    Spend,
    /// A server-side symbol this client version does not know by name.
    Other(String),
}

impl PermissionType {
    /// String representation, as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            PermissionType::Spend => "spend",
            PermissionType::Other(symbol) => symbol,
        }
    }

    /// Parse a wire string. Never fails: unknown symbols become
    /// [`PermissionType::Other`].
    pub fn parse(s: &str) -> Self {
        match s {
            "spend" => PermissionType::Spend,
            other => PermissionType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PermissionType {
    fn from(s: &str) -> Self {
        PermissionType::parse(s)
    }
}

impl Serialize for PermissionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PermissionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let symbol = String::deserialize(deserializer)?;
        Ok(PermissionType::parse(&symbol))
    }
}
