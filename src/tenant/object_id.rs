//! Twelve-byte record identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to every stored record.
///
/// Rendered as 24 lowercase hex characters. The same value appears in two
/// shapes inside stored documents: as plain text (`"64b7..."`) and as a typed
/// reference (`{"$oid": "64b7..."}`); see [`crate::tenant::TenantKey`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

/// Error returned when text is not a 24-character hex identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a 24-character hex object id")]
pub struct ObjectIdParseError {
    pub input: String,
}

impl ObjectId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        let random = uuid::Uuid::new_v4();
        let mut bytes = [0u8; 12];
        bytes.copy_from_slice(&random.as_bytes()[..12]);
        Self(bytes)
    }

    /// Build an identifier from raw bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Parse exactly 24 hex characters (either case).
    pub fn parse_str(input: &str) -> Result<Self, ObjectIdParseError> {
        let invalid = || ObjectIdParseError {
            input: input.to_string(),
        };

        if input.len() != 24 || !input.is_ascii() {
            return Err(invalid());
        }

        let mut bytes = [0u8; 12];
        for (slot, pair) in bytes.iter_mut().zip(input.as_bytes().chunks_exact(2)) {
            let text = std::str::from_utf8(pair).map_err(|_| invalid())?;
            *slot = u8::from_str_radix(text, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }

    /// Whether the text would parse as an identifier.
    pub fn is_valid(input: &str) -> bool {
        Self::parse_str(input).is_ok()
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{:02x}", byte)).collect()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_str(&text).map_err(serde::de::Error::custom)
    }
}
