//! # Native Reference Identifier
//!
//! The certificate store addresses documents (and cross-document links such
//! as a certificate's issuing institution) with a 12-byte object id, written
//! as 24 hex characters. Callers, however, supply identifiers as plain
//! strings, and many of those are not object ids at all.
//!
//! [`ReferenceId`] is the only way a string crosses into the reference
//! namespace. Construction is fallible and cheap; the canonical form is
//! lowercase hex.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;

/// Number of hex characters in a rendered reference id.
pub const REFERENCE_HEX_LEN: usize = 24;

/// The store's native reference type, held in canonical lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Parse a reference id from its hex rendering.
    ///
    /// Accepts exactly 24 hex digits in either case. Surrounding whitespace
    /// is not trimmed; `" 507f..."` is rejected.
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        let len = raw.chars().count();
        if len != REFERENCE_HEX_LEN {
            return Err(ReferenceError::InvalidLength { len });
        }
        if let Some((offset, found)) = raw.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(ReferenceError::InvalidCharacter { found, offset });
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// The canonical lowercase hex rendering.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReferenceId {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReferenceId {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferenceId> for String {
    fn from(id: ReferenceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_object_id() {
        let id = ReferenceId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn normalizes_to_lowercase() {
        let id = ReferenceId::parse("507F1F77BCF86CD799439011").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn rejects_short_identifier() {
        assert_eq!(
            ReferenceId::parse("abc123"),
            Err(ReferenceError::InvalidLength { len: 6 })
        );
    }

    #[test]
    fn rejects_empty_identifier() {
        assert_eq!(
            ReferenceId::parse(""),
            Err(ReferenceError::InvalidLength { len: 0 })
        );
    }

    #[test]
    fn rejects_non_hex_character() {
        let err = ReferenceId::parse("507f1f77bcf86cd79943901g").unwrap_err();
        assert_eq!(
            err,
            ReferenceError::InvalidCharacter {
                found: 'g',
                offset: 23
            }
        );
    }

    #[test]
    fn rejects_multibyte_input_of_matching_length() {
        // 24 chars, but not hex.
        let raw = "ééééééééééééééééééééééé1";
        assert!(ReferenceId::parse(raw).is_err());
    }

    #[test]
    fn serde_roundtrips_through_string() {
        let id = ReferenceId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65a1b2c3d4e5f60718293a4b\"");
        let back: ReferenceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_invalid_string() {
        let result: Result<ReferenceId, _> = serde_json::from_str("\"not-an-id\"");
        assert!(result.is_err());
    }
}
