//! # Error Types
//!
//! Errors raised by core constructors. Normalization and rendering are
//! total and have no error type of their own.

use thiserror::Error;

/// A string could not be interpreted as the store's native reference type.
///
/// This is expected data variance (callers routinely pass plain user ids),
/// so it is a value to branch on rather than a failure to report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The input does not have the 24-character length of a reference id.
    #[error("reference id must be 24 hex characters, got {len}")]
    InvalidLength {
        /// Length of the rejected input in characters.
        len: usize,
    },

    /// The input has the right length but contains a non-hex character.
    #[error("reference id contains non-hex character {found:?} at offset {offset}")]
    InvalidCharacter {
        /// The offending character.
        found: char,
        /// Byte offset of the offending character.
        offset: usize,
    },
}
