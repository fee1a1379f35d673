//! Validity classification of a decoded broadcast.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal classification assigned once at decode time.
///
/// Exactly one tag applies per record. Unpack failures take precedence over
/// the lock check, which takes precedence over `Valid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validity {
    /// Structurally sound and the feed is not locked
    #[serde(rename = "Valid")]
    Valid,

    /// Payload did not match the wire layout; no fields are reported
    #[serde(rename = "Invalid: could not unpack")]
    CouldNotUnpack,

    /// Payload is sound but its feed is locked; fields are still reported
    #[serde(rename = "Invalid: address is locked")]
    AddressLocked,
}

impl Validity {
    /// Persisted string form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::CouldNotUnpack => "Invalid: could not unpack",
            Self::AddressLocked => "Invalid: address is locked",
        }
    }

    /// True only for [`Validity::Valid`]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_persisted_strings() {
        assert_eq!(Validity::Valid.to_string(), "Valid");
        assert_eq!(Validity::CouldNotUnpack.to_string(), "Invalid: could not unpack");
        assert_eq!(Validity::AddressLocked.to_string(), "Invalid: address is locked");
    }

    #[test]
    fn only_valid_is_valid() {
        assert!(Validity::Valid.is_valid());
        assert!(!Validity::CouldNotUnpack.is_valid());
        assert!(!Validity::AddressLocked.is_valid());
    }
}
