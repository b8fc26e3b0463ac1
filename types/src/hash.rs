//! 32-byte hash identifiers for listings, proposals and vote commitments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse a hex-encoded 32-byte hash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashParseError {
    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("expected 32 bytes, got {0}")]
    Length(usize),
}

macro_rules! hash_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}\u{2026})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = HashParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(raw).map_err(|e| HashParseError::Hex(e.to_string()))?;
                let arr: [u8; 32] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| HashParseError::Length(bytes.len()))?;
                Ok(Self(arr))
            }
        }
    };
}

hash_type!(
    /// Content fingerprint of a listing (hash of the listing identity).
    ListingHash
);

hash_type!(
    /// Identifier of a parameter proposal (hash of key name and value).
    PropId
);

hash_type!(
    /// A blinded vote: hash of the vote option and the voter's salt.
    SecretHash
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        let hash = ListingHash::new([0xab; 32]);
        let parsed: ListingHash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn parse_accepts_0x_prefix() {
        let hex = format!("0x{}", "01".repeat(32));
        let parsed: PropId = hex.parse().unwrap();
        assert_eq!(parsed, PropId::new([1; 32]));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!("abcd".parse::<SecretHash>(), Err(HashParseError::Length(2)));
    }

    #[test]
    fn debug_is_abbreviated() {
        let hash = SecretHash::new([0xff; 32]);
        assert_eq!(format!("{hash:?}"), "SecretHash(ffffffff\u{2026})");
    }
}
