//! Vote options and poll identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a poll in the ballot engine. Zero means "no poll".
pub type PollId = u64;

/// The option a voter commits to.
///
/// `For` supports the subject of the poll (keep the listing, accept the
/// proposal); `Against` sides with the challenger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    Against,
    For,
}

impl VoteOption {
    /// The integer encoding hashed into commitments (1 = for, 0 = against).
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Against => 0,
            Self::For => 1,
        }
    }

    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Against),
            1 => Some(Self::For),
            _ => None,
        }
    }

    /// The option that won a poll with the given outcome.
    pub fn winning(passed: bool) -> Self {
        if passed {
            Self::For
        } else {
            Self::Against
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Against => write!(f, "against"),
            Self::For => write!(f, "for"),
        }
    }
}
