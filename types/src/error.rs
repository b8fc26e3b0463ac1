//! Error taxonomy shared across crates.
//!
//! Each component keeps its own `thiserror` enum; every variant maps onto one
//! of these kinds so callers can react to the class of failure without
//! matching component-specific variants.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Operation called on an entity in the wrong lifecycle state.
    InvalidState,
    /// Deposit, balance or allowance below what the operation needs.
    InsufficientFunds,
    /// Caller is not allowed to perform the operation.
    Unauthorized,
    /// Listing, poll, proposal, challenge or key does not exist.
    NotFound,
    /// Arithmetic invariant violated (overflow or underflow).
    Invariant,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidState => "invalid state",
            Self::InsufficientFunds => "insufficient funds",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not found",
            Self::Invariant => "invariant violation",
        };
        f.write_str(s)
    }
}
