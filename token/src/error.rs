//! Token-specific errors.

use tcr_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance for {owner}: need {needed}, have {available}")]
    InsufficientBalance {
        owner: String,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance for {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        spender: String,
        needed: u128,
        available: u128,
    },

    #[error("{caller} is not the supply oracle")]
    NotOracle { caller: String },

    #[error("arithmetic overflow in token accounting")]
    Overflow,
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientBalance { .. } | Self::InsufficientAllowance { .. } => {
                ErrorKind::InsufficientFunds
            }
            Self::NotOracle { .. } => ErrorKind::Unauthorized,
            Self::Overflow => ErrorKind::Invariant,
        }
    }
}
