//! Oraclized token, the supply ledger the registry settles against.
//!
//! The core only consumes the [`TokenLedger`] capability: balances,
//! transfers, allowances, and a supply that a single designated principal
//! (the supply oracle) may grow or shrink. [`OraclizedToken`] is the in-memory
//! implementation used by deployments and tests.

pub mod authority;
pub mod engine;
pub mod error;
pub mod ledger;

pub use authority::Authority;
pub use engine::{OraclizedToken, TokenMetadata};
pub use error::TokenError;
pub use ledger::TokenLedger;
