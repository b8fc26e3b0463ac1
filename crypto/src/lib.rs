//! Hashing primitives for the token-curated registry.
//!
//! - **Blake2b-256** for listing fingerprints and proposal identifiers
//! - Sealed vote commitments: `H(option || salt)`, opened during the reveal window

pub mod commitment;
pub mod hash;

pub use commitment::{commit_vote_hash, verify_commitment};
pub use hash::{blake2b_256, blake2b_256_multi, listing_hash, proposal_id};
