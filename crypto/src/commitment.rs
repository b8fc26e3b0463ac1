//! Sealed vote commitments.

use crate::hash::blake2b_256_multi;
use tcr_types::{SecretHash, VoteOption};

/// Commitment submitted during the commit window: `H(option || salt)`.
pub fn commit_vote_hash(option: VoteOption, salt: u64) -> SecretHash {
    SecretHash::new(blake2b_256_multi(&[&[option.as_u8()], &salt.to_be_bytes()]))
}

/// Whether `(option, salt)` opens `commitment`.
pub fn verify_commitment(commitment: &SecretHash, option: VoteOption, salt: u64) -> bool {
    commit_vote_hash(option, salt) == *commitment
}
