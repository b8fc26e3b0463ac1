//! Blake2b hashing for listing fingerprints and proposal ids.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use tcr_types::{ListingHash, ParamKey, PropId};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Fingerprint of a listing identity (e.g. a domain name).
pub fn listing_hash(identity: &str) -> ListingHash {
    ListingHash::new(blake2b_256(identity.as_bytes()))
}

/// Identifier of a proposal to set `key` to `value`.
///
/// The key name is length-prefixed so that `(name, value)` pairs cannot
/// collide by shifting bytes between the two parts.
pub fn proposal_id(key: ParamKey, value: u128) -> PropId {
    let name = key.name().as_bytes();
    let len = (name.len() as u32).to_be_bytes();
    PropId::new(blake2b_256_multi(&[&len, name, &value.to_be_bytes()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello registry");
        let h2 = blake2b_256(b"hello registry");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"hello"), blake2b_256(b"world"));
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn listing_hash_is_stable_per_identity() {
        assert_eq!(listing_hash("a.net"), listing_hash("a.net"));
        assert_ne!(listing_hash("a.net"), listing_hash("b.net"));
        assert!(!listing_hash("").is_zero());
    }

    #[test]
    fn proposal_id_depends_on_key_and_value() {
        let a = proposal_id(ParamKey::MinDeposit, 20);
        assert_eq!(a, proposal_id(ParamKey::MinDeposit, 20));
        assert_ne!(a, proposal_id(ParamKey::MinDeposit, 21));
        assert_ne!(a, proposal_id(ParamKey::PMinDeposit, 20));
    }
}
