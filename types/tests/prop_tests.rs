use proptest::prelude::*;

use tcr_types::{ListingHash, ParamKey, PropId, Timestamp, VoteOption};

proptest! {
    /// ListingHash roundtrip: new -> as_bytes -> new produces identical hash.
    #[test]
    fn listing_hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ListingHash::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
    }

    /// Hex display parses back into the same identifier.
    #[test]
    fn prop_id_display_parse(bytes in prop::array::uniform32(0u8..)) {
        let id = PropId::new(bytes);
        let parsed: PropId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// ListingHash::is_zero is true only for all-zero bytes.
    #[test]
    fn listing_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = ListingHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// ListingHash bincode serialization roundtrip.
    #[test]
    fn listing_hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = ListingHash::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: ListingHash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, hash);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired_correct(
        start in 0u64..500_000,
        duration in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let t = Timestamp::new(start);
        let now = Timestamp::new(start.saturating_add(offset));
        prop_assert_eq!(t.has_expired(duration, now), offset >= duration);
    }

    /// checked_add_secs only fails on u64 overflow.
    #[test]
    fn timestamp_checked_add(start in 0u64..u64::MAX, secs in 0u64..u64::MAX) {
        let result = Timestamp::new(start).checked_add_secs(secs);
        prop_assert_eq!(result.map(|t| t.as_secs()), start.checked_add(secs));
    }

    /// Percentage keys accept exactly 0..=100.
    #[test]
    fn percentage_bounds(value in 0u128..1_000) {
        prop_assert_eq!(ParamKey::VoteQuorum.accepts(value), value <= 100);
    }

    /// Only 0 and 1 decode as vote options.
    #[test]
    fn vote_option_decoding(raw in 0u8..=255) {
        let decoded = VoteOption::from_u8(raw);
        prop_assert_eq!(decoded.is_some(), raw <= 1);
        if let Some(option) = decoded {
            prop_assert_eq!(option.as_u8(), raw);
        }
    }
}
