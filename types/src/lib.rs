//! Fundamental types for the token-curated registry.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, hashes, timestamps, governed parameter keys, vote options and the
//! error taxonomy every component error maps into.

pub mod address;
pub mod error;
pub mod hash;
pub mod params;
pub mod time;
pub mod vote;

pub use address::Address;
pub use error::ErrorKind;
pub use hash::{HashParseError, ListingHash, PropId, SecretHash};
pub use params::{ParamDefaults, ParamKey, UnknownParamKey};
pub use time::{Clock, SystemClock, Timestamp};
pub use vote::{PollId, VoteOption};
