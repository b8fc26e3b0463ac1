//! Ballot engine: sealed-bid, token-weighted polls.
//!
//! Voters escrow tokens as voting rights, commit a blinded vote
//! `H(option || salt)` weighted by some of those rights, and open it during
//! the reveal window. Weight committed to a poll stays locked until the vote
//! is revealed (or rescued after the poll ends unrevealed); the same rights may
//! back several open polls at once, so a voter's locked amount is the largest
//! single commitment still outstanding.
//!
//! Phases are a pure function of the poll's timestamps:
//! `Commit` → `Reveal` → `Ended`. Nothing closes a poll explicitly.

pub mod engine;
pub mod error;
pub mod event;
pub mod lock_list;
pub mod poll;

pub use engine::{CommitRequest, PlcrVoting};
pub use error::VotingError;
pub use event::VotingEvent;
pub use lock_list::LockList;
pub use poll::{Ballot, Poll, PollPhase};
