//! Ballot engine errors.

use tcr_token::TokenError;
use tcr_types::{ErrorKind, PollId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VotingError {
    #[error("poll {0} not found")]
    PollNotFound(PollId),

    #[error("commit and reveal durations must be non-zero")]
    InvalidDuration,

    #[error("vote quorum {0} exceeds 100 percent")]
    InvalidQuorum(u128),

    #[error("poll {0} is not in its commit period")]
    NotCommitPeriod(PollId),

    #[error("poll {0} is not in its reveal period")]
    NotRevealPeriod(PollId),

    #[error("poll {0} has not ended")]
    PollNotEnded(PollId),

    #[error("{voter} already committed a vote to poll {poll_id}")]
    AlreadyCommitted { voter: String, poll_id: PollId },

    #[error("{voter} did not commit a vote to poll {poll_id}")]
    NotCommitted { voter: String, poll_id: PollId },

    #[error("{voter} already revealed a vote in poll {poll_id}")]
    AlreadyRevealed { voter: String, poll_id: PollId },

    #[error("{voter} did not reveal a vote in poll {poll_id}")]
    NotRevealed { voter: String, poll_id: PollId },

    #[error("revealed option and salt do not match the commitment")]
    CommitMismatch,

    #[error("commitment does not open to the winning option")]
    NotOnWinningSide,

    #[error("secret hash must be non-zero")]
    EmptyCommitment,

    #[error("vote weight must be non-zero")]
    ZeroWeight,

    #[error("invalid insert position after poll {prev} for {num_tokens} tokens")]
    InvalidPosition { prev: PollId, num_tokens: u128 },

    #[error("only {available} voting rights are unlocked, {requested} requested")]
    TokensLocked { available: u128, requested: u128 },

    #[error("no unrevealed tokens locked in poll {0}")]
    NothingToRescue(PollId),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("arithmetic overflow in vote tally")]
    Overflow,
}

impl VotingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PollNotFound(_) => ErrorKind::NotFound,
            Self::InvalidDuration
            | Self::InvalidQuorum(_)
            | Self::NotCommitPeriod(_)
            | Self::NotRevealPeriod(_)
            | Self::PollNotEnded(_)
            | Self::AlreadyCommitted { .. }
            | Self::NotCommitted { .. }
            | Self::AlreadyRevealed { .. }
            | Self::NotRevealed { .. }
            | Self::CommitMismatch
            | Self::NotOnWinningSide
            | Self::EmptyCommitment
            | Self::InvalidPosition { .. }
            | Self::NothingToRescue(_) => ErrorKind::InvalidState,
            Self::ZeroWeight | Self::TokensLocked { .. } => ErrorKind::InsufficientFunds,
            Self::Token(e) => e.kind(),
            Self::Overflow => ErrorKind::Invariant,
        }
    }
}
