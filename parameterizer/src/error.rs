use tcr_token::TokenError;
use tcr_types::{ErrorKind, ParamKey, PollId, PropId};
use tcr_voting::VotingError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterizerError {
    #[error("proposal {0} not found")]
    ProposalNotFound(PropId),

    #[error("proposal {0} already exists")]
    ProposalExists(PropId),

    #[error("deposit {deposit} is below the required {required}")]
    InsufficientDeposit { deposit: u128, required: u128 },

    #[error("{key} is already {value}")]
    NoChange { key: ParamKey, value: u128 },

    #[error("{value} is not a valid value for {key}")]
    InvalidValue { key: ParamKey, value: u128 },

    #[error("proposal {0} is already challenged")]
    AlreadyChallenged(PropId),

    #[error("a challenge of proposal {0} would end after it goes stale")]
    ChallengeWindowClosed(PropId),

    #[error("proposal {0} cannot be processed yet")]
    NotReadyToProcess(PropId),

    #[error("challenge {0} not found")]
    ChallengeNotFound(PollId),

    #[error("challenge {0} is not resolved")]
    NotResolved(PollId),

    #[error("{voter} already claimed the reward for challenge {challenge_id}")]
    AlreadyClaimed { voter: String, challenge_id: PollId },

    #[error("voting error: {0}")]
    Voting(#[from] VotingError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("arithmetic overflow")]
    Overflow,
}

impl ParameterizerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProposalNotFound(_) | Self::ChallengeNotFound(_) => ErrorKind::NotFound,
            Self::ProposalExists(_)
            | Self::NoChange { .. }
            | Self::InvalidValue { .. }
            | Self::AlreadyChallenged(_)
            | Self::ChallengeWindowClosed(_)
            | Self::NotReadyToProcess(_)
            | Self::NotResolved(_)
            | Self::AlreadyClaimed { .. } => ErrorKind::InvalidState,
            Self::InsufficientDeposit { .. } => ErrorKind::InsufficientFunds,
            Self::Voting(e) => e.kind(),
            Self::Token(e) => e.kind(),
            Self::Overflow => ErrorKind::Invariant,
        }
    }
}
