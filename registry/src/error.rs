use tcr_token::TokenError;
use tcr_types::{ErrorKind, ListingHash, PollId};
use tcr_voting::VotingError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("listing {0} not found")]
    NoListing(ListingHash),

    #[error("listing {0} is already whitelisted")]
    AlreadyListed(ListingHash),

    #[error("an application for {0} already exists")]
    AlreadyApplied(ListingHash),

    #[error("deposit {deposit} is below the required {required}")]
    InsufficientDeposit { deposit: u128, required: u128 },

    #[error("withdrawal would leave {remaining}, below the minimum deposit {required}")]
    WithdrawBelowMinimum { remaining: u128, required: u128 },

    #[error("{caller} does not own listing {listing}")]
    NotOwner { caller: String, listing: ListingHash },

    #[error("listing {0} is not whitelisted")]
    NotWhitelisted(ListingHash),

    #[error("listing {0} is under challenge")]
    UnderChallenge(ListingHash),

    #[error("listing {0} is already challenged")]
    AlreadyChallenged(ListingHash),

    #[error("listing {0} has nothing to resolve yet")]
    NotReadyToResolve(ListingHash),

    #[error("challenge {0} is already resolved")]
    AlreadyResolved(PollId),

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

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoListing(_) | Self::ChallengeNotFound(_) => ErrorKind::NotFound,
            Self::InsufficientDeposit { .. } | Self::WithdrawBelowMinimum { .. } => {
                ErrorKind::InsufficientFunds
            }
            Self::NotOwner { .. } => ErrorKind::Unauthorized,
            Self::AlreadyListed(_)
            | Self::AlreadyApplied(_)
            | Self::NotWhitelisted(_)
            | Self::UnderChallenge(_)
            | Self::AlreadyChallenged(_)
            | Self::NotReadyToResolve(_)
            | Self::AlreadyResolved(_)
            | Self::NotResolved(_)
            | Self::AlreadyClaimed { .. } => ErrorKind::InvalidState,
            Self::Voting(e) => e.kind(),
            Self::Token(e) => e.kind(),
            Self::Overflow => ErrorKind::Invariant,
        }
    }
}
