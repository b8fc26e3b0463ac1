use serde::{Deserialize, Serialize};
use tcr_types::{Address, ListingHash, PollId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    Application {
        listing: ListingHash,
        owner: Address,
        deposit: u128,
        app_end: Timestamp,
        data: String,
    },
    ChallengeOpened {
        listing: ListingHash,
        challenge_id: PollId,
        challenger: Address,
        stake: u128,
        data: String,
    },
    Deposit {
        listing: ListingHash,
        added: u128,
        new_total: u128,
    },
    Withdrawal {
        listing: ListingHash,
        withdrew: u128,
        new_total: u128,
    },
    ApplicationWhitelisted {
        listing: ListingHash,
    },
    /// A pending application was dropped.
    ApplicationRemoved {
        listing: ListingHash,
    },
    /// A whitelisted listing was dropped.
    ListingRemoved {
        listing: ListingHash,
    },
    /// The owner exited.
    ListingWithdrawn {
        listing: ListingHash,
    },
    /// Challenged while its unstaked deposit was below the minimum.
    TouchAndRemoved {
        listing: ListingHash,
    },
    /// The listing survived its challenge.
    ChallengeFailed {
        listing: ListingHash,
        challenge_id: PollId,
        reward_pool: u128,
        winning_tokens: u128,
        inflation: u128,
    },
    ChallengeSucceeded {
        listing: ListingHash,
        challenge_id: PollId,
        reward_pool: u128,
        winning_tokens: u128,
        inflation: u128,
    },
    RewardClaimed {
        challenge_id: PollId,
        voter: Address,
        reward: u128,
    },
}
