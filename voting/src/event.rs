//! Events recorded by the ballot engine.

use serde::{Deserialize, Serialize};
use tcr_types::{Address, PollId, Timestamp, VoteOption};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingEvent {
    PollCreated {
        poll_id: PollId,
        vote_quorum: u128,
        commit_end: Timestamp,
        reveal_end: Timestamp,
    },
    VoteCommitted {
        poll_id: PollId,
        voter: Address,
        num_tokens: u128,
    },
    VoteRevealed {
        poll_id: PollId,
        voter: Address,
        option: VoteOption,
        num_tokens: u128,
        votes_for: u128,
        votes_against: u128,
    },
    VotingRightsGranted {
        voter: Address,
        amount: u128,
    },
    VotingRightsWithdrawn {
        voter: Address,
        amount: u128,
    },
    TokensRescued {
        poll_id: PollId,
        voter: Address,
    },
}
