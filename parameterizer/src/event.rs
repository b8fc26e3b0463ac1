use serde::{Deserialize, Serialize};
use tcr_types::{Address, ParamKey, PollId, PropId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterizerEvent {
    ProposalSubmitted {
        prop_id: PropId,
        key: ParamKey,
        value: u128,
        owner: Address,
        deposit: u128,
        app_expiry: Timestamp,
        process_by: Timestamp,
    },
    ProposalChallenged {
        prop_id: PropId,
        challenge_id: PollId,
        challenger: Address,
    },
    ProposalAccepted {
        prop_id: PropId,
        key: ParamKey,
        value: u128,
    },
    ProposalExpired {
        prop_id: PropId,
    },
    /// The proposal survived its challenge.
    ChallengeFailed {
        prop_id: PropId,
        challenge_id: PollId,
        reward_pool: u128,
        winning_tokens: u128,
    },
    ChallengeSucceeded {
        prop_id: PropId,
        challenge_id: PollId,
        reward_pool: u128,
        winning_tokens: u128,
    },
    RewardClaimed {
        challenge_id: PollId,
        voter: Address,
        reward: u128,
    },
}
