//! Pending parameter change.

use serde::{Deserialize, Serialize};
use tcr_types::{Address, ParamKey, PollId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamProposal {
    pub key: ParamKey,
    pub value: u128,
    pub owner: Address,
    pub deposit: u128,
    /// `0` while unchallenged.
    pub challenge_id: PollId,
    /// End of the apply stage.
    pub app_expiry: Timestamp,
    /// After this the proposal can only be refunded.
    pub process_by: Timestamp,
}

impl ParamProposal {
    pub fn is_challenged(&self) -> bool {
        self.challenge_id != 0
    }

    /// Unchallenged, past its apply stage and not yet stale.
    pub fn can_be_set(&self, now: Timestamp) -> bool {
        !self.is_challenged() && self.app_expiry <= now && now < self.process_by
    }
}
