//! Registry entries.

use serde::{Deserialize, Serialize};
use tcr_types::{Address, PollId, Timestamp};

/// Observable state of a listing, derived from its fields and the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    /// Apply stage still running.
    Applied,
    /// Apply stage over without a challenge; `update_status` will whitelist it.
    AwaitingWhitelist,
    Whitelisted,
    Challenged,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub owner: Address,
    pub application_expiry: Timestamp,
    pub whitelisted: bool,
    /// Tokens not currently staked in a challenge.
    pub unstaked_deposit: u128,
    /// `0` when no challenge is open.
    pub challenge_id: PollId,
    pub data: String,
}

impl Listing {
    pub fn is_challenged(&self) -> bool {
        self.challenge_id != 0
    }

    pub fn status(&self, now: Timestamp) -> ListingStatus {
        if self.is_challenged() {
            ListingStatus::Challenged
        } else if self.whitelisted {
            ListingStatus::Whitelisted
        } else if now < self.application_expiry {
            ListingStatus::Applied
        } else {
            ListingStatus::AwaitingWhitelist
        }
    }
}
