//! Polls and per-voter ballots.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tcr_types::{Address, SecretHash, Timestamp, VoteOption};

/// Observable phase of a poll, derived from its timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollPhase {
    /// `now < commit_end`: blinded votes accepted.
    Commit,
    /// `commit_end <= now < reveal_end`: commitments may be opened.
    Reveal,
    /// `now >= reveal_end`: the tally is final.
    Ended,
}

/// One voter's committed (and possibly revealed) vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub commit_hash: SecretHash,
    pub num_tokens: u128,
    pub revealed: Option<VoteOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Poll {
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
    /// Percentage of votes cast that must be "for" for the poll to pass.
    pub vote_quorum: u128,
    pub votes_for: u128,
    pub votes_against: u128,
    pub ballots: HashMap<Address, Ballot>,
}

impl Poll {
    pub fn new(commit_end: Timestamp, reveal_end: Timestamp, vote_quorum: u128) -> Self {
        Self {
            commit_end,
            reveal_end,
            vote_quorum,
            votes_for: 0,
            votes_against: 0,
            ballots: HashMap::new(),
        }
    }

    pub fn phase(&self, now: Timestamp) -> PollPhase {
        if now < self.commit_end {
            PollPhase::Commit
        } else if now < self.reveal_end {
            PollPhase::Reveal
        } else {
            PollPhase::Ended
        }
    }

    /// Tally outcome: the "for" side must beat "against" outright and hold more
    /// than `vote_quorum` percent of the revealed weight. Ties never pass.
    ///
    /// Returns `None` if the comparison overflows `u128`.
    pub fn tally_passes(&self) -> Option<bool> {
        if self.votes_for <= self.votes_against {
            return Some(false);
        }
        let total = self.votes_for.checked_add(self.votes_against)?;
        let lhs = self.votes_for.checked_mul(100)?;
        let rhs = total.checked_mul(self.vote_quorum)?;
        Some(lhs > rhs)
    }

    /// Revealed weight on the given side.
    pub fn votes_on(&self, option: VoteOption) -> u128 {
        match option {
            VoteOption::For => self.votes_for,
            VoteOption::Against => self.votes_against,
        }
    }
}
