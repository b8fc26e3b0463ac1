//! Challenge records and reward-claim bookkeeping.

use crate::reward;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tcr_types::Address;

/// A challenge against a listing or parameter proposal, keyed by its poll id.
///
/// Kept after resolution as the record voters claim against.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Challenge {
    pub challenger: Address,
    /// Escrowed by each side.
    pub stake: u128,
    /// Voter pool. Zeroed at resolution if no winning weight was revealed.
    pub reward_pool: u128,
    /// Supply minted into the pool at resolution.
    pub inflation: u128,
    pub resolved: bool,
    pub winning_tokens: u128,
    pub remaining_pool: u128,
    pub remaining_tokens: u128,
    /// Listing deposit floor when the challenge opened. Zero for proposals.
    #[serde(default)]
    pub min_deposit_at_open: u128,
    claimed: HashSet<Address>,
}

impl Challenge {
    pub fn new(challenger: Address, stake: u128, reward_pool: u128) -> Self {
        Self {
            challenger,
            stake,
            reward_pool,
            inflation: 0,
            resolved: false,
            winning_tokens: 0,
            remaining_pool: 0,
            remaining_tokens: 0,
            min_deposit_at_open: 0,
            claimed: HashSet::new(),
        }
    }

    /// Remember the deposit floor in force when the challenge opened.
    pub fn with_min_deposit(mut self, min_deposit: u128) -> Self {
        self.min_deposit_at_open = min_deposit;
        self
    }

    /// How far the deposit floor has risen since the challenge opened.
    pub fn deposit_growth(&self, min_deposit_now: u128) -> u128 {
        min_deposit_now.saturating_sub(self.min_deposit_at_open)
    }

    /// What the winning party receives, given the final winning weight.
    pub fn winner_payout(&self, winning_tokens: u128) -> Option<u128> {
        reward::winner_payout(self.stake, self.reward_pool, winning_tokens)
    }

    /// Fix the outcome. The claimable pool starts at `reward_pool`.
    pub fn resolve(&mut self, winning_tokens: u128) {
        if winning_tokens == 0 {
            self.reward_pool = 0;
        }
        self.resolved = true;
        self.winning_tokens = winning_tokens;
        self.remaining_pool = self.reward_pool;
        self.remaining_tokens = winning_tokens;
    }

    /// Add minted supply to the claimable pool.
    pub fn credit_inflation(&mut self, amount: u128) -> Option<()> {
        self.reward_pool = self.reward_pool.checked_add(amount)?;
        self.remaining_pool = self.remaining_pool.checked_add(amount)?;
        self.inflation = amount;
        Some(())
    }

    /// Payout owed for `voter_tokens` of winning weight, at the current remainders.
    pub fn voter_reward(&self, voter_tokens: u128) -> Option<u128> {
        reward::voter_share(voter_tokens, self.remaining_pool, self.remaining_tokens)
    }

    pub fn has_claimed(&self, voter: &Address) -> bool {
        self.claimed.contains(voter)
    }

    /// Mark `voter` paid and shrink the remainders.
    pub fn record_claim(&mut self, voter: &Address, voter_tokens: u128, reward: u128) {
        self.remaining_tokens = self.remaining_tokens.saturating_sub(voter_tokens);
        self.remaining_pool = self.remaining_pool.saturating_sub(reward);
        self.claimed.insert(voter.clone());
    }
}
