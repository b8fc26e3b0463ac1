//! Partial-lock commit-reveal voting engine.

use crate::error::VotingError;
use crate::event::VotingEvent;
use crate::lock_list::LockList;
use crate::poll::{Ballot, Poll, PollPhase};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tcr_crypto::verify_commitment;
use tcr_token::TokenLedger;
use tcr_types::{Address, PollId, SecretHash, Timestamp, VoteOption};

/// One entry of a batched commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitRequest {
    pub poll_id: PollId,
    pub secret_hash: SecretHash,
    pub num_tokens: u128,
    pub prev_poll_id: PollId,
}

/// The ballot engine.
///
/// Holds escrowed voting rights under its own `address` on the token ledger.
/// Poll ids start at 1; `0` is reserved for "no poll".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlcrVoting {
    address: Address,
    poll_nonce: PollId,
    polls: HashMap<PollId, Poll>,
    vote_token_balance: HashMap<Address, u128>,
    locks: HashMap<Address, LockList>,
    #[serde(skip)]
    events: Vec<VotingEvent>,
}

impl PlcrVoting {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            poll_nonce: 0,
            polls: HashMap::new(),
            vote_token_balance: HashMap::new(),
            locks: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Escrow account holding voting rights.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Drain the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<VotingEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Poll lifecycle ──────────────────────────────────────────────────

    /// Open a poll whose commit window starts now.
    pub fn start_poll(
        &mut self,
        vote_quorum: u128,
        commit_duration: u64,
        reveal_duration: u64,
        now: Timestamp,
    ) -> Result<PollId, VotingError> {
        if commit_duration == 0 || reveal_duration == 0 {
            return Err(VotingError::InvalidDuration);
        }
        if vote_quorum > 100 {
            return Err(VotingError::InvalidQuorum(vote_quorum));
        }
        let commit_end = now
            .checked_add_secs(commit_duration)
            .ok_or(VotingError::Overflow)?;
        let reveal_end = commit_end
            .checked_add_secs(reveal_duration)
            .ok_or(VotingError::Overflow)?;
        let poll_id = self.poll_nonce.checked_add(1).ok_or(VotingError::Overflow)?;

        self.poll_nonce = poll_id;
        self.polls
            .insert(poll_id, Poll::new(commit_end, reveal_end, vote_quorum));
        tracing::info!(poll_id, vote_quorum, %commit_end, %reveal_end, "poll started");
        self.events.push(VotingEvent::PollCreated {
            poll_id,
            vote_quorum,
            commit_end,
            reveal_end,
        });
        Ok(poll_id)
    }

    // ── Voting rights ───────────────────────────────────────────────────

    /// Move `amount` tokens from `voter` into escrow as voting rights.
    ///
    /// The voter must have approved this engine's address for `amount`.
    pub fn request_voting_rights(
        &mut self,
        token: &mut dyn TokenLedger,
        voter: &Address,
        amount: u128,
    ) -> Result<(), VotingError> {
        let balance = self
            .voting_rights(voter)
            .checked_add(amount)
            .ok_or(VotingError::Overflow)?;
        token.transfer_from(&self.address, voter, &self.address, amount)?;
        self.vote_token_balance.insert(voter.clone(), balance);
        tracing::debug!(%voter, amount, "voting rights granted");
        self.events.push(VotingEvent::VotingRightsGranted {
            voter: voter.clone(),
            amount,
        });
        Ok(())
    }

    /// Return `amount` unlocked voting rights to the voter's token balance.
    pub fn withdraw_voting_rights(
        &mut self,
        token: &mut dyn TokenLedger,
        voter: &Address,
        amount: u128,
    ) -> Result<(), VotingError> {
        let balance = self.voting_rights(voter);
        let available = balance.saturating_sub(self.locked_tokens(voter));
        if available < amount {
            return Err(VotingError::TokensLocked {
                available,
                requested: amount,
            });
        }
        token.transfer(&self.address, voter, amount)?;
        self.vote_token_balance
            .insert(voter.clone(), balance - amount);
        tracing::debug!(%voter, amount, "voting rights withdrawn");
        self.events.push(VotingEvent::VotingRightsWithdrawn {
            voter: voter.clone(),
            amount,
        });
        Ok(())
    }

    /// Unlock tokens committed to an ended poll that the voter never revealed.
    pub fn rescue_tokens(
        &mut self,
        voter: &Address,
        poll_id: PollId,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        self.check_rescue(voter, poll_id, now)?;
        self.unlock_unrevealed(voter, poll_id);
        Ok(())
    }

    /// Rescue several polls. Every poll is checked before any lock is
    /// released, so a failure leaves all locks in place.
    pub fn rescue_tokens_in_polls(
        &mut self,
        voter: &Address,
        poll_ids: &[PollId],
        now: Timestamp,
    ) -> Result<(), VotingError> {
        let mut seen = HashSet::with_capacity(poll_ids.len());
        for &poll_id in poll_ids {
            if !seen.insert(poll_id) {
                return Err(VotingError::NothingToRescue(poll_id));
            }
            self.check_rescue(voter, poll_id, now)?;
        }
        for &poll_id in poll_ids {
            self.unlock_unrevealed(voter, poll_id);
        }
        Ok(())
    }

    fn check_rescue(&self, voter: &Address, poll_id: PollId, now: Timestamp) -> Result<(), VotingError> {
        let poll = self.poll_ref(poll_id)?;
        if poll.phase(now) != PollPhase::Ended {
            return Err(VotingError::PollNotEnded(poll_id));
        }
        let unrevealed = poll
            .ballots
            .get(voter)
            .is_some_and(|b| b.revealed.is_none());
        let locked = self
            .locks
            .get(voter)
            .is_some_and(|l| l.contains(poll_id));
        if !unrevealed || !locked {
            return Err(VotingError::NothingToRescue(poll_id));
        }
        Ok(())
    }

    fn unlock_unrevealed(&mut self, voter: &Address, poll_id: PollId) {
        if let Some(list) = self.locks.get_mut(voter) {
            list.remove(poll_id);
        }
        tracing::info!(poll_id, %voter, "tokens rescued from unrevealed commitment");
        self.events.push(VotingEvent::TokensRescued {
            poll_id,
            voter: voter.clone(),
        });
    }

    // ── Commit / reveal ─────────────────────────────────────────────────

    /// Commit a blinded vote of `num_tokens` weight.
    ///
    /// `prev_poll_id` names the node of the voter's lock list after which this
    /// commitment is inserted (see [`PlcrVoting::insert_point_for`]). Voting
    /// rights short of `num_tokens` are requested from the voter's balance.
    pub fn commit_vote(
        &mut self,
        token: &mut dyn TokenLedger,
        voter: &Address,
        poll_id: PollId,
        secret_hash: SecretHash,
        num_tokens: u128,
        prev_poll_id: PollId,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        self.check_commit(voter, poll_id, secret_hash, num_tokens, now)?;
        let mut list = self.locks.get(voter).cloned().unwrap_or_default();
        place_commit(&mut list, prev_poll_id, poll_id, num_tokens)?;
        self.top_up_rights(token, voter, num_tokens)?;

        self.locks.insert(voter.clone(), list);
        self.record_ballot(voter, poll_id, secret_hash, num_tokens);
        Ok(())
    }

    /// Commit several votes in order, all or nothing.
    ///
    /// Each request may name a poll committed earlier in the same batch as
    /// its `prev_poll_id`. Voting rights are topped up once, to the largest
    /// weight in the batch, after every request has been checked.
    pub fn commit_votes(
        &mut self,
        token: &mut dyn TokenLedger,
        voter: &Address,
        requests: &[CommitRequest],
        now: Timestamp,
    ) -> Result<(), VotingError> {
        let mut list = self.locks.get(voter).cloned().unwrap_or_default();
        let mut seen = HashSet::with_capacity(requests.len());
        let mut needed = 0u128;
        for req in requests {
            self.check_commit(voter, req.poll_id, req.secret_hash, req.num_tokens, now)?;
            if !seen.insert(req.poll_id) {
                return Err(VotingError::AlreadyCommitted {
                    voter: voter.to_string(),
                    poll_id: req.poll_id,
                });
            }
            place_commit(&mut list, req.prev_poll_id, req.poll_id, req.num_tokens)?;
            needed = needed.max(req.num_tokens);
        }
        self.top_up_rights(token, voter, needed)?;

        self.locks.insert(voter.clone(), list);
        for req in requests {
            self.record_ballot(voter, req.poll_id, req.secret_hash, req.num_tokens);
        }
        Ok(())
    }

    fn check_commit(
        &self,
        voter: &Address,
        poll_id: PollId,
        secret_hash: SecretHash,
        num_tokens: u128,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        let poll = self.poll_ref(poll_id)?;
        if poll.phase(now) != PollPhase::Commit {
            return Err(VotingError::NotCommitPeriod(poll_id));
        }
        if poll.ballots.contains_key(voter) {
            return Err(VotingError::AlreadyCommitted {
                voter: voter.to_string(),
                poll_id,
            });
        }
        if secret_hash.is_zero() {
            return Err(VotingError::EmptyCommitment);
        }
        if num_tokens == 0 {
            return Err(VotingError::ZeroWeight);
        }
        Ok(())
    }

    fn top_up_rights(
        &mut self,
        token: &mut dyn TokenLedger,
        voter: &Address,
        num_tokens: u128,
    ) -> Result<(), VotingError> {
        let rights = self.voting_rights(voter);
        if rights < num_tokens {
            self.request_voting_rights(token, voter, num_tokens - rights)?;
        }
        Ok(())
    }

    fn record_ballot(&mut self, voter: &Address, poll_id: PollId, secret_hash: SecretHash, num_tokens: u128) {
        if let Some(poll) = self.polls.get_mut(&poll_id) {
            poll.ballots.insert(
                voter.clone(),
                Ballot {
                    commit_hash: secret_hash,
                    num_tokens,
                    revealed: None,
                },
            );
        }
        tracing::info!(poll_id, %voter, num_tokens, "vote committed");
        self.events.push(VotingEvent::VoteCommitted {
            poll_id,
            voter: voter.clone(),
            num_tokens,
        });
    }

    /// Open a commitment, adding its weight to the chosen side.
    pub fn reveal_vote(
        &mut self,
        voter: &Address,
        poll_id: PollId,
        option: VoteOption,
        salt: u64,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        let poll = self.poll_ref(poll_id)?;
        if poll.phase(now) != PollPhase::Reveal {
            return Err(VotingError::NotRevealPeriod(poll_id));
        }
        let ballot = poll.ballots.get(voter).ok_or_else(|| VotingError::NotCommitted {
            voter: voter.to_string(),
            poll_id,
        })?;
        if ballot.revealed.is_some() {
            return Err(VotingError::AlreadyRevealed {
                voter: voter.to_string(),
                poll_id,
            });
        }
        if !verify_commitment(&ballot.commit_hash, option, salt) {
            return Err(VotingError::CommitMismatch);
        }
        let num_tokens = ballot.num_tokens;
        let (votes_for, votes_against) = match option {
            VoteOption::For => (
                poll.votes_for
                    .checked_add(num_tokens)
                    .ok_or(VotingError::Overflow)?,
                poll.votes_against,
            ),
            VoteOption::Against => (
                poll.votes_for,
                poll.votes_against
                    .checked_add(num_tokens)
                    .ok_or(VotingError::Overflow)?,
            ),
        };

        if let Some(poll) = self.polls.get_mut(&poll_id) {
            poll.votes_for = votes_for;
            poll.votes_against = votes_against;
            if let Some(ballot) = poll.ballots.get_mut(voter) {
                ballot.revealed = Some(option);
            }
        }
        if let Some(list) = self.locks.get_mut(voter) {
            list.remove(poll_id);
        }
        tracing::info!(poll_id, %voter, %option, num_tokens, votes_for, votes_against, "vote revealed");
        self.events.push(VotingEvent::VoteRevealed {
            poll_id,
            voter: voter.clone(),
            option,
            num_tokens,
            votes_for,
            votes_against,
        });
        Ok(())
    }

    // ── Outcome ─────────────────────────────────────────────────────────

    /// Whether the poll passed. Only defined once the reveal window closed.
    pub fn is_passed(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        let poll = self.ended_poll(poll_id, now)?;
        poll.tally_passes().ok_or(VotingError::Overflow)
    }

    /// Revealed weight on the winning side of an ended poll.
    pub fn total_winning_tokens(&self, poll_id: PollId, now: Timestamp) -> Result<u128, VotingError> {
        let passed = self.is_passed(poll_id, now)?;
        let poll = self.poll_ref(poll_id)?;
        Ok(poll.votes_on(VoteOption::winning(passed)))
    }

    /// Weight a voter revealed on the winning side. `salt` must open the
    /// voter's commitment to the winning option.
    pub fn num_passing_tokens(
        &self,
        voter: &Address,
        poll_id: PollId,
        salt: u64,
        now: Timestamp,
    ) -> Result<u128, VotingError> {
        let passed = self.is_passed(poll_id, now)?;
        let poll = self.poll_ref(poll_id)?;
        let ballot = poll
            .ballots
            .get(voter)
            .filter(|b| b.revealed.is_some())
            .ok_or_else(|| VotingError::NotRevealed {
                voter: voter.to_string(),
                poll_id,
            })?;
        if !verify_commitment(&ballot.commit_hash, VoteOption::winning(passed), salt) {
            return Err(VotingError::NotOnWinningSide);
        }
        Ok(ballot.num_tokens)
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn poll(&self, poll_id: PollId) -> Option<&Poll> {
        self.polls.get(&poll_id)
    }

    pub fn poll_exists(&self, poll_id: PollId) -> bool {
        self.polls.contains_key(&poll_id)
    }

    pub fn phase(&self, poll_id: PollId, now: Timestamp) -> Result<PollPhase, VotingError> {
        Ok(self.poll_ref(poll_id)?.phase(now))
    }

    pub fn commit_period_active(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        Ok(self.phase(poll_id, now)? == PollPhase::Commit)
    }

    pub fn reveal_period_active(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        Ok(self.phase(poll_id, now)? == PollPhase::Reveal)
    }

    pub fn poll_ended(&self, poll_id: PollId, now: Timestamp) -> Result<bool, VotingError> {
        Ok(self.phase(poll_id, now)? == PollPhase::Ended)
    }

    pub fn did_commit(&self, voter: &Address, poll_id: PollId) -> Result<bool, VotingError> {
        Ok(self.poll_ref(poll_id)?.ballots.contains_key(voter))
    }

    pub fn did_reveal(&self, voter: &Address, poll_id: PollId) -> Result<bool, VotingError> {
        Ok(self
            .poll_ref(poll_id)?
            .ballots
            .get(voter)
            .is_some_and(|b| b.revealed.is_some()))
    }

    pub fn commit_hash(&self, voter: &Address, poll_id: PollId) -> Option<SecretHash> {
        self.ballot(voter, poll_id).map(|b| b.commit_hash)
    }

    pub fn num_tokens(&self, voter: &Address, poll_id: PollId) -> u128 {
        self.ballot(voter, poll_id).map(|b| b.num_tokens).unwrap_or(0)
    }

    /// Escrowed voting rights, locked or not.
    pub fn voting_rights(&self, voter: &Address) -> u128 {
        self.vote_token_balance.get(voter).copied().unwrap_or(0)
    }

    /// Voting rights that cannot be withdrawn right now.
    pub fn locked_tokens(&self, voter: &Address) -> u128 {
        self.locks.get(voter).map(|l| l.locked()).unwrap_or(0)
    }

    /// The `prev_poll_id` to pass to `commit_vote` for a commitment of
    /// `num_tokens`.
    pub fn insert_point_for(&self, voter: &Address, num_tokens: u128) -> PollId {
        self.locks
            .get(voter)
            .map(|l| l.insert_point(num_tokens))
            .unwrap_or(0)
    }

    /// Whether `num_tokens` may be linked between `prev` and `next`.
    pub fn valid_position(&self, prev: PollId, next: PollId, voter: &Address, num_tokens: u128) -> bool {
        match self.locks.get(voter) {
            Some(list) => list.valid_position(prev, next, num_tokens),
            None => prev == 0 && next == 0,
        }
    }

    pub fn lock_list(&self, voter: &Address) -> Option<&LockList> {
        self.locks.get(voter)
    }

    pub fn poll_count(&self) -> u64 {
        self.poll_nonce
    }

    fn ballot(&self, voter: &Address, poll_id: PollId) -> Option<&Ballot> {
        self.polls.get(&poll_id).and_then(|p| p.ballots.get(voter))
    }

    fn poll_ref(&self, poll_id: PollId) -> Result<&Poll, VotingError> {
        self.polls
            .get(&poll_id)
            .ok_or(VotingError::PollNotFound(poll_id))
    }

    fn ended_poll(&self, poll_id: PollId, now: Timestamp) -> Result<&Poll, VotingError> {
        let poll = self.poll_ref(poll_id)?;
        if poll.phase(now) != PollPhase::Ended {
            return Err(VotingError::PollNotEnded(poll_id));
        }
        Ok(poll)
    }
}

/// Insert `poll_id` into `list` after `prev_poll_id`, keeping weights ordered.
fn place_commit(
    list: &mut LockList,
    prev_poll_id: PollId,
    poll_id: PollId,
    num_tokens: u128,
) -> Result<(), VotingError> {
    let invalid = VotingError::InvalidPosition {
        prev: prev_poll_id,
        num_tokens,
    };
    if prev_poll_id != 0 && !list.contains(prev_poll_id) {
        return Err(invalid);
    }
    let next_poll_id = list.next(prev_poll_id);
    if !list.insert(prev_poll_id, poll_id, next_poll_id, num_tokens) {
        return Err(invalid);
    }
    Ok(())
}
