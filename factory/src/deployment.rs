//! A running deployment: every component plus the clock, behind one facade.

use crate::error::TcrError;
use crate::event::TcrEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tcr_parameterizer::{ParamContext, Parameterizer};
use tcr_registry::{ChallengeOutcome, ListingStatus, Registry, RegistryContext};
use tcr_store::{load_snapshot, save_snapshot, MetaStore};
use tcr_token::{OraclizedToken, TokenLedger};
use tcr_types::{Address, Clock, ListingHash, ParamKey, PollId, PropId, SecretHash, Timestamp, VoteOption};
use tcr_voting::PlcrVoting;

/// Everything a deployment persists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentState {
    pub name: String,
    pub creator: Address,
    pub token: OraclizedToken,
    pub voting: PlcrVoting,
    pub parameterizer: Parameterizer,
    /// `None` for parameterizer-only deployments.
    pub registry: Option<Registry>,
}

/// Component state plus the clock every call is timed against.
///
/// Mutating calls take the acting party as `caller`.
pub struct Deployment {
    state: DeploymentState,
    clock: Arc<dyn Clock>,
    events: Vec<TcrEvent>,
}

fn snapshot_key(name: &str) -> String {
    format!("deployment/{}", crate::config::slugify(name))
}

impl Deployment {
    pub fn new(state: DeploymentState, clock: Arc<dyn Clock>) -> Self {
        Self {
            state,
            clock,
            events: Vec::new(),
        }
    }

    /// Restore a deployment saved under `name`.
    pub fn load(store: &dyn MetaStore, name: &str, clock: Arc<dyn Clock>) -> Result<Self, TcrError> {
        let state: DeploymentState = load_snapshot(store, &snapshot_key(name))?;
        tracing::info!(name, "deployment loaded");
        Ok(Self::new(state, clock))
    }

    /// Persist the full state as one snapshot. Pending events are not saved.
    pub fn save(&self, store: &dyn MetaStore) -> Result<(), TcrError> {
        save_snapshot(store, &snapshot_key(&self.state.name), &self.state)?;
        tracing::debug!(name = %self.state.name, "deployment saved");
        Ok(())
    }

    pub(crate) fn record(&mut self, event: TcrEvent) {
        self.events.push(event);
    }

    /// Drain events from every component.
    pub fn take_events(&mut self) -> Vec<TcrEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(self.state.voting.take_events().into_iter().map(TcrEvent::Voting));
        events.extend(
            self.state
                .parameterizer
                .take_events()
                .into_iter()
                .map(TcrEvent::Parameterizer),
        );
        if let Some(registry) = self.state.registry.as_mut() {
            events.extend(registry.take_events().into_iter().map(TcrEvent::Registry));
        }
        events
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn creator(&self) -> &Address {
        &self.state.creator
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn state(&self) -> &DeploymentState {
        &self.state
    }

    pub fn token(&self) -> &OraclizedToken {
        &self.state.token
    }

    pub fn voting(&self) -> &PlcrVoting {
        &self.state.voting
    }

    pub fn parameterizer(&self) -> &Parameterizer {
        &self.state.parameterizer
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.state.registry.as_ref()
    }

    pub fn voting_address(&self) -> &Address {
        self.state.voting.address()
    }

    pub fn parameterizer_address(&self) -> &Address {
        self.state.parameterizer.address()
    }

    pub fn registry_address(&self) -> Option<&Address> {
        self.state.registry.as_ref().map(|r| r.address())
    }

    // ── Token ───────────────────────────────────────────────────────────

    pub fn balance_of(&self, owner: &Address) -> u128 {
        self.state.token.balance_of(owner)
    }

    pub fn total_supply(&self) -> u128 {
        self.state.token.total_supply()
    }

    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), TcrError> {
        Ok(self.state.token.transfer(caller, to, amount)?)
    }

    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: u128) {
        self.state.token.approve(caller, spender, amount);
    }

    pub fn increase_supply(&mut self, caller: &Address, amount: u128, to: &Address) -> Result<(), TcrError> {
        Ok(self.state.token.increase_supply(caller, amount, to)?)
    }

    pub fn decrease_supply(&mut self, caller: &Address, amount: u128, from: &Address) -> Result<(), TcrError> {
        Ok(self.state.token.decrease_supply(caller, amount, from)?)
    }

    pub fn change_supply_oracle(&mut self, caller: &Address, new_oracle: Address) -> Result<(), TcrError> {
        Ok(self.state.token.change_supply_oracle(caller, new_oracle)?)
    }

    // ── Ballot engine ───────────────────────────────────────────────────

    pub fn start_poll(&mut self, vote_quorum: u128, commit_duration: u64, reveal_duration: u64) -> Result<PollId, TcrError> {
        let now = self.now();
        Ok(self
            .state
            .voting
            .start_poll(vote_quorum, commit_duration, reveal_duration, now)?)
    }

    pub fn request_voting_rights(&mut self, caller: &Address, amount: u128) -> Result<(), TcrError> {
        let s = &mut self.state;
        Ok(s.voting.request_voting_rights(&mut s.token, caller, amount)?)
    }

    pub fn withdraw_voting_rights(&mut self, caller: &Address, amount: u128) -> Result<(), TcrError> {
        let s = &mut self.state;
        Ok(s.voting.withdraw_voting_rights(&mut s.token, caller, amount)?)
    }

    /// Commit a vote, inserting it at the right place in the caller's locks.
    pub fn commit_vote(
        &mut self,
        caller: &Address,
        poll_id: PollId,
        secret_hash: SecretHash,
        num_tokens: u128,
    ) -> Result<(), TcrError> {
        let prev = self.state.voting.insert_point_for(caller, num_tokens);
        self.commit_vote_after(caller, poll_id, secret_hash, num_tokens, prev)
    }

    /// Commit a vote after an explicit `prev_poll_id`.
    pub fn commit_vote_after(
        &mut self,
        caller: &Address,
        poll_id: PollId,
        secret_hash: SecretHash,
        num_tokens: u128,
        prev_poll_id: PollId,
    ) -> Result<(), TcrError> {
        let now = self.now();
        let s = &mut self.state;
        Ok(s.voting.commit_vote(
            &mut s.token,
            caller,
            poll_id,
            secret_hash,
            num_tokens,
            prev_poll_id,
            now,
        )?)
    }

    pub fn reveal_vote(&mut self, caller: &Address, poll_id: PollId, option: VoteOption, salt: u64) -> Result<(), TcrError> {
        let now = self.now();
        Ok(self
            .state
            .voting
            .reveal_vote(caller, poll_id, option, salt, now)?)
    }

    pub fn is_passed(&self, poll_id: PollId) -> Result<bool, TcrError> {
        Ok(self.state.voting.is_passed(poll_id, self.now())?)
    }

    pub fn rescue_tokens(&mut self, caller: &Address, poll_id: PollId) -> Result<(), TcrError> {
        let now = self.now();
        Ok(self.state.voting.rescue_tokens(caller, poll_id, now)?)
    }

    // ── Parameterizer ───────────────────────────────────────────────────

    pub fn get(&self, key: ParamKey) -> u128 {
        self.state.parameterizer.get(key)
    }

    pub fn propose(&mut self, caller: &Address, key: ParamKey, value: u128, deposit: u128) -> Result<PropId, TcrError> {
        let (mut ctx, params) = self.param_parts();
        Ok(params.propose(&mut ctx, caller, key, value, deposit)?)
    }

    pub fn challenge_proposal(&mut self, caller: &Address, prop_id: PropId) -> Result<PollId, TcrError> {
        let (mut ctx, params) = self.param_parts();
        Ok(params.challenge_proposal(&mut ctx, caller, prop_id)?)
    }

    pub fn process_proposal(&mut self, prop_id: PropId) -> Result<(), TcrError> {
        let (mut ctx, params) = self.param_parts();
        Ok(params.process_proposal(&mut ctx, prop_id)?)
    }

    pub fn claim_proposal_reward(&mut self, caller: &Address, challenge_id: PollId, salt: u64) -> Result<u128, TcrError> {
        let (mut ctx, params) = self.param_parts();
        Ok(params.claim_reward(&mut ctx, caller, challenge_id, salt)?)
    }

    fn param_parts(&mut self) -> (ParamContext<'_>, &mut Parameterizer) {
        let now = self.clock.now();
        let s = &mut self.state;
        (
            ParamContext {
                token: &mut s.token,
                voting: &mut s.voting,
                now,
            },
            &mut s.parameterizer,
        )
    }

    // ── Registry ────────────────────────────────────────────────────────

    pub fn apply(&mut self, caller: &Address, hash: ListingHash, amount: u128, data: &str) -> Result<(), TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.apply(&mut ctx, caller, hash, amount, data.to_string())?)
    }

    pub fn challenge(&mut self, caller: &Address, hash: ListingHash, data: &str) -> Result<ChallengeOutcome, TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.challenge(&mut ctx, caller, hash, data.to_string())?)
    }

    pub fn update_status(&mut self, hash: ListingHash) -> Result<(), TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.update_status(&mut ctx, hash)?)
    }

    pub fn exit(&mut self, caller: &Address, hash: ListingHash) -> Result<(), TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.exit(&mut ctx, caller, hash)?)
    }

    pub fn deposit(&mut self, caller: &Address, hash: ListingHash, amount: u128) -> Result<(), TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.deposit(&mut ctx, caller, hash, amount)?)
    }

    pub fn withdraw(&mut self, caller: &Address, hash: ListingHash, amount: u128) -> Result<(), TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.withdraw(&mut ctx, caller, hash, amount)?)
    }

    pub fn claim_reward(&mut self, caller: &Address, challenge_id: PollId, salt: u64) -> Result<u128, TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.claim_reward(&mut ctx, caller, challenge_id, salt)?)
    }

    pub fn claim_rewards(&mut self, caller: &Address, claims: &[(PollId, u64)]) -> Result<u128, TcrError> {
        let (mut ctx, registry) = self.registry_parts()?;
        Ok(registry.claim_rewards(&mut ctx, caller, claims)?)
    }

    pub fn is_whitelisted(&self, hash: ListingHash) -> bool {
        self.registry().is_some_and(|r| r.is_whitelisted(hash))
    }

    pub fn listing_status(&self, hash: ListingHash) -> Option<ListingStatus> {
        self.registry()
            .and_then(|r| r.listing_status(hash, self.now()))
    }

    fn registry_parts(&mut self) -> Result<(RegistryContext<'_>, &mut Registry), TcrError> {
        let now = self.clock.now();
        let s = &mut self.state;
        let registry = s
            .registry
            .as_mut()
            .ok_or_else(|| TcrError::NoRegistry(s.name.clone()))?;
        Ok((
            RegistryContext {
                token: &mut s.token,
                voting: &mut s.voting,
                params: &s.parameterizer,
                now,
            },
            registry,
        ))
    }
}
