//! Parameterizer engine: propose, challenge, process, claim.

use crate::challenge::Challenge;
use crate::error::ParameterizerError;
use crate::event::ParameterizerEvent;
use crate::proposal::ParamProposal;
use crate::reward;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tcr_crypto::proposal_id;
use tcr_token::{TokenError, TokenLedger};
use tcr_types::{Address, ParamDefaults, ParamKey, PollId, PropId, Timestamp};
use tcr_voting::PlcrVoting;

/// Grace period after a proposal's reveal window during which it can still
/// be processed (7 days).
pub const PROCESS_BY_WINDOW: u64 = 604_800;

/// Collaborators for one call.
pub struct ParamContext<'a> {
    pub token: &'a mut dyn TokenLedger,
    pub voting: &'a mut PlcrVoting,
    pub now: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Parameterizer {
    address: Address,
    params: BTreeMap<ParamKey, u128>,
    proposals: HashMap<PropId, ParamProposal>,
    challenges: HashMap<PollId, Challenge>,
    #[serde(skip)]
    events: Vec<ParameterizerEvent>,
}

impl Parameterizer {
    /// Create a parameter store seeded with `defaults`. Escrowed deposits are
    /// held under `address`.
    pub fn new(address: Address, defaults: &ParamDefaults) -> Result<Self, ParameterizerError> {
        if let Some((key, value)) = defaults.first_invalid() {
            return Err(ParameterizerError::InvalidValue { key, value });
        }
        Ok(Self {
            address,
            params: defaults.entries().collect(),
            proposals: HashMap::new(),
            challenges: HashMap::new(),
            events: Vec::new(),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Committed value of `key`.
    pub fn get(&self, key: ParamKey) -> u128 {
        self.params.get(&key).copied().unwrap_or(0)
    }

    /// A stage length in seconds, or `None` if it does not fit a timestamp.
    pub fn get_secs(&self, key: ParamKey) -> Option<u64> {
        u64::try_from(self.get(key)).ok()
    }

    /// All committed values, in key order.
    pub fn params(&self) -> impl Iterator<Item = (ParamKey, u128)> + '_ {
        self.params.iter().map(|(k, v)| (*k, *v))
    }

    pub fn take_events(&mut self) -> Vec<ParameterizerEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Proposals ───────────────────────────────────────────────────────

    /// Propose `key = value`, escrowing `deposit` from `caller`.
    pub fn propose(
        &mut self,
        ctx: &mut ParamContext<'_>,
        caller: &Address,
        key: ParamKey,
        value: u128,
        deposit: u128,
    ) -> Result<PropId, ParameterizerError> {
        let required = self.get(ParamKey::PMinDeposit);
        if deposit < required {
            return Err(ParameterizerError::InsufficientDeposit { deposit, required });
        }
        if !key.accepts(value) {
            return Err(ParameterizerError::InvalidValue { key, value });
        }
        if self.get(key) == value {
            return Err(ParameterizerError::NoChange { key, value });
        }
        let prop_id = proposal_id(key, value);
        if self.proposals.contains_key(&prop_id) {
            return Err(ParameterizerError::ProposalExists(prop_id));
        }

        let app_expiry = self.deadline(ctx.now, &[ParamKey::PApplyStageLength])?;
        let process_by = self
            .deadline(
                app_expiry,
                &[ParamKey::PCommitStageLength, ParamKey::PRevealStageLength],
            )?
            .checked_add_secs(PROCESS_BY_WINDOW)
            .ok_or(ParameterizerError::Overflow)?;

        ctx.token
            .transfer_from(&self.address, caller, &self.address, deposit)?;

        self.proposals.insert(
            prop_id,
            ParamProposal {
                key,
                value,
                owner: caller.clone(),
                deposit,
                challenge_id: 0,
                app_expiry,
                process_by,
            },
        );
        tracing::info!(%prop_id, %key, value, owner = %caller, deposit, "parameter change proposed");
        self.events.push(ParameterizerEvent::ProposalSubmitted {
            prop_id,
            key,
            value,
            owner: caller.clone(),
            deposit,
            app_expiry,
            process_by,
        });
        Ok(prop_id)
    }

    /// Challenge a pending proposal, matching its deposit.
    pub fn challenge_proposal(
        &mut self,
        ctx: &mut ParamContext<'_>,
        caller: &Address,
        prop_id: PropId,
    ) -> Result<PollId, ParameterizerError> {
        let prop = self.proposal_ref(prop_id)?;
        if prop.is_challenged() {
            return Err(ParameterizerError::AlreadyChallenged(prop_id));
        }
        let stake = prop.deposit;
        let reward_pool =
            reward::dispensation_pool(stake, self.get(ParamKey::PDispensationPct))
                .ok_or(ParameterizerError::Overflow)?;
        let commit = self.stage_secs(ParamKey::PCommitStageLength)?;
        let reveal = self.stage_secs(ParamKey::PRevealStageLength)?;
        let poll_end = self.deadline(
            ctx.now,
            &[ParamKey::PCommitStageLength, ParamKey::PRevealStageLength],
        )?;
        if poll_end > prop.process_by {
            return Err(ParameterizerError::ChallengeWindowClosed(prop_id));
        }

        ctx.token
            .transfer_from(&self.address, caller, &self.address, stake)?;
        let challenge_id =
            ctx.voting
                .start_poll(self.get(ParamKey::PVoteQuorum), commit, reveal, ctx.now)?;

        self.challenges
            .insert(challenge_id, Challenge::new(caller.clone(), stake, reward_pool));
        if let Some(prop) = self.proposals.get_mut(&prop_id) {
            prop.challenge_id = challenge_id;
        }
        tracing::info!(%prop_id, challenge_id, challenger = %caller, stake, "proposal challenged");
        self.events.push(ParameterizerEvent::ProposalChallenged {
            prop_id,
            challenge_id,
            challenger: caller.clone(),
        });
        Ok(challenge_id)
    }

    /// Settle a proposal: apply it, resolve its challenge, or refund it once
    /// stale. The proposal is removed in every case.
    pub fn process_proposal(
        &mut self,
        ctx: &mut ParamContext<'_>,
        prop_id: PropId,
    ) -> Result<(), ParameterizerError> {
        let prop = self.proposal_ref(prop_id)?.clone();
        let now = ctx.now;

        if prop.can_be_set(now) {
            ctx.token.transfer(&self.address, &prop.owner, prop.deposit)?;
            self.params.insert(prop.key, prop.value);
            tracing::info!(%prop_id, key = %prop.key, value = prop.value, "parameter change accepted");
            self.events.push(ParameterizerEvent::ProposalAccepted {
                prop_id,
                key: prop.key,
                value: prop.value,
            });
        } else if self.challenge_can_be_resolved(ctx.voting, prop_id, now) {
            self.resolve_challenge(ctx, prop_id, &prop)?;
        } else if now >= prop.process_by {
            ctx.token.transfer(&self.address, &prop.owner, prop.deposit)?;
            tracing::info!(%prop_id, "stale proposal refunded");
            self.events
                .push(ParameterizerEvent::ProposalExpired { prop_id });
        } else {
            return Err(ParameterizerError::NotReadyToProcess(prop_id));
        }

        self.proposals.remove(&prop_id);
        Ok(())
    }

    fn resolve_challenge(
        &mut self,
        ctx: &mut ParamContext<'_>,
        prop_id: PropId,
        prop: &ParamProposal,
    ) -> Result<(), ParameterizerError> {
        let challenge_id = prop.challenge_id;
        let now = ctx.now;
        let passed = ctx.voting.is_passed(challenge_id, now)?;
        let winning_tokens = ctx.voting.total_winning_tokens(challenge_id, now)?;
        let challenge = self.challenge_ref(challenge_id)?;
        let payout = challenge
            .winner_payout(winning_tokens)
            .ok_or(ParameterizerError::Overflow)?;
        let winner = if passed {
            prop.owner.clone()
        } else {
            challenge.challenger.clone()
        };

        ctx.token.transfer(&self.address, &winner, payout)?;

        let Some(challenge) = self.challenges.get_mut(&challenge_id) else {
            return Err(ParameterizerError::ChallengeNotFound(challenge_id));
        };
        challenge.resolve(winning_tokens);
        let reward_pool = challenge.reward_pool;
        if passed {
            if now < prop.process_by {
                self.params.insert(prop.key, prop.value);
            }
            tracing::info!(%prop_id, challenge_id, payout, reward_pool, "proposal challenge failed");
            self.events.push(ParameterizerEvent::ChallengeFailed {
                prop_id,
                challenge_id,
                reward_pool,
                winning_tokens,
            });
        } else {
            tracing::info!(%prop_id, challenge_id, payout, reward_pool, "proposal challenge succeeded");
            self.events.push(ParameterizerEvent::ChallengeSucceeded {
                prop_id,
                challenge_id,
                reward_pool,
                winning_tokens,
            });
        }
        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────

    /// Pay `caller` their share of a resolved challenge's voter pool.
    pub fn claim_reward(
        &mut self,
        ctx: &mut ParamContext<'_>,
        caller: &Address,
        challenge_id: PollId,
        salt: u64,
    ) -> Result<u128, ParameterizerError> {
        let (voter_tokens, reward) =
            self.owed_reward(ctx.voting, caller, challenge_id, salt, ctx.now)?;

        ctx.token.transfer(&self.address, caller, reward)?;

        if let Some(challenge) = self.challenges.get_mut(&challenge_id) {
            challenge.record_claim(caller, voter_tokens, reward);
        }
        tracing::info!(challenge_id, voter = %caller, reward, "proposal reward claimed");
        self.events.push(ParameterizerEvent::RewardClaimed {
            challenge_id,
            voter: caller.clone(),
            reward,
        });
        Ok(reward)
    }

    /// Claim several rewards, all or nothing. Every claim is checked and the
    /// total is covered before anything is paid. Returns the total paid.
    pub fn claim_rewards(
        &mut self,
        ctx: &mut ParamContext<'_>,
        caller: &Address,
        claims: &[(PollId, u64)],
    ) -> Result<u128, ParameterizerError> {
        let mut seen = HashSet::with_capacity(claims.len());
        let mut total = 0u128;
        for &(challenge_id, salt) in claims {
            if !seen.insert(challenge_id) {
                return Err(ParameterizerError::AlreadyClaimed {
                    voter: caller.to_string(),
                    challenge_id,
                });
            }
            let (_, reward) = self.owed_reward(ctx.voting, caller, challenge_id, salt, ctx.now)?;
            total = total.checked_add(reward).ok_or(ParameterizerError::Overflow)?;
        }
        let available = ctx.token.balance_of(&self.address);
        if available < total {
            return Err(TokenError::InsufficientBalance {
                owner: self.address.to_string(),
                needed: total,
                available,
            }
            .into());
        }
        for &(challenge_id, salt) in claims {
            self.claim_reward(ctx, caller, challenge_id, salt)?;
        }
        Ok(total)
    }

    /// Winning weight and payout `caller` may claim from a resolved challenge.
    fn owed_reward(
        &self,
        voting: &PlcrVoting,
        caller: &Address,
        challenge_id: PollId,
        salt: u64,
        now: Timestamp,
    ) -> Result<(u128, u128), ParameterizerError> {
        let challenge = self.challenge_ref(challenge_id)?;
        if !challenge.resolved {
            return Err(ParameterizerError::NotResolved(challenge_id));
        }
        if challenge.has_claimed(caller) {
            return Err(ParameterizerError::AlreadyClaimed {
                voter: caller.to_string(),
                challenge_id,
            });
        }
        let voter_tokens = voting.num_passing_tokens(caller, challenge_id, salt, now)?;
        let reward = challenge
            .voter_reward(voter_tokens)
            .ok_or(ParameterizerError::Overflow)?;
        Ok((voter_tokens, reward))
    }

    /// What `voter` would be paid by `claim_reward` right now.
    pub fn voter_reward(
        &self,
        voting: &PlcrVoting,
        voter: &Address,
        challenge_id: PollId,
        salt: u64,
        now: Timestamp,
    ) -> Result<u128, ParameterizerError> {
        let challenge = self.challenge_ref(challenge_id)?;
        let voter_tokens = voting.num_passing_tokens(voter, challenge_id, salt, now)?;
        challenge
            .voter_reward(voter_tokens)
            .ok_or(ParameterizerError::Overflow)
    }

    /// Payout the winning party of a challenge receives on resolution.
    pub fn challenge_winner_reward(
        &self,
        voting: &PlcrVoting,
        challenge_id: PollId,
        now: Timestamp,
    ) -> Result<u128, ParameterizerError> {
        let challenge = self.challenge_ref(challenge_id)?;
        let winning_tokens = voting.total_winning_tokens(challenge_id, now)?;
        challenge
            .winner_payout(winning_tokens)
            .ok_or(ParameterizerError::Overflow)
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn proposal(&self, prop_id: PropId) -> Option<&ParamProposal> {
        self.proposals.get(&prop_id)
    }

    pub fn proposals(&self) -> impl Iterator<Item = (&PropId, &ParamProposal)> {
        self.proposals.iter()
    }

    pub fn challenge(&self, challenge_id: PollId) -> Option<&Challenge> {
        self.challenges.get(&challenge_id)
    }

    pub fn prop_exists(&self, prop_id: PropId) -> bool {
        self.proposals.contains_key(&prop_id)
    }

    pub fn can_be_set(&self, prop_id: PropId, now: Timestamp) -> bool {
        self.proposals
            .get(&prop_id)
            .is_some_and(|p| p.can_be_set(now))
    }

    /// Challenged, unresolved, and its poll has ended.
    pub fn challenge_can_be_resolved(&self, voting: &PlcrVoting, prop_id: PropId, now: Timestamp) -> bool {
        let Some(prop) = self.proposals.get(&prop_id) else {
            return false;
        };
        prop.is_challenged()
            && self
                .challenges
                .get(&prop.challenge_id)
                .is_some_and(|c| !c.resolved)
            && voting.poll_ended(prop.challenge_id, now).unwrap_or(false)
    }

    pub fn token_claims(&self, challenge_id: PollId, voter: &Address) -> bool {
        self.challenges
            .get(&challenge_id)
            .is_some_and(|c| c.has_claimed(voter))
    }

    fn proposal_ref(&self, prop_id: PropId) -> Result<&ParamProposal, ParameterizerError> {
        self.proposals
            .get(&prop_id)
            .ok_or(ParameterizerError::ProposalNotFound(prop_id))
    }

    fn challenge_ref(&self, challenge_id: PollId) -> Result<&Challenge, ParameterizerError> {
        self.challenges
            .get(&challenge_id)
            .ok_or(ParameterizerError::ChallengeNotFound(challenge_id))
    }

    fn stage_secs(&self, key: ParamKey) -> Result<u64, ParameterizerError> {
        self.get_secs(key).ok_or(ParameterizerError::Overflow)
    }

    /// `from` plus the sum of the given stage lengths.
    fn deadline(&self, from: Timestamp, stages: &[ParamKey]) -> Result<Timestamp, ParameterizerError> {
        stages.iter().try_fold(from, |at, key| {
            at.checked_add_secs(self.stage_secs(*key)?)
                .ok_or(ParameterizerError::Overflow)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcr_crypto::commit_vote_hash;
    use tcr_token::{OraclizedToken, TokenMetadata};
    use tcr_types::VoteOption;

    const APPLY: u64 = 1200;
    const COMMIT: u64 = 1200;
    const REVEAL: u64 = 1200;

    struct Fixture {
        token: OraclizedToken,
        voting: PlcrVoting,
        params: Parameterizer,
    }

    fn addr(name: &str) -> Address {
        Address::new(name)
    }

    fn t(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn setup() -> Fixture {
        let voting = PlcrVoting::new(addr("voting"));
        let params = Parameterizer::new(addr("parameterizer"), &ParamDefaults::default()).unwrap();
        let mut token = OraclizedToken::new(
            TokenMetadata {
                name: "param".into(),
                symbol: "PRM".into(),
                decimals: 0,
            },
            &addr("faucet"),
            100_000,
            addr("oracle"),
        );
        for who in ["proposer", "challenger", "alice", "bob"] {
            token.transfer(&addr("faucet"), &addr(who), 10_000).unwrap();
            token.approve(&addr(who), params.address(), 10_000);
            token.approve(&addr(who), voting.address(), 10_000);
        }
        Fixture {
            token,
            voting,
            params,
        }
    }

    impl Fixture {
        fn ctx(&mut self, now: u64) -> (ParamContext<'_>, &mut Parameterizer) {
            (
                ParamContext {
                    token: &mut self.token,
                    voting: &mut self.voting,
                    now: t(now),
                },
                &mut self.params,
            )
        }

        fn propose(&mut self, key: ParamKey, value: u128, now: u64) -> Result<PropId, ParameterizerError> {
            let (mut ctx, params) = self.ctx(now);
            params.propose(&mut ctx, &addr("proposer"), key, value, 100)
        }

        fn challenge(&mut self, prop_id: PropId, now: u64) -> Result<PollId, ParameterizerError> {
            let (mut ctx, params) = self.ctx(now);
            params.challenge_proposal(&mut ctx, &addr("challenger"), prop_id)
        }

        fn process(&mut self, prop_id: PropId, now: u64) -> Result<(), ParameterizerError> {
            let (mut ctx, params) = self.ctx(now);
            params.process_proposal(&mut ctx, prop_id)
        }

        fn vote(&mut self, voter: &str, poll: PollId, option: VoteOption, salt: u64, weight: u128, now: u64) {
            let voter = addr(voter);
            let prev = self.voting.insert_point_for(&voter, weight);
            self.voting
                .commit_vote(
                    &mut self.token,
                    &voter,
                    poll,
                    commit_vote_hash(option, salt),
                    weight,
                    prev,
                    t(now),
                )
                .unwrap();
            self.voting
                .reveal_vote(&voter, poll, option, salt, t(now + COMMIT))
                .unwrap();
        }

        fn balance(&self, who: &str) -> u128 {
            self.token.balance_of(&addr(who))
        }
    }

    #[test]
    fn test_unchallenged_proposal_applies_after_apply_stage() {
        let mut f = setup();
        let prop = f.propose(ParamKey::VoteQuorum, 60, 0).unwrap();
        assert_eq!(f.params.get(ParamKey::VoteQuorum), 50);
        assert_eq!(f.balance("proposer"), 9_900);

        assert_eq!(
            f.process(prop, APPLY - 1),
            Err(ParameterizerError::NotReadyToProcess(prop))
        );
        assert!(f.params.can_be_set(prop, t(APPLY)));
        f.process(prop, APPLY).unwrap();

        assert_eq!(f.params.get(ParamKey::VoteQuorum), 60);
        assert_eq!(f.balance("proposer"), 10_000);
        assert!(!f.params.prop_exists(prop));
    }

    #[test]
    fn test_proposal_rejections() {
        let mut f = setup();
        let (mut ctx, params) = f.ctx(0);
        assert_eq!(
            params.propose(&mut ctx, &addr("proposer"), ParamKey::MinDeposit, 20, 99),
            Err(ParameterizerError::InsufficientDeposit {
                deposit: 99,
                required: 100
            })
        );
        assert_eq!(
            params.propose(&mut ctx, &addr("proposer"), ParamKey::MinDeposit, 10, 100),
            Err(ParameterizerError::NoChange {
                key: ParamKey::MinDeposit,
                value: 10
            })
        );
        assert_eq!(
            params.propose(&mut ctx, &addr("proposer"), ParamKey::DispensationPct, 101, 100),
            Err(ParameterizerError::InvalidValue {
                key: ParamKey::DispensationPct,
                value: 101
            })
        );
        assert_eq!(
            params.propose(&mut ctx, &addr("proposer"), ParamKey::CommitStageLength, 0, 100),
            Err(ParameterizerError::InvalidValue {
                key: ParamKey::CommitStageLength,
                value: 0
            })
        );
        let prop = params
            .propose(&mut ctx, &addr("proposer"), ParamKey::MinDeposit, 20, 100)
            .unwrap();
        assert_eq!(
            params.propose(&mut ctx, &addr("alice"), ParamKey::MinDeposit, 20, 100),
            Err(ParameterizerError::ProposalExists(prop))
        );
    }

    #[test]
    fn test_successful_challenge_keeps_value_and_pays_challenger() {
        let mut f = setup();
        let prop = f.propose(ParamKey::MinDeposit, 20, 0).unwrap();
        let poll = f.challenge(prop, 10).unwrap();
        assert_eq!(
            f.challenge(prop, 10),
            Err(ParameterizerError::AlreadyChallenged(prop))
        );
        f.vote("alice", poll, VoteOption::Against, 7, 500, 10);

        assert_eq!(
            f.process(prop, 10 + COMMIT),
            Err(ParameterizerError::NotReadyToProcess(prop))
        );
        f.process(prop, 10 + COMMIT + REVEAL).unwrap();

        assert_eq!(f.params.get(ParamKey::MinDeposit), 10);
        // 2 * 100 - 50
        assert_eq!(f.balance("challenger"), 10_000 - 100 + 150);
        assert_eq!(f.balance("proposer"), 9_900);

        let (mut ctx, params) = f.ctx(10 + COMMIT + REVEAL);
        assert_eq!(params.claim_reward(&mut ctx, &addr("alice"), poll, 7).unwrap(), 50);
        assert!(matches!(
            params.claim_reward(&mut ctx, &addr("alice"), poll, 7),
            Err(ParameterizerError::AlreadyClaimed { .. })
        ));
        assert!(params.token_claims(poll, &addr("alice")));
    }

    #[test]
    fn test_failed_challenge_applies_value_and_pays_proposer() {
        let mut f = setup();
        let prop = f.propose(ParamKey::InflationFactor, 25, 0).unwrap();
        let poll = f.challenge(prop, 0).unwrap();
        f.vote("alice", poll, VoteOption::For, 1, 300, 0);
        f.vote("bob", poll, VoteOption::Against, 2, 100, 0);

        let end = COMMIT + REVEAL;
        assert_eq!(
            f.params.challenge_winner_reward(&f.voting, poll, t(end)).unwrap(),
            150
        );
        f.process(prop, end).unwrap();

        assert_eq!(f.params.get(ParamKey::InflationFactor), 25);
        assert_eq!(f.balance("proposer"), 10_000 - 100 + 150);
        assert_eq!(f.balance("challenger"), 9_900);
        assert_eq!(
            f.params.voter_reward(&f.voting, &addr("alice"), poll, 1, t(end)).unwrap(),
            50
        );
        assert!(f.params.challenge(poll).is_some_and(|c| c.resolved));
    }

    #[test]
    fn test_claim_before_resolution_fails() {
        let mut f = setup();
        let prop = f.propose(ParamKey::VoteQuorum, 70, 0).unwrap();
        let poll = f.challenge(prop, 0).unwrap();
        let (mut ctx, params) = f.ctx(COMMIT + REVEAL);
        assert_eq!(
            params.claim_reward(&mut ctx, &addr("alice"), poll, 1),
            Err(ParameterizerError::NotResolved(poll))
        );
        assert_eq!(
            params.claim_reward(&mut ctx, &addr("alice"), 99, 1),
            Err(ParameterizerError::ChallengeNotFound(99))
        );
    }

    #[test]
    fn test_stale_proposal_is_refunded_without_applying() {
        let mut f = setup();
        let prop = f.propose(ParamKey::RevealStageLength, 900, 0).unwrap();
        let process_by = f.params.proposal(prop).unwrap().process_by;
        assert_eq!(
            process_by.as_secs(),
            APPLY + COMMIT + REVEAL + PROCESS_BY_WINDOW
        );

        f.process(prop, process_by.as_secs()).unwrap();
        assert_eq!(f.params.get(ParamKey::RevealStageLength), 600);
        assert_eq!(f.balance("proposer"), 10_000);
        assert!(matches!(
            f.params.take_events().last(),
            Some(ParameterizerEvent::ProposalExpired { .. })
        ));
    }

    #[test]
    fn test_challenge_must_end_before_proposal_goes_stale() {
        let mut f = setup();
        let prop = f.propose(ParamKey::VoteQuorum, 40, 0).unwrap();
        let process_by = f.params.proposal(prop).unwrap().process_by.as_secs();
        let last_open = process_by - COMMIT - REVEAL;

        assert_eq!(
            f.challenge(prop, last_open + 1),
            Err(ParameterizerError::ChallengeWindowClosed(prop))
        );
        assert_eq!(f.balance("challenger"), 10_000);
        assert_eq!(f.voting.poll_count(), 0);

        let poll = f.challenge(prop, last_open).unwrap();
        f.process(prop, process_by).unwrap();
        assert!(f.params.challenge(poll).is_some_and(|c| c.resolved));
        // nobody revealed, so the challenger takes both stakes
        assert_eq!(f.balance("challenger"), 10_100);
        assert_eq!(f.balance("proposer"), 9_900);
        assert_eq!(f.balance("parameterizer"), 0);
        assert_eq!(f.params.get(ParamKey::VoteQuorum), 50);
    }

    #[test]
    fn test_batch_claim_is_all_or_nothing() {
        let mut f = setup();
        let prop = f.propose(ParamKey::MinDeposit, 20, 0).unwrap();
        let poll = f.challenge(prop, 0).unwrap();
        f.vote("alice", poll, VoteOption::Against, 7, 500, 0);
        let end = COMMIT + REVEAL;
        f.process(prop, end).unwrap();
        let before = f.balance("alice");

        let (mut ctx, params) = f.ctx(end);
        assert_eq!(
            params.claim_rewards(&mut ctx, &addr("alice"), &[(poll, 7), (999, 7)]),
            Err(ParameterizerError::ChallengeNotFound(999))
        );
        assert!(matches!(
            params.claim_rewards(&mut ctx, &addr("alice"), &[(poll, 7), (poll, 7)]),
            Err(ParameterizerError::AlreadyClaimed { .. })
        ));
        assert!(!params.token_claims(poll, &addr("alice")));
        assert_eq!(f.balance("alice"), before);

        let (mut ctx, params) = f.ctx(end);
        assert_eq!(
            params.claim_rewards(&mut ctx, &addr("alice"), &[(poll, 7)]).unwrap(),
            50
        );
        assert_eq!(f.balance("alice"), before + 50);
    }

    #[test]
    fn test_challenge_without_allowance_fails_cleanly() {
        let mut f = setup();
        let prop = f.propose(ParamKey::MinDeposit, 30, 0).unwrap();
        f.token.approve(&addr("challenger"), f.params.address(), 0);
        assert!(matches!(
            f.challenge(prop, 0),
            Err(ParameterizerError::Token(_))
        ));
        assert!(!f.params.proposal(prop).unwrap().is_challenged());
        assert_eq!(f.voting.poll_count(), 0);
    }
}
