//! Registry engine: apply, challenge, resolve, claim, exit.

use crate::error::RegistryError;
use crate::event::RegistryEvent;
use crate::listing::{Listing, ListingStatus};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tcr_parameterizer::reward;
use tcr_parameterizer::{Challenge, Parameterizer};
use tcr_token::{TokenError, TokenLedger};
use tcr_types::{Address, ListingHash, ParamKey, PollId, Timestamp};
use tcr_voting::PlcrVoting;

/// Collaborators for one call. Parameters are read at call time.
pub struct RegistryContext<'a> {
    pub token: &'a mut dyn TokenLedger,
    pub voting: &'a mut PlcrVoting,
    pub params: &'a Parameterizer,
    pub now: Timestamp,
}

/// Result of [`Registry::challenge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// A ballot was opened; the id doubles as the challenge id.
    Opened(PollId),
    /// The listing's deposit had fallen below the minimum, so it was removed
    /// without a ballot.
    TouchedAndRemoved,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registry {
    name: String,
    address: Address,
    listings: HashMap<ListingHash, Listing>,
    challenges: HashMap<PollId, Challenge>,
    #[serde(skip)]
    events: Vec<RegistryEvent>,
}

impl Registry {
    /// Create an empty registry. Deposits and stakes are held under `address`,
    /// which must also be the token's supply oracle for inflation to mint.
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
            listings: HashMap::new(),
            challenges: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn take_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Listing lifecycle ───────────────────────────────────────────────

    /// Apply to list `hash`, escrowing `amount` from `caller`.
    pub fn apply(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        caller: &Address,
        hash: ListingHash,
        amount: u128,
        data: String,
    ) -> Result<(), RegistryError> {
        if let Some(listing) = self.listings.get(&hash) {
            return Err(if listing.whitelisted {
                RegistryError::AlreadyListed(hash)
            } else {
                RegistryError::AlreadyApplied(hash)
            });
        }
        let required = ctx.params.get(ParamKey::MinDeposit);
        if amount < required {
            return Err(RegistryError::InsufficientDeposit {
                deposit: amount,
                required,
            });
        }
        let apply_stage = ctx
            .params
            .get_secs(ParamKey::ApplyStageLength)
            .ok_or(RegistryError::Overflow)?;
        let app_end = ctx
            .now
            .checked_add_secs(apply_stage)
            .ok_or(RegistryError::Overflow)?;

        ctx.token
            .transfer_from(&self.address, caller, &self.address, amount)?;

        tracing::info!(listing = %hash, owner = %caller, deposit = amount, %app_end, "application submitted");
        self.events.push(RegistryEvent::Application {
            listing: hash,
            owner: caller.clone(),
            deposit: amount,
            app_end,
            data: data.clone(),
        });
        self.listings.insert(
            hash,
            Listing {
                owner: caller.clone(),
                application_expiry: app_end,
                whitelisted: false,
                unstaked_deposit: amount,
                challenge_id: 0,
                data,
            },
        );
        Ok(())
    }

    /// Top up a listing's unstaked deposit.
    pub fn deposit(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        caller: &Address,
        hash: ListingHash,
        amount: u128,
    ) -> Result<(), RegistryError> {
        let listing = self.owned_listing(caller, hash)?;
        let new_total = listing
            .unstaked_deposit
            .checked_add(amount)
            .ok_or(RegistryError::Overflow)?;

        ctx.token
            .transfer_from(&self.address, caller, &self.address, amount)?;

        if let Some(listing) = self.listings.get_mut(&hash) {
            listing.unstaked_deposit = new_total;
        }
        tracing::debug!(listing = %hash, amount, new_total, "deposit added");
        self.events.push(RegistryEvent::Deposit {
            listing: hash,
            added: amount,
            new_total,
        });
        Ok(())
    }

    /// Draw down a listing's unstaked deposit, keeping at least `minDeposit`.
    pub fn withdraw(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        caller: &Address,
        hash: ListingHash,
        amount: u128,
    ) -> Result<(), RegistryError> {
        let listing = self.owned_listing(caller, hash)?;
        let remaining = listing
            .unstaked_deposit
            .checked_sub(amount)
            .ok_or(RegistryError::InsufficientDeposit {
                deposit: listing.unstaked_deposit,
                required: amount,
            })?;
        let required = ctx.params.get(ParamKey::MinDeposit);
        if remaining < required {
            return Err(RegistryError::WithdrawBelowMinimum {
                remaining,
                required,
            });
        }

        ctx.token.transfer(&self.address, caller, amount)?;

        if let Some(listing) = self.listings.get_mut(&hash) {
            listing.unstaked_deposit = remaining;
        }
        tracing::debug!(listing = %hash, amount, remaining, "deposit withdrawn");
        self.events.push(RegistryEvent::Withdrawal {
            listing: hash,
            withdrew: amount,
            new_total: remaining,
        });
        Ok(())
    }

    /// Remove a whitelisted, unchallenged listing and refund its deposit.
    pub fn exit(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        caller: &Address,
        hash: ListingHash,
    ) -> Result<(), RegistryError> {
        let listing = self.owned_listing(caller, hash)?;
        if listing.is_challenged() {
            return Err(RegistryError::UnderChallenge(hash));
        }
        if !listing.whitelisted {
            return Err(RegistryError::NotWhitelisted(hash));
        }
        self.events
            .push(RegistryEvent::ListingWithdrawn { listing: hash });
        self.reset_listing(ctx.token, hash)
    }

    // ── Challenges ──────────────────────────────────────────────────────

    /// Challenge `hash`, escrowing a stake equal to its unstaked deposit.
    pub fn challenge(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        caller: &Address,
        hash: ListingHash,
        data: String,
    ) -> Result<ChallengeOutcome, RegistryError> {
        let listing = self.listing_ref(hash)?;
        if listing.is_challenged() {
            return Err(RegistryError::AlreadyChallenged(hash));
        }
        let min_deposit = ctx.params.get(ParamKey::MinDeposit);
        if listing.unstaked_deposit < min_deposit {
            self.reset_listing(ctx.token, hash)?;
            tracing::info!(listing = %hash, "listing below minimum deposit removed");
            self.events
                .push(RegistryEvent::TouchAndRemoved { listing: hash });
            return Ok(ChallengeOutcome::TouchedAndRemoved);
        }

        let stake = listing.unstaked_deposit;
        let reward_pool =
            reward::dispensation_pool(stake, ctx.params.get(ParamKey::DispensationPct))
                .ok_or(RegistryError::Overflow)?;
        let commit = ctx
            .params
            .get_secs(ParamKey::CommitStageLength)
            .ok_or(RegistryError::Overflow)?;
        let reveal = ctx
            .params
            .get_secs(ParamKey::RevealStageLength)
            .ok_or(RegistryError::Overflow)?;
        ctx.now
            .checked_add_secs(commit)
            .and_then(|t| t.checked_add_secs(reveal))
            .ok_or(RegistryError::Overflow)?;

        ctx.token
            .transfer_from(&self.address, caller, &self.address, stake)?;
        let challenge_id = ctx.voting.start_poll(
            ctx.params.get(ParamKey::VoteQuorum),
            commit,
            reveal,
            ctx.now,
        )?;

        self.challenges.insert(
            challenge_id,
            Challenge::new(caller.clone(), stake, reward_pool).with_min_deposit(min_deposit),
        );
        if let Some(listing) = self.listings.get_mut(&hash) {
            listing.challenge_id = challenge_id;
            listing.unstaked_deposit -= stake;
        }
        tracing::info!(listing = %hash, challenge_id, challenger = %caller, stake, "challenge opened");
        self.events.push(RegistryEvent::ChallengeOpened {
            listing: hash,
            challenge_id,
            challenger: caller.clone(),
            stake,
            data,
        });
        Ok(ChallengeOutcome::Opened(challenge_id))
    }

    /// Whitelist a listing whose apply stage passed unchallenged, or resolve
    /// its challenge once the ballot has ended.
    pub fn update_status(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        hash: ListingHash,
    ) -> Result<(), RegistryError> {
        let listing = self.listing_ref(hash)?;
        if self.can_be_whitelisted(hash, ctx.now) {
            self.whitelist(hash);
            return Ok(());
        }
        if !listing.is_challenged() {
            return Err(RegistryError::NotReadyToResolve(hash));
        }
        let challenge_id = listing.challenge_id;
        if self.challenge_ref(challenge_id)?.resolved {
            return Err(RegistryError::AlreadyResolved(challenge_id));
        }
        if !ctx.voting.poll_ended(challenge_id, ctx.now)? {
            return Err(RegistryError::NotReadyToResolve(hash));
        }
        self.resolve_challenge(ctx, hash)
    }

    /// Settle an ended challenge: split the stakes, mint inflation, then
    /// whitelist or remove the listing.
    ///
    /// Every check runs before the first token moves. Stakes and refunds are
    /// paid out of escrow first and supply is minted last.
    fn resolve_challenge(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        hash: ListingHash,
    ) -> Result<(), RegistryError> {
        let listing = self.listing_ref(hash)?.clone();
        let challenge_id = listing.challenge_id;
        let passed = ctx.voting.is_passed(challenge_id, ctx.now)?;
        let winning_tokens = ctx.voting.total_winning_tokens(challenge_id, ctx.now)?;

        let mut settled = self.challenge_ref(challenge_id)?.clone();
        let payout = settled
            .winner_payout(winning_tokens)
            .ok_or(RegistryError::Overflow)?;
        settled.resolve(winning_tokens);

        let inflation = reward::majority_bloc_inflation(
            winning_tokens,
            ctx.params.get(ParamKey::InflationFactor),
        )
        .ok_or(RegistryError::Overflow)?;
        settled
            .credit_inflation(inflation)
            .ok_or(RegistryError::Overflow)?;
        // the winner is made whole for any rise in the floor during the poll
        let deposit_growth = settled.deposit_growth(ctx.params.get(ParamKey::MinDeposit));
        let minted = inflation
            .checked_add(deposit_growth)
            .ok_or(RegistryError::Overflow)?;
        ctx.token
            .total_supply()
            .checked_add(minted)
            .ok_or(RegistryError::Overflow)?;
        if minted > 0 && ctx.token.supply_oracle() != &self.address {
            return Err(TokenError::NotOracle {
                caller: self.address.to_string(),
            }
            .into());
        }
        let unstaked = if passed {
            listing
                .unstaked_deposit
                .checked_add(payout)
                .and_then(|d| d.checked_add(deposit_growth))
                .ok_or(RegistryError::Overflow)?
        } else {
            let owed = payout
                .checked_add(listing.unstaked_deposit)
                .ok_or(RegistryError::Overflow)?;
            let available = ctx.token.balance_of(&self.address);
            if available < owed {
                return Err(TokenError::InsufficientBalance {
                    owner: self.address.to_string(),
                    needed: owed,
                    available,
                }
                .into());
            }
            listing.unstaked_deposit
        };

        if !passed {
            ctx.token
                .transfer(&self.address, &settled.challenger, payout)?;
            self.refund_owner(ctx.token, &listing)?;
        }
        if inflation > 0 {
            ctx.token
                .increase_supply(&self.address, inflation, &self.address)?;
        }
        if deposit_growth > 0 {
            let to = if passed { &self.address } else { &settled.challenger };
            ctx.token
                .increase_supply(&self.address, deposit_growth, to)?;
        }

        let reward_pool = settled.reward_pool;
        self.challenges.insert(challenge_id, settled);
        if passed {
            tracing::info!(listing = %hash, challenge_id, payout, deposit_growth, reward_pool, inflation, "challenge failed, listing kept");
            self.events.push(RegistryEvent::ChallengeFailed {
                listing: hash,
                challenge_id,
                reward_pool,
                winning_tokens,
                inflation,
            });
            if let Some(listing) = self.listings.get_mut(&hash) {
                listing.unstaked_deposit = unstaked;
                listing.challenge_id = 0;
            }
            self.whitelist(hash);
        } else {
            tracing::info!(listing = %hash, challenge_id, payout, deposit_growth, reward_pool, inflation, "challenge succeeded, listing removed");
            self.events.push(RegistryEvent::ChallengeSucceeded {
                listing: hash,
                challenge_id,
                reward_pool,
                winning_tokens,
                inflation,
            });
            self.remove_listing(hash);
        }
        Ok(())
    }

    fn whitelist(&mut self, hash: ListingHash) {
        let Some(listing) = self.listings.get_mut(&hash) else {
            return;
        };
        if !listing.whitelisted {
            listing.whitelisted = true;
            tracing::info!(listing = %hash, "listing whitelisted");
            self.events
                .push(RegistryEvent::ApplicationWhitelisted { listing: hash });
        }
    }

    /// Refund the owner's unstaked deposit and delete the listing.
    fn reset_listing(
        &mut self,
        token: &mut dyn TokenLedger,
        hash: ListingHash,
    ) -> Result<(), RegistryError> {
        let listing = self.listing_ref(hash)?.clone();
        self.refund_owner(token, &listing)?;
        self.remove_listing(hash);
        Ok(())
    }

    fn refund_owner(&self, token: &mut dyn TokenLedger, listing: &Listing) -> Result<(), RegistryError> {
        if listing.unstaked_deposit > 0 {
            token.transfer(&self.address, &listing.owner, listing.unstaked_deposit)?;
        }
        Ok(())
    }

    fn remove_listing(&mut self, hash: ListingHash) {
        let Some(listing) = self.listings.remove(&hash) else {
            return;
        };
        let whitelisted = listing.whitelisted;
        self.events.push(if whitelisted {
            RegistryEvent::ListingRemoved { listing: hash }
        } else {
            RegistryEvent::ApplicationRemoved { listing: hash }
        });
        tracing::info!(listing = %hash, whitelisted, "listing removed");
    }

    // ── Rewards ─────────────────────────────────────────────────────────

    /// Pay `caller` their share of a resolved challenge's voter pool.
    pub fn claim_reward(
        &mut self,
        ctx: &mut RegistryContext<'_>,
        caller: &Address,
        challenge_id: PollId,
        salt: u64,
    ) -> Result<u128, RegistryError> {
        let (voter_tokens, reward) =
            self.owed_reward(ctx.voting, caller, challenge_id, salt, ctx.now)?;

        ctx.token.transfer(&self.address, caller, reward)?;

        if let Some(challenge) = self.challenges.get_mut(&challenge_id) {
            challenge.record_claim(caller, voter_tokens, reward);
        }
        tracing::info!(challenge_id, voter = %caller, reward, "reward claimed");
        self.events.push(RegistryEvent::RewardClaimed {
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
        ctx: &mut RegistryContext<'_>,
        caller: &Address,
        claims: &[(PollId, u64)],
    ) -> Result<u128, RegistryError> {
        let mut seen = HashSet::with_capacity(claims.len());
        let mut total = 0u128;
        for &(challenge_id, salt) in claims {
            if !seen.insert(challenge_id) {
                return Err(RegistryError::AlreadyClaimed {
                    voter: caller.to_string(),
                    challenge_id,
                });
            }
            let (_, reward) = self.owed_reward(ctx.voting, caller, challenge_id, salt, ctx.now)?;
            total = total.checked_add(reward).ok_or(RegistryError::Overflow)?;
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

    fn owed_reward(
        &self,
        voting: &PlcrVoting,
        caller: &Address,
        challenge_id: PollId,
        salt: u64,
        now: Timestamp,
    ) -> Result<(u128, u128), RegistryError> {
        let challenge = self.challenge_ref(challenge_id)?;
        if !challenge.resolved {
            return Err(RegistryError::NotResolved(challenge_id));
        }
        if challenge.has_claimed(caller) {
            return Err(RegistryError::AlreadyClaimed {
                voter: caller.to_string(),
                challenge_id,
            });
        }
        let voter_tokens = voting.num_passing_tokens(caller, challenge_id, salt, now)?;
        let reward = challenge
            .voter_reward(voter_tokens)
            .ok_or(RegistryError::Overflow)?;
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
    ) -> Result<u128, RegistryError> {
        let challenge = self.challenge_ref(challenge_id)?;
        let voter_tokens = voting.num_passing_tokens(voter, challenge_id, salt, now)?;
        challenge
            .voter_reward(voter_tokens)
            .ok_or(RegistryError::Overflow)
    }

    /// Payout the winner of an ended, unresolved challenge will receive,
    /// before deposit growth.
    pub fn determine_reward(
        &self,
        voting: &PlcrVoting,
        challenge_id: PollId,
        now: Timestamp,
    ) -> Result<u128, RegistryError> {
        let challenge = self.challenge_ref(challenge_id)?;
        if challenge.resolved {
            return Err(RegistryError::AlreadyResolved(challenge_id));
        }
        let winning_tokens = voting.total_winning_tokens(challenge_id, now)?;
        challenge
            .winner_payout(winning_tokens)
            .ok_or(RegistryError::Overflow)
    }

    // ── Views ───────────────────────────────────────────────────────────

    pub fn listing(&self, hash: ListingHash) -> Option<&Listing> {
        self.listings.get(&hash)
    }

    pub fn listings(&self) -> impl Iterator<Item = (&ListingHash, &Listing)> {
        self.listings.iter()
    }

    pub fn challenge_record(&self, challenge_id: PollId) -> Option<&Challenge> {
        self.challenges.get(&challenge_id)
    }

    pub fn listing_status(&self, hash: ListingHash, now: Timestamp) -> Option<ListingStatus> {
        self.listings.get(&hash).map(|l| l.status(now))
    }

    pub fn is_whitelisted(&self, hash: ListingHash) -> bool {
        self.listings.get(&hash).is_some_and(|l| l.whitelisted)
    }

    pub fn app_was_made(&self, hash: ListingHash) -> bool {
        self.listings.contains_key(&hash)
    }

    /// Whether `hash` has an open, unresolved challenge.
    pub fn challenge_exists(&self, hash: ListingHash) -> bool {
        self.listings.get(&hash).is_some_and(|l| {
            l.is_challenged()
                && self
                    .challenges
                    .get(&l.challenge_id)
                    .is_some_and(|c| !c.resolved)
        })
    }

    pub fn can_be_whitelisted(&self, hash: ListingHash, now: Timestamp) -> bool {
        self.listing_status(hash, now) == Some(ListingStatus::AwaitingWhitelist)
    }

    pub fn challenge_can_be_resolved(&self, voting: &PlcrVoting, hash: ListingHash, now: Timestamp) -> bool {
        self.challenge_exists(hash)
            && self
                .listings
                .get(&hash)
                .is_some_and(|l| voting.poll_ended(l.challenge_id, now).unwrap_or(false))
    }

    pub fn token_claims(&self, challenge_id: PollId, voter: &Address) -> bool {
        self.challenges
            .get(&challenge_id)
            .is_some_and(|c| c.has_claimed(voter))
    }

    fn listing_ref(&self, hash: ListingHash) -> Result<&Listing, RegistryError> {
        self.listings
            .get(&hash)
            .ok_or(RegistryError::NoListing(hash))
    }

    fn owned_listing(&self, caller: &Address, hash: ListingHash) -> Result<&Listing, RegistryError> {
        let listing = self.listing_ref(hash)?;
        if &listing.owner != caller {
            return Err(RegistryError::NotOwner {
                caller: caller.to_string(),
                listing: hash,
            });
        }
        Ok(listing)
    }

    fn challenge_ref(&self, challenge_id: PollId) -> Result<&Challenge, RegistryError> {
        self.challenges
            .get(&challenge_id)
            .ok_or(RegistryError::ChallengeNotFound(challenge_id))
    }
}
