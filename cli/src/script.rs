//! Scripted registry games.
//!
//! A script is a TOML list of `[[step]]` tables, each naming an `action`.
//! Challenges and proposals are referred to by the listing identity or the
//! proposal `label` that opened them, so later steps can vote on them and
//! claim from them without knowing poll ids.

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::sync::Arc;
use tcr_crypto::{commit_vote_hash, listing_hash};
use tcr_factory::{Deployment, TcrConfig};
use tcr_nullables::NullClock;
use tcr_registry::ChallengeOutcome;
use tcr_types::{Address, ParamKey, PollId, PropId, VoteOption};
use tcr_utils::format_duration;

#[derive(Debug, Deserialize)]
pub struct Script {
    /// Approve every component to spend each token holder's full balance
    /// before the first step.
    #[serde(default = "default_true")]
    pub approve_all: bool,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_true() -> bool {
    true
}

impl Script {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("invalid script")
    }
}

#[derive(Debug, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,

    /// The step is expected to be rejected; the run fails if it succeeds.
    #[serde(default)]
    pub expect_failure: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    For,
    Against,
}

impl From<Vote> for VoteOption {
    fn from(vote: Vote) -> Self {
        match vote {
            Vote::For => VoteOption::For,
            Vote::Against => VoteOption::Against,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    Apply {
        caller: String,
        listing: String,
        amount: u128,
        #[serde(default)]
        data: String,
    },
    Deposit {
        caller: String,
        listing: String,
        amount: u128,
    },
    Withdraw {
        caller: String,
        listing: String,
        amount: u128,
    },
    Challenge {
        caller: String,
        listing: String,
        #[serde(default)]
        data: String,
    },
    UpdateStatus {
        listing: String,
    },
    Exit {
        caller: String,
        listing: String,
    },
    Propose {
        caller: String,
        label: String,
        key: String,
        value: u128,
        deposit: u128,
    },
    ChallengeProposal {
        caller: String,
        label: String,
    },
    Process {
        label: String,
    },
    /// Vote on the challenge opened against `target` (a listing or label).
    Commit {
        caller: String,
        target: String,
        vote: Vote,
        salt: u64,
        tokens: u128,
    },
    Reveal {
        caller: String,
        target: String,
        vote: Vote,
        salt: u64,
    },
    Claim {
        caller: String,
        target: String,
        salt: u64,
    },
    WithdrawVotingRights {
        caller: String,
        amount: u128,
    },
    Advance {
        secs: u64,
    },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::Apply { .. } => "apply",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::Challenge { .. } => "challenge",
            Self::UpdateStatus { .. } => "update-status",
            Self::Exit { .. } => "exit",
            Self::Propose { .. } => "propose",
            Self::ChallengeProposal { .. } => "challenge-proposal",
            Self::Process { .. } => "process",
            Self::Commit { .. } => "commit",
            Self::Reveal { .. } => "reveal",
            Self::Claim { .. } => "claim",
            Self::WithdrawVotingRights { .. } => "withdraw-voting-rights",
            Self::Advance { .. } => "advance",
        }
    }
}

/// Which contract a challenge poll belongs to.
#[derive(Clone, Copy, Debug)]
enum PollOwner {
    Registry,
    Parameterizer,
}

/// A deployment on a manual clock plus the names a script refers to.
pub struct Simulation {
    tcr: Deployment,
    clock: Arc<NullClock>,
    accounts: Vec<Address>,
    listings: Vec<String>,
    polls: HashMap<String, (PollId, PollOwner)>,
    proposals: HashMap<String, PropId>,
}

impl Simulation {
    pub fn new(tcr: Deployment, clock: Arc<NullClock>, config: &TcrConfig) -> Self {
        let mut accounts = vec![tcr.creator().clone()];
        accounts.extend(
            config
                .token
                .token_holders
                .iter()
                .map(|h| Address::new(h.address.as_str())),
        );
        Self {
            tcr,
            clock,
            accounts,
            listings: Vec::new(),
            polls: HashMap::new(),
            proposals: HashMap::new(),
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.tcr
    }

    pub fn run(&mut self, script: &Script) -> anyhow::Result<()> {
        if script.approve_all {
            self.approve_all();
        }
        for (i, step) in script.steps.iter().enumerate() {
            let n = i + 1;
            match (self.apply_step(&step.action), step.expect_failure) {
                (Ok(()), false) => {
                    tracing::debug!(step = n, action = step.action.name(), "step applied")
                }
                (Err(e), true) => {
                    tracing::info!(step = n, action = step.action.name(), error = %e, "step rejected as expected")
                }
                (Ok(()), true) => {
                    bail!("step {n} ({}) succeeded but was expected to fail", step.action.name())
                }
                (Err(e), false) => {
                    return Err(e.context(format!("step {n} ({}) failed", step.action.name())))
                }
            }
        }
        Ok(())
    }

    fn approve_all(&mut self) {
        let mut spenders = vec![
            self.tcr.voting_address().clone(),
            self.tcr.parameterizer_address().clone(),
        ];
        spenders.extend(self.tcr.registry_address().cloned());
        for owner in &self.accounts {
            let balance = self.tcr.balance_of(owner);
            for spender in &spenders {
                self.tcr.approve(owner, spender, balance);
            }
        }
    }

    fn apply_step(&mut self, action: &Action) -> anyhow::Result<()> {
        match action {
            Action::Apply {
                caller,
                listing,
                amount,
                data,
            } => {
                self.tcr
                    .apply(&Address::new(caller.as_str()), listing_hash(listing), *amount, data)?;
                if !self.listings.contains(listing) {
                    self.listings.push(listing.clone());
                }
            }
            Action::Deposit {
                caller,
                listing,
                amount,
            } => self
                .tcr
                .deposit(&Address::new(caller.as_str()), listing_hash(listing), *amount)?,
            Action::Withdraw {
                caller,
                listing,
                amount,
            } => self
                .tcr
                .withdraw(&Address::new(caller.as_str()), listing_hash(listing), *amount)?,
            Action::Challenge {
                caller,
                listing,
                data,
            } => {
                let outcome =
                    self.tcr
                        .challenge(&Address::new(caller.as_str()), listing_hash(listing), data)?;
                match outcome {
                    ChallengeOutcome::Opened(poll_id) => {
                        self.polls
                            .insert(listing.clone(), (poll_id, PollOwner::Registry));
                    }
                    ChallengeOutcome::TouchedAndRemoved => {
                        tracing::info!(listing = %listing, "listing fell below the minimum deposit and was removed");
                    }
                }
            }
            Action::UpdateStatus { listing } => self.tcr.update_status(listing_hash(listing))?,
            Action::Exit { caller, listing } => self
                .tcr
                .exit(&Address::new(caller.as_str()), listing_hash(listing))?,
            Action::Propose {
                caller,
                label,
                key,
                value,
                deposit,
            } => {
                let key: ParamKey = key.parse()?;
                let prop_id =
                    self.tcr
                        .propose(&Address::new(caller.as_str()), key, *value, *deposit)?;
                self.proposals.insert(label.clone(), prop_id);
            }
            Action::ChallengeProposal { caller, label } => {
                let prop_id = self.proposal(label)?;
                let poll_id = self
                    .tcr
                    .challenge_proposal(&Address::new(caller.as_str()), prop_id)?;
                self.polls
                    .insert(label.clone(), (poll_id, PollOwner::Parameterizer));
            }
            Action::Process { label } => {
                let prop_id = self.proposal(label)?;
                self.tcr.process_proposal(prop_id)?;
            }
            Action::Commit {
                caller,
                target,
                vote,
                salt,
                tokens,
            } => {
                let (poll_id, _) = self.poll(target)?;
                let hash = commit_vote_hash((*vote).into(), *salt);
                self.tcr
                    .commit_vote(&Address::new(caller.as_str()), poll_id, hash, *tokens)?;
            }
            Action::Reveal {
                caller,
                target,
                vote,
                salt,
            } => {
                let (poll_id, _) = self.poll(target)?;
                self.tcr.reveal_vote(
                    &Address::new(caller.as_str()),
                    poll_id,
                    (*vote).into(),
                    *salt,
                )?;
            }
            Action::Claim {
                caller,
                target,
                salt,
            } => {
                let caller = Address::new(caller.as_str());
                let (poll_id, owner) = self.poll(target)?;
                let reward = match owner {
                    PollOwner::Registry => self.tcr.claim_reward(&caller, poll_id, *salt)?,
                    PollOwner::Parameterizer => {
                        self.tcr.claim_proposal_reward(&caller, poll_id, *salt)?
                    }
                };
                tracing::info!(voter = %caller, target = %target, reward, "reward claimed");
            }
            Action::WithdrawVotingRights { caller, amount } => self
                .tcr
                .withdraw_voting_rights(&Address::new(caller.as_str()), *amount)?,
            Action::Advance { secs } => {
                self.clock.advance(*secs);
                tracing::debug!(by = %format_duration(*secs), now = %self.tcr.now(), "clock advanced");
            }
        }
        Ok(())
    }

    fn poll(&self, target: &str) -> anyhow::Result<(PollId, PollOwner)> {
        self.polls
            .get(target)
            .copied()
            .ok_or_else(|| anyhow!("no challenge has been opened against {target:?}"))
    }

    fn proposal(&self, label: &str) -> anyhow::Result<PropId> {
        self.proposals
            .get(label)
            .copied()
            .ok_or_else(|| anyhow!("no proposal labelled {label:?}"))
    }

    /// Listing statuses, balances and parameters at the current time.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} at {}", self.tcr.name(), self.tcr.now());
        let _ = writeln!(out, "total supply: {}", self.tcr.total_supply());

        let _ = writeln!(out, "listings:");
        for name in &self.listings {
            let status = self
                .tcr
                .listing_status(listing_hash(name))
                .map(|s| format!("{s:?}"))
                .unwrap_or_else(|| "Removed".to_string());
            let _ = writeln!(out, "  {name:<24} {status}");
        }

        let _ = writeln!(out, "balances:");
        let balances: BTreeMap<&Address, u128> = self
            .accounts
            .iter()
            .map(|a| (a, self.tcr.balance_of(a)))
            .collect();
        for (account, balance) in balances {
            let locked = self.tcr.voting().voting_rights(account);
            let _ = writeln!(
                out,
                "  {:<24} {balance} (+{locked} in voting)",
                account.as_str()
            );
        }

        let _ = writeln!(out, "parameters:");
        for (key, value) in self.tcr.parameterizer().params() {
            let _ = writeln!(out, "  {:<20} {value}", key.name());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcr_factory::{RegistryFactory, TokenHolder};

    fn simulation() -> Simulation {
        let mut config = TcrConfig::new("sim");
        config.token.decimals = 0;
        config.token.supply = 100_000;
        config.token.token_holders = ["applicant", "challenger", "alice", "bob"]
            .iter()
            .map(|a| TokenHolder {
                address: a.to_string(),
                amount: 10_000,
            })
            .collect();
        let clock = Arc::new(NullClock::new(0));
        let tcr = RegistryFactory::from_config(&Address::new("creator"), &config, clock.clone())
            .unwrap();
        Simulation::new(tcr, clock, &config)
    }

    const CHALLENGE_GAME: &str = r#"
        [[step]]
        action = "apply"
        caller = "applicant"
        listing = "a.net"
        amount = 10

        [[step]]
        action = "challenge"
        caller = "challenger"
        listing = "a.net"

        [[step]]
        action = "commit"
        caller = "alice"
        target = "a.net"
        vote = "for"
        salt = 420
        tokens = 800

        [[step]]
        action = "commit"
        caller = "bob"
        target = "a.net"
        vote = "against"
        salt = 9001
        tokens = 300

        [[step]]
        action = "advance"
        secs = 600

        [[step]]
        action = "reveal"
        caller = "alice"
        target = "a.net"
        vote = "for"
        salt = 420

        [[step]]
        action = "reveal"
        caller = "bob"
        target = "a.net"
        vote = "against"
        salt = 9001

        [[step]]
        action = "update-status"
        listing = "a.net"
        expect_failure = true

        [[step]]
        action = "advance"
        secs = 600

        [[step]]
        action = "update-status"
        listing = "a.net"

        [[step]]
        action = "claim"
        caller = "alice"
        target = "a.net"
        salt = 420
    "#;

    #[test]
    fn challenge_game_runs_to_whitelist() {
        let script = Script::from_toml_str(CHALLENGE_GAME).unwrap();
        assert_eq!(script.steps.len(), 11);
        assert!(script.steps[7].expect_failure);

        let mut sim = simulation();
        sim.run(&script).unwrap();

        let tcr = sim.deployment();
        assert!(tcr.is_whitelisted(listing_hash("a.net")));
        assert_eq!(tcr.total_supply(), 100_080);
        assert_eq!(tcr.balance_of(&Address::new("alice")), 10_000 - 800 + 85);

        let report = sim.report();
        assert!(report.contains("Whitelisted"));
        assert!(report.contains("total supply: 100080"));
    }

    #[test]
    fn unexpected_failure_names_the_step() {
        let script = Script::from_toml_str(
            r#"
            [[step]]
            action = "update-status"
            listing = "missing.net"
            "#,
        )
        .unwrap();
        let err = simulation().run(&script).unwrap_err();
        assert!(err.to_string().contains("step 1 (update-status)"));
    }

    #[test]
    fn unexpected_success_is_an_error() {
        let script = Script::from_toml_str(
            r#"
            [[step]]
            action = "advance"
            secs = 1
            expect_failure = true
            "#,
        )
        .unwrap();
        assert!(simulation().run(&script).is_err());
    }

    #[test]
    fn proposal_by_label() {
        let script = Script::from_toml_str(
            r#"
            [[step]]
            action = "propose"
            caller = "alice"
            label = "cheaper"
            key = "minDeposit"
            value = 5
            deposit = 100

            [[step]]
            action = "advance"
            secs = 1200

            [[step]]
            action = "process"
            label = "cheaper"
            "#,
        )
        .unwrap();
        let mut sim = simulation();
        sim.run(&script).unwrap();
        assert_eq!(sim.deployment().get(ParamKey::MinDeposit), 5);
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(Script::from_toml_str("[[step]]\naction = \"mint\"\n").is_err());
    }
}
