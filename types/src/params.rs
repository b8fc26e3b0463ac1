//! Governed parameters: the keys the parameterizer stores and their defaults.
//!
//! Every key is changeable through a challengeable proposal, including the
//! `p*` keys that govern the parameterizer's own proposals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A governed parameter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParamKey {
    // Registry
    MinDeposit,
    ApplyStageLength,
    CommitStageLength,
    RevealStageLength,
    DispensationPct,
    VoteQuorum,
    InflationFactor,

    // Parameterizer (self-governing)
    PMinDeposit,
    PApplyStageLength,
    PCommitStageLength,
    PRevealStageLength,
    PDispensationPct,
    PVoteQuorum,
}

/// The key name did not match any governed parameter.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown parameter key: {0}")]
pub struct UnknownParamKey(pub String);

impl ParamKey {
    pub const ALL: [ParamKey; 13] = [
        Self::MinDeposit,
        Self::PMinDeposit,
        Self::ApplyStageLength,
        Self::PApplyStageLength,
        Self::CommitStageLength,
        Self::PCommitStageLength,
        Self::RevealStageLength,
        Self::PRevealStageLength,
        Self::DispensationPct,
        Self::PDispensationPct,
        Self::VoteQuorum,
        Self::PVoteQuorum,
        Self::InflationFactor,
    ];

    /// Stable name, used for proposal ids and configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinDeposit => "minDeposit",
            Self::ApplyStageLength => "applyStageLength",
            Self::CommitStageLength => "commitStageLength",
            Self::RevealStageLength => "revealStageLength",
            Self::DispensationPct => "dispensationPct",
            Self::VoteQuorum => "voteQuorum",
            Self::InflationFactor => "inflationFactor",
            Self::PMinDeposit => "pMinDeposit",
            Self::PApplyStageLength => "pApplyStageLength",
            Self::PCommitStageLength => "pCommitStageLength",
            Self::PRevealStageLength => "pRevealStageLength",
            Self::PDispensationPct => "pDispensationPct",
            Self::PVoteQuorum => "pVoteQuorum",
        }
    }

    /// Percentages (dispensation, quorum) must stay within 0..=100.
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            Self::DispensationPct | Self::PDispensationPct | Self::VoteQuorum | Self::PVoteQuorum
        )
    }

    /// Stage lengths size poll windows and must be non-zero.
    pub fn is_stage_length(&self) -> bool {
        matches!(
            self,
            Self::ApplyStageLength
                | Self::PApplyStageLength
                | Self::CommitStageLength
                | Self::PCommitStageLength
                | Self::RevealStageLength
                | Self::PRevealStageLength
        )
    }

    /// Whether `value` is acceptable for this key.
    pub fn accepts(&self, value: u128) -> bool {
        if self.is_percentage() {
            return value <= 100;
        }
        if self.is_stage_length() {
            return value > 0 && value <= u64::MAX as u128;
        }
        true
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = UnknownParamKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownParamKey(s.to_string()))
    }
}

/// Initial values for every governed parameter.
///
/// Field names serialize in camelCase so the original `paramDefaults` JSON
/// layout loads unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamDefaults {
    /// Deposit (raw token units) required to apply. Listings that fall below it
    /// are removed when challenged.
    pub min_deposit: u128,
    /// Deposit required to propose or challenge a parameter change.
    pub p_min_deposit: u128,
    /// Seconds an unchallenged application waits before it can be whitelisted.
    pub apply_stage_length: u128,
    pub p_apply_stage_length: u128,
    /// Length of the commit window for registry challenges.
    pub commit_stage_length: u128,
    pub p_commit_stage_length: u128,
    /// Length of the reveal window for registry challenges.
    pub reveal_stage_length: u128,
    pub p_reveal_stage_length: u128,
    /// Percentage of the loser's stake the challenge winner keeps.
    /// The remainder goes to the voter reward pool.
    pub dispensation_pct: u128,
    pub p_dispensation_pct: u128,
    /// Percentage of votes cast that must be "for" for a poll to pass.
    pub vote_quorum: u128,
    pub p_vote_quorum: u128,
    /// Percentage of the winning bloc's token weight minted on resolution.
    pub inflation_factor: u128,
}

impl ParamDefaults {
    pub fn get(&self, key: ParamKey) -> u128 {
        match key {
            ParamKey::MinDeposit => self.min_deposit,
            ParamKey::PMinDeposit => self.p_min_deposit,
            ParamKey::ApplyStageLength => self.apply_stage_length,
            ParamKey::PApplyStageLength => self.p_apply_stage_length,
            ParamKey::CommitStageLength => self.commit_stage_length,
            ParamKey::PCommitStageLength => self.p_commit_stage_length,
            ParamKey::RevealStageLength => self.reveal_stage_length,
            ParamKey::PRevealStageLength => self.p_reveal_stage_length,
            ParamKey::DispensationPct => self.dispensation_pct,
            ParamKey::PDispensationPct => self.p_dispensation_pct,
            ParamKey::VoteQuorum => self.vote_quorum,
            ParamKey::PVoteQuorum => self.p_vote_quorum,
            ParamKey::InflationFactor => self.inflation_factor,
        }
    }

    /// All `(key, value)` pairs in canonical key order.
    pub fn entries(&self) -> impl Iterator<Item = (ParamKey, u128)> + '_ {
        ParamKey::ALL.iter().map(move |k| (*k, self.get(*k)))
    }

    /// The first key whose value is out of range, if any.
    pub fn first_invalid(&self) -> Option<(ParamKey, u128)> {
        self.entries().find(|(k, v)| !k.accepts(*v))
    }
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self {
            min_deposit: 10,
            p_min_deposit: 100,
            apply_stage_length: 600,
            p_apply_stage_length: 1200,
            commit_stage_length: 600,
            p_commit_stage_length: 1200,
            reveal_stage_length: 600,
            p_reveal_stage_length: 1200,
            dispensation_pct: 50,
            p_dispensation_pct: 50,
            vote_quorum: 50,
            p_vote_quorum: 50,
            inflation_factor: 10,
        }
    }
}
