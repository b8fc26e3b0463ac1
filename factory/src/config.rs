//! Deployment configuration with TOML and JSON file support.
//!
//! The JSON form follows the `conf/config.json` layout registries have
//! historically shipped with: camelCase keys, a `paramDefaults` table, and
//! token amounts that may be written as decimal strings.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tcr_token::TokenMetadata;
use tcr_types::{Address, ParamDefaults, ParamKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("registry name must not be empty")]
    EmptyName,

    #[error("{value} is not a valid default for {key}")]
    InvalidParam { key: ParamKey, value: u128 },

    #[error("invalid token holder address {0:?}")]
    InvalidHolder(String),

    #[error("token holders are allocated {allocated}, more than the supply {supply}")]
    HoldersExceedSupply { allocated: u128, supply: u128 },
}

/// A registry deployment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcrConfig {
    pub name: String,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub param_defaults: ParamDefaults,
}

/// The token a deployment settles in.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    /// Mint a fresh token (`true`) or bring an existing one.
    #[serde(default = "default_true")]
    pub deploy_token: bool,

    #[serde(default = "default_token_name")]
    pub name: String,

    #[serde(default = "default_token_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals", deserialize_with = "decimals")]
    pub decimals: u8,

    /// Initial supply in raw units, credited to the creator.
    #[serde(default = "default_supply", deserialize_with = "amount")]
    pub supply: u128,

    /// Accounts the creator funds right after deployment.
    #[serde(default)]
    pub token_holders: Vec<TokenHolder>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenHolder {
    pub address: String,
    #[serde(deserialize_with = "amount")]
    pub amount: u128,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_token_name() -> String {
    "TestCoin".to_string()
}

fn default_token_symbol() -> String {
    "TEST".to_string()
}

fn default_decimals() -> u8 {
    18
}

fn default_supply() -> u128 {
    1_000_000_000 * 10u128.pow(18)
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            deploy_token: default_true(),
            name: default_token_name(),
            symbol: default_token_symbol(),
            decimals: default_decimals(),
            supply: default_supply(),
            token_holders: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

/// Accept `1000` or `"1000"`; strings carry amounts beyond `u64`.
fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
    match NumberOrString::deserialize(d)? {
        NumberOrString::Number(n) => Ok(u128::from(n)),
        NumberOrString::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

fn decimals<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let raw = amount(d)?;
    u8::try_from(raw).map_err(|_| de::Error::custom(format!("decimals {raw} out of range")))
}

// ── Impl ───────────────────────────────────────────────────────────────

impl TcrConfig {
    /// A config with default token and parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: TokenConfig::default(),
            param_defaults: ParamDefaults::default(),
        }
    }

    /// Load from a file; `.json` files use the JSON layout, anything else TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if let Some((key, value)) = self.param_defaults.first_invalid() {
            return Err(ConfigError::InvalidParam { key, value });
        }
        let mut allocated = 0u128;
        for holder in &self.token.token_holders {
            if !Address::new(holder.address.as_str()).is_valid() {
                return Err(ConfigError::InvalidHolder(holder.address.clone()));
            }
            allocated = allocated.saturating_add(holder.amount);
        }
        if allocated > self.token.supply {
            return Err(ConfigError::HoldersExceedSupply {
                allocated,
                supply: self.token.supply,
            });
        }
        Ok(())
    }

    /// Address-safe form of the name, used to derive component addresses.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

impl TokenConfig {
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}

/// Lowercase alphanumerics, other runs collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ORIGINAL_JSON: &str = r#"{
        "paramDefaults": {
            "minDeposit": 10,
            "pMinDeposit": 100,
            "applyStageLength": 600,
            "pApplyStageLength": 1200,
            "commitStageLength": 600,
            "pCommitStageLength": 1200,
            "revealStageLength": 600,
            "pRevealStageLength": 1200,
            "dispensationPct": 50,
            "pDispensationPct": 50,
            "voteQuorum": 50,
            "pVoteQuorum": 50
        },
        "name": "The TestChain Registry",
        "token": {
            "address": "0x337cDDa6D41A327c5ad456166CCB781a9722AFf9",
            "deployToken": true,
            "decimals": "18",
            "name": "TestCoin",
            "supply": "1000000000000000000000000000",
            "symbol": "TEST",
            "tokenHolders": [
                { "address": "0xd09cc3bc67e4294c4a446d8e4a2934a921410ed7", "amount": "1000000000000000000000" }
            ]
        }
    }"#;

    #[test]
    fn original_json_layout_loads() {
        let config = TcrConfig::from_json_str(ORIGINAL_JSON).unwrap();
        assert_eq!(config.name, "The TestChain Registry");
        assert_eq!(config.param_defaults.p_apply_stage_length, 1200);
        // missing from the file, so the default applies
        assert_eq!(config.param_defaults.inflation_factor, 10);
        assert_eq!(config.token.decimals, 18);
        assert_eq!(config.token.supply, 10u128.pow(27));
        assert_eq!(config.token.token_holders[0].amount, 10u128.pow(21));
        assert_eq!(config.slug(), "the-testchain-registry");
    }

    #[test]
    fn toml_with_partial_params() {
        let config = TcrConfig::from_toml_str(
            r#"
            name = "dev"

            [token]
            name = "DevCoin"
            symbol = "DEV"
            decimals = 0
            supply = 5000

            [[token.tokenHolders]]
            address = "alice"
            amount = 1000

            [paramDefaults]
            minDeposit = 50
            inflationFactor = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.param_defaults.min_deposit, 50);
        assert_eq!(config.param_defaults.inflation_factor, 20);
        assert_eq!(config.param_defaults.vote_quorum, 50);
        assert_eq!(config.token.metadata().symbol, "DEV");
        assert_eq!(config.token.token_holders.len(), 1);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = TcrConfig::from_toml_str("name = \"x\"\n[paramDefaults]\nvoteQuorum = 101\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParam {
                key: ParamKey::VoteQuorum,
                value: 101
            }
        ));
        let err = TcrConfig::from_toml_str("name = \"x\"\n[paramDefaults]\ncommitStageLength = 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParam { .. }));
    }

    #[test]
    fn holders_cannot_exceed_supply() {
        let err = TcrConfig::from_toml_str(
            "name = \"x\"\n[token]\nsupply = 10\n[[token.tokenHolders]]\naddress = \"a\"\namount = 11\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::HoldersExceedSupply {
                allocated: 11,
                supply: 10
            }
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            TcrConfig::from_toml_str("name = \"  \""),
            Err(ConfigError::EmptyName)
        ));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        std::fs::File::create(&json_path)
            .unwrap()
            .write_all(ORIGINAL_JSON.as_bytes())
            .unwrap();
        assert_eq!(
            TcrConfig::load(&json_path).unwrap().token.symbol,
            "TEST"
        );

        let toml_path = dir.path().join("tcr.toml");
        std::fs::write(&toml_path, "name = \"from toml\"\n").unwrap();
        assert_eq!(TcrConfig::load(&toml_path).unwrap().name, "from toml");

        assert!(matches!(
            TcrConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slugify("  My  TCR!! v2 "), "my-tcr-v2");
    }
}
