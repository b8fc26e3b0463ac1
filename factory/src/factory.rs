//! Factories wiring token, ballot engine, parameterizer and registry together.
//!
//! Each call produces an independent deployment. Component addresses are
//! derived from the deployment name (`<slug>/registry` and so on).

use crate::config::{slugify, ConfigError, TcrConfig, TokenConfig};
use crate::deployment::{Deployment, DeploymentState};
use crate::error::TcrError;
use crate::event::TcrEvent;
use std::sync::Arc;
use tcr_parameterizer::Parameterizer;
use tcr_registry::Registry;
use tcr_token::{OraclizedToken, TokenLedger};
use tcr_types::{Address, Clock, ParamDefaults};
use tcr_voting::PlcrVoting;

struct Addresses {
    slug: String,
    token: Address,
    voting: Address,
    parameterizer: Address,
    registry: Address,
}

impl Addresses {
    fn for_name(name: &str) -> Result<Self, TcrError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ConfigError::EmptyName.into());
        }
        Ok(Self {
            token: Address::component(&slug, "token"),
            voting: Address::component(&slug, "voting"),
            parameterizer: Address::component(&slug, "parameterizer"),
            registry: Address::component(&slug, "registry"),
            slug,
        })
    }
}

fn mint(creator: &Address, config: &TokenConfig, oracle: Address) -> Result<OraclizedToken, TcrError> {
    let mut token = OraclizedToken::new(config.metadata(), creator, config.supply, oracle);
    for holder in &config.token_holders {
        token.transfer(creator, &Address::new(holder.address.as_str()), holder.amount)?;
    }
    Ok(token)
}

fn assemble(
    name: &str,
    creator: &Address,
    token: OraclizedToken,
    params: &ParamDefaults,
    with_registry: bool,
    clock: Arc<dyn Clock>,
) -> Result<Deployment, TcrError> {
    let addrs = Addresses::for_name(name)?;
    let parameterizer = Parameterizer::new(addrs.parameterizer.clone(), params)?;
    let registry = with_registry.then(|| Registry::new(name, addrs.registry.clone()));

    let mut deployment = Deployment::new(
        DeploymentState {
            name: name.to_string(),
            creator: creator.clone(),
            token,
            voting: PlcrVoting::new(addrs.voting.clone()),
            parameterizer,
            registry,
        },
        clock,
    );
    tracing::info!(
        name,
        slug = %addrs.slug,
        creator = %creator,
        with_registry,
        "deployment created"
    );
    deployment.record(TcrEvent::DeploymentCreated {
        creator: creator.clone(),
        token: addrs.token,
        voting: addrs.voting,
        parameterizer: addrs.parameterizer,
        registry: with_registry.then_some(addrs.registry),
    });
    Ok(deployment)
}

/// Builds full registry deployments.
pub struct RegistryFactory;

impl RegistryFactory {
    /// Mint a fresh token to `creator` and deploy a registry that holds its
    /// supply oracle.
    pub fn new_registry_with_token(
        creator: &Address,
        token: &TokenConfig,
        params: &ParamDefaults,
        name: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Deployment, TcrError> {
        let addrs = Addresses::for_name(name)?;
        let token = mint(creator, token, addrs.registry)?;
        assemble(name, creator, token, params, true, clock)
    }

    /// Deploy a registry over an existing token. Its oracle is left alone until
    /// the holder calls `change_supply_oracle`.
    pub fn new_registry_byo_token(
        creator: &Address,
        token: OraclizedToken,
        params: &ParamDefaults,
        name: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Deployment, TcrError> {
        assemble(name, creator, token, params, true, clock)
    }

    /// Deploy from a config. A config with `deployToken = false` gets a token
    /// whose oracle stays with the creator, as an existing token would.
    pub fn from_config(creator: &Address, config: &TcrConfig, clock: Arc<dyn Clock>) -> Result<Deployment, TcrError> {
        config.validate()?;
        if config.token.deploy_token {
            Self::new_registry_with_token(
                creator,
                &config.token,
                &config.param_defaults,
                &config.name,
                clock,
            )
        } else {
            let token = mint(creator, &config.token, creator.clone())?;
            Self::new_registry_byo_token(creator, token, &config.param_defaults, &config.name, clock)
        }
    }
}

/// Builds parameterizer-only deployments (ballot engine + parameter store).
pub struct ParameterizerFactory;

impl ParameterizerFactory {
    /// Mint a fresh token to `creator`, who also keeps the supply oracle.
    pub fn new_parameterizer_with_token(
        creator: &Address,
        token: &TokenConfig,
        params: &ParamDefaults,
        name: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Deployment, TcrError> {
        let token = mint(creator, token, creator.clone())?;
        assemble(name, creator, token, params, false, clock)
    }

    pub fn new_parameterizer_byo_token(
        creator: &Address,
        token: OraclizedToken,
        params: &ParamDefaults,
        name: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Deployment, TcrError> {
        assemble(name, creator, token, params, false, clock)
    }
}
