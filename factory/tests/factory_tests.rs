mod common;

use std::sync::Arc;

use common::*;
use tcr_crypto::listing_hash;
use tcr_factory::{Deployment, ParameterizerFactory, RegistryFactory, TcrError, TcrEvent};
use tcr_nullables::{NullClock, NullStore};
use tcr_token::{OraclizedToken, TokenLedger};
use tcr_types::{Address, ErrorKind, ParamKey};

#[test]
fn registry_with_token_records_creator_and_hands_oracle_to_registry() {
    let clock = Arc::new(NullClock::new(0));
    let config = test_config();
    let mut tcr = RegistryFactory::new_registry_with_token(
        &addr("creator"),
        &config.token,
        &config.param_defaults,
        &config.name,
        clock,
    )
    .unwrap();

    let registry = tcr.registry_address().cloned().unwrap();
    assert_eq!(registry, Address::new("the-testchain-registry/registry"));
    assert_eq!(tcr.token().supply_oracle(), &registry);
    assert_eq!(tcr.creator(), &addr("creator"));
    assert_eq!(tcr.registry().unwrap().name(), "The TestChain Registry");
    assert_eq!(
        tcr.balance_of(&addr("creator")),
        1_000_000 - FUNDED * ACCOUNTS.len() as u128
    );
    assert_eq!(tcr.token().metadata.symbol, "TEST");

    let events = tcr.take_events();
    assert!(matches!(
        &events[0],
        TcrEvent::DeploymentCreated { creator, registry: Some(_), .. } if creator == &addr("creator")
    ));
}

#[test]
fn byo_token_keeps_its_oracle() {
    let clock = Arc::new(NullClock::new(0));
    let config = test_config();
    let token = OraclizedToken::new(
        config.token.metadata(),
        &addr("holder"),
        5_000,
        addr("holder"),
    );
    let tcr = RegistryFactory::new_registry_byo_token(
        &addr("creator"),
        token,
        &config.param_defaults,
        "byo",
        clock,
    )
    .unwrap();
    assert_eq!(tcr.token().supply_oracle(), &addr("holder"));
    assert_eq!(tcr.balance_of(&addr("holder")), 5_000);
}

#[test]
fn parameterizer_factory_has_no_registry() {
    let clock = Arc::new(NullClock::new(0));
    let config = test_config();
    let mut tcr = ParameterizerFactory::new_parameterizer_with_token(
        &addr("creator"),
        &config.token,
        &config.param_defaults,
        "params only",
        clock,
    )
    .unwrap();
    assert!(tcr.registry().is_none());
    assert_eq!(tcr.get(ParamKey::MinDeposit), 10);
    assert_eq!(tcr.token().supply_oracle(), &addr("creator"));

    let err = tcr
        .apply(&addr("applicant"), listing_hash("a.net"), 10, "")
        .unwrap_err();
    assert!(matches!(err, TcrError::NoRegistry(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn deployments_are_independent() {
    let (mut first, _c1) = deploy();
    let (second, _c2) = deploy();
    let listing = listing_hash("a.net");
    first
        .apply(&addr("applicant"), listing, MIN_DEPOSIT, "")
        .unwrap();
    assert!(first.registry().unwrap().app_was_made(listing));
    assert!(!second.registry().unwrap().app_was_made(listing));
}

#[test]
fn unnamed_deployment_is_rejected() {
    let clock = Arc::new(NullClock::new(0));
    let config = test_config();
    let result = RegistryFactory::new_registry_with_token(
        &addr("creator"),
        &config.token,
        &config.param_defaults,
        "!!!",
        clock,
    );
    assert!(matches!(result, Err(TcrError::Config(_))));
}

#[test]
fn saved_deployment_loads_with_state_intact() {
    let (mut tcr, clock) = deploy();
    let listing = listing_hash("a.net");
    tcr.apply(&addr("applicant"), listing, MIN_DEPOSIT, "")
        .unwrap();

    let store = NullStore::new();
    tcr.save(&store).unwrap();
    let mut restored = Deployment::load(&store, "The TestChain Registry", clock.clone()).unwrap();

    assert_eq!(restored.balance_of(&addr("applicant")), FUNDED - MIN_DEPOSIT);
    assert!(restored.take_events().is_empty());
    clock.advance(APPLY);
    restored.update_status(listing).unwrap();
    assert!(restored.is_whitelisted(listing));

    assert!(matches!(
        Deployment::load(&store, "unknown", clock),
        Err(TcrError::Store(_))
    ));
}
