#![allow(dead_code)]

use std::sync::Arc;

use tcr_factory::{Deployment, RegistryFactory, TcrConfig, TokenHolder};
use tcr_nullables::NullClock;
use tcr_types::Address;

pub const APPLY: u64 = 600;
pub const COMMIT: u64 = 600;
pub const REVEAL: u64 = 600;
pub const MIN_DEPOSIT: u128 = 10;
pub const FUNDED: u128 = 10_000;

pub const ACCOUNTS: [&str; 4] = ["applicant", "challenger", "voter-alice", "voter-bob"];

pub fn addr(name: &str) -> Address {
    Address::new(name)
}

pub fn test_config() -> TcrConfig {
    let mut config = TcrConfig::new("The TestChain Registry");
    config.token.decimals = 0;
    config.token.supply = 1_000_000;
    config.token.token_holders = ACCOUNTS
        .iter()
        .map(|a| TokenHolder {
            address: a.to_string(),
            amount: FUNDED,
        })
        .collect();
    config
}

/// A fresh registry deployment whose test accounts have approved every
/// component for their whole balance.
pub fn deploy() -> (Deployment, Arc<NullClock>) {
    let clock = Arc::new(NullClock::new(1_000));
    let mut tcr = RegistryFactory::from_config(&addr("creator"), &test_config(), clock.clone()).unwrap();
    approve_all(&mut tcr);
    (tcr, clock)
}

pub fn approve_all(tcr: &mut Deployment) {
    let spenders = [
        tcr.registry_address().cloned(),
        Some(tcr.voting_address().clone()),
        Some(tcr.parameterizer_address().clone()),
    ];
    for account in ACCOUNTS {
        for spender in spenders.iter().flatten() {
            tcr.approve(&addr(account), spender, FUNDED);
        }
    }
}
