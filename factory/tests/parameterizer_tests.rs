mod common;

use common::*;
use tcr_crypto::{commit_vote_hash, listing_hash};
use tcr_parameterizer::ParameterizerError;
use tcr_factory::TcrError;
use tcr_registry::ChallengeOutcome;
use tcr_types::{ParamKey, VoteOption};

const P_STAGE: u64 = 1200;
const P_MIN_DEPOSIT: u128 = 100;

#[test]
fn accepted_proposal_changes_registry_economics() {
    let (mut tcr, clock) = deploy();
    let prop = tcr
        .propose(&addr("voter-alice"), ParamKey::MinDeposit, 50, P_MIN_DEPOSIT)
        .unwrap();
    // not visible until processed
    assert_eq!(tcr.get(ParamKey::MinDeposit), MIN_DEPOSIT);

    clock.advance(P_STAGE);
    tcr.process_proposal(prop).unwrap();
    assert_eq!(tcr.get(ParamKey::MinDeposit), 50);

    let err = tcr
        .apply(&addr("applicant"), listing_hash("a.net"), MIN_DEPOSIT, "")
        .unwrap_err();
    assert_eq!(err.kind(), tcr_types::ErrorKind::InsufficientFunds);
}

#[test]
fn challenged_proposal_rejected_by_vote() {
    let (mut tcr, clock) = deploy();
    let prop = tcr
        .propose(&addr("voter-alice"), ParamKey::DispensationPct, 80, P_MIN_DEPOSIT)
        .unwrap();
    let poll = tcr.challenge_proposal(&addr("challenger"), prop).unwrap();
    tcr.commit_vote(&addr("voter-bob"), poll, commit_vote_hash(VoteOption::Against, 5), 1_000)
        .unwrap();

    assert!(matches!(
        tcr.process_proposal(prop),
        Err(TcrError::Parameterizer(ParameterizerError::NotReadyToProcess(_)))
    ));
    clock.advance(P_STAGE);
    tcr.reveal_vote(&addr("voter-bob"), poll, VoteOption::Against, 5)
        .unwrap();
    clock.advance(P_STAGE);
    tcr.process_proposal(prop).unwrap();

    assert_eq!(tcr.get(ParamKey::DispensationPct), 50);
    assert_eq!(tcr.balance_of(&addr("challenger")), FUNDED + 50);
    assert_eq!(tcr.claim_proposal_reward(&addr("voter-bob"), poll, 5).unwrap(), 50);
}

#[test]
fn raised_minimum_touches_and_removes_underfunded_listing() {
    let (mut tcr, clock) = deploy();
    let listing = listing_hash("a.net");
    tcr.apply(&addr("applicant"), listing, MIN_DEPOSIT, "").unwrap();
    let prop = tcr
        .propose(&addr("voter-alice"), ParamKey::MinDeposit, 20, P_MIN_DEPOSIT)
        .unwrap();
    clock.advance(P_STAGE);
    tcr.process_proposal(prop).unwrap();

    assert_eq!(
        tcr.challenge(&addr("challenger"), listing, "").unwrap(),
        ChallengeOutcome::TouchedAndRemoved
    );
    assert_eq!(tcr.balance_of(&addr("applicant")), FUNDED);
}
