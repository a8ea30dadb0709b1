mod common;

use common::{counter_account, StubRpc};
use counter_delegation_client::{
    ownership::{Layer, OwnerPrograms, OwnerTag, OwnershipTracker},
    DelegationConfig,
};
use counter_delegation_sdk::{Pubkey, DELEGATION_PROGRAM_ID};

fn tracker() -> (DelegationConfig, OwnershipTracker) {
    let config = DelegationConfig::new(Pubkey::new_unique(), Pubkey::new_unique());
    let tracker = OwnershipTracker::new(config.counter_address(), OwnerPrograms::from(&config));
    (config, tracker)
}

#[tokio::test]
async fn test_fetch_base_counter() {
    let (config, tracker) = tracker();
    let base = StubRpc::default().with_account(
        config.counter_address(),
        counter_account(config.counter_program_id, 11),
    );
    let ephemeral = StubRpc::default();

    let state = tracker.fetch(&base, &ephemeral).await.unwrap();

    assert_eq!(state.mainnet_owner, Some(OwnerTag::BaseProgram));
    assert_eq!(state.mainnet_counter, Some(11));
    assert_eq!(state.ephemeral_owner, None);
    assert_eq!(ephemeral.calls(), 0);
    let gates = tracker.gates();
    assert!(gates.delegate);
    assert!(gates.increment_mainnet);
    assert!(!gates.undelegate);
}

#[tokio::test]
async fn test_fetch_delegated_counter() {
    let (config, tracker) = tracker();
    let mut delegated = counter_account(config.compressed_delegation_program_id, 0);
    delegated.data = vec![];
    let base = StubRpc::default().with_account(config.counter_address(), delegated);
    let ephemeral = StubRpc::default().with_account(
        config.counter_address(),
        counter_account(config.counter_program_id, 21),
    );

    let state = tracker.fetch(&base, &ephemeral).await.unwrap();

    assert_eq!(
        state.mainnet_owner,
        Some(OwnerTag::CompressedDelegationProgram)
    );
    assert_eq!(state.ephemeral_owner, Some(OwnerTag::BaseProgram));
    assert_eq!(state.ephemeral_counter, Some(21));
    assert_eq!(state.mainnet_counter, None);
    let gates = tracker.gates();
    assert!(!gates.delegate);
    assert!(!gates.increment_mainnet);
    assert!(gates.increment_ephemeral);
    assert!(gates.schedule_undelegate);
}

#[tokio::test]
async fn test_fetch_missing_counter() {
    let (_, tracker) = tracker();
    let state = tracker
        .fetch(&StubRpc::default(), &StubRpc::default())
        .await
        .unwrap();
    assert_eq!(state, Default::default());
    assert!(tracker.gates().delegate);
}

#[test]
fn test_undelegation_flow_from_notifications() {
    let (config, tracker) = tracker();
    tracker
        .apply_update(Layer::Base, &config.compressed_delegation_program_id, &[])
        .unwrap();
    tracker
        .apply_update(Layer::Ephemeral, &config.counter_program_id, &[])
        .unwrap();
    assert!(tracker.gates().schedule_undelegate);
    assert!(!tracker.gates().undelegate);

    // Scheduled undelegation hands the ephemeral account to the delegation program.
    tracker
        .apply_update(Layer::Ephemeral, &DELEGATION_PROGRAM_ID, &[])
        .unwrap();
    let gates = tracker.gates();
    assert!(gates.undelegate);
    assert!(!gates.schedule_undelegate);
    assert!(!gates.increment_ephemeral);
}
