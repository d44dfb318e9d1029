use crate::{
    Fixture,
    contracts::{count, increment},
};
use alloy::primitives::{Address, U256};
use multicall::{
    constants::TX_BASE_ENERGY,
    error::MulticallError,
    multicall::Multicall,
    transport::ProviderClient,
    types::{Call, CallOptions, ITronMulticall},
};
use std::time::Duration;

/// Runaway self-recursion fails at the call depth limit; the batch itself survives.
#[tokio::test]
async fn call_depth_limit() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add(Call::new(env.recurse, increment()))
        .add(Call::new(env.counter, increment()))
        .add(Call::new(env.counter, count()))
        .aggregate()
        .await?;

    assert_eq!(result.len(), 3);
    assert!(!result.get(0)?.success);
    assert!(result.get(1)?.success);
    assert!(result.get(2)?.success);
    assert_eq!(env.count().await, U256::from(1));

    Ok(())
}

#[tokio::test]
async fn aggregator_without_code() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let err = Multicall::new(env.chain.clone(), Address::repeat_byte(0x11))
        .add(Call::new(env.counter, increment()))
        .aggregate_static()
        .await
        .unwrap_err();

    assert!(matches!(err, MulticallError::Reverted { .. }));
    assert!(!err.is_transport());
    assert_eq!(err.revert_reason(), None);

    Ok(())
}

#[tokio::test]
async fn fee_limit_below_intrinsic_cost() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let err = env
        .batch()
        .with_options(CallOptions::default().with_fee_limit(TX_BASE_ENERGY))
        .add_self_call(&ITronMulticall::getBlockNumberCall {})
        .aggregate()
        .await
        .unwrap_err();

    assert!(matches!(err, MulticallError::Reverted { .. }));
    assert_eq!(env.chain.block_number().await, 1);
    assert!(!env.chain.transactions().await[0].success);

    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint() -> eyre::Result<()> {
    let client =
        ProviderClient::connect(&"http://127.0.0.1:1".parse()?, Duration::from_secs(5), None)
            .await?;

    let err = Multicall::new(client, Address::repeat_byte(0x11))
        .add_self_call(&ITronMulticall::getBlockNumberCall {})
        .aggregate_static()
        .await
        .unwrap_err();

    assert!(err.is_transport(), "{err}");

    Ok(())
}
