use crate::{
    Fixture,
    contracts::{ICounter, increment},
};
use alloy::primitives::U256;
use multicall::{
    multicall::ExecutionMode,
    types::{Call, ITronMulticall},
};

#[tokio::test]
async fn static_leaves_no_trace() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add(Call::new(env.counter, increment()))
        .add(Call::new(env.counter, increment()))
        .aggregate_static()
        .await?;

    assert_eq!(result.decode::<ICounter::incrementCall>(1)?, U256::from(2));
    assert_eq!(env.count().await, U256::ZERO);
    assert_eq!(env.chain.block_number().await, 0);
    assert_eq!(env.chain.transaction_count().await, 0);

    Ok(())
}

/// A simulation runs in the block a transaction sent at the same moment would be included in.
#[tokio::test]
async fn static_and_commit_agree() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let batch = env
        .batch()
        .add_self_call(&ITronMulticall::getBlockNumberCall {})
        .add_self_call(&ITronMulticall::getCurrentBlockTimestampCall {});

    let simulated = batch.aggregate_with_mode(ExecutionMode::Static).await?;
    let committed = batch.aggregate_with_mode(ExecutionMode::Commit).await?;

    assert_eq!(simulated.block_number, committed.block_number);
    assert_eq!(simulated.results, committed.results);
    assert_eq!(committed.block_number, env.chain.block_number().await);

    Ok(())
}

#[tokio::test]
async fn static_observes_committed_state() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let batch = env.batch().add(Call::new(env.counter, increment()));

    batch.aggregate().await?;
    let simulated = batch.aggregate_static().await?;

    assert_eq!(simulated.block_number, 2);
    assert_eq!(simulated.decode::<ICounter::incrementCall>(0)?, U256::from(2));
    assert_eq!(env.count().await, U256::from(1));

    Ok(())
}
