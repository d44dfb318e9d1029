use crate::{
    Fixture,
    contracts::{COUNTER_FAILED, ICounter, count, increment, increment_and_fail},
};
use alloy::primitives::{Bytes, U256};
use multicall::{
    aggregator::CALL_FAILED,
    multicall::ExecutionMode,
    types::{Call, ITronMulticall},
};

#[tokio::test]
async fn empty_batch() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env.batch().aggregate().await?;

    assert!(result.is_empty());
    assert_eq!(result.block_number, env.chain.block_number().await);
    assert_eq!(result.block_number, 1);

    Ok(())
}

/// Results come back one per call, in call order, and later calls observe the writes of earlier
/// ones.
#[tokio::test]
async fn preserves_order() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add(Call::new(env.counter, increment()))
        .add(Call::new(env.counter, count()))
        .add_self_call(&ITronMulticall::getBlockNumberCall {})
        .add(Call::new(env.counter, increment()))
        .aggregate()
        .await?;

    assert_eq!(result.len(), 4);
    assert!(result.all_succeeded());
    assert_eq!(result.decode::<ICounter::incrementCall>(0)?, U256::from(1));
    assert_eq!(result.decode::<ICounter::countCall>(1)?, U256::from(1));
    assert_eq!(
        result.decode::<ITronMulticall::getBlockNumberCall>(2)?,
        U256::from(result.block_number)
    );
    assert_eq!(result.decode::<ICounter::incrementCall>(3)?, U256::from(2));
    assert_eq!(env.count().await, U256::from(2));

    Ok(())
}

#[tokio::test]
async fn block_number_and_timestamp() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add_self_call(&ITronMulticall::getBlockNumberCall {})
        .add_self_call(&ITronMulticall::getCurrentBlockTimestampCall {})
        .aggregate()
        .await?;

    assert_eq!(result.len(), 2);
    assert!(result.all_succeeded());

    let head = env.chain.head().await;
    let number = result.decode::<ITronMulticall::getBlockNumberCall>(0)?;
    let timestamp = result.decode::<ITronMulticall::getCurrentBlockTimestampCall>(1)?;
    assert_eq!(number, U256::from(result.block_number));
    assert_eq!(result.block_number, head.number);
    assert!(timestamp > U256::ZERO);
    assert_eq!(timestamp, U256::from(head.timestamp));

    Ok(())
}

#[tokio::test]
async fn with_timestamp() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add(Call::new(env.counter, increment()))
        .aggregate_with_timestamp(ExecutionMode::Commit)
        .await?;

    let head = env.chain.head().await;
    assert_eq!(result.len(), 1);
    assert_eq!(result.block_number, head.number);
    assert_eq!(result.block_timestamp, Some(head.timestamp));

    Ok(())
}

/// A reverting call is reported in place, its writes are rolled back, and every other call still
/// executes.
#[tokio::test]
async fn revert_is_isolated() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add(Call::new(env.counter, increment()))
        .add(Call::new(env.counter, increment_and_fail()))
        .add(Call::new(env.counter, count()))
        .aggregate()
        .await?;

    assert_eq!(result.len(), 3);
    assert!(!result.all_succeeded());
    assert_eq!(result.failures().map(|(index, _)| index).collect::<Vec<_>>(), vec![1]);

    let failed = result.get(1)?;
    assert!(!failed.success);
    assert_eq!(failed.revert_reason(), Some(format!("revert: {COUNTER_FAILED}")));

    assert_eq!(result.decode::<ICounter::countCall>(2)?, U256::from(1));
    assert_eq!(env.count().await, U256::from(1));

    let txs = env.chain.transactions().await;
    assert_eq!(txs.len(), 1);
    assert!(txs[0].success);

    Ok(())
}

#[tokio::test]
async fn unknown_selector() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add_self_call(&ITronMulticall::getBlockNumberCall {})
        .add(Call::new(env.counter, Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef])))
        .aggregate()
        .await?;

    assert_eq!(result.len(), 2);
    assert!(result.get(0)?.success);
    assert!(!result.get(1)?.success);
    assert!(result.get(1)?.return_data.is_empty());

    Ok(())
}

#[tokio::test]
async fn target_without_code() -> eyre::Result<()> {
    let env = Fixture::setup().await;

    let result = env
        .batch()
        .add(Call::new(env.chain.config().default_caller, increment()))
        .add(Call::new(env.counter, increment()))
        .aggregate()
        .await?;

    assert!(!result.get(0)?.success);
    assert_eq!(result.get(0)?.revert_reason(), None);
    assert!(result.get(1)?.success);

    Ok(())
}

#[tokio::test]
async fn try_aggregate() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let batch = env
        .batch()
        .add(Call::new(env.counter, increment()))
        .add(Call::new(env.counter, increment_and_fail()));

    let results = batch.try_aggregate(false, ExecutionMode::Commit).await?;
    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(env.count().await, U256::from(1));

    let err = batch.try_aggregate(true, ExecutionMode::Commit).await.unwrap_err();
    assert_eq!(err.revert_reason(), Some(format!("revert: {CALL_FAILED}")));
    assert_eq!(env.count().await, U256::from(1));

    let txs = env.chain.transactions().await;
    assert_eq!(txs.len(), 2);
    assert!(!txs[1].success);

    Ok(())
}

#[tokio::test]
async fn block_and_aggregate() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let genesis = env.chain.head().await;

    let result = env
        .batch()
        .add_self_call(&ITronMulticall::getLastBlockHashCall {})
        .block_and_aggregate(ExecutionMode::Commit)
        .await?;

    assert_eq!(result.block_number, 1);
    assert_eq!(result.block_hash, Some(genesis.hash));
    assert_eq!(result.decode::<ITronMulticall::getLastBlockHashCall>(0)?, genesis.hash);
    assert_eq!(env.chain.head().await.parent_hash, genesis.hash);

    Ok(())
}
