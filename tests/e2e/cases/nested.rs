use crate::{
    Fixture,
    contracts::{count, increment, increment_and_fail},
};
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};
use multicall::{
    error::MulticallError,
    multicall::ExecutionMode,
    types::{Call, ITronMulticall, Payload, ReturnShape},
};

/// Encodes an `aggregate` of `calls`.
fn aggregate(calls: Vec<Call>) -> Bytes {
    ITronMulticall::aggregateCall { calls: calls.into_iter().map(Into::into).collect() }
        .abi_encode()
        .into()
}

fn block_number(aggregator: Address) -> Call {
    Call::from_sol(aggregator, &ITronMulticall::getBlockNumberCall {})
}

fn timestamp(aggregator: Address) -> Call {
    Call::from_sol(aggregator, &ITronMulticall::getCurrentBlockTimestampCall {})
}

/// `multicall([aggregate([getBlockNumber]), aggregate([getCurrentBlockTimestamp])])`, decoded
/// recursively.
#[tokio::test]
async fn multicall_of_aggregates() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let data = vec![
        aggregate(vec![block_number(env.aggregator)]),
        aggregate(vec![timestamp(env.aggregator)]),
    ];

    let outputs = env.batch().multicall(data.clone(), ExecutionMode::Commit).await?;
    assert_eq!(outputs.len(), 2);

    let head = env.chain.head().await;
    let decoded = data
        .iter()
        .zip(&outputs)
        .map(|(payload, output)| Payload::decode(payload).return_shape().decode(output))
        .collect::<Result<Vec<_>, _>>()?;

    let first = decoded[0].as_aggregate().expect("aggregate result");
    assert_eq!(first.block_number, head.number);
    assert_eq!(first.decode::<ITronMulticall::getBlockNumberCall>(0)?, U256::from(head.number));

    let second = decoded[1].as_aggregate().expect("aggregate result");
    assert_eq!(second.block_number, head.number);
    assert_eq!(
        second.decode::<ITronMulticall::getCurrentBlockTimestampCall>(0)?,
        U256::from(head.timestamp)
    );

    Ok(())
}

/// An `aggregate` payload aimed at another aggregator is dispatched like any other call.
#[tokio::test]
async fn aggregate_as_call() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let other = env.chain.deploy_multicall().await;

    let result = env
        .batch()
        .add(Call::new(env.aggregator, aggregate(vec![block_number(env.aggregator)])))
        .add(Call::new(
            other,
            aggregate(vec![
                Call::new(env.counter, increment()),
                Call::new(env.counter, increment_and_fail()),
                Call::new(env.counter, count()),
            ]),
        ))
        .aggregate()
        .await?;

    assert!(result.all_succeeded());

    let value = result.get(0)?.decode_as(ReturnShape::Aggregate)?;
    let inner = value.as_aggregate().expect("aggregate result");
    assert_eq!(inner.block_number, result.block_number);
    assert_eq!(
        inner.decode::<ITronMulticall::getBlockNumberCall>(0)?,
        U256::from(result.block_number)
    );

    let value = result.get(1)?.decode_as(ReturnShape::Aggregate)?;
    let inner = value.as_aggregate().expect("aggregate result");
    assert_eq!(inner.len(), 3);
    assert_eq!(inner.failures().map(|(index, _)| index).collect::<Vec<_>>(), vec![1]);
    assert_eq!(env.count().await, U256::from(1));

    Ok(())
}

/// Unlike `aggregate`, a failing payload takes the whole `multicall` down.
#[tokio::test]
async fn multicall_failure_reverts_batch() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let data = vec![
        aggregate(vec![Call::new(env.counter, increment())]),
        Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
    ];

    let err = env.batch().multicall(data, ExecutionMode::Commit).await.unwrap_err();

    assert!(matches!(err, MulticallError::Reverted { .. }));
    assert_eq!(env.count().await, U256::ZERO);
    assert!(!env.chain.transactions().await[0].success);

    Ok(())
}
