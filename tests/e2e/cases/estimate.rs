use crate::{
    Fixture,
    contracts::{increment, increment_and_fail},
};
use alloy::primitives::U256;
use multicall::{
    constants::TX_BASE_ENERGY,
    types::{Call, ITronMulticall},
};

#[tokio::test]
async fn estimate_has_no_side_effects() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let batch = env
        .batch()
        .add(Call::new(env.counter, increment()))
        .add_self_call(&ITronMulticall::getBlockNumberCall {});

    let cost = batch.estimate().await?;

    assert!(cost > TX_BASE_ENERGY, "unexpected cost {cost}");
    assert_eq!(env.count().await, U256::ZERO);
    assert_eq!(env.chain.block_number().await, 0);
    assert_eq!(env.chain.transaction_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn estimate_grows_with_batch() -> eyre::Result<()> {
    let env = Fixture::setup().await;
    let one = env.batch().add(Call::new(env.counter, increment()));
    let two = one.clone().add(Call::new(env.counter, increment_and_fail()));

    let small = one.estimate().await?;
    let large = two.estimate().await?;

    assert!(small > 0);
    assert!(large > small, "{large} <= {small}");

    Ok(())
}
