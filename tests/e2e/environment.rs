//! Test environment.

use crate::contracts::{COUNT_SLOT, Counter, Recurse};
use alloy::primitives::{Address, U256};
use multicall::{
    chain::{LocalChain, LocalChainConfig},
    multicall::Multicall,
};
use std::sync::Arc;

/// Genesis timestamp of every fixture chain.
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// A local chain with an aggregator and a few test contracts deployed.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// The chain.
    pub chain: Arc<LocalChain>,
    /// The aggregator.
    pub aggregator: Address,
    /// A [`Counter`].
    pub counter: Address,
    /// A [`Recurse`].
    pub recurse: Address,
}

impl Fixture {
    /// Deploys the aggregator and the test contracts on a fresh chain.
    pub async fn setup() -> Self {
        let chain = Arc::new(LocalChain::new(LocalChainConfig {
            genesis_timestamp: GENESIS_TIMESTAMP,
            ..Default::default()
        }));

        let aggregator = chain.deploy_multicall().await;
        let counter = chain.deploy(Counter).await;
        let recurse = chain.deploy(Recurse).await;

        Self { chain, aggregator, counter, recurse }
    }

    /// An empty batch against the fixture's aggregator.
    pub fn batch(&self) -> Multicall<Arc<LocalChain>> {
        Multicall::new(self.chain.clone(), self.aggregator)
    }

    /// The committed count of the [`Counter`].
    pub async fn count(&self) -> U256 {
        U256::from_be_bytes(self.chain.storage(self.counter, COUNT_SLOT).await.0)
    }
}
