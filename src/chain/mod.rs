//! An in-memory execution environment.
//!
//! [`LocalChain`] keeps a ledger of blocks, balances and contract storage, and executes calls
//! against [`Contract`]s deployed at its addresses. Every committed request is mined into its own
//! block. It implements [`ExecutionClient`], so a batcher can be pointed at it exactly like at a
//! node.

use crate::{
    aggregator::{Host, Revert},
    constants::{
        DEFAULT_BLOCK_TIME, DEFAULT_CHAIN_ID, DEFAULT_ENERGY_LIMIT, INPUT_BYTE_ENERGY,
        TX_BASE_ENERGY,
    },
    error::ExecutionError,
    transport::ExecutionClient,
    types::{CallRequest, EstimateRequest},
};
use alloy::primitives::{Address, B256, BlockNumber, Bytes, U256, address, keccak256};
use async_trait::async_trait;
use state::Ledger;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

mod context;
pub use context::ExecutionContext;

mod contract;
pub use contract::{Contract, TronMulticall};

mod state;
pub use state::{Block, Transaction, WorldState};

/// Sender of requests that do not name a caller.
pub const DEFAULT_CALLER: Address = address!("0x000000000000000000000000000000000000c0de");

/// [`LocalChain`] configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalChainConfig {
    /// Chain identifier reported to contracts.
    pub chain_id: u64,
    /// Seconds between two consecutive blocks.
    pub block_time: u64,
    /// Timestamp of the genesis block.
    pub genesis_timestamp: u64,
    /// Producer of every block.
    pub coinbase: Address,
    /// Sender of requests that do not name a caller, and deployer of contracts.
    pub default_caller: Address,
}

impl Default for LocalChainConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            block_time: DEFAULT_BLOCK_TIME,
            genesis_timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default(),
            coinbase: Address::ZERO,
            default_caller: DEFAULT_CALLER,
        }
    }
}

/// The result of running a request against the latest state, before it is committed.
#[derive(Debug)]
struct Outcome {
    caller: Address,
    state: WorldState,
    result: Result<Bytes, Revert>,
    energy_used: u64,
}

/// An in-memory chain.
///
/// Requests are serialised: each one runs to completion against the state left by the previous
/// one.
#[derive(Debug)]
pub struct LocalChain {
    config: LocalChainConfig,
    ledger: Mutex<Ledger>,
}

impl Default for LocalChain {
    fn default() -> Self {
        Self::new(LocalChainConfig::default())
    }
}

impl LocalChain {
    /// Creates a chain holding only the genesis block.
    pub fn new(config: LocalChainConfig) -> Self {
        let ledger = Mutex::new(Ledger::new(config.genesis_timestamp));
        Self { config, ledger }
    }

    /// The chain configuration.
    pub const fn config(&self) -> &LocalChainConfig {
        &self.config
    }

    /// Deploys `contract` at the next address derived from the default caller.
    pub async fn deploy(&self, contract: impl Contract + 'static) -> Address {
        let mut ledger = self.ledger.lock().await;
        let address = self.config.default_caller.create(ledger.deployments);
        ledger.deployments += 1;
        ledger.code.insert(address, Arc::new(contract));
        debug!(%address, "Deployed contract");
        address
    }

    /// Deploys `contract` at `address`, replacing any code already there.
    pub async fn deploy_at(&self, address: Address, contract: impl Contract + 'static) {
        self.ledger.lock().await.code.insert(address, Arc::new(contract));
        debug!(%address, "Deployed contract");
    }

    /// Deploys the call aggregator.
    pub async fn deploy_multicall(&self) -> Address {
        self.deploy(TronMulticall).await
    }

    /// Whether code is deployed at `address`.
    pub async fn has_code(&self, address: Address) -> bool {
        self.ledger.lock().await.code.contains_key(&address)
    }

    /// Sets the native balance of `address`.
    pub async fn fund(&self, address: Address, balance: U256) {
        self.ledger.lock().await.state.set_balance(address, balance);
    }

    /// Native balance of `address`.
    pub async fn balance(&self, address: Address) -> U256 {
        self.ledger.lock().await.state.balance(address)
    }

    /// Reads a storage slot of `address`.
    pub async fn storage(&self, address: Address, slot: B256) -> B256 {
        self.ledger.lock().await.state.load(address, slot)
    }

    /// Number of the latest block.
    pub async fn block_number(&self) -> BlockNumber {
        self.ledger.lock().await.head().number
    }

    /// The latest block.
    pub async fn head(&self) -> Block {
        self.ledger.lock().await.head().clone()
    }

    /// Number of recorded transactions.
    pub async fn transaction_count(&self) -> usize {
        self.ledger.lock().await.transactions.len()
    }

    /// All recorded transactions, oldest first.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.ledger.lock().await.transactions.clone()
    }

    /// Mines an empty block.
    pub async fn mine(&self) -> Block {
        self.ledger.lock().await.mine(self.config.block_time, Vec::new()).clone()
    }

    /// Runs `request` in the environment of the next block, without touching the ledger.
    fn run(&self, ledger: &Ledger, request: &CallRequest) -> Outcome {
        let caller = request.caller.unwrap_or(self.config.default_caller);
        let limit = request.options.fee_limit.unwrap_or(DEFAULT_ENERGY_LIMIT);
        let intrinsic = INPUT_BYTE_ENERGY
            .saturating_mul(request.input.len() as u64)
            .saturating_add(TX_BASE_ENERGY);
        let mut state = ledger.state.clone();

        let outcome = |state, result, energy_used| Outcome { caller, state, result, energy_used };

        if intrinsic > limit {
            let revert = Revert::reason("energy limit below intrinsic cost");
            return outcome(state, Err(revert), limit);
        }

        let value = request.options.call_value;
        if !value.is_zero() && !state.transfer(caller, request.target, value) {
            return outcome(state, Err(Revert::reason("insufficient balance")), intrinsic);
        }

        let env =
            ledger.next_env(self.config.block_time, self.config.chain_id, self.config.coinbase);
        let mut root = ExecutionContext::root(
            &mut state,
            &ledger.code,
            &ledger.blocks,
            env,
            caller,
            limit - intrinsic,
        );
        let result = root.call(request.target, request.input.clone());
        let energy_used = intrinsic + root.energy_used();

        outcome(state, result, energy_used)
    }
}

#[async_trait]
impl ExecutionClient for LocalChain {
    #[instrument(skip_all, fields(target = %request.target))]
    async fn submit(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        let mut ledger = self.ledger.lock().await;
        let Outcome { caller, state, result, energy_used } = self.run(&ledger, request);

        let nonce = ledger.transactions.len() as u64;
        let hash = keccak256(
            [
                caller.as_slice(),
                request.target.as_slice(),
                &request.input[..],
                &nonce.to_be_bytes()[..],
            ]
            .concat(),
        );
        let block_number = ledger.mine(self.config.block_time, vec![hash]).number;

        ledger.transactions.push(Transaction {
            hash,
            block_number,
            caller,
            target: request.target,
            input: request.input.clone(),
            success: result.is_ok(),
            energy_used,
        });
        if result.is_ok() {
            ledger.state = state;
        }

        debug!(%hash, block_number, energy_used, success = result.is_ok(), "Mined transaction");
        result.map_err(|revert| ExecutionError::Revert(revert.data))
    }

    #[instrument(skip_all, fields(target = %request.target))]
    async fn simulate(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        let ledger = self.ledger.lock().await;
        self.run(&ledger, request).result.map_err(|revert| ExecutionError::Revert(revert.data))
    }

    #[instrument(skip_all, fields(target = %request.target, selector = %request.selector))]
    async fn estimate_cost(&self, request: &EstimateRequest) -> Result<u64, ExecutionError> {
        let ledger = self.ledger.lock().await;
        let outcome = self.run(&ledger, &request.to_call_request());
        outcome
            .result
            .map(|_| outcome.energy_used)
            .map_err(|revert| ExecutionError::Revert(revert.data))
    }
}
