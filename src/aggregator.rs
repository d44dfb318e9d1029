//! The aggregation engine.
//!
//! Everything here is written against a [`Host`], the execution context the aggregator contract
//! runs in. The host dispatches sub-calls and answers block environment queries; the engine only
//! decides which calls to make, in which order, and how their outcomes are reported.
//!
//! [`execute`] is the contract entry point: it routes an ABI-encoded [`ITronMulticall`] call to
//! the matching function and ABI-encodes the result.

use crate::{
    constants::BLOCK_HASH_WINDOW,
    types::{AggregateResult, Call, CallResult, ITronMulticall},
};
use alloy::{
    primitives::{Address, B256, BlockNumber, Bytes, U256},
    sol_types::{Revert as RevertReason, SolError, SolInterface, SolValue},
};
use ITronMulticall::ITronMulticallCalls;

/// Revert reason used by `tryAggregate` when a required call fails.
pub const CALL_FAILED: &str = "Multicall: call failed";

/// Abnormal termination of a call, carrying its revert data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revert {
    /// The revert data, possibly empty.
    pub data: Bytes,
}

impl Revert {
    /// A revert without data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A revert with an `Error(string)` reason.
    pub fn reason(reason: impl Into<String>) -> Self {
        Self { data: RevertReason { reason: reason.into() }.abi_encode().into() }
    }
}

impl From<Bytes> for Revert {
    fn from(data: Bytes) -> Self {
        Self { data }
    }
}

/// The block environment a call executes in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockEnv {
    /// Number of the block.
    pub number: BlockNumber,
    /// Timestamp of the block, in seconds.
    pub timestamp: u64,
    /// Producer of the block.
    pub coinbase: Address,
    /// Chain identifier.
    pub chain_id: u64,
}

/// The execution context the aggregator runs in.
pub trait Host {
    /// The current block environment. It is the same for every call of a transaction.
    fn env(&self) -> &BlockEnv;

    /// Native balance of `address`.
    fn balance(&self, address: Address) -> U256;

    /// Hash of block `number`.
    ///
    /// Only called for the blocks within [`BLOCK_HASH_WINDOW`] before the current one.
    fn block_hash(&self, number: BlockNumber) -> B256;

    /// Calls `target` with `input` in a child frame.
    ///
    /// On failure the child frame's state changes are discarded and the revert data returned.
    fn call(&mut self, target: Address, input: Bytes) -> Result<Bytes, Revert>;
}

/// Executes every call in order, recording failures instead of propagating them.
pub fn aggregate<H: Host + ?Sized>(host: &mut H, calls: &[Call]) -> AggregateResult {
    let results = calls.iter().map(|call| dispatch(host, call)).collect();
    AggregateResult {
        block_number: host.env().number,
        block_timestamp: None,
        block_hash: None,
        results,
    }
}

/// Executes every call in order.
///
/// With `require_success`, the first failing call reverts the whole batch with [`CALL_FAILED`].
pub fn try_aggregate<H: Host + ?Sized>(
    host: &mut H,
    require_success: bool,
    calls: &[Call],
) -> Result<Vec<CallResult>, Revert> {
    let mut results = Vec::with_capacity(calls.len());
    for call in calls {
        let result = dispatch(host, call);
        if require_success && !result.success {
            return Err(Revert::reason(CALL_FAILED));
        }
        results.push(result);
    }
    Ok(results)
}

/// Like [`aggregate`], additionally reporting the hash of the parent block.
pub fn block_and_aggregate<H: Host + ?Sized>(host: &mut H, calls: &[Call]) -> AggregateResult {
    let mut result = aggregate(host, calls);
    result.block_hash = Some(last_block_hash(host));
    result
}

/// Executes every payload against the aggregator itself, in the current frame.
///
/// Any failing payload reverts the whole call with that payload's revert data.
pub fn multicall<H: Host + ?Sized>(host: &mut H, data: &[Bytes]) -> Result<Vec<Bytes>, Revert> {
    data.iter().map(|input| execute(host, input)).collect()
}

/// Hash of block `number`, or zero if it is not one of the [`BLOCK_HASH_WINDOW`] most recent
/// blocks before the current one.
pub fn block_hash<H: Host + ?Sized>(host: &H, number: U256) -> B256 {
    let current = host.env().number;
    match u64::try_from(number) {
        Ok(number) if number < current && current - number <= BLOCK_HASH_WINDOW => {
            host.block_hash(number)
        }
        _ => B256::ZERO,
    }
}

/// Hash of the parent of the current block.
pub fn last_block_hash<H: Host + ?Sized>(host: &H) -> B256 {
    block_hash(host, U256::from(host.env().number.saturating_sub(1)))
}

/// Routes an ABI-encoded aggregator call and returns its ABI-encoded result.
///
/// Unknown selectors and malformed arguments revert without data.
pub fn execute<H: Host + ?Sized>(host: &mut H, input: &[u8]) -> Result<Bytes, Revert> {
    let Ok(call) = ITronMulticallCalls::abi_decode(input) else {
        return Err(Revert::empty());
    };

    let output = match call {
        ITronMulticallCalls::aggregate(call) => {
            let result = aggregate(host, &into_calls(call.calls));
            (U256::from(result.block_number), into_sol_results(result.results)).abi_encode_params()
        }
        ITronMulticallCalls::tryAggregate(call) => {
            try_aggregate(host, call.requireSuccess, &into_calls(call.calls))
                .map(into_sol_results)?
                .abi_encode()
        }
        ITronMulticallCalls::blockAndAggregate(call) => {
            let result = block_and_aggregate(host, &into_calls(call.calls));
            (
                U256::from(result.block_number),
                result.block_hash.unwrap_or_default(),
                into_sol_results(result.results),
            )
                .abi_encode_params()
        }
        ITronMulticallCalls::multicall(call) => multicall(host, &call.data)?.abi_encode(),
        ITronMulticallCalls::getBlockHash(call) => block_hash(host, call.blockNumber).abi_encode(),
        ITronMulticallCalls::getBlockNumber(_) => U256::from(host.env().number).abi_encode(),
        ITronMulticallCalls::getCurrentBlockCoinbase(_) => host.env().coinbase.abi_encode(),
        ITronMulticallCalls::getCurrentBlockTimestamp(_) => {
            U256::from(host.env().timestamp).abi_encode()
        }
        ITronMulticallCalls::getEthBalance(call) => host.balance(call.addr).abi_encode(),
        ITronMulticallCalls::getLastBlockHash(_) => last_block_hash(host).abi_encode(),
        ITronMulticallCalls::getChainId(_) => U256::from(host.env().chain_id).abi_encode(),
    };

    Ok(output.into())
}

fn dispatch<H: Host + ?Sized>(host: &mut H, call: &Call) -> CallResult {
    match host.call(call.target(), call.call_data().clone()) {
        Ok(data) => CallResult::success(data),
        Err(revert) => CallResult::failure(revert.data),
    }
}

fn into_calls(calls: Vec<ITronMulticall::Call>) -> Vec<Call> {
    calls.into_iter().map(Into::into).collect()
}

fn into_sol_results(results: Vec<CallResult>) -> Vec<ITronMulticall::Result> {
    results.into_iter().map(Into::into).collect()
}
