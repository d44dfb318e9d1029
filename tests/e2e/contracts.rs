//! Contracts deployed by the test fixture.

use alloy::{
    primitives::{B256, Bytes, U256},
    sol,
    sol_types::{SolCall, SolInterface, SolValue},
};
use multicall::{
    aggregator::{Host, Revert},
    chain::{Contract, ExecutionContext},
};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface ICounter {
        function increment() external returns (uint256 count);
        function count() external view returns (uint256 count);
        function incrementAndFail() external;
    }
}

/// Revert reason of [`ICounter::incrementAndFailCall`].
pub const COUNTER_FAILED: &str = "Counter: failed";

/// Storage slot holding the count.
pub const COUNT_SLOT: B256 = B256::ZERO;

/// A counter kept in [`COUNT_SLOT`].
#[derive(Debug)]
pub struct Counter;

impl Counter {
    fn bump(ctx: &mut ExecutionContext<'_>) -> Result<U256, Revert> {
        let count = U256::from_be_bytes(ctx.sload(COUNT_SLOT)?.0) + U256::from(1);
        ctx.sstore(COUNT_SLOT, count.into())?;
        Ok(count)
    }
}

impl Contract for Counter {
    fn call(&self, ctx: &mut ExecutionContext<'_>, input: &Bytes) -> Result<Bytes, Revert> {
        let Ok(call) = ICounter::ICounterCalls::abi_decode(input) else {
            return Err(Revert::empty());
        };

        let output = match call {
            ICounter::ICounterCalls::increment(_) => Self::bump(ctx)?.abi_encode(),
            ICounter::ICounterCalls::count(_) => {
                U256::from_be_bytes(ctx.sload(COUNT_SLOT)?.0).abi_encode()
            }
            ICounter::ICounterCalls::incrementAndFail(_) => {
                Self::bump(ctx)?;
                return Err(Revert::reason(COUNTER_FAILED));
            }
        };
        Ok(output.into())
    }
}

/// Calls itself with its own input until the call stack gives out.
#[derive(Debug)]
pub struct Recurse;

impl Contract for Recurse {
    fn call(&self, ctx: &mut ExecutionContext<'_>, input: &Bytes) -> Result<Bytes, Revert> {
        let address = ctx.address();
        ctx.call(address, input.clone())
    }
}

/// Encoded `increment()`.
pub fn increment() -> Bytes {
    ICounter::incrementCall {}.abi_encode().into()
}

/// Encoded `count()`.
pub fn count() -> Bytes {
    ICounter::countCall {}.abi_encode().into()
}

/// Encoded `incrementAndFail()`.
pub fn increment_and_fail() -> Bytes {
    ICounter::incrementAndFailCall {}.abi_encode().into()
}
