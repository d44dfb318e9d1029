//! Native contracts hosted by a [`LocalChain`](super::LocalChain).

use super::ExecutionContext;
use crate::aggregator::{self, Revert};
use alloy::primitives::Bytes;
use std::fmt::Debug;

/// Code deployed at an address of a [`LocalChain`](super::LocalChain).
pub trait Contract: Debug + Send + Sync {
    /// Handles a call with the given input.
    ///
    /// Returning an error reverts everything the call wrote, including the effects of any
    /// sub-calls it made.
    fn call(&self, ctx: &mut ExecutionContext<'_>, input: &Bytes) -> Result<Bytes, Revert>;
}

/// The call aggregator, ABI compatible with the `TronMulticall` contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct TronMulticall;

impl Contract for TronMulticall {
    fn call(&self, ctx: &mut ExecutionContext<'_>, input: &Bytes) -> Result<Bytes, Revert> {
        aggregator::execute(ctx, input)
    }
}
