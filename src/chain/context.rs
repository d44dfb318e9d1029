//! Call frames and energy metering.

use super::{
    Contract,
    state::{Block, WorldState, block_hash},
};
use crate::{
    aggregator::{BlockEnv, Host, Revert},
    constants::{CALL_ENERGY, INPUT_BYTE_ENERGY, MAX_CALL_DEPTH, SLOAD_ENERGY, SSTORE_ENERGY},
};
use alloy::primitives::{Address, B256, BlockNumber, Bytes, U256};
use std::{collections::HashMap, sync::Arc};
use tracing::trace;

/// Energy budget of a call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Meter {
    limit: u64,
    used: u64,
}

impl Meter {
    const fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    const fn remaining(&self) -> u64 {
        self.limit - self.used
    }

    /// Consumes `amount`. Running out consumes the whole budget.
    fn charge(&mut self, amount: u64) -> Result<(), Revert> {
        match self.used.checked_add(amount) {
            Some(used) if used <= self.limit => {
                self.used = used;
                Ok(())
            }
            _ => {
                self.used = self.limit;
                Err(Revert::empty())
            }
        }
    }
}

/// The context a [`Contract`] executes in.
///
/// Every call into a contract gets its own frame. A frame sees the state as left by the frames
/// before it; if the contract fails, everything the frame (and its children) wrote is discarded.
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    state: &'a mut WorldState,
    code: &'a HashMap<Address, Arc<dyn Contract>>,
    blocks: &'a [Block],
    env: BlockEnv,
    caller: Address,
    address: Address,
    depth: usize,
    meter: Meter,
}

impl<'a> ExecutionContext<'a> {
    /// The frame of the transaction sender, from which the invoked contract is called.
    pub(crate) fn root(
        state: &'a mut WorldState,
        code: &'a HashMap<Address, Arc<dyn Contract>>,
        blocks: &'a [Block],
        env: BlockEnv,
        sender: Address,
        energy_limit: u64,
    ) -> Self {
        Self {
            state,
            code,
            blocks,
            env,
            caller: sender,
            address: sender,
            depth: 0,
            meter: Meter::new(energy_limit),
        }
    }

    /// The account that called into this frame.
    pub const fn caller(&self) -> Address {
        self.caller
    }

    /// The address of the executing contract.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Call depth of this frame; the transaction sender is at depth zero.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Energy consumed by this frame and its children.
    pub const fn energy_used(&self) -> u64 {
        self.meter.used
    }

    /// Consumes energy from this frame's budget.
    pub fn charge(&mut self, amount: u64) -> Result<(), Revert> {
        self.meter.charge(amount)
    }

    /// Reads a storage slot of the executing contract.
    pub fn sload(&mut self, slot: B256) -> Result<B256, Revert> {
        self.charge(SLOAD_ENERGY)?;
        Ok(self.state.load(self.address, slot))
    }

    /// Writes a storage slot of the executing contract.
    pub fn sstore(&mut self, slot: B256, value: B256) -> Result<(), Revert> {
        self.charge(SSTORE_ENERGY)?;
        self.state.store(self.address, slot, value);
        Ok(())
    }
}

impl Host for ExecutionContext<'_> {
    fn env(&self) -> &BlockEnv {
        &self.env
    }

    fn balance(&self, address: Address) -> U256 {
        self.state.balance(address)
    }

    fn block_hash(&self, number: BlockNumber) -> B256 {
        block_hash(self.blocks, number)
    }

    fn call(&mut self, target: Address, input: Bytes) -> Result<Bytes, Revert> {
        let cost = INPUT_BYTE_ENERGY.saturating_mul(input.len() as u64).saturating_add(CALL_ENERGY);
        self.charge(cost)?;

        if self.depth >= MAX_CALL_DEPTH {
            trace!(%target, depth = self.depth, "Call depth exceeded");
            return Err(Revert::empty());
        }

        let Some(contract) = self.code.get(&target).cloned() else {
            trace!(%target, "Call to address without code");
            return Err(Revert::empty());
        };

        let snapshot = self.state.clone();
        let available = self.meter.remaining();
        let mut frame = ExecutionContext {
            state: &mut *self.state,
            code: self.code,
            blocks: self.blocks,
            env: self.env,
            caller: self.address,
            address: target,
            depth: self.depth + 1,
            meter: Meter::new(available - available / 64),
        };

        let result = contract.call(&mut frame, &input);
        let used = frame.meter.used;

        // the child budget was carved out of what remained, so this cannot overflow the limit
        self.meter.used += used;

        trace!(
            %target,
            depth = self.depth + 1,
            energy_used = used,
            success = result.is_ok(),
            "Sub-call"
        );

        if result.is_err() {
            *self.state = snapshot;
        }
        result
    }
}
