//! Ledger state of a [`LocalChain`](super::LocalChain).

use super::Contract;
use crate::aggregator::BlockEnv;
use alloy::primitives::{Address, B256, BlockNumber, Bytes, U256, keccak256};
use std::{collections::HashMap, sync::Arc};

/// Balances and contract storage.
///
/// Cloned to take a snapshot before every call frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldState {
    balances: HashMap<Address, U256>,
    storage: HashMap<Address, HashMap<B256, B256>>,
}

impl WorldState {
    /// Native balance of `address`.
    pub fn balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    /// Sets the native balance of `address`.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        self.balances.insert(address, balance);
    }

    /// Moves `value` from `from` to `to`. Returns `false` if `from` cannot cover it.
    pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> bool {
        let Some(remaining) = self.balance(from).checked_sub(value) else {
            return false;
        };
        self.set_balance(from, remaining);
        self.set_balance(to, self.balance(to).saturating_add(value));
        true
    }

    /// Reads a storage slot of `address`.
    pub fn load(&self, address: Address, slot: B256) -> B256 {
        self.storage.get(&address).and_then(|slots| slots.get(&slot)).copied().unwrap_or_default()
    }

    /// Writes a storage slot of `address`.
    pub fn store(&mut self, address: Address, slot: B256, value: B256) {
        self.storage.entry(address).or_default().insert(slot, value);
    }
}

/// A mined block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block number.
    pub number: BlockNumber,
    /// Block timestamp, in seconds.
    pub timestamp: u64,
    /// Block hash.
    pub hash: B256,
    /// Hash of the parent block.
    pub parent_hash: B256,
    /// Hashes of the transactions included in the block.
    pub transactions: Vec<B256>,
}

impl Block {
    /// The genesis block.
    pub fn genesis(timestamp: u64) -> Self {
        Self::new(0, timestamp, B256::ZERO, Vec::new())
    }

    fn new(
        number: BlockNumber,
        timestamp: u64,
        parent_hash: B256,
        transactions: Vec<B256>,
    ) -> Self {
        let mut preimage = Vec::with_capacity(48 + transactions.len() * 32);
        preimage.extend_from_slice(&number.to_be_bytes());
        preimage.extend_from_slice(&timestamp.to_be_bytes());
        preimage.extend_from_slice(parent_hash.as_slice());
        for tx in &transactions {
            preimage.extend_from_slice(tx.as_slice());
        }
        Self { number, timestamp, hash: keccak256(preimage), parent_hash, transactions }
    }
}

/// A transaction recorded on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction hash.
    pub hash: B256,
    /// Number of the block the transaction was included in.
    pub block_number: BlockNumber,
    /// Sender.
    pub caller: Address,
    /// Invoked contract.
    pub target: Address,
    /// Call data.
    pub input: Bytes,
    /// Whether the invoked call succeeded. Reverted transactions are recorded too.
    pub success: bool,
    /// Energy consumed, including the intrinsic cost.
    pub energy_used: u64,
}

/// Everything a [`LocalChain`](super::LocalChain) keeps behind its lock.
#[derive(Debug)]
pub(crate) struct Ledger {
    pub(crate) state: WorldState,
    pub(crate) code: HashMap<Address, Arc<dyn Contract>>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) deployments: u64,
}

impl Ledger {
    pub(crate) fn new(genesis_timestamp: u64) -> Self {
        Self {
            state: WorldState::default(),
            code: HashMap::new(),
            blocks: vec![Block::genesis(genesis_timestamp)],
            transactions: Vec::new(),
            deployments: 0,
        }
    }

    /// The latest mined block.
    pub(crate) fn head(&self) -> &Block {
        // the genesis block is never removed
        &self.blocks[self.blocks.len() - 1]
    }

    /// The environment of the next block.
    pub(crate) fn next_env(&self, block_time: u64, chain_id: u64, coinbase: Address) -> BlockEnv {
        let head = self.head();
        BlockEnv {
            number: head.number + 1,
            timestamp: head.timestamp + block_time,
            coinbase,
            chain_id,
        }
    }

    /// Mines the next block, containing the given transactions.
    pub(crate) fn mine(&mut self, block_time: u64, transactions: Vec<B256>) -> &Block {
        let head = self.head();
        let block =
            Block::new(head.number + 1, head.timestamp + block_time, head.hash, transactions);
        self.blocks.push(block);
        self.head()
    }
}

/// Hash of block `number` in a chain starting at genesis, or zero if it does not exist.
pub(crate) fn block_hash(blocks: &[Block], number: BlockNumber) -> B256 {
    usize::try_from(number)
        .ok()
        .and_then(|index| blocks.get(index))
        .map(|block| block.hash)
        .unwrap_or_default()
}
