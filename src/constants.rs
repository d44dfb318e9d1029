//! Multicall constants.

use std::time::Duration;

/// Leading byte of TRON hex addresses (`41` + 20 address bytes).
pub const TRON_ADDRESS_PREFIX: u8 = 0x41;

/// Default timeout for a single request to the execution environment.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default energy ceiling for a transaction on the local chain.
///
/// Also the per-block energy limit reported to contracts.
pub const DEFAULT_ENERGY_LIMIT: u64 = 30_000_000;

/// Intrinsic energy charged for every transaction.
pub const TX_BASE_ENERGY: u64 = 21_000;

/// Energy charged per byte of transaction or call input.
pub const INPUT_BYTE_ENERGY: u64 = 16;

/// Energy charged for dispatching a call to another contract.
pub const CALL_ENERGY: u64 = 700;

/// Energy charged for reading a storage slot.
pub const SLOAD_ENERGY: u64 = 800;

/// Energy charged for writing a storage slot.
pub const SSTORE_ENERGY: u64 = 20_000;

/// Maximum nesting of contract calls on the local chain.
///
/// A call beyond this depth fails locally instead of recursing further.
pub const MAX_CALL_DEPTH: usize = 64;

/// Number of most recent blocks whose hashes are visible to contracts.
pub const BLOCK_HASH_WINDOW: u64 = 256;

/// Seconds between two blocks mined by the local chain.
pub const DEFAULT_BLOCK_TIME: u64 = 3;

/// Chain id reported by the local chain unless configured otherwise.
pub const DEFAULT_CHAIN_ID: u64 = 1337;
