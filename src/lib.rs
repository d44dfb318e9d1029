//! # Multicall
//!
//! Library for batching contract calls through a multicall aggregator: the aggregation engine,
//! clients for reaching an execution environment, and an in-memory chain to run it on.

pub mod aggregator;
pub mod chain;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod multicall;
pub mod serde;
pub mod transport;
pub mod types;
