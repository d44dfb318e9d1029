//! End-to-end tests of batches dispatched against a local chain.
#![allow(missing_docs)]

mod cases;
mod contracts;
mod environment;

pub use environment::Fixture;
