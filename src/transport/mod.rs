//! Execution environment clients.
//!
//! An [`ExecutionClient`] is the only way the batcher reaches an execution environment. Every
//! method is a single request/response exchange; retries and cancellation are left to the
//! implementation's transport.

use crate::{
    error::ExecutionError,
    types::{CallRequest, EstimateRequest},
};
use alloy::primitives::Bytes;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod error;
pub mod timeout;

mod provider;
pub use provider::ProviderClient;

/// Access to an environment able to execute contract calls.
#[async_trait]
pub trait ExecutionClient: Debug + Send + Sync {
    /// Executes the request as a transaction, committing its state changes if it succeeds.
    ///
    /// Returns the output of the invoked call.
    async fn submit(&self, request: &CallRequest) -> Result<Bytes, ExecutionError>;

    /// Executes the request without committing state or recording a transaction.
    async fn simulate(&self, request: &CallRequest) -> Result<Bytes, ExecutionError>;

    /// Estimates the energy the request would consume, without executing it for real.
    async fn estimate_cost(&self, request: &EstimateRequest) -> Result<u64, ExecutionError>;
}

#[async_trait]
impl<'a, T: ExecutionClient + ?Sized> ExecutionClient for &'a T {
    async fn submit(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        (**self).submit(request).await
    }

    async fn simulate(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        (**self).simulate(request).await
    }

    async fn estimate_cost(&self, request: &EstimateRequest) -> Result<u64, ExecutionError> {
        (**self).estimate_cost(request).await
    }
}

#[async_trait]
impl<T: ExecutionClient + ?Sized> ExecutionClient for Arc<T> {
    async fn submit(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        (**self).submit(request).await
    }

    async fn simulate(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        (**self).simulate(request).await
    }

    async fn estimate_cost(&self, request: &EstimateRequest) -> Result<u64, ExecutionError> {
        (**self).estimate_cost(request).await
    }
}
