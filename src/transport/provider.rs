use super::{ExecutionClient, error::TransportErrExt, timeout::TimeoutLayer};
use crate::{
    error::ExecutionError,
    types::{CallRequest, EstimateRequest},
};
use alloy::{
    eips::BlockId,
    network::{EthereumWallet, ReceiptResponse},
    primitives::Bytes,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::{client::ClientBuilder, types::TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::{TransportErrorKind, TransportResult},
};
use async_trait::async_trait;
use std::{fmt, time::Duration};
use tracing::{debug, instrument, warn};
use url::Url;

/// An [`ExecutionClient`] backed by a JSON-RPC node.
///
/// Simulations and the preflight of every submission are executed against the pending block,
/// which is the block a transaction sent at the same moment would be included in.
#[derive(Clone)]
pub struct ProviderClient<P> {
    provider: P,
}

impl<P> fmt::Debug for ProviderClient<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderClient").finish_non_exhaustive()
    }
}

impl<P: Provider> ProviderClient<P> {
    /// Creates a new client.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

impl ProviderClient<DynProvider> {
    /// Connects to `endpoint`, failing every request that takes longer than `timeout`.
    ///
    /// Without a signer, submissions rely on the node to sign for the caller.
    pub async fn connect(
        endpoint: &Url,
        timeout: Duration,
        signer: Option<PrivateKeySigner>,
    ) -> TransportResult<Self> {
        let client = ClientBuilder::default()
            .layer(TimeoutLayer::new(timeout))
            .connect(endpoint.as_str())
            .await?;

        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_client(client)
                .erased(),
            None => ProviderBuilder::new().connect_client(client).erased(),
        };

        Ok(Self::new(provider))
    }
}

/// Builds the transaction for a request.
fn transaction(request: &CallRequest) -> TransactionRequest {
    let mut tx = TransactionRequest::default()
        .to(request.target)
        .input(request.input.clone().into())
        .value(request.options.call_value);
    if let Some(caller) = request.caller {
        tx = tx.from(caller);
    }
    if let Some(fee_limit) = request.options.fee_limit {
        tx = tx.gas_limit(fee_limit);
    }
    tx
}

#[async_trait]
impl<P: Provider> ExecutionClient for ProviderClient<P> {
    #[instrument(skip_all, fields(target = %request.target))]
    async fn submit(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        let tx = transaction(request);

        // receipts carry no output, so the output is taken from a preflight of the same call
        let output = self
            .provider
            .call(tx.clone())
            .block(BlockId::pending())
            .await
            .map_err(TransportErrExt::into_execution_error)?;

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(TransportErrExt::into_execution_error)?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "Submitted transaction");

        if !request.options.poll_response {
            return Ok(output);
        }

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|err| ExecutionError::Transport(TransportErrorKind::custom(err)))?;

        if !receipt.status() {
            warn!(%tx_hash, "Transaction reverted on inclusion");
            return Err(ExecutionError::Revert(Bytes::new()));
        }

        Ok(output)
    }

    #[instrument(skip_all, fields(target = %request.target))]
    async fn simulate(&self, request: &CallRequest) -> Result<Bytes, ExecutionError> {
        self.provider
            .call(transaction(request))
            .block(BlockId::pending())
            .await
            .map_err(TransportErrExt::into_execution_error)
    }

    #[instrument(skip_all, fields(target = %request.target, selector = %request.selector))]
    async fn estimate_cost(&self, request: &EstimateRequest) -> Result<u64, ExecutionError> {
        self.provider
            .estimate_gas(transaction(&request.to_call_request()))
            .block(BlockId::pending())
            .await
            .map_err(TransportErrExt::into_execution_error)
    }
}
