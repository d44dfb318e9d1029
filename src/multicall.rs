//! # Call batching
//!
//! [`Multicall`] collects calls, encodes them into a single invocation of the aggregator and
//! dispatches it through an [`ExecutionClient`], either as a committing transaction or as a
//! simulation.
//!
//! A batch that executes always yields one [`CallResult`] per call, in call order. A failing call
//! only shows up as `success == false` in its result; an `Err` means the batch as a whole could
//! not be executed.

use crate::{
    error::{DecodeError, MulticallError},
    metrics::MulticallMetrics,
    transport::ExecutionClient,
    types::{
        AggregateResult, Call, CallOptions, CallRequest, CallResult, EstimateRequest,
        ITronMulticall, to_u64,
    },
};
use alloy::{
    primitives::{Address, Bytes},
    sol_types::SolCall,
};
use std::fmt;
use tracing::{debug, instrument, warn};

/// How a batch is dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// As a transaction, committing state changes and creating a ledger entry.
    #[default]
    Commit,
    /// As a simulation against the latest state, leaving no trace.
    Static,
}

impl ExecutionMode {
    /// The metric label of this mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch of calls dispatched through a single aggregator invocation.
#[derive(Debug, Clone)]
pub struct Multicall<C> {
    client: C,
    aggregator: Address,
    caller: Option<Address>,
    options: CallOptions,
    calls: Vec<Call>,
}

impl<C> Multicall<C> {
    /// Create a new, empty batch for the aggregator at `aggregator`.
    pub fn new(client: C, aggregator: Address) -> Self {
        Self { client, aggregator, caller: None, options: CallOptions::default(), calls: Vec::new() }
    }

    /// Sets the account dispatching the batch.
    pub fn with_caller(mut self, caller: Address) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Sets the execution options of the aggregator invocation.
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Appends a call.
    pub fn add(mut self, call: Call) -> Self {
        self.calls.push(call);
        self
    }

    /// Appends a typed call to `target`.
    pub fn add_call<T: SolCall>(self, target: Address, call: &T) -> Self {
        self.add(Call::from_sol(target, call))
    }

    /// Appends a typed call to the aggregator itself, e.g. one of its block getters.
    pub fn add_self_call<T: SolCall>(self, call: &T) -> Self {
        let aggregator = self.aggregator;
        self.add_call(aggregator, call)
    }

    /// Appends all `calls`.
    pub fn extend(mut self, calls: impl IntoIterator<Item = Call>) -> Self {
        self.calls.extend(calls);
        self
    }

    /// The address of the aggregator.
    pub const fn aggregator(&self) -> Address {
        self.aggregator
    }

    /// The batched calls, in dispatch order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of batched calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// The encoded `aggregate` invocation of the batch.
    pub fn calldata(&self) -> Bytes {
        encode_aggregate(&self.calls)
    }

    /// The cost estimation request for the `aggregate` invocation of the batch.
    pub fn estimate_request(&self) -> EstimateRequest {
        let calldata = self.calldata();
        EstimateRequest {
            target: self.aggregator,
            selector: ITronMulticall::aggregateCall::SELECTOR.into(),
            args: Bytes::copy_from_slice(&calldata[4..]),
            options: self.options.clone(),
            caller: self.caller,
        }
    }

    fn request(&self, input: Bytes) -> CallRequest {
        CallRequest {
            caller: self.caller,
            target: self.aggregator,
            input,
            options: self.options.clone(),
        }
    }
}

impl<C: ExecutionClient> Multicall<C> {
    /// Executes the batch as a transaction.
    ///
    /// Every call is executed even if an earlier one fails.
    pub async fn aggregate(&self) -> Result<AggregateResult, MulticallError> {
        self.aggregate_with_mode(ExecutionMode::Commit).await
    }

    /// Executes the batch as a simulation, committing nothing.
    pub async fn aggregate_static(&self) -> Result<AggregateResult, MulticallError> {
        self.aggregate_with_mode(ExecutionMode::Static).await
    }

    /// Executes the batch in the given mode.
    #[instrument(skip(self), fields(calls_count = self.calls.len(), aggregator = %self.aggregator))]
    pub async fn aggregate_with_mode(
        &self,
        mode: ExecutionMode,
    ) -> Result<AggregateResult, MulticallError> {
        let output = self.dispatch(self.calldata(), self.calls.len(), mode).await?;
        let ret = ITronMulticall::aggregateCall::abi_decode_returns(&output)
            .map_err(DecodeError::from)?;
        let result = AggregateResult::from_parts(ret.blockNumber, ret.returnData)?;

        self.check_results(&result.results, mode)?;
        debug!(block_number = result.block_number, "Aggregated batch");
        Ok(result)
    }

    /// Executes the batch followed by a call to the aggregator's `getCurrentBlockTimestamp`, and
    /// reports the timestamp alongside the results of the batch.
    #[instrument(skip(self), fields(calls_count = self.calls.len(), aggregator = %self.aggregator))]
    pub async fn aggregate_with_timestamp(
        &self,
        mode: ExecutionMode,
    ) -> Result<AggregateResult, MulticallError> {
        let mut calls = self.calls.clone();
        calls.push(Call::from_sol(
            self.aggregator,
            &ITronMulticall::getCurrentBlockTimestampCall {},
        ));

        let output = self.dispatch(encode_aggregate(&calls), calls.len(), mode).await?;
        let ret = ITronMulticall::aggregateCall::abi_decode_returns(&output)
            .map_err(DecodeError::from)?;
        let mut result = AggregateResult::from_parts(ret.blockNumber, ret.returnData)?;

        let timestamp = result
            .results
            .pop()
            .ok_or(DecodeError::MissingResult(calls.len() - 1))?
            .decode::<ITronMulticall::getCurrentBlockTimestampCall>()?;
        result.block_timestamp = Some(to_u64(timestamp)?);

        self.check_results(&result.results, mode)?;
        debug!(
            block_number = result.block_number,
            block_timestamp = ?result.block_timestamp,
            "Aggregated batch"
        );
        Ok(result)
    }

    /// Executes the batch through `tryAggregate`.
    ///
    /// With `require_success`, a single failing call makes the whole batch revert.
    #[instrument(skip(self), fields(calls_count = self.calls.len(), aggregator = %self.aggregator))]
    pub async fn try_aggregate(
        &self,
        require_success: bool,
        mode: ExecutionMode,
    ) -> Result<Vec<CallResult>, MulticallError> {
        let input = ITronMulticall::tryAggregateCall {
            requireSuccess: require_success,
            calls: self.sol_calls(),
        }
        .abi_encode();

        let output = self.dispatch(input.into(), self.calls.len(), mode).await?;
        let results: Vec<CallResult> = ITronMulticall::tryAggregateCall::abi_decode_returns(&output)
            .map_err(DecodeError::from)?
            .into_iter()
            .map(Into::into)
            .collect();

        self.check_results(&results, mode)?;
        Ok(results)
    }

    /// Executes the batch through `blockAndAggregate`, additionally reporting the parent block
    /// hash.
    #[instrument(skip(self), fields(calls_count = self.calls.len(), aggregator = %self.aggregator))]
    pub async fn block_and_aggregate(
        &self,
        mode: ExecutionMode,
    ) -> Result<AggregateResult, MulticallError> {
        let input = ITronMulticall::blockAndAggregateCall { calls: self.sol_calls() }.abi_encode();

        let output = self.dispatch(input.into(), self.calls.len(), mode).await?;
        let ret = ITronMulticall::blockAndAggregateCall::abi_decode_returns(&output)
            .map_err(DecodeError::from)?;
        let mut result = AggregateResult::from_parts(ret.blockNumber, ret.returnData)?;
        result.block_hash = Some(ret.blockHash);

        self.check_results(&result.results, mode)?;
        Ok(result)
    }

    /// Executes each payload against the aggregator itself, in a single invocation.
    ///
    /// Unlike `aggregate`, any failing payload reverts the whole invocation. The batched calls
    /// are not involved.
    #[instrument(skip(self, data), fields(payloads = data.len(), aggregator = %self.aggregator))]
    pub async fn multicall(
        &self,
        data: Vec<Bytes>,
        mode: ExecutionMode,
    ) -> Result<Vec<Bytes>, MulticallError> {
        let count = data.len();
        let input = ITronMulticall::multicallCall { data }.abi_encode();

        let output = self.dispatch(input.into(), count, mode).await?;
        let results =
            ITronMulticall::multicallCall::abi_decode_returns(&output).map_err(DecodeError::from)?;

        if results.len() != count {
            return Err(DecodeError::UnexpectedResultCount { expected: count, actual: results.len() }
                .into());
        }
        Ok(results)
    }

    /// Estimates the energy the `aggregate` invocation of the batch would consume.
    #[instrument(skip(self), fields(calls_count = self.calls.len(), aggregator = %self.aggregator))]
    pub async fn estimate(&self) -> Result<u64, MulticallError> {
        let cost = self.client.estimate_cost(&self.estimate_request()).await?;
        debug!(cost, "Estimated batch");
        Ok(cost)
    }

    fn sol_calls(&self) -> Vec<ITronMulticall::Call> {
        self.calls.iter().cloned().map(Into::into).collect()
    }

    async fn dispatch(
        &self,
        input: Bytes,
        batch_size: usize,
        mode: ExecutionMode,
    ) -> Result<Bytes, MulticallError> {
        let metrics = MulticallMetrics::new_with_labels(&[("mode", mode.as_str())]);
        metrics.batches.increment(1);
        metrics.batch_size.record(batch_size as f64);

        let request = self.request(input);
        debug!(%mode, input_len = request.input.len(), "Dispatching batch");

        let result = match mode {
            ExecutionMode::Commit => self.client.submit(&request).await,
            ExecutionMode::Static => self.client.simulate(&request).await,
        };

        result.map_err(|err| {
            metrics.batch_errors.increment(1);
            warn!(%mode, %err, "Batch could not be executed");
            err.into()
        })
    }

    fn check_results(
        &self,
        results: &[CallResult],
        mode: ExecutionMode,
    ) -> Result<(), MulticallError> {
        if results.len() != self.calls.len() {
            return Err(DecodeError::UnexpectedResultCount {
                expected: self.calls.len(),
                actual: results.len(),
            }
            .into());
        }

        let metrics = MulticallMetrics::new_with_labels(&[("mode", mode.as_str())]);
        for (index, (call, result)) in self.calls.iter().zip(results).enumerate() {
            if !result.success {
                metrics.failed_calls.increment(1);
                warn!(
                    index,
                    target = %call.target(),
                    reason = ?result.revert_reason(),
                    "Sub-call failed"
                );
            }
        }
        Ok(())
    }
}

fn encode_aggregate(calls: &[Call]) -> Bytes {
    ITronMulticall::aggregateCall { calls: calls.iter().cloned().map(Into::into).collect() }
        .abi_encode()
        .into()
}

/// Helper macro to create a list of typed calls.
///
/// ```
/// use alloy::primitives::Address;
/// use multicall::{multicall_batch, types::ITronMulticall};
///
/// let aggregator = Address::repeat_byte(0xaa);
/// let calls = multicall_batch![
///     aggregator => ITronMulticall::getBlockNumberCall {},
///     aggregator => ITronMulticall::getCurrentBlockTimestampCall {},
/// ];
/// assert_eq!(calls.len(), 2);
/// ```
#[macro_export]
macro_rules! multicall_batch {
    ($($target:expr => $call:expr),* $(,)?) => {
        vec![
            $(
                $crate::types::Call::from_sol($target, &$call)
            ),*
        ]
    };
}
