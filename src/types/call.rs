//! Batch entries and their results.

use super::{ITronMulticall, ReturnShape, ReturnValue, parse_target};
use crate::error::{DecodeError, MulticallError, revert_reason};
use alloy::{
    hex,
    primitives::{Address, B256, BlockNumber, Bytes, U256},
    sol_types::SolCall,
};

/// A single call in a batch: a target and the payload sent to it.
///
/// The payload is opaque to the aggregator. It may itself be an encoded `aggregate` aimed at
/// another aggregator, in which case it is dispatched like any other call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Call {
    target: Address,
    call_data: Bytes,
}

impl Call {
    /// Create a new call.
    pub fn new(target: Address, call_data: impl Into<Bytes>) -> Self {
        Self { target, call_data: call_data.into() }
    }

    /// Create a call from a typed contract call.
    pub fn from_sol<C: SolCall>(target: Address, call: &C) -> Self {
        Self::new(target, call.abi_encode())
    }

    /// Create a call from a textual target and hex call data.
    ///
    /// See [`parse_target`] for the accepted target forms.
    pub fn parse(target: &str, call_data: &str) -> Result<Self, MulticallError> {
        let target = parse_target(target)?;
        let call_data = hex::decode(call_data.trim())?;
        Ok(Self::new(target, call_data))
    }

    /// The call target.
    pub const fn target(&self) -> Address {
        self.target
    }

    /// The payload sent to the target.
    pub const fn call_data(&self) -> &Bytes {
        &self.call_data
    }

    /// The 4-byte selector of the payload, if it is long enough to carry one.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.call_data.get(..4).and_then(|s| s.try_into().ok())
    }
}

impl From<Call> for ITronMulticall::Call {
    fn from(call: Call) -> Self {
        Self { target: call.target, callData: call.call_data }
    }
}

impl From<ITronMulticall::Call> for Call {
    fn from(call: ITronMulticall::Call) -> Self {
        Self { target: call.target, call_data: call.callData }
    }
}

/// The outcome of one call in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallResult {
    /// Whether the call succeeded.
    pub success: bool,
    /// The return data, or the revert data (possibly empty) if the call failed.
    pub return_data: Bytes,
}

impl CallResult {
    /// A successful result.
    pub fn success(return_data: impl Into<Bytes>) -> Self {
        Self { success: true, return_data: return_data.into() }
    }

    /// A failed result carrying revert data.
    pub fn failure(revert_data: impl Into<Bytes>) -> Self {
        Self { success: false, return_data: revert_data.into() }
    }

    /// Decodes the revert reason of a failed call.
    pub fn revert_reason(&self) -> Option<String> {
        (!self.success).then(|| revert_reason(&self.return_data)).flatten()
    }

    /// Decodes the return data as the return value of `C`.
    pub fn decode<C: SolCall>(&self) -> Result<C::Return, DecodeError> {
        self.ensure_success()?;
        Ok(C::abi_decode_returns(&self.return_data)?)
    }

    /// Decodes the return data according to `shape`.
    pub fn decode_as(&self, shape: ReturnShape) -> Result<ReturnValue, DecodeError> {
        self.ensure_success()?;
        shape.decode(&self.return_data)
    }

    fn ensure_success(&self) -> Result<(), DecodeError> {
        if self.success {
            Ok(())
        } else {
            Err(DecodeError::CallFailed { reason: revert_reason(&self.return_data) })
        }
    }
}

impl From<ITronMulticall::Result> for CallResult {
    fn from(result: ITronMulticall::Result) -> Self {
        Self { success: result.success, return_data: result.returnData }
    }
}

impl From<CallResult> for ITronMulticall::Result {
    fn from(result: CallResult) -> Self {
        Self { success: result.success, returnData: result.return_data }
    }
}

/// The response of an aggregator invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    /// Number of the block the batch executed in.
    pub block_number: BlockNumber,
    /// Timestamp of that block, if requested.
    pub block_timestamp: Option<u64>,
    /// Hash of the parent block, if requested.
    pub block_hash: Option<B256>,
    /// One result per call, in call order.
    pub results: Vec<CallResult>,
}

impl AggregateResult {
    /// Creates a result from the raw `(blockNumber, returnData)` pair returned by `aggregate`.
    pub fn from_parts(
        block_number: U256,
        results: Vec<ITronMulticall::Result>,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            block_number: to_u64(block_number)?,
            block_timestamp: None,
            block_hash: None,
            results: results.into_iter().map(Into::into).collect(),
        })
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the result at `index`.
    pub fn get(&self, index: usize) -> Result<&CallResult, DecodeError> {
        self.results.get(index).ok_or(DecodeError::MissingResult(index))
    }

    /// Decodes the result at `index` as the return value of `C`.
    pub fn decode<C: SolCall>(&self, index: usize) -> Result<C::Return, DecodeError> {
        self.get(index)?.decode::<C>()
    }

    /// Iterates over `(index, result)` pairs of failed calls.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &CallResult)> {
        self.results.iter().enumerate().filter(|(_, result)| !result.success)
    }

    /// Whether every call succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|result| result.success)
    }
}

/// Narrows a 256-bit on-chain integer to `u64`.
pub(crate) fn to_u64(value: U256) -> Result<u64, DecodeError> {
    u64::try_from(value).map_err(|_| DecodeError::Overflow(value))
}
