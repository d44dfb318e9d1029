//! Typed view over aggregator call payloads and their results.

use super::{AggregateResult, CallResult, ITronMulticall, to_u64};
use crate::error::DecodeError;
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    sol_types::{SolCall, SolInterface, SolValue},
};
use ITronMulticall::ITronMulticallCalls;

/// A call payload, decoded as far as the aggregator ABI allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A call to one of the aggregator's own functions.
    Known(ITronMulticallCalls),
    /// Any other payload, kept verbatim.
    Opaque(Bytes),
}

impl Payload {
    /// Decodes a payload. Anything that is not a well-formed aggregator call is [`Self::Opaque`].
    pub fn decode(data: &[u8]) -> Self {
        match ITronMulticallCalls::abi_decode(data) {
            Ok(call) => Self::Known(call),
            Err(_) => Self::Opaque(Bytes::copy_from_slice(data)),
        }
    }

    /// Encodes the payload back into call data.
    pub fn encode(&self) -> Bytes {
        match self {
            Self::Known(call) => call.abi_encode().into(),
            Self::Opaque(data) => data.clone(),
        }
    }

    /// The 4-byte selector, if the payload carries one.
    pub fn selector(&self) -> Option<[u8; 4]> {
        match self {
            Self::Known(call) => Some(call.selector()),
            Self::Opaque(data) => data.get(..4).and_then(|s| s.try_into().ok()),
        }
    }

    /// The shape of the value returned by this payload.
    pub fn return_shape(&self) -> ReturnShape {
        let Self::Known(call) = self else { return ReturnShape::Raw };
        match call {
            ITronMulticallCalls::aggregate(_) => ReturnShape::Aggregate,
            ITronMulticallCalls::tryAggregate(_) => ReturnShape::Results,
            ITronMulticallCalls::blockAndAggregate(_) => ReturnShape::BlockAndAggregate,
            ITronMulticallCalls::multicall(_) => ReturnShape::BytesList,
            ITronMulticallCalls::getBlockHash(_) | ITronMulticallCalls::getLastBlockHash(_) => {
                ReturnShape::Bytes32
            }
            ITronMulticallCalls::getCurrentBlockCoinbase(_) => ReturnShape::Address,
            ITronMulticallCalls::getBlockNumber(_)
            | ITronMulticallCalls::getCurrentBlockTimestamp(_)
            | ITronMulticallCalls::getEthBalance(_)
            | ITronMulticallCalls::getChainId(_) => ReturnShape::Uint,
        }
    }
}

impl From<Bytes> for Payload {
    fn from(data: Bytes) -> Self {
        Self::decode(&data)
    }
}

/// The expected layout of a call's return data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// `(uint256 blockNumber, (bool,bytes)[] returnData)`.
    Aggregate,
    /// `(bool,bytes)[]`.
    Results,
    /// `(uint256 blockNumber, bytes32 blockHash, (bool,bytes)[] returnData)`.
    BlockAndAggregate,
    /// `bytes[]`.
    BytesList,
    /// A single `uint256`.
    Uint,
    /// A single `bytes32`.
    Bytes32,
    /// A single `address`.
    Address,
    /// Uninterpreted bytes.
    Raw,
}

impl ReturnShape {
    /// Decodes `data` according to this shape.
    pub fn decode(self, data: &[u8]) -> Result<ReturnValue, DecodeError> {
        Ok(match self {
            Self::Aggregate => {
                let ret = ITronMulticall::aggregateCall::abi_decode_returns(data)?;
                ReturnValue::Aggregate(AggregateResult::from_parts(
                    ret.blockNumber,
                    ret.returnData,
                )?)
            }
            Self::Results => ReturnValue::Results(
                ITronMulticall::tryAggregateCall::abi_decode_returns(data)?
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            ),
            Self::BlockAndAggregate => {
                let ret = ITronMulticall::blockAndAggregateCall::abi_decode_returns(data)?;
                let mut result = AggregateResult::from_parts(ret.blockNumber, ret.returnData)?;
                result.block_hash = Some(ret.blockHash);
                ReturnValue::Aggregate(result)
            }
            Self::BytesList => {
                ReturnValue::BytesList(ITronMulticall::multicallCall::abi_decode_returns(data)?)
            }
            Self::Uint => ReturnValue::Uint(U256::abi_decode(word(data)?)?),
            Self::Bytes32 => ReturnValue::Bytes32(B256::from_slice(word(data)?)),
            Self::Address => ReturnValue::Address(Address::abi_decode(word(data)?)?),
            Self::Raw => ReturnValue::Raw(Bytes::copy_from_slice(data)),
        })
    }
}

/// Returns `data` if it is exactly one ABI word.
fn word(data: &[u8]) -> Result<&[u8], DecodeError> {
    if data.len() != 32 {
        return Err(DecodeError::Length { expected: 32, actual: data.len() });
    }
    Ok(data)
}

/// A decoded return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnValue {
    /// Result of `aggregate` or `blockAndAggregate`.
    Aggregate(AggregateResult),
    /// Result of `tryAggregate`.
    Results(Vec<CallResult>),
    /// Result of `multicall`.
    BytesList(Vec<Bytes>),
    /// An integer.
    Uint(U256),
    /// A hash.
    Bytes32(B256),
    /// An address.
    Address(Address),
    /// Bytes of unknown layout.
    Raw(Bytes),
}

impl ReturnValue {
    /// Returns the integer as a `u64`, if this is an integer.
    pub fn as_u64(&self) -> Option<Result<u64, DecodeError>> {
        match self {
            Self::Uint(value) => Some(to_u64(*value)),
            _ => None,
        }
    }

    /// Returns the aggregate result, if this is one.
    pub fn as_aggregate(&self) -> Option<&AggregateResult> {
        match self {
            Self::Aggregate(result) => Some(result),
            _ => None,
        }
    }

    /// Returns the list of payload results, if this is one.
    pub fn as_bytes_list(&self) -> Option<&[Bytes]> {
        match self {
            Self::BytesList(list) => Some(list),
            _ => None,
        }
    }
}
