//! Multicall error types.
use alloy::{
    hex::FromHexError, primitives::Bytes, sol_types::decode_revert_reason,
    transports::TransportError,
};
use thiserror::Error;

mod address;
pub use address::AddressError;

mod decode;
pub use decode::DecodeError;

mod execution;
pub use execution::ExecutionError;

/// The overarching error type returned when dispatching a batch.
///
/// Per-call failures are never reported through this type: they are recorded in the batch
/// result as a [`CallResult`](crate::types::CallResult) with `success == false`. Every variant
/// here means the batch as a whole could not be executed or interpreted.
#[derive(Debug, Error)]
pub enum MulticallError {
    /// A call was built with a malformed target address.
    #[error(transparent)]
    InvalidTarget(#[from] AddressError),
    /// A call was built with call data that is not valid hex.
    #[error("invalid call data: {0}")]
    InvalidCallData(#[from] FromHexError),
    /// The response of the aggregator could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The outer aggregator invocation reverted.
    #[error("batch reverted{}", format_revert(.data))]
    Reverted {
        /// The revert data returned by the aggregator.
        data: Bytes,
    },
    /// The execution environment could not be reached or failed at the protocol level.
    #[error(transparent)]
    Transport(TransportError),
}

impl MulticallError {
    /// Returns `true` if the execution environment was never able to run the batch.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns the decoded revert reason of a reverted batch, if any.
    pub fn revert_reason(&self) -> Option<String> {
        match self {
            Self::Reverted { data } => revert_reason(data),
            _ => None,
        }
    }
}

impl From<ExecutionError> for MulticallError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Revert(data) => Self::Reverted { data },
            ExecutionError::Transport(err) => Self::Transport(err),
        }
    }
}

/// Renders revert data for error messages: `: <reason>` when it decodes, the raw hex otherwise.
pub(crate) fn format_revert(data: &Bytes) -> String {
    if data.is_empty() {
        return String::new();
    }
    match revert_reason(data) {
        Some(reason) => format!(": {reason}"),
        None => format!(": {data}"),
    }
}

/// Decodes the reason carried by revert data. Empty revert data carries none.
pub(crate) fn revert_reason(data: &[u8]) -> Option<String> {
    (!data.is_empty()).then(|| decode_revert_reason(data)).flatten()
}
