//! Additional helpers for RPC error handling

use crate::error::ExecutionError;
use alloy::{primitives::Bytes, transports::TransportError};

/// An extension trait for [`TransportError`]
pub trait TransportErrExt {
    /// Returns the revert data carried by an `execution reverted` error response.
    fn revert_data(&self) -> Option<Bytes>;

    /// Returns true if the node reported that the call reverted, with or without data.
    fn is_revert(&self) -> bool;

    /// Classifies the error as either a revert of the invoked call or a transport failure.
    fn into_execution_error(self) -> ExecutionError;
}

impl TransportErrExt for TransportError {
    fn revert_data(&self) -> Option<Bytes> {
        self.as_error_resp().and_then(|payload| payload.as_revert_data())
    }

    fn is_revert(&self) -> bool {
        // geth and reth both use this message, with error code 3 when revert data is attached
        self.as_error_resp()
            .map(|err| err.code == 3 || err.message.contains("execution reverted"))
            .unwrap_or_default()
    }

    fn into_execution_error(self) -> ExecutionError {
        if let Some(data) = self.revert_data() {
            ExecutionError::Revert(data)
        } else if self.is_revert() {
            ExecutionError::Revert(Bytes::new())
        } else {
            ExecutionError::Transport(self)
        }
    }
}
