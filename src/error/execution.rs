use super::format_revert;
use alloy::{primitives::Bytes, transports::TransportError};
use thiserror::Error;

/// Errors returned by an [`ExecutionClient`](crate::transport::ExecutionClient).
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The invoked call reverted; carries the revert data, possibly empty.
    #[error("execution reverted{}", format_revert(.0))]
    Revert(Bytes),
    /// The execution environment is unreachable or answered with a protocol-level error.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ExecutionError {
    /// Returns the revert data if this is a revert.
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            Self::Revert(data) => Some(data),
            Self::Transport(_) => None,
        }
    }
}
