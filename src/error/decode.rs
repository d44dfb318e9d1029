use alloy::primitives::U256;
use thiserror::Error;

/// Errors raised while interpreting raw return data.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a valid ABI encoding of the expected shape.
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
    /// The bytes have the wrong length for a fixed-size shape.
    #[error("expected {expected} bytes of return data, got {actual}")]
    Length {
        /// Number of bytes the shape occupies.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },
    /// The sub-call being decoded did not succeed, so it carries no return value.
    #[error("sub-call failed{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    CallFailed {
        /// The decoded revert reason, if the revert data carried one.
        reason: Option<String>,
    },
    /// A numeric value does not fit the native integer it is converted into.
    #[error("value {0} out of range")]
    Overflow(U256),
    /// The aggregator returned a different number of results than calls were sent.
    #[error("expected {expected} results, got {actual}")]
    UnexpectedResultCount {
        /// Number of calls in the batch.
        expected: usize,
        /// Number of results returned.
        actual: usize,
    },
    /// A result index outside the batch was requested.
    #[error("no result at index {0}")]
    MissingResult(usize),
}
