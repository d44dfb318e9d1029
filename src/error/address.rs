use thiserror::Error;

/// Errors related to call targets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The target is not a 20-byte address in EVM or TRON hex form.
    #[error("invalid target address: {0:?}")]
    InvalidTarget(String),
}
