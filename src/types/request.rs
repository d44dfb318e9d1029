//! Requests sent to an execution environment.

use alloy::primitives::{Address, Bytes, FixedBytes, U256};
use serde::{Deserialize, Serialize};

/// Execution options attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOptions {
    /// Upper bound on the energy the request may consume.
    ///
    /// The execution environment applies its own default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_limit: Option<u64>,
    /// Native value transferred to the target along with the call.
    #[serde(default)]
    pub call_value: U256,
    /// Whether to wait for the transaction outcome when committing.
    #[serde(default = "default_poll_response")]
    pub poll_response: bool,
}

const fn default_poll_response() -> bool {
    true
}

impl Default for CallOptions {
    fn default() -> Self {
        Self { fee_limit: None, call_value: U256::ZERO, poll_response: default_poll_response() }
    }
}

impl CallOptions {
    /// Sets the energy ceiling.
    pub const fn with_fee_limit(mut self, fee_limit: u64) -> Self {
        self.fee_limit = Some(fee_limit);
        self
    }

    /// Sets the value transferred with the call.
    pub const fn with_call_value(mut self, call_value: U256) -> Self {
        self.call_value = call_value;
        self
    }

    /// Sets whether committing requests wait for their outcome.
    pub const fn with_poll_response(mut self, poll_response: bool) -> Self {
        self.poll_response = poll_response;
        self
    }
}

/// A single request to an execution environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// The account issuing the request. The environment picks a default when unset.
    pub caller: Option<Address>,
    /// The invoked contract.
    pub target: Address,
    /// The call data.
    pub input: Bytes,
    /// Execution options.
    pub options: CallOptions,
}

impl CallRequest {
    /// Creates a request with default options.
    pub fn new(target: Address, input: impl Into<Bytes>) -> Self {
        Self { caller: None, target, input: input.into(), options: CallOptions::default() }
    }

    /// Sets the caller.
    pub const fn with_caller(mut self, caller: Address) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Sets the execution options.
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}

/// A cost estimation request.
///
/// The call data is assembled from the selector and the encoded arguments; the request is never
/// executed for real.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    /// The invoked contract.
    pub target: Address,
    /// Function selector, given either as 4-byte hex or as a signature.
    #[serde(with = "crate::serde::fn_selector")]
    pub selector: FixedBytes<4>,
    /// ABI-encoded arguments, without the selector.
    #[serde(default)]
    pub args: Bytes,
    /// Execution options.
    #[serde(default)]
    pub options: CallOptions,
    /// The account the estimate is made for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<Address>,
}

impl EstimateRequest {
    /// Splits full call data into selector and arguments.
    ///
    /// Returns `None` if `call_data` is shorter than a selector.
    pub fn from_call_data(target: Address, call_data: &[u8]) -> Option<Self> {
        let (selector, args) = call_data.split_first_chunk::<4>()?;
        Some(Self {
            target,
            selector: FixedBytes(*selector),
            args: Bytes::copy_from_slice(args),
            options: CallOptions::default(),
            caller: None,
        })
    }

    /// The full call data: selector followed by the arguments.
    pub fn call_data(&self) -> Bytes {
        [self.selector.as_slice(), self.args.as_ref()].concat().into()
    }

    /// Converts the estimate into the equivalent call request.
    pub fn to_call_request(&self) -> CallRequest {
        CallRequest {
            caller: self.caller,
            target: self.target,
            input: self.call_data(),
            options: self.options.clone(),
        }
    }
}
