//! Multicall configuration.

use crate::{constants::DEFAULT_REQUEST_TIMEOUT, types::CallOptions};
use alloy::{
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
};
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Multicall configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticallConfig {
    /// JSON-RPC endpoint of the execution environment.
    pub endpoint: Url,
    /// Address of the deployed aggregator.
    pub aggregator: Address,
    /// Account dispatching batches. The node's default account is used if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<Address>,
    /// Execution options applied to every batch.
    #[serde(default)]
    pub options: CallOptions,
    /// Timeout for a single request, in seconds.
    #[serde(with = "crate::serde::duration", default = "default_request_timeout")]
    pub request_timeout: Duration,
    /// Secrets.
    #[serde(skip_serializing, default)]
    pub secrets: SecretsConfig,
}

const fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

/// Secrets (kept out of serialized output).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsConfig {
    /// Hex private key used to sign submitted transactions.
    #[serde(default)]
    pub private_key: Option<String>,
}

impl MulticallConfig {
    /// Creates a configuration for `endpoint` with default options and no aggregator.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            aggregator: Address::ZERO,
            caller: None,
            options: CallOptions::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            secrets: SecretsConfig::default(),
        }
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: Option<Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    /// Sets the aggregator address.
    pub fn with_aggregator(mut self, aggregator: Option<Address>) -> Self {
        if let Some(aggregator) = aggregator {
            self.aggregator = aggregator;
        }
        self
    }

    /// Sets the caller.
    pub fn with_caller(mut self, caller: Option<Address>) -> Self {
        self.caller = caller.or(self.caller);
        self
    }

    /// Sets the energy ceiling of every batch.
    pub fn with_fee_limit(mut self, fee_limit: Option<u64>) -> Self {
        self.options.fee_limit = fee_limit.or(self.options.fee_limit);
        self
    }

    /// Sets the value sent with every batch.
    pub fn with_call_value(mut self, call_value: Option<U256>) -> Self {
        if let Some(call_value) = call_value {
            self.options.call_value = call_value;
        }
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        if let Some(timeout) = timeout {
            self.request_timeout = timeout;
        }
        self
    }

    /// Sets the private key used to sign transactions.
    pub fn with_private_key(mut self, private_key: Option<String>) -> Self {
        self.secrets.private_key = private_key.or(self.secrets.private_key);
        self
    }

    /// Parses the configured private key, if any.
    pub fn signer(&self) -> eyre::Result<Option<PrivateKeySigner>> {
        self.secrets
            .private_key
            .as_deref()
            .map(|key| key.parse::<PrivateKeySigner>().wrap_err("invalid private key"))
            .transpose()
    }

    /// Ensures the configuration names an aggregator.
    pub fn validate(&self) -> eyre::Result<()> {
        eyre::ensure!(!self.aggregator.is_zero(), "no aggregator address configured");
        Ok(())
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
