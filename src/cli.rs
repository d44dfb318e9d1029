//! # Multicall CLI
use crate::{
    config::MulticallConfig,
    multicall::{ExecutionMode, Multicall},
    serde::fn_selector,
    transport::ProviderClient,
    types::{AggregateResult, Call, parse_target, to_tron_hex},
};
use alloy::{
    hex,
    primitives::{Address, U256},
};
use clap::{Parser, Subcommand};
use eyre::{OptionExt, WrapErr};
use std::{path::PathBuf, time::Duration};
use tracing::info;
use url::Url;

/// Batches contract calls into a single invocation of a deployed aggregator.
#[derive(Debug, Parser)]
#[command(author, about = "Multicall", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, one is created from the CLI values and stored under `multicall.yaml`.
    #[arg(long, value_name = "CONFIG", env = "MULTICALL_CONFIG", default_value = "multicall.yaml")]
    pub config: PathBuf,
    /// The JSON-RPC endpoint of the execution environment.
    ///
    /// Required unless the configuration file already names one.
    #[arg(long, value_name = "RPC_ENDPOINT")]
    pub endpoint: Option<Url>,
    /// The address of the deployed aggregator, in EVM or TRON hex form.
    #[arg(long, value_name = "ADDRESS", value_parser = parse_address)]
    pub aggregator: Option<Address>,
    /// The account dispatching batches.
    #[arg(long, value_name = "ADDRESS", value_parser = parse_address)]
    pub caller: Option<Address>,
    /// The energy ceiling of a batch.
    #[arg(long, value_name = "ENERGY")]
    pub fee_limit: Option<u64>,
    /// The value sent with a batch.
    #[arg(long, value_name = "AMOUNT")]
    pub call_value: Option<U256>,
    /// The timeout of a single request.
    #[arg(long = "timeout", value_name = "SECONDS", value_parser = parse_duration_secs)]
    pub request_timeout: Option<Duration>,
    /// The private key to sign transactions with.
    #[arg(long, value_name = "PRIVATE_KEY", env = "MULTICALL_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands of the multicall CLI.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute a batch and print one result per call.
    Aggregate {
        /// A call, as `TARGET:PAYLOAD`.
        ///
        /// `PAYLOAD` is hex call data or the signature of a function without arguments, e.g.
        /// `getBlockNumber()`.
        #[arg(long = "call", value_name = "TARGET:PAYLOAD", value_parser = parse_call)]
        calls: Vec<Call>,
        /// Simulate the batch instead of submitting a transaction.
        #[arg(long = "static", default_value_t = false)]
        simulate: bool,
        /// Also report the timestamp of the block the batch executed in.
        #[arg(long, default_value_t = false)]
        with_timestamp: bool,
    },
    /// Estimate the energy a batch would consume.
    Estimate {
        /// A call, as `TARGET:PAYLOAD`.
        #[arg(long = "call", value_name = "TARGET:PAYLOAD", value_parser = parse_call)]
        calls: Vec<Call>,
    },
}

impl Args {
    /// Run the command.
    pub async fn run(self) -> eyre::Result<()> {
        let config = if !self.config.exists() {
            let endpoint = self
                .endpoint
                .clone()
                .ok_or_eyre("--endpoint is required when no config file exists")?;
            let config = self.merge_config(MulticallConfig::new(endpoint));
            config.save_to_file(&self.config)?;
            config
        } else {
            // File exists: load and override with CLI values.
            self.merge_config(MulticallConfig::load_from_file(&self.config)?)
        };
        config.validate()?;

        let client =
            ProviderClient::connect(&config.endpoint, config.request_timeout, config.signer()?)
                .await
                .wrap_err_with(|| format!("failed to connect to {}", config.endpoint))?;

        let calls = match &self.command {
            Command::Aggregate { calls, .. } | Command::Estimate { calls } => calls.clone(),
        };
        let mut batch = Multicall::new(client, config.aggregator)
            .with_options(config.options.clone())
            .extend(calls);
        if let Some(caller) = config.caller {
            batch = batch.with_caller(caller);
        }

        match self.command {
            Command::Aggregate { simulate, with_timestamp, .. } => {
                let mode = if simulate { ExecutionMode::Static } else { ExecutionMode::Commit };
                info!(
                    %mode,
                    calls = batch.len(),
                    aggregator = %to_tron_hex(config.aggregator),
                    "Dispatching batch"
                );

                let result = if with_timestamp {
                    batch.aggregate_with_timestamp(mode).await?
                } else {
                    batch.aggregate_with_mode(mode).await?
                };
                print_result(&result);
            }
            Command::Estimate { .. } => {
                let cost = batch.estimate().await?;
                println!("{cost}");
            }
        }

        Ok(())
    }

    /// Merges [`Args`] values into an existing [`MulticallConfig`] instance.
    pub fn merge_config(&self, config: MulticallConfig) -> MulticallConfig {
        config
            .with_endpoint(self.endpoint.clone())
            .with_aggregator(self.aggregator)
            .with_caller(self.caller)
            .with_fee_limit(self.fee_limit)
            .with_call_value(self.call_value)
            .with_request_timeout(self.request_timeout)
            .with_private_key(self.private_key.clone())
    }
}

fn print_result(result: &AggregateResult) {
    println!("block: {}", result.block_number);
    if let Some(timestamp) = result.block_timestamp {
        println!("timestamp: {timestamp}");
    }
    for (index, call) in result.results.iter().enumerate() {
        if call.success {
            println!("{index}: ok {}", call.return_data);
        } else {
            let reason = call.revert_reason().unwrap_or_else(|| call.return_data.to_string());
            println!("{index}: failed {reason}");
        }
    }
}

/// Parses a string representing seconds to a [`Duration`].
fn parse_duration_secs(arg: &str) -> Result<Duration, std::num::ParseIntError> {
    let seconds = arg.parse()?;
    Ok(Duration::from_secs(seconds))
}

/// Parses an address in EVM or TRON hex form.
fn parse_address(arg: &str) -> eyre::Result<Address> {
    Ok(parse_target(arg)?)
}

/// Parses a call in a format of "target:payload".
fn parse_call(arg: &str) -> eyre::Result<Call> {
    let (target, payload) = arg.split_once(':').ok_or_eyre("expected target:payload argument")?;
    let target = parse_target(target)?;

    let call_data = match hex::decode(payload) {
        Ok(data) => data,
        Err(_) => fn_selector::parse(payload)
            .wrap_err_with(|| format!("invalid payload: {payload}"))?
            .to_vec(),
    };
    Ok(Call::new(target, call_data))
}
