use clap::{Args, Parser, Subcommand, ValueEnum};
use filplus_config::Network;
use filplus_core::{EthAddress, FilAddress};
use num_bigint::BigUint;
use num_traits::Num;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Command-line arguments for the allocator client
#[derive(Parser, Debug, Clone)]
#[command(
    name = "filplus",
    version = env!("CARGO_PKG_VERSION"),
    about = "Filecoin Plus smart contract allocator client",
    long_about = "Deploys allocator contracts and manages allocator allowances and verified clients through a Lotus full node."
)]
pub struct CliArgs {
    /// Specifies the config file
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Lotus JSON-RPC endpoint
    #[arg(long = "rpc-url", value_name = "URL", global = true)]
    pub rpc_url: Option<Url>,

    /// Lotus API token
    #[arg(long = "token", value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Network the node belongs to (mainnet, testnet)
    #[arg(long = "network", value_name = "NETWORK", global = true)]
    pub network: Option<Network>,

    /// Epochs a message must be buried under before it counts as executed
    #[arg(long = "confidence", value_name = "EPOCHS", global = true)]
    pub confidence: Option<u64>,

    /// Gives up waiting for a receipt after this many seconds
    #[arg(long = "timeout", value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// The log level
    #[arg(long = "log-level", value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by the commands that send a message
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SendArgs {
    /// Optionally specify your address to send the message from
    #[arg(long = "from", value_name = "ADDRESS")]
    pub from: Option<FilAddress>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deploy a new allocator contract through the registry
    DeployAllocatorContract {
        registry: EthAddress,
        initial_owner: EthAddress,
        #[command(flatten)]
        send: SendArgs,
    },

    /// List registered allocator contracts
    ListContracts { registry: EthAddress },

    /// List allocators in given allocator contract
    ListAllocators { contract: EthAddress },

    /// Grant allowance to allocator
    AddAllowance {
        contract: EthAddress,
        allocator: EthAddress,
        amount: Amount,
        #[command(flatten)]
        send: SendArgs,
    },

    /// Set allowance of allocator
    SetAllowance {
        contract: EthAddress,
        allocator: EthAddress,
        amount: Amount,
        #[command(flatten)]
        send: SendArgs,
    },

    /// Grant DataCap to a verified client as an allocator
    AddVerifiedClient {
        contract: EthAddress,
        client: EthAddress,
        amount: Amount,
        #[command(flatten)]
        send: SendArgs,
    },
}

impl Command {
    /// Fills in `--from` for write commands that did not give one
    pub fn with_default_sender(mut self, sender: Option<FilAddress>) -> Self {
        if let Some(send) = self.send_args_mut() {
            if send.from.is_none() {
                send.from = sender;
            }
        }
        self
    }

    fn send_args_mut(&mut self) -> Option<&mut SendArgs> {
        match self {
            Command::DeployAllocatorContract { send, .. }
            | Command::AddAllowance { send, .. }
            | Command::SetAllowance { send, .. }
            | Command::AddVerifiedClient { send, .. } => Some(send),
            Command::ListContracts { .. } | Command::ListAllocators { .. } => None,
        }
    }
}

/// A non-negative integer amount, decimal or `0x` hex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount(pub BigUint);

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => BigUint::from_str_radix(digits, 16),
            None => BigUint::from_str_radix(s, 10),
        };
        parsed
            .map(Amount)
            .map_err(|_| format!("invalid amount '{s}'"))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level logging
    Trace,
    /// Debug level logging
    Debug,
    /// Info level logging
    Info,
    /// Warning level logging
    Warn,
    /// Error level logging
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl LogLevel {
    /// Default filter directives for this level
    pub fn directives(&self) -> String {
        let level = tracing::Level::from(*self).to_string().to_lowercase();
        format!("{level},filplus={level}")
    }
}
