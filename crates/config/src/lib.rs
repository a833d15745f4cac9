//! Filecoin Plus Configuration Module
//!
//! Protocol constants shared by every crate in the workspace, and the
//! configuration used to reach a Lotus full node.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Bit width of the AMT holding the events emitted by one message.
pub const EVENT_AMT_BITWIDTH: u32 = 5;

/// FRC-42 method number of `InvokeContract` on the EVM actor.
pub const INVOKE_CONTRACT_METHOD: u64 = 3_844_450_837;

/// Delegated address namespace owned by the Ethereum Address Manager.
pub const EAM_NAMESPACE: u64 = 10;

/// Number of epochs a message must be buried under before it is reported.
/// Zero reports the receipt as soon as the message executes.
pub const DEFAULT_MESSAGE_CONFIDENCE: u64 = 0;

/// Lookback limit passed to `StateWaitMsg`; -1 searches the whole chain.
pub const LOOKBACK_NO_LIMIT: i64 = -1;

/// Default Lotus JSON-RPC endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:1234/rpc/v1";

/// Size of an Ethereum address in bytes
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of an ABI word in bytes
pub const ABI_WORD_SIZE: usize = 32;

/// Environment variable carrying Lotus API info (`TOKEN:/ip4/HOST/tcp/PORT/http`).
pub const ENV_FULLNODE_API_INFO: &str = "FULLNODE_API_INFO";
/// Environment variable overriding the endpoint URL.
pub const ENV_RPC_URL: &str = "FILPLUS_RPC_URL";
/// Environment variable overriding the API token.
pub const ENV_RPC_TOKEN: &str = "FILPLUS_RPC_TOKEN";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ClientConfig`]
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// An endpoint could not be interpreted
    #[error("invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    /// A configured value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Filecoin network, which fixes the address prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Gets the single-character address prefix
    pub fn address_prefix(&self) -> char {
        match self {
            Network::Mainnet => 'f',
            Network::Testnet => 't',
        }
    }

    /// Resolves a network from an address prefix
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'f' => Some(Network::Mainnet),
            't' => Some(Network::Testnet),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" | "calibnet" | "calibration" => Ok(Network::Testnet),
            _ => Err(format!("Unknown network type: {}", s)),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the full node
    pub endpoint: Url,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Network the node belongs to
    pub network: Network,
    /// Confirmations required before a message counts as final
    pub confidence: u64,
    /// Upper bound on waiting for finality; unbounded when absent
    pub finality_timeout_secs: Option<u64>,
    /// Sender used for write calls instead of the wallet default
    pub sender: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            network: Network::default(),
            confidence: DEFAULT_MESSAGE_CONFIDENCE,
            finality_timeout_secs: None,
            sender: None,
        }
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

impl ClientConfig {
    /// Loads configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parses configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// `FULLNODE_API_INFO` is applied first so the more specific
    /// `FILPLUS_RPC_URL` / `FILPLUS_RPC_TOKEN` win over it.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(info) = lookup(ENV_FULLNODE_API_INFO).filter(|v| !v.trim().is_empty()) {
            let api = ApiInfo::parse(&info)?;
            self.endpoint = api.endpoint;
            if api.token.is_some() {
                self.token = api.token;
            }
        }

        if let Some(url) = lookup(ENV_RPC_URL).filter(|v| !v.trim().is_empty()) {
            self.endpoint = parse_endpoint(&url)?;
        }

        if let Some(token) = lookup(ENV_RPC_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.token = Some(token);
        }

        Ok(())
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidEndpoint {
                    value: self.endpoint.to_string(),
                    reason: format!("unsupported scheme '{other}'"),
                })
            }
        }

        if self.finality_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "finality_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(sender) = &self.sender {
            let prefix = sender.chars().next();
            if prefix.and_then(Network::from_prefix) != Some(self.network) {
                return Err(ConfigError::Invalid(format!(
                    "sender {sender} does not belong to {}",
                    self.network
                )));
            }
        }

        Ok(())
    }

    /// Gets the finality timeout
    pub fn finality_timeout(&self) -> Option<Duration> {
        self.finality_timeout_secs.map(Duration::from_secs)
    }
}

/// Endpoint and token parsed from a Lotus API info string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub endpoint: Url,
    pub token: Option<String>,
}

impl ApiInfo {
    /// Parses `TOKEN:/ip4/127.0.0.1/tcp/1234/http`, a bare multiaddr, or
    /// `TOKEN:http://host:port/rpc/v1`.
    pub fn parse(info: &str) -> Result<Self, ConfigError> {
        let info = info.trim();
        let (token, addr) = if info.starts_with('/') || (info.contains("://") && !has_token_prefix(info)) {
            (None, info)
        } else {
            match info.split_once(':') {
                Some((token, addr)) => (Some(token.to_string()), addr),
                None => {
                    return Err(ConfigError::InvalidEndpoint {
                        value: info.to_string(),
                        reason: "expected TOKEN:ADDRESS".to_string(),
                    })
                }
            }
        };

        let endpoint = if addr.starts_with('/') {
            multiaddr_to_url(addr)?
        } else {
            parse_endpoint(addr)?
        };

        Ok(Self {
            endpoint,
            token: token.filter(|t| !t.is_empty()),
        })
    }
}

fn has_token_prefix(info: &str) -> bool {
    // A token never contains '/', a URL scheme always precedes "://".
    match info.split_once(':') {
        Some((head, rest)) => !rest.starts_with("//") && !head.contains('/'),
        None => false,
    }
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn multiaddr_to_url(addr: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEndpoint {
        value: addr.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = addr.trim_start_matches('/').split('/').collect();
    let mut host = None;
    let mut port = None;
    let mut scheme = "http";

    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            "ip4" | "dns" | "dns4" | "dns6" => {
                host = parts.get(i + 1).map(|h| h.to_string());
                i += 2;
            }
            "ip6" => {
                host = parts.get(i + 1).map(|h| format!("[{h}]"));
                i += 2;
            }
            "tcp" => {
                let raw = parts.get(i + 1).ok_or_else(|| invalid("missing tcp port"))?;
                port = Some(raw.parse::<u16>().map_err(|_| invalid("invalid tcp port"))?);
                i += 2;
            }
            "http" | "ws" => {
                scheme = "http";
                i += 1;
            }
            "https" | "wss" => {
                scheme = "https";
                i += 1;
            }
            other => return Err(invalid(&format!("unsupported multiaddr component '{other}'"))),
        }
    }

    let host = host.ok_or_else(|| invalid("missing host"))?;
    let port = port.ok_or_else(|| invalid("missing tcp port"))?;
    parse_endpoint(&format!("{scheme}://{host}:{port}/rpc/v1"))
}
