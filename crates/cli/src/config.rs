//! Configuration resolution for the CLI
//!
//! Sources apply in order: the TOML file given with `--config` (or defaults),
//! the environment, then command-line flags. The result is validated before
//! any connection is made.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use filplus_config::ClientConfig;
use filplus_core::FilAddress;

/// Builds the client configuration from the process environment and `args`
pub fn resolve(args: &CliArgs) -> Result<ClientConfig> {
    resolve_with_env(args, |key| std::env::var(key).ok())
}

/// Builds the client configuration with an explicit environment lookup
pub fn resolve_with_env<F>(args: &CliArgs, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };

    config
        .apply_env_from(lookup)
        .context("invalid node settings in environment")?;
    apply_args(&mut config, args);

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn apply_args(config: &mut ClientConfig, args: &CliArgs) {
    if let Some(url) = &args.rpc_url {
        config.endpoint = url.clone();
    }

    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }

    if let Some(network) = args.network {
        config.network = network;
    }

    if let Some(confidence) = args.confidence {
        config.confidence = confidence;
    }

    if let Some(timeout) = args.timeout {
        config.finality_timeout_secs = Some(timeout);
    }
}

/// The configured sender for write calls, if any
pub fn default_sender(config: &ClientConfig) -> Result<Option<FilAddress>> {
    config
        .sender
        .as_deref()
        .map(|sender| {
            sender
                .parse::<FilAddress>()
                .with_context(|| format!("invalid sender address '{sender}'"))
        })
        .transpose()
}
