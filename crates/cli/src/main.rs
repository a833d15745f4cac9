use anyhow::{Context, Result};
use clap::Parser;
use filplus_cli::{commands, config, CliArgs, LogLevel};
use filplus_rpc_client::ContractClient;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();
    init_tracing(cli.log_level);

    let config = config::resolve(&cli)?;
    debug!(endpoint = %config.endpoint, network = %config.network, "connecting to node");

    let command = cli.command.with_default_sender(config::default_sender(&config)?);

    let client = ContractClient::from_config(&config).context("failed to create RPC client")?;
    let mut stdout = std::io::stdout().lock();
    commands::execute(&client, &command, &mut stdout).await
}

fn init_tracing(level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directives()));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
