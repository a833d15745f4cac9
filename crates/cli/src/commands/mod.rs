//! Command call sites. Each command supplies a literal method signature
//! and its arguments to the shared [`ContractClient`].

pub mod allowance;
pub mod registry;

use crate::args::{Amount, Command};
use anyhow::Result;
use filplus_abi::AbiValue;
use filplus_amt::BlockStore;
use filplus_rpc_client::{ContractClient, MessageGateway};
use num_bigint::BigInt;
use std::io::Write;

pub use allowance::AllowanceCommands;
pub use registry::RegistryCommands;

/// Result type of a command
pub type CommandResult = Result<()>;

/// Runs `command`, writing its report to `out`
pub async fn execute<G, S, W>(
    client: &ContractClient<G, S>,
    command: &Command,
    out: &mut W,
) -> CommandResult
where
    G: MessageGateway,
    S: BlockStore,
    W: Write,
{
    let registry = RegistryCommands::new(client);
    let allowance = AllowanceCommands::new(client);

    match command {
        Command::DeployAllocatorContract {
            registry: address,
            initial_owner,
            send,
        } => registry.deploy(*address, *initial_owner, send.from.clone(), out).await,
        Command::ListContracts { registry: address } => registry.list_contracts(*address, out).await,
        Command::ListAllocators { contract } => allowance.list_allocators(*contract, out).await,
        Command::AddAllowance {
            contract,
            allocator,
            amount,
            send,
        } => {
            allowance
                .add_allowance(*contract, *allocator, amount, send.from.clone(), out)
                .await
        }
        Command::SetAllowance {
            contract,
            allocator,
            amount,
            send,
        } => {
            allowance
                .set_allowance(*contract, *allocator, amount, send.from.clone(), out)
                .await
        }
        Command::AddVerifiedClient {
            contract,
            client: verified_client,
            amount,
            send,
        } => {
            allowance
                .add_verified_client(*contract, *verified_client, amount, send.from.clone(), out)
                .await
        }
    }
}

fn amount_value(amount: &Amount) -> AbiValue {
    AbiValue::Integer(BigInt::from(amount.0.clone()))
}
