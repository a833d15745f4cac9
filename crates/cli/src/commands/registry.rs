use super::CommandResult;
use crate::output;
use anyhow::{anyhow, Context};
use filplus_abi::AbiValue;
use filplus_amt::BlockStore;
use filplus_core::{EthAddress, FilAddress};
use filplus_rpc_client::{ContractClient, MessageGateway};
use std::io::Write;

/// `deploy(address)` on the registry; emits `Deployed(address)`
pub const DEPLOY: &str = "deploy(address)";

/// Registered allocator contracts
pub const CONTRACTS: &str = "contracts() returns (address[])";

/// Allocator contract registry commands
pub struct RegistryCommands<'a, G, S> {
    client: &'a ContractClient<G, S>,
}

impl<'a, G: MessageGateway, S: BlockStore> RegistryCommands<'a, G, S> {
    pub fn new(client: &'a ContractClient<G, S>) -> Self {
        Self { client }
    }

    /// Deploys an allocator contract owned by `initial_owner`
    pub async fn deploy<W: Write>(
        &self,
        registry: EthAddress,
        initial_owner: EthAddress,
        from: Option<FilAddress>,
        out: &mut W,
    ) -> CommandResult {
        let invocation = self
            .client
            .invoke(registry, from, DEPLOY, &[initial_owner.into()])
            .await
            .with_context(|| format!("deploying allocator contract through {registry}"))?;
        output::write_invocation(out, &invocation)?;
        Ok(())
    }

    /// Gets the allocator contracts known to `registry`
    pub async fn contracts(&self, registry: EthAddress) -> anyhow::Result<Vec<EthAddress>> {
        let values = self
            .client
            .call(registry, CONTRACTS, &[])
            .await
            .with_context(|| format!("listing contracts of {registry}"))?;
        address_list(&values)
    }

    /// Prints the allocator contracts known to `registry`
    pub async fn list_contracts<W: Write>(&self, registry: EthAddress, out: &mut W) -> CommandResult {
        let contracts = self.contracts(registry).await?;
        output::write_address_list(out, &contracts)?;
        Ok(())
    }
}

/// Reads the single `address[]` return value of a call
pub(crate) fn address_list(values: &[AbiValue]) -> anyhow::Result<Vec<EthAddress>> {
    let items = values
        .first()
        .and_then(AbiValue::as_array)
        .ok_or_else(|| anyhow!("expected an address[] return value"))?;
    items
        .iter()
        .map(|item| item.as_address().ok_or_else(|| anyhow!("expected an address, got {item}")))
        .collect()
}
