use super::{amount_value, CommandResult};
use crate::args::Amount;
use crate::commands::registry::address_list;
use crate::output;
use anyhow::{anyhow, Context};
use filplus_abi::MethodDescriptor;
use filplus_amt::BlockStore;
use filplus_core::{EthAddress, FilAddress};
use filplus_rpc_client::{ContractClient, MessageGateway};
use futures::future::try_join_all;
use num_bigint::BigInt;
use std::io::Write;

/// Allocators registered in an allocator contract
pub const ALLOCATORS: &str = "allocators() returns (address[])";

/// Remaining allowance of one allocator
pub const ALLOWANCE: &str = "allowance(address) returns (uint256)";

pub const ADD_ALLOWANCE: &str = "addAllowance(address,uint256)";

pub const SET_ALLOWANCE: &str = "setAllowance(address,uint256)";

pub const ADD_VERIFIED_CLIENT: &str = "addVerifiedClient(address,uint256)";

/// Allocator contract commands
pub struct AllowanceCommands<'a, G, S> {
    client: &'a ContractClient<G, S>,
}

impl<'a, G: MessageGateway, S: BlockStore> AllowanceCommands<'a, G, S> {
    pub fn new(client: &'a ContractClient<G, S>) -> Self {
        Self { client }
    }

    /// Gets every allocator of `contract` with its allowance.
    ///
    /// The allowance lookups are independent reads and run concurrently.
    pub async fn allocators(&self, contract: EthAddress) -> anyhow::Result<Vec<(EthAddress, BigInt)>> {
        let values = self
            .client
            .call(contract, ALLOCATORS, &[])
            .await
            .with_context(|| format!("listing allocators of {contract}"))?;
        let allocators = address_list(&values)?;

        let allowance = MethodDescriptor::parse(ALLOWANCE)?;
        let lookups = allocators.iter().map(|allocator| {
            let allowance = &allowance;
            async move {
                let values = self
                    .client
                    .call_method(contract, allowance, &[(*allocator).into()])
                    .await
                    .with_context(|| format!("reading allowance of {allocator}"))?;
                let amount = values
                    .first()
                    .and_then(|value| value.as_integer())
                    .cloned()
                    .ok_or_else(|| anyhow!("expected a uint256 allowance"))?;
                Ok::<_, anyhow::Error>((*allocator, amount))
            }
        });
        try_join_all(lookups).await
    }

    /// Prints every allocator of `contract` with its allowance
    pub async fn list_allocators<W: Write>(&self, contract: EthAddress, out: &mut W) -> CommandResult {
        for (allocator, amount) in self.allocators(contract).await? {
            writeln!(out, "{allocator} {amount}")?;
        }
        Ok(())
    }

    /// Grants `amount` of additional allowance to `allocator`
    pub async fn add_allowance<W: Write>(
        &self,
        contract: EthAddress,
        allocator: EthAddress,
        amount: &Amount,
        from: Option<FilAddress>,
        out: &mut W,
    ) -> CommandResult {
        self.send(contract, ADD_ALLOWANCE, allocator, amount, from, out)
            .await
            .with_context(|| format!("adding allowance for {allocator}"))
    }

    /// Sets the allowance of `allocator` to `amount`
    pub async fn set_allowance<W: Write>(
        &self,
        contract: EthAddress,
        allocator: EthAddress,
        amount: &Amount,
        from: Option<FilAddress>,
        out: &mut W,
    ) -> CommandResult {
        self.send(contract, SET_ALLOWANCE, allocator, amount, from, out)
            .await
            .with_context(|| format!("setting allowance for {allocator}"))
    }

    /// Grants `amount` of DataCap to `client`
    pub async fn add_verified_client<W: Write>(
        &self,
        contract: EthAddress,
        client: EthAddress,
        amount: &Amount,
        from: Option<FilAddress>,
        out: &mut W,
    ) -> CommandResult {
        self.send(contract, ADD_VERIFIED_CLIENT, client, amount, from, out)
            .await
            .with_context(|| format!("adding verified client {client}"))
    }

    async fn send<W: Write>(
        &self,
        contract: EthAddress,
        signature: &str,
        address: EthAddress,
        amount: &Amount,
        from: Option<FilAddress>,
        out: &mut W,
    ) -> CommandResult {
        let invocation = self
            .client
            .invoke(contract, from, signature, &[address.into(), amount_value(amount)])
            .await?;
        output::write_invocation(out, &invocation)?;
        Ok(())
    }
}
