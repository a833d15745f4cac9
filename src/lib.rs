//! # filplus-allocator
//!
//! Contract invocation and event decoding for Filecoin Plus allocator
//! contracts running on the Filecoin EVM.
//!
//! A call goes through one pipeline: the ABI codec encodes the method call,
//! the calldata is framed as a CBOR byte string for `InvokeContract`, the
//! message is pushed to a Lotus node and awaited, and on success the events
//! stored under the receipt's events root are read back from the node's
//! blockstore.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use filplus_allocator::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let client = ContractClient::from_config(&config)?;
//!
//!     let contract: EthAddress = "0xd388ab098ed3e84c0d808776440b48f685198498".parse()?;
//!     let allocators = client
//!         .call(contract, "allocators() returns (address[])", &[])
//!         .await?;
//!     println!("{}", allocators[0]);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - protocol constants and client configuration
//! - [`core`] - addresses, content addresses, receipts and event records
//! - [`abi`] - Solidity ABI codec and byte-string framing
//! - [`amt`] - read-only Array Mapped Trie reader
//! - [`rpc_client`] - Lotus JSON-RPC client and call orchestrator

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use filplus_abi as abi;
pub use filplus_amt as amt;
pub use filplus_config as config;
pub use filplus_core as core;
pub use filplus_rpc_client as rpc_client;

/// Common imports for allocator contract clients
pub mod prelude {
    pub use crate::abi::{AbiError, AbiValue, Calldata, MethodDescriptor, ParamType, WrappedCalldata};
    pub use crate::amt::{Amt, AmtError, BlockStore, StoreError};
    pub use crate::config::{ClientConfig, Network, EVENT_AMT_BITWIDTH};
    pub use crate::core::{
        ContentAddress, DecodedEntry, DecodedEvent, EthAddress, EventEntry, EventRecord,
        FilAddress, MessageReference, Receipt,
    };
    pub use crate::rpc_client::{
        CallState, ContractClient, InvokeError, InvokeResult, Invocation, MessageGateway,
        PendingCall, RemoteBlockStore, RpcClient, RpcError,
    };
}
