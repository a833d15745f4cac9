// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// lib.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Filecoin Plus RPC Client
//!
//! Talks to a Lotus full node over JSON-RPC and runs FEVM contract calls
//! end to end: encode, submit, wait for the receipt, decode the return
//! data and the emitted events.

pub mod models;

mod block_store;
mod contract_client;
mod gateway;
mod invoke_error;
mod pending_call;
mod rpc_client;
mod rpc_error;

pub use block_store::RemoteBlockStore;
pub use contract_client::{ContractClient, Invocation};
pub use gateway::MessageGateway;
pub use invoke_error::{InvokeError, InvokeResult};
pub use pending_call::{CallState, PendingCall};
pub use rpc_client::RpcClient;
pub use rpc_error::{RpcError, RpcResult, INTERNAL_ERROR, PARSE_ERROR};

pub use models::{EthCallRequest, Message, MsgLookup, RpcRequest, RpcResponse, SignedMessage};
