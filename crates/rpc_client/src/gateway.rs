// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// gateway.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The node-side operations the call orchestrator depends on.

use crate::pending_call::PendingCall;
use crate::rpc_client::RpcClient;
use crate::rpc_error::RpcResult;
use async_trait::async_trait;
use filplus_core::{EthAddress, FilAddress, MessageReference, Receipt};
use std::sync::Arc;
use tracing::debug;

/// Message submission and inclusion tracking on a Filecoin node
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Hands the call to the node's message pool
    async fn submit(&self, call: &PendingCall) -> RpcResult<MessageReference>;

    /// Blocks until the message executed with `confidence` epochs on top
    async fn await_finality(
        &self,
        message: &MessageReference,
        confidence: u64,
    ) -> RpcResult<Receipt>;

    /// Runs a read-only contract call against the latest state
    async fn eth_call(&self, from: EthAddress, to: EthAddress, data: Vec<u8>) -> RpcResult<Vec<u8>>;

    /// Gets the address write calls are sent from when none is given
    async fn default_sender(&self) -> RpcResult<FilAddress>;
}

#[async_trait]
impl MessageGateway for RpcClient {
    async fn submit(&self, call: &PendingCall) -> RpcResult<MessageReference> {
        let signed = self.mpool_push_message(&call.to_message()).await?;
        debug!(cid = %signed.cid, nonce = signed.message.nonce, "message pooled");
        Ok(MessageReference(signed.cid))
    }

    async fn await_finality(
        &self,
        message: &MessageReference,
        confidence: u64,
    ) -> RpcResult<Receipt> {
        let lookup = self.state_wait_msg(message.cid(), confidence).await?;
        if &lookup.message != message.cid() {
            debug!(submitted = %message, executed = %lookup.message, "message was replaced");
        }
        debug!(height = lookup.height, "message executed");
        Ok(lookup.receipt.into())
    }

    async fn eth_call(&self, from: EthAddress, to: EthAddress, data: Vec<u8>) -> RpcResult<Vec<u8>> {
        self.eth_call_to(from, to, data).await
    }

    async fn default_sender(&self) -> RpcResult<FilAddress> {
        self.wallet_default_address().await
    }
}

#[async_trait]
impl<G: MessageGateway + ?Sized> MessageGateway for Arc<G> {
    async fn submit(&self, call: &PendingCall) -> RpcResult<MessageReference> {
        (**self).submit(call).await
    }

    async fn await_finality(
        &self,
        message: &MessageReference,
        confidence: u64,
    ) -> RpcResult<Receipt> {
        (**self).await_finality(message, confidence).await
    }

    async fn eth_call(&self, from: EthAddress, to: EthAddress, data: Vec<u8>) -> RpcResult<Vec<u8>> {
        (**self).eth_call(from, to, data).await
    }

    async fn default_sender(&self) -> RpcResult<FilAddress> {
        (**self).default_sender().await
    }
}
