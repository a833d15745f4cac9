// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// block_store.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! [`BlockStore`] over `Filecoin.ChainReadObj`.

use crate::rpc_client::RpcClient;
use crate::rpc_error::RpcError;
use async_trait::async_trait;
use filplus_amt::{BlockStore, StoreError};
use filplus_core::ContentAddress;
use std::sync::Arc;
use tracing::debug;

/// Read-only view of the node's chain blockstore.
///
/// Every `get` is a fresh round trip. Cloning shares the connection.
#[derive(Debug, Clone)]
pub struct RemoteBlockStore {
    client: Arc<RpcClient>,
}

impl RemoteBlockStore {
    /// Creates a store reading through `client`
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

#[async_trait]
impl BlockStore for RemoteBlockStore {
    async fn get(&self, cid: &ContentAddress) -> Result<Vec<u8>, StoreError> {
        debug!(%cid, "reading object");
        self.client
            .chain_read_obj(cid)
            .await
            .map_err(|err| store_error(cid, err))
    }
}

fn store_error(cid: &ContentAddress, err: RpcError) -> StoreError {
    if err.is_not_found() {
        StoreError::ObjectNotFound { cid: cid.clone() }
    } else {
        StoreError::Transport {
            message: err.to_string(),
        }
    }
}
