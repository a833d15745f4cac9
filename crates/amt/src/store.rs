//! Read-only access to content-addressed blocks.

use crate::StoreError;
use async_trait::async_trait;
use filplus_core::ContentAddress;
use std::sync::Arc;

/// A content-addressed block source.
///
/// Read-only: implementations are views over finalized chain state. Every
/// `get` goes to the backing source and nothing is cached between calls.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Fetches the raw bytes of the block identified by `cid`
    async fn get(&self, cid: &ContentAddress) -> Result<Vec<u8>, StoreError>;
}

#[async_trait]
impl<S: BlockStore + ?Sized> BlockStore for &S {
    async fn get(&self, cid: &ContentAddress) -> Result<Vec<u8>, StoreError> {
        (**self).get(cid).await
    }
}

#[async_trait]
impl<S: BlockStore + ?Sized> BlockStore for Arc<S> {
    async fn get(&self, cid: &ContentAddress) -> Result<Vec<u8>, StoreError> {
        (**self).get(cid).await
    }
}
