//! In-memory block store and AMT builder for tests.

use crate::node::{bitmap_len, Node, Root};
use crate::{AmtResult, BlockStore, StoreError};
use async_trait::async_trait;
use filplus_core::ContentAddress;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// In-memory storage implementation for testing
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: Mutex<HashMap<ContentAddress, Vec<u8>>>,
    gets: AtomicUsize,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a DAG-CBOR block under its blake2b-256 CID
    pub fn put(&self, bytes: Vec<u8>) -> ContentAddress {
        let cid = ContentAddress::for_dag_cbor(&bytes);
        self.insert(cid.clone(), bytes);
        cid
    }

    /// Stores arbitrary bytes under an arbitrary CID
    pub fn insert(&self, cid: ContentAddress, bytes: Vec<u8>) {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cid, bytes);
    }

    pub fn remove(&self, cid: &ContentAddress) -> Option<Vec<u8>> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(cid)
    }

    /// Number of `get` calls served so far, including misses
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn get(&self, cid: &ContentAddress) -> Result<Vec<u8>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cid)
            .cloned()
            .ok_or_else(|| StoreError::ObjectNotFound { cid: cid.clone() })
    }
}

/// Builds an AMT of minimal height from sparse `(index, value)` pairs.
///
/// Values must be encoded CBOR items.
#[derive(Debug, Clone)]
pub struct AmtBuilder {
    bit_width: u32,
    values: BTreeMap<u64, Vec<u8>>,
}

impl AmtBuilder {
    pub fn new(bit_width: u32) -> Self {
        Self {
            bit_width,
            values: BTreeMap::new(),
        }
    }

    /// Sets the value at `index`
    pub fn with_value(mut self, index: u64, value: Vec<u8>) -> Self {
        self.values.insert(index, value);
        self
    }

    /// Writes every node to `store` and returns the root CID
    pub fn build(&self, store: &MemoryBlockStore) -> AmtResult<ContentAddress> {
        let entries: Vec<(u64, Vec<u8>)> = self
            .values
            .iter()
            .map(|(index, value)| (*index, value.clone()))
            .collect();

        let max_index = entries.last().map(|(index, _)| *index).unwrap_or(0);
        let mut height = 0u64;
        while let Some(capacity) = capacity(self.bit_width, height) {
            if max_index < capacity {
                break;
            }
            height += 1;
        }

        let node = self.build_node(store, &entries, height, 0)?;
        let root = Root {
            bit_width: self.bit_width,
            height,
            count: entries.len() as u64,
            node,
        };
        Ok(store.put(root.to_bytes()?))
    }

    fn build_node(
        &self,
        store: &MemoryBlockStore,
        entries: &[(u64, Vec<u8>)],
        height: u64,
        offset: u64,
    ) -> AmtResult<Node> {
        let mut node = Node {
            bitmap: vec![0; bitmap_len(self.bit_width)],
            links: Vec::new(),
            values: Vec::new(),
        };

        if height == 0 {
            for (index, value) in entries {
                set_bit(&mut node.bitmap, (index - offset) as usize);
                node.values.push(value.clone());
            }
            return Ok(node);
        }

        let span = 1u64 << (u64::from(self.bit_width) * height);
        let mut rest = entries;
        while let Some((first, _)) = rest.first() {
            let slot = (first - offset) / span;
            let child_offset = offset + slot * span;
            let split = rest
                .iter()
                .position(|(index, _)| *index >= child_offset + span)
                .unwrap_or(rest.len());
            let (group, tail) = rest.split_at(split);

            let child = self.build_node(store, group, height - 1, child_offset)?;
            node.links.push(store.put(child.to_bytes()?));
            set_bit(&mut node.bitmap, slot as usize);
            rest = tail;
        }
        Ok(node)
    }
}

/// Number of indices addressable by a trie of `height`, or None past u64.
fn capacity(bit_width: u32, height: u64) -> Option<u64> {
    let bits = u64::from(bit_width).checked_mul(height + 1)?;
    1u64.checked_shl(u32::try_from(bits).ok()?)
        .filter(|_| bits < 64)
}

fn set_bit(bitmap: &mut [u8], slot: usize) {
    bitmap[slot / 8] |= 1 << (slot % 8);
}
