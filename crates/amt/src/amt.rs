//! Lazy, ordered traversal of an AMT held in a [`BlockStore`].

use crate::node::{Node, Root, MAX_BIT_WIDTH};
use crate::{AmtError, AmtResult, BlockStore};
use filplus_core::ContentAddress;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

/// A read-only view of one AMT
#[derive(Debug, Clone)]
pub struct Amt<S> {
    store: S,
    root: ContentAddress,
    bit_width: u32,
}

impl<S: BlockStore> Amt<S> {
    /// Creates a reader for the trie rooted at `root`.
    ///
    /// `bit_width` is a property of the structure being read (events use
    /// [`filplus_config::EVENT_AMT_BITWIDTH`]); a root declaring another
    /// width is rejected as corrupt.
    pub fn new(store: S, root: ContentAddress, bit_width: u32) -> AmtResult<Self> {
        if bit_width == 0 || bit_width > MAX_BIT_WIDTH {
            return Err(AmtError::InvalidBitWidth { bit_width });
        }
        Ok(Self {
            store,
            root,
            bit_width,
        })
    }

    /// Gets the root CID
    pub fn root(&self) -> &ContentAddress {
        &self.root
    }

    /// Gets the configured bit width
    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Streams `(index, value)` leaves in ascending index order.
    ///
    /// Nothing is fetched until the stream is polled. Nodes are fetched one
    /// at a time, depth first. The first error ends the stream.
    pub fn entries(&self) -> impl Stream<Item = AmtResult<(u64, Vec<u8>)>> + Send + '_ {
        let walk = Walk {
            store: &self.store,
            bit_width: self.bit_width,
            root: Some(self.root.clone()),
            stack: Vec::new(),
            expected: 0,
            yielded: 0,
        };
        stream::try_unfold(walk, Walk::step)
    }

    /// Reads every leaf, or nothing if any node is missing or corrupt
    pub async fn read_all(&self) -> AmtResult<Vec<(u64, Vec<u8>)>> {
        self.entries().try_collect().await
    }
}

enum Pending {
    Link {
        cid: ContentAddress,
        height: u64,
        offset: u64,
    },
    Leaf {
        index: u64,
        value: Vec<u8>,
    },
}

struct Walk<'a, S> {
    store: &'a S,
    bit_width: u32,
    /// Set until the root has been loaded
    root: Option<ContentAddress>,
    /// Work in reverse index order; the top is always the lowest index
    stack: Vec<Pending>,
    expected: u64,
    yielded: u64,
}

impl<'a, S: BlockStore> Walk<'a, S> {
    async fn step(mut self) -> AmtResult<Option<((u64, Vec<u8>), Self)>> {
        if let Some(cid) = self.root.take() {
            let bytes = self.store.get(&cid).await?;
            let root = Root::from_bytes(&bytes, self.bit_width)?;
            debug!(
                root = %cid,
                height = root.height,
                count = root.count,
                "loaded AMT root"
            );
            self.expected = root.count;
            self.expand(root.node, root.height, 0)?;
        }

        loop {
            match self.stack.pop() {
                None => {
                    if self.yielded != self.expected {
                        return Err(AmtError::corruption(format!(
                            "root declares {} entries but trie holds {}",
                            self.expected, self.yielded
                        )));
                    }
                    return Ok(None);
                }
                Some(Pending::Leaf { index, value }) => {
                    self.yielded += 1;
                    return Ok(Some(((index, value), self)));
                }
                Some(Pending::Link {
                    cid,
                    height,
                    offset,
                }) => {
                    debug!(node = %cid, height, offset, "fetching AMT node");
                    let bytes = self.store.get(&cid).await?;
                    let node = Node::from_bytes(&bytes, self.bit_width)?;
                    if node.is_empty() {
                        return Err(AmtError::corruption(format!("empty non-root node {cid}")));
                    }
                    self.expand(node, height, offset)?;
                }
            }
        }
    }

    /// Queues the children or leaves of `node`, which covers indices from
    /// `offset` at `height`.
    fn expand(&mut self, node: Node, height: u64, offset: u64) -> AmtResult<()> {
        let slots: Vec<usize> = node.set_slots().collect();

        if height == 0 {
            if !node.links.is_empty() {
                return Err(AmtError::corruption("leaf node holds links"));
            }
            for (slot, value) in slots.into_iter().zip(node.values).rev() {
                let index = offset
                    .checked_add(slot as u64)
                    .ok_or_else(|| AmtError::corruption("leaf index overflows u64"))?;
                self.stack.push(Pending::Leaf { index, value });
            }
            return Ok(());
        }

        if !node.values.is_empty() {
            return Err(AmtError::corruption(format!(
                "interior node at height {height} holds values"
            )));
        }
        // bit_width * height < 64 is checked when the root is decoded
        let span = 1u64 << (u64::from(self.bit_width) * height);
        for (slot, cid) in slots.into_iter().zip(node.links).rev() {
            let child_offset = (slot as u64)
                .checked_mul(span)
                .and_then(|start| offset.checked_add(start))
                .ok_or_else(|| AmtError::corruption("child index overflows u64"))?;
            self.stack.push(Pending::Link {
                cid,
                height: height - 1,
                offset: child_offset,
            });
        }
        Ok(())
    }
}
