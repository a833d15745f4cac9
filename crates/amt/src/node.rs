//! AMT node encoding (go-amt-ipld v4 layout).
//!
//! root: `[bit_width, height, count, node]`
//! node: `[bitmap, [link...], [value...]]`

use crate::{AmtError, AmtResult};
use filplus_core::cbor::{self, Value};
use filplus_core::ContentAddress;

/// Widest node supported by the reader.
pub const MAX_BIT_WIDTH: u32 = 16;

/// Largest height such that `bit_width * height < 64`.
pub(crate) fn max_height(bit_width: u32) -> u64 {
    63 / u64::from(bit_width.max(1))
}

/// Number of bytes in the bitmap of a node with `2^bit_width` slots
pub fn bitmap_len(bit_width: u32) -> usize {
    ((1usize << bit_width) + 7) / 8
}

/// One trie node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Slot `i` is set when bit `i % 8` of byte `i / 8` is set
    pub bitmap: Vec<u8>,
    /// Children of an interior node, one per set slot
    pub links: Vec<ContentAddress>,
    /// Encoded leaf values, one per set slot
    pub values: Vec<Vec<u8>>,
}

impl Node {
    /// Decodes and validates a node against the trie's bit width
    pub fn from_value(value: &Value, bit_width: u32) -> AmtResult<Self> {
        let fields = cbor::as_array(value, "node").map_err(corrupt)?;
        let [bitmap, links, values] = fields else {
            return Err(AmtError::corruption(format!(
                "node has {} fields, expected 3",
                fields.len()
            )));
        };

        let bitmap = cbor::as_bytes(bitmap, "node bitmap").map_err(corrupt)?.to_vec();
        let expected = bitmap_len(bit_width);
        if bitmap.len() != expected {
            return Err(AmtError::corruption(format!(
                "bitmap is {} bytes, expected {expected}",
                bitmap.len()
            )));
        }
        let slots = 1usize << bit_width;
        if (slots..expected * 8).any(|slot| is_set(&bitmap, slot)) {
            return Err(AmtError::corruption("bitmap has bits beyond the node width"));
        }

        let links = cbor::as_array(links, "node links")
            .map_err(corrupt)?
            .iter()
            .map(|link| cbor::as_link(link, "node link").map_err(corrupt))
            .collect::<AmtResult<Vec<_>>>()?;
        let values = cbor::as_array(values, "node values")
            .map_err(corrupt)?
            .iter()
            .map(|value| cbor::encode(value).map_err(corrupt))
            .collect::<AmtResult<Vec<_>>>()?;

        if !links.is_empty() && !values.is_empty() {
            return Err(AmtError::corruption("node has both links and values"));
        }
        let population = bitmap.iter().map(|b| b.count_ones() as usize).sum::<usize>();
        if population != links.len() + values.len() {
            return Err(AmtError::corruption(format!(
                "bitmap has {population} set slots but node holds {} entries",
                links.len() + values.len()
            )));
        }

        Ok(Self {
            bitmap,
            links,
            values,
        })
    }

    /// Decodes a non-root node block
    pub fn from_bytes(bytes: &[u8], bit_width: u32) -> AmtResult<Self> {
        let value = cbor::decode(bytes).map_err(corrupt)?;
        Self::from_value(&value, bit_width)
    }

    /// Returns true if no slot is populated
    pub fn is_empty(&self) -> bool {
        self.bitmap.iter().all(|b| *b == 0)
    }

    /// Populated slots in ascending order
    pub fn set_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.bitmap.len() * 8).filter(|slot| is_set(&self.bitmap, *slot))
    }

    /// Encodes the node as a CBOR item
    pub fn to_value(&self) -> AmtResult<Value> {
        let values = self
            .values
            .iter()
            .map(|v| cbor::decode(v).map_err(corrupt))
            .collect::<AmtResult<Vec<_>>>()?;
        Ok(Value::Array(vec![
            Value::Bytes(self.bitmap.clone()),
            Value::Array(self.links.iter().map(cbor::link_value).collect()),
            Value::Array(values),
        ]))
    }

    /// Encodes the node as a standalone block
    pub fn to_bytes(&self) -> AmtResult<Vec<u8>> {
        cbor::encode(&self.to_value()?).map_err(corrupt)
    }
}

fn is_set(bitmap: &[u8], slot: usize) -> bool {
    bitmap[slot / 8] & (1 << (slot % 8)) != 0
}

/// The root block: trie parameters plus the top node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub bit_width: u32,
    pub height: u64,
    /// Number of leaves in the whole trie
    pub count: u64,
    pub node: Node,
}

impl Root {
    /// Decodes a root block, rejecting a bit width other than `bit_width`
    pub fn from_bytes(bytes: &[u8], bit_width: u32) -> AmtResult<Self> {
        let value = cbor::decode(bytes).map_err(corrupt)?;
        let fields = cbor::as_array(&value, "root").map_err(corrupt)?;
        let [width, height, count, node] = fields else {
            return Err(AmtError::corruption(format!(
                "root has {} fields, expected 4",
                fields.len()
            )));
        };

        let width = cbor::as_u64(width, "root bit width").map_err(corrupt)?;
        if width != bit_width as u64 {
            return Err(AmtError::corruption(format!(
                "root declares bit width {width}, expected {bit_width}"
            )));
        }
        let height = cbor::as_u64(height, "root height").map_err(corrupt)?;
        if height > max_height(bit_width) {
            return Err(AmtError::corruption(format!(
                "height {height} overflows the index space at bit width {bit_width}"
            )));
        }
        let count = cbor::as_u64(count, "root count").map_err(corrupt)?;
        let node = Node::from_value(node, bit_width)?;

        Ok(Self {
            bit_width,
            height,
            count,
            node,
        })
    }

    /// Encodes the root block
    pub fn to_bytes(&self) -> AmtResult<Vec<u8>> {
        let value = Value::Array(vec![
            Value::Integer(u64::from(self.bit_width).into()),
            Value::Integer(self.height.into()),
            Value::Integer(self.count.into()),
            self.node.to_value()?,
        ]);
        cbor::encode(&value).map_err(corrupt)
    }
}

fn corrupt(err: filplus_core::CoreError) -> AmtError {
    AmtError::corruption(err.to_string())
}
