//! AMT Reader Tests
//!
//! Tries are assembled block by block here, the way a node would serve them,
//! and read back through the public API.

use async_trait::async_trait;
use filplus_amt::*;
use filplus_core::cbor::{self, Value};
use filplus_core::ContentAddress;
use futures::StreamExt;
use std::collections::HashMap;

/// Fixed set of blocks keyed by CID
#[derive(Default)]
struct FixtureStore {
    blocks: HashMap<ContentAddress, Vec<u8>>,
}

impl FixtureStore {
    fn add(&mut self, value: Value) -> ContentAddress {
        let bytes = cbor::encode(&value).unwrap();
        let cid = ContentAddress::for_dag_cbor(&bytes);
        self.blocks.insert(cid.clone(), bytes);
        cid
    }
}

#[async_trait]
impl BlockStore for FixtureStore {
    async fn get(&self, cid: &ContentAddress) -> Result<Vec<u8>, StoreError> {
        self.blocks
            .get(cid)
            .cloned()
            .ok_or_else(|| StoreError::ObjectNotFound { cid: cid.clone() })
    }
}

fn int(n: u64) -> Value {
    Value::Integer(n.into())
}

fn node(bitmap: Vec<u8>, links: Vec<Value>, values: Vec<Value>) -> Value {
    Value::Array(vec![Value::Bytes(bitmap), Value::Array(links), Value::Array(values)])
}

fn root(bit_width: u64, height: u64, count: u64, node: Value) -> Value {
    Value::Array(vec![int(bit_width), int(height), int(count), node])
}

#[cfg(test)]
mod amt_tests {
    use super::*;

    /// Leaves at 0, 3 and 7 in one node come back in index order
    #[tokio::test]
    async fn test_single_node_order() {
        let mut store = FixtureStore::default();
        let cid = store.add(root(
            5,
            0,
            3,
            node(
                vec![0b1000_1001, 0, 0, 0],
                vec![],
                vec![Value::Text("a".into()), Value::Text("b".into()), Value::Text("c".into())],
            ),
        ));

        let amt = Amt::new(&store, cid, 5).unwrap();
        let entries = amt.read_all().await.unwrap();
        let indices: Vec<u64> = entries.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 3, 7]);
        assert_eq!(entries[2].1, cbor::encode(&Value::Text("c".into())).unwrap());
    }

    /// Slot offsets of the children are scaled by the node width
    #[tokio::test]
    async fn test_two_level_indices() {
        let mut store = FixtureStore::default();
        // bit width 2: four slots per node, each child of the root covers 4 indices
        let first = store.add(node(vec![0b0010], vec![], vec![int(1)]));
        let last = store.add(node(vec![0b1000], vec![], vec![int(15)]));
        let cid = store.add(root(
            2,
            1,
            2,
            node(
                vec![0b1001],
                vec![cbor::link_value(&first), cbor::link_value(&last)],
                vec![],
            ),
        ));

        let amt = Amt::new(&store, cid, 2).unwrap();
        let indices: Vec<u64> = amt
            .entries()
            .map(|entry| entry.unwrap().0)
            .collect()
            .await;
        assert_eq!(indices, vec![1, 15]);
    }

    /// A root written with another width is refused, not reinterpreted
    #[tokio::test]
    async fn test_configured_width_is_enforced() {
        let mut store = FixtureStore::default();
        let cid = store.add(root(3, 0, 0, node(vec![0], vec![], vec![])));

        let amt = Amt::new(&store, cid, 5).unwrap();
        let err = amt.read_all().await.unwrap_err();
        assert!(matches!(err, AmtError::Corruption { .. }));
    }

    /// Height beyond the u64 index space is corruption
    #[tokio::test]
    async fn test_height_overflow() {
        let mut store = FixtureStore::default();
        let cid = store.add(root(5, 13, 0, node(vec![0; 4], vec![], vec![])));

        let amt = Amt::new(&store, cid, 5).unwrap();
        assert!(matches!(
            amt.read_all().await.unwrap_err(),
            AmtError::Corruption { .. }
        ));
    }

    /// A missing root surfaces as the store's error
    #[tokio::test]
    async fn test_missing_root() {
        let store = FixtureStore::default();
        let cid = ContentAddress::for_dag_cbor(b"absent");

        let amt = Amt::new(&store, cid.clone(), 5).unwrap();
        assert_eq!(
            amt.read_all().await.unwrap_err(),
            AmtError::Store(StoreError::ObjectNotFound { cid })
        );
    }

    /// Garbage in place of a node is corruption
    #[tokio::test]
    async fn test_undecodable_root() {
        let mut store = FixtureStore::default();
        let cid = ContentAddress::for_dag_cbor(b"\xff\xff");
        store.blocks.insert(cid.clone(), vec![0xff, 0xff]);

        let amt = Amt::new(&store, cid, 5).unwrap();
        assert!(matches!(
            amt.read_all().await.unwrap_err(),
            AmtError::Corruption { .. }
        ));
    }
}
