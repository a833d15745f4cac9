//! Filecoin Plus AMT
//!
//! Reader for Array Mapped Tries (go-amt-ipld v4), the structure Filecoin
//! uses for the list of events emitted by a message. Nodes are fetched
//! through the read-only [`BlockStore`] interface.

pub mod amt;
pub mod error;
pub mod node;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use amt::Amt;
pub use error::{AmtError, AmtResult, StoreError};
pub use node::{Node, Root, MAX_BIT_WIDTH};
pub use store::BlockStore;
