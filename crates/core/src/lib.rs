//! Filecoin Plus Core
//!
//! Value types shared by the ABI codec, the AMT reader and the call
//! orchestrator: Ethereum and Filecoin addresses, content addresses,
//! message receipts and event records.

pub mod base32;
pub mod cbor;
pub mod cid;
pub mod error;
pub mod eth_address;
pub mod event;
pub mod fil_address;
pub mod message;
pub mod varint;

pub use cid::ContentAddress;
pub use error::{CoreError, CoreResult};
pub use eth_address::EthAddress;
pub use event::{DecodedEntry, DecodedEvent, EventEntry, EventRecord};
pub use fil_address::{FilAddress, Payload};
pub use message::{MessageReference, Receipt};

pub use filplus_config::Network;
