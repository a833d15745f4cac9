//! Submitted messages and their execution receipts.

use crate::ContentAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a message the node accepted into its pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageReference(pub ContentAddress);

impl MessageReference {
    /// Gets the message CID
    pub fn cid(&self) -> &ContentAddress {
        &self.0
    }
}

impl fmt::Display for MessageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ContentAddress> for MessageReference {
    fn from(cid: ContentAddress) -> Self {
        Self(cid)
    }
}

/// Outcome of executing a message on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Zero on success
    pub exit_code: i64,
    /// Raw return bytes of the invoked method
    pub return_data: Vec<u8>,
    pub gas_used: i64,
    /// Root of the event AMT, absent when nothing was emitted
    pub events_root: Option<ContentAddress>,
}

impl Receipt {
    /// Returns true when the message executed successfully
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
