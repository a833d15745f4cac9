//! Error types for the AMT reader

use filplus_core::ContentAddress;
use thiserror::Error;

/// Block store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The node does not hold the requested object
    #[error("Object not found: {cid}")]
    ObjectNotFound { cid: ContentAddress },

    /// Connectivity or protocol failure reaching the store
    #[error("Store transport error: {message}")]
    Transport { message: String },
}

/// AMT traversal errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmtError {
    /// Fetching a node failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The reader was configured with an unsupported bit width
    #[error("Unsupported AMT bit width {bit_width}")]
    InvalidBitWidth { bit_width: u32 },

    /// A node is malformed or inconsistent with the trie's shape
    #[error("Trie corruption: {reason}")]
    Corruption { reason: String },
}

impl AmtError {
    pub(crate) fn corruption(reason: impl Into<String>) -> Self {
        AmtError::Corruption {
            reason: reason.into(),
        }
    }
}

/// Result type for AMT operations
pub type AmtResult<T> = Result<T, AmtError>;
