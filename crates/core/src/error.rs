//! Error types for the core crate

use thiserror::Error;

/// Core module errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An Ethereum or Filecoin address could not be parsed
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// A content address could not be parsed
    #[error("Invalid CID: {reason}")]
    InvalidCid {
        /// Why it was rejected
        reason: String,
    },

    /// A textual or varint encoding was malformed
    #[error("Invalid encoding: {reason}")]
    InvalidEncoding {
        /// Why it was rejected
        reason: String,
    },

    /// CBOR (de)serialization failed
    #[error("CBOR error: {message}")]
    Cbor {
        /// Error message from the codec
        message: String,
    },

    /// An event record did not have the expected shape
    #[error("Invalid event: {reason}")]
    InvalidEvent {
        /// Why it was rejected
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn address(input: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidAddress {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn cid(reason: impl Into<String>) -> Self {
        CoreError::InvalidCid {
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
