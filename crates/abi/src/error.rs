//! Error types for the ABI codec

use thiserror::Error;

/// ABI codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// A function signature string is malformed
    #[error("Invalid signature '{signature}' at position {position}: {reason}")]
    SignatureParse {
        signature: String,
        position: usize,
        reason: String,
    },

    /// An argument does not fit the declared parameter type
    #[error("Argument {index} does not match {expected}: {reason}")]
    ArgumentTypeMismatch {
        /// Zero-based parameter index
        index: usize,
        /// Canonical name of the declared type
        expected: String,
        reason: String,
    },

    /// Wrong number of arguments
    #[error("Expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Encoded data ends before the layout is complete
    #[error("Truncated data at offset {offset}: need {needed} bytes, {available} available")]
    DecodeTruncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Encoded data disagrees with the expected type
    #[error("Cannot decode {expected}: {reason}")]
    DecodeTypeMismatch { expected: String, reason: String },

    /// Self-describing byte framing is malformed
    #[error("Framing error: {reason}")]
    Framing { reason: String },
}

impl AbiError {
    pub(crate) fn mismatch(index: usize, expected: impl ToString, reason: impl Into<String>) -> Self {
        AbiError::ArgumentTypeMismatch {
            index,
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode_mismatch(expected: impl ToString, reason: impl Into<String>) -> Self {
        AbiError::DecodeTypeMismatch {
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn framing(reason: impl Into<String>) -> Self {
        AbiError::Framing {
            reason: reason.into(),
        }
    }
}

/// Result type for ABI operations
pub type AbiResult<T> = Result<T, AbiError>;
