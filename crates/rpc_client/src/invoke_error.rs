// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// invoke_error.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Errors surfaced by the call orchestrator.

use crate::rpc_error::RpcError;
use filplus_abi::AbiError;
use filplus_amt::{AmtError, StoreError};
use filplus_core::{ContentAddress, MessageReference};
use std::time::Duration;
use thiserror::Error;

/// Contract invocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// Signature, argument, return data or framing error
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// The node refused to pool the message
    #[error("Submission rejected: {reason}")]
    SubmissionRejected { reason: String },

    /// The node could not be reached, or answered outside the protocol
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A read-only call was refused or reverted by the node
    #[error("Call failed: {reason}")]
    CallFailed { reason: String },

    /// An event trie node is missing from the node's store
    #[error("Object not found: {cid}")]
    ObjectNotFound { cid: ContentAddress },

    /// The event trie or one of its records is malformed
    #[error("Trie corruption: {reason}")]
    TrieCorruption { reason: String },

    /// The message executed with a non-zero exit code
    #[error("Actor execution failed with exit code {exit_code}")]
    ExecutionFailed { exit_code: i64 },

    /// No receipt arrived within the configured timeout; the message may
    /// still execute
    #[error("No receipt for {message} after {timeout:?}")]
    FinalityTimeout {
        message: MessageReference,
        timeout: Duration,
    },
}

impl InvokeError {
    pub(crate) fn corruption(reason: impl Into<String>) -> Self {
        InvokeError::TrieCorruption {
            reason: reason.into(),
        }
    }

    /// Maps a failed `MpoolPushMessage`
    pub(crate) fn from_submission(err: RpcError) -> Self {
        match err {
            RpcError::Rpc { message, .. } => InvokeError::SubmissionRejected { reason: message },
            other => other.into(),
        }
    }

    /// Maps a failed `EthCall`
    pub(crate) fn from_call(err: RpcError) -> Self {
        match err {
            RpcError::Rpc { message, .. } => InvokeError::CallFailed { reason: message },
            other => other.into(),
        }
    }
}

impl From<RpcError> for InvokeError {
    fn from(err: RpcError) -> Self {
        InvokeError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for InvokeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ObjectNotFound { cid } => InvokeError::ObjectNotFound { cid },
            StoreError::Transport { message } => InvokeError::Transport { message },
        }
    }
}

impl From<AmtError> for InvokeError {
    fn from(err: AmtError) -> Self {
        match err {
            AmtError::Store(err) => err.into(),
            AmtError::Corruption { reason } => InvokeError::TrieCorruption { reason },
            other @ AmtError::InvalidBitWidth { .. } => InvokeError::corruption(other.to_string()),
        }
    }
}

/// Result type for contract invocations
pub type InvokeResult<T> = Result<T, InvokeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_mapping() {
        assert_eq!(
            InvokeError::from_submission(RpcError::new(1, "not enough funds")),
            InvokeError::SubmissionRejected {
                reason: "not enough funds".to_string()
            }
        );
        assert!(matches!(
            InvokeError::from_submission(RpcError::transport("connection refused")),
            InvokeError::Transport { .. }
        ));
    }

    #[test]
    fn test_store_errors_keep_their_kind() {
        let cid = ContentAddress::for_dag_cbor(b"node");
        let err: InvokeError = AmtError::Store(StoreError::ObjectNotFound { cid: cid.clone() }).into();
        assert_eq!(err, InvokeError::ObjectNotFound { cid });

        let err: InvokeError = AmtError::Corruption {
            reason: "popcount".to_string(),
        }
        .into();
        assert!(matches!(err, InvokeError::TrieCorruption { .. }));
    }
}
