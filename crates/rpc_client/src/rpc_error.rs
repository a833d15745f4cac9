// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// rpc_error.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Errors raised while talking to a Lotus node.

use thiserror::Error;

/// JSON-RPC internal error code, used for failures raised on this side
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC parse error code
pub const PARSE_ERROR: i32 = -32700;

/// Lotus RPC errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The request never produced a response
    #[error("HTTP error: {message}")]
    Transport { message: String },

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// The node answered, but not with what the method promises
    #[error("Invalid response to {method}: {reason}")]
    InvalidResponse { method: String, reason: String },
}

impl RpcError {
    /// Creates a new RPC error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        RpcError::Rpc {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        RpcError::Transport {
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid(method: &str, reason: impl Into<String>) -> Self {
        RpcError::InvalidResponse {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true when the node reported that it cannot resolve a block.
    ///
    /// Lotus does not use a dedicated error code for this; the blockstore
    /// error text is the only signal.
    pub fn is_not_found(&self) -> bool {
        match self {
            RpcError::Rpc { message, .. } => {
                let message = message.to_lowercase();
                message.contains("not found") || message.contains("could not find")
            }
            _ => false,
        }
    }
}

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;
