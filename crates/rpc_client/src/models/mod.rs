// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// mod.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! RPC Models
//!
//! Request and response shapes of the Lotus JSON-RPC methods used by the
//! client. Field names follow the Go JSON encoding Lotus emits.

mod eth_call;
mod message;
mod rpc_request;

pub use eth_call::EthCallRequest;
pub use message::{Message, MsgLookup, ReceiptJson, SignedMessage};
pub use rpc_request::{JsonRpcError, RpcRequest, RpcResponse};

/// Base64 (standard alphabet) representation of Go `[]byte` fields,
/// where a nil slice is `null`
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => general_purpose::STANDARD
                .decode(text)
                .map_err(D::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
