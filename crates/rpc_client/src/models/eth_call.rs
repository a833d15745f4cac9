// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// eth_call.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use filplus_core::EthAddress;
use serde::{Serialize, Serializer};

/// Transaction object of `Filecoin.EthCall`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EthCallRequest {
    pub from: EthAddress,
    pub to: EthAddress,
    #[serde(serialize_with = "hex_data")]
    pub data: Vec<u8>,
}

fn hex_data<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(data)))
}
