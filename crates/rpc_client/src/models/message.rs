// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// message.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::base64_bytes;
use filplus_core::{ContentAddress, FilAddress, Receipt};
use serde::{Deserialize, Serialize};

/// Unsigned Filecoin message as accepted by `Filecoin.MpoolPushMessage`.
///
/// Zero gas fields ask the node to estimate them; a zero nonce is
/// replaced by the sender's next nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    pub version: u64,
    pub to: FilAddress,
    pub from: FilAddress,
    pub nonce: u64,
    /// Attached FIL in attoFIL, as a decimal string
    pub value: String,
    pub gas_limit: i64,
    pub gas_fee_cap: String,
    pub gas_premium: String,
    pub method: u64,
    #[serde(with = "base64_bytes")]
    pub params: Vec<u8>,
}

impl Message {
    /// Creates a message calling `method` on `to` with zero value and
    /// node-estimated gas
    pub fn new(from: FilAddress, to: FilAddress, method: u64, params: Vec<u8>) -> Self {
        Self {
            version: 0,
            to,
            from,
            nonce: 0,
            value: "0".to_string(),
            gas_limit: 0,
            gas_fee_cap: "0".to_string(),
            gas_premium: "0".to_string(),
            method,
            params,
        }
    }
}

/// Message signed and pooled by the node
#[derive(Debug, Clone, Deserialize)]
pub struct SignedMessage {
    #[serde(rename = "Message")]
    pub message: Message,
    #[serde(rename = "CID")]
    pub cid: ContentAddress,
}

/// Receipt as serialized by Lotus
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiptJson {
    pub exit_code: i64,
    #[serde(rename = "Return", default, with = "base64_bytes")]
    pub return_data: Vec<u8>,
    pub gas_used: i64,
    #[serde(default)]
    pub events_root: Option<ContentAddress>,
}

impl From<ReceiptJson> for Receipt {
    fn from(receipt: ReceiptJson) -> Self {
        Receipt {
            exit_code: receipt.exit_code,
            return_data: receipt.return_data,
            gas_used: receipt.gas_used,
            events_root: receipt.events_root,
        }
    }
}

/// Result of `Filecoin.StateWaitMsg`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MsgLookup {
    /// CID of the executed message; differs from the submitted one when
    /// the message was replaced
    pub message: ContentAddress,
    pub receipt: ReceiptJson,
    #[serde(default)]
    pub height: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use filplus_config::Network;
    use serde_json::json;

    const CID: &str = "bafy2bzaceacu3yonapahihxmnhzuvk76yupwjmyeymd2l5n6xfs5st52shm6a";

    #[test]
    fn test_message_json() {
        let message = Message::new(
            FilAddress::new_id(Network::Mainnet, 100),
            FilAddress::new_id(Network::Mainnet, 1234),
            3_844_450_837,
            vec![0x44, 1, 2, 3, 4],
        );
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "Version": 0,
                "To": "f01234",
                "From": "f0100",
                "Nonce": 0,
                "Value": "0",
                "GasLimit": 0,
                "GasFeeCap": "0",
                "GasPremium": "0",
                "Method": 3844450837u64,
                "Params": "RAECAwQ="
            })
        );
    }

    #[test]
    fn test_msg_lookup_json() {
        let lookup: MsgLookup = serde_json::from_value(json!({
            "Message": {"/": CID},
            "Receipt": {
                "ExitCode": 0,
                "Return": "QA==",
                "GasUsed": 1234567,
                "EventsRoot": {"/": CID}
            },
            "ReturnDec": null,
            "TipSet": [],
            "Height": 42
        }))
        .unwrap();

        let receipt = Receipt::from(lookup.receipt);
        assert!(receipt.is_success());
        assert_eq!(receipt.return_data, vec![0x40]);
        assert_eq!(receipt.events_root.unwrap().to_string(), CID);
        assert_eq!(lookup.height, 42);
    }

    #[test]
    fn test_receipt_null_fields() {
        let receipt: ReceiptJson = serde_json::from_value(json!({
            "ExitCode": 33,
            "Return": null,
            "GasUsed": 0,
            "EventsRoot": null
        }))
        .unwrap();
        assert_eq!(receipt.exit_code, 33);
        assert!(receipt.return_data.is_empty());
        assert!(receipt.events_root.is_none());
    }
}
