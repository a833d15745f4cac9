// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// rpc_client.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::models::{EthCallRequest, Message, MsgLookup, RpcRequest, RpcResponse, SignedMessage};
use crate::rpc_error::{RpcError, RpcResult, INTERNAL_ERROR, PARSE_ERROR};
use base64::{engine::general_purpose, Engine as _};
use filplus_config::{ClientConfig, LOOKBACK_NO_LIMIT};
use filplus_core::{ContentAddress, EthAddress, FilAddress};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use url::Url;

/// The RPC client to call Lotus full node methods
#[derive(Debug)]
pub struct RpcClient {
    base_address: Url,
    http_client: Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Creates a new RPC client, sending `token` as a bearer token when given
    pub fn new(url: Url, token: Option<String>) -> RpcResult<Self> {
        let mut builder = Client::builder();

        if let Some(token) = token {
            let mut headers = HeaderMap::new();
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| RpcError::new(INTERNAL_ERROR, format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        Ok(Self::with_client(
            builder.build().map_err(RpcError::transport)?,
            url,
        ))
    }

    /// Creates an RPC client from loaded configuration
    pub fn from_config(config: &ClientConfig) -> RpcResult<Self> {
        Self::new(config.endpoint.clone(), config.token.clone())
    }

    /// Creates a new RPC client with an existing HTTP client
    pub fn with_client(client: Client, url: Url) -> Self {
        Self {
            base_address: url,
            http_client: client,
            next_id: AtomicU64::new(1),
        }
    }

    /// Gets the endpoint URL
    pub fn url(&self) -> &Url {
        &self.base_address
    }

    fn as_rpc_request(&self, method: &str, params: Vec<Value>) -> RpcRequest {
        RpcRequest::new(self.next_id.fetch_add(1, Ordering::Relaxed), method, params)
    }

    fn as_rpc_response(content: &str, throw_on_error: bool) -> RpcResult<RpcResponse> {
        let response: RpcResponse = serde_json::from_str(content)
            .map_err(|e| RpcError::new(PARSE_ERROR, format!("Parse error: {e}")))?;

        if let Some(error) = &response.error {
            if throw_on_error {
                return Err(RpcError::new(error.code, error.message.clone()));
            }
        }

        Ok(response)
    }

    /// Sends an asynchronous RPC request
    pub async fn send_async(
        &self,
        request: RpcRequest,
        throw_on_error: bool,
    ) -> RpcResult<RpcResponse> {
        debug!(method = %request.method, id = request.id, "sending RPC request");

        let response = self
            .http_client
            .post(self.base_address.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(RpcError::transport)?;

        let status = response.status();
        let content = response
            .text()
            .await
            .map_err(|e| RpcError::transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() && content.trim().is_empty() {
            return Err(RpcError::transport(format!("HTTP status {status}")));
        }

        Self::as_rpc_response(&content, throw_on_error)
    }

    /// Sends an async RPC request and returns the result
    pub async fn rpc_send_async(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        let request = self.as_rpc_request(method, params);
        let response = self.send_async(request, true).await?;
        response
            .result
            .ok_or_else(|| RpcError::new(INTERNAL_ERROR, "No result returned"))
    }

    async fn rpc_call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> RpcResult<T> {
        let result = self.rpc_send_async(method, params).await?;
        serde_json::from_value(result).map_err(|e| RpcError::invalid(method, e.to_string()))
    }

    // Mpool methods

    /// Signs `message` with the sender's wallet key, fills in nonce and gas,
    /// and adds it to the node's message pool
    pub async fn mpool_push_message(&self, message: &Message) -> RpcResult<SignedMessage> {
        let message = serde_json::to_value(message)
            .map_err(|e| RpcError::new(INTERNAL_ERROR, format!("Failed to serialize message: {e}")))?;
        self.rpc_call("Filecoin.MpoolPushMessage", vec![message, Value::Null])
            .await
    }

    // State methods

    /// Blocks until the message is on chain with `confidence` epochs on top
    pub async fn state_wait_msg(&self, cid: &ContentAddress, confidence: u64) -> RpcResult<MsgLookup> {
        self.rpc_call(
            "Filecoin.StateWaitMsg",
            vec![json!(cid), json!(confidence), json!(LOOKBACK_NO_LIMIT), json!(true)],
        )
        .await
    }

    // Chain methods

    /// Reads the raw bytes of an IPLD block
    pub async fn chain_read_obj(&self, cid: &ContentAddress) -> RpcResult<Vec<u8>> {
        const METHOD: &str = "Filecoin.ChainReadObj";
        let encoded: String = self.rpc_call(METHOD, vec![json!(cid)]).await?;
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| RpcError::invalid(METHOD, format!("invalid base64: {e}")))
    }

    // Eth methods

    /// Executes a read-only contract call against the latest state
    pub async fn eth_call(&self, call: &EthCallRequest) -> RpcResult<Vec<u8>> {
        const METHOD: &str = "Filecoin.EthCall";
        let call = serde_json::to_value(call)
            .map_err(|e| RpcError::new(INTERNAL_ERROR, format!("Failed to serialize call: {e}")))?;
        let encoded: String = self.rpc_call(METHOD, vec![call, json!("latest")]).await?;
        let digits = encoded
            .strip_prefix("0x")
            .ok_or_else(|| RpcError::invalid(METHOD, "missing 0x prefix"))?;
        hex::decode(digits).map_err(|e| RpcError::invalid(METHOD, format!("invalid hex: {e}")))
    }

    /// Convenience wrapper around [`RpcClient::eth_call`]
    pub async fn eth_call_to(&self, from: EthAddress, to: EthAddress, data: Vec<u8>) -> RpcResult<Vec<u8>> {
        self.eth_call(&EthCallRequest { from, to, data }).await
    }

    // Wallet methods

    /// Gets the node wallet's default address
    pub async fn wallet_default_address(&self) -> RpcResult<FilAddress> {
        self.rpc_call("Filecoin.WalletDefaultAddress", vec![]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_increase() {
        let client = RpcClient::new(Url::parse("http://127.0.0.1:1234/rpc/v1").unwrap(), None).unwrap();
        let first = client.as_rpc_request("Filecoin.Version", vec![]);
        let second = client.as_rpc_request("Filecoin.Version", vec![]);
        assert_eq!(first.id + 1, second.id);
        assert_eq!(first.json_rpc, "2.0");
    }

    #[test]
    fn test_error_response_is_raised() {
        let content = r#"{"jsonrpc":"2.0","id":1,"error":{"code":1,"message":"boom"}}"#;
        assert_eq!(
            RpcClient::as_rpc_response(content, true).unwrap_err(),
            RpcError::new(1, "boom")
        );
        assert!(RpcClient::as_rpc_response(content, false).is_ok());
    }

    #[test]
    fn test_garbage_response() {
        let err = RpcClient::as_rpc_response("<html>", true).unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: PARSE_ERROR, .. }));
    }

    #[test]
    fn test_rejects_unprintable_token() {
        let url = Url::parse("http://127.0.0.1:1234/rpc/v1").unwrap();
        assert!(RpcClient::new(url, Some("bad\ntoken".to_string())).is_err());
    }
}
