// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// contract_client.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::block_store::RemoteBlockStore;
use crate::gateway::MessageGateway;
use crate::invoke_error::{InvokeError, InvokeResult};
use crate::pending_call::{CallState, PendingCall};
use crate::rpc_client::RpcClient;
use crate::rpc_error::RpcResult;
use filplus_abi::{unwrap_bytes, AbiError, AbiValue, MethodDescriptor};
use filplus_amt::{Amt, BlockStore};
use filplus_config::{ClientConfig, DEFAULT_MESSAGE_CONFIDENCE, EVENT_AMT_BITWIDTH};
use filplus_core::{
    ContentAddress, DecodedEntry, DecodedEvent, EthAddress, EventRecord, FilAddress,
    MessageReference, Receipt,
};
use futures::TryStreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a successful write call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub message: MessageReference,
    pub receipt: Receipt,
    /// Decoded return data; empty when the method declares no outputs
    pub return_values: Vec<AbiValue>,
    /// Emitted events in emission order
    pub events: Vec<DecodedEvent>,
}

/// Contract client to call FEVM contract methods through a Lotus node.
///
/// Each write call is a fixed pipeline: encode, submit, wait, then decode.
/// Write calls from one sender must not be issued concurrently, since the
/// node assigns nonces in submission order.
#[derive(Debug, Clone)]
pub struct ContractClient<G, S> {
    gateway: G,
    store: S,
    confidence: u64,
    finality_timeout: Option<Duration>,
    event_bit_width: u32,
}

impl ContractClient<Arc<RpcClient>, RemoteBlockStore> {
    /// Creates a client that submits and reads through one RPC connection
    pub fn from_rpc(client: Arc<RpcClient>) -> Self {
        let store = RemoteBlockStore::new(client.clone());
        Self::new(client, store)
    }

    /// Creates a client from loaded configuration
    pub fn from_config(config: &ClientConfig) -> RpcResult<Self> {
        let client = Arc::new(RpcClient::from_config(config)?);
        let mut contract_client = Self::from_rpc(client).with_confidence(config.confidence);
        if let Some(timeout) = config.finality_timeout() {
            contract_client = contract_client.with_finality_timeout(timeout);
        }
        Ok(contract_client)
    }
}

impl<G: MessageGateway, S: BlockStore> ContractClient<G, S> {
    /// Creates a new contract client
    pub fn new(gateway: G, store: S) -> Self {
        Self {
            gateway,
            store,
            confidence: DEFAULT_MESSAGE_CONFIDENCE,
            finality_timeout: None,
            event_bit_width: EVENT_AMT_BITWIDTH,
        }
    }

    /// Sets the number of epochs a message must be buried under
    pub fn with_confidence(mut self, confidence: u64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Bounds the wait for a receipt; unbounded by default
    pub fn with_finality_timeout(mut self, timeout: Duration) -> Self {
        self.finality_timeout = Some(timeout);
        self
    }

    /// Overrides the bit width of event tries
    pub fn with_event_bit_width(mut self, bit_width: u32) -> Self {
        self.event_bit_width = bit_width;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn confidence(&self) -> u64 {
        self.confidence
    }

    /// Calls a view method and decodes its return values.
    ///
    /// Nothing is submitted; the node executes the call against its latest
    /// state.
    pub async fn call(
        &self,
        contract: EthAddress,
        signature: &str,
        args: &[AbiValue],
    ) -> InvokeResult<Vec<AbiValue>> {
        let descriptor = MethodDescriptor::parse(signature)?;
        self.call_method(contract, &descriptor, args).await
    }

    /// Calls a view method described by `descriptor`
    pub async fn call_method(
        &self,
        contract: EthAddress,
        descriptor: &MethodDescriptor,
        args: &[AbiValue],
    ) -> InvokeResult<Vec<AbiValue>> {
        let calldata = descriptor.encode_call(args)?;
        debug!(%contract, method = %descriptor.canonical_signature(), "eth call");
        let data = self
            .gateway
            .eth_call(EthAddress::ZERO, contract, calldata.into_bytes())
            .await
            .map_err(InvokeError::from_call)?;
        Ok(descriptor.decode_output(&data)?)
    }

    /// Sends a state-changing call and waits for it to execute.
    ///
    /// `sender` defaults to the node wallet's default address.
    pub async fn invoke(
        &self,
        contract: EthAddress,
        sender: Option<FilAddress>,
        signature: &str,
        args: &[AbiValue],
    ) -> InvokeResult<Invocation> {
        let descriptor = MethodDescriptor::parse(signature)?;
        let sender = match sender {
            Some(sender) => sender,
            None => self.gateway.default_sender().await?,
        };
        let call = PendingCall::build(contract, sender, &descriptor, args)?;
        self.execute(&call).await
    }

    /// Runs a built call through submission, finality and decoding
    pub async fn execute(&self, call: &PendingCall) -> InvokeResult<Invocation> {
        let method = call.descriptor().canonical_signature();
        info!(
            to = %call.target(),
            from = %call.sender(),
            %method,
            state = %CallState::Built,
            "sending message"
        );

        let message = self
            .gateway
            .submit(call)
            .await
            .map_err(InvokeError::from_submission)?;
        info!(state = %CallState::Submitted(message.clone()), "message accepted");

        let state = CallState::AwaitingFinality(message.clone());
        info!(state = %state, confidence = self.confidence, "waiting for message to execute");
        let receipt = self.await_receipt(&message).await?;

        if !receipt.is_success() {
            let state = CallState::Failed {
                exit_code: receipt.exit_code,
            };
            warn!(%message, state = %state, "actor execution failed");
            return Err(InvokeError::ExecutionFailed {
                exit_code: receipt.exit_code,
            });
        }
        let state = CallState::Succeeded(receipt.clone());
        info!(%message, gas_used = receipt.gas_used, state = %state, "message executed");

        let return_values = if call.descriptor().outputs().is_empty() {
            Vec::new()
        } else {
            let data = unwrap_bytes(&receipt.return_data)?;
            call.descriptor().decode_output(&data)?
        };

        let events = match &receipt.events_root {
            Some(root) => self.decode_events(root).await?,
            None => Vec::new(),
        };

        Ok(Invocation {
            message,
            receipt,
            return_values,
            events,
        })
    }

    async fn await_receipt(&self, message: &MessageReference) -> InvokeResult<Receipt> {
        let wait = self.gateway.await_finality(message, self.confidence);
        let receipt = match self.finality_timeout {
            Some(timeout) => tokio::time::timeout(timeout, wait).await.map_err(|_| {
                InvokeError::FinalityTimeout {
                    message: message.clone(),
                    timeout,
                }
            })?,
            None => wait.await,
        };
        Ok(receipt?)
    }

    /// Reads every event under `root`.
    ///
    /// Either all events decode or an error is returned; a partial list is
    /// never produced.
    pub async fn decode_events(&self, root: &ContentAddress) -> InvokeResult<Vec<DecodedEvent>> {
        let amt = Amt::new(&self.store, root.clone(), self.event_bit_width)?;
        let stream = amt.entries();
        futures::pin_mut!(stream);

        let mut events = Vec::new();
        while let Some((index, raw)) = stream.try_next().await? {
            events.push(decode_event(index, &raw)?);
        }
        debug!(%root, count = events.len(), "decoded events");
        Ok(events)
    }
}

fn decode_event(index: u64, raw: &[u8]) -> InvokeResult<DecodedEvent> {
    let record = EventRecord::from_cbor(raw)
        .map_err(|err| InvokeError::corruption(format!("event {index}: {err}")))?;

    let entries = record
        .entries
        .into_iter()
        .map(|entry| {
            let value = unwrap_bytes(&entry.raw_value).map_err(|err| {
                InvokeError::Abi(AbiError::Framing {
                    reason: format!("event {index} key '{}': {err}", entry.key),
                })
            })?;
            Ok(DecodedEntry {
                key: entry.key,
                value,
                flags: entry.flags,
                codec: entry.codec,
            })
        })
        .collect::<InvokeResult<Vec<_>>>()?;

    Ok(DecodedEvent {
        index,
        emitter: record.emitter,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use filplus_amt::testing::{AmtBuilder, MemoryBlockStore};
    use filplus_config::Network;
    use filplus_core::cbor::{self, Value};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Gateway {}

        #[async_trait]
        impl MessageGateway for Gateway {
            async fn submit(&self, call: &PendingCall) -> RpcResult<MessageReference>;
            async fn await_finality(&self, message: &MessageReference, confidence: u64) -> RpcResult<Receipt>;
            async fn eth_call(&self, from: EthAddress, to: EthAddress, data: Vec<u8>) -> RpcResult<Vec<u8>>;
            async fn default_sender(&self) -> RpcResult<FilAddress>;
        }
    }

    fn reference() -> MessageReference {
        MessageReference(ContentAddress::for_dag_cbor(b"message"))
    }

    fn receipt(exit_code: i64, events_root: Option<ContentAddress>) -> Receipt {
        Receipt {
            exit_code,
            return_data: Vec::new(),
            gas_used: 21_000,
            events_root,
        }
    }

    fn sender() -> FilAddress {
        FilAddress::new_id(Network::Mainnet, 1001)
    }

    fn event_leaf(emitter: u64, key: &str, value: &[u8]) -> Vec<u8> {
        let event = Value::Array(vec![
            Value::Integer(emitter.into()),
            Value::Array(vec![Value::Array(vec![
                Value::Integer(3u64.into()),
                Value::Text(key.to_string()),
                Value::Integer(0x55u64.into()),
                Value::Bytes(filplus_abi::frame_bytes(value)),
            ])]),
        ]);
        cbor::encode(&event).unwrap()
    }

    #[tokio::test]
    async fn test_view_call() {
        let contract = EthAddress::from_id(1234);
        let descriptor = MethodDescriptor::parse("allowance(address) returns (uint256)").unwrap();
        let allocator = EthAddress::from_id(77);
        let expected = descriptor
            .encode_call(&[AbiValue::from(allocator)])
            .unwrap()
            .into_bytes();

        let mut gateway = MockGateway::new();
        gateway
            .expect_eth_call()
            .with(eq(EthAddress::ZERO), eq(contract), eq(expected))
            .times(1)
            .returning(|_, _, _| {
                let mut word = vec![0u8; 32];
                word[31] = 0x2a;
                Ok(word)
            });
        gateway.expect_submit().never();

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let values = client
            .call(contract, "allowance(address) returns (uint256)", &[allocator.into()])
            .await
            .unwrap();
        assert_eq!(values, vec![AbiValue::from(42u64)]);
    }

    #[tokio::test]
    async fn test_reverted_view_call() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_eth_call()
            .returning(|_, _, _| Err(crate::RpcError::new(1, "execution reverted")));

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let err = client
            .call(EthAddress::from_id(1), "contracts() returns (address[])", &[])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InvokeError::CallFailed {
                reason: "execution reverted".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_invoke_uses_default_sender() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_default_sender()
            .times(1)
            .returning(|| Ok(sender()));
        gateway
            .expect_submit()
            .withf(|call| call.sender() == &sender())
            .times(1)
            .returning(|_| Ok(reference()));
        gateway
            .expect_await_finality()
            .with(eq(reference()), eq(DEFAULT_MESSAGE_CONFIDENCE))
            .times(1)
            .returning(|_, _| Ok(receipt(0, None)));

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let invocation = client
            .invoke(
                EthAddress::from_id(1234),
                None,
                "addAllowance(address,uint256)",
                &[EthAddress::from_id(5).into(), 1000u64.into()],
            )
            .await
            .unwrap();
        assert_eq!(invocation.message, reference());
        assert!(invocation.return_values.is_empty());
        assert!(invocation.events.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_submission_is_not_awaited() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_submit()
            .returning(|_| Err(crate::RpcError::new(1, "mpool push: not enough funds")));
        gateway.expect_await_finality().never();

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let err = client
            .invoke(
                EthAddress::from_id(1234),
                Some(sender()),
                "deploy(address)",
                &[EthAddress::from_id(5).into()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::SubmissionRejected { .. }));
    }

    #[tokio::test]
    async fn test_bad_arguments_never_reach_the_node() {
        let mut gateway = MockGateway::new();
        gateway.expect_submit().never();

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let err = client
            .invoke(
                EthAddress::from_id(1234),
                Some(sender()),
                "addAllowance(address,uint8)",
                &[EthAddress::from_id(5).into(), 256u64.into()],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Abi(AbiError::ArgumentTypeMismatch { index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_return_values_are_unwrapped() {
        let mut gateway = MockGateway::new();
        gateway.expect_submit().returning(|_| Ok(reference()));
        gateway.expect_await_finality().returning(|_, _| {
            let mut word = vec![0u8; 32];
            word[31] = 1;
            Ok(Receipt {
                return_data: filplus_abi::frame_bytes(&word),
                ..receipt(0, None)
            })
        });

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let invocation = client
            .invoke(
                EthAddress::from_id(1234),
                Some(sender()),
                "setAllowance(address,uint256) returns (bool)",
                &[EthAddress::from_id(5).into(), 1u64.into()],
            )
            .await
            .unwrap();
        assert_eq!(invocation.return_values, vec![AbiValue::Bool(true)]);
    }

    #[tokio::test]
    async fn test_events_are_decoded_in_order() {
        let store = MemoryBlockStore::new();
        let root = AmtBuilder::new(EVENT_AMT_BITWIDTH)
            .with_value(1, event_leaf(1002, "second", &[0xbb]))
            .with_value(0, event_leaf(1001, "first", &[0xaa, 0xab]))
            .build(&store)
            .unwrap();

        let client = ContractClient::new(MockGateway::new(), store);
        let events = client.decode_events(&root).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].index, 0);
        assert_eq!(events[0].emitter, 1001);
        assert_eq!(
            events[0].entries,
            vec![DecodedEntry {
                key: "first".to_string(),
                value: vec![0xaa, 0xab],
                flags: 3,
                codec: Some(0x55),
            }]
        );
        assert_eq!(events[1].entries[0].value, vec![0xbb]);
    }

    #[tokio::test]
    async fn test_malformed_event_discards_all() {
        let store = MemoryBlockStore::new();
        let root = AmtBuilder::new(EVENT_AMT_BITWIDTH)
            .with_value(0, event_leaf(1001, "ok", &[1]))
            .with_value(1, cbor::encode(&Value::Text("garbage".into())).unwrap())
            .build(&store)
            .unwrap();

        let client = ContractClient::new(MockGateway::new(), store);
        let err = client.decode_events(&root).await.unwrap_err();
        match err {
            InvokeError::TrieCorruption { reason } => assert!(reason.starts_with("event 1")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unframed_event_value() {
        let store = MemoryBlockStore::new();
        let event = Value::Array(vec![
            Value::Integer(1001u64.into()),
            Value::Array(vec![Value::Array(vec![
                Value::Integer(3u64.into()),
                Value::Text("amount".into()),
                Value::Integer(0x55u64.into()),
                // claims five bytes, carries one
                Value::Bytes(vec![0x45, 0x01]),
            ])]),
        ]);
        let root = AmtBuilder::new(EVENT_AMT_BITWIDTH)
            .with_value(0, cbor::encode(&event).unwrap())
            .build(&store)
            .unwrap();

        let client = ContractClient::new(MockGateway::new(), store);
        let err = client.decode_events(&root).await.unwrap_err();
        assert!(matches!(err, InvokeError::Abi(AbiError::Framing { .. })));
        assert!(err.to_string().contains("amount"));
    }

    #[tokio::test]
    async fn test_finality_timeout() {
        let mut gateway = MockGateway::new();
        gateway.expect_submit().returning(|_| Ok(reference()));

        struct Stalled(MockGateway);

        #[async_trait]
        impl MessageGateway for Stalled {
            async fn submit(&self, call: &PendingCall) -> RpcResult<MessageReference> {
                self.0.submit(call).await
            }
            async fn await_finality(&self, _: &MessageReference, _: u64) -> RpcResult<Receipt> {
                futures::future::pending().await
            }
            async fn eth_call(&self, from: EthAddress, to: EthAddress, data: Vec<u8>) -> RpcResult<Vec<u8>> {
                self.0.eth_call(from, to, data).await
            }
            async fn default_sender(&self) -> RpcResult<FilAddress> {
                self.0.default_sender().await
            }
        }

        let client = ContractClient::new(Stalled(gateway), MemoryBlockStore::new())
            .with_finality_timeout(Duration::from_millis(20));
        let err = client
            .invoke(
                EthAddress::from_id(1234),
                Some(sender()),
                "deploy(address)",
                &[EthAddress::from_id(5).into()],
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InvokeError::FinalityTimeout {
                message: reference(),
                timeout: Duration::from_millis(20),
            }
        );
    }
}
