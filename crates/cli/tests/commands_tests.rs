//! CLI Command Tests
//!
//! Runs the command call sites against a mocked node.

use async_trait::async_trait;
use filplus_abi::{encoder, frame_bytes, AbiValue, MethodDescriptor, ParamType};
use filplus_amt::testing::{AmtBuilder, MemoryBlockStore};
use filplus_cli::args::{Amount, Command, SendArgs};
use filplus_cli::commands::{self, allowance, registry, AllowanceCommands};
use filplus_config::{Network, EVENT_AMT_BITWIDTH};
use filplus_core::{ContentAddress, EthAddress, FilAddress, MessageReference, Receipt};
use filplus_rpc_client::{ContractClient, InvokeError, MessageGateway, PendingCall, RpcResult};
use mockall::mock;

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
        gas_used: 1_000,
        events_root,
    }
}

fn selector(signature: &str) -> [u8; 4] {
    MethodDescriptor::parse(signature).unwrap().selector()
}

fn deployed_event(contract: EthAddress) -> Vec<u8> {
    use ciborium::value::Value;

    let mut topic = vec![0u8; 32];
    topic[..4].copy_from_slice(&[0xf4, 0x0f, 0xcc, 0x8e]);
    let mut data = vec![0u8; 12];
    data.extend_from_slice(contract.as_bytes());

    let entry = |key: &str, value: &[u8]| {
        Value::Array(vec![
            Value::Integer(3u64.into()),
            Value::Text(key.to_string()),
            Value::Integer(0x55u64.into()),
            Value::Bytes(frame_bytes(value)),
        ])
    };
    let event = Value::Array(vec![
        Value::Integer(1200u64.into()),
        Value::Array(vec![entry("t1", &topic), entry("d", &data)]),
    ]);

    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&event, &mut bytes).unwrap();
    bytes
}

#[cfg(test)]
mod commands_tests {
    use super::*;

    /// Allowances of every listed allocator are fetched and printed in order
    #[tokio::test]
    async fn test_list_allocators() {
        let contract = EthAddress::from_id(1234);
        let allocators = [EthAddress::from_id(5), EthAddress::from_id(6)];

        let mut gateway = MockGateway::new();
        gateway
            .expect_eth_call()
            .times(3)
            .returning(move |_, _, data| {
                if data[..4] == selector(allowance::ALLOCATORS) {
                    let list = AbiValue::Array(allocators.iter().map(|a| (*a).into()).collect());
                    return Ok(encoder::encode(
                        &[ParamType::Array(Box::new(ParamType::Address))],
                        &[list],
                    )
                    .unwrap());
                }
                // allowance(address): echo the allocator id back as its allowance
                let id = u64::from_be_bytes(data[28..36].try_into().unwrap());
                Ok(encoder::encode(&[ParamType::Uint(256)], &[AbiValue::from(id * 100)]).unwrap())
            });

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let mut out = Vec::new();
        commands::execute(&client, &Command::ListAllocators { contract }, &mut out)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0xff00000000000000000000000000000000000005 500\n\
             0xff00000000000000000000000000000000000006 600\n"
        );
    }

    /// An empty allocator list makes no further calls
    #[tokio::test]
    async fn test_list_allocators_empty() {
        let mut gateway = MockGateway::new();
        gateway.expect_eth_call().times(1).returning(|_, _, _| {
            Ok(encoder::encode(
                &[ParamType::Array(Box::new(ParamType::Address))],
                &[AbiValue::Array(Vec::new())],
            )
            .unwrap())
        });

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let listed = AllowanceCommands::new(&client)
            .allocators(EthAddress::from_id(1234))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    /// Registered contracts print as a bracketed list
    #[tokio::test]
    async fn test_list_contracts() {
        let mut gateway = MockGateway::new();
        gateway.expect_eth_call().returning(|_, _, data| {
            assert_eq!(data, selector(registry::CONTRACTS).to_vec());
            Ok(encoder::encode(
                &[ParamType::Array(Box::new(ParamType::Address))],
                &[AbiValue::Array(vec![EthAddress::from_id(9).into()])],
            )
            .unwrap())
        });

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let mut out = Vec::new();
        commands::execute(
            &client,
            &Command::ListContracts {
                registry: EthAddress::from_id(1),
            },
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[0xff00000000000000000000000000000000000009]\n"
        );
    }

    /// Deployment prints the emitted events with unwrapped values
    #[tokio::test]
    async fn test_deploy_prints_events() {
        let deployed = EthAddress::from_id(4321);
        let store = MemoryBlockStore::new();
        let root = AmtBuilder::new(EVENT_AMT_BITWIDTH)
            .with_value(0, deployed_event(deployed))
            .build(&store)
            .unwrap();

        let mut gateway = MockGateway::new();
        gateway
            .expect_default_sender()
            .returning(|| Ok(FilAddress::new_id(Network::Mainnet, 1001)));
        gateway
            .expect_submit()
            .withf(|call| call.params().as_bytes()[2..6] == selector(registry::DEPLOY))
            .returning(|_| Ok(reference()));
        gateway
            .expect_await_finality()
            .returning(move |_, _| Ok(receipt(0, Some(root.clone()))));

        let client = ContractClient::new(gateway, store);
        let mut out = Vec::new();
        commands::execute(
            &client,
            &Command::DeployAllocatorContract {
                registry: EthAddress::from_id(1),
                initial_owner: EthAddress::from_id(2),
                send: SendArgs::default(),
            },
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Events emitted:");
        assert_eq!(lines[1], "\tEmitter ID: 1200");
        assert_eq!(
            lines[2],
            format!("\t\tKey: t1, Value: 0xf40fcc8e{}, Flags: b11", "0".repeat(56))
        );
        assert_eq!(
            lines[3],
            format!("\t\tKey: d, Value: 0x{}{}, Flags: b11", "0".repeat(24), hex::encode(deployed.as_bytes()))
        );
        assert_eq!(lines[4], "OK");
    }

    /// A failed execution surfaces its exit code
    #[tokio::test]
    async fn test_set_allowance_failure() {
        let mut gateway = MockGateway::new();
        gateway.expect_submit().returning(|_| Ok(reference()));
        gateway
            .expect_await_finality()
            .returning(|_, _| Ok(receipt(33, None)));

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let mut out = Vec::new();
        let err = commands::execute(
            &client,
            &Command::SetAllowance {
                contract: EthAddress::from_id(1234),
                allocator: EthAddress::from_id(5),
                amount: "1000".parse::<Amount>().unwrap(),
                send: SendArgs {
                    from: Some(FilAddress::new_id(Network::Mainnet, 1001)),
                },
            },
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<InvokeError>(),
            Some(&InvokeError::ExecutionFailed { exit_code: 33 })
        );
        assert!(out.is_empty());
    }

    /// The verified client and amount are encoded in argument order
    #[tokio::test]
    async fn test_add_verified_client_calldata() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_submit()
            .withf(|call: &PendingCall| {
                let calldata = &call.params().as_bytes()[2..];
                let descriptor = MethodDescriptor::parse(allowance::ADD_VERIFIED_CLIENT).unwrap();
                let args = descriptor.decode_input(calldata).unwrap();
                args == vec![AbiValue::from(EthAddress::from_id(77)), AbiValue::from(2048u64)]
            })
            .times(1)
            .returning(|_| Ok(reference()));
        gateway
            .expect_await_finality()
            .returning(|_, _| Ok(receipt(0, None)));

        let client = ContractClient::new(gateway, MemoryBlockStore::new());
        let mut out = Vec::new();
        commands::execute(
            &client,
            &Command::AddVerifiedClient {
                contract: EthAddress::from_id(1234),
                client: EthAddress::from_id(77),
                amount: "0x800".parse::<Amount>().unwrap(),
                send: SendArgs {
                    from: Some(FilAddress::new_id(Network::Mainnet, 1001)),
                },
            },
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "OK\n");
    }
}
