// Copyright (C) 2026 The Filecoin Plus Tooling Contributors.
//
// pending_call.rs file belongs to the filplus-allocator project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! A contract call ready for submission, and the states it moves through.

use crate::models::Message;
use filplus_abi::{AbiResult, AbiValue, MethodDescriptor, WrappedCalldata};
use filplus_config::INVOKE_CONTRACT_METHOD;
use filplus_core::{EthAddress, FilAddress, MessageReference, Receipt};
use std::fmt;

/// An `InvokeContract` message whose calldata has been encoded and framed
/// exactly once
#[derive(Debug, Clone)]
pub struct PendingCall {
    contract: EthAddress,
    target: FilAddress,
    sender: FilAddress,
    descriptor: MethodDescriptor,
    params: WrappedCalldata,
}

impl PendingCall {
    /// Encodes `args` against `descriptor` and wraps the calldata.
    ///
    /// The target actor address is derived from `contract` on the sender's
    /// network.
    pub fn build(
        contract: EthAddress,
        sender: FilAddress,
        descriptor: &MethodDescriptor,
        args: &[AbiValue],
    ) -> AbiResult<Self> {
        let params = descriptor.encode_call(args)?.wrap();
        Ok(Self {
            contract,
            target: contract.to_fil_address(sender.network()),
            sender,
            descriptor: descriptor.clone(),
            params,
        })
    }

    pub fn contract(&self) -> EthAddress {
        self.contract
    }

    /// Gets the actor address the message is sent to
    pub fn target(&self) -> &FilAddress {
        &self.target
    }

    pub fn sender(&self) -> &FilAddress {
        &self.sender
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// Gets the framed calldata placed in the message params
    pub fn params(&self) -> &WrappedCalldata {
        &self.params
    }

    /// Builds the unsigned message handed to the node
    pub fn to_message(&self) -> Message {
        Message::new(
            self.sender.clone(),
            self.target.clone(),
            INVOKE_CONTRACT_METHOD,
            self.params.as_bytes().to_vec(),
        )
    }
}

/// Lifecycle of one write call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallState {
    /// Calldata encoded and wrapped, nothing sent
    Built,
    /// Accepted into the node's message pool
    Submitted(MessageReference),
    /// Blocked on inclusion with the requested confidence
    AwaitingFinality(MessageReference),
    Succeeded(Receipt),
    Failed { exit_code: i64 },
}

impl CallState {
    /// Returns true for `Succeeded` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Succeeded(_) | CallState::Failed { .. })
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Built => write!(f, "built"),
            CallState::Submitted(message) => write!(f, "submitted {message}"),
            CallState::AwaitingFinality(message) => write!(f, "awaiting finality of {message}"),
            CallState::Succeeded(_) => write!(f, "succeeded"),
            CallState::Failed { exit_code } => write!(f, "failed with exit code {exit_code}"),
        }
    }
}
