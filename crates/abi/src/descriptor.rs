//! Parsed method signatures.

use crate::{decoder, encoder, signature, AbiError, AbiResult, AbiValue, Calldata, ParamType};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Size of a function selector in bytes
pub const SELECTOR_SIZE: usize = 4;

/// A contract method: name, parameter types and return types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    name: String,
    inputs: Vec<ParamType>,
    outputs: Vec<ParamType>,
}

impl MethodDescriptor {
    /// Creates a new method descriptor
    pub fn new(name: impl Into<String>, inputs: Vec<ParamType>, outputs: Vec<ParamType>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Parses a signature such as `allowance(address) returns (uint256)`
    pub fn parse(signature: &str) -> AbiResult<Self> {
        signature::parse_signature(signature)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[ParamType] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ParamType] {
        &self.outputs
    }

    /// Gets the signature the selector is computed over, e.g. `transfer(address,uint256)`
    pub fn canonical_signature(&self) -> String {
        let params: Vec<String> = self.inputs.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, params.join(","))
    }

    /// First four bytes of the Keccak-256 hash of the canonical signature
    pub fn selector(&self) -> [u8; SELECTOR_SIZE] {
        let hash = Keccak256::digest(self.canonical_signature().as_bytes());
        let mut selector = [0u8; SELECTOR_SIZE];
        selector.copy_from_slice(&hash[..SELECTOR_SIZE]);
        selector
    }

    /// Encodes a call: selector followed by the ABI-encoded arguments
    pub fn encode_call(&self, args: &[AbiValue]) -> AbiResult<Calldata> {
        let encoded = encoder::encode(&self.inputs, args)?;
        let mut data = Vec::with_capacity(SELECTOR_SIZE + encoded.len());
        data.extend_from_slice(&self.selector());
        data.extend_from_slice(&encoded);
        Ok(Calldata::new(data))
    }

    /// Decodes the arguments of encoded calldata, checking the selector
    pub fn decode_input(&self, calldata: &[u8]) -> AbiResult<Vec<AbiValue>> {
        if calldata.len() < SELECTOR_SIZE {
            return Err(AbiError::DecodeTruncated {
                offset: 0,
                needed: SELECTOR_SIZE,
                available: calldata.len(),
            });
        }
        let (selector, args) = calldata.split_at(SELECTOR_SIZE);
        if selector != self.selector().as_slice() {
            return Err(AbiError::decode_mismatch(
                self.canonical_signature(),
                format!("selector 0x{} does not match", hex::encode(selector)),
            ));
        }
        decoder::decode(&self.inputs, args)
    }

    /// Decodes return data
    pub fn decode_output(&self, data: &[u8]) -> AbiResult<Vec<AbiValue>> {
        decoder::decode(&self.outputs, data)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_signature())?;
        if !self.outputs.is_empty() {
            let outputs: Vec<String> = self.outputs.iter().map(ToString::to_string).collect();
            write!(f, " returns ({})", outputs.join(","))?;
        }
        Ok(())
    }
}

impl FromStr for MethodDescriptor {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
