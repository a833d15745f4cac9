//! Values exchanged with contracts.

use filplus_core::EthAddress;
use num_bigint::BigInt;
use std::fmt;

/// A typed ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// Represents an `address`.
    Address(EthAddress),

    /// Represents a `bool`.
    Bool(bool),

    /// Represents any `uint<M>` or `int<M>`; the declared type bounds it.
    Integer(BigInt),

    /// Represents a `bytes<M>` value.
    FixedBytes(Vec<u8>),

    /// Represents a dynamic `bytes` value.
    Bytes(Vec<u8>),

    /// Represents a `string`.
    String(String),

    /// Represents `T[]` and `T[k]`.
    Array(Vec<AbiValue>),

    /// Represents a tuple.
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Creates an integer value.
    pub fn from_int<T: Into<BigInt>>(value: T) -> Self {
        AbiValue::Integer(value.into())
    }

    /// Creates an address value.
    pub fn from_address(address: EthAddress) -> Self {
        AbiValue::Address(address)
    }

    /// Gets the address, if this is one.
    pub fn as_address(&self) -> Option<EthAddress> {
        match self {
            AbiValue::Address(address) => Some(*address),
            _ => None,
        }
    }

    /// Gets the integer, if this is one.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            AbiValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    /// Gets the bool, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Gets the bytes of a `bytes` or `bytes<M>` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AbiValue::Bytes(bytes) | AbiValue::FixedBytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Gets the elements of an array or tuple.
    pub fn as_array(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::Array(items) | AbiValue::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the value's kind for error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            AbiValue::Address(_) => "address",
            AbiValue::Bool(_) => "bool",
            AbiValue::Integer(_) => "integer",
            AbiValue::FixedBytes(_) => "fixed bytes",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
            AbiValue::Array(_) => "array",
            AbiValue::Tuple(_) => "tuple",
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Address(address) => write!(f, "{address}"),
            AbiValue::Bool(value) => write!(f, "{value}"),
            AbiValue::Integer(value) => write!(f, "{value}"),
            AbiValue::FixedBytes(bytes) | AbiValue::Bytes(bytes) => {
                write!(f, "0x{}", hex::encode(bytes))
            }
            AbiValue::String(value) => write!(f, "{value}"),
            AbiValue::Array(items) => write_list(f, "[", items, "]"),
            AbiValue::Tuple(items) => write_list(f, "(", items, ")"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, open: &str, items: &[AbiValue], close: &str) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl From<EthAddress> for AbiValue {
    fn from(address: EthAddress) -> Self {
        AbiValue::Address(address)
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Integer(value.into())
    }
}

impl From<BigInt> for AbiValue {
    fn from(value: BigInt) -> Self {
        AbiValue::Integer(value)
    }
}

impl From<String> for AbiValue {
    fn from(value: String) -> Self {
        AbiValue::String(value)
    }
}
