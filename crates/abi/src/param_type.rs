//! Solidity parameter types.

use crate::{signature, AbiError};
use filplus_config::ABI_WORD_SIZE;
use std::fmt;
use std::str::FromStr;

/// A Solidity ABI type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `uint<M>`, 8 <= M <= 256, M % 8 == 0
    Uint(usize),
    /// `int<M>`, 8 <= M <= 256, M % 8 == 0
    Int(usize),
    /// `bytes<M>`, 1 <= M <= 32
    FixedBytes(usize),
    /// `bytes`
    Bytes,
    /// `string`
    String,
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[k]`
    FixedArray(Box<ParamType>, usize),
    /// `(T1,T2,...)`
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Returns true if values of this type are encoded in the tail section
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(types) => types.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in the head of its enclosing tuple,
    /// or `None` if that does not fit in a `usize`
    pub fn head_size(&self) -> Option<usize> {
        if self.is_dynamic() {
            return Some(ABI_WORD_SIZE);
        }
        match self {
            ParamType::FixedArray(inner, len) => inner.head_size()?.checked_mul(*len),
            ParamType::Tuple(types) => types
                .iter()
                .try_fold(0usize, |sum, ty| sum.checked_add(ty.head_size()?)),
            _ => Some(ABI_WORD_SIZE),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Uint(bits) => write!(f, "uint{bits}"),
            ParamType::Int(bits) => write!(f, "int{bits}"),
            ParamType::FixedBytes(len) => write!(f, "bytes{len}"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{inner}[]"),
            ParamType::FixedArray(inner, len) => write!(f, "{inner}[{len}]"),
            ParamType::Tuple(types) => {
                write!(f, "(")?;
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        signature::parse_type(s)
    }
}
