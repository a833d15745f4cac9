//! Helpers over `ciborium` for reading DAG-CBOR blocks.

use crate::{ContentAddress, CoreError, CoreResult};
pub use ciborium::value::Value;

/// CBOR tag marking an IPLD link.
pub const CID_TAG: u64 = 42;

/// Decodes exactly one CBOR item from `bytes`; trailing data is rejected.
pub fn decode(bytes: &[u8]) -> CoreResult<Value> {
    let mut reader = bytes;
    let value: Value = ciborium::de::from_reader(&mut reader).map_err(|e| CoreError::Cbor {
        message: e.to_string(),
    })?;
    if !reader.is_empty() {
        return Err(CoreError::Cbor {
            message: format!("{} trailing bytes after CBOR item", reader.len()),
        });
    }
    Ok(value)
}

/// Encodes a CBOR item
pub fn encode(value: &Value) -> CoreResult<Vec<u8>> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out).map_err(|e| CoreError::Cbor {
        message: e.to_string(),
    })?;
    Ok(out)
}

fn shape(what: &str, expected: &str, found: &Value) -> CoreError {
    CoreError::Cbor {
        message: format!("{what}: expected {expected}, found {}", kind(found)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) => "integer",
        Value::Bytes(_) => "byte string",
        Value::Float(_) => "float",
        Value::Text(_) => "text string",
        Value::Bool(_) => "bool",
        Value::Null => "null",
        Value::Tag(..) => "tag",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        _ => "unknown item",
    }
}

/// Reads an unsigned integer
pub fn as_u64(value: &Value, what: &str) -> CoreResult<u64> {
    match value {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| CoreError::Cbor {
            message: format!("{what}: integer out of u64 range"),
        }),
        other => Err(shape(what, "unsigned integer", other)),
    }
}

/// Reads an array
pub fn as_array<'a>(value: &'a Value, what: &str) -> CoreResult<&'a [Value]> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(shape(what, "array", other)),
    }
}

/// Reads a byte string
pub fn as_bytes<'a>(value: &'a Value, what: &str) -> CoreResult<&'a [u8]> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        other => Err(shape(what, "byte string", other)),
    }
}

/// Reads an IPLD link (tag 42 over the identity-multibase CID bytes)
pub fn as_link(value: &Value, what: &str) -> CoreResult<ContentAddress> {
    match value {
        Value::Tag(CID_TAG, inner) => {
            let bytes = as_bytes(inner, what)?;
            ContentAddress::from_link_bytes(bytes)
        }
        Value::Tag(tag, _) => Err(CoreError::Cbor {
            message: format!("{what}: expected link tag 42, found tag {tag}"),
        }),
        other => Err(shape(what, "link", other)),
    }
}

/// Builds the CBOR item linking to `cid`
pub fn link_value(cid: &ContentAddress) -> Value {
    Value::Tag(CID_TAG, Box::new(Value::Bytes(cid.to_link_bytes())))
}
