//! Self-describing byte-array framing.
//!
//! FEVM expects `InvokeContract` parameters, and emits event values, as a
//! DAG-CBOR byte string: a major-type-2 header carrying the length, followed
//! by the bytes themselves.

use crate::{AbiError, AbiResult};

const MAJOR_BYTE_STRING: u8 = 2;

/// ABI-encoded call data, not yet framed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata(Vec<u8>);

impl Calldata {
    /// Creates calldata from already encoded bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Gets the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Frames the calldata for submission as `InvokeContract` parameters.
    ///
    /// Consumes `self`, so calldata is wrapped at most once.
    pub fn wrap(self) -> WrappedCalldata {
        WrappedCalldata(frame_bytes(&self.0))
    }
}

/// Calldata framed as a byte string, ready to be placed in a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedCalldata(Vec<u8>);

impl WrappedCalldata {
    /// Gets the framed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Writes the byte-string header for a payload of `len` bytes
pub fn write_byte_array_header(len: u64, out: &mut Vec<u8>) {
    let major = MAJOR_BYTE_STRING << 5;
    if len < 24 {
        out.push(major | len as u8);
    } else if len <= u8::MAX as u64 {
        out.push(major | 24);
        out.push(len as u8);
    } else if len <= u16::MAX as u64 {
        out.push(major | 25);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else if len <= u32::MAX as u64 {
        out.push(major | 26);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    } else {
        out.push(major | 27);
        out.extend_from_slice(&len.to_be_bytes());
    }
}

/// Frames `data` as a byte string
pub fn frame_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 9);
    write_byte_array_header(data.len() as u64, &mut out);
    out.extend_from_slice(data);
    out
}

/// Reads a framed byte string from `raw`, refusing payloads longer than
/// `max_len`. Bytes after the payload are ignored.
pub fn decode_self_describing_bytes(raw: &[u8], max_len: usize) -> AbiResult<Vec<u8>> {
    let (&initial, rest) = raw
        .split_first()
        .ok_or_else(|| AbiError::framing("empty input"))?;

    let major = initial >> 5;
    if major != MAJOR_BYTE_STRING {
        return Err(AbiError::framing(format!(
            "expected byte string, found major type {major}"
        )));
    }

    let info = initial & 0x1f;
    let (declared, header_len) = match info {
        0..=23 => (info as u64, 0),
        24..=27 => {
            let size = 1usize << (info - 24);
            let bytes = rest.get(..size).ok_or_else(|| {
                AbiError::framing(format!(
                    "length header needs {size} bytes, {} available",
                    rest.len()
                ))
            })?;
            let len = bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);
            (len, size)
        }
        31 => return Err(AbiError::framing("indefinite-length byte strings are not supported")),
        _ => return Err(AbiError::framing(format!("invalid additional info {info}"))),
    };

    let payload = &rest[header_len..];
    if declared > max_len as u64 {
        return Err(AbiError::framing(format!(
            "declared length {declared} exceeds maximum {max_len}"
        )));
    }
    if declared > payload.len() as u64 {
        return Err(AbiError::framing(format!(
            "declared length {declared} exceeds {} available bytes",
            payload.len()
        )));
    }
    Ok(payload[..declared as usize].to_vec())
}

/// Unwraps a framed value whose length is bounded only by its own size
pub fn unwrap_bytes(raw: &[u8]) -> AbiResult<Vec<u8>> {
    decode_self_describing_bytes(raw, raw.len())
}
