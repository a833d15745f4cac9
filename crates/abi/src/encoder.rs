//! Head/tail ABI encoding.

use crate::{AbiError, AbiResult, AbiValue, ParamType};
use filplus_config::{ABI_WORD_SIZE, ETH_ADDRESS_SIZE};
use num_bigint::{BigInt, Sign};

/// Encodes `values` as the ABI tuple `types`.
///
/// Each argument is checked against its declared type; the first mismatch
/// is reported with its index and nothing is returned.
pub fn encode(types: &[ParamType], values: &[AbiValue]) -> AbiResult<Vec<u8>> {
    if types.len() != values.len() {
        return Err(AbiError::ArityMismatch {
            expected: types.len(),
            actual: values.len(),
        });
    }

    let mut parts = Vec::with_capacity(types.len());
    for (index, (ty, value)) in types.iter().zip(values).enumerate() {
        let encoded = encode_value(ty, value).map_err(|reason| AbiError::mismatch(index, ty, reason))?;
        parts.push((ty.is_dynamic(), encoded));
    }
    Ok(assemble(parts))
}

/// Lays out encoded members: static members inline, dynamic members as an
/// offset into the tail.
fn assemble(parts: Vec<(bool, Vec<u8>)>) -> Vec<u8> {
    let head_len: usize = parts
        .iter()
        .map(|(dynamic, bytes)| if *dynamic { ABI_WORD_SIZE } else { bytes.len() })
        .sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (dynamic, bytes) in parts {
        if dynamic {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend_from_slice(&bytes);
        } else {
            head.extend_from_slice(&bytes);
        }
    }
    head.extend_from_slice(&tail);
    head
}

fn encode_sequence<'t>(
    types: impl Iterator<Item = &'t ParamType>,
    values: &[AbiValue],
) -> Result<Vec<u8>, String> {
    let mut parts = Vec::with_capacity(values.len());
    for (i, (ty, value)) in types.zip(values).enumerate() {
        let encoded = encode_value(ty, value).map_err(|reason| format!("element {i}: {reason}"))?;
        parts.push((ty.is_dynamic(), encoded));
    }
    Ok(assemble(parts))
}

fn encode_value(ty: &ParamType, value: &AbiValue) -> Result<Vec<u8>, String> {
    match (ty, value) {
        (ParamType::Address, AbiValue::Address(address)) => Ok(left_pad(address.as_bytes(), 0)),
        (ParamType::Address, AbiValue::Bytes(bytes) | AbiValue::FixedBytes(bytes)) => {
            if bytes.len() != ETH_ADDRESS_SIZE {
                return Err(format!(
                    "address must be {ETH_ADDRESS_SIZE} bytes, got {}",
                    bytes.len()
                ));
            }
            Ok(left_pad(bytes, 0))
        }
        (ParamType::Bool, AbiValue::Bool(flag)) => Ok(left_pad(&[u8::from(*flag)], 0)),
        (ParamType::Uint(bits), AbiValue::Integer(n)) => {
            if n.sign() == Sign::Minus {
                return Err(format!("negative value {n} for unsigned type"));
            }
            if n.bits() > *bits as u64 {
                return Err(format!("value {n} exceeds {bits} bits"));
            }
            Ok(left_pad(&n.magnitude().to_bytes_be(), 0))
        }
        (ParamType::Int(bits), AbiValue::Integer(n)) => {
            if !fits_signed(n, *bits) {
                return Err(format!("value {n} out of range for {bits}-bit signed type"));
            }
            let fill = if n.sign() == Sign::Minus { 0xff } else { 0x00 };
            Ok(left_pad(&n.to_signed_bytes_be(), fill))
        }
        (ParamType::FixedBytes(len), AbiValue::FixedBytes(bytes) | AbiValue::Bytes(bytes)) => {
            if bytes.len() != *len {
                return Err(format!("expected {len} bytes, got {}", bytes.len()));
            }
            Ok(right_pad(bytes))
        }
        (ParamType::Bytes, AbiValue::Bytes(bytes) | AbiValue::FixedBytes(bytes)) => {
            Ok(encode_dynamic_bytes(bytes))
        }
        (ParamType::String, AbiValue::String(text)) => Ok(encode_dynamic_bytes(text.as_bytes())),
        (ParamType::Array(inner), AbiValue::Array(items)) => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend(encode_sequence(std::iter::repeat(&**inner), items)?);
            Ok(out)
        }
        (ParamType::FixedArray(inner, len), AbiValue::Array(items)) => {
            if items.len() != *len {
                return Err(format!("expected {len} elements, got {}", items.len()));
            }
            encode_sequence(std::iter::repeat(&**inner), items)
        }
        (ParamType::Tuple(types), AbiValue::Tuple(items)) => {
            if items.len() != types.len() {
                return Err(format!(
                    "expected {} tuple members, got {}",
                    types.len(),
                    items.len()
                ));
            }
            encode_sequence(types.iter(), items)
        }
        (ty, value) => Err(format!("cannot encode {} as {ty}", value.kind())),
    }
}

/// Returns true if `n` is representable in two's complement with `bits` bits.
pub(crate) fn fits_signed(n: &BigInt, bits: usize) -> bool {
    let magnitude = if n.sign() == Sign::Minus {
        -n - 1
    } else {
        n.clone()
    };
    magnitude.bits() < bits as u64
}

fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = usize_word(bytes.len()).to_vec();
    out.extend_from_slice(bytes);
    let rem = bytes.len() % ABI_WORD_SIZE;
    if rem != 0 {
        out.resize(out.len() + ABI_WORD_SIZE - rem, 0);
    }
    out
}

fn usize_word(value: usize) -> [u8; ABI_WORD_SIZE] {
    let mut word = [0u8; ABI_WORD_SIZE];
    word[ABI_WORD_SIZE - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn left_pad(bytes: &[u8], fill: u8) -> Vec<u8> {
    let mut word = vec![fill; ABI_WORD_SIZE - bytes.len()];
    word.extend_from_slice(bytes);
    word
}

fn right_pad(bytes: &[u8]) -> Vec<u8> {
    let mut word = bytes.to_vec();
    word.resize(ABI_WORD_SIZE, 0);
    word
}
