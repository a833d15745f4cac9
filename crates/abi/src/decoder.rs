//! ABI decoding with bounds and canonical-form checks.

use crate::encoder::fits_signed;
use crate::{AbiError, AbiResult, AbiValue, ParamType};
use filplus_config::{ABI_WORD_SIZE, ETH_ADDRESS_SIZE};
use filplus_core::EthAddress;
use num_bigint::{BigInt, BigUint};

/// Decodes `data` as the ABI tuple `types`
pub fn decode(types: &[ParamType], data: &[u8]) -> AbiResult<Vec<AbiValue>> {
    decode_sequence(types.iter(), data, 0)
}

fn decode_sequence<'t>(
    types: impl Iterator<Item = &'t ParamType>,
    data: &[u8],
    base: usize,
) -> AbiResult<Vec<AbiValue>> {
    let mut head = base;
    let mut values = Vec::new();
    for ty in types {
        let value = if ty.is_dynamic() {
            let offset = read_usize(data, head, ty)?;
            let at = base
                .checked_add(offset)
                .ok_or_else(|| AbiError::decode_mismatch(ty, "offset overflows"))?;
            decode_value(ty, data, at)?
        } else {
            decode_value(ty, data, head)?
        };
        values.push(value);
        head = ty
            .head_size()
            .and_then(|size| head.checked_add(size))
            .ok_or_else(|| AbiError::decode_mismatch(ty, "head size overflows"))?;
    }
    Ok(values)
}

fn decode_value(ty: &ParamType, data: &[u8], at: usize) -> AbiResult<AbiValue> {
    match ty {
        ParamType::Address => {
            let word = read_word(data, at)?;
            let (padding, address) = word.split_at(ABI_WORD_SIZE - ETH_ADDRESS_SIZE);
            if padding.iter().any(|b| *b != 0) {
                return Err(AbiError::decode_mismatch(ty, "dirty high-order bytes"));
            }
            let address = EthAddress::from_slice(address)
                .map_err(|e| AbiError::decode_mismatch(ty, e.to_string()))?;
            Ok(AbiValue::Address(address))
        }
        ParamType::Bool => {
            let word = read_word(data, at)?;
            let value = BigUint::from_bytes_be(word);
            match u8::try_from(&value) {
                Ok(0) => Ok(AbiValue::Bool(false)),
                Ok(1) => Ok(AbiValue::Bool(true)),
                _ => Err(AbiError::decode_mismatch(ty, format!("{value} is not a bool"))),
            }
        }
        ParamType::Uint(bits) => {
            let value = BigUint::from_bytes_be(read_word(data, at)?);
            if value.bits() > *bits as u64 {
                return Err(AbiError::decode_mismatch(ty, format!("{value} exceeds {bits} bits")));
            }
            Ok(AbiValue::Integer(value.into()))
        }
        ParamType::Int(bits) => {
            let value = BigInt::from_signed_bytes_be(read_word(data, at)?);
            if !fits_signed(&value, *bits) {
                return Err(AbiError::decode_mismatch(
                    ty,
                    format!("{value} out of range for {bits} bits"),
                ));
            }
            Ok(AbiValue::Integer(value))
        }
        ParamType::FixedBytes(len) => {
            let word = read_word(data, at)?;
            if word[*len..].iter().any(|b| *b != 0) {
                return Err(AbiError::decode_mismatch(ty, "non-zero padding"));
            }
            Ok(AbiValue::FixedBytes(word[..*len].to_vec()))
        }
        ParamType::Bytes => Ok(AbiValue::Bytes(read_dynamic_bytes(ty, data, at)?.to_vec())),
        ParamType::String => {
            let bytes = read_dynamic_bytes(ty, data, at)?;
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|e| AbiError::decode_mismatch(ty, e.to_string()))?;
            Ok(AbiValue::String(text))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, at, ty)?;
            let start = at + ABI_WORD_SIZE;
            // every element takes at least one word
            let needed = inner
                .head_size()
                .and_then(|size| len.checked_mul(size.max(ABI_WORD_SIZE)))
                .ok_or_else(|| AbiError::decode_mismatch(ty, format!("length {len} overflows")))?;
            let available = data.len().saturating_sub(start);
            if needed > available {
                return Err(AbiError::DecodeTruncated {
                    offset: start,
                    needed,
                    available,
                });
            }
            let items = decode_sequence(std::iter::repeat(&**inner).take(len), data, start)?;
            Ok(AbiValue::Array(items))
        }
        ParamType::FixedArray(inner, len) => {
            let items = decode_sequence(std::iter::repeat(&**inner).take(*len), data, at)?;
            Ok(AbiValue::Array(items))
        }
        ParamType::Tuple(types) => Ok(AbiValue::Tuple(decode_sequence(types.iter(), data, at)?)),
    }
}

fn read_slice(data: &[u8], at: usize, len: usize) -> AbiResult<&[u8]> {
    let available = data.len().saturating_sub(at);
    match at.checked_add(len) {
        Some(end) if end <= data.len() => Ok(&data[at..end]),
        _ => Err(AbiError::DecodeTruncated {
            offset: at,
            needed: len,
            available,
        }),
    }
}

fn read_word(data: &[u8], at: usize) -> AbiResult<&[u8]> {
    read_slice(data, at, ABI_WORD_SIZE)
}

/// Reads a word holding an offset or length.
fn read_usize(data: &[u8], at: usize, ty: &ParamType) -> AbiResult<usize> {
    let word = read_word(data, at)?;
    let (high, low) = word.split_at(ABI_WORD_SIZE - 8);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(low);
    let value = u64::from_be_bytes(bytes);
    if high.iter().any(|b| *b != 0) {
        return Err(AbiError::decode_mismatch(ty, "offset or length does not fit in 64 bits"));
    }
    usize::try_from(value).map_err(|_| AbiError::decode_mismatch(ty, format!("{value} too large")))
}

fn read_dynamic_bytes<'d>(ty: &ParamType, data: &'d [u8], at: usize) -> AbiResult<&'d [u8]> {
    let len = read_usize(data, at, ty)?;
    read_slice(data, at + ABI_WORD_SIZE, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    #[test]
    fn test_round_trip() {
        let types = vec![
            ParamType::Address,
            ParamType::Int(64),
            ParamType::String,
            ParamType::Array(Box::new(ParamType::Tuple(vec![
                ParamType::Bool,
                ParamType::Bytes,
            ]))),
            ParamType::FixedArray(Box::new(ParamType::FixedBytes(4)), 2),
        ];
        let values = vec![
            AbiValue::Address(EthAddress::from_id(99)),
            AbiValue::from_int(-42),
            AbiValue::String("datacap".into()),
            AbiValue::Array(vec![
                AbiValue::Tuple(vec![true.into(), AbiValue::Bytes(vec![1, 2, 3])]),
                AbiValue::Tuple(vec![false.into(), AbiValue::Bytes(Vec::new())]),
            ]),
            AbiValue::Array(vec![
                AbiValue::FixedBytes(vec![0xde, 0xad, 0xbe, 0xef]),
                AbiValue::FixedBytes(vec![0, 0, 0, 1]),
            ]),
        ];

        let encoded = encode(&types, &values).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn test_truncated() {
        let data = vec![0u8; 31];
        assert_eq!(
            decode(&[ParamType::Uint(256)], &data).unwrap_err(),
            AbiError::DecodeTruncated {
                offset: 0,
                needed: 32,
                available: 31
            }
        );

        // declares a 64-byte string but carries 32
        let mut data = vec![0u8; 96];
        data[31] = 0x20;
        data[63] = 64;
        assert!(matches!(
            decode(&[ParamType::String], &data).unwrap_err(),
            AbiError::DecodeTruncated { needed: 64, available: 32, .. }
        ));
    }

    #[test]
    fn test_array_length_beyond_data() {
        let mut data = vec![0u8; 64];
        data[31] = 0x20;
        data[56..].copy_from_slice(&u64::MAX.to_be_bytes());
        assert!(decode(&[ParamType::Array(Box::new(ParamType::Address))], &data).is_err());
    }

    #[test]
    fn test_oversized_fixed_array() {
        let ty = ParamType::Array(Box::new(ParamType::FixedArray(
            Box::new(ParamType::Uint(256)),
            1_000_000_000_000_000_000,
        )));
        let mut data = vec![0u8; 64];
        data[31] = 0x20;
        data[63] = 1;
        assert!(matches!(
            decode(&[ty], &data).unwrap_err(),
            AbiError::DecodeTypeMismatch { .. }
        ));
    }

    #[test]
    fn test_zero_size_elements_are_bounded() {
        let ty = ParamType::Array(Box::new(ParamType::Tuple(Vec::new())));
        let mut data = vec![0u8; 64];
        data[31] = 0x20;
        data[56..].copy_from_slice(&(1u64 << 26).to_be_bytes());
        assert_eq!(
            decode(&[ty], &data).unwrap_err(),
            AbiError::DecodeTruncated {
                offset: 64,
                needed: (1 << 26) * 32,
                available: 0
            }
        );
    }

    #[test]
    fn test_type_mismatches() {
        let mut word = vec![0u8; 32];
        word[31] = 2;
        assert!(matches!(
            decode(&[ParamType::Bool], &word).unwrap_err(),
            AbiError::DecodeTypeMismatch { .. }
        ));

        word[31] = 0;
        word[0] = 1;
        assert!(matches!(
            decode(&[ParamType::Address], &word).unwrap_err(),
            AbiError::DecodeTypeMismatch { .. }
        ));
        assert!(decode(&[ParamType::Uint(8)], &word).is_err());
    }
}
