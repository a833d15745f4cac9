//! Unsigned LEB128 varints used inside CIDs, multihashes and delegated
//! addresses.

use crate::{CoreError, CoreResult};

const MAX_VARINT_LEN: usize = 10;

/// Appends the varint encoding of `value` to `out`
pub fn write_u64(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Reads a minimally encoded varint, returning the value and the number of
/// bytes consumed
pub fn read_u64(data: &[u8]) -> CoreResult<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate().take(MAX_VARINT_LEN) {
        let part = (byte & 0x7f) as u64;
        if i == MAX_VARINT_LEN - 1 && part > 1 {
            return Err(CoreError::InvalidEncoding {
                reason: "varint overflows u64".to_string(),
            });
        }
        value |= part << (7 * i);
        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(CoreError::InvalidEncoding {
                    reason: "varint is not minimally encoded".to_string(),
                });
            }
            return Ok((value, i + 1));
        }
    }

    Err(CoreError::InvalidEncoding {
        reason: "truncated varint".to_string(),
    })
}
