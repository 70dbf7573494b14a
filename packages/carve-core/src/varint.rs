//! Variable-length integer codec for record lengths, row ids and serial types.
//!
//! ## Encoding Format
//!
//! A varint is 1 to 9 bytes, most significant group first:
//!
//! | Byte  | Data bits | Continuation |
//! |-------|-----------|--------------|
//! | 1..=8 | low 7     | high bit     |
//! | 9     | all 8     | none         |
//!
//! The concatenated bits (up to 7 * 8 + 8 = 64) are read as a two's-complement
//! `i64`, so negative values always take the full 9 bytes.
//!
//! All functions are pure and operate on borrowed slices.

use serde::Serialize;

use crate::error::{CarveError, Result};

/// Continuation flag carried by every varint byte except the last.
pub const CONTINUATION_BIT: u8 = 0x80;

/// Maximum encoded width in bytes.
pub const MAX_VARINT_LEN: usize = 9;

/// A decoded varint and the number of bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Varint {
    pub value: i64,
    pub width: usize,
}

/// Decodes the varint starting at `position`.
///
/// # Returns
/// The decoded value with its width (1-9), or `BufferExhausted` if the
/// buffer ends before the final byte.
pub fn decode(buffer: &[u8], position: usize) -> Result<Varint> {
    let byte_at = |i: usize| {
        position
            .checked_add(i)
            .and_then(|at| buffer.get(at))
            .copied()
            .ok_or_else(|| CarveError::exhausted(buffer, position, i + 1))
    };

    let mut acc: u64 = 0;
    for i in 0..MAX_VARINT_LEN - 1 {
        let byte = byte_at(i)?;
        acc = (acc << 7) | u64::from(byte & !CONTINUATION_BIT);
        if byte & CONTINUATION_BIT == 0 {
            return Ok(Varint {
                value: acc as i64,
                width: i + 1,
            });
        }
    }

    // The ninth byte contributes all eight bits.
    let last = byte_at(MAX_VARINT_LEN - 1)?;
    Ok(Varint {
        value: ((acc << 8) | u64::from(last)) as i64,
        width: MAX_VARINT_LEN,
    })
}

/// Returns the minimal encoded width of `value`.
pub fn encoded_len(value: i64) -> usize {
    let bits = value as u64;
    if bits >> 56 != 0 {
        return MAX_VARINT_LEN;
    }
    let mut len = 1;
    while len < 8 && bits >> (7 * len) != 0 {
        len += 1;
    }
    len
}

/// Appends the canonical encoding of `value` to `out`, returning the width.
pub fn encode_into(value: i64, out: &mut Vec<u8>) -> usize {
    let bits = value as u64;
    let len = encoded_len(value);

    if len == MAX_VARINT_LEN {
        // Eight 7-bit groups carry the top 56 bits, the last byte the low 8.
        let high = bits >> 8;
        for i in (0..8).rev() {
            out.push(((high >> (7 * i)) as u8 & 0x7f) | CONTINUATION_BIT);
        }
        out.push(bits as u8);
        return len;
    }

    for i in (0..len).rev() {
        let group = (bits >> (7 * i)) as u8 & 0x7f;
        if i == 0 {
            out.push(group);
        } else {
            out.push(group | CONTINUATION_BIT);
        }
    }
    len
}

/// Encodes `value` into a fresh byte vector.
pub fn encode(value: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    encode_into(value, &mut out);
    out
}
