//! Base-128 variable-length integers.
//!
//! Each byte carries 7 data bits, least significant group first; bit 7 marks
//! continuation. A `u64` takes 1 to 10 bytes. Signed `int64` values are
//! encoded as their two's complement `u64`, so negative numbers always take
//! 10 bytes.
//!
//! ```
//! use strata_wire::varint::{decode_varint, encode_varint};
//!
//! let mut buf = Vec::new();
//! encode_varint(300, &mut buf);
//! assert_eq!(buf, [0xAC, 0x02]);
//! assert_eq!(decode_varint(&buf), Ok((300, 2)));
//! ```

use alloc::vec::Vec;

use crate::WireError;

/// Maximum bytes needed to encode a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;

/// Appends `value` to `buf`.
#[inline]
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & u64::from(DATA_MASK)) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | CONTINUATION_BIT);
    }
}

/// Number of bytes [`encode_varint`] writes for `value`.
#[inline]
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decodes a varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if `buf` ends before the last byte.
/// - [`WireError::VarintOverflow`] if the encoding does not fit in 64 bits.
///
/// Error offsets are relative to `buf`.
#[inline]
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), WireError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(WireError::VarintOverflow(0));
        }
        let data = u64::from(byte & DATA_MASK);
        // The tenth byte may only carry the top bit of a u64.
        if shift == 63 && data > 1 {
            return Err(WireError::VarintOverflow(0));
        }
        result |= data << shift;
        if byte & CONTINUATION_BIT == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    Err(WireError::UnexpectedEof(buf.len()))
}

// -----------------------------------------------------------------------------
// Tests
