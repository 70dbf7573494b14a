//! Backward stepping over runs of varints.
//!
//! Given the offset one past a contiguous run of varints, finds where the
//! n-th preceding varint starts. Only the bytes themselves are consulted, so
//! this is a structural heuristic: any byte with the continuation bit set is
//! taken to belong to the varint that follows it. A run that merely looks
//! like varints is accepted, and a genuine 9-byte varint whose last byte has
//! a clear high bit is indistinguishable from a shorter one preceded by
//! unrelated bytes.

use crate::error::{CarveError, Result};
use crate::varint::{CONTINUATION_BIT, MAX_VARINT_LEN};

/// Returns the start of the varint `n` positions before `end`.
///
/// # Arguments
/// * `buffer` - Bytes containing the varint run
/// * `end` - Offset one past the last byte of the run
/// * `n` - Number of varints to step back over (0 returns `end`)
///
/// # Returns
/// The start offset, `MalformedVarint` if a varint whose last byte carries
/// the continuation bit is not exactly 9 bytes wide, or `BufferExhausted`
/// when stepping would leave the buffer.
pub fn locate_nth_preceding_varint_start(buffer: &[u8], end: usize, n: usize) -> Result<usize> {
    if end > buffer.len() {
        return Err(CarveError::exhausted(buffer, end, 0));
    }

    let mut pos = end;
    for _ in 0..n {
        if pos == 0 {
            return Err(CarveError::exhausted(buffer, 0, 1));
        }
        let last = pos - 1;
        pos = last;

        // Earlier bytes with the continuation bit belong to this varint.
        while last - pos + 1 < MAX_VARINT_LEN && pos > 0 && buffer[pos - 1] & CONTINUATION_BIT != 0
        {
            pos -= 1;
        }

        let width = last - pos + 1;
        if buffer[last] & CONTINUATION_BIT != 0 && width != MAX_VARINT_LEN {
            return Err(CarveError::MalformedVarint {
                offset: last,
                width,
            });
        }
    }

    Ok(pos)
}
