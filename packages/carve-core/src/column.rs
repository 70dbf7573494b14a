//! Column value decoding by serial type.
//!
//! | Serial type | Value                         | Width       |
//! |-------------|-------------------------------|-------------|
//! | 0           | NULL                          | 0           |
//! | 1..=4       | big-endian signed integer     | 1, 2, 3, 4  |
//! | 5           | big-endian signed integer     | 6           |
//! | 6           | big-endian signed integer     | 8           |
//! | 7           | big-endian IEEE-754 double    | 8           |
//! | 8, 9        | constant 0, 1                 | 0           |
//! | 10, 11      | reserved                      | -           |
//! | N >= 12 even| blob                          | (N - 12) / 2|
//! | N >= 13 odd | text                          | (N - 13) / 2|

use crate::error::{CarveError, Result};
use crate::value::{SerialType, Value};

/// Returns the on-disk width of a column with the given serial type.
pub fn serial_type_width(serial_type: SerialType) -> Result<u64> {
    if serial_type.is_reserved() {
        return Err(CarveError::ReservedSerialType {
            serial_type: serial_type.0,
        });
    }

    let width = match serial_type {
        SerialType::NULL | SerialType::ZERO | SerialType::ONE => 0,
        SerialType(n @ 1..=4) => n,
        SerialType(5) => 6,
        SerialType(6) | SerialType::FLOAT => 8,
        SerialType(n) if serial_type.is_blob() => (n - 12) / 2,
        SerialType(n) => (n - 13) / 2,
    };
    Ok(width)
}

/// Decodes one column value at `position`.
///
/// # Returns
/// The value and the number of bytes it occupies. Fails with
/// `ColumnOverrun` if the value would extend past the buffer.
pub fn decode(serial_type: SerialType, buffer: &[u8], position: usize) -> Result<(Value, usize)> {
    let width = serial_type_width(serial_type)?;
    let available = buffer.len().saturating_sub(position);

    let len = usize::try_from(width)
        .ok()
        .filter(|&len| len <= available)
        .ok_or(CarveError::ColumnOverrun {
            serial_type: serial_type.0,
            offset: position,
            width,
            available,
        })?;
    // Zero-width columns may sit exactly at (or past) the buffer end.
    let span = buffer.get(position..position + len).unwrap_or(&[]);

    let value = match serial_type {
        SerialType::NULL => Value::Null,
        SerialType(1..=6) => Value::Integer(read_signed_be(span)),
        SerialType::FLOAT => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(span);
            Value::Float(f64::from_be_bytes(raw))
        }
        SerialType::ZERO => Value::ConstZero,
        SerialType::ONE => Value::ConstOne,
        _ if serial_type.is_blob() => Value::Blob(span.to_vec()),
        _ => Value::Text(span.to_vec()),
    };

    Ok((value, len))
}

/// Interprets a 1-8 byte big-endian span as a two's-complement integer.
fn read_signed_be(span: &[u8]) -> i64 {
    let negative = span.first().is_some_and(|b| b & 0x80 != 0);
    let mut value: i64 = if negative { -1 } else { 0 };
    for &b in span {
        value = (value << 8) | i64::from(b);
    }
    value
}
