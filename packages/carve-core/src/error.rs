//! Record decoding error types.

use thiserror::Error;

/// Result type alias using CarveError.
pub type Result<T> = std::result::Result<T, CarveError>;

/// Reasons a candidate offset is rejected as a record.
///
/// Every variant is an expected outcome of scanning untrusted bytes. Callers
/// sweeping a buffer discard the offset and move on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarveError {
    /// Ran off the end of the buffer while reading a varint or field
    #[error("Buffer exhausted at offset {offset}: needed {needed} bytes, {available} available")]
    BufferExhausted {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Leaf cell marker byte not present
    #[error("Leaf cell marker 0x0d not present at offset {offset} (found {found:#04x})")]
    MissingMarker { offset: usize, found: u8 },

    /// Declared header length below the minimum of 2
    #[error("Header length {header_len} too small")]
    HeaderTooShort { header_len: i64 },

    /// Declared header length impossible for the expected column count
    #[error("Header length {header_len} outside [{min}, {max}] for {columns} columns")]
    HeaderLengthOutOfRange {
        header_len: i64,
        columns: usize,
        min: u64,
        max: u64,
    },

    /// Serial type varints did not end exactly on the declared header boundary
    #[error("Record header ended at offset {actual_end}, expected {expected_end}")]
    HeaderLengthMismatch {
        expected_end: usize,
        actual_end: usize,
    },

    /// Decoded column count differs from the expected count
    #[error("Expected {expected} columns, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// Column serial type not in its allowed set
    #[error("Serial type {serial_type} for column {column} not in the allowed set")]
    TypeConstraintViolation { column: usize, serial_type: u64 },

    /// Serial types 10 and 11 never appear in valid data
    #[error("Reserved serial type {serial_type} used")]
    ReservedSerialType { serial_type: u64 },

    /// Column value extends past the end of the buffer
    #[error("Column of serial type {serial_type} at offset {offset} needs {width} bytes, {available} available")]
    ColumnOverrun {
        serial_type: u64,
        offset: usize,
        width: u64,
        available: usize,
    },

    /// Measured payload differs from the declared payload length
    #[error("Payload length field does not match payload: declared {declared}, actual {actual}")]
    PayloadLengthMismatch { declared: i64, actual: usize },

    /// Varint ending with the continuation bit set that is not 9 bytes wide
    #[error("Varint ending at offset {offset} has continuation bit set but spans {width} bytes")]
    MalformedVarint { offset: usize, width: usize },
}

impl CarveError {
    /// Stable label for the error kind, used for rejection statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            CarveError::BufferExhausted { .. } => "buffer_exhausted",
            CarveError::MissingMarker { .. } => "missing_marker",
            CarveError::HeaderTooShort { .. } => "header_too_short",
            CarveError::HeaderLengthOutOfRange { .. } => "header_length_out_of_range",
            CarveError::HeaderLengthMismatch { .. } => "header_length_mismatch",
            CarveError::ColumnCountMismatch { .. } => "column_count_mismatch",
            CarveError::TypeConstraintViolation { .. } => "type_constraint_violation",
            CarveError::ReservedSerialType { .. } => "reserved_serial_type",
            CarveError::ColumnOverrun { .. } => "column_overrun",
            CarveError::PayloadLengthMismatch { .. } => "payload_length_mismatch",
            CarveError::MalformedVarint { .. } => "malformed_varint",
        }
    }

    pub(crate) fn exhausted(buffer: &[u8], offset: usize, needed: usize) -> Self {
        CarveError::BufferExhausted {
            offset,
            needed,
            available: buffer.len().saturating_sub(offset),
        }
    }
}
