//! Layered record validation.
//!
//! A candidate cell is laid out as:
//!
//! ```text
//! 0x0d | payload_len | row_id | header_len | serial types... | values...
//!                             ^-- header start, payload measured from here
//! ```
//!
//! Every gate fails with its own error kind; no partial record is returned.

use crate::column;
use crate::config::ScanConfig;
use crate::constraint::TypeSet;
use crate::error::{CarveError, Result};
use crate::value::SerialType;
use crate::varint;

use super::record::{Column, Record};

/// B-tree leaf cell header byte preceding every candidate record.
pub const LEAF_CELL_MARKER: u8 = 0x0d;

/// Smallest legal header: its own length varint plus one serial type.
const MIN_HEADER_LEN: i64 = 2;

/// Record parser carrying the optional per-parse checks.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    expected_column_count: Option<usize>,
    type_constraints: Option<Vec<Option<TypeSet>>>,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a parser with the record checks from a scan configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            expected_column_count: config.expected_column_count,
            type_constraints: config.type_constraints.clone(),
        }
    }

    /// Requires every record to have exactly `columns` columns.
    pub fn with_column_count(mut self, columns: usize) -> Self {
        self.expected_column_count = Some(columns);
        self
    }

    /// Restricts serial types per column. Columns beyond the end of
    /// `constraints`, or with a `None` entry, are not checked.
    pub fn with_type_constraints(mut self, constraints: Vec<Option<TypeSet>>) -> Self {
        self.type_constraints = Some(constraints);
        self
    }

    pub fn expected_column_count(&self) -> Option<usize> {
        self.expected_column_count
    }

    /// Parses the record whose leaf cell starts at `start`.
    ///
    /// # Arguments
    /// * `buffer` - Untrusted bytes, only read
    /// * `start` - Offset of the leaf cell marker byte
    ///
    /// # Returns
    /// The decoded record, or the first validation failure.
    pub fn parse(&self, buffer: &[u8], start: usize) -> Result<Record> {
        let marker = buffer
            .get(start)
            .copied()
            .ok_or_else(|| CarveError::exhausted(buffer, start, 1))?;
        if marker != LEAF_CELL_MARKER {
            return Err(CarveError::MissingMarker {
                offset: start,
                found: marker,
            });
        }
        let mut pos = start + 1;

        let payload_len = varint::decode(buffer, pos)?;
        pos += payload_len.width;

        let row_id = varint::decode(buffer, pos)?;
        pos += row_id.width;

        let header_start = pos;
        let header_len = varint::decode(buffer, pos)?;
        pos += header_len.width;

        if header_len.value < MIN_HEADER_LEN {
            return Err(CarveError::HeaderTooShort {
                header_len: header_len.value,
            });
        }
        if let Some(columns) = self.expected_column_count {
            check_header_bounds(header_len.value, columns)?;
        }

        // An oversized declaration runs into the buffer end while decoding.
        let header_end = usize::try_from(header_len.value)
            .map_or(usize::MAX, |len| header_start.saturating_add(len));

        let mut serial_types = Vec::new();
        while pos < header_end {
            let serial_type = varint::decode(buffer, pos)?;
            pos += serial_type.width;
            serial_types.push(SerialType::from_varint(serial_type.value));
        }
        if pos != header_end {
            return Err(CarveError::HeaderLengthMismatch {
                expected_end: header_end,
                actual_end: pos,
            });
        }

        if let Some(expected) = self.expected_column_count {
            if serial_types.len() != expected {
                return Err(CarveError::ColumnCountMismatch {
                    expected,
                    actual: serial_types.len(),
                });
            }
        }

        if let Some(constraints) = &self.type_constraints {
            check_type_constraints(&serial_types, constraints)?;
        }

        let mut columns = Vec::with_capacity(serial_types.len());
        for serial_type in serial_types {
            let (value, width) = column::decode(serial_type, buffer, pos)?;
            pos += width;
            columns.push(Column { serial_type, value });
        }

        let actual = pos - header_start;
        if i64::try_from(actual).ok() != Some(payload_len.value) {
            return Err(CarveError::PayloadLengthMismatch {
                declared: payload_len.value,
                actual,
            });
        }

        tracing::trace!(
            "Record at offset {} (row id {}, {} columns)",
            start,
            row_id.value,
            columns.len()
        );

        Ok(Record::new(
            start,
            row_id.value,
            payload_len.value,
            header_len.value,
            pos,
            columns,
        ))
    }
}

/// Each header varint takes 1 to 9 bytes: one for the header length, one
/// per column.
fn check_header_bounds(header_len: i64, columns: usize) -> Result<()> {
    let slots = (columns as u64).saturating_add(1);
    let min = slots;
    let max = slots.saturating_mul(varint::MAX_VARINT_LEN as u64);

    // header_len is at least MIN_HEADER_LEN here.
    let len = header_len as u64;
    if len < min || len > max {
        return Err(CarveError::HeaderLengthOutOfRange {
            header_len,
            columns,
            min,
            max,
        });
    }
    Ok(())
}

fn check_type_constraints(
    serial_types: &[SerialType],
    constraints: &[Option<TypeSet>],
) -> Result<()> {
    for (column, (serial_type, allowed)) in serial_types.iter().zip(constraints).enumerate() {
        let Some(allowed) = allowed else {
            continue;
        };
        if !allowed.accepts(*serial_type) {
            return Err(CarveError::TypeConstraintViolation {
                column,
                serial_type: serial_type.0,
            });
        }
    }
    Ok(())
}

/// Parses one record with optional column count and type checks.
pub fn parse_record(
    buffer: &[u8],
    start: usize,
    expected_column_count: Option<usize>,
    type_constraints: Option<&[Option<TypeSet>]>,
) -> Result<Record> {
    let parser = RecordParser {
        expected_column_count,
        type_constraints: type_constraints.map(<[_]>::to_vec),
    };
    parser.parse(buffer, start)
}
