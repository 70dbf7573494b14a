//! Decoded record returned by the parser.

use serde::Serialize;

use crate::value::{SerialType, Value};

/// One decoded column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub serial_type: SerialType,
    pub value: Value,
}

/// A record recovered from a single leaf cell.
///
/// Columns are kept in on-disk order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Offset of the leaf cell marker byte
    pub offset: usize,
    /// Row id from the cell header
    pub row_id: i64,
    /// Declared payload length (record header plus values)
    pub payload_len: i64,
    /// Declared record header length
    pub header_len: i64,
    /// One past the last value byte
    pub end_offset: usize,
    columns: Vec<Column>,
}

impl Record {
    pub(crate) fn new(
        offset: usize,
        row_id: i64,
        payload_len: i64,
        header_len: i64,
        end_offset: usize,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            offset,
            row_id,
            payload_len,
            header_len,
            end_offset,
            columns,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn serial_types(&self) -> impl Iterator<Item = SerialType> + '_ {
        self.columns.iter().map(|c| c.serial_type)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().map(|c| &c.value)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.columns.into_iter().map(|c| c.value).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Total bytes of the cell, marker included.
    pub fn cell_len(&self) -> usize {
        self.end_offset - self.offset
    }
}
