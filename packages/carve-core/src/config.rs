//! Scan configuration.

use std::ops::Range;

use crate::constraint::TypeSet;

/// Scan configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// First offset to try
    pub start_offset: usize,
    /// One past the last offset to try (None = buffer end)
    pub end_offset: Option<usize>,
    /// Exact column count every record must have
    pub expected_column_count: Option<usize>,
    /// Allowed serial types per column, aligned to column order
    pub type_constraints: Option<Vec<Option<TypeSet>>>,
    /// Stop after this many recovered records (None = unlimited)
    pub max_records: Option<usize>,
    /// Resume after the end of each recovered cell instead of the next byte
    pub skip_recovered: bool,
}

impl ScanConfig {
    /// Candidate offsets for a buffer of `buffer_len` bytes.
    pub fn scan_range(&self, buffer_len: usize) -> Range<usize> {
        let end = self.end_offset.map_or(buffer_len, |e| e.min(buffer_len));
        let start = self.start_offset.min(end);
        start..end
    }
}
