//! Offset sweep over a buffer, collecting every record that parses.

use std::collections::BTreeMap;

use crate::config::ScanConfig;
use crate::error::{CarveError, Result};
use crate::record::{Record, RecordParser, LEAF_CELL_MARKER};

/// Outcome of a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    /// Recovered records in offset order
    pub records: Vec<Record>,
    /// Offsets holding the marker byte that were handed to the parser
    pub candidates: usize,
    /// Offsets not handed to the parser (no marker, or inside a recovered cell)
    pub skipped: usize,
    /// Rejected candidates per error kind
    pub rejections: BTreeMap<&'static str, usize>,
}

impl SweepReport {
    pub fn rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    fn reject(&mut self, offset: usize, err: &CarveError) {
        tracing::trace!("Rejected offset {}: {}", offset, err);
        *self.rejections.entry(err.kind()).or_insert(0) += 1;
    }

    fn accept(&mut self, record: Record) {
        tracing::debug!(
            "Recovered record at offset {} (row id {}, {} columns)",
            record.offset,
            record.row_id,
            record.len()
        );
        self.records.push(record);
    }

    fn log_summary(&self) {
        tracing::debug!(
            "Sweep finished: {} records, {} candidates, {} rejected, {} skipped",
            self.records.len(),
            self.candidates,
            self.rejected(),
            self.skipped
        );
    }
}

/// Tries every offset in the configured range and collects the records.
///
/// Offsets without the leaf cell marker are counted as skipped. With
/// `skip_recovered` the sweep resumes after each recovered cell.
pub fn sweep(buffer: &[u8], config: &ScanConfig) -> SweepReport {
    let parser = RecordParser::from_config(config);
    let range = config.scan_range(buffer.len());
    let mut report = SweepReport::default();

    let mut offset = range.start;
    while offset < range.end {
        if at_limit(&report, config) {
            break;
        }
        if buffer[offset] != LEAF_CELL_MARKER {
            report.skipped += 1;
            offset += 1;
            continue;
        }

        report.candidates += 1;
        match parser.parse(buffer, offset) {
            Ok(record) => {
                let next = next_offset(offset, &record, config).min(range.end);
                report.accept(record);
                report.skipped += next - offset - 1;
                offset = next;
            }
            Err(err) => {
                report.reject(offset, &err);
                offset += 1;
            }
        }
    }

    report.log_summary();
    report
}

/// Parallel sweep with the same report as [`sweep`].
///
/// # Notes
/// - Requires the `parallel` feature to be enabled.
/// - Candidates are parsed concurrently; skipping and the record limit are
///   applied afterwards in offset order, so the result is deterministic.
#[cfg(feature = "parallel")]
pub fn par_sweep(buffer: &[u8], config: &ScanConfig) -> SweepReport {
    use rayon::prelude::*;

    let parser = RecordParser::from_config(config);
    let range = config.scan_range(buffer.len());

    let outcomes: Vec<(usize, Result<Record>)> = range
        .clone()
        .into_par_iter()
        .filter(|&offset| buffer[offset] == LEAF_CELL_MARKER)
        .map(|offset| (offset, parser.parse(buffer, offset)))
        .collect();

    let mut report = SweepReport::default();
    // Offsets below `resume` were consumed by an earlier recovered cell.
    let mut resume = range.start;
    for (offset, outcome) in outcomes {
        if at_limit(&report, config) {
            break;
        }
        if offset < resume {
            continue;
        }
        report.candidates += 1;
        match outcome {
            Ok(record) => {
                resume = next_offset(offset, &record, config);
                report.accept(record);
            }
            Err(err) => report.reject(offset, &err),
        }
    }

    // Everything visited but not parsed counts as skipped, as in `sweep`.
    let visited = if at_limit(&report, config) {
        report.records.last().map_or(range.start, |r| {
            next_offset(r.offset, r, config).min(range.end)
        })
    } else {
        range.end
    };
    report.skipped = visited.saturating_sub(range.start) - report.candidates;

    report.log_summary();
    report
}

fn at_limit(report: &SweepReport, config: &ScanConfig) -> bool {
    config
        .max_records
        .is_some_and(|max| report.records.len() >= max)
}

fn next_offset(offset: usize, record: &Record, config: &ScanConfig) -> usize {
    if config.skip_recovered {
        record.end_offset.max(offset + 1)
    } else {
        offset + 1
    }
}
