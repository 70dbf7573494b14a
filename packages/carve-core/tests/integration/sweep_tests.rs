//! Sweeps over buffers with records embedded in noise.

use carve_core::constraint::parse_descriptor;
use carve_core::{sweep, ScanConfig, Value};
use ntest::timeout;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::helpers::{header_len_offset, person_cell};

const CELLS: usize = 20;

/// Printable-ASCII noise with person cells spliced in at random gaps.
///
/// Neither the noise nor the cell contents contain the marker byte, so
/// every candidate offset is a real cell.
fn noisy_buffer(seed: u64) -> (Vec<u8>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf = Vec::new();
    let mut offsets = Vec::new();

    for i in 0..CELLS {
        let gap = rng.gen_range(0..64);
        buf.extend((0..gap).map(|_| rng.gen_range(0x20u8..0x7f)));

        offsets.push(buf.len());
        buf.extend(person_cell(
            100 + i as i64,
            1000 + i as i32,
            &format!("row{:02}", i),
            i as f64 * 0.5,
        ));
    }
    buf.extend((0..17).map(|_| rng.gen_range(0x20u8..0x7f)));
    (buf, offsets)
}

fn strict_config() -> ScanConfig {
    ScanConfig {
        expected_column_count: Some(3),
        type_constraints: Some(parse_descriptor("int;string;float").unwrap()),
        ..Default::default()
    }
}

#[timeout(5000)]
#[test]
fn test_recovers_all_embedded_records() {
    let (buf, offsets) = noisy_buffer(7);
    let report = sweep(&buf, &strict_config());

    let found: Vec<usize> = report.records.iter().map(|r| r.offset).collect();
    assert_eq!(found, offsets);
    assert_eq!(report.candidates, CELLS);
    assert_eq!(report.rejected(), 0);

    for (i, record) in report.records.iter().enumerate() {
        assert_eq!(record.row_id, 100 + i as i64);
        assert_eq!(
            record.values().next(),
            Some(&Value::Integer(1000 + i as i64))
        );
    }
}

#[timeout(5000)]
#[test]
fn test_damaged_cell_is_dropped() {
    let (mut buf, offsets) = noisy_buffer(11);
    let victim = offsets[4];
    let at = victim + header_len_offset(&buf[victim..]);
    buf[at] = 0x40;

    let report = sweep(&buf, &strict_config());
    assert_eq!(report.records.len(), CELLS - 1);
    assert!(report.records.iter().all(|r| r.offset != victim));
    assert_eq!(report.rejected(), 1);
}

#[timeout(5000)]
#[test]
fn test_truncated_tail_cell_is_dropped() {
    let (buf, offsets) = noisy_buffer(3);
    let last = offsets[CELLS - 1];
    let cut = &buf[..last + 10];

    let report = sweep(cut, &ScanConfig::default());
    assert_eq!(report.records.len(), CELLS - 1);
    assert_eq!(report.rejected(), 1);
}

#[timeout(5000)]
#[test]
fn test_skip_recovered_yields_same_records() {
    let (buf, _) = noisy_buffer(5);
    let every = sweep(&buf, &ScanConfig::default());
    let skipping = sweep(
        &buf,
        &ScanConfig {
            skip_recovered: true,
            ..Default::default()
        },
    );
    assert_eq!(every.records, skipping.records);
}

#[cfg(feature = "parallel")]
#[timeout(5000)]
#[test]
fn test_parallel_sweep_matches() {
    let (buf, _) = noisy_buffer(9);
    let config = ScanConfig {
        max_records: Some(12),
        skip_recovered: true,
        ..strict_config()
    };
    assert_eq!(carve_core::par_sweep(&buf, &config), sweep(&buf, &config));
}
