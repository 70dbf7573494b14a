//! End-to-end record parsing scenarios.

use carve_core::constraint::parse_descriptor;
use carve_core::{parse_record, CarveError, RecordParser, SerialType, TypeSet, Value};
use ntest::timeout;

use super::helpers::{build_cell, header_len_offset, person_cell};

/// Scenario A: a single one-byte integer column.
#[timeout(1000)]
#[test]
fn test_single_integer_record() {
    let buf = [0x0d, 0x03, 0x00, 0x02, 0x01, 0x2a];
    let record = parse_record(&buf, 0, Some(1), None).unwrap();

    assert_eq!(record.header_len, 2);
    assert_eq!(record.into_values(), vec![Value::Integer(42)]);
}

/// Scenario B: header length one byte larger than the serial types.
#[timeout(1000)]
#[test]
fn test_header_longer_than_serial_types() {
    let cell = build_cell(1, &[(2, &[0x81, 0x00])]);
    let mut mutated = cell.clone();
    let at = header_len_offset(&mutated);
    mutated[at] += 1;

    assert!(matches!(
        parse_record(&mutated, 0, None, None),
        Err(CarveError::HeaderLengthMismatch { .. })
    ));
}

/// Scenario C: three columns expected, two encoded.
#[timeout(1000)]
#[test]
fn test_expected_column_count_not_met() {
    // The first serial type uses a 2-byte varint so the header length
    // stays within the bounds for three columns.
    let buf = [0x0d, 0x06, 0x00, 0x04, 0x80, 0x01, 0x01, 0x05, 0x06];
    assert_eq!(
        parse_record(&buf, 0, Some(3), None).unwrap_err(),
        CarveError::ColumnCountMismatch {
            expected: 3,
            actual: 2
        }
    );
}

/// Scenario D: serial type 13 is empty text.
#[timeout(1000)]
#[test]
fn test_empty_text() {
    let cell = build_cell(4, &[(1, &[1]), (13, &[])]);
    let record = parse_record(&cell, 0, Some(2), None).unwrap();
    assert_eq!(record.columns()[1].serial_type, SerialType(13));
    assert_eq!(record.columns()[1].value, Value::Text(Vec::new()));
    assert_eq!(record.end_offset, cell.len());
}

/// Scenario E: the string family accepts odd types only.
#[timeout(1000)]
#[test]
fn test_string_family_constraint() {
    let constraints = vec![Some(TypeSet::any_text())];

    let text = build_cell(1, &[(15, b"q")]);
    assert!(parse_record(&text, 0, None, Some(&constraints)).is_ok());

    let blob = build_cell(1, &[(12, &[])]);
    assert_eq!(
        parse_record(&blob, 0, None, Some(&constraints)).unwrap_err(),
        CarveError::TypeConstraintViolation {
            column: 0,
            serial_type: 12
        }
    );
}

#[timeout(1000)]
#[test]
fn test_typical_row_with_descriptor() {
    let cell = person_cell(17, -3, "alice", 0.75);
    let parser = RecordParser::new()
        .with_column_count(3)
        .with_type_constraints(parse_descriptor("int;string;float").unwrap());

    let record = parser.parse(&cell, 0).unwrap();
    assert_eq!(record.row_id, 17);
    assert_eq!(
        record.into_values(),
        vec![
            Value::Integer(-3),
            Value::Text(b"alice".to_vec()),
            Value::Float(0.75)
        ]
    );

    let wrong = RecordParser::new().with_type_constraints(parse_descriptor("*;blob").unwrap());
    assert!(matches!(
        wrong.parse(&cell, 0),
        Err(CarveError::TypeConstraintViolation { column: 1, .. })
    ));
}

#[timeout(1000)]
#[test]
fn test_long_text_widens_header_varints() {
    let name = "x".repeat(500);
    let cell = person_cell(100_000, 1, &name, 1.0);
    let record = parse_record(&cell, 0, Some(3), None).unwrap();

    assert_eq!(record.row_id, 100_000);
    assert_eq!(record.payload_len as usize, cell.len() - header_len_offset(&cell));
    assert_eq!(
        record.values().nth(1),
        Some(&Value::Text(name.into_bytes()))
    );
}

/// Changing the declared payload length always fails the cross-check.
#[timeout(1000)]
#[test]
fn test_payload_length_mutations_detected() {
    let cell = person_cell(2, 10, "bob", 2.0);
    for delta in 1..=5u8 {
        for bump in [delta.wrapping_neg(), delta] {
            let mut mutated = cell.clone();
            mutated[1] = mutated[1].wrapping_add(bump) & 0x7f;
            assert!(
                matches!(
                    parse_record(&mutated, 0, Some(3), None),
                    Err(CarveError::PayloadLengthMismatch { .. })
                ),
                "payload byte {:#04x}",
                mutated[1]
            );
        }
    }
}

/// Every proper prefix of a valid cell is rejected.
#[timeout(1000)]
#[test]
fn test_truncated_cells_rejected() {
    let cell = person_cell(3, 7, "carol", -1.5);
    for len in 0..cell.len() {
        assert!(parse_record(&cell[..len], 0, None, None).is_err(), "prefix {}", len);
    }
    assert!(parse_record(&cell, 0, None, None).is_ok());
}

#[timeout(1000)]
#[test]
fn test_parse_does_not_depend_on_surrounding_bytes() {
    let cell = person_cell(5, 99, "dave", 3.5);
    let expected = parse_record(&cell, 0, None, None).unwrap();

    let mut framed = vec![0xab; 37];
    framed.extend_from_slice(&cell);
    framed.extend_from_slice(&[0xcd; 11]);

    let record = parse_record(&framed, 37, None, None).unwrap();
    assert_eq!(record.offset, 37);
    assert_eq!(record.end_offset, 37 + cell.len());
    assert_eq!(record.into_values(), expected.into_values());
}
