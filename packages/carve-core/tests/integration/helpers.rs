//! Shared fixtures for building leaf cells.

use carve_core::record::LEAF_CELL_MARKER;
use carve_core::varint;

/// Column of a test cell: serial type and raw value bytes.
pub type CellColumn<'a> = (u64, &'a [u8]);

/// Builds a leaf cell holding one record.
pub fn build_cell(row_id: i64, columns: &[CellColumn<'_>]) -> Vec<u8> {
    let mut types = Vec::new();
    let mut body = Vec::new();
    for (serial_type, data) in columns {
        varint::encode_into(*serial_type as i64, &mut types);
        body.extend_from_slice(data);
    }

    // The header length counts its own varint.
    let mut header_len = types.len() + 1;
    while varint::encoded_len(header_len as i64) + types.len() != header_len {
        header_len += 1;
    }

    let mut cell = vec![LEAF_CELL_MARKER];
    varint::encode_into((header_len + body.len()) as i64, &mut cell);
    varint::encode_into(row_id, &mut cell);
    varint::encode_into(header_len as i64, &mut cell);
    cell.extend_from_slice(&types);
    cell.extend_from_slice(&body);
    cell
}

/// Offset of the header length varint within a cell built at offset 0.
pub fn header_len_offset(cell: &[u8]) -> usize {
    let payload = varint::decode(cell, 1).unwrap();
    let row_id = varint::decode(cell, 1 + payload.width).unwrap();
    1 + payload.width + row_id.width
}

/// A typical three-column row: integer id, text name, float score.
pub fn person_cell(row_id: i64, id: i32, name: &str, score: f64) -> Vec<u8> {
    let id_bytes = id.to_be_bytes();
    let score_bytes = score.to_be_bytes();
    build_cell(
        row_id,
        &[
            (4, &id_bytes),
            (name.len() as u64 * 2 + 13, name.as_bytes()),
            (7, &score_bytes),
        ],
    )
}
