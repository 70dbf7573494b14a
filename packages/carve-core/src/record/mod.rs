//! Leaf cell record parsing and validation.

mod parser;
#[allow(clippy::module_inception)]
mod record;

pub use parser::{parse_record, RecordParser, LEAF_CELL_MARKER};
pub use record::{Column, Record};
